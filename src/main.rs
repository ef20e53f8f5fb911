//! This is a CLI tool to render the output of a memory mountain benchmark as a 3D surface,
//! using the *mountain* library to read it.
//!
//! # Installation
//!
//! From the workspace directory execute the following:
//!
//! ```shell
//! $ cargo install --path .
//! ```
//!
//! After that, you can use the command as `$ memory-mountain`.
//!
//! # Usage
//!
//! To see its features, execute `$ memory-mountain --help`.
//!
//! # Examples
//!
//! *Show `data.txt` from the current directory, measured with strides 1, 3, ..., 31*
//! ```shell
//! $ memory-mountain
//! ```
//!
//! *Check a result measured with strides 1 to 8 without opening a window*
//! ```shell
//! $ memory-mountain results/laptop.txt -s 1,2,3,4,5,6,7,8 --check
//! ```

use clap::Parser;
use env_logger::Env;
use log::info;
use mountain::consts::DEFAULT_DATA_PATH;
use mountain::{reader, Mountain, StrideSequence};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::error::AppError;

mod error;
#[cfg_attr(not(feature = "window"), allow(dead_code))]
mod visualizer;
#[cfg(feature = "window")]
mod window;

/// Possible arguments for the executable.
#[derive(Debug, Parser)]
#[command(about, version)]
pub struct Args {
    /// Benchmark output to visualize. The first line is skipped as header.
    #[arg(default_value = DEFAULT_DATA_PATH)]
    pub path: PathBuf,
    /// Comma separated strides the benchmark was run with, one per throughput column.
    /// Defaults to the odd strides 1, 3, ..., 31.
    #[arg(short, long, value_delimiter = ',')]
    pub strides: Vec<u32>,
    /// The log level of the application.
    #[arg(short, long, default_value = "error")]
    pub log_level: String,
    /// Only parse the file and print a summary, without opening a window.
    #[arg(short, long, default_value_t = false)]
    pub check: bool,
}

/// Where to read the benchmark from and how to interpret its columns
#[derive(Debug, Clone, PartialEq)]
pub struct MountainConfig {
    pub path: PathBuf,
    pub strides: StrideSequence,
}

impl MountainConfig {
    fn from_args(args: &Args) -> Result<Self, AppError> {
        let strides = if args.strides.is_empty() {
            StrideSequence::default()
        } else {
            StrideSequence::new(args.strides.clone())?
        };
        Ok(Self {
            path: args.path.clone(),
            strides,
        })
    }
}

/// Reads the benchmark, then either prints its summary or shows it.
fn run(args: &Args) -> Result<(), AppError> {
    let config = MountainConfig::from_args(args)?;
    info!(
        "Reading {} with strides {:?}",
        config.path.display(),
        config.strides.values()
    );

    let mountain = reader::read(&config.path, &config.strides)?;
    info!("{}", mountain.summary());

    if args.check {
        println!("{}", mountain.summary());
        return Ok(());
    }
    show(mountain)
}

#[cfg(feature = "window")]
fn show(mountain: Mountain) -> Result<(), AppError> {
    window::render_plot(mountain)
}

#[cfg(not(feature = "window"))]
fn show(_mountain: Mountain) -> Result<(), AppError> {
    Err(AppError::WindowUnavailable)
}

/// Main endpoint for the executable.
fn main() -> ExitCode {
    let args = Args::parse();

    // Init logger
    let env = Env::default().filter_or("MOUNTAIN_LOG", args.log_level.as_str());
    let _ = env_logger::try_init_from_env(env);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
