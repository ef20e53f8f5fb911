//! This is the library that turns the textual output of a memory mountain benchmark into a
//! [`grid::Mountain`], ready to be rendered.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mountain::reader;
//! use mountain::stride::StrideSequence;
//!
//! let strides = StrideSequence::default(); // 1, 3, 5, ..., 31
//! let mountain = reader::read("data.txt", &strides).unwrap();
//!
//! println!("{}", mountain.summary());
//! ```
//!
//! # Input Format
//!
//! The first line is a header and is always skipped. Every other non-blank line holds a
//! working-set size followed by one throughput value (MB/s) per stride:
//!
//! ```text
//!        s1    s3    s5  ...
//! 128m  5012  3110  2240 ...
//! 64m   5120  3201  2301 ...
//! 512k  9871  8010  7302 ...
//! ```
//!
//! Sizes are plain byte counts or carry a lowercase `k` (KiB) or `m` (MiB) suffix.

pub mod consts;
pub mod error;
pub mod grid;
pub mod reader;
pub mod size;
pub mod stride;

pub use error::MountainError;
pub use grid::{Mountain, ThroughputMatrix};
pub use size::WorkingSetSize;
pub use stride::StrideSequence;

/// Result type used across the library
pub type Result<T> = core::result::Result<T, MountainError>;
