use mountain::MountainError;
use thiserror::Error;

/// Everything that can make the executable fail
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Mountain(#[from] MountainError),

    #[cfg_attr(not(feature = "window"), allow(dead_code))]
    #[error("Failed to open the plot window: {0}")]
    Window(String),

    #[cfg_attr(feature = "window", allow(dead_code))]
    #[error("Built without window support; rebuild with the `window` feature or pass --check")]
    WindowUnavailable,
}
