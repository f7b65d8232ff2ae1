//! Application-level errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The window could not be opened or updated.
    #[error("window: {0}")]
    Window(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
