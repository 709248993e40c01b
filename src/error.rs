use ctrl_core::CtrlError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid theme file: {0}")]
    Theme(#[from] serde_json::Error),

    #[error("{0}")]
    Compile(#[from] CtrlError),

    #[error("Logger already installed: {0}")]
    Logger(#[from] log::SetLoggerError),
}

// Create a type alias for convenience
pub type Result<T> = std::result::Result<T, CliError>;
