use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Session connect failed: {0}")]
    Connect(#[from] fantoccini::error::NewSessionError),

    #[error("WebDriver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),

    #[error("Title mismatch: expected {expected:?} within {actual:?}")]
    TitleMismatch { expected: String, actual: String },

    #[error("Invalid value for {key}: {message}")]
    Config { key: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
