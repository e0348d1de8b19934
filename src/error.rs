use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParamCrawlError {
    #[error("Invalid header {header:?}: expected exactly one ':' separator")]
    InvalidHeader {
        header: String,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File error: {path:?} - {message}")]
    FileError {
        path: PathBuf,
        message: String,
    },

    #[error("Output sink error: {path:?} - {message}")]
    SinkError {
        path: PathBuf,
        message: String,
    },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Read error: {0}")]
    ReadError(String),

    #[error("Timeout error: {operation} exceeded {seconds} seconds")]
    TimeoutError {
        operation: String,
        seconds: u64,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl ParamCrawlError {
    /// Whether the error belongs to a single target's fetch path
    /// rather than to run setup.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            ParamCrawlError::NetworkError(_)
                | ParamCrawlError::ReadError(_)
                | ParamCrawlError::TimeoutError { .. }
        )
    }
}

impl From<anyhow::Error> for ParamCrawlError {
    fn from(error: anyhow::Error) -> Self {
        ParamCrawlError::UnexpectedError(error.to_string())
    }
}

pub type ParamCrawlResult<T> = std::result::Result<T, ParamCrawlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_errors_are_classified() {
        assert!(ParamCrawlError::NetworkError("refused".to_string()).is_fetch_error());
        assert!(ParamCrawlError::TimeoutError { operation: "GET".to_string(), seconds: 10 }.is_fetch_error());
        assert!(!ParamCrawlError::InvalidHeader { header: "Cookie".to_string() }.is_fetch_error());
        assert!(!ParamCrawlError::SinkError { path: PathBuf::from("out.txt"), message: "denied".to_string() }.is_fetch_error());
    }
}
