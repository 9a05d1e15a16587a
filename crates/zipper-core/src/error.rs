//! Error types for zipper-core

use thiserror::Error;

/// Core error types for the zipper library
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP-specific error
    #[error("Zip error: {0}")]
    Zip(String),

    /// Invalid glob pattern
    #[error("Invalid pattern: {0}")]
    Pattern(String),

    /// Configuration-related error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Nothing to archive: the base directory is empty or missing,
    /// or every file was filtered out
    #[error("No files to zip")]
    NoFilesToArchive,

    /// The projected compressed size would exceed the configured budget
    #[error(
        "When trying to zip file {file_name}, zip compressed size reached a limit of {budget} bytes"
    )]
    BudgetExceeded {
        /// File that would have crossed the budget
        file_name: String,
        /// Compressed bytes written before that file
        bytes_so_far: u64,
        /// Configured budget in bytes
        budget: u64,
    },
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            other => Error::Zip(other.to_string()),
        }
    }
}

impl From<glob::PatternError> for Error {
    fn from(err: glob::PatternError) -> Self {
        Error::Pattern(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_exceeded_message_names_file() {
        let err = Error::BudgetExceeded {
            file_name: "data/big.bin".to_string(),
            bytes_so_far: 120,
            budget: 1000,
        };
        let msg = err.to_string();
        assert!(msg.contains("data/big.bin"));
        assert!(msg.contains("1000"));
    }

    #[test]
    fn test_zip_io_error_becomes_io() {
        let zip_err = zip::result::ZipError::Io(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "closed",
        ));
        assert!(matches!(Error::from(zip_err), Error::Io(_)));
    }
}
