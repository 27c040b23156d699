//! Error types for spendlens

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed record #{record}: {reason}")]
    MalformedRecord { record: usize, reason: String },

    #[error("Division by zero: {0}")]
    DivisionByZero(&'static str),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Empty input: at least one transaction is required")]
    EmptyInput,

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    pub(crate) fn malformed(record: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            record,
            reason: reason.into(),
        }
    }

    /// Check if this is a non-fatal "not enough data" condition
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_record_display() {
        let err = Error::malformed(3, "missing field 'amount'");
        assert_eq!(
            err.to_string(),
            "Malformed record #3: missing field 'amount'"
        );
    }

    #[test]
    fn test_insufficient_data_flag() {
        assert!(Error::InsufficientData("1 category".into()).is_insufficient_data());
        assert!(!Error::DivisionByZero("total expenses").is_insufficient_data());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
