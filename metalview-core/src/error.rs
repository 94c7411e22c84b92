//! Error types for metalview

use thiserror::Error;

/// Core error type for metalview operations
#[derive(Error, Debug)]
pub enum MetalViewError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid table specification (zero width or duplicate key)
    #[error("Invalid table specification: {0}")]
    InvalidTableSpec(String),

    /// Invalid input or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Parsing errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for metalview operations
pub type Result<T> = std::result::Result<T, MetalViewError>;

impl From<serde_json::Error> for MetalViewError {
    fn from(err: serde_json::Error) -> Self {
        MetalViewError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: MetalViewError = json_err.into();

        match err {
            MetalViewError::Serialization(msg) => {
                assert!(!msg.is_empty());
            }
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MetalViewError = io_err.into();

        match err {
            MetalViewError::Io(e) => {
                assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
            }
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_error_display() {
        let err = MetalViewError::Config("missing API key".to_string());
        assert_eq!(format!("{}", err), "Configuration error: missing API key");

        let err = MetalViewError::InvalidTableSpec("duplicate column key 'mac'".to_string());
        assert_eq!(
            format!("{}", err),
            "Invalid table specification: duplicate column key 'mac'"
        );

        let err = MetalViewError::InvalidInput("bad hardware id".to_string());
        assert_eq!(format!("{}", err), "Invalid input: bad hardware id");
    }
}
