//! Error types for the YAML front end.

use thiserror::Error;
use treeconf::ConfigError;

/// Result type alias for treeconf-yaml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing YAML text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// YAML syntax error
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// The emitter failed to write the document
    #[error("Emit error: {message}")]
    Emit { message: String },

    /// The parsed document could not be turned into a tree, or the tree
    /// could not be encoded
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<yaml_rust2::ScanError> for Error {
    fn from(err: yaml_rust2::ScanError) -> Self {
        Error::Parse {
            message: err.to_string(),
        }
    }
}

impl From<yaml_rust2::EmitError> for Error {
    fn from(err: yaml_rust2::EmitError) -> Self {
        Error::Emit {
            message: err.to_string(),
        }
    }
}
