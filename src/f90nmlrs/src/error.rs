// f90nmlrs/src/error.rs

//! Error types for reading Fortran namelists.

use std::io;
use thiserror::Error;

/// Result type alias for f90nml operations.
pub type Result<T> = std::result::Result<T, F90nmlError>;

/// Errors that can occur when scanning, parsing, or converting namelists.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum F90nmlError {
    /// I/O error when reading files
    #[error("I/O error: {0}")]
    Io(String),

    /// Parse error with position and message
    #[error("Parse error at line {line}, column {column}: {message}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
    },

    /// Unexpected end of input
    #[error("Unexpected end of file")]
    UnexpectedEof,

    /// Invalid literal for a variable
    #[error("Invalid value '{value}' for variable '{variable}': expected {expected_type}")]
    InvalidValue {
        variable: String,
        value: String,
        expected_type: String,
    },

    /// Invalid or unsupported array index
    #[error("Invalid index {index} for variable '{variable}': {message}")]
    InvalidIndex {
        variable: String,
        index: String,
        message: String,
    },

    /// JSON serialization error
    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML serialization error
    #[cfg(feature = "yaml")]
    #[error("YAML error: {0}")]
    Yaml(String),
}

impl F90nmlError {
    /// Build a parse error at the given position.
    pub fn parse_error(message: &str, line: usize, column: usize) -> Self {
        F90nmlError::Parse {
            message: message.to_string(),
            line,
            column,
        }
    }
}

impl From<io::Error> for F90nmlError {
    fn from(err: io::Error) -> Self {
        F90nmlError::Io(err.to_string())
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for F90nmlError {
    fn from(err: serde_json::Error) -> Self {
        F90nmlError::Json(err.to_string())
    }
}

#[cfg(feature = "yaml")]
impl From<serde_yaml::Error> for F90nmlError {
    fn from(err: serde_yaml::Error) -> Self {
        F90nmlError::Yaml(err.to_string())
    }
}
