//! Error types for the pros2vi core

use thiserror::Error;

/// Errors raised while validating, segmenting or laying out chains
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown structure label '{label}' at chain {chain_id}, position {position}")]
    UnknownLabel {
        chain_id: String,
        position: usize,
        label: char,
    },

    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub fn invalid_parameter<S: Into<String>>(message: S) -> Self {
        Self::InvalidParameter(message.into())
    }

    pub fn geometry<S: Into<String>>(message: S) -> Self {
        Self::Geometry(message.into())
    }

    pub fn parse<S: Into<String>>(line: usize, message: S) -> Self {
        Self::Parse { line, message: message.into() }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
