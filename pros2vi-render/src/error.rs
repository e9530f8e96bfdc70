//! Error types for document rendering and export

use std::time::Duration;

use pros2vi_core::CoreError;
use thiserror::Error;

/// Failure of an external conversion tool
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Conversion tool '{tool}' is not available: {reason}")]
    Unavailable { tool: String, reason: String },

    #[error("Conversion tool '{tool}' failed ({status}): {stderr}")]
    Failed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("Conversion tool '{tool}' timed out after {}s", .timeout.as_secs())]
    Timeout { tool: String, timeout: Duration },

    #[error("Image error: {0}")]
    Image(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BackendError {
    pub fn unavailable<S: Into<String>, R: ToString>(tool: S, reason: R) -> Self {
        Self::Unavailable { tool: tool.into(), reason: reason.to_string() }
    }

    pub fn image<E: ToString>(err: E) -> Self {
        Self::Image(err.to_string())
    }
}

/// Broad category of an export failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad caller input: extension, parameter range
    Input,
    /// Structure data outside the label alphabet
    Data,
    Geometry,
    Backend,
    Io,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported output extension '{0}': expected png, jpg or jpeg")]
    UnsupportedExtension(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Glyph rendering failed for {glyph}: {message}")]
    Glyph { glyph: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    pub fn invalid_parameter<S: Into<String>>(message: S) -> Self {
        Self::InvalidParameter(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedExtension(_) | Self::InvalidParameter(_) => ErrorKind::Input,
            Self::Core(err) => match err {
                CoreError::InvalidParameter(_) => ErrorKind::Input,
                CoreError::UnknownLabel { .. } | CoreError::Parse { .. } => ErrorKind::Data,
                CoreError::Geometry(_) => ErrorKind::Geometry,
                CoreError::Io(_) => ErrorKind::Io,
            },
            Self::Geometry(_) => ErrorKind::Geometry,
            Self::Backend(_) | Self::Glyph { .. } => ErrorKind::Backend,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

pub type ExportResult<T> = Result<T, ExportError>;
