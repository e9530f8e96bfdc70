//! Error handling for the pros2vi CLI

use pros2vi_core::CoreError;
use pros2vi_render::{BackendError, ErrorKind, ExportError};
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pros2vi CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Input/Output error: {message}")]
    Io { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Parsing error in {file}: {message}")]
    Parse { file: String, message: String },

    #[error("Rendering error: {message}")]
    Rendering { message: String },

    #[error("External tool error: {tool} - {message}")]
    ExternalTool { tool: String, message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io { message: message.into() }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn invalid_format<S: Into<String>>(message: S) -> Self {
        Self::InvalidFormat { message: message.into() }
    }

    pub fn parse<S: Into<String>>(file: S, message: S) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn rendering<S: Into<String>>(message: S) -> Self {
        Self::Rendering { message: message.into() }
    }

    pub fn external_tool<S: Into<String>>(tool: S, message: S) -> Self {
        Self::ExternalTool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into() }
    }

    /// Wrap a reader failure for `file`.
    pub fn from_read(file: &std::path::Path, err: CoreError) -> Self {
        let file = file.display().to_string();
        match err {
            CoreError::Parse { line, message } => {
                Self::parse(file, format!("line {}: {}", line, message))
            }
            CoreError::Io(io) => Self::io(format!("{}: {}", file, io)),
            other => Self::invalid_format(other.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("TOML parsing error: {}", err))
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(err: toml::ser::Error) -> Self {
        Self::config(format!("TOML serialization error: {}", err))
    }
}

impl From<ExportError> for CliError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Backend(BackendError::Unavailable { tool, reason }) => {
                Self::external_tool(tool, reason)
            }
            ExportError::Backend(BackendError::Failed { tool, status, stderr }) => {
                Self::external_tool(tool, format!("exited with {}: {}", status, stderr))
            }
            ExportError::Backend(BackendError::Timeout { tool, timeout }) => {
                Self::external_tool(tool, format!("timed out after {}s", timeout.as_secs()))
            }
            other => match other.kind() {
                ErrorKind::Input => Self::validation(other.to_string()),
                ErrorKind::Data => Self::invalid_format(other.to_string()),
                ErrorKind::Io => Self::io(other.to_string()),
                ErrorKind::Geometry | ErrorKind::Backend => Self::rendering(other.to_string()),
            },
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    // Add helpful suggestions based on error type
    match error {
        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the file path is correct: {}\n\
                 • Ensure you have read permissions for the file",
                path.display()
            ));
        }

        CliError::InvalidFormat { .. } | CliError::Parse { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Use a .dssp file from mkdssp, or a table of 'chain position residue label' lines\n\
                 • Valid labels are H B E G I P T S and - (space counts as -)\n\
                 • Ensure the file is not corrupted or truncated"
            );
        }

        CliError::ExternalTool { tool, .. } => {
            match tool.as_str() {
                "wkhtmltoimage" | "wkhtmltopdf" => {
                    message.push_str(
                        "\n\nSuggestions:\n\
                         • Install wkhtmltopdf (ships both wkhtmltoimage and wkhtmltopdf): https://wkhtmltopdf.org\n\
                         • Ensure the binaries are in your PATH, or set them under [backend] in pros2vi.toml\n\
                         • Raise backend.timeout_secs for very long chains"
                    );
                }
                "pdftoppm" => {
                    message.push_str(
                        "\n\nSuggestions:\n\
                         • Install poppler-utils, which provides pdftoppm\n\
                         • Ensure pdftoppm is in your PATH, or set backend.pdftoppm in pros2vi.toml\n\
                         • Render at the default --dpi 100 to skip the PDF step"
                    );
                }
                _ => {
                    message.push_str(&format!(
                        "\n\nSuggestions:\n\
                         • Install {}\n\
                         • Ensure {} is in your PATH\n\
                         • Check that you have the required permissions",
                        tool, tool
                    ));
                }
            }
        }

        CliError::Config { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your pros2vi.toml configuration file\n\
                 • Use 'pros2vi config --example' to generate a sample configuration\n\
                 • Colours must be #rgb, #rrggbb or a plain colour name"
            );
        }

        CliError::Validation { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Output files must end in .png, .jpg or .jpeg\n\
                 • --dpi and --residues-per-line must be positive\n\
                 • Colour overrides look like --color helix=#00ff00"
            );
        }

        _ => {}
    }

    message
}

/// Print error with helpful suggestions and exit
pub fn print_error_and_exit(error: &CliError) -> ! {
    eprintln!("Error: {}", format_error_with_suggestions(error));
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_error_creation() {
        let err = CliError::config("test message");
        assert!(matches!(err, CliError::Config { .. }));
        assert_eq!(err.to_string(), "Configuration error: test message");
    }

    #[test]
    fn test_error_suggestions() {
        let err = CliError::file_not_found(PathBuf::from("1abc.dssp"));
        let formatted = format_error_with_suggestions(&err);
        assert!(formatted.contains("Suggestions:"));
        assert!(formatted.contains("Check that the file path is correct"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err: CliError = io_err.into();
        assert!(matches!(cli_err, CliError::Io { .. }));
    }

    #[test]
    fn test_missing_tool_suggests_install() {
        let err: CliError = ExportError::from(BackendError::unavailable("pdftoppm", "not found in PATH")).into();
        assert!(matches!(&err, CliError::ExternalTool { tool, .. } if tool == "pdftoppm"));
        assert!(format_error_with_suggestions(&err).contains("poppler-utils"));

        let err: CliError = ExportError::from(BackendError::Timeout {
            tool: "wkhtmltopdf".into(),
            timeout: Duration::from_secs(5),
        })
        .into();
        assert!(err.to_string().contains("timed out after 5s"));
        assert!(format_error_with_suggestions(&err).contains("wkhtmltopdf.org"));
    }

    #[test]
    fn test_export_error_categories() {
        let err: CliError = ExportError::UnsupportedExtension("bmp".into()).into();
        assert!(matches!(err, CliError::Validation { .. }));

        let err: CliError = ExportError::from(CoreError::UnknownLabel {
            chain_id: "A".into(),
            position: 3,
            label: 'X',
        })
        .into();
        assert!(matches!(err, CliError::InvalidFormat { .. }));
    }

    #[test]
    fn test_read_errors_name_the_file() {
        let err = CliError::from_read(std::path::Path::new("1abc.dssp"), CoreError::parse(12, "bad column"));
        assert_eq!(err.to_string(), "Parsing error in 1abc.dssp: line 12: bad column");
    }
}
