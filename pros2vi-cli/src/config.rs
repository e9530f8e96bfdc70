//! Configuration handling for the pros2vi CLI
//!
//! Supports loading configuration from pros2vi.toml files with CLI argument overrides.

use anyhow::{Context, Result};
use pros2vi_render::{MultiPagePolicy, Palette, ProcessBackend, Tool};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::CliError;

pub const DEFAULT_CONFIG_FILE: &str = "pros2vi.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub palette: Palette,
    #[serde(default)]
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Residues per page-row
    #[serde(default = "default_residues_per_line")]
    pub residues_per_line: usize,

    /// Output resolution; 100 renders directly, anything else goes through PDF
    #[serde(default = "default_dpi")]
    pub dpi: u32,

    /// Also write a PDF next to the image
    #[serde(default)]
    pub want_pdf: bool,

    /// What to do when the document spans several PDF pages
    #[serde(default)]
    pub multi_page: MultiPagePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Explicit wkhtmltoimage binary (default: search PATH)
    #[serde(default)]
    pub wkhtmltoimage: Option<PathBuf>,

    /// Explicit wkhtmltopdf binary (default: search PATH)
    #[serde(default)]
    pub wkhtmltopdf: Option<PathBuf>,

    /// Explicit pdftoppm binary (default: search PATH)
    #[serde(default)]
    pub pdftoppm: Option<PathBuf>,

    /// Kill a conversion tool after this many seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Default value functions
fn default_residues_per_line() -> usize { 50 }
fn default_dpi() -> u32 { 100 }
fn default_timeout_secs() -> u64 { 120 }

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            residues_per_line: default_residues_per_line(),
            dpi: default_dpi(),
            want_pdf: false,
            multi_page: MultiPagePolicy::default(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            wkhtmltoimage: None,
            wkhtmltopdf: None,
            pdftoppm: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    pub fn to_backend(&self) -> ProcessBackend {
        ProcessBackend::new()
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_tool_path(Tool::WkHtmlToImage, self.wkhtmltoimage.clone())
            .with_tool_path(Tool::WkHtmlToPdf, self.wkhtmltopdf.clone())
            .with_tool_path(Tool::PdfToPpm, self.pdftoppm.clone())
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                // Try to find pros2vi.toml in current directory
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    log::info!("Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                    Self::load_from_file(&default_path)?
                } else {
                    log::info!("Using default configuration");
                    Self::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .map_err(CliError::from)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Reject values no render could use
    pub fn validate(&self) -> Result<(), CliError> {
        if self.render.residues_per_line == 0 {
            return Err(CliError::config("render.residues_per_line must be at least 1"));
        }
        if self.render.dpi == 0 {
            return Err(CliError::config("render.dpi must be at least 1"));
        }
        if self.backend.timeout_secs == 0 {
            return Err(CliError::config("backend.timeout_secs must be at least 1"));
        }
        self.palette
            .validate()
            .map_err(|e| CliError::config(format!("palette: {}", e)))
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Generate example configuration file content
    pub fn example_toml() -> Result<String> {
        let config = Self::default();
        toml::to_string_pretty(&config).context("Failed to serialize default configuration")
    }
}
