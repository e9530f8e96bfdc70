//! Markup conversion backends
//!
//! The exporter only talks to [`ConversionBackend`]. [`ProcessBackend`] runs
//! the wkhtmltopdf family and poppler's `pdftoppm` as child processes, each
//! bounded by a timeout.

use std::ffi::OsString;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use image::DynamicImage;
use pros2vi_core::CanvasGeometry;
use wait_timeout::ChildExt;

use crate::error::BackendError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
const MAX_STDERR: usize = 2000;

/// Raster encoding of an output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Png,
    Jpeg,
}

impl RasterFormat {
    /// Parse a file extension, case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    pub fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

pub trait ConversionBackend {
    /// Render markup straight to a raster file.
    fn html_to_image(
        &self,
        html: &str,
        output: &Path,
        format: RasterFormat,
        quality: u8,
    ) -> Result<(), BackendError>;

    /// Render markup to PDF bytes with the page sized to `geometry`.
    fn html_to_pdf(&self, html: &str, geometry: &CanvasGeometry) -> Result<Vec<u8>, BackendError>;

    /// Rasterize every page of a PDF at `dpi`.
    fn pdf_to_images(&self, pdf: &[u8], dpi: u32) -> Result<Vec<DynamicImage>, BackendError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    WkHtmlToImage,
    WkHtmlToPdf,
    PdfToPpm,
}

impl Tool {
    pub fn program(self) -> &'static str {
        match self {
            Self::WkHtmlToImage => "wkhtmltoimage",
            Self::WkHtmlToPdf => "wkhtmltopdf",
            Self::PdfToPpm => "pdftoppm",
        }
    }
}

/// Backend driving the external command-line converters
#[derive(Debug, Clone)]
pub struct ProcessBackend {
    wkhtmltoimage: Option<PathBuf>,
    wkhtmltopdf: Option<PathBuf>,
    pdftoppm: Option<PathBuf>,
    timeout: Duration,
}

impl Default for ProcessBackend {
    fn default() -> Self {
        Self {
            wkhtmltoimage: None,
            wkhtmltopdf: None,
            pdftoppm: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ProcessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use an explicit binary instead of searching `PATH`.
    pub fn with_tool_path(mut self, tool: Tool, path: Option<PathBuf>) -> Self {
        match tool {
            Tool::WkHtmlToImage => self.wkhtmltoimage = path,
            Tool::WkHtmlToPdf => self.wkhtmltopdf = path,
            Tool::PdfToPpm => self.pdftoppm = path,
        }
        self
    }

    /// Locate a tool: configured path first, then `PATH`.
    pub fn resolve(&self, tool: Tool) -> Result<PathBuf, BackendError> {
        let configured = match tool {
            Tool::WkHtmlToImage => &self.wkhtmltoimage,
            Tool::WkHtmlToPdf => &self.wkhtmltopdf,
            Tool::PdfToPpm => &self.pdftoppm,
        };
        match configured {
            Some(path) if path.is_file() => Ok(path.clone()),
            Some(path) => Err(BackendError::unavailable(
                tool.program(),
                format!("configured path {} does not exist", path.display()),
            )),
            None => which::which(tool.program()).map_err(|e| BackendError::unavailable(tool.program(), e)),
        }
    }

    /// Run a tool to completion, killing it once the timeout expires.
    fn run(&self, tool: Tool, args: &[OsString]) -> Result<(), BackendError> {
        let program = self.resolve(tool)?;
        log::debug!("Running {} {:?}", program.display(), args);

        // stderr goes to a file so a chatty tool cannot fill a pipe and stall
        let mut stderr_file = tempfile::tempfile()?;
        let mut child = Command::new(&program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(stderr_file.try_clone()?))
            .spawn()
            .map_err(|e| BackendError::unavailable(tool.program(), e))?;

        let started = Instant::now();
        let status = match child.wait_timeout(self.timeout)? {
            Some(status) => status,
            None => {
                log::warn!("{} exceeded {}s, killing it", tool.program(), self.timeout.as_secs());
                let _ = child.kill();
                let _ = child.wait();
                return Err(BackendError::Timeout {
                    tool: tool.program().to_string(),
                    timeout: self.timeout,
                });
            }
        };
        log::debug!("{} finished in {:.2}s", tool.program(), started.elapsed().as_secs_f64());

        if !status.success() {
            return Err(BackendError::Failed {
                tool: tool.program().to_string(),
                status: status.to_string(),
                stderr: read_tail(&mut stderr_file),
            });
        }
        Ok(())
    }
}

fn read_tail(file: &mut File) -> String {
    let mut text = String::new();
    if file.seek(SeekFrom::Start(0)).is_ok() {
        let _ = file.read_to_string(&mut text);
    }
    let text = text.trim();
    match text.char_indices().rev().nth(MAX_STDERR) {
        Some((cut, _)) => format!("...{}", &text[cut..]),
        None => text.to_string(),
    }
}

fn html_input(html: &str) -> Result<tempfile::NamedTempFile, BackendError> {
    let mut file = tempfile::Builder::new().prefix("pros2vi-").suffix(".html").tempfile()?;
    file.write_all(html.as_bytes())?;
    file.flush()?;
    Ok(file)
}

/// Page layout flags shared by every PDF render
pub fn pdf_page_args(geometry: &CanvasGeometry) -> Vec<OsString> {
    [
        "--quiet".to_string(),
        "--page-width".to_string(),
        format!("{}px", geometry.width),
        "--page-height".to_string(),
        format!("{}px", geometry.height),
        "--margin-top".to_string(),
        "0".to_string(),
        "--margin-bottom".to_string(),
        "0".to_string(),
        "--margin-left".to_string(),
        "0".to_string(),
        "--margin-right".to_string(),
        "0".to_string(),
        "--print-media-type".to_string(),
        "--disable-smart-shrinking".to_string(),
        "--enable-local-file-access".to_string(),
    ]
    .into_iter()
    .map(OsString::from)
    .collect()
}

impl ConversionBackend for ProcessBackend {
    fn html_to_image(
        &self,
        html: &str,
        output: &Path,
        format: RasterFormat,
        quality: u8,
    ) -> Result<(), BackendError> {
        let input = html_input(html)?;
        let args: Vec<OsString> = vec![
            "--quiet".into(),
            "--enable-local-file-access".into(),
            "--quality".into(),
            quality.to_string().into(),
            "--format".into(),
            format.extension().into(),
            input.path().into(),
            output.into(),
        ];
        self.run(Tool::WkHtmlToImage, &args)
    }

    fn html_to_pdf(&self, html: &str, geometry: &CanvasGeometry) -> Result<Vec<u8>, BackendError> {
        let input = html_input(html)?;
        let output = tempfile::Builder::new().prefix("pros2vi-").suffix(".pdf").tempfile()?;

        let mut args = pdf_page_args(geometry);
        args.push(input.path().into());
        args.push(output.path().into());
        self.run(Tool::WkHtmlToPdf, &args)?;

        Ok(std::fs::read(output.path())?)
    }

    fn pdf_to_images(&self, pdf: &[u8], dpi: u32) -> Result<Vec<DynamicImage>, BackendError> {
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join("document.pdf");
        std::fs::write(&input, pdf)?;
        let prefix = workdir.path().join("page");

        let args: Vec<OsString> = vec![
            "-r".into(),
            dpi.to_string().into(),
            "-png".into(),
            input.into(),
            prefix.into(),
        ];
        self.run(Tool::PdfToPpm, &args)?;

        // pdftoppm names pages page-1.png or page-01.png depending on the page count
        let mut pages: Vec<PathBuf> = std::fs::read_dir(workdir.path())?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
                name.starts_with("page-") && name.ends_with(".png")
            })
            .collect();
        pages.sort();
        log::debug!("pdftoppm produced {} pages at {} dpi", pages.len(), dpi);

        pages
            .iter()
            .map(|page| image::open(page).map_err(BackendError::image))
            .collect()
    }
}
