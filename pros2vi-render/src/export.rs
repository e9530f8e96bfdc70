//! Image and PDF export
//!
//! Drives a [`ConversionBackend`] through one of two paths, chosen by DPI:
//!
//! - **DirectRaster** at the 100 dpi baseline: markup is rendered straight to
//!   the target image.
//! - **VectorThenRasterize** otherwise: markup becomes a PDF sized to the
//!   canvas geometry, and each PDF page is rasterized at the requested DPI.
//!
//! A stand-alone PDF can be written alongside either path.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use pros2vi_core::CanvasGeometry;
use serde::{Deserialize, Serialize};

use crate::backend::{ConversionBackend, RasterFormat};
use crate::error::{BackendError, ExportError, ExportResult};

pub const BASELINE_DPI: u32 = 100;
pub const DIRECT_RASTER_QUALITY: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStrategy {
    DirectRaster,
    VectorThenRasterize,
}

impl ExportStrategy {
    pub fn for_dpi(dpi: u32) -> Self {
        if dpi == BASELINE_DPI {
            Self::DirectRaster
        } else {
            Self::VectorThenRasterize
        }
    }
}

/// What to do when the PDF rasterizes to more than one page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiPagePolicy {
    /// Every page is written to the output path; the last page wins
    #[default]
    Overwrite,
    /// Pages go to `stem-1.ext`, `stem-2.ext`, ...
    Numbered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    Idle,
    Rendering,
    Rasterized,
    PaginatedRasterized,
    Done,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub output: PathBuf,
    pub dpi: u32,
    pub want_pdf: bool,
    /// Defaults to the output path with a `.pdf` extension
    pub pdf_output: Option<PathBuf>,
    pub multi_page: MultiPagePolicy,
}

impl ExportRequest {
    pub fn new<P: AsRef<Path>>(output: P) -> Self {
        Self {
            output: output.as_ref().to_path_buf(),
            dpi: BASELINE_DPI,
            want_pdf: false,
            pdf_output: None,
            multi_page: MultiPagePolicy::default(),
        }
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_pdf(mut self, want_pdf: bool) -> Self {
        self.want_pdf = want_pdf;
        self
    }

    pub fn with_pdf_output(mut self, path: Option<PathBuf>) -> Self {
        self.pdf_output = path;
        self
    }

    pub fn with_multi_page(mut self, policy: MultiPagePolicy) -> Self {
        self.multi_page = policy;
        self
    }

    /// Check the request without touching the filesystem.
    pub fn validate(&self) -> ExportResult<RasterFormat> {
        if self.dpi == 0 {
            return Err(ExportError::invalid_parameter("dpi must be at least 1"));
        }
        let ext = self
            .output
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        RasterFormat::from_extension(ext).ok_or_else(|| ExportError::UnsupportedExtension(ext.to_string()))
    }

    pub fn pdf_path(&self) -> PathBuf {
        self.pdf_output
            .clone()
            .unwrap_or_else(|| self.output.with_extension("pdf"))
    }

    pub fn strategy(&self) -> ExportStrategy {
        ExportStrategy::for_dpi(self.dpi)
    }
}

/// Output of a finished export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub strategy: ExportStrategy,
    pub geometry: CanvasGeometry,
    /// Pages produced by the backend; 1 for direct raster
    pub pages: usize,
    /// Raster files written, in page order
    pub images: Vec<PathBuf>,
    pub pdf: Option<PathBuf>,
}

/// Path of page `index` (1-based) under the numbered policy.
pub fn numbered_path(output: &Path, index: usize) -> PathBuf {
    let stem = output.file_stem().and_then(|s| s.to_str()).unwrap_or("page");
    let name = match output.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}-{index}.{ext}"),
        None => format!("{stem}-{index}"),
    };
    output.with_file_name(name)
}

pub struct Exporter<'a, B: ConversionBackend + ?Sized> {
    backend: &'a B,
    state: ExportState,
}

impl<'a, B: ConversionBackend + ?Sized> Exporter<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend, state: ExportState::Idle }
    }

    pub fn state(&self) -> ExportState {
        self.state
    }

    fn transition(&mut self, next: ExportState) {
        log::debug!("Export state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Export rendered markup according to `request`.
    ///
    /// On failure every file this call created is removed again.
    pub fn export(
        &mut self,
        html: &str,
        geometry: &CanvasGeometry,
        request: &ExportRequest,
    ) -> ExportResult<ExportReport> {
        self.state = ExportState::Idle;
        let mut fresh = Vec::new();
        let result = self.run(html, geometry, request, &mut fresh);

        match result {
            Ok(report) => {
                self.transition(ExportState::Done);
                Ok(report)
            }
            Err(err) => {
                self.transition(ExportState::Failed);
                for path in fresh.iter().filter(|p| p.exists()) {
                    log::debug!("Removing partial output {}", path.display());
                    if let Err(e) = std::fs::remove_file(path) {
                        log::warn!("Could not remove {}: {}", path.display(), e);
                    }
                }
                Err(err)
            }
        }
    }

    fn run(
        &mut self,
        html: &str,
        geometry: &CanvasGeometry,
        request: &ExportRequest,
        fresh: &mut Vec<PathBuf>,
    ) -> ExportResult<ExportReport> {
        let format = request.validate()?;
        geometry
            .ensure_drawable()
            .map_err(|e| ExportError::Geometry(e.to_string()))?;

        let strategy = request.strategy();
        log::info!(
            "Exporting {} ({}x{} px, {} dpi, {:?})",
            request.output.display(),
            geometry.width,
            geometry.height,
            request.dpi,
            strategy
        );
        self.transition(ExportState::Rendering);

        let mut pdf_bytes = None;
        let (pages, images) = match strategy {
            ExportStrategy::DirectRaster => {
                track_fresh(fresh, &request.output);
                self.backend
                    .html_to_image(html, &request.output, format, DIRECT_RASTER_QUALITY)?;
                self.transition(ExportState::Rasterized);
                (1, vec![request.output.clone()])
            }
            ExportStrategy::VectorThenRasterize => {
                let pdf = self.backend.html_to_pdf(html, geometry)?;
                let pages = self.backend.pdf_to_images(&pdf, request.dpi)?;
                if pages.is_empty() {
                    return Err(BackendError::Image("PDF rasterized to zero pages".to_string()).into());
                }
                let images = save_pages(&pages, request, format, fresh)?;
                pdf_bytes = Some(pdf);
                self.transition(ExportState::PaginatedRasterized);
                (pages.len(), images)
            }
        };

        let pdf = if request.want_pdf {
            let path = request.pdf_path();
            let bytes = match pdf_bytes {
                Some(bytes) => bytes,
                None => self.backend.html_to_pdf(html, geometry)?,
            };
            track_fresh(fresh, &path);
            std::fs::write(&path, bytes)?;
            log::info!("Wrote {}", path.display());
            Some(path)
        } else {
            None
        };

        Ok(ExportReport {
            strategy,
            geometry: *geometry,
            pages,
            images,
            pdf,
        })
    }
}

fn track_fresh(fresh: &mut Vec<PathBuf>, path: &Path) {
    if !path.exists() && !fresh.iter().any(|p| p == path) {
        fresh.push(path.to_path_buf());
    }
}

fn save_pages(
    pages: &[DynamicImage],
    request: &ExportRequest,
    format: RasterFormat,
    fresh: &mut Vec<PathBuf>,
) -> ExportResult<Vec<PathBuf>> {
    let numbered = request.multi_page == MultiPagePolicy::Numbered && pages.len() > 1;
    if pages.len() > 1 && !numbered {
        log::warn!(
            "{} pages rendered; each overwrites {} and only the last remains",
            pages.len(),
            request.output.display()
        );
    }

    let mut written = Vec::new();
    for (index, page) in pages.iter().enumerate() {
        let path = if numbered {
            numbered_path(&request.output, index + 1)
        } else {
            request.output.clone()
        };
        track_fresh(fresh, &path);
        save_page(page, &path, format)?;
        log::info!("Wrote {}", path.display());
        if !written.contains(&path) {
            written.push(path);
        }
    }
    Ok(written)
}

fn save_page(page: &DynamicImage, path: &Path, format: RasterFormat) -> ExportResult<()> {
    let result = match format {
        // JPEG has no alpha channel
        RasterFormat::Jpeg => DynamicImage::ImageRgb8(page.to_rgb8()).save_with_format(path, format.image_format()),
        RasterFormat::Png => page.save_with_format(path, format.image_format()),
    };
    result.map_err(|e| BackendError::image(e).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_dpi_selects_direct_raster() {
        assert_eq!(ExportStrategy::for_dpi(100), ExportStrategy::DirectRaster);
        assert_eq!(ExportStrategy::for_dpi(300), ExportStrategy::VectorThenRasterize);
        assert_eq!(ExportStrategy::for_dpi(99), ExportStrategy::VectorThenRasterize);
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert_eq!(ExportRequest::new("out.PNG").validate().unwrap(), RasterFormat::Png);
        assert_eq!(ExportRequest::new("out.JPEG").validate().unwrap(), RasterFormat::Jpeg);
        assert!(matches!(
            ExportRequest::new("out.bmp").validate(),
            Err(ExportError::UnsupportedExtension(ext)) if ext == "bmp"
        ));
        assert!(ExportRequest::new("out").validate().is_err());
        assert!(ExportRequest::new("out.png").with_dpi(0).validate().is_err());
    }

    #[test]
    fn pdf_path_defaults_next_to_output() {
        let request = ExportRequest::new("maps/1abc.png");
        assert_eq!(request.pdf_path(), PathBuf::from("maps/1abc.pdf"));
        let request = request.with_pdf_output(Some(PathBuf::from("other.pdf")));
        assert_eq!(request.pdf_path(), PathBuf::from("other.pdf"));
    }

    #[test]
    fn numbered_paths_keep_the_extension() {
        assert_eq!(numbered_path(Path::new("dir/map.jpg"), 2), PathBuf::from("dir/map-2.jpg"));
        assert_eq!(numbered_path(Path::new("map"), 1), PathBuf::from("map-1"));
    }
}
