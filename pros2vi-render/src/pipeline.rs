//! End-to-end render pipeline
//!
//! Assignment records in, image (and optional PDF) out:
//! validate → segment/paginate → assemble → serialize → export.

use std::collections::BTreeMap;

use pros2vi_core::{AssignedResidue, CanvasGeometry, Structure};

use crate::backend::ConversionBackend;
use crate::document::{DocumentBuilder, DocumentMeta};
use crate::error::ExportResult;
use crate::export::{ExportReport, ExportRequest, Exporter};
use crate::glyph::GlyphRasterizer;
use crate::html::HtmlWriter;
use crate::metadata::{EntryMetadata, MetadataSource};
use crate::style::Palette;

pub const DEFAULT_RESIDUES_PER_LINE: usize = 50;

/// Everything one render needs besides the structure itself
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub meta: DocumentMeta,
    pub residues_per_line: usize,
    pub palette: Palette,
    pub accessions: BTreeMap<String, String>,
    pub request: ExportRequest,
}

impl RenderJob {
    pub fn new(meta: DocumentMeta, request: ExportRequest) -> Self {
        Self {
            meta,
            residues_per_line: DEFAULT_RESIDUES_PER_LINE,
            palette: Palette::default(),
            accessions: BTreeMap::new(),
            request,
        }
    }

    pub fn with_residues_per_line(mut self, residues_per_line: usize) -> Self {
        self.residues_per_line = residues_per_line;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Backfill header fields and take chain accessions from `entry`.
    pub fn with_metadata(mut self, entry: &EntryMetadata) -> Self {
        self.meta.backfill(entry);
        self.accessions = entry.chain_accessions.clone();
        self
    }

    /// Look the job's title up in `source` and apply the result.
    pub fn enrich(self, source: &dyn MetadataSource) -> Self {
        let entry = source.lookup(&self.meta.title);
        if !entry.is_empty() {
            log::info!("Using metadata for {}", self.meta.title);
        }
        self.with_metadata(&entry)
    }
}

/// Build the HTML page for `structure`, returning it with its canvas.
pub fn assemble_html(structure: &Structure, job: &RenderJob) -> ExportResult<(String, CanvasGeometry)> {
    job.palette.validate()?;
    let document = DocumentBuilder::new(&job.palette, job.residues_per_line, job.meta.clone())?
        .with_accessions(job.accessions.clone())
        .build(structure)?;

    let mut rasterizer = GlyphRasterizer::new();
    let html = HtmlWriter::new(&mut rasterizer).write(&document)?;
    log::debug!(
        "Serialized {} bytes of HTML with {} distinct glyphs",
        html.len(),
        rasterizer.rasterized()
    );
    Ok((html, document.geometry))
}

/// Validate, lay out and export raw assignment records.
pub fn render_assignments<B: ConversionBackend + ?Sized>(
    records: Vec<AssignedResidue>,
    job: &RenderJob,
    backend: &B,
) -> ExportResult<ExportReport> {
    // Fail on a bad request before doing any work
    job.request.validate()?;

    let structure = Structure::from_assignments(records)?;
    log::info!(
        "Rendering {} chains ({} residues) at {} residues per line",
        structure.chains.len(),
        structure.residue_count(),
        job.residues_per_line
    );

    let (html, geometry) = assemble_html(&structure, job)?;
    Exporter::new(backend).export(&html, &geometry, &job.request)
}
