//! Typed document model
//!
//! [`DocumentBuilder`] turns a validated structure into per-chain blocks of
//! page-rows plus a legend. Serialization to markup lives in [`crate::html`].

use std::collections::BTreeMap;

use pros2vi_core::{
    paginate, CanvasGeometry, GlyphKey, OrdinalCounter, PageRow, Segmenter, Structure,
    StructureLabel,
};

use crate::error::ExportResult;
use crate::metadata::EntryMetadata;
use crate::style::Palette;

/// Header text of the document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMeta {
    pub title: String,
    pub subtitle: Option<String>,
    pub scientific_name: Option<String>,
}

impl DocumentMeta {
    pub fn new<S: Into<String>>(title: S) -> Self {
        Self { title: title.into(), ..Self::default() }
    }

    pub fn with_subtitle(mut self, subtitle: Option<String>) -> Self {
        self.subtitle = subtitle;
        self
    }

    pub fn with_scientific_name(mut self, scientific_name: Option<String>) -> Self {
        self.scientific_name = scientific_name;
        self
    }

    /// Fill fields the caller left empty from looked-up metadata.
    pub fn backfill(&mut self, entry: &EntryMetadata) {
        if self.subtitle.is_none() {
            self.subtitle = entry.title.clone();
        }
        if self.scientific_name.is_none() {
            self.scientific_name = entry.scientific_name.clone();
        }
    }
}

/// One chain: heading, optional accession and its page-rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainBlock {
    pub chain_id: String,
    pub accession: Option<String>,
    pub rows: Vec<PageRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub label: StructureLabel,
    pub glyph: GlyphKey,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub meta: DocumentMeta,
    pub residues_per_line: usize,
    pub chains: Vec<ChainBlock>,
    pub legend: Vec<LegendEntry>,
    pub palette: Palette,
    pub geometry: CanvasGeometry,
}

impl Document {
    pub fn row_count(&self) -> usize {
        self.chains.iter().map(|c| c.rows.len()).sum()
    }
}

pub struct DocumentBuilder<'a> {
    palette: &'a Palette,
    segmenter: Segmenter,
    meta: DocumentMeta,
    accessions: BTreeMap<String, String>,
}

impl<'a> DocumentBuilder<'a> {
    pub fn new(palette: &'a Palette, residues_per_line: usize, meta: DocumentMeta) -> ExportResult<Self> {
        Ok(Self {
            palette,
            segmenter: Segmenter::new(residues_per_line)?,
            meta,
            accessions: BTreeMap::new(),
        })
    }

    /// Per-chain accession lines; chains without an entry get none.
    pub fn with_accessions(mut self, accessions: BTreeMap<String, String>) -> Self {
        self.accessions = accessions;
        self
    }

    pub fn build(self, structure: &Structure) -> ExportResult<Document> {
        let residues_per_line = self.segmenter.residues_per_line();
        let geometry = CanvasGeometry::compute(residues_per_line, &structure.chain_lengths())?;

        let chains: Vec<ChainBlock> = structure
            .chains
            .iter()
            .map(|chain| {
                // Ordinals restart on every chain
                let segmented = self.segmenter.segment_with(chain, &mut OrdinalCounter::new());
                ChainBlock {
                    chain_id: chain.id.clone(),
                    accession: self.accessions.get(&chain.id).cloned(),
                    rows: paginate(&segmented),
                }
            })
            .collect();

        let legend = StructureLabel::ALL
            .into_iter()
            .map(|label| {
                let glyph = label.legend_glyph();
                LegendEntry { label, glyph, color: self.palette.color(glyph).to_string() }
            })
            .collect();

        let document = Document {
            meta: self.meta,
            residues_per_line,
            chains,
            legend,
            palette: self.palette.clone(),
            geometry,
        };
        log::info!(
            "Assembled document: {} chains, {} page-rows, canvas {}x{}",
            document.chains.len(),
            document.row_count(),
            geometry.width,
            geometry.height
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pros2vi_core::{AnnotationCell, Chain};

    fn structure() -> Structure {
        Structure::new(vec![
            Chain::from_codes("A", "MKLVIG", "HHHEE-").unwrap(),
            Chain::from_codes("B", "MKL", "HH-").unwrap(),
        ])
    }

    #[test]
    fn builds_one_block_per_chain() {
        let palette = Palette::default();
        let mut accessions = BTreeMap::new();
        accessions.insert("B".to_string(), "P69905".to_string());

        let doc = DocumentBuilder::new(&palette, 3, DocumentMeta::new("1abc"))
            .unwrap()
            .with_accessions(accessions)
            .build(&structure())
            .unwrap();

        assert_eq!(doc.chains.len(), 2);
        assert_eq!(doc.chains[0].accession, None);
        assert_eq!(doc.chains[1].accession.as_deref(), Some("P69905"));
        assert_eq!(doc.row_count(), 3);
        assert_eq!(doc.geometry, CanvasGeometry::compute(3, &[6, 3]).unwrap());
    }

    #[test]
    fn ordinals_restart_per_chain() {
        let palette = Palette::default();
        let doc = DocumentBuilder::new(&palette, 50, DocumentMeta::new("x"))
            .unwrap()
            .build(&structure())
            .unwrap();
        let first_tag = |block: &ChainBlock| block.rows[0].annotations.first().and_then(AnnotationCell::text);
        assert_eq!(first_tag(&doc.chains[0]).as_deref(), Some("H1"));
        assert_eq!(first_tag(&doc.chains[1]).as_deref(), Some("H1"));
    }

    #[test]
    fn legend_lists_every_label_with_palette_colour() {
        let palette = Palette::default().with_color(GlyphKey::StrandEnd, "#00ff00").unwrap();
        let doc = DocumentBuilder::new(&palette, 10, DocumentMeta::new("x"))
            .unwrap()
            .build(&Structure::default())
            .unwrap();
        assert_eq!(doc.legend.len(), StructureLabel::ALL.len());
        let strand = doc.legend.iter().find(|e| e.label == StructureLabel::Strand).unwrap();
        assert_eq!(strand.glyph, GlyphKey::StrandEnd);
        assert_eq!(strand.color, "#00ff00");
    }

    #[test]
    fn backfill_keeps_caller_values() {
        let entry = EntryMetadata {
            title: Some("Looked up".into()),
            scientific_name: Some("Homo sapiens".into()),
            ..EntryMetadata::default()
        };
        let mut meta = DocumentMeta::new("1abc").with_subtitle(Some("Given".into()));
        meta.backfill(&entry);
        assert_eq!(meta.subtitle.as_deref(), Some("Given"));
        assert_eq!(meta.scientific_name.as_deref(), Some("Homo sapiens"));
    }

    #[test]
    fn zero_residues_per_line_is_rejected() {
        assert!(DocumentBuilder::new(&Palette::default(), 0, DocumentMeta::new("x")).is_err());
    }
}
