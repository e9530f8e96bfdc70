//! Fixed-width page-rows
//!
//! Wraps a segmented chain into rows of `residues_per_line` columns. Each row
//! carries three aligned bands: run annotations, glyphs and residue names.

use serde::{Deserialize, Serialize};

use crate::label::GlyphKey;
use crate::segment::{RunTag, SegmentedChain};

/// Cell of the annotation band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnotationCell {
    /// Closing cell of a counted run
    Tagged { tag: RunTag, width: usize },
    /// Span without a label: uncounted run, or a run continuing on the next row
    Blank { width: usize },
    /// Filler after the last residue of a chain
    Padding,
}

impl AnnotationCell {
    pub fn width(&self) -> usize {
        match self {
            Self::Tagged { width, .. } | Self::Blank { width } => *width,
            Self::Padding => 1,
        }
    }

    pub fn text(&self) -> Option<String> {
        match self {
            Self::Tagged { tag, .. } => Some(tag.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlyphCell {
    Glyph(GlyphKey),
    Padding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResidueCell {
    Residue(char),
    Padding,
}

/// One horizontal slice of the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRow {
    pub annotations: Vec<AnnotationCell>,
    pub glyphs: Vec<GlyphCell>,
    pub residues: Vec<ResidueCell>,
    /// Position of the first residue in the row (1-based)
    pub first_position: usize,
    /// Position of the last real residue in the row
    pub last_position: usize,
}

impl PageRow {
    /// Columns spanned by the annotation band.
    pub fn annotation_width(&self) -> usize {
        self.annotations.iter().map(AnnotationCell::width).sum()
    }

    /// Number of padded columns at the end of the row.
    pub fn padding(&self) -> usize {
        self.glyphs.iter().filter(|c| matches!(c, GlyphCell::Padding)).count()
    }

    pub fn residue_count(&self) -> usize {
        self.last_position + 1 - self.first_position
    }
}

/// Number of page-rows a chain of `len` residues occupies.
pub fn page_row_count(len: usize, residues_per_line: usize) -> usize {
    len.div_ceil(residues_per_line)
}

/// Wrap a segmented chain into padded page-rows.
pub fn paginate(chain: &SegmentedChain) -> Vec<PageRow> {
    let width = chain.residues_per_line;
    let n = chain.len();
    let mut rows = Vec::with_capacity(page_row_count(n, width));
    let mut spans = chain.spans.iter().peekable();

    let mut annotations = Vec::new();
    let mut glyphs = Vec::with_capacity(width);
    let mut residues = Vec::with_capacity(width);
    let mut first_position = 1;

    for (i, (&glyph, &name)) in chain.glyphs.iter().zip(&chain.names).enumerate() {
        glyphs.push(GlyphCell::Glyph(glyph));
        residues.push(ResidueCell::Residue(name));

        if let Some(span) = spans.next_if(|s| s.end == i) {
            annotations.push(match span.tag {
                Some(tag) => AnnotationCell::Tagged { tag, width: span.width() },
                None => AnnotationCell::Blank { width: span.width() },
            });
        }

        if (i + 1) % width == 0 || i + 1 == n {
            let fill = width - glyphs.len();
            glyphs.extend(std::iter::repeat(GlyphCell::Padding).take(fill));
            residues.extend(std::iter::repeat(ResidueCell::Padding).take(fill));
            annotations.extend(std::iter::repeat(AnnotationCell::Padding).take(fill));

            rows.push(PageRow {
                annotations: std::mem::take(&mut annotations),
                glyphs: std::mem::replace(&mut glyphs, Vec::with_capacity(width)),
                residues: std::mem::replace(&mut residues, Vec::with_capacity(width)),
                first_position,
                last_position: i + 1,
            });
            first_position = i + 2;
        }
    }

    rows
}
