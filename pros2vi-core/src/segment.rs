//! Run-length segmentation of a chain
//!
//! Splits a chain into maximal runs of one structure label, picks the glyph
//! variant of every residue and emits the annotation spans of the table.
//! Annotation spans additionally break at every page wrap, so a run that
//! straddles two page-rows yields one span per row while still counting as a
//! single run.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::label::{GlyphKey, StructureLabel};
use crate::types::Chain;

/// Numbered run tag shown in the annotation band, e.g. `H2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTag {
    pub label: StructureLabel,
    pub ordinal: u32,
}

impl fmt::Display for RunTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.label.code(), self.ordinal)
    }
}

/// A contiguous block of columns in the annotation band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationSpan {
    /// First residue index covered (0-based)
    pub start: usize,
    /// Last residue index covered, inclusive
    pub end: usize,
    /// Set only where a counted run closes
    pub tag: Option<RunTag>,
}

impl AnnotationSpan {
    pub fn width(&self) -> usize {
        self.end + 1 - self.start
    }
}

/// Maximal stretch of one label within a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureRun {
    pub label: StructureLabel,
    pub start_index: usize,
    pub end_index: usize,
    pub instance_ordinal: Option<u32>,
}

impl StructureRun {
    pub fn len(&self) -> usize {
        self.end_index + 1 - self.start_index
    }
}

/// Running per-label count of closed runs
#[derive(Debug, Clone, Default)]
pub struct OrdinalCounter {
    counts: BTreeMap<StructureLabel, u32>,
}

impl OrdinalCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bump the count for `label` and return the new ordinal.
    pub fn next(&mut self, label: StructureLabel) -> u32 {
        let count = self.counts.entry(label).or_insert(0);
        *count += 1;
        *count
    }

    pub fn get(&self, label: StructureLabel) -> u32 {
        self.counts.get(&label).copied().unwrap_or(0)
    }
}

/// Segmentation result for one chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentedChain {
    pub chain_id: String,
    pub residues_per_line: usize,
    /// One-letter residue names, in chain order
    pub names: Vec<char>,
    /// Glyph variant per residue, same length as the chain
    pub glyphs: Vec<GlyphKey>,
    /// Annotation spans in column order; their widths sum to the chain length
    pub spans: Vec<AnnotationSpan>,
    pub runs: Vec<StructureRun>,
}

impl SegmentedChain {
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Tags in the order they appear in the annotation band.
    pub fn tags(&self) -> impl Iterator<Item = RunTag> + '_ {
        self.spans.iter().filter_map(|s| s.tag)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Segmenter {
    residues_per_line: usize,
}

impl Segmenter {
    pub fn new(residues_per_line: usize) -> CoreResult<Self> {
        if residues_per_line == 0 {
            return Err(CoreError::invalid_parameter("residues_per_line must be at least 1"));
        }
        Ok(Self { residues_per_line })
    }

    pub fn residues_per_line(&self) -> usize {
        self.residues_per_line
    }

    /// Segment a chain with a fresh ordinal counter.
    pub fn segment(&self, chain: &Chain) -> SegmentedChain {
        self.segment_with(chain, &mut OrdinalCounter::new())
    }

    /// Segment a chain, numbering counted runs from `counter`.
    pub fn segment_with(&self, chain: &Chain, counter: &mut OrdinalCounter) -> SegmentedChain {
        let residues = chain.residues();
        let n = residues.len();
        let mut glyphs = Vec::with_capacity(n);
        let mut spans = Vec::new();
        let mut runs = Vec::new();
        let mut span_start = 0usize;
        let mut run_start = 0usize;

        for (i, residue) in residues.iter().enumerate() {
            let label = residue.label;
            let run_ends = residues.get(i + 1).map_or(true, |next| next.label != label);
            let wraps = (i + 1) % self.residues_per_line == 0;

            glyphs.push(label.glyph(run_ends));

            if !(run_ends || wraps) {
                continue;
            }

            // Page wraps only split the span; the ordinal belongs to the cell closing the run.
            let tag = if run_ends && label.is_counted() {
                Some(RunTag { label, ordinal: counter.next(label) })
            } else {
                None
            };
            spans.push(AnnotationSpan { start: span_start, end: i, tag });
            span_start = i + 1;

            if run_ends {
                runs.push(StructureRun {
                    label,
                    start_index: run_start,
                    end_index: i,
                    instance_ordinal: tag.map(|t| t.ordinal),
                });
                run_start = i + 1;
            }
        }

        log::debug!(
            "Chain {}: {} residues, {} runs, {} annotation spans",
            chain.id,
            n,
            runs.len(),
            spans.len()
        );

        SegmentedChain {
            chain_id: chain.id.clone(),
            residues_per_line: self.residues_per_line,
            names: residues.iter().map(|r| r.display_name).collect(),
            glyphs,
            spans,
            runs,
        }
    }
}
