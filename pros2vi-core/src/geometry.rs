//! Output canvas geometry
//!
//! The canvas is sized from the table layout: 20 px per residue column plus
//! fixed margins horizontally, and per-chain headings plus per-row bands
//! vertically. Everything is halved for the final page.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::paginate::page_row_count;

const COLUMN_WIDTH: u64 = 20;
/// Number columns, table borders and page margin
const HORIZONTAL_CHROME: u64 = 48 + 100 + 50;
const CHAIN_HEADING_HEIGHT: u64 = 76;
const PAGE_ROW_HEIGHT: u64 = 96;
/// Title block, legend and page margins
const VERTICAL_CHROME: u64 = 956;
const SCALE_DIVISOR: u64 = 2;

/// Page size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasGeometry {
    pub width: u32,
    pub height: u32,
}

impl CanvasGeometry {
    /// Compute the canvas for `residues_per_line` and the given chain lengths.
    pub fn compute(residues_per_line: usize, chain_lengths: &[usize]) -> CoreResult<Self> {
        if residues_per_line == 0 {
            return Err(CoreError::invalid_parameter("residues_per_line must be at least 1"));
        }

        let rows: u64 = chain_lengths
            .iter()
            .map(|&len| page_row_count(len, residues_per_line) as u64)
            .sum();
        let chains = chain_lengths.len() as u64;

        let width = COLUMN_WIDTH
            .saturating_mul(residues_per_line as u64)
            .saturating_add(HORIZONTAL_CHROME)
            / SCALE_DIVISOR;
        let height = chains
            .saturating_mul(CHAIN_HEADING_HEIGHT)
            .saturating_add(rows.saturating_mul(PAGE_ROW_HEIGHT))
            .saturating_add(VERTICAL_CHROME)
            / SCALE_DIVISOR;

        let geometry = Self {
            width: u32::try_from(width)
                .map_err(|_| CoreError::geometry(format!("canvas width {width}px is too large")))?,
            height: u32::try_from(height)
                .map_err(|_| CoreError::geometry(format!("canvas height {height}px is too large")))?,
        };
        log::debug!(
            "Canvas for {} chains / {} rows at {} per line: {}x{}",
            chains,
            rows,
            residues_per_line,
            geometry.width,
            geometry.height
        );
        Ok(geometry)
    }

    /// Fail when either dimension is zero.
    pub fn ensure_drawable(&self) -> CoreResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CoreError::geometry(format!(
                "degenerate canvas {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_full_line_at_default_width() {
        let g = CanvasGeometry::compute(50, &[50]).unwrap();
        assert_eq!(g, CanvasGeometry { width: 599, height: 564 });
    }

    #[test]
    fn empty_structure_is_only_chrome() {
        let g = CanvasGeometry::compute(50, &[]).unwrap();
        assert_eq!(g.height as u64, VERTICAL_CHROME / SCALE_DIVISOR);
        assert_eq!(g.height, 478);
    }

    #[test]
    fn compute_is_pure() {
        let lengths = [120, 7, 301];
        assert_eq!(
            CanvasGeometry::compute(40, &lengths).unwrap(),
            CanvasGeometry::compute(40, &lengths).unwrap()
        );
    }

    #[test]
    fn rows_are_counted_per_chain() {
        // 51 residues need two rows, 10 need one: (2*76 + 3*96 + 956) / 2
        let g = CanvasGeometry::compute(50, &[51, 10]).unwrap();
        assert_eq!(g.height, 698);
        assert_eq!(g.width, 599);
    }

    #[test]
    fn width_is_truncated() {
        // (20*1 + 198) / 2 = 109
        assert_eq!(CanvasGeometry::compute(1, &[]).unwrap().width, 109);
        // (0 + 0 + 956) / 2
        assert_eq!(CanvasGeometry::compute(1, &[]).unwrap().height, 478);
    }

    #[test]
    fn zero_residues_per_line_is_invalid() {
        assert!(matches!(
            CanvasGeometry::compute(0, &[10]),
            Err(CoreError::InvalidParameter(_))
        ));
    }

    #[test]
    fn oversized_canvas_is_a_geometry_error() {
        let err = CanvasGeometry::compute(usize::MAX / 64, &[1]).unwrap_err();
        assert!(matches!(err, CoreError::Geometry(_)));
    }

    #[test]
    fn degenerate_canvas_is_rejected() {
        assert!(CanvasGeometry { width: 0, height: 10 }.ensure_drawable().is_err());
        assert!(CanvasGeometry { width: 10, height: 10 }.ensure_drawable().is_ok());
    }
}
