//! pros2vi Core Library
//!
//! Label alphabet, chain model, run segmentation, page-row layout and canvas
//! geometry for secondary-structure maps.

pub mod error;
pub mod geometry;
pub mod io;
pub mod label;
pub mod paginate;
pub mod segment;
pub mod types;

// Re-export commonly used types and functions
pub use error::{CoreError, CoreResult};
pub use geometry::CanvasGeometry;
pub use label::{GlyphKey, StructureLabel};
pub use paginate::{paginate, page_row_count, AnnotationCell, GlyphCell, PageRow, ResidueCell};
pub use segment::{AnnotationSpan, OrdinalCounter, RunTag, SegmentedChain, Segmenter, StructureRun};
pub use types::{AssignedResidue, Chain, Residue, Structure};

/// Version information for the pros2vi core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
