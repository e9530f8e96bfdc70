/*!
# pros2vi Rendering Pipeline

Turns segmented chains into a self-contained HTML document and exports it as
PNG/JPEG (and optionally PDF) through external conversion tools.

## Architecture

1. **Document**: typed per-chain blocks of page-rows plus a legend
2. **HTML**: inline stylesheet, glyphs embedded as base64 PNG
3. **Export**: direct raster at 100 dpi, PDF-then-rasterize otherwise
*/

pub mod backend;
pub mod document;
pub mod error;
pub mod export;
pub mod glyph;
pub mod html;
pub mod metadata;
pub mod pipeline;
pub mod style;

pub use backend::{ConversionBackend, ProcessBackend, RasterFormat, Tool};
pub use document::{ChainBlock, Document, DocumentBuilder, DocumentMeta, LegendEntry};
pub use error::{BackendError, ErrorKind, ExportError, ExportResult};
pub use export::{ExportReport, ExportRequest, ExportState, ExportStrategy, Exporter, MultiPagePolicy};
pub use glyph::GlyphRasterizer;
pub use html::HtmlWriter;
pub use metadata::{EntryMetadata, JsonMetadata, MetadataSource, NoMetadata};
pub use pipeline::{assemble_html, render_assignments, RenderJob};
pub use style::{ColorGroup, Palette};
