//! Glyph templates and rasterization
//!
//! Every glyph is a 45x70 vector drawing with a `{color}` slot. The template
//! is filled in, rasterized to PNG with resvg and embedded in the document as
//! a base64 data URI, so the exported page carries no external references.

use std::collections::HashMap;

use base64::{engine::general_purpose, Engine};
use pros2vi_core::GlyphKey;
use resvg::{tiny_skia, usvg};
use svg::node::element::{Definitions, LinearGradient, Path, Stop};
use svg::Document;

use crate::error::{ExportError, ExportResult};
use crate::style::Palette;

pub const COLOR_SLOT: &str = "{color}";
pub const GLYPH_WIDTH: u32 = 45;
pub const GLYPH_HEIGHT: u32 = 70;

const FADE_ID: &str = "fade";

// Outlines, in viewBox units
const HELIX_OUTLINE: &str = "M 0,55.5 C 7,55.5 9,41 12,33 C 15,24 19,19 24.5,19 \
     C 30,19 32,30 34,38 C 36,46 39,50.6 45,50.6 L 45,35 C 41,35 39,27 37,21 \
     C 34,13 30,12 24.5,12 C 16,12 11,17 8,25 C 5,33 3,41 0,41 Z";
const RIBBON_OUTLINE: &str = "M 0,28.7 L 45,28.7 L 45,55.5 L 0,55.5 Z";
const ARROW_OUTLINE: &str = "M 0,28.7 L 24.1,29.4 L 24.3,15.7 L 45,39.2 \
     L 24.4,63.6 L 24.2,56.4 L 0,55.5 Z";
const LOOP_OUTLINE: &str = "M 0,31 L 45,31 L 45,50.8 L 0,50.8 Z";
const COIL_OUTLINE: &str = "M 0,38.1 L 45,38.1 L 45,47.1 L 0,47.1 Z";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Helix,
    Ribbon,
    Arrow,
    Loop,
    Coil,
}

impl Shape {
    fn of(glyph: GlyphKey) -> Self {
        match glyph {
            GlyphKey::Helix | GlyphKey::Helix310 | GlyphKey::HelixPi => Self::Helix,
            GlyphKey::Strand | GlyphKey::Bridge => Self::Ribbon,
            GlyphKey::StrandEnd | GlyphKey::BridgeEnd => Self::Arrow,
            GlyphKey::Turn | GlyphKey::Bend => Self::Loop,
            GlyphKey::Coil | GlyphKey::Polyproline => Self::Coil,
        }
    }

    fn outline(self) -> &'static str {
        match self {
            Self::Helix => HELIX_OUTLINE,
            Self::Ribbon => RIBBON_OUTLINE,
            Self::Arrow => ARROW_OUTLINE,
            Self::Loop => LOOP_OUTLINE,
            Self::Coil => COIL_OUTLINE,
        }
    }

    /// Flat shapes fade out towards the top; helices are solid.
    fn is_shaded(self) -> bool {
        self != Self::Helix
    }
}

/// SVG source of a glyph with the colour left as [`COLOR_SLOT`].
pub fn template(glyph: GlyphKey) -> String {
    let shape = Shape::of(glyph);
    let mut document = Document::new()
        .set("xmlns", "http://www.w3.org/2000/svg")
        .set("width", GLYPH_WIDTH)
        .set("height", GLYPH_HEIGHT)
        .set("viewBox", (0, 0, GLYPH_WIDTH, GLYPH_HEIGHT));

    let fill = if shape.is_shaded() {
        let gradient = LinearGradient::new()
            .set("id", FADE_ID)
            .set("x1", 0)
            .set("y1", 1)
            .set("x2", 0)
            .set("y2", 0)
            .add(Stop::new().set("offset", 0).set("stop-color", COLOR_SLOT).set("stop-opacity", 1))
            .add(Stop::new().set("offset", 1).set("stop-color", COLOR_SLOT).set("stop-opacity", 0));
        document = document.add(Definitions::new().add(gradient));
        format!("url(#{FADE_ID})")
    } else {
        COLOR_SLOT.to_string()
    };

    document
        .add(Path::new().set("fill", fill).set("d", shape.outline()))
        .to_string()
}

/// Fill the colour slot of a template.
pub fn instantiate(template: &str, color: &str) -> String {
    template.replace(COLOR_SLOT, color)
}

/// Rasterize SVG source to PNG bytes at its natural size.
pub fn rasterize(source: &str) -> Result<Vec<u8>, String> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(source, &options).map_err(|e| format!("SVG parse error: {e}"))?;
    let size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height()).ok_or("pixmap alloc failed")?;
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
    pixmap.encode_png().map_err(|e| format!("PNG encode error: {e}"))
}

/// `<img>` element embedding PNG bytes.
pub fn img_tag(png: &[u8]) -> String {
    let encoded = general_purpose::STANDARD.encode(png);
    format!(r#"<img class="icon" src="data:image/png;base64, {encoded}" />"#)
}

/// Per-render glyph cache keyed by glyph and colour
#[derive(Debug, Default)]
pub struct GlyphRasterizer {
    cache: HashMap<(GlyphKey, String), String>,
    rasterized: usize,
}

impl GlyphRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Embedded `<img>` for `glyph` in `color`.
    pub fn render(&mut self, glyph: GlyphKey, color: &str) -> ExportResult<&str> {
        let key = (glyph, color.to_string());
        if !self.cache.contains_key(&key) {
            let source = instantiate(&template(glyph), color);
            let png = rasterize(&source).map_err(|message| ExportError::Glyph {
                glyph: glyph.key().to_string(),
                message,
            })?;
            log::trace!("Rasterized glyph {} in {} ({} bytes)", glyph, color, png.len());
            self.rasterized += 1;
            self.cache.insert(key.clone(), img_tag(&png));
        }
        Ok(self.cache[&key].as_str())
    }

    /// Same as [`render`](Self::render) with the palette colour of `glyph`.
    pub fn render_with(&mut self, glyph: GlyphKey, palette: &Palette) -> ExportResult<&str> {
        self.render(glyph, palette.color(glyph))
    }

    /// Number of distinct glyphs rasterized so far
    pub fn rasterized(&self) -> usize {
        self.rasterized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_carry_the_colour_slot() {
        for glyph in GlyphKey::ALL {
            let source = template(glyph);
            assert!(source.contains(COLOR_SLOT), "{glyph}");
            assert!(source.contains(r#"viewBox="0 0 45 70""#), "{glyph}");
        }
    }

    #[test]
    fn arrow_variants_differ_from_their_body() {
        let png = |glyph| rasterize(&instantiate(&template(glyph), "#ff0000")).unwrap();
        assert_ne!(png(GlyphKey::Strand), png(GlyphKey::StrandEnd));
        assert_eq!(png(GlyphKey::Strand), png(GlyphKey::Bridge));
    }

    #[test]
    fn instantiate_replaces_every_slot() {
        let source = instantiate(&template(GlyphKey::Turn), "#ffff00");
        assert!(!source.contains(COLOR_SLOT));
        assert_eq!(source.matches("#ffff00").count(), 2);
    }

    #[test]
    fn rasterized_glyph_is_a_png_of_template_size() {
        let png = rasterize(&instantiate(&template(GlyphKey::Helix), "#0000ff")).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        let image = image::load_from_memory(&png).unwrap();
        assert_eq!((image.width(), image.height()), (GLYPH_WIDTH, GLYPH_HEIGHT));
    }

    #[test]
    fn img_tag_wraps_a_data_uri() {
        assert_eq!(img_tag(b"abc"), r#"<img class="icon" src="data:image/png;base64, YWJj" />"#);
    }

    #[test]
    fn cache_rasterizes_each_glyph_colour_once() {
        let mut rasterizer = GlyphRasterizer::new();
        let first = rasterizer.render(GlyphKey::Coil, "#b7b7b7").unwrap().to_string();
        let second = rasterizer.render(GlyphKey::Coil, "#b7b7b7").unwrap().to_string();
        assert_eq!(first, second);
        assert_eq!(rasterizer.rasterized(), 1);

        rasterizer.render(GlyphKey::Coil, "#000000").unwrap();
        rasterizer.render(GlyphKey::Polyproline, "#b7b7b7").unwrap();
        assert_eq!(rasterizer.rasterized(), 3);
    }

    #[test]
    fn output_is_deterministic() {
        let a = GlyphRasterizer::new().render(GlyphKey::StrandEnd, "#ff0000").unwrap().to_string();
        let b = GlyphRasterizer::new().render(GlyphKey::StrandEnd, "#ff0000").unwrap().to_string();
        assert_eq!(a, b);
    }

    #[test]
    fn malformed_source_fails_to_rasterize() {
        assert!(rasterize("<svg").is_err());
    }

    #[test]
    fn palette_lookup_shares_the_cache() {
        let palette = Palette::default().with_color(GlyphKey::Helix, "#00aa00").unwrap();
        let mut rasterizer = GlyphRasterizer::new();
        let via_palette = rasterizer.render_with(GlyphKey::Helix, &palette).unwrap().to_string();
        let direct = rasterizer.render(GlyphKey::Helix, "#00aa00").unwrap().to_string();
        assert_eq!(via_palette, direct);
        assert_eq!(rasterizer.rasterized(), 1);
    }

}
