//! Self-contained HTML serialization
//!
//! Writes a [`Document`] as one HTML page with an inline stylesheet and
//! embedded glyph images. The markup is what the conversion tools render.

use pros2vi_core::{AnnotationCell, GlyphCell, PageRow, ResidueCell};

use crate::document::{ChainBlock, Document, DocumentMeta, LegendEntry};
use crate::error::ExportResult;
use crate::glyph::GlyphRasterizer;

const STYLESHEET: &str = "\
body { margin: 0; padding: 25px; font-family: Arial, Helvetica, sans-serif; background: #ffffff; }
h1.title { margin: 0; font-size: 32px; }
h2.subtitle { margin: 4px 0; font-size: 18px; font-weight: normal; }
p.organism { margin: 4px 0 16px 0; font-style: italic; }
div.chain { margin-top: 24px; font-weight: bold; font-size: 18px; }
div.accession { font-size: 14px; }
table.residues { border-collapse: collapse; table-layout: fixed; margin-top: 8px; }
table.residues td { width: 20px; padding: 0; text-align: center; }
td.annotation { height: 16px; font-size: 11px; border-left: 1px solid #dddddd; }
td.icon-row { height: 35px; }
td.res-row { height: 20px; font-family: monospace; font-size: 14px; }
td.count-start, td.count-end { width: 24px; font-size: 10px; color: #555555; }
img.icon { width: 20px; height: 31px; display: block; }
table.legend { margin-top: 32px; border-collapse: collapse; }
table.legend td { padding: 2px 8px; font-size: 13px; }
";

/// Escape text content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub struct HtmlWriter<'a> {
    rasterizer: &'a mut GlyphRasterizer,
    elements: Vec<String>,
}

impl<'a> HtmlWriter<'a> {
    pub fn new(rasterizer: &'a mut GlyphRasterizer) -> Self {
        Self { rasterizer, elements: Vec::new() }
    }

    /// Serialize a complete document.
    pub fn write(mut self, document: &Document) -> ExportResult<String> {
        self.add_header(&document.meta);
        for block in &document.chains {
            self.add_chain(block, document)?;
        }
        self.add_legend(&document.legend)?;

        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\" />\n");
        html.push_str(&format!("<title>{}</title>\n", escape(&document.meta.title.to_uppercase())));
        html.push_str(&format!("<style>\n{STYLESHEET}</style>\n"));
        html.push_str("</head>\n<body>\n");
        for element in &self.elements {
            html.push_str(element);
            html.push('\n');
        }
        html.push_str("</body>\n</html>\n");
        Ok(html)
    }

    fn add_header(&mut self, meta: &DocumentMeta) {
        self.elements.push(format!(
            r#"<h1 class="title">{}</h1>"#,
            escape(&meta.title.to_uppercase())
        ));
        if let Some(subtitle) = &meta.subtitle {
            self.elements.push(format!(r#"<h2 class="subtitle">{}</h2>"#, escape(subtitle)));
        }
        if let Some(name) = &meta.scientific_name {
            self.elements.push(format!(r#"<p class="organism">{}</p>"#, escape(name)));
        }
    }

    fn add_chain(&mut self, block: &ChainBlock, document: &Document) -> ExportResult<()> {
        self.elements.push(format!(
            r#"<div class="chain">Chain {}:</div>"#,
            escape(&block.chain_id)
        ));
        if let Some(accession) = &block.accession {
            self.elements.push(format!(
                r#"<div class="accession">Uniprot ID: {}</div>"#,
                escape(accession)
            ));
        }

        let mut table = String::from(r#"<table class="residues"><tbody>"#);
        for row in &block.rows {
            self.push_page_row(&mut table, row, document)?;
        }
        table.push_str("</tbody></table>");
        self.elements.push(table);
        Ok(())
    }

    fn push_page_row(&mut self, table: &mut String, row: &PageRow, document: &Document) -> ExportResult<()> {
        table.push_str(r#"<tr class="annotation-row"><td></td>"#);
        for cell in &row.annotations {
            match cell {
                AnnotationCell::Padding => table.push_str(r#"<td class="annotation"></td>"#),
                _ => table.push_str(&format!(
                    r#"<td class="annotation" colspan="{}">{}</td>"#,
                    cell.width(),
                    cell.text().unwrap_or_default()
                )),
            }
        }
        table.push_str("<td></td></tr>");

        table.push_str(r#"<tr><td class="icon-row"></td>"#);
        for cell in &row.glyphs {
            match cell {
                GlyphCell::Glyph(glyph) => {
                    let img = self.rasterizer.render_with(*glyph, &document.palette)?;
                    table.push_str(&format!(r#"<td class="icon-row">{img}</td>"#));
                }
                GlyphCell::Padding => table.push_str("<td></td>"),
            }
        }
        table.push_str("<td></td></tr>");

        table.push_str(&format!(r#"<tr><td class="count-start">{}</td>"#, row.first_position));
        for cell in &row.residues {
            match cell {
                ResidueCell::Residue(name) => table.push_str(&format!(
                    r#"<td class="res-row">{}</td>"#,
                    escape(&name.to_string())
                )),
                ResidueCell::Padding => table.push_str("<td></td>"),
            }
        }
        table.push_str(&format!(r#"<td class="count-end">{}</td></tr>"#, row.last_position));
        Ok(())
    }

    fn add_legend(&mut self, legend: &[LegendEntry]) -> ExportResult<()> {
        let mut table = String::from(r#"<table class="legend"><tbody>"#);
        for entry in legend {
            let img = self.rasterizer.render(entry.glyph, &entry.color)?;
            table.push_str(&format!(
                "<tr><td>{img}</td><td>{}</td><td>{}</td></tr>",
                escape(&entry.label.code().to_string()),
                entry.label.name()
            ));
        }
        table.push_str("</tbody></table>");
        self.elements.push(table);
        Ok(())
    }
}
