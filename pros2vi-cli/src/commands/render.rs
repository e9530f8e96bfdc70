//! Render command implementation - draw a secondary-structure map to PNG/JPEG/PDF

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{CliError, CliResult};
use pros2vi_core::io::read_assignments;
use pros2vi_render::{
    render_assignments, ColorGroup, DocumentMeta, ExportRequest, JsonMetadata, MultiPagePolicy,
    NoMetadata, Palette, RenderJob,
};

#[allow(clippy::too_many_arguments)]
pub fn execute(
    config: &Config,
    input: PathBuf,
    name: Option<String>,
    subtitle: Option<String>,
    scientific_name: Option<String>,
    residues_per_line: Option<usize>,
    output: Option<PathBuf>,
    dpi: Option<u32>,
    pdf: bool,
    numbered_pages: bool,
    metadata: Option<PathBuf>,
    colors: Vec<String>,
) -> Result<()> {
    log::info!("Starting structure map rendering");
    log::info!("Input file: {}", input.display());

    // Validate input file exists
    if !input.exists() {
        return Err(CliError::file_not_found(input).into());
    }

    let name = name.unwrap_or_else(|| default_name(&input));
    let output = output.unwrap_or_else(|| PathBuf::from(format!("{}.png", name)));
    log::info!("Output file: {}", output.display());

    // Command-line values take precedence over pros2vi.toml
    let residues_per_line = residues_per_line.unwrap_or(config.render.residues_per_line);
    let dpi = dpi.unwrap_or(config.render.dpi);
    let want_pdf = pdf || config.render.want_pdf;
    let multi_page = if numbered_pages {
        MultiPagePolicy::Numbered
    } else {
        config.render.multi_page
    };

    let palette = apply_color_overrides(config.palette.clone(), &colors)?;

    // Reject a bad output path or dpi before touching the input
    let request = ExportRequest::new(&output)
        .with_dpi(dpi)
        .with_pdf(want_pdf)
        .with_multi_page(multi_page);
    request.validate().map_err(CliError::from)?;
    if residues_per_line == 0 {
        return Err(CliError::validation("--residues-per-line must be at least 1").into());
    }

    let records = read_assignments(&input)
        .map_err(|e| CliError::from_read(&input, e))
        .context("Failed to read structure assignment")?;
    log::info!("Read {} residue assignments", records.len());

    let meta = DocumentMeta::new(name)
        .with_subtitle(subtitle)
        .with_scientific_name(scientific_name);
    let job = RenderJob::new(meta, request)
        .with_residues_per_line(residues_per_line)
        .with_palette(palette);
    let job = match metadata {
        Some(path) => {
            log::info!("Metadata file: {}", path.display());
            job.enrich(&JsonMetadata::new(path))
        }
        None => job.enrich(&NoMetadata),
    };

    let backend = config.backend.to_backend();
    let report = render_assignments(records, &job, &backend)
        .map_err(CliError::from)
        .context("Failed to render structure map")?;

    log::info!(
        "Rendered {}x{} canvas via {:?} ({} page(s))",
        report.geometry.width,
        report.geometry.height,
        report.strategy,
        report.pages
    );
    for image in &report.images {
        log::info!("Wrote image: {}", image.display());
    }
    if let Some(pdf) = &report.pdf {
        log::info!("Wrote PDF: {}", pdf.display());
    }

    log::info!("Rendering completed successfully");
    Ok(())
}

/// Map title when none is given: the input file name without extension.
fn default_name(input: &Path) -> String {
    input
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("structure")
        .to_string()
}

/// Apply `GROUP=COLOR` overrides in order; later ones win.
fn apply_color_overrides(palette: Palette, overrides: &[String]) -> CliResult<Palette> {
    overrides.iter().try_fold(palette, |palette, entry| {
        let (group, color) = entry.split_once('=').ok_or_else(|| {
            CliError::validation(format!("colour override '{}' is not GROUP=COLOR", entry))
        })?;
        let group: ColorGroup = group.trim().parse().map_err(CliError::from)?;
        log::debug!("Colour override: {} = {}", group, color.trim());
        palette.with_group(group, color.trim()).map_err(CliError::from)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pros2vi_core::GlyphKey;

    #[test]
    fn test_default_name_is_file_stem() {
        assert_eq!(default_name(Path::new("data/1abc.dssp")), "1abc");
        assert_eq!(default_name(Path::new("assignments")), "assignments");
    }

    #[test]
    fn test_color_overrides_apply_to_whole_group() {
        let overrides = vec!["strand=#00ff00".to_string(), "Unsolved = grey".to_string()];
        let palette = apply_color_overrides(Palette::default(), &overrides).unwrap();
        assert_eq!(palette.color(GlyphKey::Strand), "#00ff00");
        assert_eq!(palette.color(GlyphKey::StrandEnd), "#00ff00");
        assert_eq!(palette.color(GlyphKey::Coil), "grey");
        assert_eq!(palette.color(GlyphKey::Polyproline), "grey");
        assert_eq!(palette.color(GlyphKey::Helix), Palette::default().color(GlyphKey::Helix));
    }

    #[test]
    fn test_later_override_wins() {
        let overrides = vec!["helix=red".to_string(), "helix=#123".to_string()];
        let palette = apply_color_overrides(Palette::default(), &overrides).unwrap();
        assert_eq!(palette.color(GlyphKey::Helix), "#123");
    }

    #[test]
    fn test_malformed_overrides_are_rejected() {
        for bad in ["helix", "sheet=#00ff00", "helix=#zzzzzz"] {
            let err = apply_color_overrides(Palette::default(), &[bad.to_string()]).unwrap_err();
            assert!(matches!(err, CliError::Validation { .. }), "{bad}: {err}");
        }
    }

    #[test]
    fn test_bad_output_extension_fails_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        // Not a valid DSSP file: parsing it would fail with a Parse error
        let input = dir.path().join("broken.dssp");
        std::fs::write(&input, "no residue section here\n").unwrap();

        let err = execute(
            &Config::default(),
            input,
            None,
            None,
            None,
            None,
            Some(dir.path().join("map.bmp")),
            None,
            false,
            false,
            None,
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::Validation { .. })));
    }

    #[test]
    fn test_missing_input_is_reported() {
        let config = Config::default();
        let err = execute(
            &config,
            PathBuf::from("/nonexistent/1abc.dssp"),
            None,
            None,
            None,
            None,
            None,
            None,
            false,
            false,
            None,
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::FileNotFound { .. })));
    }
}
