//! Glyph colour palette
//!
//! An immutable mapping from the eleven glyph keys to CSS colours. A palette
//! is built once per render (defaults, then config, then command-line group
//! overrides) and shared read-only by the document writer and the rasterizer.

use std::fmt;
use std::str::FromStr;

use pros2vi_core::GlyphKey;
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, ExportResult};

fn default_helix() -> String { "#0000ff".to_string() }
fn default_strand() -> String { "#ff0000".to_string() }
fn default_bridge() -> String { "#228B22".to_string() }
fn default_pi_helix() -> String { "#ff00ff".to_string() }
fn default_turn() -> String { "#ffff00".to_string() }
fn default_bend() -> String { "#ffa500".to_string() }
fn default_helix_310() -> String { "#ff0000".to_string() }
fn default_unassigned() -> String { "#b7b7b7".to_string() }

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    #[serde(rename = "H_COLOR", default = "default_helix")]
    pub helix: String,
    #[serde(rename = "E_COLOR", default = "default_strand")]
    pub strand: String,
    #[serde(rename = "E_A_COLOR", default = "default_strand")]
    pub strand_end: String,
    #[serde(rename = "B_COLOR", default = "default_bridge")]
    pub bridge: String,
    #[serde(rename = "B_A_COLOR", default = "default_bridge")]
    pub bridge_end: String,
    #[serde(rename = "I_COLOR", default = "default_pi_helix")]
    pub helix_pi: String,
    #[serde(rename = "T_COLOR", default = "default_turn")]
    pub turn: String,
    #[serde(rename = "S_COLOR", default = "default_bend")]
    pub bend: String,
    #[serde(rename = "G_COLOR", default = "default_helix_310")]
    pub helix_310: String,
    #[serde(rename = "-_COLOR", default = "default_unassigned")]
    pub coil: String,
    #[serde(rename = "P_COLOR", default = "default_unassigned")]
    pub polyproline: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            helix: default_helix(),
            strand: default_strand(),
            strand_end: default_strand(),
            bridge: default_bridge(),
            bridge_end: default_bridge(),
            helix_pi: default_pi_helix(),
            turn: default_turn(),
            bend: default_bend(),
            helix_310: default_helix_310(),
            coil: default_unassigned(),
            polyproline: default_unassigned(),
        }
    }
}

impl Palette {
    pub fn color(&self, glyph: GlyphKey) -> &str {
        match glyph {
            GlyphKey::Helix => &self.helix,
            GlyphKey::Strand => &self.strand,
            GlyphKey::StrandEnd => &self.strand_end,
            GlyphKey::Bridge => &self.bridge,
            GlyphKey::BridgeEnd => &self.bridge_end,
            GlyphKey::HelixPi => &self.helix_pi,
            GlyphKey::Turn => &self.turn,
            GlyphKey::Bend => &self.bend,
            GlyphKey::Helix310 => &self.helix_310,
            GlyphKey::Coil => &self.coil,
            GlyphKey::Polyproline => &self.polyproline,
        }
    }

    fn slot_mut(&mut self, glyph: GlyphKey) -> &mut String {
        match glyph {
            GlyphKey::Helix => &mut self.helix,
            GlyphKey::Strand => &mut self.strand,
            GlyphKey::StrandEnd => &mut self.strand_end,
            GlyphKey::Bridge => &mut self.bridge,
            GlyphKey::BridgeEnd => &mut self.bridge_end,
            GlyphKey::HelixPi => &mut self.helix_pi,
            GlyphKey::Turn => &mut self.turn,
            GlyphKey::Bend => &mut self.bend,
            GlyphKey::Helix310 => &mut self.helix_310,
            GlyphKey::Coil => &mut self.coil,
            GlyphKey::Polyproline => &mut self.polyproline,
        }
    }

    /// Return a copy with one glyph recoloured.
    pub fn with_color(mut self, glyph: GlyphKey, color: &str) -> ExportResult<Self> {
        validate_color(color)?;
        *self.slot_mut(glyph) = color.to_string();
        Ok(self)
    }

    /// Return a copy with every glyph of `group` recoloured.
    pub fn with_group(self, group: ColorGroup, color: &str) -> ExportResult<Self> {
        group
            .glyphs()
            .iter()
            .try_fold(self, |palette, &glyph| palette.with_color(glyph, color))
    }

    /// Check every entry, e.g. after loading from a config file.
    pub fn validate(&self) -> ExportResult<()> {
        for (key, color) in self.entries() {
            validate_color(color).map_err(|_| {
                ExportError::invalid_parameter(format!("{} has invalid colour '{}'", key, color))
            })?;
        }
        Ok(())
    }

    /// Entries in registry order, as (`H_COLOR`, colour) pairs.
    pub fn entries(&self) -> Vec<(String, &str)> {
        GlyphKey::ALL
            .into_iter()
            .map(|g| (g.registry_key(), self.color(g)))
            .collect()
    }
}

/// Accepts `#rgb`, `#rrggbb` or a plain CSS colour name.
pub fn validate_color(color: &str) -> ExportResult<()> {
    let valid = match color.strip_prefix('#') {
        Some(hex) => matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => !color.is_empty() && color.chars().all(|c| c.is_ascii_alphanumeric()),
    };
    if valid {
        Ok(())
    } else {
        Err(ExportError::invalid_parameter(format!("invalid colour '{color}'")))
    }
}

/// Named colour groups accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorGroup {
    Helix,
    Beta,
    Strand,
    PiHelix,
    Helix310,
    Turn,
    Bend,
    Unsolved,
}

impl ColorGroup {
    pub const ALL: [ColorGroup; 8] = [
        ColorGroup::Helix,
        ColorGroup::Beta,
        ColorGroup::Strand,
        ColorGroup::PiHelix,
        ColorGroup::Helix310,
        ColorGroup::Turn,
        ColorGroup::Bend,
        ColorGroup::Unsolved,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Helix => "helix",
            Self::Beta => "beta",
            Self::Strand => "strand",
            Self::PiHelix => "pihelix",
            Self::Helix310 => "310helix",
            Self::Turn => "turn",
            Self::Bend => "bend",
            Self::Unsolved => "unsolved",
        }
    }

    pub fn glyphs(self) -> &'static [GlyphKey] {
        match self {
            Self::Helix => &[GlyphKey::Helix],
            Self::Beta => &[GlyphKey::Bridge, GlyphKey::BridgeEnd],
            Self::Strand => &[GlyphKey::Strand, GlyphKey::StrandEnd],
            Self::PiHelix => &[GlyphKey::HelixPi],
            Self::Helix310 => &[GlyphKey::Helix310],
            Self::Turn => &[GlyphKey::Turn],
            Self::Bend => &[GlyphKey::Bend],
            Self::Unsolved => &[GlyphKey::Coil, GlyphKey::Polyproline],
        }
    }
}

impl FromStr for ColorGroup {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|g| g.name() == lower)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|g| g.name()).collect();
                ExportError::invalid_parameter(format!(
                    "unknown colour group '{s}' (expected one of: {})",
                    names.join(", ")
                ))
            })
    }
}

impl fmt::Display for ColorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
