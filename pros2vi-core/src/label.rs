//! Secondary structure label alphabet
//!
//! The closed set of DSSP codes a residue may carry, and the glyph variants
//! used to draw them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// DSSP secondary structure classification of a single residue.
///
/// Only these nine codes are accepted; anything else is rejected when the
/// assignment is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StructureLabel {
    /// `H` alpha helix
    Helix,
    /// `B` isolated beta bridge
    Bridge,
    /// `E` extended strand in a ladder
    Strand,
    /// `G` 3-10 helix
    Helix310,
    /// `I` pi helix
    HelixPi,
    /// `T` hydrogen bonded turn
    Turn,
    /// `S` bend
    Bend,
    /// `P` polyproline II helix
    Polyproline,
    /// `-` no assignment
    Coil,
}

impl StructureLabel {
    /// Every label, in legend order.
    pub const ALL: [StructureLabel; 9] = [
        StructureLabel::Helix,
        StructureLabel::Bridge,
        StructureLabel::Strand,
        StructureLabel::Helix310,
        StructureLabel::HelixPi,
        StructureLabel::Turn,
        StructureLabel::Bend,
        StructureLabel::Polyproline,
        StructureLabel::Coil,
    ];

    /// Parse a one-letter DSSP code. Returns `None` outside the alphabet.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'H' => Some(Self::Helix),
            'B' => Some(Self::Bridge),
            'E' => Some(Self::Strand),
            'G' => Some(Self::Helix310),
            'I' => Some(Self::HelixPi),
            'T' => Some(Self::Turn),
            'S' => Some(Self::Bend),
            'P' => Some(Self::Polyproline),
            '-' => Some(Self::Coil),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            Self::Helix => 'H',
            Self::Bridge => 'B',
            Self::Strand => 'E',
            Self::Helix310 => 'G',
            Self::HelixPi => 'I',
            Self::Turn => 'T',
            Self::Bend => 'S',
            Self::Polyproline => 'P',
            Self::Coil => '-',
        }
    }

    /// Human-readable name used in the legend
    pub fn name(self) -> &'static str {
        match self {
            Self::Helix => "Alpha helix",
            Self::Bridge => "Beta bridge",
            Self::Strand => "Beta strand",
            Self::Helix310 => "3-10 helix",
            Self::HelixPi => "Pi helix",
            Self::Turn => "Turn",
            Self::Bend => "Bend",
            Self::Polyproline => "Polyproline II",
            Self::Coil => "Coil",
        }
    }

    /// Labels whose runs are numbered in the annotation band (H1, E2, ...).
    #[inline]
    pub fn is_counted(self) -> bool {
        matches!(self, Self::Helix | Self::Strand | Self::Bridge)
    }

    /// Labels drawn with an arrow head on the last residue of a run.
    #[inline]
    pub fn has_terminal_variant(self) -> bool {
        matches!(self, Self::Strand | Self::Bridge)
    }

    /// Glyph used for a residue of this label.
    ///
    /// `run_end` selects the arrow variant when the label has one.
    pub fn glyph(self, run_end: bool) -> GlyphKey {
        match (self, run_end) {
            (Self::Helix, _) => GlyphKey::Helix,
            (Self::Bridge, false) => GlyphKey::Bridge,
            (Self::Bridge, true) => GlyphKey::BridgeEnd,
            (Self::Strand, false) => GlyphKey::Strand,
            (Self::Strand, true) => GlyphKey::StrandEnd,
            (Self::Helix310, _) => GlyphKey::Helix310,
            (Self::HelixPi, _) => GlyphKey::HelixPi,
            (Self::Turn, _) => GlyphKey::Turn,
            (Self::Bend, _) => GlyphKey::Bend,
            (Self::Polyproline, _) => GlyphKey::Polyproline,
            (Self::Coil, _) => GlyphKey::Coil,
        }
    }

    /// Glyph shown for this label in the legend.
    pub fn legend_glyph(self) -> GlyphKey {
        self.glyph(self.has_terminal_variant())
    }
}

impl fmt::Display for StructureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One of the eleven drawable glyph variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GlyphKey {
    Helix,
    Strand,
    StrandEnd,
    Bridge,
    BridgeEnd,
    HelixPi,
    Turn,
    Bend,
    Helix310,
    Coil,
    Polyproline,
}

impl GlyphKey {
    pub const ALL: [GlyphKey; 11] = [
        GlyphKey::Helix,
        GlyphKey::Strand,
        GlyphKey::StrandEnd,
        GlyphKey::Bridge,
        GlyphKey::BridgeEnd,
        GlyphKey::HelixPi,
        GlyphKey::Turn,
        GlyphKey::Bend,
        GlyphKey::Helix310,
        GlyphKey::Coil,
        GlyphKey::Polyproline,
    ];

    /// Short key, e.g. `E_A` for the strand arrow.
    pub fn key(self) -> &'static str {
        match self {
            Self::Helix => "H",
            Self::Strand => "E",
            Self::StrandEnd => "E_A",
            Self::Bridge => "B",
            Self::BridgeEnd => "B_A",
            Self::HelixPi => "I",
            Self::Turn => "T",
            Self::Bend => "S",
            Self::Helix310 => "G",
            Self::Coil => "-",
            Self::Polyproline => "P",
        }
    }

    /// Style registry entry name, e.g. `E_A_COLOR`.
    pub fn registry_key(self) -> String {
        format!("{}_COLOR", self.key())
    }
}

impl fmt::Display for GlyphKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_the_alphabet() {
        for label in StructureLabel::ALL {
            assert_eq!(StructureLabel::from_code(label.code()), Some(label));
        }
    }

    #[test]
    fn codes_outside_the_alphabet_are_rejected() {
        for code in ['X', 'h', ' ', 'L', '?'] {
            assert_eq!(StructureLabel::from_code(code), None, "code {code:?}");
        }
    }

    #[test]
    fn only_strand_and_bridge_have_arrows() {
        let with_arrow: Vec<_> = StructureLabel::ALL
            .into_iter()
            .filter(|l| l.has_terminal_variant())
            .collect();
        assert_eq!(with_arrow, vec![StructureLabel::Bridge, StructureLabel::Strand]);
        assert_eq!(StructureLabel::Helix.glyph(true), GlyphKey::Helix);
        assert_eq!(StructureLabel::Strand.glyph(true), GlyphKey::StrandEnd);
        assert_eq!(StructureLabel::Bridge.glyph(false), GlyphKey::Bridge);
    }

    #[test]
    fn glyph_keys_cover_eleven_distinct_registry_entries() {
        let mut keys: Vec<String> = GlyphKey::ALL.iter().map(|g| g.registry_key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 11);
        assert_eq!(GlyphKey::StrandEnd.registry_key(), "E_A_COLOR");
        assert_eq!(GlyphKey::Coil.registry_key(), "-_COLOR");
    }

    #[test]
    fn legend_shows_the_arrow_only_for_arrow_labels() {
        for label in StructureLabel::ALL {
            assert_eq!(label.legend_glyph() != label.glyph(false), label.has_terminal_variant());
        }
    }
}
