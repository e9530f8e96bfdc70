//! DSSP classic output reader
//!
//! Reads the residue section of a `.dssp` file (as written by `mkdssp` in
//! classic mode). Only the columns needed for the structure map are used:
//! chain identifier, amino-acid code and the secondary structure summary.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{CoreError, CoreResult};
use crate::types::AssignedResidue;

const RESIDUE_HEADER: &str = "  #  RESIDUE";
const RESNUM_COLUMNS: std::ops::Range<usize> = 5..10;
const CHAIN_COLUMN: usize = 11;
const AA_COLUMN: usize = 13;
const STRUCTURE_COLUMN: usize = 16;

pub struct DsspReader;

impl DsspReader {
    pub fn read_file<P: AsRef<Path>>(path: P) -> CoreResult<Vec<AssignedResidue>> {
        let file = File::open(&path)?;
        log::info!("Reading DSSP assignment from {}", path.as_ref().display());
        Self::read(BufReader::new(file))
    }

    pub fn read<R: BufRead>(reader: R) -> CoreResult<Vec<AssignedResidue>> {
        let mut records = Vec::new();
        let mut in_residues = false;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = index + 1;

            if !in_residues {
                in_residues = line.starts_with(RESIDUE_HEADER);
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }
            if let Some(record) = Self::parse_line(&line, line_no)? {
                records.push(record);
            }
        }

        if !in_residues {
            return Err(CoreError::parse(0, "no residue section found in DSSP input"));
        }
        Ok(records)
    }

    /// Parse one residue line. Chain-break lines yield `None`.
    pub fn parse_line(line: &str, line_no: usize) -> CoreResult<Option<AssignedResidue>> {
        let columns: Vec<char> = line.chars().collect();
        let column = |at: usize| columns.get(at).copied();

        let aa = column(AA_COLUMN)
            .ok_or_else(|| CoreError::parse(line_no, "residue line too short"))?;
        if aa == '!' {
            return Ok(None);
        }

        let chain_id = column(CHAIN_COLUMN)
            .filter(|c| !c.is_whitespace())
            .ok_or_else(|| CoreError::parse(line_no, "missing chain identifier"))?;

        let resnum: String = columns
            .get(RESNUM_COLUMNS)
            .map(|cs| cs.iter().collect())
            .unwrap_or_default();
        let position = resnum
            .trim()
            .parse::<i64>()
            .map_err(|_| CoreError::parse(line_no, format!("invalid residue number '{}'", resnum.trim())))?;

        // Blank structure column means no assignment
        let label = match column(STRUCTURE_COLUMN) {
            None | Some(' ') => '-',
            Some(code) => code,
        };

        Ok(Some(AssignedResidue {
            chain_id: chain_id.to_string(),
            position: position.max(0) as usize,
            display_name: normalize_amino_acid(aa),
            label,
        }))
    }
}

/// Lower-case letters mark half-cystines of a disulfide bridge.
fn normalize_amino_acid(aa: char) -> char {
    if aa.is_ascii_lowercase() {
        'C'
    } else {
        aa
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
==== Secondary Structure Definition by the program DSSP ==== DATE=2024-01-01
HEADER    TEST
  #  RESIDUE AA STRUCTURE BP1 BP2  ACC     N-H-->O    O-->H-N    N-H-->O    O-->H-N    TCO  KAPPA ALPHA  PHI   PSI    X-CA   Y-CA   Z-CA
    1    1 A M              0   0  120      0, 0.0     2,-0.2     0, 0.0     0, 0.0   0.000 360.0 360.0 360.0 -48.2    1.0    2.0    3.0
    2    2 A K  H  >  S+     0   0  100      0, 0.0     2,-0.2     0, 0.0     0, 0.0   0.000 360.0 360.0 360.0 -48.2    1.0    2.0    3.0
    3    3 A a  E     -a   10   0   40      0, 0.0     2,-0.2     0, 0.0     0, 0.0   0.000 360.0 360.0 360.0 -48.2    1.0    2.0    3.0
    4        !              0   0    0      0, 0.0     0, 0.0     0, 0.0     0, 0.0   0.000 360.0 360.0 360.0 360.0    0.0    0.0    0.0
    5   10 B G  T  3  S+     0   0   10      0, 0.0     2,-0.2     0, 0.0     0, 0.0   0.000 360.0 360.0 360.0 -48.2    1.0    2.0    3.0
";

    #[test]
    fn reads_residue_section() {
        let records = DsspReader::read(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(
            records,
            vec![
                AssignedResidue::new("A", 1, 'M', '-'),
                AssignedResidue::new("A", 2, 'K', 'H'),
                AssignedResidue::new("A", 3, 'C', 'E'),
                AssignedResidue::new("B", 10, 'G', 'T'),
            ]
        );
    }

    #[test]
    fn missing_header_is_a_parse_error() {
        let err = DsspReader::read(Cursor::new("HEADER only\n")).unwrap_err();
        assert!(matches!(err, CoreError::Parse { .. }));
    }

    #[test]
    fn short_line_is_reported_with_its_number() {
        let input = format!("{RESIDUE_HEADER} AA\n    1    1 A\n");
        match DsspReader::read(Cursor::new(input)).unwrap_err() {
            CoreError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
