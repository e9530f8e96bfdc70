//! Plain assignment table reader
//!
//! One residue per line, whitespace separated:
//!
//! ```text
//! # chain position name label
//! A 1 M -
//! A 2 K H
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{CoreError, CoreResult};
use crate::types::AssignedResidue;

pub struct TableReader;

impl TableReader {
    pub fn read_file<P: AsRef<Path>>(path: P) -> CoreResult<Vec<AssignedResidue>> {
        let file = File::open(&path)?;
        log::info!("Reading assignment table from {}", path.as_ref().display());
        Self::read(BufReader::new(file))
    }

    pub fn read<R: BufRead>(reader: R) -> CoreResult<Vec<AssignedResidue>> {
        let mut records = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let content = line.split('#').next().unwrap_or("").trim();
            if content.is_empty() {
                continue;
            }
            records.push(Self::parse_line(content, index + 1)?);
        }
        Ok(records)
    }

    pub fn parse_line(line: &str, line_no: usize) -> CoreResult<AssignedResidue> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 4 {
            return Err(CoreError::parse(
                line_no,
                format!("expected 4 fields (chain position name label), got {}", fields.len()),
            ));
        }

        let position = fields[1]
            .parse::<usize>()
            .map_err(|_| CoreError::parse(line_no, format!("invalid position '{}'", fields[1])))?;
        let display_name = single_char(fields[2])
            .ok_or_else(|| CoreError::parse(line_no, format!("residue name must be one character, got '{}'", fields[2])))?;
        let label = single_char(fields[3])
            .ok_or_else(|| CoreError::parse(line_no, format!("label must be one character, got '{}'", fields[3])))?;

        Ok(AssignedResidue::new(fields[0], position, display_name, label))
    }
}

fn single_char(field: &str) -> Option<char> {
    let mut chars = field.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn skips_comments_and_blank_lines() {
        let input = "# chain position name label\n\nA 1 M -\nA 2 K H   # helix start\n";
        let records = TableReader::read(Cursor::new(input)).unwrap();
        assert_eq!(
            records,
            vec![AssignedResidue::new("A", 1, 'M', '-'), AssignedResidue::new("A", 2, 'K', 'H')]
        );
    }

    #[test]
    fn labels_are_not_validated_here() {
        let records = TableReader::read(Cursor::new("A 1 M X\n")).unwrap();
        assert_eq!(records[0].label, 'X');
    }

    #[test]
    fn malformed_lines_report_their_number() {
        for bad in ["A 1 M\n", "A one M H\n", "A 1 MK H\n", "A 1 M HE\n"] {
            let input = format!("A 1 M -\n{bad}");
            match TableReader::read(Cursor::new(input)).unwrap_err() {
                CoreError::Parse { line, .. } => assert_eq!(line, 2, "input {bad:?}"),
                other => panic!("unexpected error: {other}"),
            }
        }
    }
}
