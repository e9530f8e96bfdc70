//! Structure-assignment readers
//!
//! Both readers produce raw [`AssignedResidue`] records; label validation
//! happens in [`crate::Structure::from_assignments`].

pub mod dssp;
pub mod table;

pub use dssp::DsspReader;
pub use table::TableReader;

use std::path::Path;

use crate::error::CoreResult;
use crate::types::AssignedResidue;

/// Read an assignment file, choosing the reader from its extension.
pub fn read_assignments<P: AsRef<Path>>(path: P) -> CoreResult<Vec<AssignedResidue>> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "dssp" | "mkdssp" => DsspReader::read_file(path),
        _ => TableReader::read_file(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn table_is_the_fallback_format() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "B 3 G E").unwrap();
        let records = read_assignments(file.path()).unwrap();
        assert_eq!(records, vec![AssignedResidue::new("B", 3, 'G', 'E')]);
    }

    #[test]
    fn dssp_extension_selects_the_dssp_reader() {
        let mut file = tempfile::Builder::new().suffix(".DSSP").tempfile().unwrap();
        writeln!(file, "  #  RESIDUE AA STRUCTURE").unwrap();
        writeln!(file, "    1    1 A M  H").unwrap();
        let records = read_assignments(file.path()).unwrap();
        assert_eq!(records, vec![AssignedResidue::new("A", 1, 'M', 'H')]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_assignments("/nonexistent/input.dssp").unwrap_err();
        assert!(matches!(err, crate::CoreError::Io(_)));
    }
}
