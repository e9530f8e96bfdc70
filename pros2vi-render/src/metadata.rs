//! Optional entry metadata
//!
//! Titles, organism names and per-chain accessions are decoration only. A
//! source that cannot answer returns empty metadata and the render goes on.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub scientific_name: Option<String>,
    /// Chain identifier to UniProt accession
    #[serde(default)]
    pub chain_accessions: BTreeMap<String, String>,
}

impl EntryMetadata {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.scientific_name.is_none() && self.chain_accessions.is_empty()
    }

    pub fn accession(&self, chain_id: &str) -> Option<&str> {
        self.chain_accessions.get(chain_id).map(String::as_str)
    }
}

pub trait MetadataSource {
    /// Metadata for entry `id`; never fails, absent fields are `None`.
    fn lookup(&self, id: &str) -> EntryMetadata;
}

/// Source that knows nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetadata;

impl MetadataSource for NoMetadata {
    fn lookup(&self, _id: &str) -> EntryMetadata {
        EntryMetadata::default()
    }
}

/// JSON file mapping entry identifiers to metadata:
///
/// ```json
/// { "1ABC": { "title": "...", "scientific_name": "Homo sapiens",
///             "chain_accessions": { "A": "P69905" } } }
/// ```
#[derive(Debug, Clone)]
pub struct JsonMetadata {
    path: PathBuf,
}

impl JsonMetadata {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    fn load(&self) -> Result<BTreeMap<String, EntryMetadata>, String> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| e.to_string())?;
        serde_json::from_str(&content).map_err(|e| e.to_string())
    }
}

impl MetadataSource for JsonMetadata {
    fn lookup(&self, id: &str) -> EntryMetadata {
        let entries = match self.load() {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Ignoring metadata file {}: {}", self.path.display(), e);
                return EntryMetadata::default();
            }
        };

        match entries.into_iter().find(|(key, _)| key.eq_ignore_ascii_case(id)) {
            Some((_, entry)) => entry,
            None => {
                log::debug!("No metadata for {} in {}", id, self.path.display());
                EntryMetadata::default()
            }
        }
    }
}
