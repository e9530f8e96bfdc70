//! Residues, chains and whole structures
//!
//! Raw assignment records are validated against the label alphabet here.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::label::StructureLabel;

/// Raw per-residue record as produced by the structure-assignment source.
///
/// The label is still an unchecked character here; [`Structure::from_assignments`]
/// validates it against the alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedResidue {
    pub chain_id: String,
    pub position: usize,
    pub display_name: char,
    pub label: char,
}

impl AssignedResidue {
    pub fn new(chain_id: impl Into<String>, position: usize, display_name: char, label: char) -> Self {
        Self { chain_id: chain_id.into(), position, display_name, label }
    }
}

/// A validated residue within a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Residue {
    /// 1-based position within the chain
    pub position: usize,
    pub display_name: char,
    pub label: StructureLabel,
}

/// Ordered residues sharing one chain identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    pub id: String,
    residues: Vec<Residue>,
}

impl Chain {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), residues: Vec::new() }
    }

    /// Build a chain from a one-letter sequence and a matching string of DSSP codes.
    pub fn from_codes(id: impl Into<String>, sequence: &str, codes: &str) -> CoreResult<Self> {
        let id = id.into();
        let names: Vec<char> = sequence.chars().collect();
        let labels: Vec<char> = codes.chars().collect();
        if names.len() != labels.len() {
            return Err(CoreError::invalid_parameter(format!(
                "chain {id}: sequence has {} residues but {} labels were given",
                names.len(),
                labels.len()
            )));
        }

        let mut chain = Chain::new(id);
        for (name, code) in names.into_iter().zip(labels) {
            chain.push_code(name, code)?;
        }
        Ok(chain)
    }

    /// Append a residue, validating its label code.
    pub fn push_code(&mut self, display_name: char, code: char) -> CoreResult<()> {
        let position = self.residues.len() + 1;
        let label = StructureLabel::from_code(code).ok_or_else(|| CoreError::UnknownLabel {
            chain_id: self.id.clone(),
            position,
            label: code,
        })?;
        self.push(display_name, label);
        Ok(())
    }

    pub fn push(&mut self, display_name: char, label: StructureLabel) {
        let position = self.residues.len() + 1;
        self.residues.push(Residue { position, display_name, label });
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

/// All chains of one structure, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub chains: Vec<Chain>,
}

impl Structure {
    pub fn new(chains: Vec<Chain>) -> Self {
        Self { chains }
    }

    /// Group raw assignment records into validated chains.
    ///
    /// Residues are renumbered from 1 in the order they arrive; the first
    /// unknown label aborts the whole structure.
    pub fn from_assignments<I>(records: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = AssignedResidue>,
    {
        let mut chains: Vec<Chain> = Vec::new();
        for record in records {
            let label = StructureLabel::from_code(record.label).ok_or_else(|| CoreError::UnknownLabel {
                chain_id: record.chain_id.clone(),
                position: record.position,
                label: record.label,
            })?;

            let index = match chains.iter().position(|c| c.id == record.chain_id) {
                Some(index) => index,
                None => {
                    chains.push(Chain::new(record.chain_id.clone()));
                    chains.len() - 1
                }
            };
            chains[index].push(record.display_name, label);
        }

        log::debug!(
            "Loaded {} chains ({} residues)",
            chains.len(),
            chains.iter().map(Chain::len).sum::<usize>()
        );
        Ok(Self { chains })
    }

    pub fn chain_lengths(&self) -> Vec<usize> {
        self.chains.iter().map(Chain::len).collect()
    }

    pub fn residue_count(&self) -> usize {
        self.chains.iter().map(Chain::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.iter().all(Chain::is_empty)
    }
}
