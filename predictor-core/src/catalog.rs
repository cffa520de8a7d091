//! Symptom Catalog - Feature Layout of the Classifier
//!
//! **The catalog controls the presence-vector schema.**
//!
//! The order of symptom columns in the training table fixes the index of every
//! symptom in a [`PresenceVector`](crate::PresenceVector). A vector built
//! against one catalog must only ever reach the classifier trained with that
//! same catalog; the CRC32 layout hash is carried on both sides to enforce it.

use std::collections::HashMap;

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Canonical form of a symptom name: surrounding whitespace trimmed, lowercased.
pub fn normalize_symptom(raw: &str) -> String {
    raw.trim().to_lowercase()
}

// ============================================================================
// CATALOG
// ============================================================================

/// Ordered, de-duplicated list of canonical symptom names.
#[derive(Debug, Clone)]
pub struct SymptomCatalog {
    names: Vec<String>,
    index: HashMap<String, usize>,
    layout_hash: u32,
}

impl SymptomCatalog {
    /// Build a catalog from symptom names in column order.
    ///
    /// Names are canonicalized with [`normalize_symptom`]. Two names that
    /// collapse to the same canonical form are rejected, since they would
    /// share one vector position.
    pub fn new<I, S>(names: I) -> Result<Self, DataError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ordered = Vec::new();
        let mut index = HashMap::new();

        for name in names {
            let name = normalize_symptom(name.as_ref());
            if index.insert(name.clone(), ordered.len()).is_some() {
                return Err(DataError::DuplicateSymptom(name));
            }
            ordered.push(name);
        }

        if ordered.is_empty() {
            return Err(DataError::EmptyCatalog);
        }

        let layout_hash = compute_layout_hash(&ordered);
        Ok(Self {
            names: ordered,
            index,
            layout_hash,
        })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Symptom names in vector order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Position of an already-canonical symptom name
    pub fn index_of(&self, canonical: &str) -> Option<usize> {
        self.index.get(canonical).copied()
    }

    /// Symptom name at a vector position
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn layout_hash(&self) -> u32 {
        self.layout_hash
    }

    pub fn info(&self) -> CatalogInfo {
        CatalogInfo {
            symptom_count: self.len(),
            layout_hash: self.layout_hash,
        }
    }
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over the names in order, NUL-separated
fn compute_layout_hash(names: &[String]) -> u32 {
    let mut hasher = Hasher::new();
    for name in names {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }
    hasher.finalize()
}

/// Catalog summary for logging and status endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogInfo {
    pub symptom_count: usize,
    pub layout_hash: u32,
}

// ============================================================================
// TESTS
// ============================================================================
