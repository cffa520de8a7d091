//! Presence Vector - Classifier Input
//!
//! One 0/1 slot per catalog symptom, tagged with the layout hash of the
//! catalog that built it. Vectors are created per request and dropped after
//! the prediction.

use serde::Serialize;

use crate::catalog::{normalize_symptom, SymptomCatalog};

// ============================================================================
// PRESENCE VECTOR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PresenceVector {
    /// CRC32 of the catalog this vector was built against
    layout_hash: u32,
    /// 1 = symptom present, in catalog order
    values: Vec<u8>,
}

impl PresenceVector {
    /// All-zero vector for a catalog
    pub fn zeroed(catalog: &SymptomCatalog) -> Self {
        Self {
            layout_hash: catalog.layout_hash(),
            values: vec![0; catalog.len()],
        }
    }

    /// Wrap a feature row already aligned to a catalog. Non-zero cells become 1.
    pub(crate) fn from_row(layout_hash: u32, row: impl IntoIterator<Item = u8>) -> Self {
        Self {
            layout_hash,
            values: row.into_iter().map(|v| u8::from(v != 0)).collect(),
        }
    }

    pub fn layout_hash(&self) -> u32 {
        self.layout_hash
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_present(&self, index: usize) -> bool {
        self.values.get(index).is_some_and(|&v| v != 0)
    }

    /// Mark a position present; out-of-range indices are ignored
    pub fn set(&mut self, index: usize) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = 1;
        }
    }

    /// Positions set to 1, ascending
    pub fn present_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0)
            .map(|(i, _)| i)
    }

    pub fn count_present(&self) -> usize {
        self.present_indices().count()
    }
}

// ============================================================================
// VECTORIZER
// ============================================================================

/// Result of vectorizing one symptom list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vectorized {
    pub vector: PresenceVector,
    /// Normalized tokens that matched no catalog symptom, in input order
    pub unrecognized: Vec<String>,
}

/// Encode raw symptom strings as a presence vector.
///
/// Each token is trimmed and lowercased. Known symptoms set their position
/// (repeats are harmless); unknown ones are collected in
/// [`Vectorized::unrecognized`] and logged, never rejected. Blank tokens are
/// ignored. An empty list yields the all-zero vector.
pub fn vectorize<I, S>(catalog: &SymptomCatalog, symptoms: I) -> Vectorized
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut vector = PresenceVector::zeroed(catalog);
    let mut unrecognized = Vec::new();

    for raw in symptoms {
        let token = normalize_symptom(raw.as_ref());
        if token.is_empty() {
            continue;
        }
        match catalog.index_of(&token) {
            Some(index) => vector.set(index),
            None => unrecognized.push(token),
        }
    }

    if !unrecognized.is_empty() {
        log::warn!(
            "The following symptoms were not found in the training data: {}",
            unrecognized.join(", ")
        );
    }

    Vectorized {
        vector,
        unrecognized,
    }
}

// ============================================================================
// TESTS
// ============================================================================
