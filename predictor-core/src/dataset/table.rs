//! Training/testing table readers

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use ndarray::{Array2, ArrayView2, Axis};

use super::LABEL_COLUMN;
use crate::catalog::{normalize_symptom, SymptomCatalog};
use crate::error::DataError;
use crate::vector::PresenceVector;

// ============================================================================
// FEATURE TABLE
// ============================================================================

/// Presence matrix plus one label per row, aligned to a catalog layout
#[derive(Debug, Clone)]
pub struct FeatureTable {
    layout_hash: u32,
    features: Array2<u8>,
    labels: Vec<String>,
}

impl FeatureTable {
    /// Read a labeled table (e.g. `Testing.csv`) and align its columns to
    /// `catalog`. Column order in the file does not matter, but every catalog
    /// symptom must be present.
    pub fn from_path(path: &Path, catalog: &SymptomCatalog) -> Result<Self, DataError> {
        Self::from_csv(open_csv(path)?, catalog)
    }

    pub fn from_reader<R: Read>(reader: R, catalog: &SymptomCatalog) -> Result<Self, DataError> {
        Self::from_csv(csv_reader(reader), catalog)
    }

    fn from_csv<R: Read>(mut reader: Reader<R>, catalog: &SymptomCatalog) -> Result<Self, DataError> {
        let headers = clean_headers(reader.headers()?);
        let label_idx = label_column(&headers)?;

        let by_name: BTreeMap<String, usize> = headers
            .iter()
            .enumerate()
            .filter(|(i, h)| *i != label_idx && !h.is_empty())
            .map(|(i, h)| (normalize_symptom(h), i))
            .collect();

        let columns = catalog
            .names()
            .iter()
            .map(|name| {
                by_name
                    .get(name)
                    .copied()
                    .ok_or_else(|| DataError::MissingSymptomColumn(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (features, labels) = read_rows(&mut reader, &headers, &columns, label_idx)?;
        Ok(Self {
            layout_hash: catalog.layout_hash(),
            features,
            labels,
        })
    }

    pub fn layout_hash(&self) -> u32 {
        self.layout_hash
    }

    pub fn features(&self) -> ArrayView2<'_, u8> {
        self.features.view()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Row `index` as a presence vector
    pub fn vector(&self, index: usize) -> Option<PresenceVector> {
        (index < self.len()).then(|| {
            PresenceVector::from_row(self.layout_hash, self.features.row(index).iter().copied())
        })
    }

    /// Rows at `indices`, in the given order
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            layout_hash: self.layout_hash,
            features: self.features.select(Axis(0), indices),
            labels: indices.iter().map(|&i| self.labels[i].clone()).collect(),
        }
    }
}

// ============================================================================
// TRAINING SET
// ============================================================================

/// Training table: its header defines the symptom catalog.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    catalog: SymptomCatalog,
    table: FeatureTable,
}

impl TrainingSet {
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        Self::from_csv(open_csv(path)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataError> {
        Self::from_csv(csv_reader(reader))
    }

    fn from_csv<R: Read>(mut reader: Reader<R>) -> Result<Self, DataError> {
        let headers = clean_headers(reader.headers()?);
        let label_idx = label_column(&headers)?;

        // Unnamed (empty) header cells are padding, not symptoms
        let columns: Vec<usize> = headers
            .iter()
            .enumerate()
            .filter(|(i, h)| *i != label_idx && !h.is_empty())
            .map(|(i, _)| i)
            .collect();

        let catalog = SymptomCatalog::new(columns.iter().filter_map(|&i| headers.get(i)))?;
        let (features, labels) = read_rows(&mut reader, &headers, &columns, label_idx)?;
        if labels.is_empty() {
            return Err(DataError::EmptyDataset);
        }

        log::debug!(
            "Training table: {} rows x {} symptoms",
            labels.len(),
            catalog.len()
        );

        let table = FeatureTable {
            layout_hash: catalog.layout_hash(),
            features,
            labels,
        };
        Ok(Self { catalog, table })
    }

    pub fn catalog(&self) -> &SymptomCatalog {
        &self.catalog
    }

    pub fn table(&self) -> &FeatureTable {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// For every label, the catalog symptoms seen in at least one of its rows.
    ///
    /// Symptoms are listed in catalog order.
    pub fn symptom_profiles(&self) -> BTreeMap<String, Vec<String>> {
        let width = self.catalog.len();
        let mut seen: BTreeMap<&str, Vec<bool>> = BTreeMap::new();

        for (row, label) in self.table.features.rows().into_iter().zip(&self.table.labels) {
            let flags = seen.entry(label.as_str()).or_insert_with(|| vec![false; width]);
            for (flag, &cell) in flags.iter_mut().zip(row.iter()) {
                *flag |= cell != 0;
            }
        }

        seen.into_iter()
            .map(|(label, flags)| {
                let symptoms = flags
                    .iter()
                    .enumerate()
                    .filter(|(_, present)| **present)
                    .filter_map(|(i, _)| self.catalog.name(i).map(str::to_string))
                    .collect();
                (label.to_string(), symptoms)
            })
            .collect()
    }
}

// ============================================================================
// CSV HELPERS
// ============================================================================

fn csv_reader<R: Read>(reader: R) -> Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader)
}

fn open_csv(path: &Path) -> Result<Reader<std::fs::File>, DataError> {
    ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(|source| DataError::Open {
            path: path.to_path_buf(),
            source,
        })
}

fn clean_headers(headers: &StringRecord) -> Vec<String> {
    let headers = headers
        .iter()
        .map(|h| h.trim_matches('\u{feff}').trim().to_string())
        .collect();
    rename_duplicates(headers)
}

/// Suffix repeated column names as `name.1`, `name.2`, ... so every column
/// keeps its own position. Names are compared in canonical form; a suffixed
/// name that is itself taken gets suffixed again. Empty headers are left alone.
pub(crate) fn rename_duplicates(headers: Vec<String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    headers
        .into_iter()
        .map(|header| {
            if header.is_empty() {
                return header;
            }

            let mut key = normalize_symptom(&header);
            let mut seen = counts.get(&key).copied().unwrap_or(0);
            if seen == 0 {
                counts.insert(key, 1);
                return header;
            }

            while seen > 0 {
                counts.insert(key.clone(), seen + 1);
                key = format!("{}.{}", key, seen);
                seen = counts.get(&key).copied().unwrap_or(0);
            }
            counts.insert(key.clone(), 1);

            log::warn!("Repeated column `{}` renamed to `{}`", header, key);
            key
        })
        .collect()
}

fn label_column(headers: &[String]) -> Result<usize, DataError> {
    headers
        .iter()
        .position(|h| h == LABEL_COLUMN)
        .ok_or_else(|| DataError::MissingLabelColumn(LABEL_COLUMN.to_string()))
}

/// Non-zero number = present. Anything else is a malformed table.
fn parse_cell(value: &str) -> Option<u8> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| u8::from(v != 0.0))
}

fn read_rows<R: Read>(
    reader: &mut Reader<R>,
    headers: &[String],
    columns: &[usize],
    label_idx: usize,
) -> Result<(Array2<u8>, Vec<String>), DataError> {
    let mut flat = Vec::new();
    let mut labels = Vec::new();

    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        let invalid = |col: usize, value: &str| DataError::InvalidCell {
            line,
            column: headers.get(col).cloned().unwrap_or_default(),
            value: value.to_string(),
        };

        for &col in columns {
            let value = record.get(col).unwrap_or_default();
            flat.push(parse_cell(value).ok_or_else(|| invalid(col, value))?);
        }

        let label = record.get(label_idx).unwrap_or_default();
        if label.is_empty() {
            return Err(invalid(label_idx, label));
        }
        labels.push(label.to_string());
    }

    let features = Array2::from_shape_vec((labels.len(), columns.len()), flat)?;
    Ok((features, labels))
}
