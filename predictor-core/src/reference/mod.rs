//! Reference Data Store - Disease Descriptions, Precautions, Symptom Severity
//!
//! Three read-only lookups built once at startup. A missing key is a normal
//! answer (`None`), never an error.

pub mod loader;


use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::catalog::normalize_symptom;
use crate::error::DataError;

pub use loader::{
    load_descriptions, load_precautions, load_severity, LoadReport, Loaded, SkipReason, SkippedRow,
};

#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    descriptions: HashMap<String, String>,
    precautions: HashMap<String, Vec<String>>,
    severity: HashMap<String, i32>,
}

impl ReferenceData {
    /// Build from ready-made tables. Severity keys are canonicalized like
    /// catalog symptoms.
    pub fn new(
        descriptions: HashMap<String, String>,
        precautions: HashMap<String, Vec<String>>,
        severity: HashMap<String, i32>,
    ) -> Self {
        let severity = severity
            .into_iter()
            .map(|(symptom, score)| (normalize_symptom(&symptom), score))
            .collect();
        Self {
            descriptions,
            precautions,
            severity,
        }
    }

    /// Load the three reference tables from disk.
    pub fn from_paths(
        descriptions: &Path,
        precautions: &Path,
        severity: &Path,
    ) -> Result<Self, DataError> {
        log::info!("Loading reference tables...");
        Self::from_readers(open(descriptions)?, open(precautions)?, open(severity)?)
    }

    /// Load the three reference tables from any readers.
    ///
    /// Malformed rows are skipped and logged; only I/O and encoding failures
    /// abort loading.
    pub fn from_readers<D: Read, P: Read, S: Read>(
        descriptions: D,
        precautions: P,
        severity: S,
    ) -> Result<Self, DataError> {
        let descriptions = load_descriptions(descriptions)?;
        let precautions = load_precautions(precautions)?;
        let severity = load_severity(severity)?;

        for report in [&descriptions.report, &precautions.report, &severity.report] {
            report.log_summary();
        }

        Ok(Self::new(
            descriptions.entries,
            precautions.entries,
            severity.entries,
        ))
    }

    pub fn description(&self, disease: &str) -> Option<&str> {
        self.descriptions.get(disease).map(String::as_str)
    }

    pub fn precautions(&self, disease: &str) -> Option<&[String]> {
        self.precautions.get(disease).map(Vec::as_slice)
    }

    pub fn severity(&self, symptom: &str) -> Option<i32> {
        self.severity.get(&normalize_symptom(symptom)).copied()
    }

    pub fn description_count(&self) -> usize {
        self.descriptions.len()
    }

    pub fn precaution_count(&self) -> usize {
        self.precautions.len()
    }

    pub fn severity_count(&self) -> usize {
        self.severity.len()
    }
}

fn open(path: &Path) -> Result<File, DataError> {
    File::open(path).map_err(|e| DataError::Open {
        path: path.to_path_buf(),
        source: e.into(),
    })
}
