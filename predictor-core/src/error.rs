//! Error types for data loading and model fitting

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading the training or reference tables.
#[derive(Debug, Error)]
pub enum DataError {
    /// File could not be opened.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Row could not be read (I/O, encoding or unequal row length).
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("training table has no `{0}` column")]
    MissingLabelColumn(String),

    #[error("table is missing symptom column `{0}`")]
    MissingSymptomColumn(String),

    #[error("duplicate symptom `{0}` in catalog")]
    DuplicateSymptom(String),

    #[error("symptom catalog is empty")]
    EmptyCatalog,

    #[error("training table has no rows")]
    EmptyDataset,

    /// Cell that is not a number.
    #[error("line {line}: invalid value `{value}` in column `{column}`")]
    InvalidCell {
        line: u64,
        column: String,
        value: String,
    },

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}

/// Errors raised while fitting or wiring the classifier.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("cannot fit a classifier on an empty dataset")]
    EmptyDataset,

    #[error("feature matrix has {rows} rows but {labels} labels")]
    LabelCount { rows: usize, labels: usize },

    #[error("feature width mismatch: expected {expected}, found {found}")]
    WidthMismatch { expected: usize, found: usize },

    /// Catalog and classifier were built from different symptom layouts.
    #[error("symptom layout mismatch: catalog {catalog:#010x}, classifier {classifier:#010x}")]
    LayoutMismatch { catalog: u32, classifier: u32 },
}

/// Top-level error for [`crate::PredictionService::bootstrap`].
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
