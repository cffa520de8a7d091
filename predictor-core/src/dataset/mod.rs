//! Dataset Module - Training and Testing Tables
//!
//! Reads the symptom-presence tables the classifier is fitted and scored on.
//! Each table has one column per catalog symptom plus a `prognosis` label
//! column; cells are numbers, non-zero meaning the symptom is present.

pub mod split;
pub mod table;


use std::path::{Path, PathBuf};

pub use split::{train_validation_split, Split};
pub use table::{FeatureTable, TrainingSet};

/// Name of the label column in the training and testing tables
pub const LABEL_COLUMN: &str = "prognosis";

pub const TRAINING_FILE: &str = "Training.csv";
pub const TESTING_FILE: &str = "Testing.csv";
pub const DESCRIPTION_FILE: &str = "symptom_Description.csv";
pub const PRECAUTION_FILE: &str = "symptom_precaution.csv";
pub const SEVERITY_FILE: &str = "symptom_severity.csv";

/// Locations of every file loaded at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub training: PathBuf,
    pub testing: PathBuf,
    pub descriptions: PathBuf,
    pub precautions: PathBuf,
    pub severity: PathBuf,
}

impl DataPaths {
    /// Standard file names under a data directory (training/testing) and a
    /// master-data directory (reference tables).
    pub fn new(data_dir: impl AsRef<Path>, master_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        let master_dir = master_dir.as_ref();
        Self {
            training: data_dir.join(TRAINING_FILE),
            testing: data_dir.join(TESTING_FILE),
            descriptions: master_dir.join(DESCRIPTION_FILE),
            precautions: master_dir.join(PRECAUTION_FILE),
            severity: master_dir.join(SEVERITY_FILE),
        }
    }
}
