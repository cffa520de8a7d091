use serde::{Deserialize, Serialize};

/// Catalog symptoms in vector order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomsResponse {
    pub symptoms: Vec<String>,
}
