//! Bacteria catalog entry.

use serde::{Deserialize, Serialize};

/// Reference sheet for one bacterium category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacteriumProfile {
    pub category: String,
    pub key_antibiotics: String,
    pub other_antibiotics: Option<String>,
    pub phenotype: Option<String>,
}
