//! Bacteria reference catalog.

use surveillance_api::CatalogConfig;
use surveillance_spi::{BacteriumProfile, RawTable, Result, SurveillanceError};

/// Reference sheets keyed by bacterium category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BacteriaCatalog {
    profiles: Vec<BacteriumProfile>,
}

impl BacteriaCatalog {
    /// Load profiles from a table. Rows without a category are skipped.
    pub fn from_table(table: &RawTable, config: &CatalogConfig) -> Result<Self> {
        let table = table.with_trimmed_headers();
        let category = table
            .column_index(&config.category_column)
            .ok_or_else(|| SurveillanceError::schema(config.category_column.as_str()))?;
        let key = table
            .column_index(&config.key_antibiotics_column)
            .ok_or_else(|| SurveillanceError::schema(config.key_antibiotics_column.as_str()))?;
        let other = table.column_index(&config.other_antibiotics_column);
        let phenotype = table.column_index(&config.phenotype_column);

        let optional = |row: usize, column: Option<usize>| {
            column
                .and_then(|column| table.cell(row, column))
                .filter(|cell| !cell.is_empty())
                .map(str::to_string)
        };

        let profiles = (0..table.row_count())
            .filter_map(|row| {
                let name = table.cell(row, category).filter(|cell| !cell.is_empty())?;
                Some(BacteriumProfile {
                    category: name.to_string(),
                    key_antibiotics: table.cell(row, key).unwrap_or("").to_string(),
                    other_antibiotics: optional(row, other),
                    phenotype: optional(row, phenotype),
                })
            })
            .collect();

        Ok(Self { profiles })
    }

    pub fn profiles(&self) -> &[BacteriumProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Profiles whose category contains `query`, ignoring case. The query is
    /// a literal substring; an empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&BacteriumProfile> {
        let query = query.to_lowercase();
        self.profiles
            .iter()
            .filter(|p| p.category.to_lowercase().contains(&query))
            .collect()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for profile in &self.profiles {
            if !seen.contains(&profile.category.as_str()) {
                seen.push(profile.category.as_str());
            }
        }
        seen
    }

    /// First profile recorded for `category`.
    pub fn get(&self, category: &str) -> Option<&BacteriumProfile> {
        self.profiles.iter().find(|p| p.category == category)
    }
}
