//! Surveillance API
//!
//! Configuration types and builders for the surveillance engine.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

// Re-export SPI types
pub use surveillance_spi::{PeriodKind, Result, SurveillanceError};

// ============================================================================
// Normalizer Configuration
// ============================================================================

/// Handling of rows that share a period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep every row in source order.
    #[default]
    Keep,
    /// Keep only the last row seen for each period.
    LastWins,
    /// Fail the request.
    Reject,
}

/// Series normalizer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Accepted names for the period column, tried against headers in order.
    pub period_aliases: Vec<String>,
    /// Representation of the period column.
    pub period_kind: PeriodKind,
    /// Metric columns are those whose name starts with this marker.
    pub metric_prefix: String,
    pub duplicates: DuplicatePolicy,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self::antibiotics()
    }
}

impl NormalizerConfig {
    pub fn new(period_aliases: &[&str], period_kind: PeriodKind, metric_prefix: &str) -> Self {
        Self {
            period_aliases: period_aliases.iter().map(|s| s.to_string()).collect(),
            period_kind,
            metric_prefix: metric_prefix.to_string(),
            duplicates: DuplicatePolicy::Keep,
        }
    }

    /// Week-numbered resistance tables.
    pub fn antibiotics() -> Self {
        Self::new(&["Week", "Semaine", "week", "semaine"], PeriodKind::Week, "%")
    }

    /// Date-indexed phenotype share tables.
    pub fn phenotypes() -> Self {
        Self::new(&["week"], PeriodKind::Date, "%")
    }

    /// Set the duplicate-period policy.
    pub fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }
}

/// Builder for NormalizerConfig.
#[derive(Debug, Default)]
pub struct NormalizerConfigBuilder {
    period_aliases: Vec<String>,
    period_kind: Option<PeriodKind>,
    metric_prefix: Option<String>,
    duplicates: Option<DuplicatePolicy>,
}

impl NormalizerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an accepted period column name.
    pub fn period_alias(mut self, alias: &str) -> Self {
        self.period_aliases.push(alias.to_string());
        self
    }

    pub fn period_kind(mut self, kind: PeriodKind) -> Self {
        self.period_kind = Some(kind);
        self
    }

    pub fn metric_prefix(mut self, prefix: &str) -> Self {
        self.metric_prefix = Some(prefix.to_string());
        self
    }

    pub fn duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = Some(duplicates);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<NormalizerConfig> {
        if self.period_aliases.is_empty() {
            return Err(SurveillanceError::InvalidParameter {
                name: "period_aliases".to_string(),
                reason: "at least one alias is required".to_string(),
            });
        }
        Ok(NormalizerConfig {
            period_aliases: self.period_aliases,
            period_kind: self.period_kind.unwrap_or(PeriodKind::Week),
            metric_prefix: self.metric_prefix.unwrap_or_else(|| "%".to_string()),
            duplicates: self.duplicates.unwrap_or_default(),
        })
    }
}

// ============================================================================
// Band Configuration
// ============================================================================

/// Robust-band analyzer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandConfig {
    /// IQR multiplier for the fences (default: 1.5).
    pub multiplier: f64,
    /// Lowest allowed lower fence (default: 0.0, the percentage floor).
    pub floor: Option<f64>,
    /// IQR multiplier beyond which an alert is critical (default: 3.0).
    pub severe_multiplier: f64,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            multiplier: 1.5,
            floor: Some(0.0),
            severe_multiplier: 3.0,
        }
    }
}

impl BandConfig {
    pub fn new(multiplier: f64) -> Self {
        Self {
            multiplier,
            ..Self::default()
        }
    }

    /// Set the lower fence floor; `None` lets it go negative.
    pub fn with_floor(mut self, floor: Option<f64>) -> Self {
        self.floor = floor;
        self
    }

    pub fn with_severe_multiplier(mut self, severe_multiplier: f64) -> Self {
        self.severe_multiplier = severe_multiplier;
        self
    }

    /// Check that both multipliers are finite and positive and the floor,
    /// when set, is finite.
    pub fn validate(&self) -> Result<()> {
        if let Some(floor) = self.floor.filter(|floor| !floor.is_finite()) {
            return Err(SurveillanceError::InvalidParameter {
                name: "floor".to_string(),
                reason: format!("must be finite, got {}", floor),
            });
        }
        for (name, value) in [
            ("multiplier", self.multiplier),
            ("severe_multiplier", self.severe_multiplier),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SurveillanceError::InvalidParameter {
                    name: name.to_string(),
                    reason: format!("must be finite and positive, got {}", value),
                });
            }
        }
        Ok(())
    }
}

// ============================================================================
// Attribution Configuration
// ============================================================================

/// Period derived from a request date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// ISO week number of the date.
    #[default]
    IsoWeek,
    /// The date itself.
    Date,
}

/// Reading of ambiguous `01/02/2024`-style dates. ISO dates are unaffected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    /// `dd/mm/yyyy`, as in French laboratory exports.
    #[default]
    DayFirst,
    /// `mm/dd/yyyy`.
    MonthFirst,
}

/// Attribution table construction configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributionConfig {
    pub date_column: String,
    pub service_column: String,
    pub granularity: Granularity,
    pub date_order: DateOrder,
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            date_column: "DATE_ENTREE".to_string(),
            service_column: "LIBELLE_DEMANDEUR".to_string(),
            granularity: Granularity::IsoWeek,
            date_order: DateOrder::DayFirst,
        }
    }
}

impl AttributionConfig {
    pub fn new(date_column: &str, service_column: &str, granularity: Granularity) -> Self {
        Self {
            date_column: date_column.to_string(),
            service_column: service_column.to_string(),
            granularity,
            date_order: DateOrder::DayFirst,
        }
    }

    pub fn with_date_order(mut self, date_order: DateOrder) -> Self {
        self.date_order = date_order;
        self
    }
}

// ============================================================================
// Phenotype Configuration
// ============================================================================

/// Phenotype share derivation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhenotypeConfig {
    /// Date column of the count table.
    pub period_column: String,
    /// Count columns, one per phenotype.
    pub phenotypes: Vec<String>,
    /// Prefix of the derived share columns.
    pub share_prefix: String,
    pub date_order: DateOrder,
}

impl Default for PhenotypeConfig {
    fn default() -> Self {
        Self {
            period_column: "week".to_string(),
            phenotypes: ["MRSA", "Other", "VRSA", "Wild"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            share_prefix: "% ".to_string(),
            date_order: DateOrder::DayFirst,
        }
    }
}

impl PhenotypeConfig {
    /// Name of the share column derived for `phenotype`.
    pub fn share_column(&self, phenotype: &str) -> String {
        format!("{}{}", self.share_prefix, phenotype)
    }
}

// ============================================================================
// Catalog Configuration
// ============================================================================

/// Bacteria catalog column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub category_column: String,
    pub key_antibiotics_column: String,
    pub other_antibiotics_column: String,
    pub phenotype_column: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            category_column: "Category".to_string(),
            key_antibiotics_column: "Key Antibiotics".to_string(),
            other_antibiotics_column: "Other Antibiotics".to_string(),
            phenotype_column: "Phenotype".to_string(),
        }
    }
}

// ============================================================================
// Top-level Configuration
// ============================================================================

/// Complete engine configuration, loadable from TOML.
///
/// Every section is optional and falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveillanceConfig {
    pub antibiotics: NormalizerConfig,
    #[serde(deserialize_with = "phenotype_section")]
    pub phenotypes: NormalizerConfig,
    pub band: BandConfig,
    pub attribution: AttributionConfig,
    pub phenotype_shares: PhenotypeConfig,
    pub catalog: CatalogConfig,
}

impl Default for SurveillanceConfig {
    fn default() -> Self {
        Self {
            antibiotics: NormalizerConfig::antibiotics(),
            phenotypes: NormalizerConfig::phenotypes(),
            band: BandConfig::default(),
            attribution: AttributionConfig::default(),
            phenotype_shares: PhenotypeConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }
}

/// Keys of a normalizer section that a TOML document may override.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NormalizerOverrides {
    period_aliases: Option<Vec<String>>,
    period_kind: Option<PeriodKind>,
    metric_prefix: Option<String>,
    duplicates: Option<DuplicatePolicy>,
}

impl NormalizerOverrides {
    fn apply(self, mut base: NormalizerConfig) -> NormalizerConfig {
        if let Some(aliases) = self.period_aliases {
            base.period_aliases = aliases;
        }
        if let Some(kind) = self.period_kind {
            base.period_kind = kind;
        }
        if let Some(prefix) = self.metric_prefix {
            base.metric_prefix = prefix;
        }
        if let Some(duplicates) = self.duplicates {
            base.duplicates = duplicates;
        }
        base
    }
}

// A partial [phenotypes] section is completed from the phenotype preset.
fn phenotype_section<'de, D>(deserializer: D) -> std::result::Result<NormalizerConfig, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = NormalizerOverrides::deserialize(deserializer)?;
    Ok(overrides.apply(NormalizerConfig::phenotypes()))
}

impl SurveillanceConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: SurveillanceConfig =
            toml::from_str(source).map_err(|e| SurveillanceError::Config(e.to_string()))?;
        config.band.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| {
            SurveillanceError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&source)
    }
}
