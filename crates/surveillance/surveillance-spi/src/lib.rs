//! Surveillance Service Provider Interface
//!
//! Defines the traits and types shared by the series normalizer, the
//! robust-band analyzer and the attribution lookup.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{MetricPredicate, SeriesAnalyzer, SeriesNormalizer};
pub use error::{Result, SurveillanceError};
pub use model::{
    Alert, AlertSeverity, AnalysisResult, AttributionTable, BacteriumProfile, Classification,
    Exceedance, ImplicatedPeriod, NormalizedSeries, Period, PeriodKind, RawTable, SeriesPoint,
    SummaryStats, SweepReport, VariabilityBand, Window,
};

pub use chrono::NaiveDate;
