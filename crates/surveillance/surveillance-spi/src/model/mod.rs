//! Data models for the surveillance engine.
//!
//! This module contains data structures used throughout the engine.

mod alert;
mod analysis;
mod attribution;
mod band;
mod catalog;
mod period;
mod raw_table;
mod series;
mod sweep;

pub use alert::{Alert, AlertSeverity};
pub use analysis::{AnalysisResult, SummaryStats};
pub use attribution::AttributionTable;
pub use band::{Classification, VariabilityBand};
pub use catalog::BacteriumProfile;
pub use period::{Period, PeriodKind, Window};
pub use raw_table::RawTable;
pub use series::{NormalizedSeries, SeriesPoint};
pub use sweep::{Exceedance, ImplicatedPeriod, SweepReport};
