//! Analysis result types.

use serde::{Deserialize, Serialize};

use super::band::{Classification, VariabilityBand};
use super::period::{Period, Window};
use super::series::NormalizedSeries;

/// Summary statistics over the non-missing values of a window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Number of non-missing values.
    pub count: usize,
    pub mean: f64,
    /// Earliest period holding the maximum value.
    pub peak_period: Period,
    pub peak_value: f64,
}

/// Outcome of a robust-band analysis over one window of one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub window: Window,
    /// Rows of the series inside the window, missing values included.
    pub series: NormalizedSeries,
    pub band: VariabilityBand,
    pub classification: Classification,
    /// Period of the most recent non-missing value.
    pub latest_period: Period,
    pub latest_value: f64,
    pub summary: SummaryStats,
}

impl AnalysisResult {
    pub fn metric(&self) -> &str {
        self.series.metric()
    }

    /// True when the latest value falls outside the band.
    pub fn is_anomalous(&self) -> bool {
        self.classification.is_alert()
    }
}
