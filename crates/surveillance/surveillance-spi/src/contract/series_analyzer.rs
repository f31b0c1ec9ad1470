//! Normalizer and analyzer trait definitions.

use crate::error::{Result, SurveillanceError};
use crate::model::{AnalysisResult, NormalizedSeries, RawTable, SeriesPoint, VariabilityBand, Window};

/// Decides which columns of a table hold metrics.
pub trait MetricPredicate: Send + Sync {
    fn matches(&self, column: &str) -> bool;
}

impl<F> MetricPredicate for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn matches(&self, column: &str) -> bool {
        self(column)
    }
}

/// Turns a raw table into normalized series.
///
/// Implementations never mutate the input table.
pub trait SeriesNormalizer: Send + Sync {
    /// Metric columns of the table, in header order.
    fn metric_columns(&self, table: &RawTable) -> Result<Vec<String>>;

    /// Normalize one metric column.
    fn normalize(&self, table: &RawTable, metric: &str) -> Result<NormalizedSeries>;

    /// Normalize every metric column.
    fn normalize_all(&self, table: &RawTable) -> Result<Vec<NormalizedSeries>> {
        self.metric_columns(table)?
            .iter()
            .map(|metric| self.normalize(table, metric))
            .collect()
    }
}

/// Computes variability bands and classifies windows of a series.
pub trait SeriesAnalyzer: Send + Sync {
    /// Band over a set of values.
    fn band(&self, values: &[f64]) -> Result<VariabilityBand>;

    /// Analyze the rows of `series` that fall inside `window`.
    fn analyze(&self, series: &NormalizedSeries, window: &Window) -> Result<AnalysisResult>;

    /// Band over the whole series and every point strictly above its upper fence.
    fn exceedances(
        &self,
        series: &NormalizedSeries,
    ) -> Result<(VariabilityBand, Vec<SeriesPoint>)> {
        let values = series.values();
        if values.is_empty() {
            return Err(SurveillanceError::AllMissing {
                metric: series.metric().to_string(),
            });
        }
        let band = self.band(&values)?;
        let points = series
            .points()
            .iter()
            .filter(|p| p.value.is_some_and(|value| band.exceeds(value)))
            .copied()
            .collect();
        Ok((band, points))
    }
}
