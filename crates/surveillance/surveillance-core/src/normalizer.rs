//! Series normalizer implementation.

use std::collections::{HashMap, HashSet};

use surveillance_api::{DuplicatePolicy, NormalizerConfig};
use surveillance_spi::{
    MetricPredicate, NormalizedSeries, Period, RawTable, Result, SeriesNormalizer, SeriesPoint,
    SurveillanceError,
};
use tracing::debug;

use crate::periods::{parse_metric, parse_period};

/// Normalizer for tables keyed by a week or date column.
///
/// Column names are trimmed, the period column is found through the
/// configured aliases, rows with a malformed period are dropped and metric
/// cells that are not numeric become missing values.
pub struct PeriodNormalizer {
    config: NormalizerConfig,
    predicate: Box<dyn MetricPredicate>,
}

impl PeriodNormalizer {
    /// Create a normalizer whose metric columns start with the configured prefix.
    pub fn new(config: NormalizerConfig) -> Self {
        let prefix = config.metric_prefix.clone();
        Self {
            config,
            predicate: Box::new(move |column: &str| column.starts_with(prefix.as_str())),
        }
    }

    /// Normalizer for week-numbered resistance tables.
    pub fn antibiotics() -> Self {
        Self::new(NormalizerConfig::antibiotics())
    }

    /// Normalizer for date-indexed phenotype share tables.
    pub fn phenotypes() -> Self {
        Self::new(NormalizerConfig::phenotypes())
    }

    /// Replace the prefix rule with a custom metric predicate.
    pub fn with_predicate(mut self, predicate: impl MetricPredicate + 'static) -> Self {
        self.predicate = Box::new(predicate);
        self
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Index of the first column whose name is one of the period aliases.
    ///
    /// Expects trimmed headers.
    pub fn resolve_period_column(&self, table: &RawTable) -> Result<usize> {
        table
            .headers()
            .iter()
            .position(|header| self.config.period_aliases.iter().any(|alias| alias == header))
            .ok_or_else(|| {
                SurveillanceError::schema(format!(
                    "one of [{}]",
                    self.config.period_aliases.join(", ")
                ))
            })
    }

    /// Reject malformed keys: `(row, period)` for every row whose period
    /// cell parses, in source order. Other rows are dropped silently.
    pub fn retain_valid_periods(&self, table: &RawTable, column: usize) -> Vec<(usize, Period)> {
        let kept: Vec<(usize, Period)> = (0..table.row_count())
            .filter_map(|row| {
                let raw = table.cell(row, column)?;
                parse_period(self.config.period_kind, raw).map(|period| (row, period))
            })
            .collect();

        let dropped = table.row_count() - kept.len();
        if dropped > 0 {
            debug!(
                "dropped {} of {} rows with a malformed {} period",
                dropped,
                table.row_count(),
                self.config.period_kind
            );
        }
        kept
    }

    fn apply_duplicate_policy(&self, rows: Vec<(usize, Period)>) -> Result<Vec<(usize, Period)>> {
        match self.config.duplicates {
            DuplicatePolicy::Keep => Ok(rows),
            DuplicatePolicy::Reject => {
                let mut seen = HashSet::with_capacity(rows.len());
                for (_, period) in &rows {
                    if !seen.insert(*period) {
                        return Err(SurveillanceError::DuplicatePeriod(period.to_string()));
                    }
                }
                Ok(rows)
            }
            DuplicatePolicy::LastWins => {
                let last: HashMap<Period, usize> =
                    rows.iter().map(|&(row, period)| (period, row)).collect();
                Ok(rows
                    .into_iter()
                    .filter(|(row, period)| last.get(period) == Some(row))
                    .collect())
            }
        }
    }

    fn metric_columns_trimmed(&self, table: &RawTable, period_column: usize) -> Result<Vec<String>> {
        let columns: Vec<String> = table
            .headers()
            .iter()
            .enumerate()
            .filter(|&(index, header)| index != period_column && self.predicate.matches(header))
            .map(|(_, header)| header.clone())
            .collect();

        if columns.is_empty() {
            return Err(SurveillanceError::NoMetricColumns);
        }
        Ok(columns)
    }

    fn series_from_rows(
        &self,
        table: &RawTable,
        rows: &[(usize, Period)],
        metric: &str,
    ) -> Result<NormalizedSeries> {
        let column = table
            .column_index(metric)
            .ok_or_else(|| SurveillanceError::UnknownMetric(metric.to_string()))?;

        let points = rows
            .iter()
            .map(|&(row, period)| SeriesPoint {
                period,
                value: table.cell(row, column).and_then(parse_metric),
            })
            .collect();

        Ok(NormalizedSeries::new(metric, self.config.period_kind, points))
    }

    fn keyed_rows(&self, table: &RawTable, period_column: usize) -> Result<Vec<(usize, Period)>> {
        let rows = self.retain_valid_periods(table, period_column);
        self.apply_duplicate_policy(rows)
    }
}

impl Default for PeriodNormalizer {
    fn default() -> Self {
        Self::antibiotics()
    }
}

impl std::fmt::Debug for PeriodNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeriodNormalizer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SeriesNormalizer for PeriodNormalizer {
    fn metric_columns(&self, table: &RawTable) -> Result<Vec<String>> {
        let table = table.with_trimmed_headers();
        let period_column = self.resolve_period_column(&table)?;
        self.metric_columns_trimmed(&table, period_column)
    }

    fn normalize(&self, table: &RawTable, metric: &str) -> Result<NormalizedSeries> {
        let table = table.with_trimmed_headers();
        let period_column = self.resolve_period_column(&table)?;
        let metrics = self.metric_columns_trimmed(&table, period_column)?;
        if !metrics.iter().any(|candidate| candidate == metric) {
            return Err(SurveillanceError::UnknownMetric(metric.to_string()));
        }
        let rows = self.keyed_rows(&table, period_column)?;
        self.series_from_rows(&table, &rows, metric)
    }

    fn normalize_all(&self, table: &RawTable) -> Result<Vec<NormalizedSeries>> {
        let table = table.with_trimmed_headers();
        let period_column = self.resolve_period_column(&table)?;
        let metrics = self.metric_columns_trimmed(&table, period_column)?;
        let rows = self.keyed_rows(&table, period_column)?;
        metrics
            .iter()
            .map(|metric| self.series_from_rows(&table, &rows, metric))
            .collect()
    }
}
