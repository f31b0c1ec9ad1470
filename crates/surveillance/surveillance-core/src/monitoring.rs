//! Request-level entry point tying normalizer, analyzer and cache together.

use std::sync::Arc;

use surveillance_api::{BandConfig, NormalizerConfig};
use surveillance_spi::{
    Alert, AnalysisResult, AttributionTable, RawTable, Result, SeriesAnalyzer, SeriesNormalizer,
    SurveillanceError, Window,
};
use tracing::debug;

use super::alerting::create_alert;
use super::analyzer::RobustBandAnalyzer;
use super::cache::{AnalysisCache, CacheKey};
use super::normalizer::PeriodNormalizer;

/// Monitor for one kind of metric table.
///
/// Holds no selection state: every call names the table, metric and window
/// it works on.
pub struct Monitor<N = PeriodNormalizer, A = RobustBandAnalyzer> {
    normalizer: N,
    analyzer: A,
    severe_multiplier: f64,
    cache: Option<AnalysisCache>,
}

impl Monitor {
    /// Create from configuration.
    pub fn from_config(normalizer: NormalizerConfig, band: BandConfig) -> Self {
        Self::new(
            PeriodNormalizer::new(normalizer),
            RobustBandAnalyzer::from_config(band),
        )
        .with_severe_multiplier(band.severe_multiplier)
    }
}

impl<N: SeriesNormalizer, A: SeriesAnalyzer> Monitor<N, A> {
    /// Create a new monitor with the given normalizer and analyzer.
    pub fn new(normalizer: N, analyzer: A) -> Self {
        Self {
            normalizer,
            analyzer,
            severe_multiplier: 3.0,
            cache: None,
        }
    }

    /// Memoize analyses in `cache`.
    pub fn with_cache(mut self, cache: AnalysisCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_severe_multiplier(mut self, severe_multiplier: f64) -> Self {
        self.severe_multiplier = severe_multiplier;
        self
    }

    /// Get the underlying normalizer.
    pub fn normalizer(&self) -> &N {
        &self.normalizer
    }

    /// Get the underlying analyzer.
    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    pub fn cache(&self) -> Option<&AnalysisCache> {
        self.cache.as_ref()
    }

    /// Metric columns available for selection.
    pub fn metric_columns(&self, table: &RawTable) -> Result<Vec<String>> {
        self.normalizer.metric_columns(table)
    }

    /// Full period range of a metric, the default window.
    pub fn period_range(&self, table: &RawTable, metric: &str) -> Result<Option<Window>> {
        Ok(self.normalizer.normalize(table, metric)?.period_range())
    }

    /// Normalize `metric` and analyze it over `window`.
    pub fn analyze_metric(
        &self,
        table: &RawTable,
        metric: &str,
        window: &Window,
    ) -> Result<AnalysisResult> {
        let series = self.normalizer.normalize(table, metric)?;
        self.analyzer.analyze(&series, window)
    }

    /// Like [`Monitor::analyze_metric`], memoized under `table_key` when a
    /// cache is configured.
    pub fn analyze_cached(
        &self,
        table_key: &str,
        table: &RawTable,
        metric: &str,
        window: &Window,
    ) -> Result<Arc<AnalysisResult>> {
        match &self.cache {
            Some(cache) => cache.get_or_compute(CacheKey::new(table_key, metric, *window), || {
                self.analyze_metric(table, metric, window)
            }),
            None => self.analyze_metric(table, metric, window).map(Arc::new),
        }
    }

    /// Analyze every metric column over `window`.
    ///
    /// Metrics with no rows or no values in the window are left out.
    pub fn analyze_all(&self, table: &RawTable, window: &Window) -> Result<Vec<AnalysisResult>> {
        let mut results = Vec::new();
        for series in self.normalizer.normalize_all(table)? {
            match self.analyzer.analyze(&series, window) {
                Ok(result) => results.push(result),
                Err(e @ SurveillanceError::EmptyWindow { .. })
                | Err(e @ SurveillanceError::AllMissing { .. }) => {
                    debug!("skipping {}: {}", series.metric(), e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(results)
    }

    /// Alerts for every metric whose latest in-window value is HIGH or LOW.
    pub fn current_alerts(
        &self,
        table: &RawTable,
        window: &Window,
        attribution: Option<&AttributionTable>,
    ) -> Result<Vec<Alert>> {
        Ok(self
            .analyze_all(table, window)?
            .iter()
            .filter_map(|result| create_alert(result, attribution, self.severe_multiplier))
            .collect())
    }
}
