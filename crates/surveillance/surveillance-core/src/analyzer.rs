//! Robust-band analyzer implementation.

use surveillance_api::BandConfig;
use surveillance_spi::{
    AnalysisResult, NormalizedSeries, Period, Result, SeriesAnalyzer, SummaryStats,
    SurveillanceError, VariabilityBand, Window,
};
use tracing::debug;

use crate::stats::{mean, quartiles};

// ============================================================================
// Robust-Band Analyzer
// ============================================================================

/// IQR-based analyzer.
///
/// Bounds a window with Tukey fences and classifies its most recent
/// non-missing value against them.
#[derive(Debug, Clone)]
pub struct RobustBandAnalyzer {
    config: BandConfig,
}

impl RobustBandAnalyzer {
    /// Create an analyzer with the given IQR multiplier and a zero floor.
    pub fn new(multiplier: f64) -> Self {
        Self::from_config(BandConfig::new(multiplier))
    }

    /// Create from configuration.
    pub fn from_config(config: BandConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BandConfig {
        &self.config
    }

    fn check_window(&self, series: &NormalizedSeries, window: &Window) -> Result<()> {
        if window.kind() != Some(series.kind()) {
            return Err(SurveillanceError::PeriodKindMismatch {
                series: series.kind().to_string(),
                window: window
                    .kind()
                    .map(|kind| kind.to_string())
                    .unwrap_or_else(|| "mixed".to_string()),
            });
        }
        if window.is_empty() {
            return Err(empty_window(window));
        }
        Ok(())
    }
}

impl Default for RobustBandAnalyzer {
    fn default() -> Self {
        Self::from_config(BandConfig::default())
    }
}

impl SeriesAnalyzer for RobustBandAnalyzer {
    fn band(&self, values: &[f64]) -> Result<VariabilityBand> {
        self.config.validate()?;
        let (q1, q3) = quartiles(values).ok_or_else(|| SurveillanceError::InvalidParameter {
            name: "values".to_string(),
            reason: "at least one value is required".to_string(),
        })?;
        Ok(VariabilityBand::from_quartiles(
            q1,
            q3,
            self.config.multiplier,
            self.config.floor,
        ))
    }

    fn analyze(&self, series: &NormalizedSeries, window: &Window) -> Result<AnalysisResult> {
        self.check_window(series, window)?;

        let windowed = series.within(window);
        if windowed.is_empty() {
            return Err(empty_window(window));
        }

        let values = windowed.values();
        let (latest_period, latest_value) =
            windowed.latest().ok_or_else(|| SurveillanceError::AllMissing {
                metric: series.metric().to_string(),
            })?;

        let band = self.band(&values)?;
        let classification = band.classify(latest_value);
        let summary = summarize(&windowed, &values)?;

        debug!(
            "{} over {}: {} rows, {} values, band [{:.4}, {:.4}], latest {} = {:.4} -> {}",
            series.metric(),
            window,
            windowed.len(),
            values.len(),
            band.lower,
            band.upper,
            latest_period,
            latest_value,
            classification
        );

        Ok(AnalysisResult {
            window: *window,
            series: windowed,
            band,
            classification,
            latest_period,
            latest_value,
            summary,
        })
    }
}

fn empty_window(window: &Window) -> SurveillanceError {
    SurveillanceError::EmptyWindow {
        start: window.start.to_string(),
        end: window.end.to_string(),
    }
}

/// Count, mean and earliest peak of the non-missing values.
fn summarize(series: &NormalizedSeries, values: &[f64]) -> Result<SummaryStats> {
    let all_missing = || SurveillanceError::AllMissing {
        metric: series.metric().to_string(),
    };

    let mut peak: Option<(Period, f64)> = None;
    for point in series.points() {
        if let Some(value) = point.value {
            // strict comparison keeps the earliest period on ties
            if peak.map_or(true, |(_, best)| value > best) {
                peak = Some((point.period, value));
            }
        }
    }
    let (peak_period, peak_value) = peak.ok_or_else(all_missing)?;

    Ok(SummaryStats {
        count: values.len(),
        mean: mean(values).ok_or_else(all_missing)?,
        peak_period,
        peak_value,
    })
}
