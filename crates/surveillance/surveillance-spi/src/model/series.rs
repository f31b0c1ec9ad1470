//! Normalized series types.

use serde::{Deserialize, Serialize};

use super::period::{Period, PeriodKind, Window};

/// One `(period, value)` observation. `value` is `None` when the source cell
/// could not be read as a number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub period: Period,
    pub value: Option<f64>,
}

impl SeriesPoint {
    pub fn new(period: impl Into<Period>, value: Option<f64>) -> Self {
        Self {
            period: period.into(),
            value,
        }
    }
}

/// A metric column reduced to observations sorted by period ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSeries {
    metric: String,
    kind: PeriodKind,
    points: Vec<SeriesPoint>,
}

impl NormalizedSeries {
    /// Create a series. Points are stably sorted by period, so rows sharing a
    /// period keep their source order.
    pub fn new(metric: impl Into<String>, kind: PeriodKind, mut points: Vec<SeriesPoint>) -> Self {
        points.sort_by(|a, b| a.period.cmp(&b.period));
        Self {
            metric: metric.into(),
            kind,
            points,
        }
    }

    /// Create a week-indexed series from `(week, value)` pairs.
    pub fn from_weeks(metric: impl Into<String>, pairs: &[(u32, f64)]) -> Self {
        let points = pairs
            .iter()
            .map(|&(week, value)| SeriesPoint::new(week, Some(value)))
            .collect();
        Self::new(metric, PeriodKind::Week, points)
    }

    pub fn metric(&self) -> &str {
        &self.metric
    }

    pub fn kind(&self) -> PeriodKind {
        self.kind
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    /// Number of rows, missing values included.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Non-missing values in period order.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().filter_map(|p| p.value).collect()
    }

    pub fn non_missing_count(&self) -> usize {
        self.points.iter().filter(|p| p.value.is_some()).count()
    }

    /// Rows whose period lies in `window`, bounds included.
    pub fn within(&self, window: &Window) -> NormalizedSeries {
        NormalizedSeries {
            metric: self.metric.clone(),
            kind: self.kind,
            points: self
                .points
                .iter()
                .filter(|p| window.contains(&p.period))
                .copied()
                .collect(),
        }
    }

    /// Window spanning the first and last period, if any.
    pub fn period_range(&self) -> Option<Window> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        Some(Window {
            start: first.period,
            end: last.period,
        })
    }

    /// Most recent observation with a value.
    pub fn latest(&self) -> Option<(Period, f64)> {
        self.points
            .iter()
            .rev()
            .find_map(|p| p.value.map(|value| (p.period, value)))
    }
}
