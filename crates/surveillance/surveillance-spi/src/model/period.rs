//! Period and window types.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Representation used by the periods of one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    /// Integer week-of-year.
    Week,
    /// Calendar date.
    Date,
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodKind::Week => write!(f, "week"),
            PeriodKind::Date => write!(f, "date"),
        }
    }
}

/// A time bucket indexing a measurement.
///
/// Ordering is only meaningful between periods of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Period {
    Week(u32),
    Date(NaiveDate),
}

impl Period {
    pub fn kind(&self) -> PeriodKind {
        match self {
            Period::Week(_) => PeriodKind::Week,
            Period::Date(_) => PeriodKind::Date,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Week(week) => write!(f, "{}", week),
            Period::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl From<u32> for Period {
    fn from(week: u32) -> Self {
        Period::Week(week)
    }
}

impl From<NaiveDate> for Period {
    fn from(date: NaiveDate) -> Self {
        Period::Date(date)
    }
}

/// Inclusive period range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Window {
    pub start: Period,
    pub end: Period,
}

impl Window {
    pub fn new(start: impl Into<Period>, end: impl Into<Period>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Window over week numbers.
    pub fn weeks(start: u32, end: u32) -> Self {
        Self::new(start, end)
    }

    /// Window over calendar dates.
    pub fn dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(start, end)
    }

    /// True when `period` lies in the window, bounds included.
    pub fn contains(&self, period: &Period) -> bool {
        self.start <= *period && *period <= self.end
    }

    /// True when no period can satisfy the window.
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Period kind shared by both bounds, if they agree.
    pub fn kind(&self) -> Option<PeriodKind> {
        let kind = self.start.kind();
        (kind == self.end.kind()).then_some(kind)
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_display() {
        assert_eq!(Period::Week(7).to_string(), "7");
        assert_eq!(Period::Date(date(2024, 3, 4)).to_string(), "2024-03-04");
    }

    #[test]
    fn test_period_kind() {
        assert_eq!(Period::Week(1).kind(), PeriodKind::Week);
        assert_eq!(Period::Date(date(2024, 1, 1)).kind(), PeriodKind::Date);
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let window = Window::weeks(3, 5);
        assert!(window.contains(&Period::Week(3)));
        assert!(window.contains(&Period::Week(5)));
        assert!(!window.contains(&Period::Week(2)));
        assert!(!window.contains(&Period::Week(6)));
    }

    #[test]
    fn test_window_is_empty_when_reversed() {
        assert!(Window::weeks(10, 4).is_empty());
        assert!(!Window::weeks(4, 4).is_empty());
    }

    #[test]
    fn test_window_mixed_kind() {
        let window = Window::new(1, date(2024, 1, 1));
        assert_eq!(window.kind(), None);
        assert_eq!(Window::weeks(1, 2).kind(), Some(PeriodKind::Week));
    }

    #[test]
    fn test_period_serializes_untagged() {
        let json = serde_json::to_string(&Period::Week(12)).unwrap();
        assert_eq!(json, "12");
        let json = serde_json::to_string(&Period::Date(date(2024, 5, 6))).unwrap();
        assert_eq!(json, "\"2024-05-06\"");
    }
}
