//! Attribution table: which services submitted records in each period.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::period::Period;

/// Period → set of service names, ordered by period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttributionTable {
    entries: BTreeMap<Period, BTreeSet<String>>,
}

impl AttributionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `service` submitted during `period`.
    pub fn insert(&mut self, period: Period, service: impl Into<String>) {
        self.entries.entry(period).or_default().insert(service.into());
    }

    /// Services active during `period`, sorted. Empty for unknown periods.
    pub fn services(&self, period: &Period) -> BTreeSet<String> {
        self.entries.get(period).cloned().unwrap_or_default()
    }

    /// Periods with at least one service, ascending.
    pub fn periods(&self) -> Vec<Period> {
        self.entries.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Period, &BTreeSet<String>)> {
        self.entries.iter()
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(Period, S)> for AttributionTable {
    fn from_iter<I: IntoIterator<Item = (Period, S)>>(iter: I) -> Self {
        let mut table = AttributionTable::new();
        for (period, service) in iter {
            table.insert(period, service);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_services_are_deduplicated_and_sorted() {
        let table: AttributionTable = vec![
            (Period::Week(3), "Reanimation"),
            (Period::Week(3), "Cardiologie"),
            (Period::Week(3), "Reanimation"),
        ]
        .into_iter()
        .collect();

        let services: Vec<String> = table.services(&Period::Week(3)).into_iter().collect();
        assert_eq!(services, vec!["Cardiologie", "Reanimation"]);
    }

    #[test]
    fn test_unknown_period_is_empty() {
        let table = AttributionTable::new();
        assert!(table.services(&Period::Week(9)).is_empty());
    }

    #[test]
    fn test_periods_ascending() {
        let table: AttributionTable = vec![(Period::Week(5), "A"), (Period::Week(2), "B")]
            .into_iter()
            .collect();
        assert_eq!(table.periods(), vec![Period::Week(2), Period::Week(5)]);
        assert_eq!(table.len(), 2);
    }
}
