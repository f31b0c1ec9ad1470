//! Cross-table alert sweep report.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::period::Period;

/// One metric value above its whole-series upper fence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exceedance {
    /// Name of the table the metric came from.
    pub source: String,
    pub metric: String,
    pub value: f64,
    pub upper: f64,
}

/// A period flagged by at least one metric, with the services active then.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplicatedPeriod {
    pub period: Period,
    pub exceedances: Vec<Exceedance>,
    pub services: Vec<String>,
}

/// Union of flagged periods across every metric of every table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Flagged periods, ascending.
    pub periods: Vec<ImplicatedPeriod>,
}

impl SweepReport {
    pub fn flagged_periods(&self) -> Vec<Period> {
        self.periods.iter().map(|p| p.period).collect()
    }

    /// Every implicated service, sorted and deduplicated.
    pub fn services(&self) -> Vec<String> {
        self.periods
            .iter()
            .flat_map(|p| p.services.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}
