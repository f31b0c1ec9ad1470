//! Alert types for flagged periods.

use serde::{Deserialize, Serialize};

use super::band::{Classification, VariabilityBand};
use super::period::Period;

/// Alert severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertSeverity {
    /// Outside the band.
    Warning,
    /// Outside the severe fence as well.
    Critical,
}

/// An alert raised for the latest value of an analyzed window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub metric: String,
    pub period: Period,
    pub value: f64,
    pub classification: Classification,
    pub severity: AlertSeverity,
    pub band: VariabilityBand,
    /// Services that submitted samples during `period`.
    pub services: Vec<String>,
    pub message: String,
}
