//! Variability band and classification types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Verdict for a value relative to a variability band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Classification {
    High,
    Low,
    Normal,
}

impl Classification {
    /// True for `High` and `Low`.
    pub fn is_alert(&self) -> bool {
        !matches!(self, Classification::Normal)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::High => write!(f, "HIGH"),
            Classification::Low => write!(f, "LOW"),
            Classification::Normal => write!(f, "NORMAL"),
        }
    }
}

/// Quartile-derived bounds (Tukey fences).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariabilityBand {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

impl VariabilityBand {
    /// Fences `q1 - k·iqr` and `q3 + k·iqr`, the lower one raised to `floor`.
    pub fn from_quartiles(q1: f64, q3: f64, multiplier: f64, floor: Option<f64>) -> Self {
        let iqr = q3 - q1;
        let mut lower = q1 - multiplier * iqr;
        if let Some(floor) = floor {
            lower = lower.max(floor);
        }
        Self {
            q1,
            q3,
            iqr,
            lower,
            upper: q3 + multiplier * iqr,
        }
    }

    pub fn classify(&self, value: f64) -> Classification {
        if value > self.upper {
            Classification::High
        } else if value < self.lower {
            Classification::Low
        } else {
            Classification::Normal
        }
    }

    /// True when `value` lies strictly above the upper fence.
    pub fn exceeds(&self, value: f64) -> bool {
        value > self.upper
    }
}
