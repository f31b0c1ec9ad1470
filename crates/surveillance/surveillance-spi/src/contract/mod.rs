//! Contract definitions for the surveillance engine.
//!
//! This module contains trait definitions that providers must implement.

mod series_analyzer;

pub use series_analyzer::{MetricPredicate, SeriesAnalyzer, SeriesNormalizer};
