//! # surveillance
//!
//! Outlier detection for laboratory surveillance tables.
//!
//! Normalizes period-indexed metric tables, bounds a selected window with
//! an IQR band, classifies the latest value against it and attributes
//! flagged periods to the requesting services.
//!
//! ```
//! use surveillance::{NormalizedSeries, RobustBandAnalyzer, SeriesAnalyzer, Window, Classification};
//!
//! let series = NormalizedSeries::from_weeks("% AMX", &[(1, 2.0), (2, 3.0), (3, 2.5), (4, 50.0)]);
//! let result = RobustBandAnalyzer::default()
//!     .analyze(&series, &Window::weeks(1, 4))
//!     .unwrap();
//! assert_eq!(result.classification, Classification::High);
//! ```

pub use surveillance_facade::*;
