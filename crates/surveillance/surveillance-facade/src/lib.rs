//! Surveillance Facade
//!
//! Unified re-exports for the surveillance engine:
//! - Contracts (`SeriesNormalizer`, `SeriesAnalyzer`) and data model from SPI
//! - Configuration types from API
//! - Normalizer, analyzer, attribution, sweep and reference data from Core

// Re-export everything from SPI
pub use surveillance_spi::*;

// Re-export everything from API
pub use surveillance_api::*;

// Re-export everything from Core
pub use surveillance_core::*;
