//! Surveillance Core
//!
//! Implementations for series normalization, robust-band analysis,
//! attribution, alerting and the supporting reference data.

mod alerting;
mod analyzer;
mod attribution;
mod cache;
mod catalog;
mod monitoring;
mod normalizer;
mod phenotype;
mod sweep;

pub mod periods;
pub mod stats;

pub use alerting::*;
pub use analyzer::*;
pub use attribution::*;
pub use cache::*;
pub use catalog::*;
pub use monitoring::*;
pub use normalizer::*;
pub use phenotype::*;
pub use sweep::*;
