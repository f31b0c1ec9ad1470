//! Error types for the surveillance engine.
//!
//! This module contains error types and the Result alias.

mod surveillance_error;

pub use surveillance_error::{Result, SurveillanceError};
