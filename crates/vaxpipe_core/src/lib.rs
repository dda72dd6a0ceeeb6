//! Vaccine pipeline forecasting library
//!
//! This crate provides a Monte Carlo simulation engine for forecasting how
//! candidate vaccines progress through the clinical and regulatory pipeline.
//! It supports:
//! - A five-phase state machine per candidate (Pre-Clinical through Approval)
//! - Platform-correlated success draws, so shared-technology candidates
//!   fail together more often than independent ones
//! - Funding-driven schedules: phase overlap, gaps, and start offsets
//! - A monthly approval limiter and a Bio-tech buyout rule
//! - Phase III slowdown feedback driven by completed-run statistics
//! - Dose-production projection for approved candidates
//!
//! # Running a forecast
//!
//! ```ignore
//! use vaxpipe_core::config::PipelineConfig;
//! use vaxpipe_core::forecast::run_forecast;
//!
//! let config = PipelineConfig::default();
//! let registry = load_registry()?;
//! let output = run_forecast(&config, &registry, 42)?;
//! println!("P(any approval) = {}", output.final_approval_probability());
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod analysis;
pub mod error;
pub mod forecast;
pub mod limiter;
pub mod manufacturing;
pub mod policy;
pub mod sampling;
pub mod stats;
pub mod timeline;
pub mod trial;
pub mod trial_state;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::PipelineConfig;
pub use error::ModelError;
pub use forecast::run_forecast;
pub use model::{ForecastOutput, VaccineRecord};
