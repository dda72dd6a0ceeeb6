//! Integration tests for the pipeline forecast engine
//!
//! Tests are organized by topic:
//! - `sampling` - Triangular draws and the correlated success draw
//! - `config` - Defaults, deserialization, and eager validation
//! - `timeline` - Per-phase success and duration arithmetic
//! - `policy` - Overlap chaining and the buyout rule
//! - `results` - Occupancy windows, census states, and output helpers
//! - `trial` - Single-run state machine behavior
//! - `manufacturing` - Dose projection curves and target crossings
//! - `forecast` - Full multi-run aggregation, limiter, and feedback

mod config;
mod results;
mod timeline;
