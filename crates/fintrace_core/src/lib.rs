//! Monthly reconciliation trace for financial simulations
//!
//! This crate turns the per-month snapshots produced by a simulation engine
//! into an auditable trace of two buckets, Cash and Invested. For every month
//! it:
//! - Reconciles start and end balances against operating flow, inter-bucket
//!   transfers, and market returns, recording three residual checks
//! - Attributes operating flow to individual events (or aggregate categories)
//! - Attributes transfers to contributions, sales, floor restores and
//!   internal strategy moves
//! - Splits the market-return impact across asset classes
//!
//! A summary of notable months is computed afterwards, and the finished
//! trace can be rendered to CSV and JSON export documents.
//!
//! ```ignore
//! use fintrace_core::{build_trace, export::export_all, model::TraceInput};
//!
//! let input: TraceInput = serde_json::from_str(&run_json)?;
//! let trace = build_trace(&input);
//! assert!(trace.summary.is_fully_reconciled());
//! let bundle = export_all(&trace, jiff::Timestamp::now())?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod attribution;
pub mod error;
pub mod export;
pub mod money;
pub mod reconcile;
pub mod summary;
pub mod trace;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use error::{ExportError, TraceError};
pub use export::{ExportBundle, export_all};
pub use money::RECONCILE_TOLERANCE;
pub use trace::{build_trace, build_traces};
