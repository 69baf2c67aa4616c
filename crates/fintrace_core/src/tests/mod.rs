//! Tests for the trace engine
//!
//! Tests are organized by topic:
//! - `reconcile` - Bucket reconciliation, continuity, and month zero
//! - `flows` - Operating-flow attribution (event-derived and aggregate)
//! - `transfers` - Transfer attribution and the single-source-per-direction rule
//! - `growth` - Market-return decomposition
//! - `summary` - Latching and extremal month pointers
//! - `export` - CSV/JSON rendering and container validation
//! - `scenarios` - End-to-end runs covering the conservation properties

mod growth;
mod reconcile;
mod support;
