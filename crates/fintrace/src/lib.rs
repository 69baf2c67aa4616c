//! Command-line front end for the fintrace engine
//!
//! Loads a simulation run from JSON or YAML, builds its reconciliation
//! trace with `fintrace_core`, and either writes the export documents
//! (`export`) or prints an audit of the trace (`check`). All file I/O and
//! logging setup lives here; the engine itself does none.

pub mod commands;
pub mod input;
pub mod logging;
pub mod report;
pub mod util;

pub use commands::{CheckOutcome, ExportOptions, check, export};
pub use logging::init_logging;
