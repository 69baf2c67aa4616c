//! The `export` and `check` subcommands

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr;
use fintrace_core::{build_trace, export_all};
use jiff::Timestamp;

use crate::input::load_run;
use crate::report::CheckReport;
use crate::util::io::atomic_write;

/// Full trace dump written next to the export documents on request
pub const TRACE_JSON_FILE: &str = "trace.json";

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub out_dir: PathBuf,
    /// Recorded as `exported_at`; the current time when absent
    pub timestamp: Option<Timestamp>,
    pub with_trace_json: bool,
}

/// Build the trace for a run file and write its export documents
///
/// Returns the paths written, in a fixed order.
pub fn export(input_path: &Path, options: &ExportOptions) -> color_eyre::Result<Vec<PathBuf>> {
    let input = load_run(input_path)?;
    let trace = build_trace(&input);
    let exported_at = options.timestamp.unwrap_or_else(Timestamp::now);
    let bundle = export_all(&trace, exported_at).wrap_err("Failed to render export documents")?;

    fs::create_dir_all(&options.out_dir).wrap_err_with(|| {
        format!("Failed to create output directory {}", options.out_dir.display())
    })?;

    let mut written = Vec::new();
    for (name, content) in bundle.files() {
        written.push(write_output(&options.out_dir, name, content)?);
    }
    if options.with_trace_json {
        let json = serde_json::to_string_pretty(&trace).wrap_err("Failed to serialize trace")?;
        written.push(write_output(&options.out_dir, TRACE_JSON_FILE, &json)?);
    }

    tracing::info!(
        scenario = %trace.meta.scenario_id,
        months = trace.summary.total_months,
        reconciled = trace.summary.reconciled_months,
        files = written.len(),
        out_dir = %options.out_dir.display(),
        "Exported trace"
    );
    if !trace.summary.is_fully_reconciled() {
        tracing::warn!(
            first_mismatch = ?trace.summary.first_mismatch_month,
            "Trace contains unreconciled months"
        );
    }

    Ok(written)
}

fn write_output(dir: &Path, name: &str, content: &str) -> color_eyre::Result<PathBuf> {
    let path = dir.join(name);
    atomic_write(&path, content).wrap_err_with(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Outcome of `fintrace check`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub rendered: String,
    pub clean: bool,
}

/// Build the trace for a run file and render its audit report
pub fn check(input_path: &Path, as_json: bool) -> color_eyre::Result<CheckOutcome> {
    let input = load_run(input_path)?;
    let trace = build_trace(&input);
    trace.validate().wrap_err("Built trace failed validation")?;

    let report = CheckReport::new(&trace);
    let rendered = if as_json {
        serde_json::to_string_pretty(&report).wrap_err("Failed to serialize report")?
    } else {
        report.render()
    };

    tracing::info!(
        scenario = %trace.meta.scenario_id,
        mismatches = report.mismatches.len(),
        "Checked trace"
    );

    Ok(CheckOutcome {
        rendered,
        clean: report.is_clean(),
    })
}
