//! Loading run files
//!
//! A run file holds one serialized [`TraceInput`]. JSON and YAML are both
//! accepted; the format is chosen by file extension.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{WrapErr, bail, eyre};
use fintrace_core::model::TraceInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunFormat {
    Json,
    Yaml,
}

impl RunFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(RunFormat::Json),
            "yaml" | "yml" => Some(RunFormat::Yaml),
            _ => None,
        }
    }
}

pub fn parse_run(content: &str, format: RunFormat) -> color_eyre::Result<TraceInput> {
    let input: TraceInput = match format {
        RunFormat::Json => serde_json::from_str(content).wrap_err("Invalid JSON run file")?,
        RunFormat::Yaml => serde_saphyr::from_str(content)
            .map_err(|e| eyre!("Invalid YAML run file: {e}"))?,
    };
    Ok(input)
}

pub fn load_run(path: &Path) -> color_eyre::Result<TraceInput> {
    let Some(format) = RunFormat::from_path(path) else {
        bail!(
            "Unrecognized run file extension for {} (expected .json, .yaml or .yml)",
            path.display()
        );
    };

    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read run file {}", path.display()))?;
    let input = parse_run(&content, format)
        .wrap_err_with(|| format!("Failed to parse run file {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        months = input.snapshots.len(),
        traced_events = input.event_trace.len(),
        "Loaded run file"
    );
    Ok(input)
}
