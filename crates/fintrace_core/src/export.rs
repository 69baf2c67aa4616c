//! Flat-file export of a finished trace
//!
//! Four documents, each a pure function of the trace (and, for metadata,
//! the export timestamp passed in by the caller):
//! - the 12-column monthly summary table
//! - the flow-item table
//! - the world-variables table
//! - a JSON metadata document with the run metadata and summary
//!
//! Column order and header text are an external contract. Every entry point
//! validates the container first and refuses to render an inconsistent one.

use jiff::Timestamp;
use serde::Serialize;

use crate::error::ExportError;
use crate::model::{TraceData, TraceRunMeta, TraceSummary};
use crate::money::{round_cents, whole_dollars};

pub const SUMMARY_FILE: &str = "trace_summary.csv";
pub const FLOW_ITEMS_FILE: &str = "trace_flow_items.csv";
pub const WORLD_VARS_FILE: &str = "trace_world_vars.csv";
pub const METADATA_FILE: &str = "trace_metadata.json";

pub const SUMMARY_HEADERS: [&str; 12] = [
    "Month",
    "Start Cash",
    "Operating Flow",
    "Transfer",
    "End Cash",
    "Cash Floor",
    "Breach",
    "Start Inv",
    "Market Return",
    "End Inv",
    "End NW",
    "Reconcile Δ",
];

pub const FLOW_ITEM_HEADERS: [&str; 7] = [
    "Month",
    "Posting ID",
    "Group",
    "Label",
    "Amount",
    "Source",
    "Event ID",
];

pub const WORLD_VAR_HEADERS: [&str; 4] = ["Month", "Equity Return %", "Bond Return %", "Inflation %"];

/// All four export documents, rendered together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBundle {
    pub summary_csv: String,
    pub flow_items_csv: String,
    pub world_vars_csv: String,
    pub metadata_json: String,
}

impl ExportBundle {
    /// `(file name, contents)` pairs in a fixed order
    pub fn files(&self) -> [(&'static str, &str); 4] {
        [
            (SUMMARY_FILE, &self.summary_csv),
            (FLOW_ITEMS_FILE, &self.flow_items_csv),
            (WORLD_VARS_FILE, &self.world_vars_csv),
            (METADATA_FILE, &self.metadata_json),
        ]
    }
}

pub fn export_all(trace: &TraceData, exported_at: Timestamp) -> Result<ExportBundle, ExportError> {
    Ok(ExportBundle {
        summary_csv: summary_csv(trace)?,
        flow_items_csv: flow_items_csv(trace)?,
        world_vars_csv: world_vars_csv(trace)?,
        metadata_json: metadata_json(trace, exported_at)?,
    })
}

/// Monthly summary; dollars rounded to whole dollars, reconcile delta to cents
pub fn summary_csv(trace: &TraceData) -> Result<String, ExportError> {
    trace.validate()?;
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(SUMMARY_HEADERS)?;

    for row in &trace.rows {
        wtr.write_record([
            row.month.to_string(),
            whole_dollars(row.cash_start).to_string(),
            whole_dollars(row.operating_flow).to_string(),
            whole_dollars(row.transfer_cash).to_string(),
            whole_dollars(row.cash_end).to_string(),
            whole_dollars(row.cash_floor).to_string(),
            row.breach.label().to_string(),
            whole_dollars(row.inv_start).to_string(),
            whole_dollars(row.market_return_impact).to_string(),
            whole_dollars(row.inv_end).to_string(),
            whole_dollars(row.net_worth_end).to_string(),
            format!("{:.2}", round_cents(row.reconcile_delta)),
        ])?;
    }

    finish(wtr)
}

/// Every attributed flow item, month by month
pub fn flow_items_csv(trace: &TraceData) -> Result<String, ExportError> {
    trace.validate()?;
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(FLOW_ITEM_HEADERS)?;

    for (month, items) in &trace.flow_items {
        for item in items {
            wtr.write_record([
                month.to_string(),
                item.posting_id.clone(),
                item.group.label().to_string(),
                item.label.clone(),
                format!("{:.2}", round_cents(item.amount)),
                item.source.label().to_string(),
                item.event_id
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            ])?;
        }
    }

    finish(wtr)
}

/// Realized returns per month as percentages with four decimals
pub fn world_vars_csv(trace: &TraceData) -> Result<String, ExportError> {
    trace.validate()?;
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(WORLD_VAR_HEADERS)?;

    for (month, vars) in &trace.world_vars {
        wtr.write_record([
            month.to_string(),
            percent(vars.equity_return),
            percent(vars.bond_return),
            percent(vars.inflation),
        ])?;
    }

    finish(wtr)
}

#[derive(Serialize)]
struct ExportMetadata<'a> {
    #[serde(flatten)]
    meta: &'a TraceRunMeta,
    summary: &'a TraceSummary,
    exported_at: Timestamp,
}

/// Run metadata with the summary nested under `summary`
pub fn metadata_json(trace: &TraceData, exported_at: Timestamp) -> Result<String, ExportError> {
    trace.validate()?;
    let doc = ExportMetadata {
        meta: &trace.meta,
        summary: &trace.summary,
        exported_at,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

fn percent(rate: f64) -> String {
    let pct = (rate * 1_000_000.0).round() / 10_000.0;
    let pct = if pct == 0.0 { 0.0 } else { pct };
    format!("{pct:.4}")
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}
