//! Audit report printed by `fintrace check`

use std::fmt::Write;

use fintrace_core::model::{MonthKey, StartBasis, TraceData, TraceSummary};
use serde::Serialize;

use crate::util::format::{format_currency, format_currency_short, format_share};

/// Residuals of one month that failed to reconcile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mismatch {
    pub month: MonthKey,
    pub cash_delta: f64,
    pub inv_delta: f64,
    pub nw_delta: f64,
}

#[derive(Debug, Serialize)]
pub struct CheckReport<'a> {
    pub scenario_id: &'a str,
    pub path_index: u32,
    pub start_basis: StartBasis,
    pub summary: &'a TraceSummary,
    pub mismatches: Vec<Mismatch>,
}

impl<'a> CheckReport<'a> {
    pub fn new(trace: &'a TraceData) -> Self {
        let tolerance = trace.meta.reconcile_tolerance;
        let mismatches = trace
            .rows
            .iter()
            .filter(|row| !row.is_reconciled(tolerance))
            .map(|row| Mismatch {
                month: row.month,
                cash_delta: row.cash_delta,
                inv_delta: row.inv_delta,
                nw_delta: row.nw_delta,
            })
            .collect();

        Self {
            scenario_id: &trace.meta.scenario_id,
            path_index: trace.meta.path_index,
            start_basis: trace.meta.start_basis,
            summary: &trace.summary,
            mismatches,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Plain-text rendering for the terminal
    pub fn render(&self) -> String {
        let summary = self.summary;
        let mut out = String::new();

        let _ = writeln!(out, "Scenario {} (path {})", self.scenario_id, self.path_index);
        let _ = writeln!(
            out,
            "  Reconciled months:     {}",
            format_share(summary.reconciled_months, summary.total_months)
        );
        if self.start_basis == StartBasis::DerivedFromFlows {
            let _ = writeln!(
                out,
                "  Note: month zero start balances were derived from flows"
            );
        }

        month_line(&mut out, "First floor breach", summary.first_breach_month, None);
        month_line(&mut out, "First negative cash", summary.first_negative_cash_month, None);
        month_line(&mut out, "First mismatch", summary.first_mismatch_month, None);
        month_line(
            &mut out,
            "Worst drawdown",
            summary.worst_drawdown_month,
            summary.worst_drawdown,
        );
        month_line(
            &mut out,
            "Largest transfer",
            summary.largest_transfer_month,
            summary.largest_transfer,
        );
        month_line(
            &mut out,
            "Largest negative return",
            summary.largest_negative_return_month,
            summary.largest_negative_return,
        );

        if !self.mismatches.is_empty() {
            let _ = writeln!(out, "  Unreconciled months:");
            for m in &self.mismatches {
                let _ = writeln!(
                    out,
                    "    {}  cash {}  invested {}  net worth {}",
                    m.month,
                    format_currency(m.cash_delta),
                    format_currency(m.inv_delta),
                    format_currency(m.nw_delta)
                );
            }
        }

        out
    }
}

fn month_line(out: &mut String, label: &str, month: Option<MonthKey>, amount: Option<f64>) {
    let value = match (month, amount) {
        (Some(month), Some(amount)) => format!("{month} ({})", format_currency_short(amount)),
        (Some(month), None) => month.to_string(),
        (None, _) => "none".to_string(),
    };
    let _ = writeln!(out, "  {:<23}{value}", format!("{label}:"));
}
