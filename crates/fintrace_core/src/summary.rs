//! Quick-navigation summary of a finished trace
//!
//! "First" pointers latch on the earliest month and never move. Extremal
//! pointers only move on a strictly larger magnitude, so ties keep the
//! earliest month. All extremal scans are seeded at zero: a month without a
//! cash decline, transfer, or negative return is never flagged.

use crate::model::{BreachStatus, TraceRow, TraceSummary};

pub fn summarize(rows: &[TraceRow], tolerance: f64) -> TraceSummary {
    let mut summary = TraceSummary {
        total_months: rows.len(),
        ..Default::default()
    };

    let mut worst_drawdown = 0.0;
    let mut largest_transfer = 0.0;
    let mut largest_negative_return = 0.0;

    for row in rows {
        if row.is_reconciled(tolerance) {
            summary.reconciled_months += 1;
        } else if summary.first_mismatch_month.is_none() {
            summary.first_mismatch_month = Some(row.month);
        }

        if row.breach != BreachStatus::No && summary.first_breach_month.is_none() {
            summary.first_breach_month = Some(row.month);
        }
        if row.cash_end < 0.0 && summary.first_negative_cash_month.is_none() {
            summary.first_negative_cash_month = Some(row.month);
        }

        let drawdown = row.cash_change();
        if drawdown < worst_drawdown {
            worst_drawdown = drawdown;
            summary.worst_drawdown_month = Some(row.month);
            summary.worst_drawdown = Some(drawdown);
        }

        let transfer = row.transfer_cash.abs();
        if transfer > largest_transfer {
            largest_transfer = transfer;
            summary.largest_transfer_month = Some(row.month);
            summary.largest_transfer = Some(row.transfer_cash);
        }

        if row.market_return_impact < largest_negative_return {
            largest_negative_return = row.market_return_impact;
            summary.largest_negative_return_month = Some(row.month);
            summary.largest_negative_return = Some(row.market_return_impact);
        }
    }

    summary
}
