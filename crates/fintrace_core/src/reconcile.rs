//! Bucket reconciliation
//!
//! For every month the Cash and Invested buckets must satisfy
//!
//! ```text
//! cash_end = cash_start + operating_flow + transfer_cash
//! inv_end  = inv_start  + market_return_impact - transfer_cash
//! ```
//!
//! and, with the transfer cancelling out, net worth must move by exactly
//! `operating_flow + market_return_impact`. The three residuals are recorded
//! as data; a month whose largest residual exceeds the tolerance is reported,
//! never corrected.

use crate::model::{BreachStatus, MonthlySnapshot, StartBasis, TraceOptions};
use crate::money::round_cents;

/// Start balances for a month
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketStart {
    pub cash: f64,
    pub invested: f64,
}

/// Reconciled figures for one month
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthReconciliation {
    pub cash_start: f64,
    pub operating_flow: f64,
    pub transfer_cash: f64,
    pub cash_end: f64,
    pub breach: BreachStatus,
    pub inv_start: f64,
    pub market_return_impact: f64,
    pub inv_end: f64,
    pub cash_delta: f64,
    pub inv_delta: f64,
    pub nw_delta: f64,
    pub reconcile_delta: f64,
}

impl MonthReconciliation {
    pub fn end(&self) -> BucketStart {
        BucketStart {
            cash: self.cash_end,
            invested: self.inv_end,
        }
    }

    pub fn net_worth_end(&self) -> f64 {
        self.cash_end + self.inv_end
    }
}

/// Start balances for month zero
///
/// Explicit initial balances win. A bucket without one falls back to
/// back-solving from month zero's own flows (`start = end - change`), which
/// makes that bucket's residual zero by construction. The fallback is only
/// kept for callers that predate explicit initial balances.
pub fn month_zero_start(snapshot: &MonthlySnapshot, options: &TraceOptions) -> (BucketStart, StartBasis) {
    let explicit_cash = options
        .initial_cash
        .or_else(|| options.initial_accounts.map(|a| a.cash));
    let explicit_invested = options
        .initial_invested
        .or_else(|| options.initial_accounts.map(|a| a.invested()));

    let flows = &snapshot.flows;
    let cash_end = snapshot.cash;
    let inv_end = snapshot.balances().invested();
    let transfer_cash = flows.transfer_cash();

    let cash = explicit_cash.unwrap_or(cash_end - (flows.operating_flow() + transfer_cash));
    let invested =
        explicit_invested.unwrap_or(inv_end - (flows.investment_growth - transfer_cash));

    let basis = if explicit_cash.is_some() && explicit_invested.is_some() {
        StartBasis::Explicit
    } else {
        tracing::warn!(
            explicit_cash = explicit_cash.is_some(),
            explicit_invested = explicit_invested.is_some(),
            "Month zero start balances derived from flows; residuals for month zero are not meaningful"
        );
        StartBasis::DerivedFromFlows
    };

    (BucketStart { cash, invested }, basis)
}

/// Reconcile one month against its start balances
pub fn reconcile_month(
    snapshot: &MonthlySnapshot,
    start: BucketStart,
    cash_floor: f64,
) -> MonthReconciliation {
    let flows = &snapshot.flows;
    let operating_flow = flows.operating_flow();
    let transfer_cash = flows.transfer_cash();
    // The engine is the source of truth for growth; it is decomposed elsewhere, never recomputed
    let market_return_impact = flows.investment_growth;

    let cash_end = snapshot.cash;
    let inv_end = snapshot.balances().invested();

    let cash_delta = round_cents(cash_end - (start.cash + operating_flow + transfer_cash));
    let inv_delta = round_cents(inv_end - (start.invested + market_return_impact - transfer_cash));
    let nw_delta = round_cents(
        (cash_end + inv_end)
            - (start.cash + start.invested + operating_flow + market_return_impact),
    );
    let reconcile_delta = cash_delta.abs().max(inv_delta.abs()).max(nw_delta.abs());

    MonthReconciliation {
        cash_start: start.cash,
        operating_flow,
        transfer_cash,
        cash_end,
        breach: BreachStatus::classify(cash_end, cash_floor),
        inv_start: start.invested,
        market_return_impact,
        inv_end,
        cash_delta,
        inv_delta,
        nw_delta,
        reconcile_delta,
    }
}
