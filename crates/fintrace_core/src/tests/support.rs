//! Fluent helpers for building snapshots and event traces in tests

use crate::model::{
    AccountBalances, AccountValue, EventId, EventTraceEntry, FlowsDetail, MonthlySnapshot,
    TraceInput, TraceOptions,
};

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= 1e-6,
        "expected {expected}, got {actual}"
    );
}

pub struct SnapshotBuilder(MonthlySnapshot);

impl SnapshotBuilder {
    pub fn new(year: i16, month: i8) -> Self {
        Self(MonthlySnapshot {
            year,
            month,
            ..Default::default()
        })
    }

    pub fn cash(mut self, value: f64) -> Self {
        self.0.cash = value;
        self
    }

    pub fn taxable(mut self, value: f64) -> Self {
        self.0.accounts.taxable = AccountValue { total_value: value };
        self
    }

    pub fn tax_deferred(mut self, value: f64) -> Self {
        self.0.accounts.tax_deferred = AccountValue { total_value: value };
        self
    }

    pub fn flows(mut self, f: impl FnOnce(&mut FlowsDetail)) -> Self {
        f(&mut self.0.flows);
        self
    }

    pub fn returns(mut self, equity: f64, bond: f64) -> Self {
        self.0.market_returns.equity = equity;
        self.0.market_returns.bond = bond;
        self
    }

    pub fn events(mut self, ids: &[&str]) -> Self {
        self.0.event_ids = ids.iter().map(|id| EventId::from(*id)).collect();
        self
    }

    pub fn build(self) -> MonthlySnapshot {
        self.0
    }
}

/// Options with explicit month-zero balances
pub fn explicit_start(cash: f64, invested: f64) -> TraceOptions {
    TraceOptions {
        scenario_id: "test".to_string(),
        initial_cash: Some(cash),
        initial_invested: Some(invested),
        ..Default::default()
    }
}

pub fn input(snapshots: Vec<MonthlySnapshot>, options: TraceOptions) -> TraceInput {
    TraceInput {
        snapshots,
        options,
        ..Default::default()
    }
}

/// Event-trace entry moving only cash and the taxable account
pub fn entry(
    id: &str,
    month_offset: usize,
    event_type: &str,
    before: (f64, f64),
    after: (f64, f64),
) -> EventTraceEntry {
    EventTraceEntry {
        event_id: EventId::from(id),
        month_offset,
        event_type: event_type.to_string(),
        event_name: None,
        before: AccountBalances {
            cash: before.0,
            taxable: before.1,
            ..Default::default()
        },
        after: AccountBalances {
            cash: after.0,
            taxable: after.1,
            ..Default::default()
        },
    }
}
