//! Tests for bucket reconciliation
//!
//! These tests verify:
//! - Residual formulas for cash, invested, and net worth
//! - Continuity between consecutive months
//! - Month-zero start balances (explicit and legacy derivation)
//! - Breach classification order

use crate::build_trace;
use crate::model::{AccountBalances, BreachStatus, MonthKey, StartBasis, TraceOptions};
use crate::reconcile::{BucketStart, reconcile_month};

use super::support::{SnapshotBuilder, assert_close, explicit_start, input};

/// A misreported transfer shows up in both bucket residuals but not in net worth
#[test]
fn test_net_worth_check_ignores_transfer_errors() {
    // $5,000 reported as contributed, only $4,000 arrived in taxable
    let snapshot = SnapshotBuilder::new(2025, 1)
        .cash(16_000.0)
        .taxable(4_000.0)
        .flows(|f| f.contributions = 5_000.0)
        .build();

    let rec = reconcile_month(
        &snapshot,
        BucketStart {
            cash: 20_000.0,
            invested: 0.0,
        },
        0.0,
    );

    assert_close(rec.cash_delta, 1_000.0);
    assert_close(rec.inv_delta, -1_000.0);
    assert_close(rec.nw_delta, 0.0);
    assert_close(rec.reconcile_delta, 1_000.0);
}

/// Residuals smaller than half a cent round away
#[test]
fn test_residuals_are_rounded_to_cents() {
    let snapshot = SnapshotBuilder::new(2025, 1)
        .cash(0.1 + 0.2)
        .flows(|f| {
            f.total_income = 0.1;
            f.salary = 0.1;
        })
        .build();

    let rec = reconcile_month(
        &snapshot,
        BucketStart {
            cash: 0.2,
            invested: 0.0,
        },
        0.0,
    );

    assert_eq!(rec.cash_delta, 0.0);
    assert_eq!(rec.reconcile_delta, 0.0);
}

/// Market return is taken from the engine, not recomputed from rates
#[test]
fn test_market_return_comes_from_engine() {
    let snapshot = SnapshotBuilder::new(2025, 1)
        .taxable(101_234.56)
        .returns(0.5, 0.5)
        .flows(|f| f.investment_growth = 1_234.56)
        .build();

    let rec = reconcile_month(
        &snapshot,
        BucketStart {
            cash: 0.0,
            invested: 100_000.0,
        },
        0.0,
    );

    assert_close(rec.market_return_impact, 1_234.56);
    assert_eq!(rec.inv_delta, 0.0);
}

/// End of month i is exactly the start of month i + 1, even after a mismatch
#[test]
fn test_continuity_survives_mismatched_month() {
    let snapshots = vec![
        SnapshotBuilder::new(2025, 1)
            .cash(10_500.0)
            .flows(|f| f.total_income = 1_000.0)
            .build(),
        SnapshotBuilder::new(2025, 2)
            .cash(9_876.54)
            .flows(|f| f.total_expenses = 300.0)
            .build(),
        SnapshotBuilder::new(2025, 3).cash(9_876.54).build(),
    ];

    let trace = build_trace(&input(snapshots, explicit_start(10_000.0, 0.0)));

    assert_close(trace.rows[0].cash_delta, -500.0);
    for pair in trace.rows.windows(2) {
        assert_eq!(pair[0].cash_end, pair[1].cash_start);
        assert_eq!(pair[0].inv_end, pair[1].inv_start);
    }
    assert_eq!(trace.rows[2].reconcile_delta, 0.0);
}

/// Without explicit balances, month zero is back-solved and flagged
#[test]
fn test_month_zero_legacy_derivation() {
    let snapshots = vec![
        SnapshotBuilder::new(2025, 1)
            .cash(15_000.0)
            .taxable(5_000.0)
            .flows(|f| {
                f.total_income = 2_000.0;
                f.contributions = 5_000.0;
            })
            .build(),
    ];

    let trace = build_trace(&input(snapshots, TraceOptions::default()));
    let row = &trace.rows[0];

    assert_eq!(trace.meta.start_basis, StartBasis::DerivedFromFlows);
    assert_close(row.cash_start, 18_000.0);
    assert_close(row.inv_start, 0.0);
    assert_eq!(row.reconcile_delta, 0.0);
    assert!(!trace.start_balances.contains_key(&MonthKey::new(2025, 1)));
}

/// Only one bucket supplied still counts as derived
#[test]
fn test_month_zero_partial_explicit_is_derived() {
    let snapshots = vec![SnapshotBuilder::new(2025, 1).cash(100.0).taxable(50.0).build()];
    let options = TraceOptions {
        initial_cash: Some(100.0),
        ..Default::default()
    };

    let trace = build_trace(&input(snapshots, options));

    assert_eq!(trace.meta.start_basis, StartBasis::DerivedFromFlows);
    assert_close(trace.rows[0].inv_start, 50.0);
}

/// Per-account initial balances provide both buckets and the start snapshot
#[test]
fn test_month_zero_from_initial_accounts() {
    let initial = AccountBalances {
        cash: 1_000.0,
        taxable: 5_000.0,
        roth: 2_500.0,
        hsa: Some(500.0),
        ..Default::default()
    };
    let snapshots = vec![
        SnapshotBuilder::new(2025, 1)
            .cash(1_000.0)
            .taxable(8_000.0)
            .build(),
    ];
    let options = TraceOptions {
        initial_accounts: Some(initial),
        ..Default::default()
    };

    let trace = build_trace(&input(snapshots, options));
    let month = MonthKey::new(2025, 1);

    assert_eq!(trace.meta.start_basis, StartBasis::Explicit);
    assert_close(trace.rows[0].cash_start, 1_000.0);
    assert_close(trace.rows[0].inv_start, 8_000.0);
    assert_eq!(trace.start_balances.get(&month), Some(&initial));
    assert_eq!(trace.rows[0].reconcile_delta, 0.0);
}

/// Negative cash always wins over a floor breach
#[test]
fn test_breach_classification_order() {
    assert_eq!(BreachStatus::classify(-0.01, 1_000.0), BreachStatus::Negative);
    assert_eq!(BreachStatus::classify(-500.0, -1_000.0), BreachStatus::Negative);
    assert_eq!(BreachStatus::classify(0.0, 1_000.0), BreachStatus::Floor);
    assert_eq!(BreachStatus::classify(999.99, 1_000.0), BreachStatus::Floor);
    assert_eq!(BreachStatus::classify(1_000.0, 1_000.0), BreachStatus::No);
    assert_eq!(BreachStatus::classify(0.0, 0.0), BreachStatus::No);
    assert!(BreachStatus::Negative > BreachStatus::Floor);
}

/// An empty run yields an empty trace with nothing flagged
#[test]
fn test_empty_snapshots() {
    let trace = build_trace(&input(Vec::new(), explicit_start(0.0, 0.0)));

    assert!(trace.rows.is_empty());
    assert!(trace.flow_items.is_empty());
    assert_eq!(trace.summary.total_months, 0);
    assert_eq!(trace.summary.reconciled_months, 0);
    assert!(trace.summary.first_mismatch_month.is_none());
    assert!(trace.summary.largest_transfer_month.is_none());
    assert!(trace.validate().is_ok());
}
