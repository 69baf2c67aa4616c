//! Tests for market-return attribution

use crate::attribution::growth::{BOND_IMPACT, EQUITY_IMPACT, RESIDUAL_IMPACT};
use crate::attribution::{GrowthBasis, attribute_growth};
use crate::model::{GrowthComponent, WorldVars};

use super::support::assert_close;

fn world(equity: f64, bond: f64) -> WorldVars {
    WorldVars {
        equity_return: equity,
        bond_return: bond,
        ..Default::default()
    }
}

fn total(components: &[GrowthComponent]) -> f64 {
    components.iter().map(|c| c.amount).sum()
}

/// 60/40 split explains the engine figure exactly
#[test]
fn test_equity_bond_split() {
    let world = world(0.02, 0.005);
    let basis = GrowthBasis::new(100_000.0, 0.0, 1_400.0, 0.6, &world);

    let components = attribute_growth(basis, &world);

    assert_eq!(components.len(), 2);
    assert_eq!(components[0].label, EQUITY_IMPACT);
    assert_close(components[0].amount, 1_200.0);
    assert_eq!(components[0].formula, "60000.00 × 2.0000%");
    assert_eq!(components[1].label, BOND_IMPACT);
    assert_close(components[1].amount, 200.0);
    assert_eq!(components[1].formula, "40000.00 × 0.5000%");
}

/// Contributions are invested before returns apply
#[test]
fn test_base_includes_transfers() {
    let world = world(0.01, 0.0);
    // $5,000 moved Cash -> Invested this month
    let basis = GrowthBasis::new(95_000.0, -5_000.0, 1_000.0, 1.0, &world);

    assert_close(basis.invested_after_transfers, 100_000.0);
    let components = attribute_growth(basis, &world);
    assert_eq!(components.len(), 1);
    assert_close(components[0].amount, 1_000.0);
}

/// Whatever the split does not explain becomes a residual component
#[test]
fn test_residual_component() {
    let world = world(0.02, 0.005);
    let basis = GrowthBasis::new(100_000.0, 0.0, 1_500.0, 0.6, &world);

    let components = attribute_growth(basis, &world);

    assert_eq!(components.len(), 3);
    assert_eq!(components[2].label, RESIDUAL_IMPACT);
    assert_close(components[2].amount, 100.0);
    assert_close(total(&components), 1_500.0);
}

/// A flat month with no engine growth has no components
#[test]
fn test_flat_month_has_no_components() {
    let world = world(0.0, 0.0);
    let basis = GrowthBasis::new(100_000.0, 0.0, 0.0, 0.6, &world);

    assert!(attribute_growth(basis, &world).is_empty());
}

/// A nonzero rate on an empty balance is still shown
#[test]
fn test_rate_without_balance_is_shown() {
    let world = world(-0.03, 0.0);
    let basis = GrowthBasis::new(0.0, 0.0, 0.0, 0.6, &world);

    let components = attribute_growth(basis, &world);

    assert_eq!(components.len(), 1);
    assert_eq!(components[0].label, EQUITY_IMPACT);
    assert_eq!(components[0].amount, 0.0);
}

/// The realized path's base balance wins over the start-minus-transfer estimate
#[test]
fn test_realized_base_overrides_estimate() {
    let world = WorldVars {
        equity_return: 0.01,
        base_invested_before_return: Some(80_000.0),
        ..Default::default()
    };
    let basis = GrowthBasis::new(100_000.0, 0.0, 800.0, 1.0, &world);

    let components = attribute_growth(basis, &world);

    assert_eq!(components.len(), 1);
    assert_close(components[0].amount, 800.0);
}

#[test]
fn test_allocation_is_clamped() {
    let world = world(0.01, 0.01);
    let basis = GrowthBasis::new(1_000.0, 0.0, 10.0, 1.5, &world);

    assert_eq!(basis.equity_allocation, 1.0);
    let components = attribute_growth(basis, &world);
    assert_close(components[0].amount, 10.0);
    assert_eq!(components[1].amount, 0.0);
    assert_eq!(components.len(), 2);
}
