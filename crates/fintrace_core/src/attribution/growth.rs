//! Market-return attribution
//!
//! Splits the engine-reported market-return impact across equities and
//! bonds using the configured allocation. Whatever the split does not
//! explain (extended asset classes, intra-month timing, engine rounding) is
//! booked as a residual component so the components always foot.

use crate::model::{GrowthComponent, WorldVars};
use crate::money::RECONCILE_TOLERANCE;

pub const EQUITY_IMPACT: &str = "Equity impact";
pub const BOND_IMPACT: &str = "Bond impact";
pub const RESIDUAL_IMPACT: &str = "Other/Residual";

/// Inputs to the growth split for one month
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthBasis {
    /// Invested balance the returns were applied to
    pub invested_after_transfers: f64,
    pub equity_allocation: f64,
    pub actual_impact: f64,
}

impl GrowthBasis {
    /// Base balance from the realized path when reported, else `inv_start - transfer_cash`
    pub fn new(
        inv_start: f64,
        transfer_cash: f64,
        actual_impact: f64,
        equity_allocation: f64,
        world: &WorldVars,
    ) -> Self {
        Self {
            invested_after_transfers: world
                .base_invested_before_return
                .unwrap_or(inv_start - transfer_cash),
            equity_allocation: equity_allocation.clamp(0.0, 1.0),
            actual_impact,
        }
    }
}

pub fn attribute_growth(basis: GrowthBasis, world: &WorldVars) -> Vec<GrowthComponent> {
    let equity_portion = basis.invested_after_transfers * basis.equity_allocation;
    let bond_portion = basis.invested_after_transfers * (1.0 - basis.equity_allocation);
    let equity_impact = equity_portion * world.equity_return;
    let bond_impact = bond_portion * world.bond_return;

    let mut components = Vec::new();
    if equity_impact != 0.0 || world.equity_return != 0.0 {
        components.push(GrowthComponent {
            label: EQUITY_IMPACT.to_string(),
            amount: equity_impact,
            formula: rate_formula(equity_portion, world.equity_return),
        });
    }
    if bond_impact != 0.0 || world.bond_return != 0.0 {
        components.push(GrowthComponent {
            label: BOND_IMPACT.to_string(),
            amount: bond_impact,
            formula: rate_formula(bond_portion, world.bond_return),
        });
    }

    let residual = basis.actual_impact - (equity_impact + bond_impact);
    if residual.abs() > RECONCILE_TOLERANCE {
        components.push(GrowthComponent {
            label: RESIDUAL_IMPACT.to_string(),
            amount: residual,
            formula: format!(
                "{:.2} - {:.2} attributed",
                basis.actual_impact,
                equity_impact + bond_impact
            ),
        });
    }

    components
}

fn rate_formula(portion: f64, rate: f64) -> String {
    format!("{portion:.2} × {:.4}%", rate * 100.0)
}
