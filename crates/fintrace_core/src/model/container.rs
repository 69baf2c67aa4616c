//! The trace container
//!
//! [`TraceData`] exclusively owns everything produced for a run. Rows hold
//! numeric summaries and event ids only; per-month detail is stored in
//! ordered maps keyed by [`MonthKey`] so it can be looked up on demand and
//! exported in chronological order.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::TraceError;

use super::balances::AccountBalances;
use super::ids::EventId;
use super::input::GlobalAssumptions;
use super::month::MonthKey;
use super::trace::{FlowItem, GrowthComponent, TraceEvent, TraceRow, Transfer, WorldVars};

/// Order in which a month's changes are applied, at end of month
pub const ORDERING_CONVENTION: &str = "OperatingFlow->Transfers->MarketReturnImpact";

/// Quick-navigation pointers computed from the finished rows
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TraceSummary {
    pub total_months: usize,
    pub reconciled_months: usize,
    pub first_breach_month: Option<MonthKey>,
    pub first_negative_cash_month: Option<MonthKey>,
    pub first_mismatch_month: Option<MonthKey>,
    pub worst_drawdown_month: Option<MonthKey>,
    pub worst_drawdown: Option<f64>,
    pub largest_transfer_month: Option<MonthKey>,
    pub largest_transfer: Option<f64>,
    pub largest_negative_return_month: Option<MonthKey>,
    pub largest_negative_return: Option<f64>,
}

impl TraceSummary {
    pub fn is_fully_reconciled(&self) -> bool {
        self.reconciled_months == self.total_months
    }
}

/// How month zero's start balances were obtained
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StartBasis {
    /// Supplied by the caller
    #[default]
    Explicit,
    /// Back-solved from month zero's own flows. Residuals for month zero are
    /// zero by construction and prove nothing.
    DerivedFromFlows,
}

/// Immutable run-level descriptors
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraceRunMeta {
    pub scenario_id: String,
    pub seed: u64,
    pub path_index: u32,
    pub ordering_convention: String,
    pub reconcile_tolerance: f64,
    pub rounding_policy: String,
    pub equity_allocation: f64,
    pub cash_floor: f64,
    pub simulation_mode: String,
    pub model_description: Option<String>,
    pub start_basis: StartBasis,
    pub assumptions: GlobalAssumptions,
}

/// Fully attributed, reconciled trace of one simulation run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraceData {
    pub rows: Vec<TraceRow>,
    pub flow_items: BTreeMap<MonthKey, Vec<FlowItem>>,
    pub transfers: BTreeMap<MonthKey, Vec<Transfer>>,
    pub growth_components: BTreeMap<MonthKey, Vec<GrowthComponent>>,
    pub world_vars: BTreeMap<MonthKey, WorldVars>,
    pub start_balances: BTreeMap<MonthKey, AccountBalances>,
    pub end_balances: BTreeMap<MonthKey, AccountBalances>,
    pub events: BTreeMap<EventId, TraceEvent>,
    pub summary: TraceSummary,
    pub meta: TraceRunMeta,
}

impl TraceData {
    pub fn row(&self, month: MonthKey) -> Option<&TraceRow> {
        self.rows.iter().find(|row| row.month == month)
    }

    pub fn flow_items_for(&self, month: MonthKey) -> &[FlowItem] {
        self.flow_items.get(&month).map_or(&[], Vec::as_slice)
    }

    pub fn transfers_for(&self, month: MonthKey) -> &[Transfer] {
        self.transfers.get(&month).map_or(&[], Vec::as_slice)
    }

    pub fn growth_components_for(&self, month: MonthKey) -> &[GrowthComponent] {
        self.growth_components.get(&month).map_or(&[], Vec::as_slice)
    }

    /// Events touched in a month, in the order the row lists them
    pub fn events_for(&self, month: MonthKey) -> impl Iterator<Item = &TraceEvent> {
        self.row(month)
            .into_iter()
            .flat_map(|row| row.event_ids.iter())
            .filter_map(|id| self.events.get(id))
    }

    /// Check that the container is internally consistent
    ///
    /// Rows must be indexed `0..n` in order with unique months, every
    /// per-month dictionary and every event must point at a month present in
    /// the rows, and the summary must describe the same number of months.
    pub fn validate(&self) -> Result<(), TraceError> {
        let mut months = BTreeSet::new();
        for (position, row) in self.rows.iter().enumerate() {
            if row.index != position {
                return Err(TraceError::RowIndexOutOfOrder {
                    position,
                    index: row.index,
                });
            }
            if !months.insert(row.month) {
                return Err(TraceError::DuplicateMonth(row.month));
            }
        }

        check_keys("flow_items", self.flow_items.keys(), &months)?;
        check_keys("transfers", self.transfers.keys(), &months)?;
        check_keys("growth_components", self.growth_components.keys(), &months)?;
        check_keys("world_vars", self.world_vars.keys(), &months)?;
        check_keys("start_balances", self.start_balances.keys(), &months)?;
        check_keys("end_balances", self.end_balances.keys(), &months)?;

        if let Some(event) = self.events.values().find(|e| !months.contains(&e.month)) {
            return Err(TraceError::EventMonthMissing {
                event_id: event.id.clone(),
                month: event.month,
            });
        }

        if self.summary.total_months != self.rows.len() {
            return Err(TraceError::SummaryMismatch {
                summary_months: self.summary.total_months,
                row_count: self.rows.len(),
            });
        }

        Ok(())
    }
}

fn check_keys<'a>(
    table: &'static str,
    keys: impl Iterator<Item = &'a MonthKey>,
    months: &BTreeSet<MonthKey>,
) -> Result<(), TraceError> {
    for month in keys {
        if !months.contains(month) {
            return Err(TraceError::UnknownMonth {
                table,
                month: *month,
            });
        }
    }
    Ok(())
}
