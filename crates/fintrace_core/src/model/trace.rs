//! Per-month trace records
//!
//! A [`TraceRow`] carries only the numeric summary of a month. The detail
//! that explains it (flow items, transfers, growth components, world
//! variables) lives in per-month dictionaries on [`super::TraceData`].

use serde::{Deserialize, Serialize};

use super::balances::AccountTag;
use super::ids::EventId;
use super::input::{AssetWeights, VolatilityState};
use super::month::MonthKey;

/// How far below the configured cash floor a month ended
///
/// Variants are ordered by severity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum BreachStatus {
    #[default]
    No,
    Floor,
    Negative,
}

impl BreachStatus {
    /// Negative cash wins over a floor breach
    pub fn classify(cash_end: f64, cash_floor: f64) -> Self {
        if cash_end < 0.0 {
            BreachStatus::Negative
        } else if cash_end < cash_floor {
            BreachStatus::Floor
        } else {
            BreachStatus::No
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BreachStatus::No => "No",
            BreachStatus::Floor => "Floor",
            BreachStatus::Negative => "Negative",
        }
    }
}

/// One reconciled month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraceRow {
    pub month: MonthKey,
    /// Zero-based position in the simulation
    pub index: usize,
    pub age: Option<f64>,

    pub cash_start: f64,
    pub operating_flow: f64,
    pub transfer_cash: f64,
    pub cash_end: f64,
    pub cash_floor: f64,
    pub breach: BreachStatus,

    pub inv_start: f64,
    pub market_return_impact: f64,
    pub inv_end: f64,

    pub net_worth_end: f64,

    pub cash_delta: f64,
    pub inv_delta: f64,
    pub nw_delta: f64,
    /// Largest absolute residual of the three checks
    pub reconcile_delta: f64,

    pub event_ids: Vec<EventId>,
}

impl TraceRow {
    pub fn is_reconciled(&self, tolerance: f64) -> bool {
        self.reconcile_delta <= tolerance
    }

    pub fn cash_change(&self) -> f64 {
        self.cash_end - self.cash_start
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FlowGroup {
    Income,
    Spending,
    Debt,
    OneTime,
    Other,
}

impl FlowGroup {
    pub fn label(self) -> &'static str {
        match self {
            FlowGroup::Income => "Income",
            FlowGroup::Spending => "Spending",
            FlowGroup::Debt => "Debt",
            FlowGroup::OneTime => "OneTime",
            FlowGroup::Other => "Other",
        }
    }
}

/// Where an attributed figure came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FlowSource {
    /// Before/after balances of an individual event
    Event,
    /// The snapshot's aggregate flow totals
    Aggregate,
}

impl FlowSource {
    pub fn label(self) -> &'static str {
        match self {
            FlowSource::Event => "event",
            FlowSource::Aggregate => "aggregate",
        }
    }
}

/// One attributed cause of a month's operating flow
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowItem {
    /// `YYYY-MM-NNN`, stable within a trace
    pub posting_id: String,
    pub group: FlowGroup,
    pub label: String,
    pub amount: f64,
    pub source: FlowSource,
    pub event_id: Option<EventId>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransferReason {
    ScheduledContribution,
    PlannedSale,
    AutoRestoreFloor,
    Rebalancing,
    RothConversion,
    RmdWithdrawal,
    #[serde(rename = "None")]
    Unattributed,
}

impl TransferReason {
    pub fn label(self) -> &'static str {
        match self {
            TransferReason::ScheduledContribution => "Scheduled contribution",
            TransferReason::PlannedSale => "Planned sale",
            TransferReason::AutoRestoreFloor => "Auto-restore floor",
            TransferReason::Rebalancing => "Rebalancing",
            TransferReason::RothConversion => "Roth conversion",
            TransferReason::RmdWithdrawal => "RMD withdrawal",
            TransferReason::Unattributed => "None",
        }
    }
}

/// One attributed cause of a month's inter-bucket transfer
///
/// `amount` is the net effect on Cash: negative for Cash → Invested,
/// positive for Invested → Cash. Internal moves between investment accounts
/// are recorded with `amount == 0.0` and the moved sum in `gross_amount`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transfer {
    pub amount: f64,
    pub reason: TransferReason,
    pub source_account: Option<AccountTag>,
    pub target_account: Option<AccountTag>,
    pub event_id: Option<EventId>,
    pub gross_amount: Option<f64>,
}

impl Transfer {
    pub fn is_internal(&self) -> bool {
        self.amount == 0.0 && self.gross_amount.is_some()
    }
}

/// One attributed cause of a month's market-return impact
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GrowthComponent {
    pub label: String,
    pub amount: f64,
    /// Human-readable derivation, e.g. `60000.00 × 2.0000%`
    pub formula: String,
}

/// Realized market inputs for one month
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorldVars {
    pub equity_return: f64,
    pub bond_return: f64,
    pub international_return: Option<f64>,
    pub reits_return: Option<f64>,
    pub inflation: f64,

    pub base_invested_before_return: Option<f64>,
    pub weights: Option<AssetWeights>,
    pub weighted_return: Option<f64>,
    pub computed_growth: Option<f64>,
    pub volatility: Option<VolatilityState>,
}

/// An event referenced by the trace
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraceEvent {
    pub id: EventId,
    pub event_type: String,
    pub name: Option<String>,
    pub month: MonthKey,
    pub amount: Option<f64>,
}
