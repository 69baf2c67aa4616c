//! Simulation output consumed by the trace builder
//!
//! These types mirror what the simulation engine hands over for a single
//! run: one [`MonthlySnapshot`] per month in simulation order, a flat event
//! trace with before/after balances, the global assumptions, and the options
//! the run was configured with.
//!
//! Every numeric field defaults to zero and every list to empty, so a
//! snapshot with missing fields still produces a trace.

use serde::{Deserialize, Serialize};

use super::balances::{AccountBalances, AccountTag};
use super::ids::EventId;

/// Everything needed to build one trace
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceInput {
    pub snapshots: Vec<MonthlySnapshot>,
    pub event_trace: Vec<EventTraceEntry>,
    /// Optional catalog of events, used to populate the event lookup
    pub events: Vec<EventRecord>,
    pub assumptions: GlobalAssumptions,
    pub options: TraceOptions,
}

/// End-of-month state reported by the engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthlySnapshot {
    pub year: i16,
    pub month: i8,
    pub age: Option<f64>,
    pub cash: f64,
    pub accounts: SnapshotAccounts,
    pub flows: FlowsDetail,
    pub market_returns: MarketReturns,
    pub strategy_executions: Vec<StrategyExecution>,
    pub event_ids: Vec<EventId>,
}

impl MonthlySnapshot {
    pub fn balances(&self) -> AccountBalances {
        AccountBalances {
            cash: self.cash,
            taxable: self.accounts.taxable.total_value,
            tax_deferred: self.accounts.tax_deferred.total_value,
            roth: self.accounts.roth.total_value,
            hsa: self.accounts.hsa.map(|a| a.total_value),
            education: self.accounts.education.map(|a| a.total_value),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AccountValue {
    pub total_value: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SnapshotAccounts {
    pub taxable: AccountValue,
    pub tax_deferred: AccountValue,
    pub roth: AccountValue,
    pub hsa: Option<AccountValue>,
    pub education: Option<AccountValue>,
}

/// Itemized flows for one month
///
/// Category fields (`salary`, `housing`, ...) itemize the totals; they need
/// not cover them completely.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlowsDetail {
    pub total_income: f64,
    pub salary: f64,
    pub bonus: f64,
    pub rsu: f64,
    pub social_security: f64,
    pub pension: f64,
    pub dividends: f64,
    pub interest: f64,

    pub total_expenses: f64,
    pub housing: f64,
    pub transportation: f64,
    pub food: f64,
    pub other_expenses: f64,

    pub debt_principal: f64,
    pub debt_interest: f64,
    pub tax_withheld: f64,
    pub taxes_paid: f64,

    /// Total moved from Cash into investment accounts
    pub contributions: f64,
    pub contributions_by_account: ContributionBreakdown,
    /// Total moved from investment accounts into Cash
    pub withdrawals: f64,
    /// Portion of `withdrawals` sold automatically to restore the cash floor
    pub auto_shortfall_cover: f64,

    /// Engine-reported market-return impact on the Invested bucket
    pub investment_growth: f64,
}

impl FlowsDetail {
    /// income − expenses − debt service − withholding − taxes paid
    pub fn operating_flow(&self) -> f64 {
        self.total_income
            - self.total_expenses
            - self.debt_principal
            - self.debt_interest
            - self.tax_withheld
            - self.taxes_paid
    }

    /// withdrawals − contributions; negative means Cash → Invested
    pub fn transfer_cash(&self) -> f64 {
        self.withdrawals - self.contributions
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContributionBreakdown {
    pub taxable: f64,
    pub tax_deferred: f64,
    pub roth: f64,
    pub hsa: f64,
    pub education: f64,
}

impl ContributionBreakdown {
    /// Account receiving the largest contribution, if any
    pub fn primary_target(&self) -> Option<AccountTag> {
        [
            (AccountTag::Taxable, self.taxable),
            (AccountTag::TaxDeferred, self.tax_deferred),
            (AccountTag::Roth, self.roth),
            (AccountTag::Hsa, self.hsa),
            (AccountTag::Education, self.education),
        ]
        .into_iter()
        .filter(|(_, amount)| *amount > 0.0)
        .fold(None, |best: Option<(AccountTag, f64)>, (tag, amount)| match best {
            Some((_, best_amount)) if best_amount >= amount => best,
            _ => Some((tag, amount)),
        })
        .map(|(tag, _)| tag)
    }
}

/// Realized monthly market returns, as fractions
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarketReturns {
    pub equity: f64,
    pub bond: f64,
    pub international: Option<f64>,
    pub reits: Option<f64>,
    pub inflation: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    RothConversion,
    Rebalance,
    Rmd,
    #[default]
    #[serde(other)]
    Other,
}

/// A strategy the engine executed during the month
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StrategyExecution {
    pub kind: StrategyKind,
    pub amount: f64,
    pub source_account: Option<AccountTag>,
    pub target_account: Option<AccountTag>,
    pub event_id: Option<EventId>,
}

/// One entry of the engine's event trace
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EventTraceEntry {
    pub event_id: EventId,
    /// Zero-based index of the month the event was applied in
    pub month_offset: usize,
    pub event_type: String,
    pub event_name: Option<String>,
    pub before: AccountBalances,
    pub after: AccountBalances,
}

impl EventTraceEntry {
    pub fn cash_delta(&self) -> f64 {
        self.after.cash - self.before.cash
    }

    pub fn invested_delta(&self) -> f64 {
        self.after.invested() - self.before.invested()
    }

    pub fn label(&self) -> &str {
        self.event_name.as_deref().unwrap_or(&self.event_type)
    }
}

/// Catalog entry describing a simulation event
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EventRecord {
    pub id: EventId,
    pub event_type: String,
    pub name: Option<String>,
    pub month_offset: usize,
    pub amount: Option<f64>,
}

/// Annual planning assumptions; carried into the metadata for display only
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlobalAssumptions {
    pub stock_return: f64,
    pub bond_return: f64,
    pub inflation: f64,
    pub international_return: Option<f64>,
    pub home_appreciation: Option<f64>,
}

/// Run-level options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TraceOptions {
    pub scenario_id: String,
    pub seed: u64,
    pub path_index: u32,
    pub cash_floor: f64,
    /// Share of the Invested bucket held in equities, 0..=1
    pub equity_allocation: f64,
    pub initial_cash: Option<f64>,
    pub initial_invested: Option<f64>,
    pub initial_accounts: Option<AccountBalances>,
    pub simulation_mode: String,
    pub model_description: Option<String>,
    pub realized_path: Vec<RealizedMonthVars>,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            scenario_id: String::new(),
            seed: 0,
            path_index: 0,
            cash_floor: 0.0,
            equity_allocation: 0.6,
            initial_cash: None,
            initial_invested: None,
            initial_accounts: None,
            simulation_mode: "deterministic".to_string(),
            model_description: None,
            realized_path: Vec::new(),
        }
    }
}

/// Per-asset weights used by the engine when applying returns
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetWeights {
    pub equity: f64,
    pub bond: f64,
    pub international: Option<f64>,
    pub reits: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VolatilityState {
    pub regime: String,
    pub multiplier: f64,
}

/// "Show the math" linkage for one month of the realized path
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RealizedMonthVars {
    pub month_index: usize,
    pub base_invested_before_return: Option<f64>,
    pub weights: Option<AssetWeights>,
    pub weighted_return: Option<f64>,
    pub computed_growth: Option<f64>,
    pub volatility: Option<VolatilityState>,
}
