mod balances;
mod container;
mod ids;
mod input;
mod month;
mod trace;

pub use balances::{AccountBalances, AccountTag};
pub use container::{ORDERING_CONVENTION, StartBasis, TraceData, TraceRunMeta, TraceSummary};
pub use ids::EventId;
pub use input::{
    AccountValue, AssetWeights, ContributionBreakdown, EventRecord, EventTraceEntry, FlowsDetail,
    GlobalAssumptions, MarketReturns, MonthlySnapshot, RealizedMonthVars, SnapshotAccounts,
    StrategyExecution, StrategyKind, TraceInput, TraceOptions, VolatilityState,
};
pub use month::{MonthKey, ParseMonthKeyError};
pub use trace::{
    BreachStatus, FlowGroup, FlowItem, FlowSource, GrowthComponent, TraceEvent, TraceRow,
    Transfer, TransferReason, WorldVars,
};
