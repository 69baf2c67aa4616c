//! Building a trace from simulation snapshots
//!
//! One forward pass over the snapshots in simulation order. Each month is
//! reconciled against the previous month's end balances, then attributed.
//! The summary is computed once all rows exist.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use crate::attribution::{GrowthBasis, attribute_flows, attribute_growth, attribute_transfers};
use crate::model::{
    AccountBalances, EventId, EventTraceEntry, MonthKey, MonthlySnapshot, ORDERING_CONVENTION,
    RealizedMonthVars, StartBasis, TraceData, TraceEvent, TraceInput, TraceOptions, TraceRow,
    TraceRunMeta, WorldVars,
};
use crate::money::{RECONCILE_TOLERANCE, ROUNDING_POLICY};
use crate::reconcile::{BucketStart, month_zero_start, reconcile_month};
use crate::summary::summarize;

/// Build the fully attributed trace for one run
///
/// Pure: the same input always produces the same trace, and nothing is
/// shared between calls.
pub fn build_trace(input: &TraceInput) -> TraceData {
    let options = &input.options;
    let snapshots = &input.snapshots;

    let mut entries_by_month: FxHashMap<usize, Vec<&EventTraceEntry>> = FxHashMap::default();
    for entry in &input.event_trace {
        entries_by_month.entry(entry.month_offset).or_default().push(entry);
    }
    let realized: FxHashMap<usize, &RealizedMonthVars> = options
        .realized_path
        .iter()
        .map(|vars| (vars.month_index, vars))
        .collect();

    let mut trace = TraceData {
        rows: Vec::with_capacity(snapshots.len()),
        flow_items: BTreeMap::new(),
        transfers: BTreeMap::new(),
        growth_components: BTreeMap::new(),
        world_vars: BTreeMap::new(),
        start_balances: BTreeMap::new(),
        end_balances: BTreeMap::new(),
        events: BTreeMap::new(),
        summary: Default::default(),
        meta: run_meta(input, StartBasis::Explicit),
    };

    let mut previous: Option<BucketStart> = None;
    for (index, snapshot) in snapshots.iter().enumerate() {
        let month = MonthKey::new(snapshot.year, snapshot.month);
        if trace.world_vars.contains_key(&month) {
            tracing::warn!(%month, index, "Duplicate month in snapshots; detail will be overwritten");
        }

        // Continuity: a month starts exactly where the previous one ended
        let start = match previous {
            Some(end) => end,
            None => {
                let (start, basis) = month_zero_start(snapshot, options);
                trace.meta.start_basis = basis;
                start
            }
        };

        let rec = reconcile_month(snapshot, start, options.cash_floor);
        let entries = entries_by_month
            .get(&index)
            .map_or(&[][..], Vec::as_slice);
        let world = world_vars(snapshot, realized.get(&index).copied());

        let flow_items = attribute_flows(month, snapshot, entries, rec.operating_flow);
        let transfers = attribute_transfers(snapshot, entries);
        let growth = attribute_growth(
            GrowthBasis::new(
                rec.inv_start,
                rec.transfer_cash,
                rec.market_return_impact,
                options.equity_allocation,
                &world,
            ),
            &world,
        );

        if let Some(balances) = start_balances(index, snapshots, options) {
            trace.start_balances.insert(month, balances);
        }
        trace.end_balances.insert(month, snapshot.balances());
        trace.flow_items.insert(month, flow_items);
        trace.transfers.insert(month, transfers);
        trace.growth_components.insert(month, growth);
        trace.world_vars.insert(month, world);

        trace.rows.push(TraceRow {
            month,
            index,
            age: snapshot.age,
            cash_start: rec.cash_start,
            operating_flow: rec.operating_flow,
            transfer_cash: rec.transfer_cash,
            cash_end: rec.cash_end,
            cash_floor: options.cash_floor,
            breach: rec.breach,
            inv_start: rec.inv_start,
            market_return_impact: rec.market_return_impact,
            inv_end: rec.inv_end,
            net_worth_end: rec.net_worth_end(),
            cash_delta: rec.cash_delta,
            inv_delta: rec.inv_delta,
            nw_delta: rec.nw_delta,
            reconcile_delta: rec.reconcile_delta,
            event_ids: snapshot.event_ids.clone(),
        });

        previous = Some(rec.end());
    }

    trace.events = event_lookup(input, &trace.rows);
    trace.summary = summarize(&trace.rows, trace.meta.reconcile_tolerance);

    tracing::debug!(
        scenario = %options.scenario_id,
        path_index = options.path_index,
        months = trace.summary.total_months,
        reconciled = trace.summary.reconciled_months,
        "Trace built"
    );

    trace
}

/// Build traces for several independent runs
#[cfg(feature = "parallel")]
pub fn build_traces(inputs: &[TraceInput]) -> Vec<TraceData> {
    use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

    inputs.par_iter().map(build_trace).collect()
}

/// Build traces for several independent runs
#[cfg(not(feature = "parallel"))]
pub fn build_traces(inputs: &[TraceInput]) -> Vec<TraceData> {
    inputs.iter().map(build_trace).collect()
}

fn run_meta(input: &TraceInput, start_basis: StartBasis) -> TraceRunMeta {
    let options = &input.options;
    TraceRunMeta {
        scenario_id: options.scenario_id.clone(),
        seed: options.seed,
        path_index: options.path_index,
        ordering_convention: ORDERING_CONVENTION.to_string(),
        reconcile_tolerance: RECONCILE_TOLERANCE,
        rounding_policy: ROUNDING_POLICY.to_string(),
        equity_allocation: options.equity_allocation,
        cash_floor: options.cash_floor,
        simulation_mode: options.simulation_mode.clone(),
        model_description: options.model_description.clone(),
        start_basis,
        assumptions: input.assumptions,
    }
}

fn world_vars(snapshot: &MonthlySnapshot, realized: Option<&RealizedMonthVars>) -> WorldVars {
    let returns = &snapshot.market_returns;
    WorldVars {
        equity_return: returns.equity,
        bond_return: returns.bond,
        international_return: returns.international,
        reits_return: returns.reits,
        inflation: returns.inflation,
        base_invested_before_return: realized.and_then(|r| r.base_invested_before_return),
        weights: realized.and_then(|r| r.weights),
        weighted_return: realized.and_then(|r| r.weighted_return),
        computed_growth: realized.and_then(|r| r.computed_growth),
        volatility: realized.and_then(|r| r.volatility.clone()),
    }
}

/// Per-account start balances, known for month zero only when supplied
fn start_balances(
    index: usize,
    snapshots: &[MonthlySnapshot],
    options: &TraceOptions,
) -> Option<AccountBalances> {
    match index {
        0 => options.initial_accounts.map(|accounts| AccountBalances {
            cash: options.initial_cash.unwrap_or(accounts.cash),
            ..accounts
        }),
        _ => snapshots.get(index - 1).map(MonthlySnapshot::balances),
    }
}

/// Catalog events first, then any traced event the catalog does not know
fn event_lookup(input: &TraceInput, rows: &[TraceRow]) -> BTreeMap<EventId, TraceEvent> {
    let mut events = BTreeMap::new();

    for record in &input.events {
        let Some(row) = rows.get(record.month_offset) else {
            tracing::warn!(event = %record.id, month_offset = record.month_offset, "Event refers to a month outside the run; skipped");
            continue;
        };
        events.insert(
            record.id.clone(),
            TraceEvent {
                id: record.id.clone(),
                event_type: record.event_type.clone(),
                name: record.name.clone(),
                month: row.month,
                amount: record.amount,
            },
        );
    }

    for entry in &input.event_trace {
        if events.contains_key(&entry.event_id) {
            continue;
        }
        let Some(row) = rows.get(entry.month_offset) else {
            tracing::warn!(event = %entry.event_id, month_offset = entry.month_offset, "Traced event refers to a month outside the run; skipped");
            continue;
        };
        events.insert(
            entry.event_id.clone(),
            TraceEvent {
                id: entry.event_id.clone(),
                event_type: entry.event_type.clone(),
                name: entry.event_name.clone(),
                month: row.month,
                amount: Some(entry.cash_delta()),
            },
        );
    }

    events
}
