//! Inter-bucket transfer attribution
//!
//! The snapshot's contribution and withdrawal totals are always available
//! and are what the bucket math uses. The event trace, when present, gives a
//! finer breakdown. Per direction, exactly one of the two sources is used:
//! an event-derived contribution suppresses the aggregate contribution, an
//! event-derived withdrawal suppresses the aggregate planned sale.

use crate::model::{
    AccountTag, EventTraceEntry, MonthlySnapshot, StrategyExecution, StrategyKind, Transfer,
    TransferReason,
};
use crate::money::{is_negligible, is_offsetting};

/// Transfers found in the event trace for one month
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventTransfers {
    pub transfers: Vec<Transfer>,
    pub found_contribution: bool,
    pub found_withdrawal: bool,
}

/// Attribute a month's inter-bucket transfer
pub fn attribute_transfers(snapshot: &MonthlySnapshot, entries: &[&EventTraceEntry]) -> Vec<Transfer> {
    let EventTransfers {
        mut transfers,
        found_contribution,
        found_withdrawal,
    } = scan_event_transfers(entries);

    let flows = &snapshot.flows;

    if flows.auto_shortfall_cover > 0.0 && !is_negligible(flows.auto_shortfall_cover) {
        transfers.push(Transfer {
            amount: flows.auto_shortfall_cover,
            reason: TransferReason::AutoRestoreFloor,
            source_account: None,
            target_account: Some(AccountTag::Cash),
            event_id: None,
            gross_amount: None,
        });
    }

    if !found_withdrawal {
        let planned = flows.withdrawals - flows.auto_shortfall_cover.max(0.0);
        if planned > 0.0 && !is_negligible(planned) {
            transfers.push(Transfer {
                amount: planned,
                reason: TransferReason::PlannedSale,
                source_account: None,
                target_account: Some(AccountTag::Cash),
                event_id: None,
                gross_amount: None,
            });
        }
    }

    if !found_contribution && flows.contributions > 0.0 && !is_negligible(flows.contributions) {
        transfers.push(Transfer {
            amount: -flows.contributions,
            reason: TransferReason::ScheduledContribution,
            source_account: Some(AccountTag::Cash),
            target_account: flows.contributions_by_account.primary_target(),
            event_id: None,
            gross_amount: None,
        });
    }

    transfers.extend(
        snapshot
            .strategy_executions
            .iter()
            .filter_map(internal_transfer),
    );

    transfers
}

/// Entries whose cash and invested deltas offset each other
pub fn scan_event_transfers(entries: &[&EventTraceEntry]) -> EventTransfers {
    let mut found = EventTransfers::default();

    for entry in entries {
        let cash_delta = entry.cash_delta();
        if !is_offsetting(cash_delta, entry.invested_delta()) {
            continue;
        }

        let (source_account, target_account) = if cash_delta < 0.0 {
            (
                Some(AccountTag::Cash),
                entry.after.largest_increase_since(&entry.before),
            )
        } else {
            (
                entry.after.largest_decrease_since(&entry.before),
                Some(AccountTag::Cash),
            )
        };

        if cash_delta < 0.0 {
            found.found_contribution = true;
        } else {
            found.found_withdrawal = true;
        }

        found.transfers.push(Transfer {
            amount: cash_delta,
            reason: transfer_reason(&entry.event_type, cash_delta),
            source_account,
            target_account,
            event_id: Some(entry.event_id.clone()),
            gross_amount: None,
        });
    }

    found
}

/// Keyword classification of an event type, defaulting by direction
pub fn transfer_reason(event_type: &str, cash_delta: f64) -> TransferReason {
    let event_type = event_type.to_ascii_lowercase();
    if event_type.contains("rmd") {
        TransferReason::RmdWithdrawal
    } else if event_type.contains("roth") && event_type.contains("conver") {
        TransferReason::RothConversion
    } else if event_type.contains("rebalanc") {
        TransferReason::Rebalancing
    } else if event_type.contains("contribut") {
        TransferReason::ScheduledContribution
    } else if event_type.contains("withdraw") || event_type.contains("sale") || event_type.contains("sell") {
        TransferReason::PlannedSale
    } else if cash_delta < 0.0 {
        TransferReason::ScheduledContribution
    } else {
        TransferReason::PlannedSale
    }
}

/// Display-only record of a strategy execution; never moves bucket totals
fn internal_transfer(execution: &StrategyExecution) -> Option<Transfer> {
    let (reason, default_source, default_target) = match execution.kind {
        StrategyKind::RothConversion => (
            TransferReason::RothConversion,
            Some(AccountTag::TaxDeferred),
            Some(AccountTag::Roth),
        ),
        StrategyKind::Rebalance => (TransferReason::Rebalancing, None, None),
        StrategyKind::Rmd => (
            TransferReason::RmdWithdrawal,
            Some(AccountTag::TaxDeferred),
            None,
        ),
        StrategyKind::Other => return None,
    };

    if is_negligible(execution.amount) {
        return None;
    }

    Some(Transfer {
        amount: 0.0,
        reason,
        source_account: execution.source_account.or(default_source),
        target_account: execution.target_account.or(default_target),
        event_id: execution.event_id.clone(),
        gross_amount: Some(execution.amount.abs()),
    })
}
