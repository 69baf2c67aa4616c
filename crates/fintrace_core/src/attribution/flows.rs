//! Operating-flow attribution
//!
//! Explains a month's operating flow as categorized line items. When the
//! event trace covers the month, each event's own cash effect becomes an
//! item and any gap to the aggregate figure is booked as "System
//! adjustments". Otherwise the snapshot's aggregate categories are used.

use rustc_hash::FxHashSet;

use crate::model::{
    EventTraceEntry, FlowGroup, FlowItem, FlowSource, FlowsDetail, MonthKey, MonthlySnapshot,
};
use crate::money::{RECONCILE_TOLERANCE, is_negligible, is_offsetting};

/// Label of the residual item on event-derived months
pub const SYSTEM_ADJUSTMENTS: &str = "System adjustments";

const DEBT_KEYWORDS: &[&str] = &["debt", "loan", "mortgage", "credit_card"];
const ONE_TIME_KEYWORDS: &[&str] = &[
    "one_time",
    "onetime",
    "one-time",
    "windfall",
    "inheritance",
    "large_purchase",
    "gift",
];
const SPENDING_KEYWORDS: &[&str] = &[
    "expense",
    "spending",
    "tax",
    "healthcare",
    "insurance",
    "housing",
    "tuition",
];
const INCOME_KEYWORDS: &[&str] = &[
    "income",
    "salary",
    "wage",
    "bonus",
    "rsu",
    "social_security",
    "pension",
    "dividend",
    "interest",
    "annuity",
];

/// Which source explained the month
#[derive(Debug, Clone, PartialEq)]
pub enum FlowAttribution {
    FromEvents(Vec<FlowItem>),
    FromAggregates(Vec<FlowItem>),
}

impl FlowAttribution {
    pub fn source(&self) -> FlowSource {
        match self {
            FlowAttribution::FromEvents(_) => FlowSource::Event,
            FlowAttribution::FromAggregates(_) => FlowSource::Aggregate,
        }
    }

    /// Final item list for the month, footing to `operating_flow`
    pub fn finish(self, month: MonthKey, operating_flow: f64) -> Vec<FlowItem> {
        let mut items = match self {
            FlowAttribution::FromEvents(mut items) => {
                let attributed: f64 = items.iter().map(|item| item.amount).sum();
                let residual = operating_flow - attributed;
                if residual.abs() > RECONCILE_TOLERANCE {
                    items.push(item(
                        FlowGroup::Other,
                        SYSTEM_ADJUSTMENTS,
                        residual,
                        FlowSource::Aggregate,
                    ));
                }
                items
            }
            FlowAttribution::FromAggregates(items) => items,
        };

        for (n, item) in items.iter_mut().enumerate() {
            item.posting_id = format!("{month}-{:03}", n + 1);
        }
        items
    }
}

/// Attribute a month's operating flow
///
/// `entries` are the event-trace entries applied in this month.
pub fn attribute_flows(
    month: MonthKey,
    snapshot: &MonthlySnapshot,
    entries: &[&EventTraceEntry],
    operating_flow: f64,
) -> Vec<FlowItem> {
    select_flow_attribution(snapshot, entries).finish(month, operating_flow)
}

/// Prefer event-derived items, fall back to aggregates when there are none
pub fn select_flow_attribution(
    snapshot: &MonthlySnapshot,
    entries: &[&EventTraceEntry],
) -> FlowAttribution {
    let from_events = event_items(snapshot, entries);
    if from_events.is_empty() {
        FlowAttribution::FromAggregates(aggregate_items(&snapshot.flows))
    } else {
        FlowAttribution::FromEvents(from_events)
    }
}

fn event_items(snapshot: &MonthlySnapshot, entries: &[&EventTraceEntry]) -> Vec<FlowItem> {
    let mut seen = FxHashSet::default();
    let mut items = Vec::new();

    for event_id in &snapshot.event_ids {
        if !seen.insert(event_id) {
            continue;
        }
        for entry in entries.iter().filter(|e| &e.event_id == event_id) {
            let cash_delta = entry.cash_delta();
            // Bucket-neutral moves belong to the transfer attribution
            if is_offsetting(cash_delta, entry.invested_delta()) || is_negligible(cash_delta) {
                continue;
            }
            let mut flow = item(
                classify_event(&entry.event_type, cash_delta),
                entry.label(),
                cash_delta,
                FlowSource::Event,
            );
            flow.event_id = Some(entry.event_id.clone());
            items.push(flow);
        }
    }

    items
}

/// Keyword classification of an event type
pub fn classify_event(event_type: &str, cash_delta: f64) -> FlowGroup {
    let event_type = event_type.to_ascii_lowercase();
    let matches = |keywords: &[&str]| keywords.iter().any(|k| event_type.contains(k));

    if matches(DEBT_KEYWORDS) {
        FlowGroup::Debt
    } else if matches(ONE_TIME_KEYWORDS) {
        FlowGroup::OneTime
    } else if matches(SPENDING_KEYWORDS) {
        FlowGroup::Spending
    } else if matches(INCOME_KEYWORDS) || cash_delta >= 0.0 {
        FlowGroup::Income
    } else {
        FlowGroup::Other
    }
}

fn aggregate_items(flows: &FlowsDetail) -> Vec<FlowItem> {
    let income = [
        ("Salary", flows.salary),
        ("Bonus", flows.bonus),
        ("RSU vesting", flows.rsu),
        ("Social Security", flows.social_security),
        ("Pension", flows.pension),
        ("Dividends", flows.dividends),
        ("Interest", flows.interest),
    ];
    let expenses = [
        ("Housing", flows.housing),
        ("Transportation", flows.transportation),
        ("Food", flows.food),
        ("Other expenses", flows.other_expenses),
    ];

    let mut items = Vec::new();
    let mut push = |group, label, amount: f64| {
        if !is_negligible(amount) {
            items.push(item(group, label, amount, FlowSource::Aggregate));
        }
    };

    for (label, amount) in income {
        push(FlowGroup::Income, label, amount);
    }
    let other_income = flows.total_income - income.iter().map(|(_, a)| a).sum::<f64>();
    push(FlowGroup::Income, "Other income", other_income);

    for (label, amount) in expenses {
        push(FlowGroup::Spending, label, -amount);
    }
    let misc = flows.total_expenses - expenses.iter().map(|(_, a)| a).sum::<f64>();
    push(FlowGroup::Spending, "Miscellaneous expenses", -misc);

    push(
        FlowGroup::Debt,
        "Debt payment",
        -(flows.debt_principal + flows.debt_interest),
    );
    push(FlowGroup::Spending, "Tax withheld", -flows.tax_withheld);
    push(FlowGroup::Spending, "Taxes paid", -flows.taxes_paid);

    items
}

fn item(group: FlowGroup, label: &str, amount: f64, source: FlowSource) -> FlowItem {
    FlowItem {
        posting_id: String::new(),
        group,
        label: label.to_string(),
        amount,
        source,
        event_id: None,
    }
}
