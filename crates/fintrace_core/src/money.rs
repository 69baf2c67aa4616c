//! Dollar amount conventions shared by reconciliation and export

/// Largest residual, in dollars, for which a month still counts as reconciled
pub const RECONCILE_TOLERANCE: f64 = 0.01;

/// Amounts at or below this magnitude are treated as absent
pub const NEGLIGIBLE_AMOUNT: f64 = 0.001;

/// Tag recorded in run metadata describing [`round_cents`]
pub const ROUNDING_POLICY: &str = "nearest_cent";

/// Round to the nearest cent, half away from zero
pub fn round_cents(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    // Normalize -0.0 so exports never print "-0.00"
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Round to whole dollars for summary exports
pub fn whole_dollars(value: f64) -> i64 {
    value.round() as i64
}

pub fn is_negligible(value: f64) -> bool {
    value.abs() <= NEGLIGIBLE_AMOUNT
}

/// True when two amounts agree within [`RECONCILE_TOLERANCE`]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= RECONCILE_TOLERANCE
}

/// Both deltas are material and cancel each other out
pub fn is_offsetting(cash_delta: f64, invested_delta: f64) -> bool {
    cash_delta.abs() > RECONCILE_TOLERANCE
        && invested_delta.abs() > RECONCILE_TOLERANCE
        && (cash_delta + invested_delta).abs() <= RECONCILE_TOLERANCE
}
