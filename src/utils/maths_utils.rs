use std::f64;

/// Rounds half away from zero to `decimals` places.
/// Used to keep presentation values stable (2dp for units/money, 4dp for carbon scores).
#[inline]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// First differences of a series. The first slot has no predecessor and is NaN,
/// so callers can filter it out the same way they filter any other non-finite value.
pub fn first_difference(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }
    out.push(f64::NAN);
    out.extend(values.windows(2).map(|w| w[1] - w[0]));
    out
}

/// Net present value with the first cashflow at period 0 (no period-1 shift).
/// NPV = Σ cf_t / (1 + rate)^t
pub fn npv(rate: f64, cashflows: &[f64]) -> f64 {
    let base = 1.0 + rate;
    cashflows
        .iter()
        .enumerate()
        .map(|(t, cf)| cf / base.powi(t as i32))
        .sum()
}

/// Compound growth factor for `periods` years at `rate`.
#[inline]
pub fn growth_factor(rate: f64, periods: i32) -> f64 {
    (1.0 + rate).powi(periods)
}
