//! Rate conventions: frequencies, periodic conversion and reporting precision
//!
//! Every `*_rate` field on a calculator input is an annual percentage
//! (8.5 means 8.5 % p.a.). Functions here turn those into per-period decimals.

mod frequency;

pub use frequency::{Frequency, TimeUnit};

use chrono::{Datelike, Local, NaiveDate};

/// Short month names for month-by-month ledgers, January first
pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Convert an annual percentage into a per-period decimal rate
pub fn periodic_rate(annual_pct: f64, periods_per_year: u32) -> f64 {
    annual_pct / 100.0 / periods_per_year as f64
}

/// Effective annual rate (percent) of a nominal rate compounded at `frequency`
pub fn effective_annual_rate(nominal_pct: f64, frequency: Frequency) -> f64 {
    let n = frequency.periods_per_year() as f64;
    ((1.0 + nominal_pct / 100.0 / n).powf(n) - 1.0) * 100.0
}

/// Round half away from zero to `places` decimals
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Round to paise
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

/// First day of the current local month; default start for dated ledgers
pub fn current_month_start() -> NaiveDate {
    let today = Local::now().date_naive();
    today.with_day(1).unwrap_or(today)
}

/// Future value factor of an annuity paid at the start of each period
///
/// `((1+i)^n - 1) / i * (1+i)`, degrading to `n` at a zero rate.
pub fn annuity_due_factor(rate: f64, periods: u32) -> f64 {
    if rate.abs() < 1e-12 {
        return periods as f64;
    }
    ((1.0 + rate).powi(periods as i32) - 1.0) / rate * (1.0 + rate)
}

/// Future value factor of an annuity paid at the end of each period
pub fn annuity_immediate_factor(rate: f64, periods: u32) -> f64 {
    if rate.abs() < 1e-12 {
        return periods as f64;
    }
    ((1.0 + rate).powi(periods as i32) - 1.0) / rate
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_periodic_rate() {
        assert_relative_eq!(periodic_rate(12.0, 12), 0.01);
        assert_relative_eq!(periodic_rate(8.0, 4), 0.02);
    }

    #[test]
    fn test_effective_rate() {
        // 12% compounded monthly
        assert_relative_eq!(effective_annual_rate(12.0, Frequency::Monthly), 12.682503013196977, epsilon = 1e-9);
        assert_relative_eq!(effective_annual_rate(10.0, Frequency::Yearly), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round2(1234.5678), 1234.57);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round_to(2.5, 0), 3.0);
    }

    #[test]
    fn test_annuity_factors() {
        assert_eq!(annuity_due_factor(0.0, 24), 24.0);
        // 1% monthly for 12 months: ((1.01^12 - 1)/0.01) * 1.01
        assert_relative_eq!(annuity_due_factor(0.01, 12), 12.809328043328942, epsilon = 1e-9);
        assert_relative_eq!(annuity_immediate_factor(0.01, 12), 12.682503013196977, epsilon = 1e-9);
    }
}
