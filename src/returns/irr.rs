//! Internal Rate of Return over evenly spaced cash flows
//!
//! Used to back out a loan's interest rate from its EMI and to report
//! periodic returns on regular investment streams.

use log::debug;

const TOLERANCE: f64 = 1e-10;
const MAX_ITERATIONS: usize = 1000;

/// Solve for the per-period rate at which the cash flows have zero NPV,
/// using Newton-Raphson with a bisection fallback.
///
/// # Arguments
/// * `cashflows` - flows at periods 0, 1, 2, ... (positive = inflow, negative = outflow)
///
/// # Returns
/// * `Option<f64>` - periodic rate as a decimal, or None when no sign change exists
///   or neither method converges
pub fn solve_periodic_rate(cashflows: &[f64]) -> Option<f64> {
    if cashflows.is_empty() {
        return None;
    }

    if cashflows.iter().all(|&cf| cf.abs() < TOLERANCE) {
        return Some(0.0);
    }

    // A root requires at least one sign change
    let has_positive = cashflows.iter().any(|&cf| cf > TOLERANCE);
    let has_negative = cashflows.iter().any(|&cf| cf < -TOLERANCE);
    if !has_positive || !has_negative {
        return None;
    }

    let mut rate = 0.01;

    for iteration in 0..MAX_ITERATIONS {
        let (value, slope) = npv_and_derivative(cashflows, rate);

        if slope.abs() < 1e-20 {
            debug!("IRR derivative vanished at iteration {}, switching to bisection", iteration);
            return solve_by_bisection(cashflows);
        }

        let next = (rate - value / slope).clamp(-0.99, 10.0);

        if (next - rate).abs() < TOLERANCE {
            debug!("IRR converged to {:.10} after {} iterations", next, iteration + 1);
            return Some(next);
        }

        rate = next;
    }

    debug!("IRR Newton-Raphson did not converge, switching to bisection");
    solve_by_bisection(cashflows)
}

/// Annualised IRR: the effective annual rate implied by the periodic solution
pub fn calculate_irr(cashflows: &[f64], periods_per_year: u32) -> Option<f64> {
    solve_periodic_rate(cashflows).map(|r| (1.0 + r).powi(periods_per_year as i32) - 1.0)
}

/// NPV and its derivative with respect to the periodic rate
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut value = 0.0;
    let mut slope = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        value += cf / (1.0 + rate).powi(t as i32);
        if t > 0 {
            slope -= (t as f64) * cf / (1.0 + rate).powi(t as i32 + 1);
        }
    }

    (value, slope)
}

fn solve_by_bisection(cashflows: &[f64]) -> Option<f64> {
    let mut low = -0.99_f64;
    let mut high = 10.0_f64;

    let mut npv_low = npv(low, cashflows);
    if npv_low * npv(high, cashflows) > 0.0 {
        return None;
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let npv_mid = npv(mid, cashflows);

        if npv_mid.abs() < TOLERANCE || (high - low) / 2.0 < TOLERANCE {
            return Some(mid);
        }

        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    None
}

/// Net present value of evenly spaced flows at a periodic rate
pub fn npv(rate: f64, cashflows: &[f64]) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_irr() {
        // Invest 1000, receive 1100 after 12 months
        let mut cashflows = vec![-1000.0];
        cashflows.extend(vec![0.0; 11]);
        cashflows.push(1100.0);

        let irr = calculate_irr(&cashflows, 12).unwrap();
        assert!((irr - 0.10).abs() < 1e-8, "Expected 10% IRR, got {}", irr);
    }

    #[test]
    fn test_level_payments_recover_loan_rate() {
        // 1,00,000 at 1% a month for 12 months => EMI 8884.878867...
        let emi = 100_000.0 * 0.01 * 1.01f64.powi(12) / (1.01f64.powi(12) - 1.0);
        let mut cashflows = vec![100_000.0];
        cashflows.extend(vec![-emi; 12]);

        let rate = solve_periodic_rate(&cashflows).unwrap();
        assert!((rate - 0.01).abs() < 1e-9, "Expected 1% monthly, got {}", rate);
    }

    #[test]
    fn test_no_sign_change() {
        assert_eq!(solve_periodic_rate(&[100.0, 50.0]), None);
        assert_eq!(solve_periodic_rate(&[]), None);
        assert_eq!(solve_periodic_rate(&[0.0, 0.0]), Some(0.0));
    }

    #[test]
    fn test_npv_at_zero_rate_is_sum() {
        assert!((npv(0.0, &[-100.0, 40.0, 70.0]) - 10.0).abs() < 1e-12);
    }
}
