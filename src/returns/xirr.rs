//! XIRR: annualised return of irregularly dated cash flows (Actual/365)

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};
use crate::rates::round2;

const TOLERANCE: f64 = 1e-9;
const MAX_ITERATIONS: usize = 200;
const BRACKET_LOW: f64 = -0.9999;
const BRACKET_HIGH: f64 = 100.0;

/// A dated cash flow; negative = money invested, positive = money received
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatedFlow {
    pub date: NaiveDate,
    pub amount: f64,
}

impl DatedFlow {
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        Self { date, amount }
    }
}

fn year_fractions(flows: &[DatedFlow]) -> Vec<(f64, f64)> {
    let origin = flows.iter().map(|f| f.date).min().unwrap_or_default();
    flows
        .iter()
        .map(|f| ((f.date - origin).num_days() as f64 / 365.0, f.amount))
        .collect()
}

fn xnpv(rate: f64, timed: &[(f64, f64)]) -> f64 {
    timed.iter().map(|(t, a)| a / (1.0 + rate).powf(*t)).sum()
}

fn xnpv_derivative(rate: f64, timed: &[(f64, f64)]) -> f64 {
    timed.iter().map(|(t, a)| -t * a / (1.0 + rate).powf(t + 1.0)).sum()
}

/// Annual rate (decimal) at which the dated flows have zero present value
///
/// Requires at least two flows with both signs present.
pub fn xirr(flows: &[DatedFlow]) -> CalcResult<f64> {
    if flows.len() < 2 {
        return Err(CalcError::invalid("cashFlows", "at least two cash flows are required"));
    }
    if flows.iter().any(|f| !f.amount.is_finite()) {
        return Err(CalcError::invalid("cashFlows", "amounts must be finite numbers"));
    }
    if !flows.iter().any(|f| f.amount > 0.0) || !flows.iter().any(|f| f.amount < 0.0) {
        return Err(CalcError::invalid(
            "cashFlows",
            "need at least one investment (negative) and one return (positive)",
        ));
    }

    let timed = year_fractions(flows);

    let mut rate = 0.1;
    for iteration in 0..MAX_ITERATIONS {
        let value = xnpv(rate, &timed);
        let slope = xnpv_derivative(rate, &timed);
        if slope.abs() < 1e-12 || !slope.is_finite() {
            break;
        }
        let next = rate - value / slope;
        if !next.is_finite() || next <= BRACKET_LOW || next >= BRACKET_HIGH {
            break;
        }
        if (next - rate).abs() < TOLERANCE {
            debug!("XIRR converged to {:.10} after {} iterations", next, iteration + 1);
            return Ok(next);
        }
        rate = next;
    }

    debug!("XIRR Newton-Raphson failed, bisecting on [{}, {}]", BRACKET_LOW, BRACKET_HIGH);
    bisect(&timed)
}

fn bisect(timed: &[(f64, f64)]) -> CalcResult<f64> {
    let mut low = BRACKET_LOW;
    let mut high = BRACKET_HIGH;
    let mut f_low = xnpv(low, timed);
    let f_high = xnpv(high, timed);
    if !f_low.is_finite() || f_low * f_high > 0.0 {
        return Err(CalcError::NoSolution("XIRR has no root between -99.99% and 10000%".into()));
    }

    for _ in 0..1000 {
        let mid = (low + high) / 2.0;
        let f_mid = xnpv(mid, timed);
        if f_mid.abs() < TOLERANCE || (high - low) / 2.0 < TOLERANCE {
            return Ok(mid);
        }
        if f_mid * f_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            f_low = f_mid;
        }
    }

    Err(CalcError::NoSolution("XIRR bisection did not converge".into()))
}

/// Input contract of the XIRR analysis endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XirrRequest {
    pub cash_flows: Vec<DatedFlow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CumulativeFlow {
    pub label: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XirrAnalysis {
    /// None when no rate solves the flows
    pub xirr_percentage: Option<f64>,
    pub total_invested: f64,
    pub total_withdrawn: f64,
    pub net_gain_loss: f64,
    pub absolute_return_percentage: f64,
    pub holding_period_days: i64,
    pub cash_flow_count: usize,
    pub cumulative_flows: Vec<CumulativeFlow>,
}

/// XIRR plus summary figures for a set of dated flows
pub fn analyse_xirr(request: &XirrRequest) -> CalcResult<XirrAnalysis> {
    let mut flows: Vec<DatedFlow> = request.cash_flows.iter().copied().filter(|f| f.amount != 0.0).collect();
    flows.sort_by_key(|f| f.date);

    let rate = match xirr(&flows) {
        Ok(r) => Some(r),
        Err(CalcError::NoSolution(msg)) => {
            debug!("XIRR unavailable: {}", msg);
            None
        }
        Err(e) => return Err(e),
    };

    let total_invested: f64 = flows.iter().filter(|f| f.amount < 0.0).map(|f| -f.amount).sum();
    let total_withdrawn: f64 = flows.iter().filter(|f| f.amount > 0.0).map(|f| f.amount).sum();
    let net = total_withdrawn - total_invested;

    let mut running = 0.0;
    let cumulative_flows = flows
        .iter()
        .map(|f| {
            running += f.amount;
            CumulativeFlow {
                label: f.date.format("%Y-%m-%d").to_string(),
                amount: round2(running),
            }
        })
        .collect();

    let holding_period_days = match (flows.first(), flows.last()) {
        (Some(first), Some(last)) => (last.date - first.date).num_days(),
        _ => 0,
    };

    Ok(XirrAnalysis {
        xirr_percentage: rate.map(|r| round2(r * 100.0)),
        total_invested: round2(total_invested),
        total_withdrawn: round2(total_withdrawn),
        net_gain_loss: round2(net),
        absolute_return_percentage: if total_invested > 0.0 {
            round2(net / total_invested * 100.0)
        } else {
            0.0
        },
        holding_period_days,
        cash_flow_count: flows.len(),
        cumulative_flows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_one_year_ten_percent() {
        let flows = [DatedFlow::new(d(2023, 1, 1), -10_000.0), DatedFlow::new(d(2024, 1, 1), 11_000.0)];
        let r = xirr(&flows).unwrap();
        assert!((r - 0.10).abs() < 1e-8, "Expected 10%, got {}", r);
    }

    #[test]
    fn test_order_does_not_matter() {
        let a = [
            DatedFlow::new(d(2022, 3, 15), -5_000.0),
            DatedFlow::new(d(2022, 9, 1), -5_000.0),
            DatedFlow::new(d(2024, 6, 30), 12_500.0),
        ];
        let mut b = a;
        b.reverse();
        let ra = xirr(&a).unwrap();
        let rb = xirr(&b).unwrap();
        assert!((ra - rb).abs() < 1e-8);
        assert!(ra > 0.0);
    }

    #[test]
    fn test_requires_both_signs() {
        let flows = [DatedFlow::new(d(2023, 1, 1), -100.0), DatedFlow::new(d(2024, 1, 1), -100.0)];
        assert!(matches!(xirr(&flows), Err(CalcError::InvalidInput { .. })));
        assert!(xirr(&flows[..1]).is_err());
    }

    #[test]
    fn test_deep_loss_falls_back_to_bisection() {
        // Newton overshoots below the bracket from the 10% seed
        let flows = [DatedFlow::new(d(2023, 1, 1), -10_000.0), DatedFlow::new(d(2024, 1, 1), 100.0)];
        let r = xirr(&flows).unwrap();
        assert!((r + 0.99).abs() < 1e-6, "got {}", r);
    }

    #[test]
    fn test_analysis_summary() {
        let req: XirrRequest = serde_json::from_str(
            r#"{"cashFlows": [
                {"date": "2023-01-01", "amount": -10000},
                {"date": "2024-01-01", "amount": 11000}
            ]}"#,
        )
        .unwrap();
        let a = analyse_xirr(&req).unwrap();
        assert_eq!(a.xirr_percentage, Some(10.0));
        assert_eq!(a.total_invested, 10_000.0);
        assert_eq!(a.net_gain_loss, 1_000.0);
        assert_eq!(a.absolute_return_percentage, 10.0);
        assert_eq!(a.holding_period_days, 365);
        assert_eq!(a.cumulative_flows.last().unwrap().amount, 1_000.0);
    }
}
