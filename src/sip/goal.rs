//! Goal-based SIP: the installment that reaches a target amount

use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, ensure_range, CalcError, CalcResult};
use crate::rates::{annuity_due_factor, periodic_rate, round2, Frequency, MONTH_NAMES};

use super::ledger::InstallmentLedger;

fn default_goal_frequency() -> Frequency {
    Frequency::Monthly
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalSipRequest {
    pub target_amount: f64,
    pub expected_return: f64,
    /// Years to the goal
    pub time_period: u32,
    #[serde(default = "default_goal_frequency")]
    pub frequency: Frequency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalYear {
    pub year: u32,
    pub yearly_investment: f64,
    pub cumulative_investment: f64,
    pub returns: f64,
    pub total_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalMonth {
    pub year: u32,
    pub month: u32,
    pub month_name: String,
    pub monthly_investment: f64,
    pub cumulative_investment: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalSipResult {
    pub target_amount: f64,
    pub required_sip: f64,
    pub frequency: Frequency,
    pub total_investment: f64,
    pub wealth_gain: f64,
    pub yearly_breakdown: Vec<GoalYear>,
    pub monthly_breakdown: Vec<GoalMonth>,
}

/// Installment that grows to `target` as an annuity due
pub fn required_installment(target: f64, annual_rate_pct: f64, frequency: Frequency, years: u32) -> f64 {
    let n = frequency.periods_per_year();
    target / annuity_due_factor(periodic_rate(annual_rate_pct, n), n * years)
}

fn monthly_ledger(installment: f64, annual_rate_pct: f64, frequency: Frequency, years: u32, months_per_period: u32) -> Vec<GoalMonth> {
    let period_growth = 1.0 + periodic_rate(annual_rate_pct, frequency.periods_per_year());
    let month_growth = period_growth.powf(1.0 / months_per_period as f64);
    let mut balance = 0.0;
    let mut invested = 0.0;
    let mut rows = Vec::with_capacity(years as usize * 12);

    for index in 0..years * 12 {
        let deposit = if index % months_per_period == 0 { installment } else { 0.0 };
        balance = (balance + deposit) * month_growth;
        invested += deposit;
        let month = index % 12;
        rows.push(GoalMonth {
            year: index / 12 + 1,
            month: month + 1,
            month_name: MONTH_NAMES[month as usize].to_string(),
            monthly_investment: round2(deposit),
            cumulative_investment: round2(invested),
            balance: round2(balance),
        });
    }
    rows
}

pub fn calculate_goal_sip(request: &GoalSipRequest) -> CalcResult<GoalSipResult> {
    ensure_positive("target_amount", request.target_amount)?;
    ensure_range("expected_return", request.expected_return, 0.0, 50.0)?;
    ensure_range("time_period", request.time_period as f64, 1.0, 50.0)?;
    let months_per_period = request.frequency.months_per_period().ok_or_else(|| {
        CalcError::invalid("frequency", "goal SIP installments are monthly, quarterly, half-yearly or yearly")
    })?;

    let sip = required_installment(
        request.target_amount,
        request.expected_return,
        request.frequency,
        request.time_period,
    );
    let rows = InstallmentLedger::new(request.expected_return, request.frequency, request.time_period).run(|_| sip);
    let yearly_breakdown: Vec<GoalYear> = rows
        .iter()
        .map(|r| GoalYear {
            year: r.year,
            yearly_investment: round2(r.invested_this_year),
            cumulative_investment: round2(r.cumulative_invested),
            returns: round2(r.value - r.cumulative_invested),
            total_value: round2(r.value),
        })
        .collect();

    let total_investment = sip * (request.frequency.periods_per_year() * request.time_period) as f64;

    Ok(GoalSipResult {
        target_amount: request.target_amount,
        required_sip: round2(sip),
        frequency: request.frequency,
        total_investment: round2(total_investment),
        wealth_gain: round2(request.target_amount - total_investment),
        yearly_breakdown,
        monthly_breakdown: monthly_ledger(
            sip,
            request.expected_return,
            request.frequency,
            request.time_period,
            months_per_period,
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_sip_reaches_target() {
        let req: GoalSipRequest =
            serde_json::from_str(r#"{"target_amount": 1000000, "expected_return": 12, "time_period": 10}"#)
                .unwrap();
        let r = calculate_goal_sip(&req).unwrap();
        assert!((r.required_sip - 4_304.05).abs() < 1e-9, "{}", r.required_sip);
        assert_eq!(r.yearly_breakdown.last().unwrap().total_value, 1_000_000.0);
        assert_eq!(r.monthly_breakdown.len(), 120);
        assert_eq!(r.monthly_breakdown.last().unwrap().balance, 1_000_000.0);
        assert_eq!(r.monthly_breakdown[0].month_name, "Jan");
    }

    #[test]
    fn test_goal_sip_quarterly_months() {
        let req = GoalSipRequest {
            target_amount: 500_000.0,
            expected_return: 8.0,
            time_period: 5,
            frequency: Frequency::Quarterly,
        };
        let r = calculate_goal_sip(&req).unwrap();
        let paid: Vec<_> = r.monthly_breakdown[..6].iter().map(|m| m.monthly_investment > 0.0).collect();
        assert_eq!(paid, vec![true, false, false, true, false, false]);
        assert!((r.monthly_breakdown.last().unwrap().balance - 500_000.0).abs() < 0.02);
    }

    #[test]
    fn test_goal_sip_zero_return() {
        let sip = required_installment(120_000.0, 0.0, Frequency::Monthly, 1);
        assert_eq!(sip, 10_000.0);
    }

    #[test]
    fn test_goal_sip_rejects_daily() {
        let req = GoalSipRequest {
            target_amount: 100_000.0,
            expected_return: 8.0,
            time_period: 2,
            frequency: Frequency::Daily,
        };
        assert!(calculate_goal_sip(&req).is_err());
    }
}
