//! Systematic withdrawal plan

use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, ensure_range, CalcResult};
use crate::rates::{periodic_rate, round2, Frequency};

fn default_withdrawal_frequency() -> Frequency {
    Frequency::Monthly
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwpRequest {
    pub initial_investment: f64,
    pub annual_return_rate: f64,
    pub withdrawal_amount: f64,
    pub tenure_years: u32,
    #[serde(default = "default_withdrawal_frequency")]
    pub withdrawal_frequency: Frequency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwpYear {
    pub year: u32,
    pub opening_balance: f64,
    pub returns: f64,
    pub withdrawals: f64,
    pub closing_balance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwpResult {
    pub initial_investment: f64,
    pub total_withdrawals: f64,
    pub final_balance: f64,
    pub net_return_percentage: f64,
    pub withdrawals_made: u32,
    /// Period in which the corpus ran out, if it did
    pub depleted_in_period: Option<u32>,
    pub yearly_data: Vec<SwpYear>,
}

/// Each period the corpus grows first, then the withdrawal is taken.
/// Once the corpus cannot cover a withdrawal the remainder is paid out
/// and the ledger stops.
pub fn calculate_swp(request: &SwpRequest) -> CalcResult<SwpResult> {
    ensure_positive("initial_investment", request.initial_investment)?;
    ensure_range("annual_return_rate", request.annual_return_rate, 0.0, 50.0)?;
    ensure_positive("withdrawal_amount", request.withdrawal_amount)?;
    ensure_range("tenure_years", request.tenure_years as f64, 1.0, 50.0)?;

    let per_year = request.withdrawal_frequency.periods_per_year();
    let rate = periodic_rate(request.annual_return_rate, per_year);
    let mut balance = request.initial_investment;
    let mut total_withdrawn = 0.0;
    let mut withdrawals_made = 0;
    let mut depleted_in_period = None;
    let mut yearly_data = Vec::new();

    'years: for year in 1..=request.tenure_years {
        let opening = balance;
        let mut returns = 0.0;
        let mut withdrawn = 0.0;
        for p in 0..per_year {
            let growth = balance * rate;
            balance += growth;
            returns += growth;
            let take = request.withdrawal_amount.min(balance);
            balance -= take;
            withdrawn += take;
            withdrawals_made += 1;
            if take < request.withdrawal_amount || balance <= 0.0 {
                depleted_in_period = Some((year - 1) * per_year + p + 1);
                balance = 0.0;
                total_withdrawn += withdrawn;
                yearly_data.push(SwpYear {
                    year,
                    opening_balance: round2(opening),
                    returns: round2(returns),
                    withdrawals: round2(withdrawn),
                    closing_balance: 0.0,
                });
                break 'years;
            }
        }
        total_withdrawn += withdrawn;
        yearly_data.push(SwpYear {
            year,
            opening_balance: round2(opening),
            returns: round2(returns),
            withdrawals: round2(withdrawn),
            closing_balance: round2(balance),
        });
    }
    if let Some(period) = depleted_in_period {
        log::debug!("swp corpus depleted in period {}", period);
    }

    let p = request.initial_investment;
    Ok(SwpResult {
        initial_investment: p,
        total_withdrawals: round2(total_withdrawn),
        final_balance: round2(balance),
        net_return_percentage: round2((total_withdrawn + balance - p) / p * 100.0),
        withdrawals_made,
        depleted_in_period,
        yearly_data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swp_sustainable() {
        let req: SwpRequest = serde_json::from_str(
            r#"{"initial_investment": 1000000, "annual_return_rate": 12, "withdrawal_amount": 5000, "tenure_years": 10}"#,
        )
        .unwrap();
        let r = calculate_swp(&req).unwrap();
        assert_eq!(r.withdrawals_made, 120);
        assert_eq!(r.total_withdrawals, 600_000.0);
        assert!(r.depleted_in_period.is_none());
        assert!(r.final_balance > 1_000_000.0);
        assert_eq!(r.yearly_data.len(), 10);
    }

    #[test]
    fn test_swp_depletes() {
        let r = calculate_swp(&SwpRequest {
            initial_investment: 100_000.0,
            annual_return_rate: 0.0,
            withdrawal_amount: 30_000.0,
            tenure_years: 5,
            withdrawal_frequency: Frequency::Yearly,
        })
        .unwrap();
        assert_eq!(r.depleted_in_period, Some(4));
        assert_eq!(r.total_withdrawals, 100_000.0);
        assert_eq!(r.final_balance, 0.0);
        assert_eq!(r.yearly_data.len(), 4);
        assert_eq!(r.yearly_data[3].withdrawals, 10_000.0);
        assert_eq!(r.net_return_percentage, 0.0);
    }
}
