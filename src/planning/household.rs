//! Household finances: a net-worth statement and short-horizon saving for a trip

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_positive, ensure_range, CalcError, CalcResult};
use crate::growth::inflate;
use crate::rates::{annuity_immediate_factor, round2};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetWorthRequest {
    pub cash_bank: f64,
    pub investment: f64,
    pub real_estate: f64,
    pub vehicle: f64,
    pub other_assets: f64,
    pub home_loan: f64,
    pub personal_loan: f64,
    pub credit_card: f64,
    pub other_liabilities: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetWorthStanding {
    Positive,
    Negative,
    Zero,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetWorthResult {
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub net_worth: f64,
    pub standing: NetWorthStanding,
    /// Liabilities as a percentage of assets; absent when there are no assets
    pub debt_to_asset_ratio: Option<f64>,
    pub summary: String,
}

pub fn calculate_net_worth(request: &NetWorthRequest) -> CalcResult<NetWorthResult> {
    let assets = [
        ("cash_bank", request.cash_bank),
        ("investment", request.investment),
        ("real_estate", request.real_estate),
        ("vehicle", request.vehicle),
        ("other_assets", request.other_assets),
    ];
    let liabilities = [
        ("home_loan", request.home_loan),
        ("personal_loan", request.personal_loan),
        ("credit_card", request.credit_card),
        ("other_liabilities", request.other_liabilities),
    ];
    for (field, value) in assets.iter().chain(&liabilities) {
        ensure_non_negative(*field, *value)?;
    }

    let total_assets: f64 = assets.iter().map(|(_, v)| v).sum();
    let total_liabilities: f64 = liabilities.iter().map(|(_, v)| v).sum();
    let net_worth = total_assets - total_liabilities;
    let standing = if net_worth.abs() < 0.005 {
        NetWorthStanding::Zero
    } else if net_worth > 0.0 {
        NetWorthStanding::Positive
    } else {
        NetWorthStanding::Negative
    };
    let summary = match standing {
        NetWorthStanding::Positive => format!("Your assets exceed your liabilities by ₹{:.0}.", net_worth),
        NetWorthStanding::Negative => format!("Your liabilities exceed your assets by ₹{:.0}.", -net_worth),
        NetWorthStanding::Zero => "Your assets and liabilities balance out.".to_string(),
    };

    Ok(NetWorthResult {
        total_assets: round2(total_assets),
        total_liabilities: round2(total_liabilities),
        net_worth: round2(net_worth),
        standing,
        debt_to_asset_ratio: (total_assets > 0.0).then(|| round2(total_liabilities / total_assets * 100.0)),
        summary,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacationRequest {
    /// Trip cost in today's money
    pub vacation_cost: f64,
    pub months_until_vacation: u32,
    #[serde(default)]
    pub current_savings: f64,
    #[serde(default)]
    pub expected_return: f64,
    #[serde(default)]
    pub expected_inflation: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacationMonth {
    pub month: u32,
    pub monthly_savings: f64,
    pub cumulative_savings: f64,
    pub investment_growth: f64,
    pub total_amount: f64,
    /// Share of the inflation-adjusted cost saved so far, in percent
    pub progress: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacationResult {
    pub vacation_cost: f64,
    pub months_until_vacation: u32,
    pub current_savings: f64,
    pub expected_return: f64,
    pub expected_inflation: f64,
    pub inflation_adjusted_cost: f64,
    /// Gap left after current savings have grown until departure
    pub remaining_amount: f64,
    pub monthly_savings_needed: f64,
    pub estimated_accumulated_value: f64,
    pub total_investment_returns: f64,
    pub month_wise_data: Vec<VacationMonth>,
}

/// Monthly amount, saved at the end of each month, that pays for the trip
pub fn calculate_vacation_savings(request: &VacationRequest) -> CalcResult<VacationResult> {
    ensure_positive("vacation_cost", request.vacation_cost)?;
    ensure_range("months_until_vacation", request.months_until_vacation as f64, 1.0, 600.0)?;
    ensure_non_negative("current_savings", request.current_savings)?;
    if request.current_savings > request.vacation_cost {
        return Err(CalcError::invalid(
            "current_savings",
            "already covers the vacation cost",
        ));
    }
    ensure_range("expected_return", request.expected_return, 0.0, 50.0)?;
    ensure_range("expected_inflation", request.expected_inflation, 0.0, 30.0)?;

    let months = request.months_until_vacation;
    let rate = request.expected_return / 100.0 / 12.0;
    let target = inflate(request.vacation_cost, request.expected_inflation, months as f64 / 12.0);
    let savings_fv = request.current_savings * (1.0 + rate).powi(months as i32);
    let remaining = (target - savings_fv).max(0.0);
    let monthly = remaining / annuity_immediate_factor(rate, months);

    let mut balance = request.current_savings;
    let month_wise_data: Vec<VacationMonth> = (1..=months)
        .map(|month| {
            let growth = balance * rate;
            balance += growth + monthly;
            VacationMonth {
                month,
                monthly_savings: round2(monthly),
                cumulative_savings: round2(monthly * month as f64),
                investment_growth: round2(growth),
                total_amount: round2(balance),
                progress: round2((balance / target * 100.0).min(100.0)),
            }
        })
        .collect();

    Ok(VacationResult {
        vacation_cost: request.vacation_cost,
        months_until_vacation: months,
        current_savings: request.current_savings,
        expected_return: request.expected_return,
        expected_inflation: request.expected_inflation,
        inflation_adjusted_cost: round2(target),
        remaining_amount: round2(remaining),
        monthly_savings_needed: round2(monthly),
        estimated_accumulated_value: round2(balance),
        total_investment_returns: round2(balance - request.current_savings - monthly * months as f64),
        month_wise_data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_net_worth() {
        let req: NetWorthRequest = serde_json::from_str(
            r#"{"cash_bank": 200000, "investment": 800000, "real_estate": 5000000,
                "home_loan": 3000000, "credit_card": 50000}"#,
        )
        .unwrap();
        let r = calculate_net_worth(&req).unwrap();
        assert_eq!(r.total_assets, 6_000_000.0);
        assert_eq!(r.total_liabilities, 3_050_000.0);
        assert_eq!(r.net_worth, 2_950_000.0);
        assert_eq!(r.standing, NetWorthStanding::Positive);
        assert_eq!(r.debt_to_asset_ratio, Some(50.83));
    }

    #[test]
    fn test_net_worth_in_debt() {
        let req = NetWorthRequest {
            personal_loan: 100_000.0,
            ..Default::default()
        };
        let r = calculate_net_worth(&req).unwrap();
        assert_eq!(r.standing, NetWorthStanding::Negative);
        assert_eq!(r.debt_to_asset_ratio, None);
        assert!(r.summary.contains("100000"));

        let bad = NetWorthRequest {
            vehicle: -1.0,
            ..Default::default()
        };
        assert!(calculate_net_worth(&bad).unwrap_err().is_client_error());
    }

    #[test]
    fn test_vacation_without_growth() {
        let r = calculate_vacation_savings(&VacationRequest {
            vacation_cost: 120_000.0,
            months_until_vacation: 12,
            current_savings: 0.0,
            expected_return: 0.0,
            expected_inflation: 0.0,
        })
        .unwrap();
        assert_eq!(r.monthly_savings_needed, 10_000.0);
        assert_eq!(r.estimated_accumulated_value, 120_000.0);
        assert_eq!(r.month_wise_data[5].progress, 50.0);
    }

    #[test]
    fn test_vacation_reaches_inflated_cost() {
        let r = calculate_vacation_savings(&VacationRequest {
            vacation_cost: 200_000.0,
            months_until_vacation: 18,
            current_savings: 50_000.0,
            expected_return: 9.0,
            expected_inflation: 6.0,
        })
        .unwrap();
        let target = 200_000.0 * 1.06f64.powf(1.5);
        assert_abs_diff_eq!(r.inflation_adjusted_cost, target, epsilon = 0.01);
        assert_abs_diff_eq!(r.estimated_accumulated_value, target, epsilon = 0.02);
        assert!(r.total_investment_returns > 0.0);
        assert_eq!(r.month_wise_data.len(), 18);
    }

    #[test]
    fn test_vacation_savings_above_cost() {
        let req = VacationRequest {
            vacation_cost: 10_000.0,
            months_until_vacation: 6,
            current_savings: 20_000.0,
            expected_return: 0.0,
            expected_inflation: 0.0,
        };
        assert!(calculate_vacation_savings(&req).is_err());
    }
}
