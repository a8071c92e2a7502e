//! Government bonds: Sovereign Gold Bonds and RBI floating-rate savings bonds

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, ensure_range, CalcResult};
use crate::rates::{round2, round_to};

/// Grams one individual may hold per financial year
pub const SGB_MAX_GRAMS: f64 = 4_000.0;
pub const RBI_BOND_MIN_INVESTMENT: f64 = 1_000.0;

fn default_sgb_rate() -> f64 {
    2.5
}

fn default_sgb_tenure() -> u32 {
    8
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SgbRequest {
    /// Grams of gold bought
    pub investment_quantity: f64,
    pub issue_price_per_gram: f64,
    pub expected_gold_price_maturity: f64,
    #[serde(default = "default_sgb_rate")]
    pub interest_rate: f64,
    #[serde(default = "default_sgb_tenure")]
    pub tenure_years: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SgbYear {
    pub year: u32,
    pub annual_interest: f64,
    pub cumulative_interest: f64,
    pub investment_value: f64,
    /// Gold value on a straight line from issue to the expected maturity price
    pub estimated_gold_value: f64,
    pub total_value_with_interest: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SgbResult {
    pub total_investment: f64,
    pub annual_interest: f64,
    pub total_interest_earned: f64,
    pub maturity_value: f64,
    pub capital_gain: f64,
    /// Redemption value plus all coupons
    pub total_return: f64,
    pub total_gain: f64,
    /// Compound annual return in percent
    pub annualized_return: f64,
    pub year_wise_data: Vec<SgbYear>,
}

/// SGB coupons are simple interest on the issue value, paid yearly; the
/// bond redeems at the gold price of the day
pub fn calculate_sgb(request: &SgbRequest) -> CalcResult<SgbResult> {
    ensure_range("investment_quantity", request.investment_quantity, 1.0, SGB_MAX_GRAMS)?;
    ensure_positive("issue_price_per_gram", request.issue_price_per_gram)?;
    ensure_positive("expected_gold_price_maturity", request.expected_gold_price_maturity)?;
    ensure_range("interest_rate", request.interest_rate, 0.0, 10.0)?;
    ensure_range("tenure_years", request.tenure_years as f64, 1.0, 8.0)?;

    let invested = request.investment_quantity * request.issue_price_per_gram;
    let maturity = request.investment_quantity * request.expected_gold_price_maturity;
    let coupon = invested * request.interest_rate / 100.0;
    let tenure = request.tenure_years;
    let total_interest = coupon * tenure as f64;
    let total_return = maturity + total_interest;

    let year_wise_data = (1..=tenure)
        .map(|year| {
            let gold = invested + (maturity - invested) * year as f64 / tenure as f64;
            let cumulative = coupon * year as f64;
            SgbYear {
                year,
                annual_interest: round2(coupon),
                cumulative_interest: round2(cumulative),
                investment_value: round2(invested),
                estimated_gold_value: round2(gold),
                total_value_with_interest: round2(gold + cumulative),
            }
        })
        .collect();

    Ok(SgbResult {
        total_investment: round2(invested),
        annual_interest: round2(coupon),
        total_interest_earned: round2(total_interest),
        maturity_value: round2(maturity),
        capital_gain: round2(maturity - invested),
        total_return: round2(total_return),
        total_gain: round2(total_return - invested),
        annualized_return: round2(((total_return / invested).powf(1.0 / tenure as f64) - 1.0) * 100.0),
        year_wise_data,
    })
}

fn default_rbi_rate() -> f64 {
    8.05
}

fn default_rbi_tenure() -> u32 {
    7
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RbiBondRequest {
    pub investment_amount: f64,
    #[serde(default = "default_rbi_rate")]
    pub interest_rate: f64,
    #[serde(default = "default_rbi_tenure")]
    pub bond_tenure_years: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RbiBondYear {
    pub year: u32,
    pub interest_earned: f64,
    pub cumulative_interest: f64,
    pub principal_outstanding: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RbiBondPayout {
    pub payout_number: u32,
    pub year: u32,
    /// 1 for the January payout, 2 for July
    pub half_year: u32,
    pub payout_amount: f64,
    pub cumulative_interest: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RbiBondResult {
    pub investment_amount: f64,
    pub interest_rate: f64,
    pub bond_tenure_years: u32,
    pub total_interest_per_year: f64,
    pub half_yearly_payout: f64,
    pub total_interest_over_tenure: f64,
    pub maturity_amount: f64,
    pub yearly_data: Vec<RbiBondYear>,
    pub half_yearly_data: Vec<RbiBondPayout>,
    /// The coupon resets every 1 January and 1 July
    pub next_revision_date: String,
    pub summary_text: String,
}

fn next_revision_date(today: NaiveDate) -> String {
    if today.month() <= 6 {
        format!("Jul 1, {}", today.year())
    } else {
        format!("Jan 1, {}", today.year() + 1)
    }
}

/// Floating-rate savings bonds pay their coupon half-yearly and never compound
pub fn calculate_rbi_bonds(request: &RbiBondRequest) -> CalcResult<RbiBondResult> {
    ensure_range("investment_amount", request.investment_amount, RBI_BOND_MIN_INVESTMENT, 1e12)?;
    ensure_positive("interest_rate", request.interest_rate)?;
    ensure_range("interest_rate", request.interest_rate, 0.0, 20.0)?;
    ensure_range("bond_tenure_years", request.bond_tenure_years as f64, 1.0, 30.0)?;

    let p = request.investment_amount;
    let yearly = p * request.interest_rate / 100.0;
    let half = yearly / 2.0;
    let tenure = request.bond_tenure_years;

    let yearly_data = (1..=tenure)
        .map(|year| RbiBondYear {
            year,
            interest_earned: yearly.round(),
            cumulative_interest: (yearly * year as f64).round(),
            principal_outstanding: p,
        })
        .collect();
    let half_yearly_data = (1..=tenure * 2)
        .map(|n| RbiBondPayout {
            payout_number: n,
            year: n.div_ceil(2),
            half_year: 2 - n % 2,
            payout_amount: half.round(),
            cumulative_interest: (half * n as f64).round(),
        })
        .collect();

    let summary_text = format!(
        "For an investment of ₹{:.0} at {}% interest, you will receive ₹{:.0} every 6 months for {} years.",
        p,
        round_to(request.interest_rate, 2),
        half,
        tenure
    );

    Ok(RbiBondResult {
        investment_amount: p.round(),
        interest_rate: request.interest_rate,
        bond_tenure_years: tenure,
        total_interest_per_year: yearly.round(),
        half_yearly_payout: half.round(),
        total_interest_over_tenure: (yearly * tenure as f64).round(),
        maturity_amount: (p + yearly * tenure as f64).round(),
        yearly_data,
        half_yearly_data,
        next_revision_date: next_revision_date(Local::now().date_naive()),
        summary_text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_sgb_returns() {
        let r = calculate_sgb(&SgbRequest {
            investment_quantity: 10.0,
            issue_price_per_gram: 6_000.0,
            expected_gold_price_maturity: 9_000.0,
            interest_rate: 2.5,
            tenure_years: 8,
        })
        .unwrap();
        assert_eq!(r.total_investment, 60_000.0);
        assert_eq!(r.annual_interest, 1_500.0);
        assert_eq!(r.total_interest_earned, 12_000.0);
        assert_eq!(r.maturity_value, 90_000.0);
        assert_eq!(r.capital_gain, 30_000.0);
        assert_eq!(r.total_return, 102_000.0);
        // 1.7^(1/8) - 1
        assert_abs_diff_eq!(r.annualized_return, 6.86, epsilon = 0.01);
        assert_eq!(r.year_wise_data[3].estimated_gold_value, 75_000.0);
        assert_eq!(r.year_wise_data[7].total_value_with_interest, 102_000.0);
    }

    #[test]
    fn test_sgb_quantity_cap() {
        let req = SgbRequest {
            investment_quantity: 5_000.0,
            issue_price_per_gram: 6_000.0,
            expected_gold_price_maturity: 9_000.0,
            interest_rate: 2.5,
            tenure_years: 8,
        };
        assert!(calculate_sgb(&req).unwrap_err().is_client_error());
    }

    #[test]
    fn test_rbi_bond_payouts() {
        let r = calculate_rbi_bonds(&RbiBondRequest {
            investment_amount: 100_000.0,
            interest_rate: 8.05,
            bond_tenure_years: 7,
        })
        .unwrap();
        assert_eq!(r.total_interest_per_year, 8_050.0);
        assert_eq!(r.half_yearly_payout, 4_025.0);
        assert_eq!(r.total_interest_over_tenure, 56_350.0);
        assert_eq!(r.maturity_amount, 156_350.0);
        assert_eq!(r.half_yearly_data.len(), 14);
        assert_eq!(r.half_yearly_data[0].half_year, 1);
        assert_eq!(r.half_yearly_data[1].half_year, 2);
        assert_eq!(r.half_yearly_data[13].year, 7);
        assert!(r.summary_text.contains("₹4025 every 6 months for 7 years"));
    }

    #[test]
    fn test_revision_dates() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        assert_eq!(next_revision_date(d(2025, 3, 15)), "Jul 1, 2025");
        assert_eq!(next_revision_date(d(2025, 6, 30)), "Jul 1, 2025");
        assert_eq!(next_revision_date(d(2025, 7, 1)), "Jan 1, 2026");
    }

    #[test]
    fn test_rbi_bond_minimum() {
        let req = RbiBondRequest {
            investment_amount: 500.0,
            interest_rate: 8.05,
            bond_tenure_years: 7,
        };
        assert!(calculate_rbi_bonds(&req).is_err());
    }
}
