//! Retirement corpus planning and the National Pension System

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_positive, ensure_range, CalcError, CalcResult};
use crate::growth::inflate;
use crate::rates::{annuity_immediate_factor, round2, Frequency};
use crate::sip::InstallmentLedger;

/// Present value of `years` annual payments that start at `first_payment`,
/// grow at `growth_pct` and are paid at the start of each year, discounted at `discount_pct`
pub fn growing_annuity_due_pv(first_payment: f64, growth_pct: f64, discount_pct: f64, years: u32) -> f64 {
    let g = growth_pct / 100.0;
    let r = discount_pct / 100.0;
    if (r - g).abs() < 1e-12 {
        return first_payment * years as f64;
    }
    let ratio = (1.0 + g) / (1.0 + r);
    first_payment * (1.0 - ratio.powi(years as i32)) / (r - g) * (1.0 + r)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetirementRequest {
    pub current_age: u32,
    pub retirement_age: u32,
    pub life_expectancy: u32,
    pub monthly_income_desired: f64,
    pub inflation_rate: f64,
    pub pre_retirement_return: f64,
    pub post_retirement_return: f64,
    #[serde(default)]
    pub current_savings: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetirementResult {
    pub years_to_retirement: u32,
    pub years_in_retirement: u32,
    pub monthly_income_desired: f64,
    /// First year's income, in money of the retirement year
    pub annual_retirement_income_needed: f64,
    pub required_retirement_corpus: f64,
    pub future_value_current_savings: f64,
    pub additional_corpus_needed: f64,
    pub monthly_savings_required: f64,
}

pub fn calculate_retirement(request: &RetirementRequest) -> CalcResult<RetirementResult> {
    ensure_range("current_age", request.current_age as f64, 18.0, 100.0)?;
    if request.retirement_age <= request.current_age {
        return Err(CalcError::invalid("retirement_age", "must be greater than the current age"));
    }
    if request.life_expectancy <= request.retirement_age {
        return Err(CalcError::invalid("life_expectancy", "must be greater than the retirement age"));
    }
    ensure_range("life_expectancy", request.life_expectancy as f64, 19.0, 120.0)?;
    ensure_positive("monthly_income_desired", request.monthly_income_desired)?;
    ensure_range("inflation_rate", request.inflation_rate, 0.0, 30.0)?;
    ensure_range("pre_retirement_return", request.pre_retirement_return, 0.0, 50.0)?;
    ensure_range("post_retirement_return", request.post_retirement_return, 0.0, 50.0)?;
    ensure_non_negative("current_savings", request.current_savings)?;

    let years_to = request.retirement_age - request.current_age;
    let years_in = request.life_expectancy - request.retirement_age;

    let annual_income = inflate(request.monthly_income_desired * 12.0, request.inflation_rate, years_to as f64);
    let corpus = growing_annuity_due_pv(
        annual_income,
        request.inflation_rate,
        request.post_retirement_return,
        years_in,
    );
    let savings_fv = inflate(request.current_savings, request.pre_retirement_return, years_to as f64);
    let additional = (corpus - savings_fv).max(0.0);
    let monthly = additional / annuity_immediate_factor(request.pre_retirement_return / 100.0 / 12.0, years_to * 12);

    Ok(RetirementResult {
        years_to_retirement: years_to,
        years_in_retirement: years_in,
        monthly_income_desired: request.monthly_income_desired,
        annual_retirement_income_needed: round2(annual_income),
        required_retirement_corpus: round2(corpus),
        future_value_current_savings: round2(savings_fv),
        additional_corpus_needed: round2(additional),
        monthly_savings_required: round2(monthly),
    })
}

fn default_annuity_percentage() -> f64 {
    40.0
}

fn default_annuity_return() -> f64 {
    6.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpsRequest {
    pub current_age: u32,
    pub retirement_age: u32,
    pub monthly_contribution: f64,
    pub expected_return: f64,
    /// Yearly increase of the contribution, in percent
    #[serde(default)]
    pub annual_increase: f64,
    #[serde(default = "default_annuity_percentage")]
    pub annuity_percentage: f64,
    #[serde(default = "default_annuity_return")]
    pub annuity_return: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpsResult {
    pub investment_amount: f64,
    pub investment_gains: f64,
    pub pension_wealth: f64,
    pub annuity_amount: f64,
    pub lump_sum_amount: f64,
    pub monthly_pension: f64,
}

pub fn calculate_nps(request: &NpsRequest) -> CalcResult<NpsResult> {
    ensure_range("current_age", request.current_age as f64, 18.0, 70.0)?;
    if request.retirement_age <= request.current_age {
        return Err(CalcError::invalid("retirement_age", "must be greater than the current age"));
    }
    ensure_range("retirement_age", request.retirement_age as f64, 19.0, 75.0)?;
    ensure_positive("monthly_contribution", request.monthly_contribution)?;
    ensure_range("expected_return", request.expected_return, 0.0, 50.0)?;
    ensure_range("annual_increase", request.annual_increase, 0.0, 100.0)?;
    ensure_range("annuity_percentage", request.annuity_percentage, 40.0, 100.0)?;
    ensure_range("annuity_return", request.annuity_return, 0.0, 30.0)?;

    let years = request.retirement_age - request.current_age;
    let step = 1.0 + request.annual_increase / 100.0;
    let rows = InstallmentLedger::new(request.expected_return, Frequency::Monthly, years)
        .run(|year| request.monthly_contribution * step.powi(year as i32 - 1));
    let (wealth, invested) = rows
        .last()
        .map(|r| (r.value, r.cumulative_invested))
        .unwrap_or((0.0, 0.0));

    let annuity = wealth * request.annuity_percentage / 100.0;
    Ok(NpsResult {
        investment_amount: round2(invested),
        investment_gains: round2(wealth - invested),
        pension_wealth: round2(wealth),
        annuity_amount: round2(annuity),
        lump_sum_amount: round2(wealth - annuity),
        monthly_pension: round2(annuity * request.annuity_return / 100.0 / 12.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::annuity_due_factor;

    #[test]
    fn test_growing_annuity_matches_sum() {
        let pv = growing_annuity_due_pv(100_000.0, 6.0, 8.0, 20);
        let brute: f64 = (0..20)
            .map(|t| 100_000.0 * 1.06f64.powi(t) / 1.08f64.powi(t))
            .sum();
        assert!((pv - brute).abs() < 1e-6, "{} vs {}", pv, brute);
        assert_eq!(growing_annuity_due_pv(1_000.0, 7.0, 7.0, 10), 10_000.0);
    }

    #[test]
    fn test_retirement_plan() {
        let req: RetirementRequest = serde_json::from_str(
            r#"{"current_age": 30, "retirement_age": 60, "life_expectancy": 85,
                "monthly_income_desired": 50000, "inflation_rate": 6,
                "pre_retirement_return": 12, "post_retirement_return": 8, "current_savings": 500000}"#,
        )
        .unwrap();
        let r = calculate_retirement(&req).unwrap();
        assert_eq!(r.years_to_retirement, 30);
        assert_eq!(r.years_in_retirement, 25);
        let income = 600_000.0 * 1.06f64.powi(30);
        assert!((r.annual_retirement_income_needed - income).abs() < 0.01);
        assert!(r.required_retirement_corpus > r.future_value_current_savings);
        assert!(r.monthly_savings_required > 0.0);
    }

    #[test]
    fn test_life_expectancy_is_bounded() {
        let req: RetirementRequest = serde_json::from_str(
            r#"{"current_age": 30, "retirement_age": 60, "life_expectancy": 4000000000,
                "monthly_income_desired": 50000, "inflation_rate": 6,
                "pre_retirement_return": 12, "post_retirement_return": 8, "current_savings": 0}"#,
        )
        .unwrap();
        assert!(calculate_retirement(&req).unwrap_err().is_client_error());
    }

    #[test]
    fn test_nps_split() {
        let r = calculate_nps(&NpsRequest {
            current_age: 30,
            retirement_age: 60,
            monthly_contribution: 5_000.0,
            expected_return: 10.0,
            annual_increase: 0.0,
            annuity_percentage: 40.0,
            annuity_return: 6.0,
        })
        .unwrap();
        assert_eq!(r.investment_amount, 1_800_000.0);
        let wealth = 5_000.0 * annuity_due_factor(0.1 / 12.0, 360);
        assert!((r.pension_wealth - wealth).abs() < 0.01);
        assert!((r.annuity_amount + r.lump_sum_amount - r.pension_wealth).abs() < 0.011);
        assert!((r.monthly_pension - r.annuity_amount * 0.005).abs() < 0.01);
    }

    #[test]
    fn test_nps_annuity_floor() {
        let req = NpsRequest {
            current_age: 30,
            retirement_age: 60,
            monthly_contribution: 5_000.0,
            expected_return: 10.0,
            annual_increase: 0.0,
            annuity_percentage: 30.0,
            annuity_return: 6.0,
        };
        assert!(calculate_nps(&req).is_err());
    }
}
