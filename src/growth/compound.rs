//! Compound interest on a lump sum

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_positive, ensure_range, CalcResult};
use crate::rates::{round2, Frequency, TimeUnit};

/// Future value of `principal` compounded `frequency` for `years`
pub fn compound_amount(principal: f64, annual_rate_pct: f64, years: f64, frequency: Frequency) -> f64 {
    let n = frequency.periods_per_year() as f64;
    principal * (1.0 + annual_rate_pct / 100.0 / n).powf(n * years)
}

/// Balance at the end of each whole year, plus a final partial year if any
fn yearly_growth(principal: f64, annual_rate_pct: f64, years: f64, frequency: Frequency) -> Vec<GrowthRow> {
    let whole = years.ceil().max(1.0) as u32;
    let mut opening = principal;
    (1..=whole)
        .map(|y| {
            let t = (y as f64).min(years);
            let closing = compound_amount(principal, annual_rate_pct, t, frequency);
            let row = GrowthRow {
                year: y,
                opening_balance: round2(opening),
                interest: round2(closing - opening),
                closing_balance: round2(closing),
            };
            opening = closing;
            row
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthRow {
    pub year: u32,
    pub opening_balance: f64,
    pub interest: f64,
    pub closing_balance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyComparison {
    pub frequency: Frequency,
    pub future_value: f64,
    pub interest_earned: f64,
    /// Interest relative to the requested frequency
    pub difference: f64,
}

fn default_frequency() -> Frequency {
    Frequency::Yearly
}

/// Input contract of the compound interest calculators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundInterestRequest {
    #[serde(alias = "principal_amount")]
    pub principal: f64,
    #[serde(alias = "annual_interest_rate")]
    pub annual_rate: f64,
    #[serde(alias = "tenure_years", alias = "time_years")]
    pub time_period_value: f64,
    #[serde(default)]
    pub time_period_unit: TimeUnit,
    #[serde(default = "default_frequency")]
    pub compounding_frequency: Frequency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundInterestResult {
    pub principal: f64,
    pub annual_rate: f64,
    pub time_years: f64,
    pub compounding_frequency: Frequency,
    pub future_value: f64,
    pub interest_earned: f64,
    pub effective_rate: f64,
    pub total_return_percentage: f64,
    /// All frequencies, most interest first
    pub comparison_data: Vec<FrequencyComparison>,
    pub yearly_growth: Vec<GrowthRow>,
}

pub fn compare_frequencies(principal: f64, annual_rate_pct: f64, years: f64, chosen: Frequency) -> Vec<FrequencyComparison> {
    let base = compound_amount(principal, annual_rate_pct, years, chosen) - principal;
    let mut rows: Vec<FrequencyComparison> = Frequency::ALL
        .iter()
        .map(|&f| {
            let fv = compound_amount(principal, annual_rate_pct, years, f);
            FrequencyComparison {
                frequency: f,
                future_value: round2(fv),
                interest_earned: round2(fv - principal),
                difference: round2(fv - principal - base),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.interest_earned.total_cmp(&a.interest_earned));
    rows
}

pub fn calculate_compound_interest(request: &CompoundInterestRequest) -> CalcResult<CompoundInterestResult> {
    ensure_range("principal", request.principal, 1.0, 100_000_000.0)?;
    ensure_range("annual_rate", request.annual_rate, 0.0, 50.0)?;
    ensure_positive("time_period_value", request.time_period_value)?;
    let years = request.time_period_unit.to_years(request.time_period_value);
    ensure_range("time_years", years, 0.0, 50.0)?;

    let fv = compound_amount(request.principal, request.annual_rate, years, request.compounding_frequency);
    let interest = fv - request.principal;
    let effective = ((fv / request.principal).powf(1.0 / years) - 1.0) * 100.0;

    Ok(CompoundInterestResult {
        principal: round2(request.principal),
        annual_rate: request.annual_rate,
        time_years: years,
        compounding_frequency: request.compounding_frequency,
        future_value: round2(fv),
        interest_earned: round2(interest),
        effective_rate: round2(effective),
        total_return_percentage: round2(interest / request.principal * 100.0),
        comparison_data: compare_frequencies(request.principal, request.annual_rate, years, request.compounding_frequency),
        yearly_growth: yearly_growth(request.principal, request.annual_rate, years, request.compounding_frequency),
    })
}

/// Input contract of the future value calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FutureValueRequest {
    pub principal: f64,
    pub annual_rate: f64,
    pub time_years: f64,
    #[serde(default = "default_frequency")]
    pub compounding_frequency: Frequency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FutureValueResult {
    pub principal: f64,
    pub annual_rate: f64,
    pub time_years: f64,
    pub future_value: f64,
    pub total_interest: f64,
    pub effective_annual_rate: f64,
    pub year_wise_data: Vec<GrowthRow>,
}

pub fn calculate_future_value(request: &FutureValueRequest) -> CalcResult<FutureValueResult> {
    ensure_positive("principal", request.principal)?;
    ensure_non_negative("annual_rate", request.annual_rate)?;
    ensure_positive("time_years", request.time_years)?;

    let fv = compound_amount(request.principal, request.annual_rate, request.time_years, request.compounding_frequency);

    Ok(FutureValueResult {
        principal: round2(request.principal),
        annual_rate: request.annual_rate,
        time_years: request.time_years,
        future_value: round2(fv),
        total_interest: round2(fv - request.principal),
        effective_annual_rate: round2(crate::rates::effective_annual_rate(
            request.annual_rate,
            request.compounding_frequency,
        )),
        year_wise_data: yearly_growth(request.principal, request.annual_rate, request.time_years, request.compounding_frequency),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_amount() {
        let fv = compound_amount(100_000.0, 10.0, 2.0, Frequency::Yearly);
        assert!((fv - 121_000.0).abs() < 1e-6);
        let q = compound_amount(100_000.0, 8.0, 1.0, Frequency::Quarterly);
        assert!((q - 108_243.216).abs() < 1e-3);
    }

    #[test]
    fn test_comparison_sorted_and_relative() {
        let rows = compare_frequencies(100_000.0, 10.0, 5.0, Frequency::Yearly);
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].frequency, Frequency::Daily);
        assert_eq!(rows[5].frequency, Frequency::Yearly);
        assert_eq!(rows[5].difference, 0.0);
        assert!(rows.windows(2).all(|w| w[0].interest_earned >= w[1].interest_earned));
    }

    #[test]
    fn test_time_in_months() {
        let req: CompoundInterestRequest = serde_json::from_str(
            r#"{"principal": 50000, "annual_rate": 12, "time_period_value": 18,
                "time_period_unit": "months", "compounding_frequency": "monthly"}"#,
        )
        .unwrap();
        let r = calculate_compound_interest(&req).unwrap();
        assert_eq!(r.time_years, 1.5);
        let expected = 50_000.0 * 1.01f64.powi(18);
        assert!((r.future_value - expected).abs() < 0.01);
        assert_eq!(r.yearly_growth.len(), 2);
        assert_eq!(r.yearly_growth[1].closing_balance, r.future_value);
        assert_eq!(r.effective_rate, 12.68);
    }

    #[test]
    fn test_rejects_out_of_range() {
        let req = CompoundInterestRequest {
            principal: 10_000.0,
            annual_rate: 55.0,
            time_period_value: 5.0,
            time_period_unit: TimeUnit::Years,
            compounding_frequency: Frequency::Yearly,
        };
        assert!(calculate_compound_interest(&req).is_err());
    }
}
