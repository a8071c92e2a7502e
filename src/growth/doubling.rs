//! Doubling-time rules, Kisan Vikas Patra and CAGR helpers

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, ensure_range, CalcError, CalcResult};
use crate::rates::{current_month_start, round2};

/// Input contract of the rule of 72 calculator; exactly one field is set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleOf72Request {
    #[serde(default)]
    pub interest_rate: Option<f64>,
    #[serde(default)]
    pub years_to_double: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RuleOf72Result {
    YearsToDouble {
        interest_rate: f64,
        years_to_double_rule_72: f64,
        years_to_double_exact: f64,
        accuracy_percentage: f64,
    },
    RateToDouble {
        years_to_double: f64,
        required_rate_rule_72: f64,
        required_rate_exact: f64,
        accuracy_percentage: f64,
    },
}

fn accuracy(approx: f64, exact: f64) -> f64 {
    100.0 - ((approx - exact).abs() / exact * 100.0)
}

/// Exact years to double at an annual rate (percent), compounded yearly
pub fn years_to_double(rate_pct: f64) -> f64 {
    2f64.ln() / (1.0 + rate_pct / 100.0).ln()
}

pub fn calculate_rule_of_72(request: &RuleOf72Request) -> CalcResult<RuleOf72Result> {
    match (request.interest_rate, request.years_to_double) {
        (Some(rate), None) => {
            ensure_range("interest_rate", rate, 0.1, 100.0)?;
            let rule = 72.0 / rate;
            let exact = years_to_double(rate);
            Ok(RuleOf72Result::YearsToDouble {
                interest_rate: rate,
                years_to_double_rule_72: round2(rule),
                years_to_double_exact: round2(exact),
                accuracy_percentage: round2(accuracy(rule, exact)),
            })
        }
        (None, Some(years)) => {
            ensure_range("years_to_double", years, 0.1, 200.0)?;
            let rule = 72.0 / years;
            let exact = (2f64.powf(1.0 / years) - 1.0) * 100.0;
            Ok(RuleOf72Result::RateToDouble {
                years_to_double: years,
                required_rate_rule_72: round2(rule),
                required_rate_exact: round2(exact),
                accuracy_percentage: round2(accuracy(rule, exact)),
            })
        }
        _ => Err(CalcError::invalid(
            "interest_rate",
            "provide exactly one of interest_rate or years_to_double",
        )),
    }
}

fn default_kvp_rate() -> f64 {
    7.5
}

/// Months after which a KVP certificate can be encashed
pub const KVP_LOCK_IN_MONTHS: u32 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KvpRequest {
    pub investment_amount: f64,
    #[serde(default = "default_kvp_rate")]
    pub interest_rate: f64,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KvpYear {
    pub year: u32,
    pub value: f64,
    pub interest: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KvpResult {
    pub investment_amount: f64,
    pub interest_rate: f64,
    pub maturity_amount: f64,
    pub total_interest: f64,
    pub doubling_period_months: u32,
    pub maturity_years: f64,
    pub lock_in_amount: f64,
    pub lock_in_interest: f64,
    pub maturity_date: NaiveDate,
    pub lock_in_date: NaiveDate,
    pub yearly_data: Vec<KvpYear>,
}

pub fn calculate_kvp(request: &KvpRequest) -> CalcResult<KvpResult> {
    ensure_range("investment_amount", request.investment_amount, 1_000.0, 1e12)?;
    ensure_range("interest_rate", request.interest_rate, 0.1, 50.0)?;

    let p = request.investment_amount;
    let r = request.interest_rate / 100.0;
    let months = (years_to_double(request.interest_rate) * 12.0 - 1e-9).ceil() as u32;
    let maturity_years = months as f64 / 12.0;
    let lock_in_amount = p * (1.0 + r).powf(KVP_LOCK_IN_MONTHS as f64 / 12.0);

    let start = request.start_date.unwrap_or_else(current_month_start);
    let add = |m: u32| {
        start
            .checked_add_months(Months::new(m))
            .ok_or_else(|| CalcError::invalid("start_date", "date out of range"))
    };

    let yearly_data = (1..=maturity_years.ceil() as u32)
        .map(|y| {
            let value = (p * (1.0 + r).powf((y as f64).min(maturity_years))).min(2.0 * p);
            KvpYear {
                year: y,
                value: round2(value),
                interest: round2(value - p),
            }
        })
        .collect();

    Ok(KvpResult {
        investment_amount: p,
        interest_rate: request.interest_rate,
        maturity_amount: round2(2.0 * p),
        total_interest: round2(p),
        doubling_period_months: months,
        maturity_years: round2(maturity_years),
        lock_in_amount: round2(lock_in_amount),
        lock_in_interest: round2(lock_in_amount - p),
        maturity_date: add(months)?,
        lock_in_date: add(KVP_LOCK_IN_MONTHS)?,
        yearly_data,
    })
}

/// Compound annual growth rate in percent
pub fn cagr(initial: f64, final_value: f64, years: f64) -> CalcResult<f64> {
    ensure_positive("initial_investment", initial)?;
    ensure_positive("years", years)?;
    if final_value < 0.0 {
        return Err(CalcError::invalid("final_value", "must not be negative"));
    }
    Ok(((final_value / initial).powf(1.0 / years) - 1.0) * 100.0)
}

/// Investment needed today to reach `target` at `cagr_pct` over `years`
pub fn reverse_cagr(target: f64, cagr_pct: f64, years: f64) -> f64 {
    target / (1.0 + cagr_pct / 100.0).powf(years)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoiRequest {
    pub initial_investment: f64,
    pub final_value: f64,
    #[serde(alias = "investment_period")]
    pub years: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoiResult {
    pub initial_investment: f64,
    pub final_value: f64,
    pub absolute_returns: f64,
    pub roi_percentage: f64,
    /// CAGR
    pub annualized_roi: f64,
}

pub fn calculate_roi(request: &RoiRequest) -> CalcResult<RoiResult> {
    let annualized = cagr(request.initial_investment, request.final_value, request.years)?;
    let gain = request.final_value - request.initial_investment;
    Ok(RoiResult {
        initial_investment: request.initial_investment,
        final_value: request.final_value,
        absolute_returns: round2(gain),
        roi_percentage: round2(gain / request.initial_investment * 100.0),
        annualized_roi: round2(annualized),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseCagrRequest {
    pub target_amount: f64,
    pub expected_cagr: f64,
    pub investment_years: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthPoint {
    pub year: u32,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReverseCagrResult {
    pub target_amount: f64,
    pub expected_cagr: f64,
    pub investment_years: u32,
    pub initial_investment: f64,
    pub total_growth: f64,
    pub growth_table: Vec<GrowthPoint>,
}

pub fn calculate_reverse_cagr(request: &ReverseCagrRequest) -> CalcResult<ReverseCagrResult> {
    ensure_positive("targetAmount", request.target_amount)?;
    ensure_positive("expectedCagr", request.expected_cagr)?;
    ensure_range("investmentYears", request.investment_years as f64, 1.0, 50.0)?;

    let initial = reverse_cagr(request.target_amount, request.expected_cagr, request.investment_years as f64);
    let g = 1.0 + request.expected_cagr / 100.0;

    Ok(ReverseCagrResult {
        target_amount: request.target_amount,
        expected_cagr: request.expected_cagr,
        investment_years: request.investment_years,
        initial_investment: round2(initial),
        total_growth: round2(request.target_amount - initial),
        growth_table: (0..=request.investment_years)
            .map(|y| GrowthPoint {
                year: y,
                value: round2(initial * g.powi(y as i32)),
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_of_72_years() {
        let r = calculate_rule_of_72(&RuleOf72Request {
            interest_rate: Some(8.0),
            years_to_double: None,
        })
        .unwrap();
        match r {
            RuleOf72Result::YearsToDouble {
                years_to_double_rule_72,
                years_to_double_exact,
                accuracy_percentage,
                ..
            } => {
                assert_eq!(years_to_double_rule_72, 9.0);
                assert_eq!(years_to_double_exact, 9.01);
                assert!(accuracy_percentage > 99.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_rule_of_72_rate() {
        let r = calculate_rule_of_72(&RuleOf72Request {
            interest_rate: None,
            years_to_double: Some(10.0),
        })
        .unwrap();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["mode"], "rate_to_double");
        assert_eq!(json["required_rate_rule_72"], 7.2);
        assert_eq!(json["required_rate_exact"], 7.18);
    }

    #[test]
    fn test_rule_of_72_needs_one_input() {
        assert!(calculate_rule_of_72(&RuleOf72Request::default()).is_err());
    }

    #[test]
    fn test_kvp_doubles() {
        let r = calculate_kvp(&KvpRequest {
            investment_amount: 100_000.0,
            interest_rate: 7.5,
            start_date: Some(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()),
        })
        .unwrap();
        assert_eq!(r.maturity_amount, 200_000.0);
        assert_eq!(r.doubling_period_months, 116);
        assert_eq!(r.lock_in_date, NaiveDate::from_ymd_opt(2027, 10, 1).unwrap());
        assert_eq!(r.maturity_date, NaiveDate::from_ymd_opt(2034, 12, 1).unwrap());
        assert_eq!(r.yearly_data.last().unwrap().value, 200_000.0);
    }

    #[test]
    fn test_cagr_round_trip() {
        let c = cagr(100_000.0, 200_000.0, 5.0).unwrap();
        assert!((c - 14.869835499703509).abs() < 1e-9);
        assert!((reverse_cagr(200_000.0, c, 5.0) - 100_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_reverse_cagr_table_ends_at_target() {
        let r = calculate_reverse_cagr(&ReverseCagrRequest {
            target_amount: 1_000_000.0,
            expected_cagr: 12.0,
            investment_years: 10,
        })
        .unwrap();
        assert_eq!(r.growth_table.len(), 11);
        assert_eq!(r.growth_table[10].value, 1_000_000.0);
    }
}
