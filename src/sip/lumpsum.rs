//! Lump-sum investing, on its own, against a SIP, and combined with one

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_positive, ensure_range, CalcResult};
use crate::rates::{round2, Frequency};

use super::ledger::InstallmentLedger;

/// Value of a lump sum compounded yearly
pub fn lumpsum_value(amount: f64, annual_rate_pct: f64, years: u32) -> f64 {
    amount * (1.0 + annual_rate_pct / 100.0).powi(years as i32)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LumpsumRequest {
    #[serde(alias = "investmentAmount")]
    pub lump_sum_amount: f64,
    pub return_rate: f64,
    pub tenure_years: u32,
    /// Optional monthly SIP running alongside the lump sum
    #[serde(default)]
    pub monthly_sip: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LumpsumYear {
    pub year: u32,
    pub yearly_invested: f64,
    pub cumulative_invested: f64,
    pub cumulative_value: f64,
    pub yearly_returns: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LumpsumResponse {
    pub future_value: f64,
    pub total_invested: f64,
    pub total_returns: f64,
    pub lumpsum_value: f64,
    pub sip_value: f64,
    pub yearly_breakdown: Vec<LumpsumYear>,
}

pub fn calculate_lumpsum(request: &LumpsumRequest) -> CalcResult<LumpsumResponse> {
    ensure_positive("lumpSumAmount", request.lump_sum_amount)?;
    ensure_range("returnRate", request.return_rate, 0.0, 50.0)?;
    ensure_range("tenureYears", request.tenure_years as f64, 1.0, 50.0)?;
    ensure_non_negative("monthlySip", request.monthly_sip)?;

    let sip_rows = InstallmentLedger::new(request.return_rate, Frequency::Monthly, request.tenure_years)
        .run(|_| request.monthly_sip);

    let mut previous_value = request.lump_sum_amount;
    let mut yearly_breakdown = Vec::with_capacity(sip_rows.len());
    for row in &sip_rows {
        let value = lumpsum_value(request.lump_sum_amount, request.return_rate, row.year) + row.value;
        let invested_this_year = row.invested_this_year + if row.year == 1 { request.lump_sum_amount } else { 0.0 };
        let opening = if row.year == 1 { 0.0 } else { previous_value };
        yearly_breakdown.push(LumpsumYear {
            year: row.year,
            yearly_invested: round2(invested_this_year),
            cumulative_invested: round2(request.lump_sum_amount + row.cumulative_invested),
            cumulative_value: round2(value),
            yearly_returns: round2(value - opening - invested_this_year),
        });
        previous_value = value;
    }

    let lump = lumpsum_value(request.lump_sum_amount, request.return_rate, request.tenure_years);
    let sip = sip_rows.last().map(|r| r.value).unwrap_or(0.0);
    let invested = request.lump_sum_amount + request.monthly_sip * 12.0 * request.tenure_years as f64;

    Ok(LumpsumResponse {
        future_value: round2(lump + sip),
        total_invested: round2(invested),
        total_returns: round2(lump + sip - invested),
        lumpsum_value: round2(lump),
        sip_value: round2(sip),
        yearly_breakdown,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LumpsumVsSipRequest {
    pub investment_amount: f64,
    /// Defaults to the lump sum spread evenly over the period
    #[serde(default)]
    pub monthly_sip: Option<f64>,
    pub expected_return: f64,
    pub investment_period: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BetterOption {
    Lumpsum,
    #[serde(rename = "SIP")]
    Sip,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonYear {
    pub year: u32,
    pub lumpsum_value: f64,
    pub lumpsum_gains: f64,
    pub sip_total_invested: f64,
    pub sip_value: f64,
    pub sip_gains: f64,
    pub advantage: f64,
    pub better_option: BetterOption,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LumpsumVsSipResponse {
    pub lumpsum_investment: f64,
    pub lumpsum_maturity_value: f64,
    pub lumpsum_gains: f64,
    pub monthly_sip: f64,
    pub sip_total_investment: f64,
    pub sip_maturity_value: f64,
    pub sip_gains: f64,
    pub difference: f64,
    pub better_option: BetterOption,
    pub comparison_schedule: Vec<ComparisonYear>,
}

fn better(lumpsum: f64, sip: f64) -> BetterOption {
    if lumpsum >= sip {
        BetterOption::Lumpsum
    } else {
        BetterOption::Sip
    }
}

pub fn calculate_lumpsum_vs_sip(request: &LumpsumVsSipRequest) -> CalcResult<LumpsumVsSipResponse> {
    ensure_positive("investmentAmount", request.investment_amount)?;
    ensure_range("expectedReturn", request.expected_return, 0.0, 50.0)?;
    ensure_range("investmentPeriod", request.investment_period as f64, 1.0, 50.0)?;
    let monthly = request
        .monthly_sip
        .unwrap_or(request.investment_amount / (12 * request.investment_period) as f64);
    ensure_positive("monthlySip", monthly)?;

    let sip_rows = InstallmentLedger::new(request.expected_return, Frequency::Monthly, request.investment_period)
        .run(|_| monthly);

    let comparison_schedule = sip_rows
        .iter()
        .map(|row| {
            let lump = lumpsum_value(request.investment_amount, request.expected_return, row.year);
            ComparisonYear {
                year: row.year,
                lumpsum_value: round2(lump),
                lumpsum_gains: round2(lump - request.investment_amount),
                sip_total_invested: round2(row.cumulative_invested),
                sip_value: round2(row.value),
                sip_gains: round2(row.value - row.cumulative_invested),
                advantage: round2((lump - row.value).abs()),
                better_option: better(lump, row.value),
            }
        })
        .collect();

    let lump = lumpsum_value(request.investment_amount, request.expected_return, request.investment_period);
    let (sip, sip_invested) = sip_rows
        .last()
        .map(|r| (r.value, r.cumulative_invested))
        .unwrap_or((0.0, 0.0));

    Ok(LumpsumVsSipResponse {
        lumpsum_investment: request.investment_amount,
        lumpsum_maturity_value: round2(lump),
        lumpsum_gains: round2(lump - request.investment_amount),
        monthly_sip: round2(monthly),
        sip_total_investment: round2(sip_invested),
        sip_maturity_value: round2(sip),
        sip_gains: round2(sip - sip_invested),
        difference: round2((lump - sip).abs()),
        better_option: better(lump, sip),
        comparison_schedule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lumpsum_alone() {
        let req: LumpsumRequest =
            serde_json::from_str(r#"{"lumpSumAmount": 100000, "returnRate": 10, "tenureYears": 2}"#).unwrap();
        let r = calculate_lumpsum(&req).unwrap();
        assert_eq!(r.future_value, 121_000.0);
        assert_eq!(r.total_returns, 21_000.0);
        assert_eq!(r.sip_value, 0.0);
        assert_eq!(r.yearly_breakdown[0].yearly_returns, 10_000.0);
        assert_eq!(r.yearly_breakdown[1].yearly_returns, 11_000.0);
    }

    #[test]
    fn test_lumpsum_plus_sip() {
        let req = LumpsumRequest {
            lump_sum_amount: 100_000.0,
            return_rate: 12.0,
            tenure_years: 5,
            monthly_sip: 2_000.0,
        };
        let r = calculate_lumpsum(&req).unwrap();
        assert_eq!(r.total_invested, 220_000.0);
        assert!((r.future_value - r.lumpsum_value - r.sip_value).abs() < 0.011);
        assert_eq!(r.yearly_breakdown[4].cumulative_value, r.future_value);
    }

    #[test]
    fn test_lumpsum_beats_equal_sip_with_positive_return() {
        let r = calculate_lumpsum_vs_sip(&LumpsumVsSipRequest {
            investment_amount: 120_000.0,
            monthly_sip: None,
            expected_return: 12.0,
            investment_period: 10,
        })
        .unwrap();
        assert_eq!(r.monthly_sip, 1_000.0);
        assert_eq!(r.sip_total_investment, 120_000.0);
        assert_eq!(r.better_option, BetterOption::Lumpsum);
        assert_eq!(r.comparison_schedule.len(), 10);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["betterOption"], "Lumpsum");
        assert!(json["comparisonSchedule"][0].get("sipTotalInvested").is_some());
    }
}
