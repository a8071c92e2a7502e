//! SIP outcomes after inflation and tax, and the goal SIP that allows for both

use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, ensure_range, CalcResult};
use crate::growth::{deflate, inflate};
use crate::rates::{round2, Frequency};

use super::goal::required_installment;
use super::ledger::InstallmentLedger;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SipInflationRequest {
    pub sip_amount: f64,
    pub return_rate: f64,
    pub tenure_years: u32,
    pub inflation_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipInflationYear {
    pub year: u32,
    pub yearly_invested: f64,
    pub cumulative_invested: f64,
    pub nominal_value: f64,
    pub inflation_impact: f64,
    pub real_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SipInflationResult {
    pub total_invested: f64,
    pub nominal_returns: f64,
    /// Gain measured in today's money; negative when inflation outruns the fund
    pub real_returns: f64,
    pub final_amount: f64,
    pub real_value: f64,
    pub inflation_impact: f64,
    pub yearly_breakdown: Vec<SipInflationYear>,
}

fn check_inputs(sip_amount: f64, return_rate: f64, tenure_years: u32, inflation_rate: f64) -> CalcResult<()> {
    ensure_positive("sipAmount", sip_amount)?;
    ensure_range("returnRate", return_rate, 0.0, 50.0)?;
    ensure_range("tenureYears", tenure_years as f64, 1.0, 50.0)?;
    ensure_range("inflationRate", inflation_rate, 0.0, 30.0)
}

pub fn calculate_sip_with_inflation(request: &SipInflationRequest) -> CalcResult<SipInflationResult> {
    check_inputs(request.sip_amount, request.return_rate, request.tenure_years, request.inflation_rate)?;

    let rows = InstallmentLedger::new(request.return_rate, Frequency::Monthly, request.tenure_years)
        .run(|_| request.sip_amount);
    let yearly_breakdown = rows
        .iter()
        .map(|r| {
            let real = deflate(r.value, request.inflation_rate, r.year as f64);
            SipInflationYear {
                year: r.year,
                yearly_invested: round2(r.invested_this_year),
                cumulative_invested: round2(r.cumulative_invested),
                nominal_value: round2(r.value),
                inflation_impact: round2(r.value - real),
                real_value: round2(real),
            }
        })
        .collect();

    let (value, invested) = rows
        .last()
        .map(|r| (r.value, r.cumulative_invested))
        .unwrap_or_default();
    let real = deflate(value, request.inflation_rate, request.tenure_years as f64);

    Ok(SipInflationResult {
        total_invested: round2(invested),
        nominal_returns: round2(value - invested),
        real_returns: round2(real - invested),
        final_amount: round2(value),
        real_value: round2(real),
        inflation_impact: round2(value - real),
        yearly_breakdown,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SipInflationTaxRequest {
    pub sip_amount: f64,
    pub return_rate: f64,
    pub tenure_years: u32,
    pub inflation_rate: f64,
    /// Flat tax on gains, in percent
    pub tax_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipInflationTaxYear {
    pub year: u32,
    pub yearly_invested: f64,
    pub cumulative_invested: f64,
    pub gross_value: f64,
    pub tax_impact: f64,
    pub net_value: f64,
    pub real_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SipInflationTaxResult {
    pub total_invested: f64,
    pub gross_returns: f64,
    pub tax_impact: f64,
    pub inflation_impact: f64,
    pub net_returns: f64,
    /// Post-tax value at the end of the tenure
    pub final_amount: f64,
    /// Post-tax value in today's money
    pub real_value: f64,
    pub yearly_breakdown: Vec<SipInflationTaxYear>,
}

/// Tax falls on gains only; inflation then discounts the post-tax value
pub fn calculate_sip_with_inflation_and_tax(request: &SipInflationTaxRequest) -> CalcResult<SipInflationTaxResult> {
    check_inputs(request.sip_amount, request.return_rate, request.tenure_years, request.inflation_rate)?;
    ensure_range("taxRate", request.tax_rate, 0.0, 50.0)?;

    let tax = request.tax_rate / 100.0;
    let after_tax = |value: f64, invested: f64| {
        let levy = (value - invested).max(0.0) * tax;
        (levy, value - levy)
    };

    let rows = InstallmentLedger::new(request.return_rate, Frequency::Monthly, request.tenure_years)
        .run(|_| request.sip_amount);
    let yearly_breakdown = rows
        .iter()
        .map(|r| {
            let (levy, net) = after_tax(r.value, r.cumulative_invested);
            SipInflationTaxYear {
                year: r.year,
                yearly_invested: round2(r.invested_this_year),
                cumulative_invested: round2(r.cumulative_invested),
                gross_value: round2(r.value),
                tax_impact: round2(levy),
                net_value: round2(net),
                real_value: round2(deflate(net, request.inflation_rate, r.year as f64)),
            }
        })
        .collect();

    let (value, invested) = rows
        .last()
        .map(|r| (r.value, r.cumulative_invested))
        .unwrap_or_default();
    let (levy, net) = after_tax(value, invested);
    let real = deflate(net, request.inflation_rate, request.tenure_years as f64);

    Ok(SipInflationTaxResult {
        total_invested: round2(invested),
        gross_returns: round2(value - invested),
        tax_impact: round2(levy),
        inflation_impact: round2(net - real),
        net_returns: round2(net - invested),
        final_amount: round2(net),
        real_value: round2(real),
        yearly_breakdown,
    })
}

fn default_goal_frequency() -> Frequency {
    Frequency::Monthly
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalSipInflationTaxRequest {
    /// Goal cost in today's money
    pub present_goal_value: f64,
    pub years_to_goal: u32,
    pub inflation_rate: f64,
    /// Pre-tax annual return in percent
    pub expected_return: f64,
    pub tax_rate: f64,
    /// How often installments are paid and returns compound
    #[serde(default = "default_goal_frequency")]
    pub compounding_frequency: Frequency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalSipInflationTaxYear {
    pub year: u32,
    pub yearly_investment: f64,
    pub cumulative_investment: f64,
    pub gains: f64,
    pub portfolio_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalSipInflationTaxResult {
    pub inflation_adjusted_goal: f64,
    pub net_post_tax_return: f64,
    /// Installment per period of `compounding_frequency`
    pub monthly_sip_required: f64,
    pub total_invested: f64,
    pub maturity_value: f64,
    pub gain: f64,
    pub yearly_breakdown: Vec<GoalSipInflationTaxYear>,
}

/// Installment that reaches an inflated goal when returns are taxed every year
pub fn calculate_goal_sip_with_inflation_and_tax(
    request: &GoalSipInflationTaxRequest,
) -> CalcResult<GoalSipInflationTaxResult> {
    ensure_positive("present_goal_value", request.present_goal_value)?;
    ensure_range("years_to_goal", request.years_to_goal as f64, 1.0, 50.0)?;
    ensure_range("inflation_rate", request.inflation_rate, 0.0, 30.0)?;
    ensure_range("expected_return", request.expected_return, 0.0, 50.0)?;
    ensure_range("tax_rate", request.tax_rate, 0.0, 50.0)?;

    let years = request.years_to_goal;
    let goal = inflate(request.present_goal_value, request.inflation_rate, years as f64);
    let net_return = request.expected_return * (1.0 - request.tax_rate / 100.0);
    let installment = required_installment(goal, net_return, request.compounding_frequency, years);

    let rows = InstallmentLedger::new(net_return, request.compounding_frequency, years).run(|_| installment);
    let yearly_breakdown = rows
        .iter()
        .map(|r| GoalSipInflationTaxYear {
            year: r.year,
            yearly_investment: round2(r.invested_this_year),
            cumulative_investment: round2(r.cumulative_invested),
            gains: round2(r.value - r.cumulative_invested),
            portfolio_value: round2(r.value),
        })
        .collect();
    let (value, invested) = rows
        .last()
        .map(|r| (r.value, r.cumulative_invested))
        .unwrap_or_default();

    Ok(GoalSipInflationTaxResult {
        inflation_adjusted_goal: round2(goal),
        net_post_tax_return: round2(net_return),
        monthly_sip_required: round2(installment),
        total_invested: round2(invested),
        maturity_value: round2(value),
        gain: round2(value - invested),
        yearly_breakdown,
    })
}
