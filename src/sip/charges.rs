//! Fund charges: exit loads on redemption and the drag of the expense ratio

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_positive, ensure_range, CalcError, CalcResult};
use crate::rates::{annuity_due_factor, periodic_rate, round2, Frequency};

use super::ledger::InstallmentLedger;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitLoadRequest {
    pub investment_amount: f64,
    /// Percent of the redeemed amount
    pub exit_load_rate: f64,
    /// Amount withdrawn; the whole holding when absent
    #[serde(default)]
    pub redemption_amount: Option<f64>,
    /// Days after purchase during which the load applies
    pub exit_load_period: f64,
    pub purchase_nav: f64,
    pub current_nav: f64,
    /// Days the units have been held; redemption falls inside the load window when absent
    #[serde(default)]
    pub holding_period_days: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitLoadResult {
    pub investment_amount: f64,
    pub exit_load_rate: f64,
    pub redemption_amount: f64,
    pub exit_load_period: f64,
    pub purchase_nav: f64,
    pub current_nav: f64,
    pub units_held: f64,
    pub current_value: f64,
    pub total_gain_loss: f64,
    /// Gain carried by the redeemed units
    pub gains_earned: f64,
    pub exit_load_applicable: bool,
    pub exit_load_charge: f64,
    pub net_redemption_amount: f64,
}

pub fn calculate_exit_load(request: &ExitLoadRequest) -> CalcResult<ExitLoadResult> {
    ensure_positive("investment_amount", request.investment_amount)?;
    ensure_range("exit_load_rate", request.exit_load_rate, 0.0, 10.0)?;
    ensure_non_negative("exit_load_period", request.exit_load_period)?;
    ensure_positive("purchase_nav", request.purchase_nav)?;
    ensure_positive("current_nav", request.current_nav)?;

    let units = request.investment_amount / request.purchase_nav;
    let current_value = units * request.current_nav;
    let redemption = request.redemption_amount.unwrap_or(current_value);
    ensure_non_negative("redemption_amount", redemption)?;
    if redemption > current_value + 0.005 {
        return Err(CalcError::invalid(
            "redemption_amount",
            format!("exceeds the current value of {:.2}", current_value),
        ));
    }
    if let Some(days) = request.holding_period_days {
        ensure_non_negative("holding_period_days", days)?;
    }

    let inside_window = match request.holding_period_days {
        Some(days) => days < request.exit_load_period,
        None => request.exit_load_period > 0.0,
    };
    let applicable = inside_window && request.exit_load_rate > 0.0;
    let charge = if applicable { redemption * request.exit_load_rate / 100.0 } else { 0.0 };

    Ok(ExitLoadResult {
        investment_amount: request.investment_amount,
        exit_load_rate: request.exit_load_rate,
        redemption_amount: round2(redemption),
        exit_load_period: request.exit_load_period,
        purchase_nav: request.purchase_nav,
        current_nav: request.current_nav,
        units_held: round2(units),
        current_value: round2(current_value),
        total_gain_loss: round2(current_value - request.investment_amount),
        gains_earned: round2(redemption * (1.0 - request.purchase_nav / request.current_nav)),
        exit_load_applicable: applicable,
        exit_load_charge: round2(charge),
        net_redemption_amount: round2(redemption - charge),
    })
}

fn default_redemption_percentage() -> f64 {
    100.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SipExitLoadRequest {
    pub sip_amount: f64,
    pub return_rate: f64,
    pub tenure_years: u32,
    pub exit_load_rate: f64,
    /// Installments younger than this at redemption carry the load
    pub exit_period_years: f64,
    #[serde(default = "default_redemption_percentage")]
    pub redemption_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitLoadYear {
    pub year: u32,
    pub yearly_invested: f64,
    pub cumulative_invested: f64,
    pub gross_value: f64,
    pub exit_load_charges: f64,
    pub net_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SipExitLoadResult {
    pub total_invested: f64,
    pub gross_value: f64,
    pub gross_returns: f64,
    pub exit_load_charges: f64,
    pub net_returns: f64,
    /// Cash received for the redeemed share after the load
    pub final_amount: f64,
    pub yearly_breakdown: Vec<ExitLoadYear>,
}

/// Redeeming a SIP: only the installments still inside the exit-load window pay the load
pub fn calculate_sip_exit_load(request: &SipExitLoadRequest) -> CalcResult<SipExitLoadResult> {
    ensure_positive("sipAmount", request.sip_amount)?;
    ensure_range("returnRate", request.return_rate, 0.0, 50.0)?;
    ensure_range("tenureYears", request.tenure_years as f64, 1.0, 50.0)?;
    ensure_range("exitLoadRate", request.exit_load_rate, 0.0, 10.0)?;
    ensure_range("exitPeriodYears", request.exit_period_years, 0.0, 10.0)?;
    ensure_range("redemptionPercentage", request.redemption_percentage, 0.0, 100.0)?;

    let i = periodic_rate(request.return_rate, 12);
    let window = (request.exit_period_years * 12.0).round() as u32;
    let share = request.redemption_percentage / 100.0;
    let load = request.exit_load_rate / 100.0;
    let rows = InstallmentLedger::new(request.return_rate, Frequency::Monthly, request.tenure_years)
        .run(|_| request.sip_amount);

    // charge if the whole plan were redeemed at the end of `months`
    let charge_at = |months: u32| {
        let young = request.sip_amount * annuity_due_factor(i, window.min(months));
        young * share * load
    };

    let yearly_breakdown = rows
        .iter()
        .map(|r| {
            let charge = charge_at(r.year * 12);
            ExitLoadYear {
                year: r.year,
                yearly_invested: round2(r.invested_this_year),
                cumulative_invested: round2(r.cumulative_invested),
                gross_value: round2(r.value),
                exit_load_charges: round2(charge),
                net_value: round2(r.value * share - charge),
            }
        })
        .collect();

    let (value, invested) = rows
        .last()
        .map(|r| (r.value, r.cumulative_invested))
        .unwrap_or_default();
    let charge = charge_at(request.tenure_years * 12);
    let final_amount = value * share - charge;

    Ok(SipExitLoadResult {
        total_invested: round2(invested),
        gross_value: round2(value),
        gross_returns: round2(value - invested),
        exit_load_charges: round2(charge),
        net_returns: round2(final_amount - invested * share),
        final_amount: round2(final_amount),
        yearly_breakdown,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentMode {
    #[default]
    #[serde(alias = "lump_sum")]
    Lumpsum,
    Sip,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRatioRequest {
    /// Lump sum, or the monthly installment for a SIP
    pub investment_amount: f64,
    #[serde(default)]
    pub investment_type: InvestmentMode,
    pub expected_return: f64,
    /// Annual fund expenses in percent
    pub expense_ratio: f64,
    /// Years
    pub investment_period: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseYear {
    pub year: u32,
    pub total_investment: f64,
    pub gross_value: f64,
    pub net_value: f64,
    /// Value lost to expenses so far
    pub expense_cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRatioResult {
    pub total_invested: f64,
    pub gross_maturity_amount: f64,
    pub net_maturity_amount: f64,
    pub final_amount: f64,
    pub gross_returns: f64,
    pub net_returns: f64,
    pub expense_impact: f64,
    pub total_expense_cost: f64,
    pub annual_expense_cost: f64,
    pub yearly_breakdown: Vec<ExpenseYear>,
}

/// Gross and net-of-expense growth side by side; the fund earns
/// `expected_return − expense_ratio`
pub fn calculate_expense_ratio(request: &ExpenseRatioRequest) -> CalcResult<ExpenseRatioResult> {
    ensure_positive("investmentAmount", request.investment_amount)?;
    ensure_range("expectedReturn", request.expected_return, 0.0, 50.0)?;
    ensure_range("expenseRatio", request.expense_ratio, 0.0, 5.0)?;
    ensure_range("investmentPeriod", request.investment_period as f64, 1.0, 50.0)?;

    let years = request.investment_period;
    let net_rate = request.expected_return - request.expense_ratio;
    let amount = request.investment_amount;

    let ledger: Vec<(u32, f64, f64, f64)> = match request.investment_type {
        InvestmentMode::Lumpsum => (1..=years)
            .map(|y| {
                let gross = amount * (1.0 + request.expected_return / 100.0).powi(y as i32);
                let net = amount * (1.0 + net_rate / 100.0).powi(y as i32);
                (y, amount, gross, net)
            })
            .collect(),
        InvestmentMode::Sip => {
            let gross = InstallmentLedger::new(request.expected_return, Frequency::Monthly, years).run(|_| amount);
            let net = InstallmentLedger::new(net_rate, Frequency::Monthly, years).run(|_| amount);
            gross
                .iter()
                .zip(&net)
                .map(|(g, n)| (g.year, g.cumulative_invested, g.value, n.value))
                .collect()
        }
    };

    let (invested, gross, net) = ledger
        .last()
        .map(|&(_, i, g, n)| (i, g, n))
        .unwrap_or_default();
    let yearly_breakdown = ledger
        .iter()
        .map(|&(year, invested, gross, net)| ExpenseYear {
            year,
            total_investment: round2(invested),
            gross_value: round2(gross),
            net_value: round2(net),
            expense_cost: round2(gross - net),
        })
        .collect();

    Ok(ExpenseRatioResult {
        total_invested: round2(invested),
        gross_maturity_amount: round2(gross),
        net_maturity_amount: round2(net),
        final_amount: round2(net),
        gross_returns: round2(gross - invested),
        net_returns: round2(net - invested),
        expense_impact: round2(gross - net),
        total_expense_cost: round2(gross - net),
        annual_expense_cost: round2((gross - net) / years as f64),
        yearly_breakdown,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SipExpenseRequest {
    pub sip_amount: f64,
    pub return_rate: f64,
    pub tenure_years: u32,
    pub expense_ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipExpenseYear {
    pub year: u32,
    pub yearly_invested: f64,
    pub cumulative_invested: f64,
    pub gross_value: f64,
    pub expense_charges: f64,
    pub net_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SipExpenseResult {
    pub total_invested: f64,
    pub gross_returns: f64,
    pub expense_impact: f64,
    pub net_returns: f64,
    pub final_amount: f64,
    pub yearly_breakdown: Vec<SipExpenseYear>,
}

/// Monthly SIP whose fund deducts the expense ratio once a year on the
/// average of the opening and closing corpus
pub fn calculate_sip_with_expense_ratio(request: &SipExpenseRequest) -> CalcResult<SipExpenseResult> {
    ensure_positive("sipAmount", request.sip_amount)?;
    ensure_range("returnRate", request.return_rate, 0.0, 50.0)?;
    ensure_range("tenureYears", request.tenure_years as f64, 1.0, 50.0)?;
    ensure_range("expenseRatio", request.expense_ratio, 0.0, 5.0)?;

    let growth = 1.0 + periodic_rate(request.return_rate, 12);
    let er = request.expense_ratio / 100.0;
    let mut gross = 0.0;
    let mut net = 0.0;
    let mut invested = 0.0;
    let mut charges = 0.0;
    let mut yearly_breakdown = Vec::with_capacity(request.tenure_years as usize);

    for year in 1..=request.tenure_years {
        let opening = net;
        for _ in 0..12 {
            gross = (gross + request.sip_amount) * growth;
            net = (net + request.sip_amount) * growth;
        }
        invested += request.sip_amount * 12.0;
        let charge = (opening + net) / 2.0 * er;
        net -= charge;
        charges += charge;
        yearly_breakdown.push(SipExpenseYear {
            year,
            yearly_invested: round2(request.sip_amount * 12.0),
            cumulative_invested: round2(invested),
            gross_value: round2(gross),
            expense_charges: round2(charge),
            net_value: round2(net),
        });
    }
    log::debug!("sip with expense ratio: {:.2} paid in charges", charges);

    Ok(SipExpenseResult {
        total_invested: round2(invested),
        gross_returns: round2(gross - invested),
        expense_impact: round2(gross - net),
        net_returns: round2(net - invested),
        final_amount: round2(net),
        yearly_breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sip::sip_future_value;
    use approx::assert_abs_diff_eq;

    fn exit_load(holding: Option<f64>) -> ExitLoadRequest {
        ExitLoadRequest {
            investment_amount: 100_000.0,
            exit_load_rate: 1.0,
            redemption_amount: None,
            exit_load_period: 365.0,
            purchase_nav: 20.0,
            current_nav: 25.0,
            holding_period_days: holding,
        }
    }

    #[test]
    fn test_exit_load_inside_window() {
        let r = calculate_exit_load(&exit_load(Some(200.0))).unwrap();
        assert_eq!(r.units_held, 5_000.0);
        assert_eq!(r.current_value, 125_000.0);
        assert_eq!(r.total_gain_loss, 25_000.0);
        assert_eq!(r.gains_earned, 25_000.0);
        assert!(r.exit_load_applicable);
        assert_eq!(r.exit_load_charge, 1_250.0);
        assert_eq!(r.net_redemption_amount, 123_750.0);
    }

    #[test]
    fn test_exit_load_after_window() {
        let r = calculate_exit_load(&exit_load(Some(400.0))).unwrap();
        assert!(!r.exit_load_applicable);
        assert_eq!(r.exit_load_charge, 0.0);

        let r = calculate_exit_load(&exit_load(None)).unwrap();
        assert!(r.exit_load_applicable);
    }

    #[test]
    fn test_partial_redemption_and_overdraw() {
        let mut req = exit_load(None);
        req.redemption_amount = Some(50_000.0);
        let r = calculate_exit_load(&req).unwrap();
        assert_eq!(r.exit_load_charge, 500.0);
        assert_eq!(r.gains_earned, 10_000.0);

        req.redemption_amount = Some(200_000.0);
        assert!(calculate_exit_load(&req).unwrap_err().is_client_error());
    }

    #[test]
    fn test_sip_exit_load_hits_recent_installments() {
        let req: SipExitLoadRequest = serde_json::from_str(
            r#"{"sipAmount": 10000, "returnRate": 12, "tenureYears": 5, "exitLoadRate": 1, "exitPeriodYears": 1}"#,
        )
        .unwrap();
        let r = calculate_sip_exit_load(&req).unwrap();
        let young = 10_000.0 * annuity_due_factor(0.01, 12);
        assert_abs_diff_eq!(r.exit_load_charges, young * 0.01, epsilon = 0.01);
        let gross = sip_future_value(10_000.0, 12.0, Frequency::Monthly, 5);
        assert_abs_diff_eq!(r.final_amount, gross - young * 0.01, epsilon = 0.02);
        assert_eq!(r.total_invested, 600_000.0);
        assert_eq!(r.yearly_breakdown.len(), 5);
        // after one year every installment is still inside the window
        assert_abs_diff_eq!(
            r.yearly_breakdown[0].exit_load_charges,
            r.yearly_breakdown[0].gross_value * 0.01,
            epsilon = 0.01
        );
    }

    #[test]
    fn test_expense_ratio_lumpsum() {
        let req: ExpenseRatioRequest = serde_json::from_str(
            r#"{"investmentAmount": 100000, "investmentType": "lumpsum", "expectedReturn": 12,
                "expenseRatio": 2, "investmentPeriod": 10}"#,
        )
        .unwrap();
        let r = calculate_expense_ratio(&req).unwrap();
        assert_abs_diff_eq!(r.gross_maturity_amount, 100_000.0 * 1.12f64.powi(10), epsilon = 0.01);
        assert_abs_diff_eq!(r.net_maturity_amount, 100_000.0 * 1.10f64.powi(10), epsilon = 0.01);
        assert_eq!(r.total_invested, 100_000.0);
        assert!(r.expense_impact > 0.0);
        assert_eq!(r.yearly_breakdown[9].expense_cost, r.total_expense_cost);
    }

    #[test]
    fn test_expense_ratio_sip() {
        let req = ExpenseRatioRequest {
            investment_amount: 5_000.0,
            investment_type: InvestmentMode::Sip,
            expected_return: 12.0,
            expense_ratio: 1.0,
            investment_period: 10,
        };
        let r = calculate_expense_ratio(&req).unwrap();
        assert_eq!(r.total_invested, 600_000.0);
        let net = sip_future_value(5_000.0, 11.0, Frequency::Monthly, 10);
        assert_abs_diff_eq!(r.net_maturity_amount, net, epsilon = 0.01);
    }

    #[test]
    fn test_sip_expense_ratio_drag() {
        let req: SipExpenseRequest = serde_json::from_str(
            r#"{"sipAmount": 10000, "returnRate": 12, "tenureYears": 10, "expenseRatio": 1.5}"#,
        )
        .unwrap();
        let r = calculate_sip_with_expense_ratio(&req).unwrap();
        let gross = sip_future_value(10_000.0, 12.0, Frequency::Monthly, 10);
        assert_abs_diff_eq!(r.gross_returns + r.total_invested, gross, epsilon = 0.02);
        assert!(r.final_amount < gross);
        // first year's charge is on the average of 0 and the year-end corpus
        let first = &r.yearly_breakdown[0];
        assert_abs_diff_eq!(first.expense_charges, first.gross_value / 2.0 * 0.015, epsilon = 0.01);

        let free = SipExpenseRequest {
            expense_ratio: 0.0,
            ..req
        };
        let r = calculate_sip_with_expense_ratio(&free).unwrap();
        assert_eq!(r.expense_impact, 0.0);
    }
}
