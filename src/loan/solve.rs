//! Inverse EMI problems: solve for the loan amount, tenure or rate

use log::debug;
use serde::{Deserialize, Serialize};

use super::engine::{tenure_months, EmiTiming, LoanEngine, LoanTerms, MAX_TENURE_MONTHS};
use super::schedule::YearlyPaymentRow;
use crate::error::{ensure_non_negative, ensure_positive, CalcError, CalcResult};
use crate::rates::{current_month_start, periodic_rate, round2};
use crate::returns::solve_periodic_rate;

/// Principal that a given EMI repays over `months`
pub fn loan_amount_for_emi(emi: f64, annual_rate_pct: f64, months: u32, timing: EmiTiming) -> f64 {
    let r = periodic_rate(annual_rate_pct, 12);
    if r.abs() < 1e-12 {
        return emi * months as f64;
    }
    let arrears = emi * (1.0 - (1.0 + r).powi(-(months as i32))) / r;
    match timing {
        EmiTiming::Arrears => arrears,
        EmiTiming::Advance => arrears * (1.0 + r),
    }
}

/// Whole months needed to repay `principal` at `emi`, rounded up
pub fn tenure_for_emi(principal: f64, emi: f64, annual_rate_pct: f64, timing: EmiTiming) -> CalcResult<u32> {
    ensure_positive("loanAmount", principal)?;
    ensure_positive("emi", emi)?;
    let r = periodic_rate(annual_rate_pct, 12);

    let exact = if r.abs() < 1e-12 {
        principal / emi
    } else {
        // Advance installments are discounted one period less
        let coverage = match timing {
            EmiTiming::Arrears => principal * r / emi,
            EmiTiming::Advance => principal * r / ((1.0 + r) * emi),
        };
        if coverage >= 1.0 {
            return Err(CalcError::NoSolution(format!(
                "EMI {:.2} does not cover the monthly interest on {:.2}",
                emi, principal
            )));
        }
        -(1.0 - coverage).ln() / (1.0 + r).ln()
    };

    let months = (exact - 1e-9).ceil().max(1.0);
    debug!("tenure for emi {:.2}: exact {:.6} months, rounded {}", emi, exact, months);
    Ok(months as u32)
}

/// Annual nominal rate (percent) at which `emi` repays `principal` in `months`
pub fn rate_for_emi(principal: f64, emi: f64, months: u32, timing: EmiTiming) -> CalcResult<f64> {
    ensure_positive("loanAmount", principal)?;
    ensure_positive("emi", emi)?;
    if months == 0 {
        return Err(CalcError::invalid("tenure", "must be at least one month"));
    }

    let total = emi * months as f64;
    if total < principal - 1e-6 {
        return Err(CalcError::NoSolution(format!(
            "total payments {:.2} are below the loan amount {:.2}",
            total, principal
        )));
    }
    if (total - principal).abs() <= 1e-6 {
        return Ok(0.0);
    }

    let cashflows: Vec<f64> = match timing {
        EmiTiming::Arrears => std::iter::once(principal)
            .chain(std::iter::repeat(-emi).take(months as usize))
            .collect(),
        EmiTiming::Advance => std::iter::once(principal - emi)
            .chain(std::iter::repeat(-emi).take(months as usize - 1))
            .collect(),
    };

    let periodic = solve_periodic_rate(&cashflows)
        .ok_or_else(|| CalcError::NoSolution("interest rate did not converge".into()))?;
    Ok(periodic * 12.0 * 100.0)
}

/// APR once upfront fees are netted off the disbursed amount
fn apr(principal: f64, fees: f64, emi: f64, months: u32, timing: EmiTiming) -> CalcResult<f64> {
    if fees <= 0.0 {
        return rate_for_emi(principal, emi, months, timing);
    }
    if fees >= principal {
        return Err(CalcError::invalid("feesCharges", "must be below the loan amount"));
    }
    rate_for_emi(principal - fees, emi, months, timing)
}

/// Input contract of the loan-amount calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanAmountRequest {
    pub emi: f64,
    pub interest_rate: f64,
    #[serde(default)]
    pub tenure_years: u32,
    #[serde(default)]
    pub tenure_months: u32,
    #[serde(default)]
    pub fees_charges: f64,
    #[serde(default)]
    pub emi_scheme: EmiTiming,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanAmountResponse {
    pub principal_amount: f64,
    pub loan_apr: f64,
    pub total_interest: f64,
    /// Principal, interest and fees together
    pub total_payment: f64,
    pub fees_charges: f64,
    pub emi: f64,
    pub payment_schedule: Vec<YearlyPaymentRow>,
}

pub fn calculate_loan_amount(request: &LoanAmountRequest) -> CalcResult<LoanAmountResponse> {
    ensure_positive("emi", request.emi)?;
    ensure_positive("interestRate", request.interest_rate)?;
    ensure_non_negative("feesCharges", request.fees_charges)?;
    let months = tenure_months(request.tenure_years, request.tenure_months)?;

    let principal = loan_amount_for_emi(request.emi, request.interest_rate, months, request.emi_scheme);
    let terms = LoanTerms::new(principal, request.interest_rate, months)
        .with_timing(request.emi_scheme)
        .starting(current_month_start());
    let schedule = LoanEngine::with_payment(terms, request.emi)?.schedule();
    let loan_apr = apr(principal, request.fees_charges, request.emi, months, request.emi_scheme)?;

    Ok(LoanAmountResponse {
        principal_amount: round2(principal),
        loan_apr: round2(loan_apr),
        total_interest: round2(schedule.total_interest()),
        total_payment: round2(principal + schedule.total_interest() + request.fees_charges),
        fees_charges: round2(request.fees_charges),
        emi: round2(request.emi),
        payment_schedule: schedule.yearly_payment_rows(),
    })
}

/// Input contract of the loan-tenure calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTenureRequest {
    pub loan_amount: f64,
    pub emi: f64,
    pub interest_rate: f64,
    #[serde(default)]
    pub fees_charges: f64,
    #[serde(default)]
    pub emi_scheme: EmiTiming,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTenureResponse {
    pub tenure_months: u32,
    pub tenure_years: u32,
    pub tenure_remaining_months: u32,
    pub loan_apr: f64,
    pub total_interest: f64,
    pub total_payment: f64,
    pub loan_amount: f64,
    pub emi: f64,
    /// Smaller last installment that settles the remainder
    pub final_payment: f64,
    pub fees_charges: f64,
    pub payment_schedule: Vec<YearlyPaymentRow>,
}

pub fn calculate_loan_tenure(request: &LoanTenureRequest) -> CalcResult<LoanTenureResponse> {
    ensure_positive("interestRate", request.interest_rate)?;
    ensure_non_negative("feesCharges", request.fees_charges)?;
    let months = tenure_for_emi(request.loan_amount, request.emi, request.interest_rate, request.emi_scheme)?;
    if months > MAX_TENURE_MONTHS {
        return Err(CalcError::NoSolution(format!(
            "repayment would take {} months, more than the {} month limit",
            months, MAX_TENURE_MONTHS
        )));
    }

    let terms = LoanTerms::new(request.loan_amount, request.interest_rate, months)
        .with_timing(request.emi_scheme)
        .starting(current_month_start());
    let schedule = LoanEngine::with_payment(terms, request.emi)?.schedule();
    let summary = schedule.summary();

    // The actual stream has a short final installment
    let mut flows = vec![request.loan_amount - request.fees_charges];
    let first_at_disbursement = request.emi_scheme == EmiTiming::Advance;
    for (i, row) in schedule.rows.iter().enumerate() {
        if i == 0 && first_at_disbursement {
            flows[0] -= row.payment;
        } else {
            flows.push(-row.payment);
        }
    }
    let loan_apr = solve_periodic_rate(&flows)
        .map(|r| r * 12.0 * 100.0)
        .ok_or_else(|| CalcError::NoSolution("APR did not converge".into()))?;

    Ok(LoanTenureResponse {
        tenure_months: months,
        tenure_years: months / 12,
        tenure_remaining_months: months % 12,
        loan_apr: round2(loan_apr),
        total_interest: round2(summary.total_interest),
        total_payment: round2(summary.total_payment + request.fees_charges),
        loan_amount: round2(request.loan_amount),
        emi: round2(request.emi),
        final_payment: round2(summary.final_payment),
        fees_charges: round2(request.fees_charges),
        payment_schedule: schedule.yearly_payment_rows(),
    })
}

/// Input contract of the interest-rate calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestRateRequest {
    pub loan_amount: f64,
    pub emi: f64,
    #[serde(default)]
    pub tenure_years: u32,
    #[serde(default)]
    pub tenure_months: u32,
    #[serde(default)]
    pub fees_charges: f64,
    #[serde(default)]
    pub emi_scheme: EmiTiming,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestRateResponse {
    pub interest_rate: f64,
    pub apr: f64,
    pub total_interest: f64,
    pub total_payment: f64,
    pub loan_amount: f64,
    pub emi: f64,
    pub fees_charges: f64,
    pub payment_schedule: Vec<YearlyPaymentRow>,
}

pub fn calculate_interest_rate(request: &InterestRateRequest) -> CalcResult<InterestRateResponse> {
    ensure_non_negative("feesCharges", request.fees_charges)?;
    let months = tenure_months(request.tenure_years, request.tenure_months)?;
    let rate = rate_for_emi(request.loan_amount, request.emi, months, request.emi_scheme)?;
    let loan_apr = apr(request.loan_amount, request.fees_charges, request.emi, months, request.emi_scheme)?;

    let terms = LoanTerms::new(request.loan_amount, rate, months)
        .with_timing(request.emi_scheme)
        .starting(current_month_start());
    let schedule = LoanEngine::with_payment(terms, request.emi)?.schedule();

    Ok(InterestRateResponse {
        interest_rate: round2(rate),
        apr: round2(loan_apr),
        total_interest: round2(schedule.total_interest()),
        total_payment: round2(schedule.total_payment() + request.fees_charges),
        loan_amount: round2(request.loan_amount),
        emi: round2(request.emi),
        fees_charges: round2(request.fees_charges),
        payment_schedule: schedule.yearly_payment_rows(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::emi;

    #[test]
    fn test_loan_amount_inverts_emi() {
        for timing in [EmiTiming::Arrears, EmiTiming::Advance] {
            let e = emi(750_000.0, 10.5, 84, timing);
            let p = loan_amount_for_emi(e, 10.5, 84, timing);
            assert!((p - 750_000.0).abs() < 1e-6, "{:?}: got {}", timing, p);
        }
    }

    #[test]
    fn test_solvers_reject_overflowing_tenure() {
        let amount: LoanAmountRequest =
            serde_json::from_str(r#"{"emi": 5000, "interestRate": 10, "tenureYears": 400000000}"#).unwrap();
        assert!(calculate_loan_amount(&amount).unwrap_err().is_client_error());

        let rate: InterestRateRequest =
            serde_json::from_str(r#"{"loanAmount": 100000, "emi": 5000, "tenureYears": 357913942}"#).unwrap();
        assert!(calculate_interest_rate(&rate).unwrap_err().is_client_error());
    }

    #[test]
    fn test_tenure_inverts_emi() {
        for timing in [EmiTiming::Arrears, EmiTiming::Advance] {
            let e = emi(1_000_000.0, 9.0, 120, timing);
            assert_eq!(tenure_for_emi(1_000_000.0, e, 9.0, timing).unwrap(), 120);
            // Slightly smaller EMI needs one more month
            assert_eq!(tenure_for_emi(1_000_000.0, e - 50.0, 9.0, timing).unwrap(), 121);
        }
    }

    #[test]
    fn test_tenure_rejects_emi_below_interest() {
        // Monthly interest on 10 lakh at 12% is 10,000
        let err = tenure_for_emi(1_000_000.0, 10_000.0, 12.0, EmiTiming::Arrears).unwrap_err();
        assert!(matches!(err, CalcError::NoSolution(_)));
    }

    #[test]
    fn test_rate_inverts_emi() {
        for timing in [EmiTiming::Arrears, EmiTiming::Advance] {
            let e = emi(1_000_000.0, 10.75, 60, timing);
            let rate = rate_for_emi(1_000_000.0, e, 60, timing).unwrap();
            assert!((rate - 10.75).abs() < 1e-6, "{:?}: got {}", timing, rate);
        }
    }

    #[test]
    fn test_rate_no_solution_when_underpaid() {
        let err = rate_for_emi(100_000.0, 1_000.0, 12, EmiTiming::Arrears).unwrap_err();
        assert!(matches!(err, CalcError::NoSolution(_)));
        assert_eq!(rate_for_emi(12_000.0, 1_000.0, 12, EmiTiming::Arrears).unwrap(), 0.0);
    }

    #[test]
    fn test_interest_rate_endpoint_apr_exceeds_rate_with_fees() {
        let req = InterestRateRequest {
            loan_amount: 1_000_000.0,
            emi: 21_617.95,
            tenure_years: 5,
            tenure_months: 0,
            fees_charges: 10_000.0,
            emi_scheme: EmiTiming::Arrears,
        };
        let resp = calculate_interest_rate(&req).unwrap();
        assert!((resp.interest_rate - 10.75).abs() < 0.01, "got {}", resp.interest_rate);
        assert!(resp.apr > resp.interest_rate);
    }

    #[test]
    fn test_loan_tenure_endpoint_short_final_payment() {
        let req = LoanTenureRequest {
            loan_amount: 1_000_000.0,
            emi: 21_000.0,
            interest_rate: 10.0,
            fees_charges: 0.0,
            emi_scheme: EmiTiming::Arrears,
        };
        let resp = calculate_loan_tenure(&req).unwrap();
        assert_eq!(resp.tenure_years * 12 + resp.tenure_remaining_months, resp.tenure_months);
        assert!(resp.final_payment <= 21_000.0);
        assert!((resp.loan_apr - 10.0).abs() < 0.01, "APR without fees equals the rate, got {}", resp.loan_apr);
        let last_year = resp.payment_schedule.last().unwrap();
        assert_eq!(last_year.balance, 0.0);
    }
}
