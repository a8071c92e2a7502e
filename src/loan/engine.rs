//! EMI calculation and amortization ledger construction

use chrono::{Datelike, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};

use super::schedule::{AmortizationRow, AmortizationSchedule, YearlyPaymentRow};
use super::state::LoanState;
use crate::error::{ensure_positive, ensure_range, CalcError, CalcResult};
use crate::rates::{current_month_start, periodic_rate, round2};

/// Longest tenure the calculators accept
pub const MAX_TENURE_MONTHS: u32 = 360;

/// When each installment falls relative to its month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmiTiming {
    /// Paid at the end of each month
    #[default]
    Arrears,
    /// First installment at disbursement; no interest accrues on it
    Advance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LoanType {
    #[default]
    Home,
    Personal,
    Car,
}

impl LoanType {
    pub fn max_amount(&self) -> f64 {
        match self {
            LoanType::Home => 20_000_000.0,
            LoanType::Personal | LoanType::Car => 5_000_000.0,
        }
    }

    /// Advance EMI is only offered on vehicle loans
    pub fn allows_advance(&self) -> bool {
        matches!(self, LoanType::Car)
    }
}

/// Monthly installment for a level-payment loan
///
/// Arrears: `P·r·(1+r)^n / ((1+r)^n − 1)`. Advance divides that by `(1+r)`.
/// A zero rate spreads the principal evenly.
pub fn emi(principal: f64, annual_rate_pct: f64, months: u32, timing: EmiTiming) -> f64 {
    if months == 0 {
        return 0.0;
    }
    let r = periodic_rate(annual_rate_pct, 12);
    if r.abs() < 1e-12 {
        return principal / months as f64;
    }
    let growth = (1.0 + r).powi(months as i32);
    let arrears = principal * r * growth / (growth - 1.0);
    match timing {
        EmiTiming::Arrears => arrears,
        EmiTiming::Advance => arrears / (1.0 + r),
    }
}

/// Contractual terms of a loan
#[derive(Debug, Clone)]
pub struct LoanTerms {
    pub principal: f64,
    /// Annual nominal rate in percent
    pub annual_rate_pct: f64,
    pub tenure_months: u32,
    pub timing: EmiTiming,
    /// Month of the first installment
    pub start: NaiveDate,
}

impl LoanTerms {
    pub fn new(principal: f64, annual_rate_pct: f64, tenure_months: u32) -> Self {
        Self {
            principal,
            annual_rate_pct,
            tenure_months,
            timing: EmiTiming::Arrears,
            start: current_month_start(),
        }
    }

    pub fn with_timing(mut self, timing: EmiTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn starting(mut self, start: NaiveDate) -> Self {
        self.start = start;
        self
    }
}

pub(crate) fn month_start(year: i32, month: u32) -> CalcResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| CalcError::invalid("startMonth", format!("{}-{} is not a valid month", year, month)))
}

/// Builds the ledger for one set of loan terms
pub struct LoanEngine {
    terms: LoanTerms,
    payment: f64,
}

impl LoanEngine {
    /// Create an engine with the level EMI implied by the terms
    pub fn new(terms: LoanTerms) -> CalcResult<Self> {
        ensure_positive("principal", terms.principal)?;
        ensure_range("annual_rate_pct", terms.annual_rate_pct, 0.0, 100.0)?;
        if terms.tenure_months == 0 || terms.tenure_months > MAX_TENURE_MONTHS {
            return Err(CalcError::invalid(
                "tenure_months",
                format!("must be between 1 and {}, got {}", MAX_TENURE_MONTHS, terms.tenure_months),
            ));
        }
        let payment = emi(terms.principal, terms.annual_rate_pct, terms.tenure_months, terms.timing);
        Ok(Self { terms, payment })
    }

    /// Create an engine that pays a fixed installment for `terms.tenure_months`
    /// (the last installment settles whatever remains)
    pub fn with_payment(terms: LoanTerms, payment: f64) -> CalcResult<Self> {
        let mut engine = Self::new(terms)?;
        ensure_positive("emi", payment)?;
        engine.payment = payment;
        Ok(engine)
    }

    pub fn terms(&self) -> &LoanTerms {
        &self.terms
    }

    pub fn emi(&self) -> f64 {
        self.payment
    }

    /// Run the ledger month by month
    pub fn schedule(&self) -> AmortizationSchedule {
        let mut schedule = AmortizationSchedule::new(self.terms.principal, self.payment);
        let mut state = LoanState::from_terms(&self.terms);

        for _month in 1..=self.terms.tenure_months {
            state.advance_month();

            let row = self.calculate_month(&mut state);
            schedule.add_row(row);

            if state.is_settled() {
                break;
            }
        }

        debug!(
            "Built {}-month schedule: principal {:.2}, emi {:.2}, interest {:.2}",
            schedule.months(),
            self.terms.principal,
            self.payment,
            schedule.total_interest()
        );

        schedule
    }

    fn calculate_month(&self, state: &mut LoanState) -> AmortizationRow {
        let r = periodic_rate(self.terms.annual_rate_pct, 12);
        let opening = state.balance;

        let interest = if self.terms.timing == EmiTiming::Advance && state.period == 1 {
            0.0
        } else {
            opening * r
        };

        // The final installment clears the balance exactly
        let is_final = state.period == self.terms.tenure_months || self.payment >= opening + interest;
        let (payment, principal) = if is_final {
            (opening + interest, opening)
        } else {
            (self.payment, self.payment - interest)
        };

        state.apply_payment(interest, principal);
        let closing = if is_final { 0.0 } else { state.balance };
        if is_final {
            state.balance = 0.0;
        }

        AmortizationRow {
            period: state.period,
            date: state.date,
            label: state.date.format("%b %Y").to_string(),
            opening_balance: opening,
            payment,
            interest,
            principal,
            closing_balance: closing,
            loan_paid_percentage: state.paid_percentage(),
        }
    }
}

fn default_loan_amount() -> f64 {
    1_000_000.0
}

fn default_interest_rate() -> f64 {
    8.5
}

/// Input contract of the EMI calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiRequest {
    #[serde(default = "default_loan_amount")]
    pub loan_amount: f64,
    #[serde(default = "default_interest_rate")]
    pub interest_rate: f64,
    #[serde(default)]
    pub tenure_years: u32,
    #[serde(default)]
    pub tenure_months: u32,
    #[serde(default)]
    pub loan_type: LoanType,
    #[serde(default)]
    pub emi_advance: bool,
    #[serde(default)]
    pub start_year: Option<i32>,
    #[serde(default)]
    pub start_month: Option<u32>,
}

/// Output contract of the EMI calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiResponse {
    pub emi: f64,
    pub total_interest: f64,
    pub total_amount: f64,
    pub loan_amount: f64,
    pub yearly_payment_schedule: Vec<YearlyPaymentRow>,
}

/// Years plus months as a month count within `1..=MAX_TENURE_MONTHS`
pub fn tenure_months(years: u32, months: u32) -> CalcResult<u32> {
    let total = years.checked_mul(12).and_then(|m| m.checked_add(months));
    match total {
        Some(total) if total > 0 && total <= MAX_TENURE_MONTHS => Ok(total),
        _ => Err(CalcError::invalid(
            "tenure",
            format!(
                "must be between 1 and {} months, got {} years {} months",
                MAX_TENURE_MONTHS, years, months
            ),
        )),
    }
}

impl EmiRequest {
    pub fn total_months(&self) -> CalcResult<u32> {
        tenure_months(self.tenure_years, self.tenure_months)
    }

    fn start(&self) -> CalcResult<NaiveDate> {
        let now = current_month_start();
        month_start(
            self.start_year.unwrap_or_else(|| now.year()),
            self.start_month.unwrap_or_else(|| now.month()),
        )
    }

    pub fn to_terms(&self) -> CalcResult<LoanTerms> {
        ensure_positive("loanAmount", self.loan_amount)?;
        if self.loan_amount > self.loan_type.max_amount() {
            return Err(CalcError::invalid(
                "loanAmount",
                format!("{:?} loans are limited to {}", self.loan_type, self.loan_type.max_amount()),
            ));
        }
        ensure_positive("interestRate", self.interest_rate)?;
        let months = self.total_months()?;
        // Only car loans offer advance EMI; the flag is ignored for the others
        let timing = if self.emi_advance && self.loan_type.allows_advance() {
            EmiTiming::Advance
        } else {
            EmiTiming::Arrears
        };

        Ok(LoanTerms::new(self.loan_amount, self.interest_rate, months)
            .with_timing(timing)
            .starting(self.start()?))
    }
}

/// EMI, totals and the yearly ledger for a loan request
pub fn calculate_emi(request: &EmiRequest) -> CalcResult<EmiResponse> {
    let engine = LoanEngine::new(request.to_terms()?)?;
    let schedule = engine.schedule();

    Ok(EmiResponse {
        emi: round2(engine.emi()),
        total_interest: round2(schedule.total_interest()),
        total_amount: round2(schedule.total_payment()),
        loan_amount: round2(request.loan_amount),
        yearly_payment_schedule: schedule.yearly_payment_rows(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn jan_2025() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    #[test]
    fn test_emi_known_value() {
        // 10 lakh at 8.5% over 20 years
        let e = emi(1_000_000.0, 8.5, 240, EmiTiming::Arrears);
        assert!((e - 8678.23).abs() < 0.01, "Expected ~8678.23, got {}", e);
    }

    #[test]
    fn test_zero_rate_emi() {
        assert_eq!(emi(120_000.0, 0.0, 12, EmiTiming::Arrears), 10_000.0);
        assert_eq!(emi(120_000.0, 0.0, 12, EmiTiming::Advance), 10_000.0);
    }

    #[test]
    fn test_advance_emi_is_discounted() {
        let arrears = emi(500_000.0, 12.0, 60, EmiTiming::Arrears);
        let advance = emi(500_000.0, 12.0, 60, EmiTiming::Advance);
        assert_relative_eq!(advance * 1.01, arrears, epsilon = 1e-9);
    }

    #[test]
    fn test_schedule_closes_at_zero() {
        let terms = LoanTerms::new(1_000_000.0, 8.5, 240).starting(jan_2025());
        let engine = LoanEngine::new(terms).unwrap();
        let schedule = engine.schedule();

        assert_eq!(schedule.months(), 240);
        assert_eq!(schedule.rows.last().unwrap().closing_balance, 0.0);
        assert!(schedule.verify().is_ok(), "{:?}", schedule.verify());

        let repaid: f64 = schedule.rows.iter().map(|r| r.principal).sum();
        assert!((repaid - 1_000_000.0).abs() < 1e-4);
        assert!((schedule.total_payment() - schedule.total_interest() - 1_000_000.0).abs() < 1e-4);
    }

    #[test]
    fn test_advance_schedule_first_month_interest_free() {
        let terms = LoanTerms::new(500_000.0, 10.0, 36)
            .with_timing(EmiTiming::Advance)
            .starting(jan_2025());
        let schedule = LoanEngine::new(terms).unwrap().schedule();

        assert_eq!(schedule.rows[0].interest, 0.0);
        assert_relative_eq!(schedule.rows[0].principal, schedule.emi, epsilon = 1e-9);
        assert_eq!(schedule.months(), 36);
        // Final installment is the level EMI up to float noise
        let last = schedule.rows.last().unwrap();
        assert!((last.payment - schedule.emi).abs() < 1e-6);
        assert!(schedule.verify().is_ok());
    }

    #[test]
    fn test_yearly_grouping_from_start_month() {
        let start = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        let terms = LoanTerms::new(100_000.0, 9.0, 12).starting(start);
        let schedule = LoanEngine::new(terms).unwrap().schedule();
        let years = schedule.yearly();

        assert_eq!(years.len(), 2);
        assert_eq!(years[0].year, 2025);
        assert_eq!(years[0].months.len(), 3);
        assert_eq!(years[0].months[0].label, "Oct 2025");
        assert_eq!(years[1].months.len(), 9);
        assert_eq!(years[1].balance, 0.0);
        assert!((years[1].loan_paid_percentage - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_request_validation() {
        let mut req: EmiRequest = serde_json::from_str(
            r#"{"loanAmount": 25000000, "interestRate": 8.5, "tenureYears": 20, "loanType": "home"}"#,
        )
        .unwrap();
        assert!(calculate_emi(&req).is_err(), "home loan above 2 crore must be rejected");

        req.loan_amount = 2_000_000.0;
        req.tenure_years = 0;
        assert!(calculate_emi(&req).is_err());

        req.tenure_years = 31;
        assert!(calculate_emi(&req).is_err());
    }

    #[test]
    fn test_advance_flag_only_applies_to_car_loans() {
        let mut req: EmiRequest = serde_json::from_str(
            r#"{"loanAmount": 500000, "interestRate": 10, "tenureYears": 3, "loanType": "home",
                "emiAdvance": true, "startYear": 2025, "startMonth": 1}"#,
        )
        .unwrap();
        let home = calculate_emi(&req).unwrap();
        assert_eq!(home.emi, round2(emi(500_000.0, 10.0, 36, EmiTiming::Arrears)));

        req.loan_type = LoanType::Car;
        let car = calculate_emi(&req).unwrap();
        assert_eq!(car.emi, round2(emi(500_000.0, 10.0, 36, EmiTiming::Advance)));
        assert!(car.emi < home.emi);
    }

    #[test]
    fn test_tenure_overflow_is_rejected() {
        assert_eq!(tenure_months(2, 6).unwrap(), 30);
        assert!(tenure_months(0, 0).is_err());
        assert!(tenure_months(30, 1).is_err());
        // 357913942 * 12 wraps to 8 in 32 bits
        assert!(tenure_months(357_913_942, 0).is_err());
        assert!(tenure_months(u32::MAX, u32::MAX).is_err());

        let req: EmiRequest =
            serde_json::from_str(r#"{"loanAmount": 100000, "interestRate": 10, "tenureYears": 400000000}"#).unwrap();
        let err = calculate_emi(&req).unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_calculate_emi_response() {
        let req: EmiRequest = serde_json::from_str(
            r#"{"loanAmount": 1000000, "interestRate": 8.5, "tenureYears": 20, "tenureMonths": 0,
                "loanType": "home", "emiAdvance": false, "startYear": 2025, "startMonth": 1}"#,
        )
        .unwrap();
        let resp = calculate_emi(&req).unwrap();

        assert_eq!(resp.emi, 8678.23);
        assert_eq!(resp.yearly_payment_schedule.len(), 20);
        assert_eq!(resp.yearly_payment_schedule[0].monthly_data.len(), 12);
        assert_eq!(resp.yearly_payment_schedule[19].balance, 0.0);
        assert!((resp.total_amount - resp.total_interest - 1_000_000.0).abs() < 0.02);
    }
}
