//! Running state of a loan while its ledger is built

use chrono::{Datelike, Months, NaiveDate};

use super::engine::LoanTerms;

/// Position of a loan at a point in its amortization
#[derive(Debug, Clone)]
pub struct LoanState {
    /// Current installment number (1-indexed, 0 before the first)
    pub period: u32,

    /// Calendar month of the current installment (first of the month)
    pub date: NaiveDate,

    /// Outstanding balance after the last applied installment
    pub balance: f64,

    /// Cumulative principal repaid
    pub principal_paid: f64,

    /// Cumulative interest paid
    pub interest_paid: f64,

    start: NaiveDate,
    original_principal: f64,
}

impl LoanState {
    /// Initialize state at disbursement
    pub fn from_terms(terms: &LoanTerms) -> Self {
        let start = terms.start.with_day(1).unwrap_or(terms.start);
        Self {
            period: 0,
            date: start,
            balance: terms.principal,
            principal_paid: 0.0,
            interest_paid: 0.0,
            start,
            original_principal: terms.principal,
        }
    }

    /// Move to the next installment month
    pub fn advance_month(&mut self) {
        self.period += 1;
        self.date = self
            .start
            .checked_add_months(Months::new(self.period - 1))
            .unwrap_or(self.date);
    }

    /// Book an installment's split against the balance
    pub fn apply_payment(&mut self, interest: f64, principal: f64) {
        self.balance -= principal;
        self.principal_paid += principal;
        self.interest_paid += interest;
    }

    /// Share of the original principal repaid so far, in percent
    pub fn paid_percentage(&self) -> f64 {
        if self.original_principal <= 0.0 {
            100.0
        } else {
            self.principal_paid / self.original_principal * 100.0
        }
    }

    pub fn is_settled(&self) -> bool {
        self.balance.abs() < 1e-9
    }
}
