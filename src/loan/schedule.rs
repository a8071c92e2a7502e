//! Amortization ledger output structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};
use crate::rates::round2;

const LEDGER_TOLERANCE: f64 = 1e-6;

/// A single installment of the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub period: u32,
    pub date: NaiveDate,
    /// Calendar label, e.g. "Jan 2025"
    pub label: String,
    pub opening_balance: f64,
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,
    pub closing_balance: f64,
    pub loan_paid_percentage: f64,
}

/// One calendar year of installments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearlySummary {
    pub year: i32,
    pub principal: f64,
    pub interest: f64,
    pub total_payment: f64,
    pub opening_balance: f64,
    /// Balance after the year's last installment
    pub balance: f64,
    pub loan_paid_percentage: f64,
    pub months: Vec<AmortizationRow>,
}

/// Complete amortization result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub principal: f64,

    /// Level installment (the final one may be smaller)
    pub emi: f64,

    pub rows: Vec<AmortizationRow>,
}

impl AmortizationSchedule {
    pub fn new(principal: f64, emi: f64) -> Self {
        Self {
            principal,
            emi,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: AmortizationRow) {
        self.rows.push(row);
    }

    pub fn months(&self) -> u32 {
        self.rows.len() as u32
    }

    pub fn total_interest(&self) -> f64 {
        self.rows.iter().map(|r| r.interest).sum()
    }

    pub fn total_payment(&self) -> f64 {
        self.rows.iter().map(|r| r.payment).sum()
    }

    /// Group installments by calendar year
    ///
    /// The first year starts at the loan's start month and may be partial.
    pub fn yearly(&self) -> Vec<YearlySummary> {
        let mut years: Vec<YearlySummary> = Vec::new();

        for row in &self.rows {
            let year = chrono::Datelike::year(&row.date);
            match years.last_mut() {
                Some(current) if current.year == year => {
                    current.principal += row.principal;
                    current.interest += row.interest;
                    current.total_payment += row.payment;
                    current.balance = row.closing_balance;
                    current.loan_paid_percentage = row.loan_paid_percentage;
                    current.months.push(row.clone());
                }
                _ => years.push(YearlySummary {
                    year,
                    principal: row.principal,
                    interest: row.interest,
                    total_payment: row.payment,
                    opening_balance: row.opening_balance,
                    balance: row.closing_balance,
                    loan_paid_percentage: row.loan_paid_percentage,
                    months: vec![row.clone()],
                }),
            }
        }

        years
    }

    /// Check the ledger invariants: rows chain, balances never go negative,
    /// the loan closes at exactly zero and principal repaid equals the loan
    pub fn verify(&self) -> CalcResult<()> {
        let tol = LEDGER_TOLERANCE * self.principal.max(1.0);
        let mut expected_opening = self.principal;

        for row in &self.rows {
            if (row.opening_balance - expected_opening).abs() > tol {
                return Err(CalcError::NoSolution(format!(
                    "period {} opens at {} but previous closed at {}",
                    row.period, row.opening_balance, expected_opening
                )));
            }
            if (row.opening_balance - row.principal - row.closing_balance).abs() > tol {
                return Err(CalcError::NoSolution(format!("period {} does not balance", row.period)));
            }
            if (row.interest + row.principal - row.payment).abs() > tol {
                return Err(CalcError::NoSolution(format!(
                    "period {} payment does not split into interest and principal",
                    row.period
                )));
            }
            if row.closing_balance < -tol {
                return Err(CalcError::NoSolution(format!("period {} overpays the loan", row.period)));
            }
            expected_opening = row.closing_balance;
        }

        if let Some(last) = self.rows.last() {
            if last.closing_balance != 0.0 {
                return Err(CalcError::NoSolution(format!(
                    "ledger closes at {} instead of zero",
                    last.closing_balance
                )));
            }
        }

        let repaid: f64 = self.rows.iter().map(|r| r.principal).sum();
        if (repaid - self.principal).abs() > tol {
            return Err(CalcError::NoSolution(format!(
                "principal repaid {} differs from loan {}",
                repaid, self.principal
            )));
        }

        Ok(())
    }

    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary {
            months: self.months(),
            emi: self.emi,
            total_interest: self.total_interest(),
            total_payment: self.total_payment(),
            final_payment: self.rows.last().map(|r| r.payment).unwrap_or(0.0),
        }
    }

    /// Yearly groups in the wire shape shared by the loan calculators
    pub fn yearly_payment_rows(&self) -> Vec<YearlyPaymentRow> {
        self.yearly().iter().map(YearlyPaymentRow::from).collect()
    }
}

/// Summary statistics for a schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub months: u32,
    pub emi: f64,
    pub total_interest: f64,
    pub total_payment: f64,
    pub final_payment: f64,
}

/// Month entry of `yearlyPaymentSchedule`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyPaymentRow {
    pub month: String,
    pub principal: f64,
    pub interest: f64,
    pub total_payment: f64,
    pub balance: f64,
    pub loan_paid_percentage: f64,
}

/// Year entry of `yearlyPaymentSchedule`, rounded for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearlyPaymentRow {
    pub year: i32,
    pub principal: f64,
    pub interest: f64,
    pub total_payment: f64,
    pub balance: f64,
    pub loan_paid_percentage: f64,
    pub monthly_data: Vec<MonthlyPaymentRow>,
}

impl From<&YearlySummary> for YearlyPaymentRow {
    fn from(y: &YearlySummary) -> Self {
        Self {
            year: y.year,
            principal: round2(y.principal),
            interest: round2(y.interest),
            total_payment: round2(y.total_payment),
            balance: round2(y.balance),
            loan_paid_percentage: round2(y.loan_paid_percentage),
            monthly_data: y
                .months
                .iter()
                .map(|m| MonthlyPaymentRow {
                    month: m.label.clone(),
                    principal: round2(m.principal),
                    interest: round2(m.interest),
                    total_payment: round2(m.payment),
                    balance: round2(m.closing_balance),
                    loan_paid_percentage: round2(m.loan_paid_percentage),
                })
                .collect(),
        }
    }
}
