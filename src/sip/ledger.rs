//! Period-by-period ledger shared by the installment calculators

use crate::rates::Frequency;

/// Balance of an installment plan at the end of one plan year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerYear {
    pub year: u32,
    pub installment: f64,
    pub invested_this_year: f64,
    pub cumulative_invested: f64,
    pub value: f64,
    /// Growth credited during the year
    pub returns_this_year: f64,
}

/// Installment-plan simulator
///
/// Each installment is paid at the start of its period and the whole balance
/// then grows by one periodic rate (annuity due).
#[derive(Debug, Clone)]
pub struct InstallmentLedger {
    frequency: Frequency,
    periodic_rate: f64,
    years: u32,
    skip_periods: u32,
}

impl InstallmentLedger {
    pub fn new(annual_rate_pct: f64, frequency: Frequency, years: u32) -> Self {
        InstallmentLedger {
            frequency,
            periodic_rate: crate::rates::periodic_rate(annual_rate_pct, frequency.periods_per_year()),
            years,
            skip_periods: 0,
        }
    }

    /// Leave the first `periods` installments unpaid
    pub fn skipping(mut self, periods: u32) -> Self {
        self.skip_periods = periods;
        self
    }

    pub fn periods(&self) -> u32 {
        self.years * self.frequency.periods_per_year()
    }

    /// Run the ledger; `installment(year)` gives the amount paid each period of that year
    pub fn run(&self, installment: impl Fn(u32) -> f64) -> Vec<LedgerYear> {
        let per_year = self.frequency.periods_per_year();
        let mut rows = Vec::with_capacity(self.years as usize);
        let mut balance = 0.0;
        let mut invested = 0.0;
        let mut period = 0;

        for year in 1..=self.years {
            let amount = installment(year);
            let opening = balance;
            let mut paid = 0.0;
            for _ in 0..per_year {
                period += 1;
                if period > self.skip_periods {
                    balance += amount;
                    paid += amount;
                }
                balance *= 1.0 + self.periodic_rate;
            }
            invested += paid;
            rows.push(LedgerYear {
                year,
                installment: amount,
                invested_this_year: paid,
                cumulative_invested: invested,
                value: balance,
                returns_this_year: balance - opening - paid,
            });
        }
        log::debug!(
            "installment ledger: {} periods, final value {:.2}",
            period,
            balance
        );
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::annuity_due_factor;
    use approx::assert_relative_eq;

    #[test]
    fn test_flat_ledger_matches_annuity_due() {
        let rows = InstallmentLedger::new(12.0, Frequency::Monthly, 10).run(|_| 5_000.0);
        assert_eq!(rows.len(), 10);
        let last = rows.last().unwrap();
        assert_relative_eq!(last.value, 5_000.0 * annuity_due_factor(0.01, 120), max_relative = 1e-12);
        assert_eq!(last.cumulative_invested, 600_000.0);
    }

    #[test]
    fn test_yearly_returns_sum_to_total_gain() {
        let rows = InstallmentLedger::new(10.0, Frequency::Quarterly, 5).run(|y| 1_000.0 * y as f64);
        let gain: f64 = rows.iter().map(|r| r.returns_this_year).sum();
        let last = rows.last().unwrap();
        assert_relative_eq!(gain, last.value - last.cumulative_invested, epsilon = 1e-6);
    }

    #[test]
    fn test_skipped_periods_are_not_invested() {
        let ledger = InstallmentLedger::new(12.0, Frequency::Monthly, 2).skipping(6);
        let rows = ledger.run(|_| 1_000.0);
        assert_eq!(rows[0].invested_this_year, 6_000.0);
        assert_relative_eq!(rows[1].value, 1_000.0 * annuity_due_factor(0.01, 18), max_relative = 1e-12);
    }
}
