//! Employees' Provident Fund accumulation

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_range, CalcResult};
use crate::rates::round2;

/// Share of wages the employer routes to the pension scheme
pub const EPS_RATE: f64 = 0.0833;
/// Monthly wage ceiling for the pension contribution
pub const EPS_WAGE_CEILING: f64 = 15_000.0;

fn default_contribution_pct() -> f64 {
    12.0
}

fn default_epf_rate() -> f64 {
    8.25
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpfRequest {
    /// Monthly basic salary plus dearness allowance
    pub basic_salary: f64,
    #[serde(default = "default_contribution_pct")]
    pub employee_contribution: f64,
    #[serde(default = "default_contribution_pct")]
    pub employer_contribution: f64,
    #[serde(default = "default_epf_rate")]
    pub interest_rate: f64,
    pub years_of_service: u32,
    #[serde(default)]
    pub salary_increase: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpfYear {
    pub year: u32,
    pub basic_salary: f64,
    pub employee_contribution: f64,
    /// Employer share credited to EPF after the pension split
    pub employer_contribution: f64,
    pub eps_contribution: f64,
    pub interest_earned: f64,
    pub total_balance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpfResult {
    pub total_employee_contribution: f64,
    pub total_employer_contribution: f64,
    pub total_eps_contribution: f64,
    pub total_interest: f64,
    pub total_corpus: f64,
    pub yearly_breakdown: Vec<EpfYear>,
}

/// Monthly split of a salary into (employee EPF, employer EPF, employer EPS)
pub fn monthly_split(basic: f64, employee_pct: f64, employer_pct: f64) -> (f64, f64, f64) {
    let employee = basic * employee_pct / 100.0;
    let eps = (basic.min(EPS_WAGE_CEILING) * EPS_RATE).min(basic * employer_pct / 100.0);
    let employer = basic * employer_pct / 100.0 - eps;
    (employee, employer, eps)
}

/// Contributions land monthly; interest runs on the monthly balance and is credited at year end
pub fn calculate_epf(request: &EpfRequest) -> CalcResult<EpfResult> {
    ensure_non_negative("basic_salary", request.basic_salary)?;
    ensure_range("employee_contribution", request.employee_contribution, 0.0, 100.0)?;
    ensure_range("employer_contribution", request.employer_contribution, 0.0, 100.0)?;
    ensure_range("interest_rate", request.interest_rate, 0.0, 20.0)?;
    ensure_range("years_of_service", request.years_of_service as f64, 1.0, 60.0)?;
    ensure_range("salary_increase", request.salary_increase, 0.0, 50.0)?;

    let monthly_rate = request.interest_rate / 100.0 / 12.0;
    let mut basic = request.basic_salary;
    let mut balance = 0.0;
    let (mut total_employee, mut total_employer, mut total_eps, mut total_interest) = (0.0, 0.0, 0.0, 0.0);
    let mut yearly_breakdown = Vec::with_capacity(request.years_of_service as usize);

    for year in 1..=request.years_of_service {
        let (employee, employer, eps) =
            monthly_split(basic, request.employee_contribution, request.employer_contribution);
        let mut interest = 0.0;
        for _ in 0..12 {
            balance += employee + employer;
            interest += balance * monthly_rate;
        }
        balance += interest;

        total_employee += employee * 12.0;
        total_employer += employer * 12.0;
        total_eps += eps * 12.0;
        total_interest += interest;
        yearly_breakdown.push(EpfYear {
            year,
            basic_salary: round2(basic),
            employee_contribution: round2(employee * 12.0),
            employer_contribution: round2(employer * 12.0),
            eps_contribution: round2(eps * 12.0),
            interest_earned: round2(interest),
            total_balance: round2(balance),
        });
        basic *= 1.0 + request.salary_increase / 100.0;
    }

    Ok(EpfResult {
        total_employee_contribution: round2(total_employee),
        total_employer_contribution: round2(total_employer),
        total_eps_contribution: round2(total_eps),
        total_interest: round2(total_interest),
        total_corpus: round2(balance),
        yearly_breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eps_split_caps_at_ceiling() {
        let (employee, employer, eps) = monthly_split(50_000.0, 12.0, 12.0);
        assert_eq!(employee, 6_000.0);
        assert!((eps - 1_249.5).abs() < 1e-9);
        assert!((employer - 4_750.5).abs() < 1e-9);

        let (_, employer, eps) = monthly_split(10_000.0, 12.0, 12.0);
        assert!((eps - 833.0).abs() < 1e-9);
        assert!((employer - 367.0).abs() < 1e-9);
    }

    #[test]
    fn test_epf_first_year() {
        let r = calculate_epf(&EpfRequest {
            basic_salary: 50_000.0,
            employee_contribution: 12.0,
            employer_contribution: 12.0,
            interest_rate: 8.25,
            years_of_service: 1,
            salary_increase: 0.0,
        })
        .unwrap();
        let monthly = 6_000.0 + 4_750.5;
        let interest = monthly * 78.0 * 0.0825 / 12.0;
        assert!((r.total_interest - interest).abs() < 0.01);
        assert!((r.total_corpus - (monthly * 12.0 + interest)).abs() < 0.01);
        assert_eq!(r.total_eps_contribution, 14_994.0);
    }

    #[test]
    fn test_epf_salary_growth() {
        let r = calculate_epf(&EpfRequest {
            basic_salary: 30_000.0,
            employee_contribution: 12.0,
            employer_contribution: 12.0,
            interest_rate: 8.25,
            years_of_service: 3,
            salary_increase: 10.0,
        })
        .unwrap();
        assert_eq!(r.yearly_breakdown[2].basic_salary, 36_300.0);
        assert!(r.yearly_breakdown[2].total_balance > r.yearly_breakdown[1].total_balance);
    }
}
