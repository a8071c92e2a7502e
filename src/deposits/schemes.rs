//! Government small-savings schemes: PPF, NSC, SCSS and POMIS

use serde::{Deserialize, Serialize};

use crate::error::{ensure_range, CalcError, CalcResult};
use crate::rates::{round2, Frequency};

pub const PPF_MIN_CONTRIBUTION: f64 = 500.0;
pub const PPF_MAX_CONTRIBUTION: f64 = 150_000.0;
pub const NSC_TENURE_YEARS: u32 = 5;
pub const SCSS_MAX_DEPOSIT: f64 = 3_000_000.0;
pub const POMIS_MAX_DEPOSIT: f64 = 900_000.0;
/// Section 80C ceiling that bounds NSC's deduction
const SECTION_80C_LIMIT: f64 = 150_000.0;

fn default_ppf_rate() -> f64 {
    7.1
}

fn default_ppf_frequency() -> Frequency {
    Frequency::Yearly
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PpfRequest {
    pub annual_contribution: f64,
    pub duration_years: u32,
    #[serde(default = "default_ppf_rate")]
    pub interest_rate: f64,
    #[serde(default = "default_ppf_frequency")]
    pub contribution_frequency: Frequency,
}

/// One PPF account year, reported in whole rupees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PpfYear {
    pub year: u32,
    pub opening_balance: f64,
    pub annual_contribution: f64,
    pub interest_earned: f64,
    pub closing_balance: f64,
    pub total_invested_till_date: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PpfResult {
    pub annual_contribution: f64,
    pub investment_duration: u32,
    pub interest_rate: f64,
    pub contribution_frequency: Frequency,
    pub total_investment: f64,
    pub total_interest: f64,
    pub maturity_value: f64,
    pub year_wise_data: Vec<PpfYear>,
}

/// Interest credited at year end on one PPF year
///
/// Yearly deposits land before the year starts earning. Monthly deposits
/// earn simple interest on the running monthly balance, credited in one go.
fn ppf_year_interest(opening: f64, contribution: f64, rate: f64, frequency: Frequency) -> f64 {
    match frequency {
        Frequency::Monthly => {
            let installment = contribution / 12.0;
            (1..=12)
                .map(|m| (opening + installment * m as f64) * rate / 12.0)
                .sum()
        }
        _ => (opening + contribution) * rate,
    }
}

pub fn calculate_ppf(request: &PpfRequest) -> CalcResult<PpfResult> {
    ensure_range(
        "annual_contribution",
        request.annual_contribution,
        PPF_MIN_CONTRIBUTION,
        PPF_MAX_CONTRIBUTION,
    )?;
    ensure_range("duration_years", request.duration_years as f64, 15.0, 50.0)?;
    ensure_range("interest_rate", request.interest_rate, 0.0, 20.0)?;
    if !matches!(request.contribution_frequency, Frequency::Monthly | Frequency::Yearly) {
        return Err(CalcError::invalid(
            "contribution_frequency",
            "PPF contributions are monthly or yearly",
        ));
    }

    let rate = request.interest_rate / 100.0;
    let contribution = request.annual_contribution;
    let mut balance = 0.0;
    let mut invested = 0.0;
    let mut year_wise_data = Vec::with_capacity(request.duration_years as usize);

    for year in 1..=request.duration_years {
        let opening = balance;
        let interest = ppf_year_interest(opening, contribution, rate, request.contribution_frequency);
        invested += contribution;
        balance = opening + contribution + interest;
        year_wise_data.push(PpfYear {
            year,
            opening_balance: opening.round(),
            annual_contribution: contribution,
            interest_earned: interest.round(),
            closing_balance: balance.round(),
            total_invested_till_date: invested.round(),
        });
    }
    log::debug!("ppf ledger: {} years, maturity {:.2}", request.duration_years, balance);

    Ok(PpfResult {
        annual_contribution: contribution,
        investment_duration: request.duration_years,
        interest_rate: request.interest_rate,
        contribution_frequency: request.contribution_frequency,
        total_investment: invested.round(),
        total_interest: (balance - invested).round(),
        maturity_value: balance.round(),
        year_wise_data,
    })
}

fn default_nsc_rate() -> f64 {
    7.7
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NscRequest {
    pub investment_amount: f64,
    #[serde(default = "default_nsc_rate")]
    pub interest_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NscYear {
    pub year: u32,
    pub opening_balance: f64,
    pub interest_earned: f64,
    pub closing_balance: f64,
    pub cumulative_interest: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NscMonth {
    pub month: u32,
    pub year: u32,
    pub amount: f64,
    pub accrued_interest: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NscResult {
    pub investment_amount: f64,
    pub interest_rate: f64,
    pub tenure_years: u32,
    pub maturity_amount: f64,
    pub total_interest: f64,
    /// Deduction available under section 80C in the year of purchase
    pub tax_benefit: f64,
    pub yearly_data: Vec<NscYear>,
    /// Accrual over the first two years, month by month
    pub monthly_data: Vec<NscMonth>,
}

pub fn calculate_nsc(request: &NscRequest) -> CalcResult<NscResult> {
    ensure_range("investment_amount", request.investment_amount, 1_000.0, 1e12)?;
    ensure_range("interest_rate", request.interest_rate, 0.0, 20.0)?;

    let p = request.investment_amount;
    let g = 1.0 + request.interest_rate / 100.0;
    let maturity = p * g.powi(NSC_TENURE_YEARS as i32);

    let yearly_data = (1..=NSC_TENURE_YEARS)
        .map(|year| {
            let opening = p * g.powi(year as i32 - 1);
            let closing = opening * g;
            NscYear {
                year,
                opening_balance: round2(opening),
                interest_earned: round2(closing - opening),
                closing_balance: round2(closing),
                cumulative_interest: round2(closing - p),
            }
        })
        .collect();

    let monthly_data = (1..=24)
        .map(|month| {
            let amount = p * g.powf(month as f64 / 12.0);
            NscMonth {
                month,
                year: month.div_ceil(12),
                amount: round2(amount),
                accrued_interest: round2(amount - p),
            }
        })
        .collect();

    Ok(NscResult {
        investment_amount: p,
        interest_rate: request.interest_rate,
        tenure_years: NSC_TENURE_YEARS,
        maturity_amount: round2(maturity),
        total_interest: round2(maturity - p),
        tax_benefit: p.min(SECTION_80C_LIMIT),
        yearly_data,
        monthly_data,
    })
}

fn default_scss_rate() -> f64 {
    8.2
}

fn default_scheme_years() -> u32 {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScssRequest {
    pub investment_amount: f64,
    #[serde(default = "default_scss_rate", alias = "interest_rate")]
    pub annual_interest_rate: f64,
    #[serde(default = "default_scheme_years")]
    pub tenure_years: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScssResult {
    pub investment_amount: f64,
    pub annual_interest_rate: f64,
    pub tenure_years: u32,
    pub quarterly_interest: f64,
    pub annual_interest: f64,
    pub total_interest: f64,
    /// Principal is returned at maturity; interest is paid out
    pub maturity_amount: f64,
    pub total_payout: f64,
}

pub fn calculate_scss(request: &ScssRequest) -> CalcResult<ScssResult> {
    ensure_range("investment_amount", request.investment_amount, 1_000.0, SCSS_MAX_DEPOSIT)?;
    ensure_range("annual_interest_rate", request.annual_interest_rate, 0.0, 20.0)?;
    ensure_range("tenure_years", request.tenure_years as f64, 1.0, 8.0)?;

    let p = request.investment_amount;
    let quarterly = p * request.annual_interest_rate / 100.0 / 4.0;
    let total = quarterly * 4.0 * request.tenure_years as f64;

    Ok(ScssResult {
        investment_amount: p,
        annual_interest_rate: request.annual_interest_rate,
        tenure_years: request.tenure_years,
        quarterly_interest: round2(quarterly),
        annual_interest: round2(quarterly * 4.0),
        total_interest: round2(total),
        maturity_amount: round2(p),
        total_payout: round2(p + total),
    })
}

fn default_pomis_rate() -> f64 {
    7.4
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PomisRequest {
    #[serde(alias = "yearly_investment")]
    pub investment_amount: f64,
    #[serde(default = "default_pomis_rate")]
    pub interest_rate: f64,
    #[serde(default = "default_scheme_years")]
    pub time_period: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PomisResult {
    pub invested_amount: f64,
    pub interest_rate: f64,
    pub time_period: u32,
    pub monthly_interest: f64,
    pub total_interest: f64,
    pub maturity_value: f64,
}

pub fn calculate_pomis(request: &PomisRequest) -> CalcResult<PomisResult> {
    ensure_range("investment_amount", request.investment_amount, 1_000.0, POMIS_MAX_DEPOSIT)?;
    ensure_range("interest_rate", request.interest_rate, 0.0, 20.0)?;
    ensure_range("time_period", request.time_period as f64, 1.0, 10.0)?;

    let p = request.investment_amount;
    let monthly = p * request.interest_rate / 100.0 / 12.0;
    let months = request.time_period * 12;

    Ok(PomisResult {
        invested_amount: p,
        interest_rate: request.interest_rate,
        time_period: request.time_period,
        monthly_interest: round2(monthly),
        total_interest: round2(monthly * months as f64),
        maturity_value: round2(p),
    })
}
