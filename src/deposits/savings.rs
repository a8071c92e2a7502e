//! Recurring government savings: Sukanya Samriddhi and the post-office RD

use chrono::Months;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, ensure_range, CalcError, CalcResult};
use crate::rates::{current_month_start, round2, Frequency, MONTH_NAMES};

use super::bank::rd_maturity;

/// An SSY account matures 21 years after opening
pub const SSY_MATURITY_YEARS: u32 = 21;
/// Deposits are only accepted for the first 15 years
pub const SSY_MAX_DEPOSIT_YEARS: u32 = 15;
pub const SSY_MIN_ANNUAL_DEPOSIT: f64 = 250.0;
pub const SSY_MAX_ANNUAL_DEPOSIT: f64 = 150_000.0;

fn default_ssy_rate() -> f64 {
    8.2
}

fn default_ssy_frequency() -> Frequency {
    Frequency::Yearly
}

fn default_ssy_period() -> u32 {
    SSY_MAX_DEPOSIT_YEARS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SsyRequest {
    /// Amount paid per installment
    pub investment_amount: f64,
    #[serde(default = "default_ssy_frequency")]
    pub investment_frequency: Frequency,
    #[serde(default = "default_ssy_rate")]
    pub annual_interest_rate: f64,
    /// Years in which deposits are made
    #[serde(default = "default_ssy_period")]
    pub investment_period: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SsyYear {
    pub year: u32,
    pub annual_investment: f64,
    pub total_invested: f64,
    pub interest_earned: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SsyMonth {
    pub year: u32,
    pub month_name: String,
    pub monthly_investment: f64,
    pub cumulative_investment: f64,
    /// Interest accrued in the month; credited at the end of the year
    pub interest_earned: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SsyResult {
    pub investment_amount: f64,
    pub investment_frequency: Frequency,
    pub annual_investment: f64,
    pub annual_interest_rate: f64,
    pub investment_period: u32,
    pub maturity_years: u32,
    pub maturity_amount: f64,
    pub total_investment: f64,
    pub total_interest: f64,
    pub yearly_breakdown: Vec<SsyYear>,
    pub monthly_breakdown: Vec<SsyMonth>,
}

/// Sukanya Samriddhi account from opening to maturity
///
/// Interest accrues monthly on the balance after that month's deposit and is
/// credited once a year, so it only compounds annually.
pub fn calculate_ssy(request: &SsyRequest) -> CalcResult<SsyResult> {
    ensure_positive("investment_amount", request.investment_amount)?;
    ensure_range("annual_interest_rate", request.annual_interest_rate, 0.0, 20.0)?;
    ensure_range(
        "investment_period",
        request.investment_period as f64,
        1.0,
        SSY_MAX_DEPOSIT_YEARS as f64,
    )?;
    let months_per_period = request.investment_frequency.months_per_period().ok_or_else(|| {
        CalcError::invalid(
            "investment_frequency",
            "SSY deposits are monthly, quarterly, half-yearly or yearly",
        )
    })?;
    let annual_investment =
        request.investment_amount * request.investment_frequency.periods_per_year() as f64;
    ensure_range(
        "annual_investment",
        annual_investment,
        SSY_MIN_ANNUAL_DEPOSIT,
        SSY_MAX_ANNUAL_DEPOSIT,
    )?;

    let monthly_rate = request.annual_interest_rate / 100.0 / 12.0;
    let mut balance = 0.0;
    let mut invested = 0.0;
    let mut yearly_breakdown = Vec::with_capacity(SSY_MATURITY_YEARS as usize);
    let mut monthly_breakdown = Vec::with_capacity(SSY_MATURITY_YEARS as usize * 12);

    for year in 1..=SSY_MATURITY_YEARS {
        let mut accrued = 0.0;
        let mut deposited = 0.0;
        for month in 0..12 {
            let deposit = if year <= request.investment_period && month % months_per_period == 0 {
                request.investment_amount
            } else {
                0.0
            };
            balance += deposit;
            deposited += deposit;
            invested += deposit;
            let interest = balance * monthly_rate;
            accrued += interest;
            monthly_breakdown.push(SsyMonth {
                year,
                month_name: MONTH_NAMES[month as usize].to_string(),
                monthly_investment: round2(deposit),
                cumulative_investment: round2(invested),
                interest_earned: round2(interest),
                balance: round2(balance + accrued),
            });
        }
        balance += accrued;
        yearly_breakdown.push(SsyYear {
            year,
            annual_investment: round2(deposited),
            total_invested: round2(invested),
            interest_earned: round2(accrued),
            balance: round2(balance),
        });
    }
    log::debug!("ssy: {} deposit years, maturity {:.2}", request.investment_period, balance);

    Ok(SsyResult {
        investment_amount: request.investment_amount,
        investment_frequency: request.investment_frequency,
        annual_investment: round2(annual_investment),
        annual_interest_rate: request.annual_interest_rate,
        investment_period: request.investment_period,
        maturity_years: SSY_MATURITY_YEARS,
        maturity_amount: round2(balance),
        total_investment: round2(invested),
        total_interest: round2(balance - invested),
        yearly_breakdown,
        monthly_breakdown,
    })
}

fn default_po_rd_rate() -> f64 {
    6.7
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostOfficeRdRequest {
    pub monthly_amount: f64,
    pub tenure_years: u32,
    #[serde(default = "default_po_rd_rate")]
    pub interest_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostOfficeRdYear {
    pub year: u32,
    pub quarterly_deposits: f64,
    pub opening_balance: f64,
    pub interest_earned: f64,
    pub closing_balance: f64,
    pub total_invested: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostOfficeRdResult {
    pub monthly_amount: f64,
    pub tenure_years: u32,
    pub interest_rate: f64,
    pub total_investment: f64,
    pub total_interest: f64,
    pub maturity_value: f64,
    /// Month and year of maturity, e.g. "Oct 2031"
    pub maturity_date: String,
    pub year_wise_data: Vec<PostOfficeRdYear>,
}

/// Post-office RD: monthly deposits, interest compounded quarterly
pub fn calculate_post_office_rd(request: &PostOfficeRdRequest) -> CalcResult<PostOfficeRdResult> {
    ensure_range("monthly_amount", request.monthly_amount, 100.0, 1e9)?;
    ensure_range("tenure_years", request.tenure_years as f64, 1.0, 30.0)?;
    ensure_range("interest_rate", request.interest_rate, 1.0, 15.0)?;

    let monthly = request.monthly_amount;
    let rate = request.interest_rate;
    let months = request.tenure_years * 12;
    let maturity = rd_maturity(monthly, rate, months, Frequency::Quarterly);
    let invested = monthly * months as f64;

    let mut opening = 0.0;
    let year_wise_data = (1..=request.tenure_years)
        .map(|year| {
            let closing = rd_maturity(monthly, rate, year * 12, Frequency::Quarterly);
            let row = PostOfficeRdYear {
                year,
                quarterly_deposits: round2(monthly * 3.0),
                opening_balance: round2(opening),
                interest_earned: round2(closing - opening - monthly * 12.0),
                closing_balance: round2(closing),
                total_invested: round2(monthly * 12.0 * year as f64),
            };
            opening = closing;
            row
        })
        .collect();

    let maturity_date = current_month_start()
        .checked_add_months(Months::new(months))
        .map(|d| d.format("%b %Y").to_string())
        .ok_or_else(|| CalcError::invalid("tenure_years", "maturity date out of range"))?;

    Ok(PostOfficeRdResult {
        monthly_amount: monthly,
        tenure_years: request.tenure_years,
        interest_rate: rate,
        total_investment: invested.round(),
        total_interest: (maturity - invested).round(),
        maturity_value: maturity.round(),
        maturity_date,
        year_wise_data,
    })
}
