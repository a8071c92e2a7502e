//! SIP, step-up SIP and SIP delay calculators

use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, ensure_range, CalcError, CalcResult};
use crate::growth::deflate;
use crate::rates::{annuity_due_factor, periodic_rate, round2, Frequency};

use super::ledger::{InstallmentLedger, LedgerYear};

fn default_sip_frequency() -> Frequency {
    Frequency::Monthly
}

/// Future value of a level SIP paid at the start of each period
///
/// `A·((1+i)^n − 1)/i·(1+i)`, or `A·n` at a zero rate.
pub fn sip_future_value(installment: f64, annual_rate_pct: f64, frequency: Frequency, years: u32) -> f64 {
    let n = frequency.periods_per_year();
    installment * annuity_due_factor(periodic_rate(annual_rate_pct, n), n * years)
}

/// One year of a SIP ledger on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipYear {
    pub year: u32,
    pub sip_amount: f64,
    pub yearly_invested: f64,
    pub cumulative_invested: f64,
    pub cumulative_value: f64,
    pub yearly_returns: f64,
    pub inflation_adjusted_value: f64,
}

impl SipYear {
    fn from_ledger(row: &LedgerYear, inflation_pct: f64) -> Self {
        SipYear {
            year: row.year,
            sip_amount: round2(row.installment),
            yearly_invested: round2(row.invested_this_year),
            cumulative_invested: round2(row.cumulative_invested),
            cumulative_value: round2(row.value),
            yearly_returns: round2(row.returns_this_year),
            inflation_adjusted_value: round2(deflate(row.value, inflation_pct, row.year as f64)),
        }
    }
}

fn check_plan(return_rate: f64, tenure_years: u32, inflation_rate: f64) -> CalcResult<()> {
    ensure_range("returnRate", return_rate, 0.0, 50.0)?;
    ensure_range("tenureYears", tenure_years as f64, 1.0, 50.0)?;
    ensure_range("inflationRate", inflation_rate, 0.0, 30.0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SipRequest {
    pub sip_amount: f64,
    #[serde(default = "default_sip_frequency")]
    pub frequency: Frequency,
    pub return_rate: f64,
    pub tenure_years: u32,
    #[serde(default)]
    pub inflation_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SipResponse {
    pub future_value: f64,
    pub total_invested: f64,
    pub total_returns: f64,
    pub inflation_adjusted_value: f64,
    pub yearly_breakdown: Vec<SipYear>,
}

fn summarise(rows: &[LedgerYear], inflation_pct: f64) -> (f64, f64, f64, Vec<SipYear>) {
    let (value, invested, years) = rows
        .last()
        .map(|r| (r.value, r.cumulative_invested, r.year))
        .unwrap_or((0.0, 0.0, 0));
    let breakdown = rows.iter().map(|r| SipYear::from_ledger(r, inflation_pct)).collect();
    (value, invested, deflate(value, inflation_pct, years as f64), breakdown)
}

pub fn calculate_sip(request: &SipRequest) -> CalcResult<SipResponse> {
    ensure_positive("sipAmount", request.sip_amount)?;
    check_plan(request.return_rate, request.tenure_years, request.inflation_rate)?;

    let rows = InstallmentLedger::new(request.return_rate, request.frequency, request.tenure_years)
        .run(|_| request.sip_amount);
    let (value, invested, real, yearly_breakdown) = summarise(&rows, request.inflation_rate);

    Ok(SipResponse {
        future_value: round2(value),
        total_invested: round2(invested),
        total_returns: round2(value - invested),
        inflation_adjusted_value: round2(real),
        yearly_breakdown,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepUpType {
    #[default]
    Percentage,
    #[serde(alias = "amount")]
    Fixed,
}

fn default_step_up_pct() -> f64 {
    10.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepUpSipRequest {
    pub initial_sip_amount: f64,
    #[serde(default)]
    pub step_up_type: StepUpType,
    #[serde(default = "default_step_up_pct")]
    pub step_up_percentage: f64,
    #[serde(default)]
    pub fixed_step_up_amount: f64,
    #[serde(default = "default_sip_frequency")]
    pub frequency: Frequency,
    pub return_rate: f64,
    pub tenure_years: u32,
    #[serde(default)]
    pub inflation_rate: f64,
}

impl StepUpSipRequest {
    /// Installment paid during plan year `year` (1-based)
    pub fn installment(&self, year: u32) -> f64 {
        let steps = year.saturating_sub(1);
        match self.step_up_type {
            StepUpType::Percentage => {
                self.initial_sip_amount * (1.0 + self.step_up_percentage / 100.0).powi(steps as i32)
            }
            StepUpType::Fixed => self.initial_sip_amount + self.fixed_step_up_amount * steps as f64,
        }
    }

    /// Size of the first annual increase
    pub fn first_step_up(&self) -> f64 {
        self.installment(2) - self.initial_sip_amount
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepUpSipResponse {
    pub future_value: f64,
    pub total_invested: f64,
    pub total_returns: f64,
    pub inflation_adjusted_value: f64,
    pub annual_step_up_value: f64,
    pub yearly_breakdown: Vec<SipYear>,
}

pub fn calculate_step_up_sip(request: &StepUpSipRequest) -> CalcResult<StepUpSipResponse> {
    ensure_positive("initialSipAmount", request.initial_sip_amount)?;
    check_plan(request.return_rate, request.tenure_years, request.inflation_rate)?;
    match request.step_up_type {
        StepUpType::Percentage => ensure_range("stepUpPercentage", request.step_up_percentage, 0.0, 100.0)?,
        StepUpType::Fixed => crate::error::ensure_non_negative("fixedStepUpAmount", request.fixed_step_up_amount)?,
    }

    let rows = InstallmentLedger::new(request.return_rate, request.frequency, request.tenure_years)
        .run(|year| request.installment(year));
    let (value, invested, real, yearly_breakdown) = summarise(&rows, request.inflation_rate);

    Ok(StepUpSipResponse {
        future_value: round2(value),
        total_invested: round2(invested),
        total_returns: round2(value - invested),
        inflation_adjusted_value: round2(real),
        annual_step_up_value: round2(request.first_step_up()),
        yearly_breakdown,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SipDelayRequest {
    pub sip_amount: f64,
    pub expected_return: f64,
    /// Horizon in years, shared by both plans
    pub investment_period: u32,
    pub delay_months: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipDelayYear {
    pub year: u32,
    pub no_delay_invested: f64,
    pub no_delay_value: f64,
    pub delayed_invested: f64,
    pub delayed_value: f64,
    pub yearly_impact: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SipDelayResponse {
    pub no_delay_final_amount: f64,
    pub no_delay_investment: f64,
    pub delayed_final_amount: f64,
    pub delayed_investment: f64,
    pub delay_impact: f64,
    /// Share of the on-time plan's final value lost to the delay, in percent
    pub earnings_potential: f64,
    pub yearly_breakdown: Vec<SipDelayYear>,
}

pub fn calculate_sip_delay(request: &SipDelayRequest) -> CalcResult<SipDelayResponse> {
    ensure_positive("sipAmount", request.sip_amount)?;
    ensure_range("expectedReturn", request.expected_return, 0.0, 50.0)?;
    ensure_range("investmentPeriod", request.investment_period as f64, 1.0, 50.0)?;
    if request.delay_months >= request.investment_period * 12 {
        return Err(CalcError::invalid(
            "delayMonths",
            "delay must be shorter than the investment period",
        ));
    }

    let ledger = InstallmentLedger::new(request.expected_return, Frequency::Monthly, request.investment_period);
    let on_time = ledger.run(|_| request.sip_amount);
    let delayed = ledger.skipping(request.delay_months).run(|_| request.sip_amount);

    let yearly_breakdown = on_time
        .iter()
        .zip(&delayed)
        .map(|(a, b)| SipDelayYear {
            year: a.year,
            no_delay_invested: round2(a.cumulative_invested),
            no_delay_value: round2(a.value),
            delayed_invested: round2(b.cumulative_invested),
            delayed_value: round2(b.value),
            yearly_impact: round2(a.value - b.value),
        })
        .collect();

    let (full, late) = match (on_time.last(), delayed.last()) {
        (Some(a), Some(b)) => (*a, *b),
        _ => return Err(CalcError::invalid("investmentPeriod", "must cover at least one year")),
    };
    let impact = full.value - late.value;

    Ok(SipDelayResponse {
        no_delay_final_amount: round2(full.value),
        no_delay_investment: round2(full.cumulative_invested),
        delayed_final_amount: round2(late.value),
        delayed_investment: round2(late.cumulative_invested),
        delay_impact: round2(impact),
        earnings_potential: round2(impact / full.value * 100.0),
        yearly_breakdown,
    })
}
