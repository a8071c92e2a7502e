//! PPF against a monthly SIP of the same size

use serde::{Deserialize, Serialize};

use crate::deposits::{calculate_ppf, PpfRequest};
use crate::error::{ensure_positive, ensure_range, CalcResult};
use crate::rates::{round2, Frequency};
use crate::sip::InstallmentLedger;

fn default_monthly_amount() -> f64 {
    12_500.0
}

fn default_ppf_rate() -> f64 {
    7.1
}

fn default_sip_rate() -> f64 {
    12.0
}

fn default_duration() -> u32 {
    15
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PpfVsSipRequest {
    #[serde(default = "default_monthly_amount")]
    pub ppf_monthly_amount: f64,
    #[serde(default = "default_ppf_rate")]
    pub ppf_interest_rate: f64,
    #[serde(default = "default_monthly_amount")]
    pub sip_monthly_amount: f64,
    #[serde(default = "default_sip_rate")]
    pub sip_return_rate: f64,
    #[serde(default = "default_duration")]
    pub duration: u32,
}

/// Totals of one side of the comparison
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PpfSipLeg {
    pub total_invested: f64,
    pub maturity_value: f64,
    pub net_gain: f64,
    /// Net gain as a percentage of the money put in
    pub total_return: f64,
    pub annual_return: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PpfSipWinner {
    #[serde(rename = "PPF")]
    Ppf,
    #[serde(rename = "SIP")]
    Sip,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PpfBalance {
    pub invested: f64,
    pub interest: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SipBalance {
    pub invested: f64,
    pub returns: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PpfSipYear {
    pub year: u32,
    pub ppf: PpfBalance,
    pub sip: SipBalance,
    pub better_option: PpfSipWinner,
    pub advantage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PpfVsSipResult {
    pub ppf: PpfSipLeg,
    pub sip: PpfSipLeg,
    pub maturity_difference: f64,
    pub better_option: PpfSipWinner,
    /// How far the winner is ahead, relative to the loser
    pub advantage_percentage: f64,
    pub yearly_breakdown: Vec<PpfSipYear>,
}

fn leg(invested: f64, value: f64, annual_return: f64) -> PpfSipLeg {
    let gain = value - invested;
    PpfSipLeg {
        total_invested: round2(invested),
        maturity_value: round2(value),
        net_gain: round2(gain),
        total_return: if invested > 0.0 { round2(gain / invested * 100.0) } else { 0.0 },
        annual_return,
    }
}

fn winner(ppf: f64, sip: f64) -> PpfSipWinner {
    if sip > ppf {
        PpfSipWinner::Sip
    } else {
        PpfSipWinner::Ppf
    }
}

/// PPF takes twelve months' money as one deposit at the start of each year;
/// the SIP runs month by month over the same horizon
pub fn calculate_ppf_vs_sip(request: &PpfVsSipRequest) -> CalcResult<PpfVsSipResult> {
    ensure_positive("ppfMonthlyAmount", request.ppf_monthly_amount)?;
    ensure_positive("sipMonthlyAmount", request.sip_monthly_amount)?;
    ensure_range("sipReturnRate", request.sip_return_rate, 0.0, 50.0)?;

    let ppf = calculate_ppf(&PpfRequest {
        annual_contribution: request.ppf_monthly_amount * 12.0,
        duration_years: request.duration,
        interest_rate: request.ppf_interest_rate,
        contribution_frequency: Frequency::Yearly,
    })?;
    let sip_rows =
        InstallmentLedger::new(request.sip_return_rate, Frequency::Monthly, request.duration)
            .run(|_| request.sip_monthly_amount);

    let yearly_breakdown: Vec<PpfSipYear> = ppf
        .year_wise_data
        .iter()
        .zip(&sip_rows)
        .map(|(p, s)| PpfSipYear {
            year: p.year,
            ppf: PpfBalance {
                invested: p.total_invested_till_date,
                interest: p.closing_balance - p.total_invested_till_date,
                balance: p.closing_balance,
            },
            sip: SipBalance {
                invested: round2(s.cumulative_invested),
                returns: round2(s.value - s.cumulative_invested),
                balance: round2(s.value),
            },
            better_option: winner(p.closing_balance, s.value),
            advantage: round2((s.value - p.closing_balance).abs()),
        })
        .collect();

    let (sip_invested, sip_value) = sip_rows
        .last()
        .map(|s| (s.cumulative_invested, s.value))
        .unwrap_or_default();
    let ppf_value = ppf.maturity_value;
    let (high, low) = if sip_value > ppf_value { (sip_value, ppf_value) } else { (ppf_value, sip_value) };

    Ok(PpfVsSipResult {
        ppf: leg(ppf.total_investment, ppf_value, request.ppf_interest_rate),
        sip: leg(sip_invested, sip_value, request.sip_return_rate),
        maturity_difference: round2(high - low),
        better_option: winner(ppf_value, sip_value),
        advantage_percentage: if low > 0.0 { round2((high - low) / low * 100.0) } else { 0.0 },
        yearly_breakdown,
    })
}
