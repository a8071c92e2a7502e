//! Monthly savings parked in yearly FDs against the same money in a SIP

use serde::{Deserialize, Serialize};

use crate::deposits::fd_maturity;
use crate::error::{ensure_positive, ensure_range, CalcError, CalcResult};
use crate::rates::{round2, Frequency};
use crate::sip::sip_future_value;

fn default_fd_compounding() -> Frequency {
    Frequency::Quarterly
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FdVsSipRequest {
    pub fd_monthly_investment: f64,
    pub fd_duration_years: u32,
    pub fd_interest_rate: f64,
    #[serde(default = "default_fd_compounding")]
    pub fd_compounding_frequency: Frequency,
    pub sip_monthly_amount: f64,
    pub sip_duration_years: u32,
    pub sip_expected_cagr: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FdLeg {
    pub total_invested: f64,
    pub maturity_value: f64,
    pub interest_earned: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SipLeg {
    pub total_invested: f64,
    pub estimated_value: f64,
    pub gain_from_sip: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FdSipWinner {
    #[serde(rename = "FD")]
    Fd,
    #[serde(rename = "SIP")]
    Sip,
    Equal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FdSipVerdict {
    pub better_option: FdSipWinner,
    pub difference: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FdSipYear {
    pub year: u32,
    pub fd_invested: f64,
    pub fd_interest: f64,
    pub fd_balance: f64,
    pub sip_invested: f64,
    pub sip_returns: f64,
    pub sip_balance: f64,
    pub better_option: FdSipWinner,
    pub advantage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FdVsSipResult {
    pub fd_results: FdLeg,
    pub sip_results: SipLeg,
    pub comparison: FdSipVerdict,
    pub yearly_comparison: Vec<FdSipYear>,
}

/// Each year's 12 × monthly amount is booked as one FD at the start of the
/// year and compounds until the end of year `horizon`
pub fn fd_ladder_value(monthly: f64, annual_rate_pct: f64, frequency: Frequency, horizon: u32) -> f64 {
    (1..=horizon)
        .map(|booked| fd_maturity(monthly * 12.0, annual_rate_pct, (horizon - booked + 1) as f64, frequency))
        .sum()
}

fn fd_leg(request: &FdVsSipRequest, year: u32) -> FdLeg {
    if year > request.fd_duration_years {
        return FdLeg {
            total_invested: 0.0,
            maturity_value: 0.0,
            interest_earned: 0.0,
        };
    }
    let invested = request.fd_monthly_investment * 12.0 * year as f64;
    let value = fd_ladder_value(
        request.fd_monthly_investment,
        request.fd_interest_rate,
        request.fd_compounding_frequency,
        year,
    );
    FdLeg {
        total_invested: invested,
        maturity_value: value,
        interest_earned: value - invested,
    }
}

fn sip_leg(request: &FdVsSipRequest, year: u32) -> SipLeg {
    if year > request.sip_duration_years {
        return SipLeg {
            total_invested: 0.0,
            estimated_value: 0.0,
            gain_from_sip: 0.0,
        };
    }
    let invested = request.sip_monthly_amount * 12.0 * year as f64;
    let value = sip_future_value(request.sip_monthly_amount, request.sip_expected_cagr, Frequency::Monthly, year);
    SipLeg {
        total_invested: invested,
        estimated_value: value,
        gain_from_sip: value - invested,
    }
}

fn winner(fd: f64, sip: f64) -> FdSipWinner {
    if (fd - sip).abs() < 0.005 {
        FdSipWinner::Equal
    } else if sip > fd {
        FdSipWinner::Sip
    } else {
        FdSipWinner::Fd
    }
}

pub fn calculate_fd_vs_sip(request: &FdVsSipRequest) -> CalcResult<FdVsSipResult> {
    ensure_positive("fdMonthlyInvestment", request.fd_monthly_investment)?;
    ensure_positive("sipMonthlyAmount", request.sip_monthly_amount)?;
    ensure_range("fdDurationYears", request.fd_duration_years as f64, 1.0, 50.0)?;
    ensure_range("sipDurationYears", request.sip_duration_years as f64, 1.0, 50.0)?;
    ensure_range("fdInterestRate", request.fd_interest_rate, 0.0, 50.0)?;
    ensure_range("sipExpectedCagr", request.sip_expected_cagr, 0.0, 50.0)?;
    if request.fd_compounding_frequency.months_per_period().is_none() {
        return Err(CalcError::invalid(
            "fdCompoundingFrequency",
            "FDs compound monthly, quarterly, half-yearly or yearly",
        ));
    }

    let horizon = request.fd_duration_years.max(request.sip_duration_years);
    let yearly_comparison = (1..=horizon)
        .map(|year| {
            let fd = fd_leg(request, year);
            let sip = sip_leg(request, year);
            FdSipYear {
                year,
                fd_invested: round2(fd.total_invested),
                fd_interest: round2(fd.interest_earned),
                fd_balance: round2(fd.maturity_value),
                sip_invested: round2(sip.total_invested),
                sip_returns: round2(sip.gain_from_sip),
                sip_balance: round2(sip.estimated_value),
                better_option: winner(fd.maturity_value, sip.estimated_value),
                advantage: round2((sip.estimated_value - fd.maturity_value).abs()),
            }
        })
        .collect();

    let fd = fd_leg(request, request.fd_duration_years);
    let sip = sip_leg(request, request.sip_duration_years);

    Ok(FdVsSipResult {
        fd_results: FdLeg {
            total_invested: round2(fd.total_invested),
            maturity_value: round2(fd.maturity_value),
            interest_earned: round2(fd.interest_earned),
        },
        sip_results: SipLeg {
            total_invested: round2(sip.total_invested),
            estimated_value: round2(sip.estimated_value),
            gain_from_sip: round2(sip.gain_from_sip),
        },
        comparison: FdSipVerdict {
            better_option: winner(fd.maturity_value, sip.estimated_value),
            difference: round2((sip.estimated_value - fd.maturity_value).abs()),
        },
        yearly_comparison,
    })
}
