//! Recurring deposits against SIPs, and the three-way RD, FD and SIP comparison

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::deposits::{fd_maturity, rd_maturity};
use crate::error::{ensure_positive, ensure_range, CalcError, CalcResult};
use crate::rates::{round2, Frequency};
use crate::sip::sip_future_value;

fn default_rd_rate() -> f64 {
    6.5
}

fn default_quarterly() -> Frequency {
    Frequency::Quarterly
}

fn default_sip_return() -> f64 {
    12.0
}

fn check_deposit_frequency(field: &'static str, frequency: Frequency) -> CalcResult<()> {
    if frequency.months_per_period().is_none() {
        return Err(CalcError::invalid(
            field,
            "deposits compound monthly, quarterly, half-yearly or yearly",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RdVsSipRequest {
    pub rd_amount: f64,
    pub rd_duration: u32,
    #[serde(default = "default_rd_rate")]
    pub rd_rate: f64,
    #[serde(default = "default_quarterly")]
    pub rd_compounding: Frequency,
    pub sip_amount: f64,
    pub sip_duration: u32,
    #[serde(default = "default_sip_return")]
    pub sip_return: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RdOutcome {
    pub total_invested: f64,
    pub maturity_value: f64,
    pub interest_earned: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SipOutcomeLeg {
    pub total_invested: f64,
    pub maturity_value: f64,
    pub gains_earned: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RdSipWinner {
    #[serde(rename = "RD")]
    Rd,
    #[serde(rename = "SIP")]
    Sip,
    Equal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RdSipVerdict {
    /// SIP maturity less RD maturity; negative when the RD ends ahead
    pub difference_amount: f64,
    /// Difference as a share of the RD maturity value
    pub percentage_gain: f64,
    pub better_option: RdSipWinner,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RdVsSipResult {
    pub rd: RdOutcome,
    pub sip: SipOutcomeLeg,
    pub comparison: RdSipVerdict,
}

pub fn calculate_rd_vs_sip(request: &RdVsSipRequest) -> CalcResult<RdVsSipResult> {
    ensure_positive("rdAmount", request.rd_amount)?;
    ensure_positive("sipAmount", request.sip_amount)?;
    ensure_range("rdDuration", request.rd_duration as f64, 1.0, 50.0)?;
    ensure_range("sipDuration", request.sip_duration as f64, 1.0, 50.0)?;
    ensure_range("rdRate", request.rd_rate, 0.0, 50.0)?;
    ensure_range("sipReturn", request.sip_return, 0.0, 50.0)?;
    check_deposit_frequency("rdCompounding", request.rd_compounding)?;

    let rd_invested = request.rd_amount * 12.0 * request.rd_duration as f64;
    let rd_value = rd_maturity(request.rd_amount, request.rd_rate, request.rd_duration * 12, request.rd_compounding);
    let sip_invested = request.sip_amount * 12.0 * request.sip_duration as f64;
    let sip_value = sip_future_value(request.sip_amount, request.sip_return, Frequency::Monthly, request.sip_duration);

    let difference = sip_value - rd_value;
    let better_option = if difference.abs() < 0.005 {
        RdSipWinner::Equal
    } else if difference > 0.0 {
        RdSipWinner::Sip
    } else {
        RdSipWinner::Rd
    };

    Ok(RdVsSipResult {
        rd: RdOutcome {
            total_invested: round2(rd_invested),
            maturity_value: round2(rd_value),
            interest_earned: round2(rd_value - rd_invested),
        },
        sip: SipOutcomeLeg {
            total_invested: round2(sip_invested),
            maturity_value: round2(sip_value),
            gains_earned: round2(sip_value - sip_invested),
        },
        comparison: RdSipVerdict {
            difference_amount: round2(difference),
            percentage_gain: round2(difference / rd_value * 100.0),
            better_option,
        },
    })
}

/// How the FD principal is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FdFunding {
    /// The larger of the RD and SIP totals, so all three products put in the same money
    #[default]
    Match,
    /// The `fd_lumpsum` given in the request
    Custom,
}

fn default_rd_monthly() -> f64 {
    5_000.0
}

fn default_three_way_rd_rate() -> f64 {
    6.8
}

fn default_fd_lumpsum() -> f64 {
    300_000.0
}

fn default_fd_rate() -> f64 {
    7.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RdVsFdVsSipRequest {
    pub tenure_years: u32,
    #[serde(default = "default_rd_monthly")]
    pub rd_monthly: f64,
    #[serde(default = "default_three_way_rd_rate")]
    pub rd_rate: f64,
    #[serde(default)]
    pub fd_type: FdFunding,
    #[serde(default = "default_fd_lumpsum")]
    pub fd_lumpsum: f64,
    #[serde(default = "default_fd_rate")]
    pub fd_rate: f64,
    #[serde(default = "default_quarterly")]
    pub fd_compounding: Frequency,
    #[serde(default = "default_rd_monthly")]
    pub sip_monthly: f64,
    #[serde(default = "default_sip_return")]
    pub sip_return: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Product {
    #[serde(rename = "RD")]
    Rd,
    #[serde(rename = "FD")]
    Fd,
    #[serde(rename = "SIP")]
    Sip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOutcome {
    #[serde(rename = "type")]
    pub product: Product,
    pub total_invested: f64,
    pub maturity_value: f64,
    pub returns_earned: f64,
    /// Annual growth rate that turns the total invested into the maturity value
    pub effective_cagr: f64,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RdVsFdVsSipResult {
    pub rd: ProductOutcome,
    pub fd: ProductOutcome,
    pub sip: ProductOutcome,
    /// Products by maturity value, highest first
    pub ranking: Vec<Product>,
}

fn outcome(product: Product, invested: f64, value: f64, years: u32, risk_level: RiskLevel) -> ProductOutcome {
    let effective_cagr = if invested > 0.0 {
        ((value / invested).powf(1.0 / years as f64) - 1.0) * 100.0
    } else {
        0.0
    };
    ProductOutcome {
        product,
        total_invested: round2(invested),
        maturity_value: round2(value),
        returns_earned: round2(value - invested),
        effective_cagr: round2(effective_cagr),
        risk_level,
    }
}

pub fn calculate_rd_vs_fd_vs_sip(request: &RdVsFdVsSipRequest) -> CalcResult<RdVsFdVsSipResult> {
    ensure_range("tenure_years", request.tenure_years as f64, 1.0, 50.0)?;
    ensure_positive("rd_monthly", request.rd_monthly)?;
    ensure_positive("sip_monthly", request.sip_monthly)?;
    ensure_range("rd_rate", request.rd_rate, 0.0, 50.0)?;
    ensure_range("fd_rate", request.fd_rate, 0.0, 50.0)?;
    ensure_range("sip_return", request.sip_return, 0.0, 50.0)?;
    check_deposit_frequency("fd_compounding", request.fd_compounding)?;

    let years = request.tenure_years;
    let months = years * 12;

    let rd_invested = request.rd_monthly * months as f64;
    let rd = outcome(
        Product::Rd,
        rd_invested,
        rd_maturity(request.rd_monthly, request.rd_rate, months, Frequency::Quarterly),
        years,
        RiskLevel::Low,
    );

    let sip_invested = request.sip_monthly * months as f64;
    let sip = outcome(
        Product::Sip,
        sip_invested,
        sip_future_value(request.sip_monthly, request.sip_return, Frequency::Monthly, years),
        years,
        RiskLevel::High,
    );

    let principal = match request.fd_type {
        FdFunding::Match => rd_invested.max(sip_invested),
        FdFunding::Custom => {
            ensure_positive("fd_lumpsum", request.fd_lumpsum)?;
            request.fd_lumpsum
        }
    };
    let fd = outcome(
        Product::Fd,
        principal,
        fd_maturity(principal, request.fd_rate, years as f64, request.fd_compounding),
        years,
        RiskLevel::Low,
    );

    let mut ordered = [rd, fd, sip];
    ordered.sort_by(|a, b| b.maturity_value.partial_cmp(&a.maturity_value).unwrap_or(Ordering::Equal));

    Ok(RdVsFdVsSipResult {
        rd,
        fd,
        sip,
        ranking: ordered.iter().map(|o| o.product).collect(),
    })
}
