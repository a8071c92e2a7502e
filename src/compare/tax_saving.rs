//! ELSS against a regular SIP, counting the 80C tax saving

use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, ensure_range, CalcResult};
use crate::rates::{round2, Frequency};
use crate::sip::sip_future_value;

/// Yearly investment that qualifies under section 80C
pub const ELSS_80C_CAP: f64 = 150_000.0;

fn default_slab() -> f64 {
    30.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElssVsSipRequest {
    pub monthly_investment: f64,
    pub investment_duration: u32,
    pub sip_return_rate: f64,
    pub elss_return_rate: f64,
    /// Marginal slab rate in percent
    #[serde(default = "default_slab")]
    pub tax_slab: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElssYear {
    pub year: u32,
    pub annual_investment: f64,
    pub sip_value: f64,
    pub elss_value: f64,
    pub annual_tax_saved: f64,
    pub elss_advantage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElssVsSipResult {
    pub monthly_investment: f64,
    pub investment_duration: u32,
    pub tax_slab: f64,
    pub sip_final_value: f64,
    pub elss_final_value: f64,
    pub annual_tax_saved: f64,
    pub total_tax_saved: f64,
    /// ELSS value plus tax saved, less the SIP value
    pub net_benefit: f64,
    pub year_wise_data: Vec<ElssYear>,
}

pub fn calculate_elss_vs_sip(request: &ElssVsSipRequest) -> CalcResult<ElssVsSipResult> {
    ensure_positive("monthly_investment", request.monthly_investment)?;
    ensure_range("investment_duration", request.investment_duration as f64, 3.0, 50.0)?;
    ensure_range("sip_return_rate", request.sip_return_rate, 0.0, 50.0)?;
    ensure_range("elss_return_rate", request.elss_return_rate, 0.0, 50.0)?;
    ensure_range("tax_slab", request.tax_slab, 0.0, 50.0)?;

    let annual = request.monthly_investment * 12.0;
    let annual_saved = annual.min(ELSS_80C_CAP) * request.tax_slab / 100.0;

    let year_wise_data = (1..=request.investment_duration)
        .map(|year| {
            let sip = sip_future_value(request.monthly_investment, request.sip_return_rate, Frequency::Monthly, year);
            let elss = sip_future_value(request.monthly_investment, request.elss_return_rate, Frequency::Monthly, year);
            ElssYear {
                year,
                annual_investment: annual,
                sip_value: sip.round(),
                elss_value: elss.round(),
                annual_tax_saved: annual_saved.round(),
                elss_advantage: (elss + annual_saved * year as f64 - sip).round(),
            }
        })
        .collect();

    let years = request.investment_duration;
    let sip = sip_future_value(request.monthly_investment, request.sip_return_rate, Frequency::Monthly, years);
    let elss = sip_future_value(request.monthly_investment, request.elss_return_rate, Frequency::Monthly, years);
    let total_saved = annual_saved * years as f64;

    Ok(ElssVsSipResult {
        monthly_investment: request.monthly_investment,
        investment_duration: years,
        tax_slab: request.tax_slab,
        sip_final_value: sip.round(),
        elss_final_value: elss.round(),
        annual_tax_saved: round2(annual_saved),
        total_tax_saved: total_saved.round(),
        net_benefit: (elss + total_saved - sip).round(),
        year_wise_data,
    })
}
