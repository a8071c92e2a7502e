//! NPS against a SIP of the same monthly amount: 80CCD(1B) savings and the
//! annuity split on one side, equity LTCG on the other

use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, ensure_range, CalcError, CalcResult};
use crate::rates::{round2, Frequency};
use crate::rules::TaxRules;
use crate::sip::sip_future_value;

/// Share of the NPS corpus that must buy an annuity at exit
pub const NPS_MIN_ANNUITY_PERCENT: f64 = 40.0;

fn default_sip_return() -> f64 {
    12.0
}

fn default_nps_return() -> f64 {
    10.0
}

fn default_slab() -> f64 {
    30.0
}

fn default_true() -> bool {
    true
}

fn default_lump_sum_percent() -> f64 {
    60.0
}

fn default_annuity_percent() -> f64 {
    40.0
}

fn default_annuity_rate() -> f64 {
    6.5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpsVsSipRequest {
    pub monthly_investment: f64,
    pub investment_duration: u32,
    #[serde(default = "default_sip_return")]
    pub sip_return_rate: f64,
    #[serde(default = "default_nps_return")]
    pub nps_return_rate: f64,
    /// Marginal slab rate in percent
    #[serde(default = "default_slab")]
    pub tax_slab: f64,
    /// Whether the NPS contribution is claimed under 80CCD(1B)
    #[serde(default = "default_true")]
    pub tax_benefit: bool,
    #[serde(default = "default_lump_sum_percent")]
    pub lump_sum_percent: f64,
    #[serde(default = "default_annuity_percent")]
    pub annuity_percent: f64,
    #[serde(default = "default_annuity_rate")]
    pub annuity_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipSide {
    pub total_invested: f64,
    pub maturity_value: f64,
    pub ltcg_tax: f64,
    pub post_tax_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpsSide {
    pub total_invested: f64,
    pub maturity_value: f64,
    /// Tax-free withdrawal at exit
    pub lump_sum: f64,
    pub annuity_corpus: f64,
    /// Interest-only pension from the annuity corpus
    pub monthly_pension: f64,
    pub annual_tax_saved: f64,
    pub total_tax_saved: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NpsSipWinner {
    #[serde(rename = "SIP")]
    Sip,
    #[serde(rename = "NPS")]
    Nps,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpsSipYear {
    pub year: u32,
    pub annual_investment: f64,
    pub sip_value: f64,
    pub nps_value: f64,
    pub tax_saved: f64,
    /// SIP value less NPS value, before tax
    pub difference: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpsVsSipResult {
    pub sip: SipSide,
    pub nps: NpsSide,
    /// Post-tax SIP value against the NPS lump sum; the annuity is locked away
    pub better_option: NpsSipWinner,
    pub difference: f64,
    pub key_difference: String,
    pub yearly_breakdown: Vec<NpsSipYear>,
}

pub fn calculate_nps_vs_sip(request: &NpsVsSipRequest, rules: &TaxRules) -> CalcResult<NpsVsSipResult> {
    ensure_positive("monthly_investment", request.monthly_investment)?;
    ensure_range("investment_duration", request.investment_duration as f64, 1.0, 50.0)?;
    ensure_range("sip_return_rate", request.sip_return_rate, 0.0, 50.0)?;
    ensure_range("nps_return_rate", request.nps_return_rate, 0.0, 50.0)?;
    ensure_range("tax_slab", request.tax_slab, 0.0, 50.0)?;
    ensure_range("annuity_rate", request.annuity_rate, 0.0, 20.0)?;
    ensure_range("annuity_percent", request.annuity_percent, NPS_MIN_ANNUITY_PERCENT, 100.0)?;
    ensure_range("lump_sum_percent", request.lump_sum_percent, 0.0, 100.0 - NPS_MIN_ANNUITY_PERCENT)?;
    if (request.lump_sum_percent + request.annuity_percent - 100.0).abs() > 0.01 {
        return Err(CalcError::invalid(
            "annuity_percent",
            "lump sum and annuity shares must add up to 100",
        ));
    }

    let years = request.investment_duration;
    let annual = request.monthly_investment * 12.0;
    let invested = annual * years as f64;

    let sip_value = sip_future_value(request.monthly_investment, request.sip_return_rate, Frequency::Monthly, years);
    let gains = sip_value - invested;
    let cg = &rules.capital_gains;
    let ltcg = (gains - cg.equity_ltcg_exemption_after).max(0.0) * cg.equity_ltcg_rate_after;
    let sip_post_tax = sip_value - ltcg;

    let nps_value = sip_future_value(request.monthly_investment, request.nps_return_rate, Frequency::Monthly, years);
    let lump_sum = nps_value * request.lump_sum_percent / 100.0;
    let annuity_corpus = nps_value * request.annuity_percent / 100.0;
    let monthly_pension = annuity_corpus * request.annuity_rate / 100.0 / 12.0;

    let annual_saved = if request.tax_benefit {
        annual.min(rules.deductions.section_80ccd_1b) * request.tax_slab / 100.0
    } else {
        0.0
    };

    let (better_option, key_difference) = if sip_post_tax > lump_sum {
        (
            NpsSipWinner::Sip,
            "SIP offers better liquidity and a higher lump sum, while NPS adds tax savings and a pension income.",
        )
    } else {
        (
            NpsSipWinner::Nps,
            "NPS offers a higher lump sum and tax savings, plus a pension income.",
        )
    };

    let yearly_breakdown = (1..=years)
        .map(|year| {
            let sip = sip_future_value(request.monthly_investment, request.sip_return_rate, Frequency::Monthly, year);
            let nps = sip_future_value(request.monthly_investment, request.nps_return_rate, Frequency::Monthly, year);
            NpsSipYear {
                year,
                annual_investment: round2(annual),
                sip_value: round2(sip),
                nps_value: round2(nps),
                tax_saved: round2(annual_saved),
                difference: round2(sip - nps),
            }
        })
        .collect();

    Ok(NpsVsSipResult {
        sip: SipSide {
            total_invested: round2(invested),
            maturity_value: round2(sip_value),
            ltcg_tax: round2(ltcg),
            post_tax_value: round2(sip_post_tax),
        },
        nps: NpsSide {
            total_invested: round2(invested),
            maturity_value: round2(nps_value),
            lump_sum: round2(lump_sum),
            annuity_corpus: round2(annuity_corpus),
            monthly_pension: round2(monthly_pension),
            annual_tax_saved: round2(annual_saved),
            total_tax_saved: round2(annual_saved * years as f64),
        },
        better_option,
        difference: round2((sip_post_tax - lump_sum).abs()),
        key_difference: key_difference.to_string(),
        yearly_breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn request(json: &str) -> NpsVsSipRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_defaults() {
        let rules = TaxRules::default_rules();
        let r = calculate_nps_vs_sip(&request(r#"{"monthly_investment": 5000, "investment_duration": 20}"#), &rules)
            .unwrap();
        let sip = sip_future_value(5_000.0, 12.0, Frequency::Monthly, 20);
        let ltcg = (sip - 1_200_000.0 - 125_000.0) * 0.125;
        assert_abs_diff_eq!(r.sip.ltcg_tax, ltcg, epsilon = 0.01);
        assert_abs_diff_eq!(r.nps.lump_sum + r.nps.annuity_corpus, r.nps.maturity_value, epsilon = 0.02);
        // 60,000 a year is capped at the 50,000 80CCD(1B) limit
        assert_eq!(r.nps.annual_tax_saved, 15_000.0);
        assert_eq!(r.nps.total_tax_saved, 300_000.0);
        assert_eq!(r.better_option, NpsSipWinner::Sip);
        assert_eq!(r.yearly_breakdown.len(), 20);
    }

    #[test]
    fn test_small_gains_escape_ltcg() {
        let rules = TaxRules::default_rules();
        let r = calculate_nps_vs_sip(
            &request(r#"{"monthly_investment": 1000, "investment_duration": 3, "tax_benefit": false}"#),
            &rules,
        )
        .unwrap();
        assert_eq!(r.sip.ltcg_tax, 0.0);
        assert_eq!(r.sip.post_tax_value, r.sip.maturity_value);
        assert_eq!(r.nps.total_tax_saved, 0.0);
    }

    #[test]
    fn test_annuity_share() {
        let rules = TaxRules::default_rules();
        let low = request(
            r#"{"monthly_investment": 5000, "investment_duration": 10, "lump_sum_percent": 70, "annuity_percent": 30}"#,
        );
        assert!(calculate_nps_vs_sip(&low, &rules).unwrap_err().is_client_error());

        let split = request(
            r#"{"monthly_investment": 5000, "investment_duration": 10, "lump_sum_percent": 50, "annuity_percent": 40}"#,
        );
        assert!(calculate_nps_vs_sip(&split, &rules).is_err());

        let full = request(
            r#"{"monthly_investment": 5000, "investment_duration": 10, "lump_sum_percent": 0,
                "annuity_percent": 100, "annuity_rate": 6}"#,
        );
        let r = calculate_nps_vs_sip(&full, &rules).unwrap();
        assert_eq!(r.nps.lump_sum, 0.0);
        assert_eq!(r.better_option, NpsSipWinner::Sip);
        assert_abs_diff_eq!(r.nps.monthly_pension, r.nps.annuity_corpus * 0.005, epsilon = 0.01);
    }
}
