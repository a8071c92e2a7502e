//! ULIP projections and the ULIP against SIP comparison

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_positive, ensure_range, CalcError, CalcResult};
use crate::rates::{annuity_due_factor, round2, Frequency};
use crate::sip::sip_future_value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UlipMode {
    #[default]
    #[serde(alias = "Regular Investment")]
    Regular,
    #[serde(alias = "One-time Investment", alias = "one_time")]
    LumpSum,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UlipRequest {
    #[serde(default)]
    pub mode: UlipMode,
    pub tenure_years: u32,
    pub expected_return: f64,
    #[serde(default)]
    pub existing_investment: f64,
    #[serde(default)]
    pub monthly_investment: f64,
    /// Added to every monthly premium
    #[serde(default)]
    pub periodic_topup: f64,
    #[serde(default)]
    pub lump_sum: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UlipResult {
    pub mode: UlipMode,
    pub tenure_years: u32,
    pub expected_return: f64,
    pub total_invested: f64,
    pub fv_contrib: f64,
    pub fv_existing: f64,
    pub projected_maturity_value: f64,
    pub absolute_return_pct: f64,
    pub summary_message: String,
}

pub fn calculate_ulip(request: &UlipRequest) -> CalcResult<UlipResult> {
    ensure_range("tenure_years", request.tenure_years as f64, 1.0, 50.0)?;
    ensure_range("expected_return", request.expected_return, 0.0, 50.0)?;
    ensure_non_negative("existing_investment", request.existing_investment)?;
    ensure_non_negative("periodic_topup", request.periodic_topup)?;

    let i = request.expected_return / 100.0 / 12.0;
    let months = request.tenure_years * 12;
    let growth = (1.0 + i).powi(months as i32);

    let (fv_contrib, contributed, headline) = match request.mode {
        UlipMode::Regular => {
            ensure_positive("monthly_investment", request.monthly_investment)?;
            let premium = request.monthly_investment + request.periodic_topup;
            (
                premium * annuity_due_factor(i, months),
                premium * months as f64,
                format!("{:.0} monthly", premium),
            )
        }
        UlipMode::LumpSum => {
            ensure_positive("lump_sum", request.lump_sum)?;
            (
                request.lump_sum * growth,
                request.lump_sum,
                format!("{:.0} one-time", request.lump_sum),
            )
        }
    };
    let fv_existing = request.existing_investment * growth;
    let maturity = fv_contrib + fv_existing;
    let invested = contributed + request.existing_investment;

    Ok(UlipResult {
        mode: request.mode,
        tenure_years: request.tenure_years,
        expected_return: request.expected_return,
        total_invested: invested.round(),
        fv_contrib: fv_contrib.round(),
        fv_existing: fv_existing.round(),
        projected_maturity_value: maturity.round(),
        absolute_return_pct: round2((maturity - invested) / invested * 100.0),
        summary_message: format!(
            "Investing {} for {} years at {}% p.a. may grow to {:.0}",
            headline, request.tenure_years, request.expected_return, maturity
        ),
    })
}

/// How each side of the ULIP/SIP comparison is taxed at maturity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxModel {
    /// Equity MF: 10 % on gains above 1,00,000; ULIP pays 10 % CG tax
    #[default]
    Equity,
    /// Debt MF: 20 % on gains; ULIP pays 10 % CG tax
    Debt,
    /// ULIP maturity exempt under section 10(10D); SIP taxed as equity
    UlipExempt,
    None,
}

const EQUITY_GAIN_EXEMPTION: f64 = 100_000.0;

impl TaxModel {
    pub fn sip_tax(&self, gain: f64) -> f64 {
        let gain = gain.max(0.0);
        match self {
            TaxModel::Equity | TaxModel::UlipExempt => (gain - EQUITY_GAIN_EXEMPTION).max(0.0) * 0.10,
            TaxModel::Debt => gain * 0.20,
            TaxModel::None => 0.0,
        }
    }

    pub fn ulip_tax(&self, gain: f64) -> f64 {
        match self {
            TaxModel::UlipExempt | TaxModel::None => 0.0,
            TaxModel::Equity | TaxModel::Debt => gain.max(0.0) * 0.10,
        }
    }
}

fn default_term_premium() -> f64 {
    700.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UlipVsSipRequest {
    pub monthly_investment: f64,
    pub tenure_years: u32,
    pub sip_return_rate: f64,
    #[serde(default)]
    pub sip_expense_ratio: f64,
    pub ulip_return_rate: f64,
    #[serde(default, alias = "ulipFMC")]
    pub ulip_fmc: f64,
    #[serde(default)]
    pub ulip_other_charges: f64,
    #[serde(default)]
    pub include_term: bool,
    /// Monthly term-insurance premium carved out of the SIP
    #[serde(default = "default_term_premium")]
    pub term_premium: f64,
    #[serde(default)]
    pub tax_model: TaxModel,
}

impl UlipVsSipRequest {
    fn sip_net_rate(&self) -> f64 {
        self.sip_return_rate - self.sip_expense_ratio
    }

    fn ulip_net_rate(&self) -> f64 {
        self.ulip_return_rate - self.ulip_fmc - self.ulip_other_charges
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UlipSipOption {
    #[serde(rename = "SIP Investment")]
    Sip,
    #[serde(rename = "SIP + Term Plan")]
    SipWithTerm,
    #[serde(rename = "ULIP Investment")]
    Ulip,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SipOutcome {
    pub total_invested: f64,
    pub future_value: f64,
    pub estimated_tax: f64,
    pub post_tax_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UlipOutcome {
    pub total_premiums: f64,
    pub future_value: f64,
    pub estimated_tax: f64,
    pub net_payout: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UlipSipComparison {
    pub best_option: UlipSipOption,
    /// Best SIP route's post-tax value minus the ULIP payout
    pub cost_drag: f64,
    pub cost_drag_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UlipSipYear {
    pub year: u32,
    pub sip_value: f64,
    pub sip_post_tax: f64,
    pub sip_term_value: Option<f64>,
    pub sip_term_post_tax: Option<f64>,
    pub ulip_value: f64,
    pub best_option: UlipSipOption,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UlipVsSipResult {
    pub sip: SipOutcome,
    pub sip_term: Option<SipOutcome>,
    pub ulip: UlipOutcome,
    pub comparison: UlipSipComparison,
    pub year_wise_data: Vec<UlipSipYear>,
}

fn sip_outcome(monthly: f64, net_rate: f64, years: u32, tax: TaxModel) -> SipOutcome {
    let value = sip_future_value(monthly, net_rate, Frequency::Monthly, years);
    let invested = monthly * 12.0 * years as f64;
    let estimated_tax = tax.sip_tax(value - invested);
    SipOutcome {
        total_invested: invested,
        future_value: value,
        estimated_tax,
        post_tax_value: value - estimated_tax,
    }
}

fn ulip_outcome(request: &UlipVsSipRequest, years: u32) -> UlipOutcome {
    let value = sip_future_value(request.monthly_investment, request.ulip_net_rate(), Frequency::Monthly, years);
    let premiums = request.monthly_investment * 12.0 * years as f64;
    let estimated_tax = request.tax_model.ulip_tax(value - premiums);
    UlipOutcome {
        total_premiums: premiums,
        future_value: value,
        estimated_tax,
        net_payout: value - estimated_tax,
    }
}

fn best_of(sip: f64, sip_term: Option<f64>, ulip: f64) -> UlipSipOption {
    let mut best = (UlipSipOption::Sip, sip);
    if let Some(v) = sip_term {
        if v > best.1 {
            best = (UlipSipOption::SipWithTerm, v);
        }
    }
    if ulip > best.1 {
        best = (UlipSipOption::Ulip, ulip);
    }
    best.0
}

impl SipOutcome {
    fn rounded(self) -> Self {
        SipOutcome {
            total_invested: round2(self.total_invested),
            future_value: round2(self.future_value),
            estimated_tax: round2(self.estimated_tax),
            post_tax_value: round2(self.post_tax_value),
        }
    }
}

pub fn calculate_ulip_vs_sip(request: &UlipVsSipRequest) -> CalcResult<UlipVsSipResult> {
    ensure_positive("monthlyInvestment", request.monthly_investment)?;
    ensure_range("tenureYears", request.tenure_years as f64, 1.0, 50.0)?;
    ensure_range("sipReturnRate", request.sip_return_rate, 0.0, 50.0)?;
    ensure_range("ulipReturnRate", request.ulip_return_rate, 0.0, 50.0)?;
    ensure_range("sipExpenseRatio", request.sip_expense_ratio, 0.0, 5.0)?;
    ensure_non_negative("ulipFmc", request.ulip_fmc)?;
    ensure_non_negative("ulipOtherCharges", request.ulip_other_charges)?;
    if request.include_term && request.term_premium >= request.monthly_investment {
        return Err(CalcError::invalid(
            "termPremium",
            "term premium must be smaller than the monthly investment",
        ));
    }

    let tax = request.tax_model;
    let sip_net = request.sip_net_rate();
    let term_monthly = request.monthly_investment - request.term_premium;

    let year_wise_data = (1..=request.tenure_years)
        .map(|year| {
            let sip = sip_outcome(request.monthly_investment, sip_net, year, tax);
            let term = request
                .include_term
                .then(|| sip_outcome(term_monthly, sip_net, year, tax));
            let ulip = ulip_outcome(request, year);
            UlipSipYear {
                year,
                sip_value: sip.future_value.round(),
                sip_post_tax: sip.post_tax_value.round(),
                sip_term_value: term.map(|t| t.future_value.round()),
                sip_term_post_tax: term.map(|t| t.post_tax_value.round()),
                ulip_value: ulip.net_payout.round(),
                best_option: best_of(sip.post_tax_value, term.map(|t| t.post_tax_value), ulip.net_payout),
            }
        })
        .collect();

    let sip = sip_outcome(request.monthly_investment, sip_net, request.tenure_years, tax);
    let sip_term = request
        .include_term
        .then(|| sip_outcome(term_monthly, sip_net, request.tenure_years, tax));
    let ulip = ulip_outcome(request, request.tenure_years);

    let best_sip = sip_term.map(|t| t.post_tax_value).unwrap_or(sip.post_tax_value);
    let cost_drag = best_sip - ulip.net_payout;

    Ok(UlipVsSipResult {
        sip: sip.rounded(),
        sip_term: sip_term.map(SipOutcome::rounded),
        comparison: UlipSipComparison {
            best_option: best_of(sip.post_tax_value, sip_term.map(|t| t.post_tax_value), ulip.net_payout),
            cost_drag: round2(cost_drag),
            cost_drag_percentage: round2(cost_drag / best_sip * 100.0),
        },
        ulip: UlipOutcome {
            total_premiums: round2(ulip.total_premiums),
            future_value: round2(ulip.future_value),
            estimated_tax: round2(ulip.estimated_tax),
            net_payout: round2(ulip.net_payout),
        },
        year_wise_data,
    })
}
