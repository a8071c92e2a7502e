//! Capital gains on the sale of equity, funds, property, gold and crypto

use chrono::{Datelike, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_positive, CalcError, CalcResult};
use crate::rates::round2;
use crate::rules::TaxRules;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    EquityShare,
    EquityMf,
    DebtMf,
    Property,
    Gold,
    UnlistedShare,
    Crypto,
}

impl AssetType {
    /// Holding period after which a gain is long term; None when it never is
    pub fn long_term_after_days(&self) -> Option<i64> {
        match self {
            AssetType::EquityShare | AssetType::EquityMf => Some(365),
            AssetType::Property => Some(730),
            AssetType::DebtMf | AssetType::Gold | AssetType::UnlistedShare => Some(1095),
            AssetType::Crypto => None,
        }
    }

    pub fn is_equity(&self) -> bool {
        matches!(self, AssetType::EquityShare | AssetType::EquityMf)
    }

    /// Long-term gains on these assets use CII-indexed cost
    pub fn is_indexed(&self) -> bool {
        matches!(self, AssetType::Property | AssetType::Gold | AssetType::UnlistedShare)
    }

    pub fn name(&self) -> &'static str {
        match self {
            AssetType::EquityShare => "Listed equity shares",
            AssetType::EquityMf => "Equity mutual funds",
            AssetType::DebtMf => "Debt mutual funds",
            AssetType::Property => "Property",
            AssetType::Gold => "Gold",
            AssetType::UnlistedShare => "Unlisted shares",
            AssetType::Crypto => "Crypto (VDA)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CapitalGainsTaxMode {
    /// Slab-taxed gains go on top of `annual_income` under the new regime
    WithSlab,
    /// Slab-taxed gains use a flat assumed rate
    #[default]
    #[serde(alias = "without_slab")]
    Flat,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapitalGainsRequest {
    pub asset_type: AssetType,
    pub purchase_date: NaiveDate,
    pub sale_date: NaiveDate,
    pub purchase_value: f64,
    pub sale_value: f64,
    #[serde(default)]
    pub improvement_cost: f64,
    #[serde(default)]
    pub transfer_costs: f64,
    /// Reinvestment claimed under sections 54/54F/54EC
    #[serde(default)]
    pub exemption_amount: f64,
    #[serde(default)]
    pub annual_income: f64,
    #[serde(default)]
    pub tax_mode: CapitalGainsTaxMode,
    #[serde(default = "default_true")]
    pub apply_cess: bool,
    #[serde(default)]
    pub apply_surcharge: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExemptionDetails {
    pub ltcg_exemption: f64,
    pub section_exemption: f64,
    pub total_exemption: f64,
    pub exemption_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapitalGainsTax {
    pub base_tax: f64,
    pub surcharge: f64,
    pub cess: f64,
    pub total_tax: f64,
    /// Flat rate in percent; None when the gain is taxed at slab rates
    pub tax_rate: Option<f64>,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapitalGainsResult {
    pub holding_days: i64,
    pub is_long_term: bool,
    pub net_consideration: f64,
    pub base_cost: f64,
    pub indexed: bool,
    /// Negative for a loss
    pub gain: f64,
    pub exemption_details: ExemptionDetails,
    pub taxable_gain: f64,
    pub tax_details: CapitalGainsTax,
    pub after_tax_gain: f64,
    pub effective_rate: f64,
}

fn holding_days(purchase: NaiveDate, sale: NaiveDate) -> CalcResult<i64> {
    let days = (sale - purchase).num_days();
    if days < 0 {
        return Err(CalcError::invalid("saleDate", "must not be before the purchase date"));
    }
    Ok(days)
}

impl CapitalGainsRequest {
    fn validate(&self) -> CalcResult<()> {
        ensure_positive("purchaseValue", self.purchase_value)?;
        ensure_positive("saleValue", self.sale_value)?;
        ensure_non_negative("improvementCost", self.improvement_cost)?;
        ensure_non_negative("transferCosts", self.transfer_costs)?;
        ensure_non_negative("exemptionAmount", self.exemption_amount)?;
        ensure_non_negative("annualIncome", self.annual_income)?;
        Ok(())
    }

    fn exemptions(&self, rules: &TaxRules, gain: f64, long_term: bool) -> ExemptionDetails {
        let mut labels = Vec::new();
        let ltcg_exemption = if self.asset_type.is_equity() && long_term {
            let cap = rules.capital_gains.equity_ltcg_exemption(self.sale_date);
            labels.push(format!("Equity LTCG exemption up to {:.0}", cap));
            gain.min(cap)
        } else {
            0.0
        };
        let section_exemption = if self.asset_type == AssetType::Property && long_term && self.exemption_amount > 0.0 {
            let claimed = self.exemption_amount.min(gain - ltcg_exemption);
            labels.push(format!("Section 54/54F/54EC: {:.2}", claimed));
            claimed
        } else {
            0.0
        };
        ExemptionDetails {
            ltcg_exemption,
            section_exemption,
            total_exemption: ltcg_exemption + section_exemption,
            exemption_type: if labels.is_empty() {
                "No exemptions applicable".to_string()
            } else {
                labels.join(" + ")
            },
        }
    }

    /// Base tax, flat rate if any, and an explanation
    fn base_tax(&self, rules: &TaxRules, taxable: f64, long_term: bool) -> (f64, Option<f64>, String) {
        let cg = &rules.capital_gains;
        let flat = |rate: f64, why: String| (taxable * rate, Some(round2(rate * 100.0)), why);
        let slab = |why: &str| match self.tax_mode {
            CapitalGainsTaxMode::WithSlab => {
                let extra = rules.new_regime.tax_on(self.annual_income + taxable) - rules.new_regime.tax_on(self.annual_income);
                (extra, None, format!("{} taxed at slab rates on top of other income", why))
            }
            CapitalGainsTaxMode::Flat => (
                taxable * cg.assumed_slab_rate,
                Some(round2(cg.assumed_slab_rate * 100.0)),
                format!("{} taxed at slab rates (assumed flat rate)", why),
            ),
        };

        match (self.asset_type, long_term) {
            (AssetType::Crypto, _) => flat(cg.crypto_rate, "Crypto (VDA) gains are taxed at a flat rate".into()),
            (a, true) if a.is_equity() => flat(
                cg.equity_ltcg_rate(self.sale_date),
                format!("Equity LTCG{}", cutoff_note(rules, self.sale_date)),
            ),
            (a, false) if a.is_equity() => flat(
                cg.equity_stcg_rate(self.sale_date),
                format!("Equity STCG{}", cutoff_note(rules, self.sale_date)),
            ),
            (AssetType::DebtMf, true) => slab("Debt fund LTCG"),
            (a, true) => flat(cg.other_ltcg_rate, format!("{} LTCG with indexation", a.name())),
            (a, false) => slab(&format!("{} STCG", a.name())),
        }
    }
}

fn cutoff_note(rules: &TaxRules, sale_date: NaiveDate) -> String {
    let cutoff = rules.capital_gains.regime_cutoff.format("%d-%b-%Y");
    if rules.capital_gains.is_revised(sale_date) {
        format!(" (sold on or after {})", cutoff)
    } else {
        format!(" (sold before {})", cutoff)
    }
}

pub fn calculate_capital_gains(request: &CapitalGainsRequest, rules: &TaxRules) -> CalcResult<CapitalGainsResult> {
    request.validate()?;
    let days = holding_days(request.purchase_date, request.sale_date)?;
    let long_term = request
        .asset_type
        .long_term_after_days()
        .is_some_and(|threshold| days >= threshold);

    let indexed = long_term && request.asset_type.is_indexed();
    let base_cost = if indexed {
        let purchase_cii = rules.cost_inflation_index(request.purchase_date.year());
        let sale_cii = rules.cost_inflation_index(request.sale_date.year());
        request.purchase_value * sale_cii / purchase_cii
    } else {
        request.purchase_value
    };

    let net_consideration = request.sale_value - request.transfer_costs;
    let gain = net_consideration - base_cost - request.improvement_cost;
    let positive_gain = gain.max(0.0);
    let exemption_details = request.exemptions(rules, positive_gain, long_term);
    let taxable = (positive_gain - exemption_details.total_exemption).max(0.0);

    let tax_details = if taxable <= 0.0 {
        CapitalGainsTax {
            base_tax: 0.0,
            surcharge: 0.0,
            cess: 0.0,
            total_tax: 0.0,
            tax_rate: Some(0.0),
            explanation: "No tax as the taxable gain is zero".to_string(),
        }
    } else {
        let (base_tax, tax_rate, explanation) = request.base_tax(rules, taxable, long_term);
        let cg = &rules.capital_gains;
        let surcharge = if request.apply_surcharge && request.annual_income + taxable > cg.surcharge_threshold {
            base_tax * cg.surcharge_rate
        } else {
            0.0
        };
        let cess = if request.apply_cess {
            base_tax * rules.cess_rate
        } else {
            0.0
        };
        CapitalGainsTax {
            base_tax: round2(base_tax),
            surcharge: round2(surcharge),
            cess: round2(cess),
            total_tax: round2(base_tax + surcharge + cess),
            tax_rate,
            explanation,
        }
    };
    debug!(
        "Capital gains on {:?}: {} days, gain {:.2}, taxable {:.2}",
        request.asset_type, days, gain, taxable
    );

    let effective_rate = if positive_gain > 0.0 {
        tax_details.total_tax / positive_gain * 100.0
    } else {
        0.0
    };
    Ok(CapitalGainsResult {
        holding_days: days,
        is_long_term: long_term,
        net_consideration: round2(net_consideration),
        base_cost: round2(base_cost),
        indexed,
        gain: round2(gain),
        exemption_details: ExemptionDetails {
            ltcg_exemption: round2(exemption_details.ltcg_exemption),
            section_exemption: round2(exemption_details.section_exemption),
            total_exemption: round2(exemption_details.total_exemption),
            ..exemption_details
        },
        taxable_gain: round2(taxable),
        after_tax_gain: round2(gain - tax_details.total_tax),
        tax_details,
        effective_rate: round2(effective_rate),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GainClass {
    #[serde(rename = "STCG")]
    ShortTerm,
    #[serde(rename = "LTCG")]
    LongTerm,
}

/// Listed equity only: one year splits short from long term
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityGainsRequest {
    #[serde(default)]
    pub asset_type: Option<String>,
    pub purchase_date: NaiveDate,
    pub sale_date: NaiveDate,
    pub purchase_value: f64,
    pub sale_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityGainsResult {
    pub holding_days: i64,
    pub classification: GainClass,
    pub net_gain: f64,
    pub exemption: f64,
    pub taxable_gain: f64,
    /// Percent
    pub tax_rate: f64,
    pub tax: f64,
    pub effective_tax_percent: f64,
    pub tax_regime: String,
}

pub fn calculate_equity_gains(request: &EquityGainsRequest, rules: &TaxRules) -> CalcResult<EquityGainsResult> {
    ensure_positive("purchaseValue", request.purchase_value)?;
    ensure_positive("saleValue", request.sale_value)?;
    let days = holding_days(request.purchase_date, request.sale_date)?;
    let cg = &rules.capital_gains;

    let classification = if days >= 365 {
        GainClass::LongTerm
    } else {
        GainClass::ShortTerm
    };
    let net_gain = request.sale_value - request.purchase_value;
    let (exemption, rate) = match classification {
        GainClass::LongTerm => (cg.equity_ltcg_exemption(request.sale_date), cg.equity_ltcg_rate(request.sale_date)),
        GainClass::ShortTerm => (0.0, cg.equity_stcg_rate(request.sale_date)),
    };
    let (exemption, taxable) = if net_gain > 0.0 {
        (exemption, (net_gain - exemption).max(0.0))
    } else {
        (0.0, 0.0)
    };
    let tax = taxable * rate;

    let tax_regime = if cg.is_revised(request.sale_date) {
        format!("Revised rates (from {})", cg.regime_cutoff.format("%d-%b-%Y"))
    } else {
        format!("Earlier rates (before {})", cg.regime_cutoff.format("%d-%b-%Y"))
    };
    Ok(EquityGainsResult {
        holding_days: days,
        classification,
        net_gain: round2(net_gain),
        exemption: round2(exemption),
        taxable_gain: round2(taxable),
        tax_rate: round2(rate * 100.0),
        tax: round2(tax),
        effective_tax_percent: if net_gain > 0.0 { round2(tax / net_gain * 100.0) } else { 0.0 },
        tax_regime,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(asset: AssetType, bought: NaiveDate, sold: NaiveDate, cost: f64, price: f64) -> CapitalGainsRequest {
        CapitalGainsRequest {
            asset_type: asset,
            purchase_date: bought,
            sale_date: sold,
            purchase_value: cost,
            sale_value: price,
            improvement_cost: 0.0,
            transfer_costs: 0.0,
            exemption_amount: 0.0,
            annual_income: 0.0,
            tax_mode: CapitalGainsTaxMode::Flat,
            apply_cess: true,
            apply_surcharge: false,
        }
    }

    #[test]
    fn test_equity_ltcg_after_cutoff() {
        let rules = TaxRules::default_rules();
        let req = request(AssetType::EquityShare, date(2022, 1, 1), date(2024, 8, 1), 500_000.0, 800_000.0);
        let r = calculate_capital_gains(&req, &rules).unwrap();
        assert!(r.is_long_term);
        assert_eq!(r.exemption_details.ltcg_exemption, 125_000.0);
        assert_eq!(r.taxable_gain, 175_000.0);
        assert_eq!(r.tax_details.base_tax, 21_875.0);
        assert_eq!(r.tax_details.cess, 875.0);
        assert_eq!(r.tax_details.total_tax, 22_750.0);
        assert_eq!(r.tax_details.tax_rate, Some(12.5));
    }

    #[test]
    fn test_property_indexation_and_section_54() {
        let rules = TaxRules::default_rules();
        let mut req = request(AssetType::Property, date(2010, 6, 1), date(2024, 6, 1), 2_000_000.0, 6_000_000.0);
        req.exemption_amount = 1_000_000.0;
        let r = calculate_capital_gains(&req, &rules).unwrap();
        assert!(r.indexed);
        let base = 2_000_000.0 * 363.0 / 167.0;
        assert_abs_diff_eq!(r.base_cost, base, epsilon = 0.01);
        assert_eq!(r.exemption_details.section_exemption, 1_000_000.0);
        assert_abs_diff_eq!(r.taxable_gain, 6_000_000.0 - base - 1_000_000.0, epsilon = 0.01);
    }

    #[test]
    fn test_crypto_never_long_term() {
        let rules = TaxRules::default_rules();
        let req = request(AssetType::Crypto, date(2020, 1, 1), date(2024, 1, 1), 100_000.0, 200_000.0);
        let r = calculate_capital_gains(&req, &rules).unwrap();
        assert!(!r.is_long_term);
        assert_eq!(r.tax_details.base_tax, 30_000.0);
    }

    #[test]
    fn test_slab_mode_stacks_on_income() {
        let rules = TaxRules::default_rules();
        let mut req = request(AssetType::DebtMf, date(2024, 1, 1), date(2024, 6, 1), 1_000_000.0, 1_200_000.0);
        req.tax_mode = CapitalGainsTaxMode::WithSlab;
        req.annual_income = 1_000_000.0;
        req.apply_cess = false;
        let r = calculate_capital_gains(&req, &rules).unwrap();
        // new-regime tax on 12L less tax on 10L
        assert_abs_diff_eq!(r.tax_details.total_tax, 30_000.0, epsilon = 0.01);
        assert_eq!(r.tax_details.tax_rate, None);
    }

    #[test]
    fn test_loss_and_bad_dates() {
        let rules = TaxRules::default_rules();
        let loss = request(AssetType::Gold, date(2023, 1, 1), date(2024, 1, 1), 500_000.0, 400_000.0);
        let r = calculate_capital_gains(&loss, &rules).unwrap();
        assert_eq!(r.gain, -100_000.0);
        assert_eq!(r.tax_details.total_tax, 0.0);

        let backwards = request(AssetType::Gold, date(2024, 1, 1), date(2023, 1, 1), 1.0, 2.0);
        assert!(calculate_capital_gains(&backwards, &rules).is_err());
    }

    #[test]
    fn test_equity_gains_simplified() {
        let rules = TaxRules::default_rules();
        let req: EquityGainsRequest = serde_json::from_str(
            r#"{"purchaseDate": "2022-01-01", "saleDate": "2024-01-01",
                "purchaseValue": 100000, "saleValue": 300000}"#,
        )
        .unwrap();
        let r = calculate_equity_gains(&req, &rules).unwrap();
        assert_eq!(r.classification, GainClass::LongTerm);
        assert_eq!(r.exemption, 100_000.0);
        assert_eq!(r.tax, 10_000.0);
        assert_eq!(r.effective_tax_percent, 5.0);

        let short = EquityGainsRequest {
            asset_type: None,
            purchase_date: date(2024, 8, 1),
            sale_date: date(2025, 1, 1),
            purchase_value: 100_000.0,
            sale_value: 150_000.0,
        };
        let r = calculate_equity_gains(&short, &rules).unwrap();
        assert_eq!(r.classification, GainClass::ShortTerm);
        assert_eq!(r.tax, 10_000.0);
        assert_eq!(serde_json::to_value(&r).unwrap()["classification"], "STCG");
    }
}
