//! Income tax under the old and new regimes, side by side

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, CalcResult};
use crate::rates::round2;
use crate::rules::TaxRules;
use crate::tax::{AgeGroup, SlabTax, TaxRegime};

/// Differences below this many rupees are reported as a tie
pub const REGIME_TIE_THRESHOLD: f64 = 100.0;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeTaxRequest {
    pub financial_year: Option<String>,
    pub age_group: AgeGroup,
    pub salary: f64,
    pub exempt_allowances: f64,
    pub self_occupied_property_loss: f64,
    pub rental_income: f64,
    pub digital_asset_income: f64,
    pub interest_home_loan_letout: f64,
    pub other_income: f64,
    pub section_80c: f64,
    pub section_80d: f64,
    pub section_80g: f64,
    pub section_80tta: f64,
    pub section_80ccd1: f64,
    pub section_80ccd2: f64,
    pub section_80eea: f64,
    pub other_deductions: f64,
}

impl IncomeTaxRequest {
    fn validate(&self) -> CalcResult<()> {
        let fields = [
            ("salary", self.salary),
            ("exempt_allowances", self.exempt_allowances),
            ("self_occupied_property_loss", self.self_occupied_property_loss),
            ("rental_income", self.rental_income),
            ("digital_asset_income", self.digital_asset_income),
            ("interest_home_loan_letout", self.interest_home_loan_letout),
            ("other_income", self.other_income),
            ("section_80c", self.section_80c),
            ("section_80d", self.section_80d),
            ("section_80g", self.section_80g),
            ("section_80tta", self.section_80tta),
            ("section_80ccd1", self.section_80ccd1),
            ("section_80ccd2", self.section_80ccd2),
            ("section_80eea", self.section_80eea),
            ("other_deductions", self.other_deductions),
        ];
        for (field, value) in fields {
            ensure_non_negative(field, value)?;
        }
        Ok(())
    }

    /// Gross total income after exempt allowances and house-property losses
    pub fn total_income(&self, rules: &TaxRules) -> f64 {
        let limits = &rules.deductions;
        self.salary + self.rental_income + self.digital_asset_income + self.other_income
            - self.exempt_allowances
            - self.self_occupied_property_loss.min(limits.home_loan_self_occupied)
            - self.interest_home_loan_letout.min(limits.home_loan_let_out)
    }

    /// Chapter VI-A deductions allowed under the old regime, each capped
    pub fn old_regime_deductions(&self, rules: &TaxRules) -> f64 {
        let limits = &rules.deductions;
        self.section_80c.min(limits.section_80c)
            + self.section_80d.min(limits.section_80d_cap(self.age_group.is_senior()))
            + self.section_80g
            + self.section_80tta.min(limits.section_80tta)
            + self.section_80ccd1.min(limits.section_80ccd_1b)
            + self.section_80ccd2
            + self.section_80eea.min(limits.section_80eea)
            + self.other_deductions
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeTax {
    pub regime: TaxRegime,
    pub taxable_income: f64,
    pub standard_deduction: f64,
    /// Deductions beyond the standard deduction
    pub total_deductions: f64,
    pub income_tax: f64,
    pub rebate: f64,
    pub cess: f64,
    pub total_tax: f64,
    pub slab_breakdown: Vec<SlabTax>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BetterRegime {
    #[serde(rename = "Old Regime")]
    Old,
    #[serde(rename = "New Regime")]
    New,
    #[serde(rename = "Both Similar")]
    Similar,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeTaxResult {
    pub total_income: f64,
    pub old_regime: RegimeTax,
    pub new_regime: RegimeTax,
    pub savings_amount: f64,
    pub better_regime: BetterRegime,
    pub financial_year: String,
    pub age_group: AgeGroup,
}

fn regime_tax(rules: &TaxRules, regime: TaxRegime, age: AgeGroup, total_income: f64, deductions: f64) -> RegimeTax {
    let standard = rules.standard_deduction(regime).min(total_income.max(0.0));
    let taxable = (total_income - standard - deductions).max(0.0);
    let liability = rules.tax_liability(regime, age, taxable);
    let slab_breakdown = rules
        .schedule(regime, age)
        .breakdown(taxable)
        .into_iter()
        .filter(|s| s.taxable_amount > 0.0)
        .map(|s| SlabTax {
            taxable_amount: round2(s.taxable_amount),
            tax: round2(s.tax),
            ..s
        })
        .collect();

    RegimeTax {
        regime,
        taxable_income: round2(taxable),
        standard_deduction: round2(standard),
        total_deductions: round2(deductions),
        income_tax: round2(liability.slab_tax),
        rebate: round2(liability.rebate),
        cess: round2(liability.cess),
        total_tax: round2(liability.total),
        slab_breakdown,
    }
}

pub fn calculate_income_tax(request: &IncomeTaxRequest, rules: &TaxRules) -> CalcResult<IncomeTaxResult> {
    request.validate()?;

    let total_income = request.total_income(rules);
    let old = regime_tax(
        rules,
        TaxRegime::Old,
        request.age_group,
        total_income,
        request.old_regime_deductions(rules),
    );
    // Employer NPS contribution is the one deduction the new regime keeps
    let new = regime_tax(rules, TaxRegime::New, request.age_group, total_income, request.section_80ccd2);

    let savings = old.total_tax - new.total_tax;
    let better_regime = if savings.abs() < REGIME_TIE_THRESHOLD {
        BetterRegime::Similar
    } else if savings > 0.0 {
        BetterRegime::New
    } else {
        BetterRegime::Old
    };
    debug!(
        "Income tax: total income {:.2}, old {:.2}, new {:.2}",
        total_income, old.total_tax, new.total_tax
    );

    Ok(IncomeTaxResult {
        total_income: round2(total_income),
        old_regime: old,
        new_regime: new,
        savings_amount: round2(savings.abs()),
        better_regime,
        financial_year: request
            .financial_year
            .clone()
            .unwrap_or_else(|| rules.financial_year.clone()),
        age_group: request.age_group,
    })
}
