//! Cost-to-company breakdown and take-home salary

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_positive, ensure_range, CalcResult};
use crate::rates::round2;
use crate::rules::TaxRules;
use crate::tax::hra::{hra_exemption, CityType};
use crate::tax::{AgeGroup, TaxRegime};

fn default_basic_pct() -> f64 {
    40.0
}

fn default_hra_pct() -> f64 {
    40.0
}

fn default_pf_pct() -> f64 {
    12.0
}

fn default_gratuity_pct() -> f64 {
    4.81
}

fn default_professional_tax() -> f64 {
    2_400.0
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CtcRequest {
    pub annual_ctc: f64,
    /// Basic salary as a percentage of CTC
    #[serde(default = "default_basic_pct")]
    pub basic_salary_percent: f64,
    /// HRA as a percentage of basic
    #[serde(default = "default_hra_pct")]
    pub hra_percent: f64,
    #[serde(default)]
    pub special_allowance: f64,
    #[serde(default)]
    pub bonus_amount: f64,
    #[serde(default = "default_pf_pct")]
    pub employer_pf_percent: f64,
    #[serde(default = "default_pf_pct")]
    pub employee_pf_percent: f64,
    #[serde(default = "default_gratuity_pct")]
    pub gratuity_percent: f64,
    /// Annual professional tax
    #[serde(default = "default_professional_tax")]
    pub professional_tax: f64,
    #[serde(default)]
    pub tax_regime: TaxRegime,
    #[serde(default)]
    pub metro_city: bool,
    #[serde(default)]
    pub monthly_rent: f64,
    #[serde(default)]
    pub section_80c: f64,
    #[serde(default)]
    pub section_80ccd1b: f64,
    #[serde(default)]
    pub section_80d: f64,
    /// Self or spouse is a senior citizen
    #[serde(default)]
    pub senior_citizens: bool,
    /// Parents' premiums are included in the 80D claim
    #[serde(default)]
    pub include_parents: bool,
    #[serde(default)]
    pub section_80tta: f64,
    #[serde(default)]
    pub home_loan_interest: f64,
    #[serde(default)]
    pub property_rented_out: bool,
    #[serde(default = "default_true")]
    pub epf_applicable: bool,
    #[serde(default = "default_true")]
    pub professional_tax_applicable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CtcResult {
    pub annual_ctc: f64,
    pub tax_regime: TaxRegime,
    pub basic_salary_monthly: f64,
    pub hra_monthly: f64,
    pub special_allowance_monthly: f64,
    pub bonus_monthly: f64,
    pub gross_salary_monthly: f64,
    pub employee_pf_monthly: f64,
    pub professional_tax_monthly: f64,
    pub income_tax_monthly: f64,
    pub total_deductions_monthly: f64,
    pub employer_pf_monthly: f64,
    pub gratuity_monthly: f64,
    pub total_contributions_monthly: f64,
    pub monthly_takehome: f64,
    pub takehome_annual: f64,
    pub takehome_percentage: f64,
    pub total_deductions_annual: f64,
    pub total_contributions_annual: f64,
    pub hra_exemption: f64,
    /// Deductions subtracted from gross salary before slabs
    pub tax_deductions: f64,
    pub taxable_income: f64,
    pub income_tax_annual: f64,
}

impl CtcRequest {
    fn validate(&self) -> CalcResult<()> {
        ensure_positive("annual_ctc", self.annual_ctc)?;
        ensure_range("basic_salary_percent", self.basic_salary_percent, 30.0, 60.0)?;
        ensure_range("hra_percent", self.hra_percent, 0.0, 100.0)?;
        ensure_range("employer_pf_percent", self.employer_pf_percent, 0.0, 100.0)?;
        ensure_range("employee_pf_percent", self.employee_pf_percent, 0.0, 100.0)?;
        ensure_range("gratuity_percent", self.gratuity_percent, 0.0, 100.0)?;
        let amounts = [
            ("special_allowance", self.special_allowance),
            ("bonus_amount", self.bonus_amount),
            ("professional_tax", self.professional_tax),
            ("monthly_rent", self.monthly_rent),
            ("section_80c", self.section_80c),
            ("section_80ccd1b", self.section_80ccd1b),
            ("section_80d", self.section_80d),
            ("section_80tta", self.section_80tta),
            ("home_loan_interest", self.home_loan_interest),
        ];
        for (field, value) in amounts {
            ensure_non_negative(field, value)?;
        }
        Ok(())
    }

    /// 80D cap for self plus, when claimed, parents
    fn health_insurance_cap(&self, rules: &TaxRules) -> f64 {
        let own = rules.deductions.section_80d_cap(self.senior_citizens);
        if self.include_parents {
            own + rules.deductions.section_80d_cap(self.senior_citizens)
        } else {
            own
        }
    }
}

pub fn calculate_ctc(request: &CtcRequest, rules: &TaxRules) -> CalcResult<CtcResult> {
    request.validate()?;

    let ctc = request.annual_ctc;
    let basic = ctc * request.basic_salary_percent / 100.0;
    let hra = basic * request.hra_percent / 100.0;
    let employer_pf = basic * request.employer_pf_percent / 100.0;
    let gratuity = basic * request.gratuity_percent / 100.0;
    let gross = ctc - employer_pf - gratuity;

    let employee_pf = if request.epf_applicable {
        basic * request.employee_pf_percent / 100.0
    } else {
        0.0
    };
    let professional_tax = if request.professional_tax_applicable {
        request.professional_tax
    } else {
        0.0
    };

    let regime = request.tax_regime;
    let city = if request.metro_city {
        CityType::Metro
    } else {
        CityType::NonMetro
    };
    let hra_exempt = match regime {
        TaxRegime::Old => hra_exemption(basic, hra, request.monthly_rent * 12.0, city),
        TaxRegime::New => 0.0,
    };

    let standard = rules.standard_deduction(regime).min(gross);
    let deductions = match regime {
        TaxRegime::Old => {
            let limits = &rules.deductions;
            let home_loan_cap = if request.property_rented_out {
                limits.home_loan_let_out
            } else {
                limits.home_loan_self_occupied
            };
            standard
                + employee_pf
                + hra_exempt
                + request.section_80c.min(limits.section_80c)
                + request.section_80ccd1b.min(limits.section_80ccd_1b)
                + request.section_80d.min(request.health_insurance_cap(rules))
                + request.section_80tta.min(limits.section_80tta)
                + request.home_loan_interest.min(home_loan_cap)
        }
        TaxRegime::New => standard,
    };

    let taxable = (gross - deductions).max(0.0);
    let age = if request.senior_citizens {
        AgeGroup::Senior
    } else {
        AgeGroup::Below60
    };
    let income_tax = rules.tax_liability(regime, age, taxable).total;
    debug!("CTC {:.2}: gross {:.2}, taxable {:.2}, tax {:.2}", ctc, gross, taxable, income_tax);

    let total_deductions = employee_pf + professional_tax + income_tax;
    let takehome = gross - total_deductions;
    let contributions = employer_pf + gratuity;

    Ok(CtcResult {
        annual_ctc: round2(ctc),
        tax_regime: regime,
        basic_salary_monthly: round2(basic / 12.0),
        hra_monthly: round2(hra / 12.0),
        special_allowance_monthly: round2(request.special_allowance / 12.0),
        bonus_monthly: round2(request.bonus_amount / 12.0),
        gross_salary_monthly: round2(gross / 12.0),
        employee_pf_monthly: round2(employee_pf / 12.0),
        professional_tax_monthly: round2(professional_tax / 12.0),
        income_tax_monthly: round2(income_tax / 12.0),
        total_deductions_monthly: round2(total_deductions / 12.0),
        employer_pf_monthly: round2(employer_pf / 12.0),
        gratuity_monthly: round2(gratuity / 12.0),
        total_contributions_monthly: round2(contributions / 12.0),
        monthly_takehome: round2(takehome / 12.0),
        takehome_annual: round2(takehome),
        takehome_percentage: round2(takehome / ctc * 100.0),
        total_deductions_annual: round2(total_deductions),
        total_contributions_annual: round2(contributions),
        hra_exemption: round2(hra_exempt),
        tax_deductions: round2(deductions),
        taxable_income: round2(taxable),
        income_tax_annual: round2(income_tax),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn request(regime: &str) -> CtcRequest {
        serde_json::from_value(serde_json::json!({
            "annual_ctc": 1_200_000,
            "tax_regime": regime,
            "metro_city": true,
            "monthly_rent": 20_000,
            "section_80c": 50_000
        }))
        .unwrap()
    }

    #[test]
    fn test_new_regime_breakdown() {
        let rules = TaxRules::default_rules();
        let r = calculate_ctc(&request("new"), &rules).unwrap();
        // basic 4.8L, employer PF 57,600, gratuity 23,088
        assert_eq!(r.basic_salary_monthly, 40_000.0);
        assert_eq!(r.employer_pf_monthly, 4_800.0);
        let gross = 1_200_000.0 - 57_600.0 - 23_088.0;
        assert_abs_diff_eq!(r.gross_salary_monthly * 12.0, gross, epsilon = 0.06);
        assert_eq!(r.hra_exemption, 0.0);
        assert_abs_diff_eq!(r.taxable_income, gross - 50_000.0, epsilon = 0.01);
        // 10,69,312 taxable: 15,000 + 30,000 + 15% of 1,69,312
        let tax = (45_000.0 + 169_312.0 * 0.15) * 1.04;
        assert_abs_diff_eq!(r.income_tax_annual, tax, epsilon = 0.01);
        let takehome = gross - 57_600.0 - 2_400.0 - tax;
        assert_abs_diff_eq!(r.takehome_annual, takehome, epsilon = 0.01);
    }

    #[test]
    fn test_old_regime_uses_hra_and_80c() {
        let rules = TaxRules::default_rules();
        let r = calculate_ctc(&request("old"), &rules).unwrap();
        // min(HRA 1.92L, 50% of basic 2.4L, rent 2.4L - 48k)
        assert_eq!(r.hra_exemption, 192_000.0);
        assert_eq!(r.tax_deductions, 50_000.0 + 57_600.0 + 192_000.0 + 50_000.0);
        let new = calculate_ctc(&request("new"), &rules).unwrap();
        assert!(r.taxable_income < new.taxable_income);
    }

    #[test]
    fn test_basic_share_range() {
        let mut req = request("new");
        req.basic_salary_percent = 70.0;
        assert!(calculate_ctc(&req, &TaxRules::default_rules()).is_err());
    }
}
