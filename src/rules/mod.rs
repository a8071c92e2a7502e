//! Statutory constants used by the tax calculators
//!
//! `TaxRules::default_rules()` carries the FY 2024-25 values. Any table can be
//! replaced from CSV files on disk (see `loader`).

pub mod loader;

pub use loader::{LoadedRules, DEFAULT_RULES_PATH};

use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{CalcError, CalcResult};
use crate::tax::{AgeGroup, SlabSchedule, TaxRegime};

/// Section 87A rebate: tax up to `max_rebate` is waived when taxable income
/// does not exceed `income_limit`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rebate {
    pub income_limit: f64,
    pub max_rebate: f64,
}

impl Rebate {
    pub fn apply(&self, taxable_income: f64, tax: f64) -> f64 {
        if taxable_income <= self.income_limit {
            tax.min(self.max_rebate)
        } else {
            0.0
        }
    }
}

/// Caps on Chapter VI-A deductions and house-property interest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeductionLimits {
    pub section_80c: f64,
    pub section_80d: f64,
    /// 80D cap when the insured is a senior citizen
    pub section_80d_senior: f64,
    pub section_80tta: f64,
    pub section_80ccd_1b: f64,
    pub section_80eea: f64,
    pub home_loan_self_occupied: f64,
    pub home_loan_let_out: f64,
}

impl Default for DeductionLimits {
    fn default() -> Self {
        Self {
            section_80c: 150_000.0,
            section_80d: 25_000.0,
            section_80d_senior: 50_000.0,
            section_80tta: 10_000.0,
            section_80ccd_1b: 50_000.0,
            section_80eea: 150_000.0,
            home_loan_self_occupied: 200_000.0,
            home_loan_let_out: 300_000.0,
        }
    }
}

impl DeductionLimits {
    pub fn section_80d_cap(&self, senior: bool) -> f64 {
        if senior {
            self.section_80d_senior
        } else {
            self.section_80d
        }
    }
}

/// Capital-gains rates; "before"/"after" straddle `regime_cutoff`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalGainsRules {
    /// Sales on or after this date use the revised rates
    pub regime_cutoff: NaiveDate,
    pub equity_ltcg_exemption_before: f64,
    pub equity_ltcg_exemption_after: f64,
    pub equity_ltcg_rate_before: f64,
    pub equity_ltcg_rate_after: f64,
    pub equity_stcg_rate_before: f64,
    pub equity_stcg_rate_after: f64,
    pub other_ltcg_rate: f64,
    pub crypto_rate: f64,
    /// Flat rate standing in for the slab rate when no income is supplied
    pub assumed_slab_rate: f64,
    pub surcharge_threshold: f64,
    pub surcharge_rate: f64,
}

impl Default for CapitalGainsRules {
    fn default() -> Self {
        Self {
            regime_cutoff: NaiveDate::from_ymd_opt(2024, 7, 23).unwrap_or_default(),
            equity_ltcg_exemption_before: 100_000.0,
            equity_ltcg_exemption_after: 125_000.0,
            equity_ltcg_rate_before: 0.10,
            equity_ltcg_rate_after: 0.125,
            equity_stcg_rate_before: 0.15,
            equity_stcg_rate_after: 0.20,
            other_ltcg_rate: 0.20,
            crypto_rate: 0.30,
            assumed_slab_rate: 0.20,
            surcharge_threshold: 5_000_000.0,
            surcharge_rate: 0.10,
        }
    }
}

impl CapitalGainsRules {
    pub fn is_revised(&self, sale_date: NaiveDate) -> bool {
        sale_date >= self.regime_cutoff
    }

    pub fn equity_ltcg_exemption(&self, sale_date: NaiveDate) -> f64 {
        if self.is_revised(sale_date) {
            self.equity_ltcg_exemption_after
        } else {
            self.equity_ltcg_exemption_before
        }
    }

    pub fn equity_ltcg_rate(&self, sale_date: NaiveDate) -> f64 {
        if self.is_revised(sale_date) {
            self.equity_ltcg_rate_after
        } else {
            self.equity_ltcg_rate_before
        }
    }

    pub fn equity_stcg_rate(&self, sale_date: NaiveDate) -> f64 {
        if self.is_revised(sale_date) {
            self.equity_stcg_rate_after
        } else {
            self.equity_stcg_rate_before
        }
    }
}

/// Every statutory constant the tax calculators read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRules {
    pub financial_year: String,
    pub old_below_60: SlabSchedule,
    pub old_senior: SlabSchedule,
    pub old_super_senior: SlabSchedule,
    pub new_regime: SlabSchedule,
    /// Health and education cess as a decimal
    pub cess_rate: f64,
    pub standard_deduction_old: f64,
    pub standard_deduction_new: f64,
    pub rebate_old: Rebate,
    pub rebate_new: Rebate,
    pub deductions: DeductionLimits,
    pub capital_gains: CapitalGainsRules,
    /// Cost inflation index keyed by calendar year
    pub cost_inflation_index: BTreeMap<i32, f64>,
    pub gratuity_exemption_cap: f64,
}

pub(crate) fn default_old_below_60() -> CalcResult<SlabSchedule> {
    SlabSchedule::from_bands(&[
        (Some(250_000.0), 0.0),
        (Some(500_000.0), 5.0),
        (Some(1_000_000.0), 20.0),
        (None, 30.0),
    ])
}

pub(crate) fn default_old_senior() -> CalcResult<SlabSchedule> {
    SlabSchedule::from_bands(&[
        (Some(300_000.0), 0.0),
        (Some(500_000.0), 5.0),
        (Some(1_000_000.0), 20.0),
        (None, 30.0),
    ])
}

pub(crate) fn default_old_super_senior() -> CalcResult<SlabSchedule> {
    SlabSchedule::from_bands(&[(Some(500_000.0), 0.0), (Some(1_000_000.0), 20.0), (None, 30.0)])
}

pub(crate) fn default_new_regime() -> CalcResult<SlabSchedule> {
    SlabSchedule::from_bands(&[
        (Some(300_000.0), 0.0),
        (Some(600_000.0), 5.0),
        (Some(900_000.0), 10.0),
        (Some(1_200_000.0), 15.0),
        (Some(1_500_000.0), 20.0),
        (None, 30.0),
    ])
}

pub(crate) fn default_cost_inflation_index() -> BTreeMap<i32, f64> {
    [
        (2001, 100.0),
        (2002, 105.0),
        (2003, 109.0),
        (2004, 113.0),
        (2005, 117.0),
        (2006, 122.0),
        (2007, 129.0),
        (2008, 137.0),
        (2009, 148.0),
        (2010, 167.0),
        (2011, 184.0),
        (2012, 200.0),
        (2013, 220.0),
        (2014, 240.0),
        (2015, 254.0),
        (2016, 264.0),
        (2017, 272.0),
        (2018, 280.0),
        (2019, 289.0),
        (2020, 301.0),
        (2021, 317.0),
        (2022, 331.0),
        (2023, 348.0),
        (2024, 363.0),
        (2025, 380.0),
    ]
    .into_iter()
    .collect()
}

impl TaxRules {
    /// Built-in FY 2024-25 rules
    pub fn default_rules() -> Self {
        Self::try_default().unwrap_or_else(|e| unreachable!("built-in slab tables are valid: {}", e))
    }

    fn try_default() -> CalcResult<Self> {
        Ok(Self {
            financial_year: "2024-25".to_string(),
            old_below_60: default_old_below_60()?,
            old_senior: default_old_senior()?,
            old_super_senior: default_old_super_senior()?,
            new_regime: default_new_regime()?,
            cess_rate: 0.04,
            standard_deduction_old: 50_000.0,
            standard_deduction_new: 50_000.0,
            rebate_old: Rebate {
                income_limit: 500_000.0,
                max_rebate: 12_500.0,
            },
            rebate_new: Rebate {
                income_limit: 700_000.0,
                max_rebate: 25_000.0,
            },
            deductions: DeductionLimits::default(),
            capital_gains: CapitalGainsRules::default(),
            cost_inflation_index: default_cost_inflation_index(),
            gratuity_exemption_cap: 2_000_000.0,
        })
    }

    /// Load rules from the default location (data/tax_rules/)
    pub fn from_csv() -> CalcResult<Self> {
        Self::from_csv_path(Path::new(DEFAULT_RULES_PATH))
    }

    /// Load rules from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> CalcResult<Self> {
        let loaded = LoadedRules::load_from(path)?;
        loaded.into_rules()
    }

    pub fn old_regime(&self, age_group: AgeGroup) -> &SlabSchedule {
        match age_group {
            AgeGroup::Below60 => &self.old_below_60,
            AgeGroup::Senior => &self.old_senior,
            AgeGroup::SuperSenior => &self.old_super_senior,
        }
    }

    pub fn schedule(&self, regime: TaxRegime, age_group: AgeGroup) -> &SlabSchedule {
        match regime {
            TaxRegime::Old => self.old_regime(age_group),
            TaxRegime::New => &self.new_regime,
        }
    }

    pub fn standard_deduction(&self, regime: TaxRegime) -> f64 {
        match regime {
            TaxRegime::Old => self.standard_deduction_old,
            TaxRegime::New => self.standard_deduction_new,
        }
    }

    pub fn rebate(&self, regime: TaxRegime) -> Rebate {
        match regime {
            TaxRegime::Old => self.rebate_old,
            TaxRegime::New => self.rebate_new,
        }
    }

    /// Slab tax, 87A rebate and cess on an already-reduced taxable income
    pub fn tax_liability(&self, regime: TaxRegime, age_group: AgeGroup, taxable_income: f64) -> TaxLiability {
        let slab_tax = self.schedule(regime, age_group).tax_on(taxable_income);
        let rebate = self.rebate(regime).apply(taxable_income, slab_tax);
        let after_rebate = slab_tax - rebate;
        let cess = after_rebate * self.cess_rate;
        TaxLiability {
            slab_tax,
            rebate,
            cess,
            total: after_rebate + cess,
        }
    }

    /// CII for `year`, clamped to the table's range
    pub fn cost_inflation_index(&self, year: i32) -> f64 {
        if let Some(v) = self.cost_inflation_index.get(&year) {
            return *v;
        }
        let clamped = match (
            self.cost_inflation_index.first_key_value(),
            self.cost_inflation_index.last_key_value(),
        ) {
            (Some((first, v)), _) if year < *first => (*first, *v),
            (_, Some((last, v))) if year > *last => (*last, *v),
            // Gap inside the table: nearest earlier year
            _ => match self.cost_inflation_index.range(..year).next_back() {
                Some((y, v)) => (*y, *v),
                None => return 100.0,
            },
        };
        warn!("No cost inflation index for {}, using {} ({})", year, clamped.0, clamped.1);
        clamped.1
    }

    /// Consistency checks applied after loading from disk
    pub fn validate(&self) -> CalcResult<()> {
        if !(0.0..1.0).contains(&self.cess_rate) {
            return Err(CalcError::Rules(format!("cess_rate {} outside [0, 1)", self.cess_rate)));
        }
        if self.cost_inflation_index.is_empty() {
            return Err(CalcError::Rules("cost inflation index table is empty".into()));
        }
        if let Some((year, idx)) = self.cost_inflation_index.iter().find(|(_, v)| **v <= 0.0) {
            return Err(CalcError::Rules(format!("cost inflation index for {} is {}", year, idx)));
        }
        Ok(())
    }
}

impl Default for TaxRules {
    fn default() -> Self {
        Self::default_rules()
    }
}

/// Result of applying slabs, rebate and cess
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxLiability {
    pub slab_tax: f64,
    pub rebate: f64,
    pub cess: f64,
    pub total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_rules() {
        let rules = TaxRules::default_rules();
        assert_eq!(rules.financial_year, "2024-25");
        assert_eq!(rules.old_regime(AgeGroup::Senior).slabs()[0].upper, Some(300_000.0));
        assert_eq!(rules.old_regime(AgeGroup::SuperSenior).slabs()[0].upper, Some(500_000.0));
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn test_cost_inflation_index_clamps() {
        let rules = TaxRules::default_rules();
        assert_eq!(rules.cost_inflation_index(2010), 167.0);
        assert_eq!(rules.cost_inflation_index(1995), 100.0);
        assert_eq!(rules.cost_inflation_index(2030), 380.0);
    }

    #[test]
    fn test_rebate_wipes_tax_below_limit() {
        let rules = TaxRules::default_rules();
        // New regime at exactly 7L: 15,000 + 10,000 slab tax, fully rebated
        let at_limit = rules.tax_liability(TaxRegime::New, AgeGroup::Below60, 700_000.0);
        assert_abs_diff_eq!(at_limit.slab_tax, 25_000.0, epsilon = 1e-9);
        assert_eq!(at_limit.total, 0.0);

        let above = rules.tax_liability(TaxRegime::New, AgeGroup::Below60, 800_000.0);
        assert_eq!(above.rebate, 0.0);
        assert_abs_diff_eq!(above.total, 35_000.0 * 1.04, epsilon = 1e-9);
    }

    #[test]
    fn test_capital_gains_cutoff() {
        let cg = CapitalGainsRules::default();
        let before = NaiveDate::from_ymd_opt(2024, 7, 22).unwrap();
        let on = NaiveDate::from_ymd_opt(2024, 7, 23).unwrap();
        assert_eq!(cg.equity_ltcg_exemption(before), 100_000.0);
        assert_eq!(cg.equity_ltcg_exemption(on), 125_000.0);
        assert_eq!(cg.equity_stcg_rate(on), 0.20);
    }
}
