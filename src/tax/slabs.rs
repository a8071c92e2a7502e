//! Progressive tax slab evaluation
//!
//! A slab covers the half-open band `(lower, upper]`: income sitting exactly on
//! a boundary is taxed entirely at the lower band's rate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CalcError, CalcResult};

/// Taxpayer age bracket used to pick the old-regime schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AgeGroup {
    #[default]
    #[serde(rename = "0-60")]
    Below60,
    #[serde(rename = "60-80")]
    Senior,
    #[serde(rename = "80+")]
    SuperSenior,
}

impl AgeGroup {
    pub fn is_senior(&self) -> bool {
        !matches!(self, AgeGroup::Below60)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Below60 => "0-60",
            AgeGroup::Senior => "60-80",
            AgeGroup::SuperSenior => "80+",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgeGroup {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0-60" | "below60" => Ok(AgeGroup::Below60),
            "60-80" | "senior" => Ok(AgeGroup::Senior),
            "80+" | "super-senior" => Ok(AgeGroup::SuperSenior),
            other => Err(CalcError::invalid("age_group", format!("unknown age group '{}'", other))),
        }
    }
}

/// Which income-tax regime a computation follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaxRegime {
    Old,
    #[default]
    New,
}

/// One band of a progressive schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxSlab {
    /// Exclusive lower bound of the band
    pub lower: f64,
    /// Inclusive upper bound; None for the top band
    pub upper: Option<f64>,
    /// Marginal rate as a decimal (0.05 = 5%)
    pub rate: f64,
}

/// Tax attributable to a single slab
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlabTax {
    pub lower: f64,
    pub upper: Option<f64>,
    pub rate_pct: f64,
    pub taxable_amount: f64,
    pub tax: f64,
}

/// A validated progressive schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlabSchedule {
    slabs: Vec<TaxSlab>,
}

impl SlabSchedule {
    /// Build from slabs that start at zero, are contiguous and ascending,
    /// with only the final slab open-ended
    pub fn new(slabs: Vec<TaxSlab>) -> CalcResult<Self> {
        if slabs.is_empty() {
            return Err(CalcError::Rules("slab schedule is empty".into()));
        }
        if slabs[0].lower != 0.0 {
            return Err(CalcError::Rules(format!(
                "first slab must start at 0, starts at {}",
                slabs[0].lower
            )));
        }
        for (i, slab) in slabs.iter().enumerate() {
            if !(0.0..=1.0).contains(&slab.rate) {
                return Err(CalcError::Rules(format!("slab {} has rate {} outside [0, 1]", i, slab.rate)));
            }
            let is_last = i == slabs.len() - 1;
            match slab.upper {
                None if !is_last => {
                    return Err(CalcError::Rules(format!("slab {} is open-ended but not last", i)));
                }
                Some(upper) => {
                    if upper <= slab.lower {
                        return Err(CalcError::Rules(format!("slab {} has upper {} <= lower {}", i, upper, slab.lower)));
                    }
                    if let Some(next) = slabs.get(i + 1) {
                        if (next.lower - upper).abs() > 1e-9 {
                            return Err(CalcError::Rules(format!(
                                "gap between slab {} (upper {}) and slab {} (lower {})",
                                i,
                                upper,
                                i + 1,
                                next.lower
                            )));
                        }
                    }
                }
                None => {}
            }
        }
        Ok(Self { slabs })
    }

    /// Build from `(upper, rate_pct)` pairs; the last upper may be None
    pub fn from_bands(bands: &[(Option<f64>, f64)]) -> CalcResult<Self> {
        let mut lower = 0.0;
        let mut slabs = Vec::with_capacity(bands.len());
        for &(upper, rate_pct) in bands {
            slabs.push(TaxSlab {
                lower,
                upper,
                rate: rate_pct / 100.0,
            });
            lower = upper.unwrap_or(f64::INFINITY);
        }
        Self::new(slabs)
    }

    pub fn slabs(&self) -> &[TaxSlab] {
        &self.slabs
    }

    /// Tax on `income` before rebate and cess
    pub fn tax_on(&self, income: f64) -> f64 {
        self.breakdown(income).iter().map(|s| s.tax).sum()
    }

    /// Per-slab taxable amount and tax for `income`
    pub fn breakdown(&self, income: f64) -> Vec<SlabTax> {
        let income = income.max(0.0);
        self.slabs
            .iter()
            .map(|slab| {
                let top = slab.upper.map_or(income, |u| income.min(u));
                let taxable_amount = (top - slab.lower).max(0.0);
                SlabTax {
                    lower: slab.lower,
                    upper: slab.upper,
                    rate_pct: slab.rate * 100.0,
                    taxable_amount,
                    tax: taxable_amount * slab.rate,
                }
            })
            .collect()
    }

    /// Rate applying to the next rupee above `income`
    pub fn marginal_rate(&self, income: f64) -> f64 {
        self.slabs
            .iter()
            .find(|s| s.upper.map_or(true, |u| income < u))
            .map(|s| s.rate)
            .unwrap_or(0.0)
    }
}
