//! Gratuity payable on leaving an employer

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_range, CalcError, CalcResult};
use crate::rates::round2;
use crate::rules::TaxRules;

/// Continuous service required before gratuity is payable under the Act
pub const ACT_ELIGIBILITY_YEARS: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GratuityType {
    /// Employer covered by the Payment of Gratuity Act
    #[default]
    Act,
    NonAct,
    Custom,
}

fn default_custom_days() -> f64 {
    15.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GratuityRequest {
    /// Last drawn monthly basic plus dearness allowance
    pub last_salary: f64,
    pub years_of_service: f64,
    #[serde(default)]
    pub gratuity_type: GratuityType,
    /// Days of wages per year of service for a custom scheme
    #[serde(default = "default_custom_days")]
    pub custom_days: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GratuityResult {
    pub gratuity_amount: f64,
    pub annual_salary: f64,
    pub eligible: bool,
    /// Years counted after rounding rules
    pub counted_years: f64,
    pub tax_exempt_amount: f64,
    pub taxable_amount: f64,
}

/// Years counted for the formula: under the Act a final part-year of six
/// months or more counts as a full year, otherwise only completed years count
pub fn counted_years(years_of_service: f64, gratuity_type: GratuityType) -> f64 {
    let completed = years_of_service.trunc();
    match gratuity_type {
        GratuityType::Act if years_of_service - completed >= 0.5 => completed + 1.0,
        _ => completed,
    }
}

pub fn calculate_gratuity(request: &GratuityRequest, rules: &TaxRules) -> CalcResult<GratuityResult> {
    ensure_non_negative("last_salary", request.last_salary)?;
    ensure_range("years_of_service", request.years_of_service, 0.0, 60.0)?;
    if request.gratuity_type == GratuityType::Custom {
        ensure_range("custom_days", request.custom_days, 1.0, 30.0)
            .map_err(|_| CalcError::invalid("custom_days", "must be between 1 and 30 days per year"))?;
    }

    let years = counted_years(request.years_of_service, request.gratuity_type);
    let eligible = match request.gratuity_type {
        GratuityType::Act => request.years_of_service >= ACT_ELIGIBILITY_YEARS,
        _ => years >= 1.0,
    };
    let amount = if eligible {
        match request.gratuity_type {
            GratuityType::Act => request.last_salary * 15.0 / 26.0 * years,
            GratuityType::NonAct => request.last_salary * 15.0 / 30.0 * years,
            GratuityType::Custom => request.last_salary * request.custom_days / 26.0 * years,
        }
    } else {
        0.0
    };
    let exempt = amount.min(rules.gratuity_exemption_cap);

    Ok(GratuityResult {
        gratuity_amount: round2(amount),
        annual_salary: round2(request.last_salary * 12.0),
        eligible,
        counted_years: years,
        tax_exempt_amount: round2(exempt),
        taxable_amount: round2(amount - exempt),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(salary: f64, years: f64, kind: GratuityType) -> GratuityResult {
        calculate_gratuity(
            &GratuityRequest {
                last_salary: salary,
                years_of_service: years,
                gratuity_type: kind,
                custom_days: 15.0,
            },
            &TaxRules::default_rules(),
        )
        .unwrap()
    }

    #[test]
    fn test_act_rounds_partial_year() {
        assert_eq!(counted_years(7.5, GratuityType::Act), 8.0);
        assert_eq!(counted_years(7.4, GratuityType::Act), 7.0);
        assert_eq!(counted_years(7.9, GratuityType::NonAct), 7.0);

        let r = run(52_000.0, 10.0, GratuityType::Act);
        assert_eq!(r.gratuity_amount, 300_000.0);
        assert_eq!(r.annual_salary, 624_000.0);
        assert!(r.eligible);
    }

    #[test]
    fn test_act_needs_five_years() {
        let r = run(52_000.0, 4.8, GratuityType::Act);
        assert!(!r.eligible);
        assert_eq!(r.gratuity_amount, 0.0);
    }

    #[test]
    fn test_non_act_and_cap() {
        let r = run(60_000.0, 10.0, GratuityType::NonAct);
        assert_eq!(r.gratuity_amount, 300_000.0);

        let big = run(600_000.0, 30.0, GratuityType::Act);
        assert_eq!(big.tax_exempt_amount, 2_000_000.0);
        assert!(big.taxable_amount > 0.0);
    }
}
