//! House rent allowance exemption under section 10(13A)

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_range, CalcResult};
use crate::rates::round2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CityType {
    Metro,
    #[default]
    #[serde(alias = "non_metro")]
    NonMetro,
}

impl CityType {
    /// Share of salary that caps the exemption
    pub fn salary_share(&self) -> f64 {
        match self {
            CityType::Metro => 0.5,
            CityType::NonMetro => 0.4,
        }
    }
}

/// Exempt HRA: the least of HRA received, the city share of salary, and
/// rent paid in excess of 10 % of salary
pub fn hra_exemption(salary: f64, hra_received: f64, rent_paid: f64, city: CityType) -> f64 {
    let rent_excess = (rent_paid - salary * 0.1).max(0.0);
    hra_received.min(salary * city.salary_share()).min(rent_excess).max(0.0)
}

fn default_marginal_rate() -> f64 {
    30.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HraRequest {
    pub basic_salary_annual: f64,
    #[serde(default)]
    pub da_received_annual: f64,
    pub hra_received_annual: f64,
    pub rent_paid_annual: f64,
    #[serde(default)]
    pub city_type: CityType,
    /// Marginal slab rate in percent, used for the tax saving
    #[serde(default = "default_marginal_rate")]
    pub marginal_tax_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HraResult {
    pub actual_hra: f64,
    pub rent_minus_ten_percent: f64,
    pub salary_percentage: f64,
    pub hra_exempt: f64,
    pub taxable_hra: f64,
    pub total_salary_annual: f64,
    pub tax_saving: f64,
}

pub fn calculate_hra(request: &HraRequest) -> CalcResult<HraResult> {
    ensure_non_negative("basic_salary_annual", request.basic_salary_annual)?;
    ensure_non_negative("da_received_annual", request.da_received_annual)?;
    ensure_non_negative("hra_received_annual", request.hra_received_annual)?;
    ensure_non_negative("rent_paid_annual", request.rent_paid_annual)?;
    ensure_range("marginal_tax_rate", request.marginal_tax_rate, 0.0, 50.0)?;

    let salary = request.basic_salary_annual + request.da_received_annual;
    let exempt = hra_exemption(
        salary,
        request.hra_received_annual,
        request.rent_paid_annual,
        request.city_type,
    );

    Ok(HraResult {
        actual_hra: round2(request.hra_received_annual),
        rent_minus_ten_percent: round2((request.rent_paid_annual - salary * 0.1).max(0.0)),
        salary_percentage: round2(salary * request.city_type.salary_share()),
        hra_exempt: round2(exempt),
        taxable_hra: round2(request.hra_received_annual - exempt),
        total_salary_annual: round2(salary + request.hra_received_annual),
        tax_saving: round2(exempt * request.marginal_tax_rate / 100.0),
    })
}
