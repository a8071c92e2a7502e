//! Erosion of purchasing power under a constant inflation rate

use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, ensure_range, CalcResult};
use crate::rates::round2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InflationRequest {
    pub current_amount: f64,
    pub inflation_rate: f64,
    #[serde(alias = "years")]
    pub time_period: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InflationYear {
    pub year: u32,
    /// Cost of today's basket in that year
    pub future_value: f64,
    /// What today's amount will buy, in today's money
    pub current_value: f64,
    pub purchasing_power_lost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InflationResult {
    pub current_amount: f64,
    pub inflation_rate: f64,
    pub time_period: u32,
    pub future_value: f64,
    pub current_value: f64,
    /// Percent of purchasing power lost over the period
    pub purchasing_power_lost: f64,
    pub purchasing_power_lost_amount: f64,
    pub yearly_data: Vec<InflationYear>,
}

/// Future cost of `amount` after `years` of inflation at `rate_pct`
pub fn inflate(amount: f64, rate_pct: f64, years: f64) -> f64 {
    amount * (1.0 + rate_pct / 100.0).powf(years)
}

/// Today's value of an amount received after `years`
pub fn deflate(amount: f64, rate_pct: f64, years: f64) -> f64 {
    amount / (1.0 + rate_pct / 100.0).powf(years)
}

pub fn calculate_inflation(request: &InflationRequest) -> CalcResult<InflationResult> {
    ensure_positive("current_amount", request.current_amount)?;
    ensure_range("inflation_rate", request.inflation_rate, 0.0, 50.0)?;
    ensure_range("time_period", request.time_period as f64, 1.0, 100.0)?;

    let row = |year: u32| {
        let t = year as f64;
        let real = deflate(request.current_amount, request.inflation_rate, t);
        InflationYear {
            year,
            future_value: round2(inflate(request.current_amount, request.inflation_rate, t)),
            current_value: round2(real),
            purchasing_power_lost: round2((1.0 - real / request.current_amount) * 100.0),
        }
    };

    let years = request.time_period as f64;
    let real = deflate(request.current_amount, request.inflation_rate, years);

    Ok(InflationResult {
        current_amount: request.current_amount,
        inflation_rate: request.inflation_rate,
        time_period: request.time_period,
        future_value: round2(inflate(request.current_amount, request.inflation_rate, years)),
        current_value: round2(real),
        purchasing_power_lost: round2((1.0 - real / request.current_amount) * 100.0),
        purchasing_power_lost_amount: round2(request.current_amount - real),
        yearly_data: (1..=request.time_period).map(row).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inflation_ten_years() {
        let r = calculate_inflation(&InflationRequest {
            current_amount: 100_000.0,
            inflation_rate: 6.0,
            time_period: 10,
        })
        .unwrap();
        assert_eq!(r.future_value, 179_084.77);
        assert_eq!(r.current_value, 55_839.48);
        assert_eq!(r.yearly_data.len(), 10);
        assert_eq!(r.yearly_data[9].future_value, r.future_value);
        assert!(r.purchasing_power_lost > 44.0 && r.purchasing_power_lost < 45.0);
    }

    #[test]
    fn test_zero_inflation_keeps_value() {
        let r = calculate_inflation(&InflationRequest {
            current_amount: 5_000.0,
            inflation_rate: 0.0,
            time_period: 3,
        })
        .unwrap();
        assert_eq!(r.future_value, 5_000.0);
        assert_eq!(r.purchasing_power_lost, 0.0);
    }
}
