//! Bank deposits: fixed deposits and recurring deposits

use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, ensure_range, CalcResult};
use crate::growth::compound_amount;
use crate::rates::{round2, Frequency};

fn default_deposit_frequency() -> Frequency {
    Frequency::Quarterly
}

fn check_deposit_frequency(frequency: Frequency) -> CalcResult<()> {
    if frequency.months_per_period().is_none() {
        return Err(crate::error::CalcError::invalid(
            "compounding_frequency",
            format!("deposits compound monthly, quarterly, half-yearly or yearly, not {}", frequency),
        ));
    }
    Ok(())
}

/// Input contract of the FD calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FdRequest {
    pub principal_amount: f64,
    pub annual_interest_rate: f64,
    pub tenure_years: f64,
    #[serde(default = "default_deposit_frequency")]
    pub compounding_frequency: Frequency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositYear {
    pub year: u32,
    pub deposited: f64,
    pub interest_earned: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FdResult {
    pub principal_amount: f64,
    pub interest_earned: f64,
    pub maturity_amount: f64,
    pub total_return_percentage: f64,
    pub effective_annual_rate: f64,
    pub yearly_breakdown: Vec<DepositYear>,
}

/// `A = P(1 + r/n)^(n·t)`
pub fn fd_maturity(principal: f64, annual_rate_pct: f64, years: f64, frequency: Frequency) -> f64 {
    compound_amount(principal, annual_rate_pct, years, frequency)
}

pub fn calculate_fd(request: &FdRequest) -> CalcResult<FdResult> {
    ensure_positive("principal_amount", request.principal_amount)?;
    ensure_range("annual_interest_rate", request.annual_interest_rate, 0.0, 50.0)?;
    ensure_range("tenure_years", request.tenure_years, 0.0, 50.0)?;
    ensure_positive("tenure_years", request.tenure_years)?;
    check_deposit_frequency(request.compounding_frequency)?;

    let p = request.principal_amount;
    let maturity = fd_maturity(p, request.annual_interest_rate, request.tenure_years, request.compounding_frequency);

    let years = request.tenure_years.ceil() as u32;
    let yearly_breakdown = (1..=years)
        .map(|y| {
            let balance = fd_maturity(
                p,
                request.annual_interest_rate,
                (y as f64).min(request.tenure_years),
                request.compounding_frequency,
            );
            DepositYear {
                year: y,
                deposited: round2(p),
                interest_earned: round2(balance - p),
                balance: round2(balance),
            }
        })
        .collect();

    Ok(FdResult {
        principal_amount: round2(p),
        interest_earned: round2(maturity - p),
        maturity_amount: round2(maturity),
        total_return_percentage: round2((maturity - p) / p * 100.0),
        effective_annual_rate: round2(crate::rates::effective_annual_rate(
            request.annual_interest_rate,
            request.compounding_frequency,
        )),
        yearly_breakdown,
    })
}

/// Input contract of the RD calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RdRequest {
    pub monthly_deposit: f64,
    pub annual_interest_rate: f64,
    pub tenure_years: f64,
    #[serde(default = "default_deposit_frequency")]
    pub compounding_frequency: Frequency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RdResult {
    pub monthly_deposit: f64,
    pub total_deposits: f64,
    pub interest_earned: f64,
    pub maturity_amount: f64,
    pub total_return_percentage: f64,
    pub yearly_breakdown: Vec<DepositYear>,
}

/// Value after `months` of monthly installments, each compounding at
/// `frequency` from its own deposit month: `Σ R(1 + r/n)^(n·(N−k)/12)`
pub fn rd_maturity(monthly: f64, annual_rate_pct: f64, months: u32, frequency: Frequency) -> f64 {
    (0..months)
        .map(|k| compound_amount(monthly, annual_rate_pct, (months - k) as f64 / 12.0, frequency))
        .sum()
}

pub fn calculate_rd(request: &RdRequest) -> CalcResult<RdResult> {
    ensure_positive("monthly_deposit", request.monthly_deposit)?;
    ensure_range("annual_interest_rate", request.annual_interest_rate, 0.0, 50.0)?;
    ensure_positive("tenure_years", request.tenure_years)?;
    ensure_range("tenure_years", request.tenure_years, 0.0, 50.0)?;
    check_deposit_frequency(request.compounding_frequency)?;

    let months = (request.tenure_years * 12.0).round().max(1.0) as u32;
    let r = request.monthly_deposit;
    let maturity = rd_maturity(r, request.annual_interest_rate, months, request.compounding_frequency);
    let total_deposits = r * months as f64;

    let yearly_breakdown = (1..=months.div_ceil(12))
        .map(|y| {
            let m = (y * 12).min(months);
            let balance = rd_maturity(r, request.annual_interest_rate, m, request.compounding_frequency);
            let deposited = r * m as f64;
            DepositYear {
                year: y,
                deposited: round2(deposited),
                interest_earned: round2(balance - deposited),
                balance: round2(balance),
            }
        })
        .collect();

    Ok(RdResult {
        monthly_deposit: r,
        total_deposits: round2(total_deposits),
        interest_earned: round2(maturity - total_deposits),
        maturity_amount: round2(maturity),
        total_return_percentage: round2((maturity - total_deposits) / total_deposits * 100.0),
        yearly_breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::annuity_due_factor;

    #[test]
    fn test_fd_quarterly_default() {
        let req: FdRequest = serde_json::from_str(
            r#"{"principal_amount": 100000, "annual_interest_rate": 7, "tenure_years": 5}"#,
        )
        .unwrap();
        assert_eq!(req.compounding_frequency, Frequency::Quarterly);
        let r = calculate_fd(&req).unwrap();
        let expected = 100_000.0 * 1.0175f64.powi(20);
        assert!((r.maturity_amount - expected).abs() < 0.01);
        assert_eq!(r.yearly_breakdown.len(), 5);
        assert_eq!(r.yearly_breakdown[4].balance, r.maturity_amount);
    }

    #[test]
    fn test_rd_monthly_matches_annuity_due() {
        let v = rd_maturity(5_000.0, 12.0, 24, Frequency::Monthly);
        let closed = 5_000.0 * annuity_due_factor(0.01, 24);
        assert!((v - closed).abs() < 1e-6, "{} vs {}", v, closed);
    }

    #[test]
    fn test_rd_zero_rate_is_deposits() {
        assert_eq!(rd_maturity(1_000.0, 0.0, 36, Frequency::Quarterly), 36_000.0);
    }

    #[test]
    fn test_rd_quarterly_below_monthly() {
        let q = rd_maturity(5_000.0, 7.0, 60, Frequency::Quarterly);
        let m = rd_maturity(5_000.0, 7.0, 60, Frequency::Monthly);
        assert!(q < m);
        assert!(q > 300_000.0);
    }

    #[test]
    fn test_rejects_daily_compounding_for_deposits() {
        let req = RdRequest {
            monthly_deposit: 1_000.0,
            annual_interest_rate: 6.5,
            tenure_years: 2.0,
            compounding_frequency: Frequency::Daily,
        };
        assert!(calculate_rd(&req).is_err());
    }
}
