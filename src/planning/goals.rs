//! Goal planning for a future expense: child education and marriage

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_positive, ensure_range, CalcError, CalcResult};
use crate::growth::inflate;
use crate::rates::{annuity_immediate_factor, round2};

/// A future expense priced in today's money
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalPlan {
    pub current_cost: f64,
    pub inflation_rate: f64,
    pub expected_return: f64,
    pub years: u32,
    pub existing_savings: f64,
}

/// One year of the savings ledger toward a goal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalLedgerYear {
    pub year: u32,
    pub opening_balance: f64,
    pub invested: f64,
    pub cumulative_invested: f64,
    pub returns: f64,
    pub closing_balance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalOutcome {
    pub future_cost: f64,
    pub savings_future_value: f64,
    pub shortfall: f64,
    /// Paid at the end of every month
    pub monthly_sip: f64,
    pub total_investment: f64,
    pub ledger: Vec<GoalLedgerYear>,
}

/// Furthest horizon a goal can be planned over
pub const MAX_GOAL_YEARS: u32 = 100;

impl GoalPlan {
    fn monthly_rate(&self) -> f64 {
        self.expected_return / 100.0 / 12.0
    }

    fn validate(&self) -> CalcResult<()> {
        ensure_positive("current_cost", self.current_cost)?;
        ensure_range("inflation_rate", self.inflation_rate, 0.0, 30.0)?;
        ensure_range("expected_return", self.expected_return, 0.0, 50.0)?;
        ensure_non_negative("existing_savings", self.existing_savings)?;
        if self.years == 0 {
            return Err(CalcError::invalid("years", "the goal must be at least a year away"));
        }
        ensure_range("years", self.years as f64, 1.0, MAX_GOAL_YEARS as f64)
    }

    /// Solve for the monthly SIP and build the monthly-compounded ledger
    pub fn solve(&self) -> CalcResult<GoalOutcome> {
        self.validate()?;
        let months = self.years * 12;
        let i = self.monthly_rate();
        let growth = 1.0 + i;

        let future_cost = inflate(self.current_cost, self.inflation_rate, self.years as f64);
        let savings_future_value = self.existing_savings * growth.powi(months as i32);
        let shortfall = (future_cost - savings_future_value).max(0.0);
        let monthly_sip = shortfall / annuity_immediate_factor(i, months);

        let mut balance = self.existing_savings;
        let mut invested = 0.0;
        let mut ledger = Vec::with_capacity(self.years as usize);
        for year in 1..=self.years {
            let opening = balance;
            for _ in 0..12 {
                balance = balance * growth + monthly_sip;
            }
            let paid = monthly_sip * 12.0;
            invested += paid;
            ledger.push(GoalLedgerYear {
                year,
                opening_balance: opening,
                invested: paid,
                cumulative_invested: invested,
                returns: balance - opening - paid,
                closing_balance: balance,
            });
        }
        log::debug!(
            "goal plan: future cost {:.2}, monthly sip {:.2}, closing {:.2}",
            future_cost,
            monthly_sip,
            balance
        );

        Ok(GoalOutcome {
            future_cost,
            savings_future_value,
            shortfall,
            monthly_sip,
            total_investment: invested,
            ledger,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildEducationRequest {
    pub current_age: u32,
    pub college_age: u32,
    pub current_cost: f64,
    pub inflation_rate: f64,
    pub return_rate: f64,
    #[serde(default)]
    pub current_savings: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationYear {
    pub year: u32,
    pub child_age: u32,
    pub annual_investment: f64,
    pub cumulative_investment: f64,
    pub growth: f64,
    pub portfolio_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildEducationResult {
    pub current_age: u32,
    pub current_cost: f64,
    pub current_savings: f64,
    pub return_rate: f64,
    pub years_to_college: u32,
    pub future_cost: f64,
    pub future_value_of_savings: f64,
    pub monthly_sip_required: f64,
    pub total_investment: f64,
    pub yearly_data: Vec<EducationYear>,
}

pub fn calculate_child_education(request: &ChildEducationRequest) -> CalcResult<ChildEducationResult> {
    ensure_range("current_age", request.current_age as f64, 0.0, 25.0)?;
    if request.college_age <= request.current_age {
        return Err(CalcError::invalid("college_age", "must be greater than the current age"));
    }
    let years = request.college_age - request.current_age;
    let outcome = GoalPlan {
        current_cost: request.current_cost,
        inflation_rate: request.inflation_rate,
        expected_return: request.return_rate,
        years,
        existing_savings: request.current_savings,
    }
    .solve()?;

    Ok(ChildEducationResult {
        current_age: request.current_age,
        current_cost: request.current_cost,
        current_savings: request.current_savings,
        return_rate: request.return_rate,
        years_to_college: years,
        future_cost: round2(outcome.future_cost),
        future_value_of_savings: round2(outcome.savings_future_value),
        monthly_sip_required: round2(outcome.monthly_sip),
        total_investment: round2(outcome.total_investment),
        yearly_data: outcome
            .ledger
            .iter()
            .map(|y| EducationYear {
                year: y.year,
                child_age: request.current_age + y.year,
                annual_investment: round2(y.invested),
                cumulative_investment: round2(y.cumulative_invested),
                growth: round2(y.closing_balance - y.cumulative_invested - request.current_savings),
                portfolio_value: round2(y.closing_balance),
            })
            .collect(),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarriagePlanRequest {
    pub current_marriage_cost: f64,
    pub inflation_rate: f64,
    pub current_age: u32,
    pub marriage_age: u32,
    pub expected_return: f64,
    #[serde(default)]
    pub existing_savings: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarriageYear {
    pub year: u32,
    pub opening_balance: f64,
    pub annual_investment: f64,
    pub returns_earned: f64,
    pub closing_balance: f64,
    pub total_invested_till_date: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarriagePlanResult {
    pub years_until_marriage: u32,
    pub future_marriage_cost: f64,
    pub existing_savings_future_value: f64,
    pub total_corpus_required: f64,
    pub monthly_investment_required: f64,
    pub total_investment: f64,
    pub investment_growth: f64,
    pub year_wise_data: Vec<MarriageYear>,
}

pub fn calculate_marriage_plan(request: &MarriagePlanRequest) -> CalcResult<MarriagePlanResult> {
    if request.marriage_age <= request.current_age {
        return Err(CalcError::invalid("marriage_age", "must be greater than the current age"));
    }
    let years = request.marriage_age - request.current_age;
    let outcome = GoalPlan {
        current_cost: request.current_marriage_cost,
        inflation_rate: request.inflation_rate,
        expected_return: request.expected_return,
        years,
        existing_savings: request.existing_savings,
    }
    .solve()?;

    Ok(MarriagePlanResult {
        years_until_marriage: years,
        future_marriage_cost: round2(outcome.future_cost),
        existing_savings_future_value: round2(outcome.savings_future_value),
        total_corpus_required: round2(outcome.shortfall),
        monthly_investment_required: round2(outcome.monthly_sip),
        total_investment: round2(outcome.total_investment),
        investment_growth: round2(outcome.shortfall - outcome.total_investment),
        year_wise_data: outcome
            .ledger
            .iter()
            .map(|y| MarriageYear {
                year: y.year,
                opening_balance: round2(y.opening_balance),
                annual_investment: round2(y.invested),
                returns_earned: round2(y.returns),
                closing_balance: round2(y.closing_balance),
                total_invested_till_date: round2(y.cumulative_invested),
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(savings: f64) -> GoalPlan {
        GoalPlan {
            current_cost: 1_000_000.0,
            inflation_rate: 8.0,
            expected_return: 12.0,
            years: 15,
            existing_savings: savings,
        }
    }

    #[test]
    fn test_ledger_ends_at_future_cost() {
        for savings in [0.0, 200_000.0] {
            let o = plan(savings).solve().unwrap();
            let last = o.ledger.last().unwrap();
            assert!(
                (last.closing_balance - o.future_cost).abs() < 1e-4,
                "{} vs {}",
                last.closing_balance,
                o.future_cost
            );
        }
    }

    #[test]
    fn test_savings_reduce_sip() {
        let a = plan(0.0).solve().unwrap();
        let b = plan(200_000.0).solve().unwrap();
        assert!(b.monthly_sip < a.monthly_sip);
    }

    #[test]
    fn test_savings_cover_goal() {
        let o = plan(5_000_000.0).solve().unwrap();
        assert_eq!(o.monthly_sip, 0.0);
        assert_eq!(o.shortfall, 0.0);
    }

    #[test]
    fn test_child_education_contract() {
        let req: ChildEducationRequest = serde_json::from_str(
            r#"{"current_age": 5, "college_age": 18, "current_cost": 1500000,
                "inflation_rate": 10, "return_rate": 12, "current_savings": 100000}"#,
        )
        .unwrap();
        let r = calculate_child_education(&req).unwrap();
        assert_eq!(r.years_to_college, 13);
        assert_eq!(r.yearly_data.len(), 13);
        assert_eq!(r.yearly_data[12].child_age, 18);
        assert!((r.yearly_data[12].portfolio_value - r.future_cost).abs() < 0.02);
    }

    #[test]
    fn test_marriage_age_must_be_ahead() {
        let req = MarriagePlanRequest {
            current_marriage_cost: 2_000_000.0,
            inflation_rate: 6.0,
            current_age: 28,
            marriage_age: 25,
            expected_return: 12.0,
            existing_savings: 0.0,
        };
        assert!(calculate_marriage_plan(&req).is_err());
    }

    #[test]
    fn test_goal_horizon_is_bounded() {
        let mut far = plan(0.0);
        far.years = MAX_GOAL_YEARS + 1;
        assert!(far.solve().unwrap_err().is_client_error());

        let req = MarriagePlanRequest {
            current_marriage_cost: 2_000_000.0,
            inflation_rate: 6.0,
            current_age: 0,
            marriage_age: u32::MAX,
            expected_return: 12.0,
            existing_savings: 0.0,
        };
        assert!(calculate_marriage_plan(&req).unwrap_err().is_client_error());
    }
}
