//! Pension schemes (APY, PMVVY, PM-SYM) and the retirement pension gap

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_positive, ensure_range, CalcError, CalcResult};
use crate::rates::{annuity_immediate_factor, round2, Frequency, MONTH_NAMES};
use crate::sip::InstallmentLedger;

/// Contributions to APY and PM-SYM run until this age
pub const PENSION_EXIT_AGE: u32 = 60;
pub const APY_MIN_JOINING_AGE: u32 = 18;
pub const APY_MAX_JOINING_AGE: u32 = 40;

/// PFRDA monthly contribution chart, one row per joining age from 18 to 40,
/// columns for a guaranteed pension of 1,000 to 5,000
const APY_CHART: [[f64; 5]; 23] = [
    [42.0, 84.0, 126.0, 168.0, 210.0],
    [46.0, 92.0, 138.0, 183.0, 224.0],
    [50.0, 100.0, 150.0, 198.0, 248.0],
    [54.0, 108.0, 162.0, 215.0, 269.0],
    [59.0, 117.0, 177.0, 234.0, 292.0],
    [64.0, 127.0, 192.0, 254.0, 318.0],
    [70.0, 139.0, 208.0, 277.0, 346.0],
    [76.0, 151.0, 226.0, 301.0, 376.0],
    [82.0, 164.0, 246.0, 327.0, 409.0],
    [90.0, 178.0, 268.0, 356.0, 446.0],
    [97.0, 194.0, 292.0, 388.0, 485.0],
    [106.0, 212.0, 318.0, 423.0, 529.0],
    [116.0, 231.0, 347.0, 462.0, 577.0],
    [126.0, 252.0, 379.0, 504.0, 630.0],
    [138.0, 276.0, 414.0, 551.0, 689.0],
    [151.0, 302.0, 453.0, 602.0, 752.0],
    [165.0, 330.0, 495.0, 659.0, 824.0],
    [181.0, 362.0, 543.0, 722.0, 902.0],
    [198.0, 396.0, 594.0, 792.0, 990.0],
    [218.0, 436.0, 654.0, 870.0, 1087.0],
    [240.0, 480.0, 720.0, 957.0, 1196.0],
    [264.0, 528.0, 792.0, 1054.0, 1318.0],
    [291.0, 582.0, 873.0, 1164.0, 1454.0],
];
/// Corpus returned to the nominee for every 1,000 of monthly pension
const APY_LUMP_SUM_PER_THOUSAND: f64 = 170_000.0;
const APY_CO_CONTRIBUTION_YEARS: u32 = 5;
const APY_CO_CONTRIBUTION_CAP: f64 = 1_000.0;

/// Monthly APY contribution for a joining age and a pension of 1,000 to 5,000
pub fn apy_monthly_contribution(joining_age: u32, pension_amount: u32) -> CalcResult<f64> {
    if !(APY_MIN_JOINING_AGE..=APY_MAX_JOINING_AGE).contains(&joining_age) {
        return Err(CalcError::invalid("joining_age", "must be between 18 and 40"));
    }
    if pension_amount == 0 || pension_amount > 5_000 || pension_amount % 1_000 != 0 {
        return Err(CalcError::invalid(
            "pension_amount",
            "must be 1000, 2000, 3000, 4000 or 5000",
        ));
    }
    let row = (joining_age - APY_MIN_JOINING_AGE) as usize;
    let column = (pension_amount / 1_000 - 1) as usize;
    Ok(APY_CHART[row][column])
}

fn default_apy_return() -> f64 {
    8.5
}

fn default_co_contribution() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApyRequest {
    pub joining_age: u32,
    pub pension_amount: u32,
    #[serde(default = "default_apy_return")]
    pub expected_return: f64,
    /// Government matches half the contribution, up to 1,000 a year, for the first five years
    #[serde(default = "default_co_contribution")]
    pub government_co_contribution: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApyYear {
    pub year: u32,
    pub age: u32,
    pub annual_contribution: f64,
    pub gov_contribution: f64,
    pub total_invested: f64,
    pub investment_growth: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApyMonth {
    pub year: u32,
    pub month_name: String,
    pub age: u32,
    pub monthly_contribution: f64,
    pub gov_contribution: f64,
    pub cumulative_investment: f64,
    pub investment_growth: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApyResult {
    pub joining_age: u32,
    pub pension_amount: u32,
    pub monthly_contribution: f64,
    /// Years of contribution until 60
    pub investment_period: u32,
    pub total_contribution: f64,
    pub total_gov_contribution: f64,
    /// Guaranteed corpus returned to the nominee
    pub lump_sum: f64,
    pub investment_growth: f64,
    pub corpus_at_exit: f64,
    pub yearly_breakdown: Vec<ApyYear>,
    pub monthly_breakdown: Vec<ApyMonth>,
}

/// Atal Pension Yojana: chart contribution from joining age to 60
pub fn calculate_apy(request: &ApyRequest) -> CalcResult<ApyResult> {
    let contribution = apy_monthly_contribution(request.joining_age, request.pension_amount)?;
    ensure_range("expected_return", request.expected_return, 0.0, 30.0)?;

    let years = PENSION_EXIT_AGE - request.joining_age;
    let monthly_growth = 1.0 + request.expected_return / 100.0 / 12.0;
    let gov_monthly = (contribution * 0.5).min(APY_CO_CONTRIBUTION_CAP / 12.0);

    let mut balance = 0.0;
    let mut own = 0.0;
    let mut matched = 0.0;
    let mut yearly_breakdown = Vec::with_capacity(years as usize);
    let mut monthly_breakdown = Vec::with_capacity(years as usize * 12);

    for year in 1..=years {
        let age = request.joining_age + year;
        let gov = if request.government_co_contribution && year <= APY_CO_CONTRIBUTION_YEARS {
            gov_monthly
        } else {
            0.0
        };
        for month in 0..12 {
            balance = (balance + contribution + gov) * monthly_growth;
            own += contribution;
            matched += gov;
            monthly_breakdown.push(ApyMonth {
                year,
                month_name: MONTH_NAMES[month].to_string(),
                age,
                monthly_contribution: contribution,
                gov_contribution: round2(gov),
                cumulative_investment: round2(own + matched),
                investment_growth: round2(balance - own - matched),
                balance: round2(balance),
            });
        }
        yearly_breakdown.push(ApyYear {
            year,
            age,
            annual_contribution: contribution * 12.0,
            gov_contribution: round2(gov * 12.0),
            total_invested: round2(own + matched),
            investment_growth: round2(balance - own - matched),
            balance: round2(balance),
        });
    }

    Ok(ApyResult {
        joining_age: request.joining_age,
        pension_amount: request.pension_amount,
        monthly_contribution: contribution,
        investment_period: years,
        total_contribution: round2(own),
        total_gov_contribution: round2(matched),
        lump_sum: APY_LUMP_SUM_PER_THOUSAND * (request.pension_amount / 1_000) as f64,
        investment_growth: round2(balance - own - matched),
        corpus_at_exit: round2(balance),
        yearly_breakdown,
        monthly_breakdown,
    })
}

/// PMVVY guaranteed rate and policy term
pub const PMVVY_RATE: f64 = 7.4;
pub const PMVVY_TERM_YEARS: u32 = 10;

fn default_pension_frequency() -> Frequency {
    Frequency::Monthly
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PmvvyRequest {
    pub subscriber_age: u32,
    pub investment_amount: f64,
    #[serde(default = "default_pension_frequency")]
    pub pension_frequency: Frequency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PmvvyYear {
    pub year: u32,
    pub age: u32,
    pub pension_amount: f64,
    pub cumulative_pension: f64,
    /// Purchase price still held by the insurer; repaid at the end of the term
    pub remaining_balance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PmvvyResult {
    pub subscriber_age: u32,
    pub investment_amount: f64,
    pub pension_frequency: Frequency,
    pub frequency_text: String,
    pub pension_amount: f64,
    pub annual_interest_rate: f64,
    pub policy_period: u32,
    pub total_pension_payouts: f64,
    pub maturity_amount: f64,
    /// Simple yearly yield of the payouts on the purchase price
    pub effective_rate: f64,
    pub yearly_breakdown: Vec<PmvvyYear>,
}

/// Pradhan Mantri Vaya Vandana Yojana: a fixed pension on a lump sum for
/// ten years, purchase price returned at the end
pub fn calculate_pmvvy(request: &PmvvyRequest) -> CalcResult<PmvvyResult> {
    ensure_range("subscriberAge", request.subscriber_age as f64, 60.0, 90.0)?;
    ensure_range("investmentAmount", request.investment_amount, 10_000.0, 1_500_000.0)?;
    let frequency_text = match request.pension_frequency {
        Frequency::Monthly => "per month",
        Frequency::Quarterly => "per quarter",
        Frequency::HalfYearly => "per half-year",
        Frequency::Yearly => "per year",
        _ => {
            return Err(CalcError::invalid(
                "pensionFrequency",
                "pension is paid monthly, quarterly, half-yearly or yearly",
            ))
        }
    };

    let p = request.investment_amount;
    let per_year = request.pension_frequency.periods_per_year() as f64;
    let installment = p * PMVVY_RATE / 100.0 / per_year;
    let yearly = installment * per_year;
    let payouts = yearly * PMVVY_TERM_YEARS as f64;

    let yearly_breakdown = (1..=PMVVY_TERM_YEARS)
        .map(|year| PmvvyYear {
            year,
            age: request.subscriber_age + year,
            pension_amount: round2(yearly),
            cumulative_pension: round2(yearly * year as f64),
            remaining_balance: if year == PMVVY_TERM_YEARS { 0.0 } else { p },
        })
        .collect();

    Ok(PmvvyResult {
        subscriber_age: request.subscriber_age,
        investment_amount: p,
        pension_frequency: request.pension_frequency,
        frequency_text: frequency_text.to_string(),
        pension_amount: round2(installment),
        annual_interest_rate: PMVVY_RATE,
        policy_period: PMVVY_TERM_YEARS,
        total_pension_payouts: round2(payouts),
        maturity_amount: round2(payouts + p),
        effective_rate: round2(payouts / p / PMVVY_TERM_YEARS as f64 * 100.0),
        yearly_breakdown,
    })
}

/// PM-SYM pays a fixed pension from 60
pub const PM_SYM_PENSION: f64 = 3_000.0;
const PM_SYM_RATE: f64 = 8.0;
/// Monthly subscriber share by joining age, 18 to 40; the government pays the same again
const PM_SYM_CHART: [f64; 23] = [
    55.0, 58.0, 61.0, 64.0, 68.0, 72.0, 76.0, 80.0, 85.0, 90.0, 95.0, 100.0, 105.0, 110.0, 120.0, 130.0, 140.0,
    150.0, 160.0, 170.0, 180.0, 190.0, 200.0,
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PmSymRequest {
    pub joining_age: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PmSymYear {
    pub year: u32,
    pub age: u32,
    pub yearly_subscriber_contribution: f64,
    pub yearly_government_contribution: f64,
    pub total_yearly_contribution: f64,
    pub corpus_at_year_end: f64,
    pub cumulative_subscriber_contribution: f64,
    pub cumulative_government_contribution: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PmSymResult {
    pub joining_age: u32,
    pub monthly_contribution: f64,
    pub government_contribution: f64,
    pub pension_amount: f64,
    pub interest_rate: f64,
    pub years_of_contribution: u32,
    pub total_subscriber_contribution: f64,
    pub total_government_contribution: f64,
    pub total_contribution: f64,
    #[serde(rename = "corpusAt60")]
    pub corpus_at_60: f64,
    pub yearly_breakdown: Vec<PmSymYear>,
}

/// Pradhan Mantri Shram Yogi Maandhan: matched monthly contributions to 60
pub fn calculate_pm_sym(request: &PmSymRequest) -> CalcResult<PmSymResult> {
    ensure_range(
        "joiningAge",
        request.joining_age as f64,
        APY_MIN_JOINING_AGE as f64,
        APY_MAX_JOINING_AGE as f64,
    )?;
    let own = PM_SYM_CHART[(request.joining_age - APY_MIN_JOINING_AGE) as usize];
    let years = PENSION_EXIT_AGE - request.joining_age;
    let rows = InstallmentLedger::new(PM_SYM_RATE, Frequency::Monthly, years).run(|_| own * 2.0);

    let yearly_breakdown = rows
        .iter()
        .map(|r| PmSymYear {
            year: r.year,
            age: request.joining_age + r.year,
            yearly_subscriber_contribution: own * 12.0,
            yearly_government_contribution: own * 12.0,
            total_yearly_contribution: own * 24.0,
            corpus_at_year_end: round2(r.value),
            cumulative_subscriber_contribution: own * 12.0 * r.year as f64,
            cumulative_government_contribution: own * 12.0 * r.year as f64,
        })
        .collect();
    let corpus = rows.last().map(|r| r.value).unwrap_or_default();
    let total_own = own * 12.0 * years as f64;

    Ok(PmSymResult {
        joining_age: request.joining_age,
        monthly_contribution: own,
        government_contribution: own,
        pension_amount: PM_SYM_PENSION,
        interest_rate: PM_SYM_RATE,
        years_of_contribution: years,
        total_subscriber_contribution: round2(total_own),
        total_government_contribution: round2(total_own),
        total_contribution: round2(total_own * 2.0),
        corpus_at_60: round2(corpus),
        yearly_breakdown,
    })
}

fn default_expense_ratio() -> f64 {
    100.0
}

fn default_inflation() -> f64 {
    6.0
}

fn default_pre_return() -> f64 {
    8.0
}

fn default_post_return() -> f64 {
    6.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PensionRequest {
    /// Monthly household expenses today
    pub current_expenses: f64,
    pub current_age: u32,
    pub retirement_age: u32,
    pub life_expectancy: u32,
    /// Share of today's expenses still needed after retiring, in percent
    #[serde(default = "default_expense_ratio")]
    pub retirement_expense_ratio: f64,
    #[serde(default = "default_inflation")]
    pub inflation_rate: f64,
    #[serde(default = "default_pre_return")]
    pub pre_retirement_return: f64,
    #[serde(default = "default_post_return")]
    pub post_retirement_return: f64,
    #[serde(default)]
    pub existing_savings: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PensionYear {
    pub year: u32,
    pub age: u32,
    pub annual_investment: f64,
    pub opening_balance: f64,
    pub growth: f64,
    pub closing_balance: f64,
    pub cumulative_investment: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PensionResult {
    pub years_to_retirement: u32,
    pub retirement_years: u32,
    pub inflated_monthly_expenses: f64,
    pub inflated_annual_expenses: f64,
    pub retirement_corpus_needed: f64,
    pub existing_savings_future_value: f64,
    pub net_corpus_needed: f64,
    pub monthly_savings_required: f64,
    pub annual_savings_required: f64,
    pub total_investment_needed: f64,
    pub summary_statement: String,
    pub year_wise_data: Vec<PensionYear>,
}

/// Corpus that funds inflation-indexed expenses through retirement, and the
/// monthly saving that builds it
pub fn calculate_pension_requirements(request: &PensionRequest) -> CalcResult<PensionResult> {
    ensure_positive("current_expenses", request.current_expenses)?;
    ensure_range("current_age", request.current_age as f64, 18.0, 100.0)?;
    if request.retirement_age <= request.current_age {
        return Err(CalcError::invalid("retirement_age", "must be greater than the current age"));
    }
    if request.life_expectancy <= request.retirement_age {
        return Err(CalcError::invalid("life_expectancy", "must be greater than the retirement age"));
    }
    ensure_range("life_expectancy", request.life_expectancy as f64, 19.0, 120.0)?;
    ensure_range("retirement_expense_ratio", request.retirement_expense_ratio, 1.0, 200.0)?;
    ensure_range("inflation_rate", request.inflation_rate, 0.0, 30.0)?;
    ensure_range("pre_retirement_return", request.pre_retirement_return, 0.0, 50.0)?;
    ensure_range("post_retirement_return", request.post_retirement_return, 0.0, 50.0)?;
    ensure_non_negative("existing_savings", request.existing_savings)?;

    let to_retirement = request.retirement_age - request.current_age;
    let in_retirement = request.life_expectancy - request.retirement_age;
    let inflation = request.inflation_rate / 100.0;
    let pre = request.pre_retirement_return / 100.0;

    let monthly_expenses = request.current_expenses
        * (1.0 + inflation).powi(to_retirement as i32)
        * request.retirement_expense_ratio
        / 100.0;
    let annual_expenses = monthly_expenses * 12.0;

    let real_return = (1.0 + request.post_retirement_return / 100.0) / (1.0 + inflation) - 1.0;
    let corpus = if real_return <= 0.0 {
        annual_expenses * in_retirement as f64
    } else {
        annual_expenses * (1.0 - (1.0 + real_return).powi(-(in_retirement as i32))) / real_return
    };

    let savings_fv = request.existing_savings * (1.0 + pre).powi(to_retirement as i32);
    let net_corpus = (corpus - savings_fv).max(0.0);
    let monthly = if net_corpus > 0.0 {
        net_corpus / annuity_immediate_factor(pre / 12.0, to_retirement * 12)
    } else {
        0.0
    };
    let annual = monthly * 12.0;

    let mut balance = request.existing_savings;
    let year_wise_data = (1..=to_retirement)
        .map(|year| {
            let growth = balance * pre;
            let row = PensionYear {
                year,
                age: request.current_age + year,
                annual_investment: annual.round(),
                opening_balance: balance.round(),
                growth: growth.round(),
                closing_balance: (balance + annual + growth).round(),
                cumulative_investment: (annual * year as f64 + request.existing_savings).round(),
            };
            balance += annual + growth;
            row
        })
        .collect();

    let summary_statement = format!(
        "To sustain ₹{:.0}/month in retirement, you'll need a corpus of ₹{:.0} and must save ₹{:.0}/month.",
        monthly_expenses, corpus, monthly
    );

    Ok(PensionResult {
        years_to_retirement: to_retirement,
        retirement_years: in_retirement,
        inflated_monthly_expenses: monthly_expenses.round(),
        inflated_annual_expenses: annual_expenses.round(),
        retirement_corpus_needed: corpus.round(),
        existing_savings_future_value: savings_fv.round(),
        net_corpus_needed: net_corpus.round(),
        monthly_savings_required: monthly.round(),
        annual_savings_required: annual.round(),
        total_investment_needed: (annual * to_retirement as f64).round(),
        summary_statement,
        year_wise_data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::annuity_due_factor;
    use approx::assert_relative_eq;

    #[test]
    fn test_apy_chart_lookup() {
        assert_eq!(apy_monthly_contribution(18, 1_000).unwrap(), 42.0);
        assert_eq!(apy_monthly_contribution(30, 3_000).unwrap(), 347.0);
        assert_eq!(apy_monthly_contribution(40, 5_000).unwrap(), 1_454.0);
        assert!(apy_monthly_contribution(41, 1_000).is_err());
        assert!(apy_monthly_contribution(25, 2_500).is_err());
        assert!(apy_monthly_contribution(25, 0).is_err());
    }

    #[test]
    fn test_apy_ledger() {
        let r = calculate_apy(&ApyRequest {
            joining_age: 18,
            pension_amount: 1_000,
            expected_return: 8.5,
            government_co_contribution: true,
        })
        .unwrap();
        assert_eq!(r.investment_period, 42);
        assert_eq!(r.total_contribution, 21_168.0);
        // half of 42 a month for five years, under the 1,000 yearly cap
        assert_eq!(r.total_gov_contribution, 1_260.0);
        assert_eq!(r.lump_sum, 170_000.0);
        assert_eq!(r.yearly_breakdown.len(), 42);
        assert_eq!(r.monthly_breakdown.len(), 504);
        assert_eq!(r.yearly_breakdown[5].gov_contribution, 0.0);
        assert_eq!(r.yearly_breakdown[41].age, 60);
    }

    #[test]
    fn test_apy_co_contribution_cap() {
        let r = calculate_apy(&ApyRequest {
            joining_age: 40,
            pension_amount: 5_000,
            expected_return: 8.5,
            government_co_contribution: true,
        })
        .unwrap();
        assert_eq!(r.yearly_breakdown[0].gov_contribution, 1_000.0);

        let without: ApyRequest =
            serde_json::from_str(r#"{"joining_age": 40, "pension_amount": 5000, "government_co_contribution": false}"#)
                .unwrap();
        let r = calculate_apy(&without).unwrap();
        assert_eq!(r.total_gov_contribution, 0.0);
    }

    #[test]
    fn test_pmvvy_monthly_pension() {
        let r = calculate_pmvvy(&PmvvyRequest {
            subscriber_age: 65,
            investment_amount: 1_500_000.0,
            pension_frequency: Frequency::Monthly,
        })
        .unwrap();
        assert_eq!(r.pension_amount, 9_250.0);
        assert_eq!(r.total_pension_payouts, 1_110_000.0);
        assert_eq!(r.maturity_amount, 2_610_000.0);
        assert_eq!(r.effective_rate, 7.4);
        assert_eq!(r.yearly_breakdown[9].remaining_balance, 0.0);
        assert_eq!(r.yearly_breakdown[8].remaining_balance, 1_500_000.0);
        assert_eq!(r.frequency_text, "per month");
    }

    #[test]
    fn test_pmvvy_limits() {
        let young = PmvvyRequest {
            subscriber_age: 55,
            investment_amount: 100_000.0,
            pension_frequency: Frequency::Yearly,
        };
        assert!(calculate_pmvvy(&young).is_err());
        let daily = PmvvyRequest {
            subscriber_age: 65,
            investment_amount: 100_000.0,
            pension_frequency: Frequency::Daily,
        };
        assert!(calculate_pmvvy(&daily).is_err());
    }

    #[test]
    fn test_pm_sym_matched_corpus() {
        let r = calculate_pm_sym(&PmSymRequest { joining_age: 18 }).unwrap();
        assert_eq!(r.monthly_contribution, 55.0);
        assert_eq!(r.years_of_contribution, 42);
        assert_eq!(r.total_subscriber_contribution, 27_720.0);
        assert_eq!(r.total_contribution, 55_440.0);
        let expected = 110.0 * annuity_due_factor(0.08 / 12.0, 504);
        assert_relative_eq!(r.corpus_at_60, expected, max_relative = 1e-6);
        assert_eq!(serde_json::to_value(&r).unwrap()["corpusAt60"], r.corpus_at_60);
        assert!(calculate_pm_sym(&PmSymRequest { joining_age: 45 }).is_err());
    }

    #[test]
    fn test_pension_at_zero_real_return() {
        let req: PensionRequest = serde_json::from_str(
            r#"{"current_expenses": 50000, "current_age": 30, "retirement_age": 60, "life_expectancy": 85}"#,
        )
        .unwrap();
        let r = calculate_pension_requirements(&req).unwrap();
        let monthly = 50_000.0 * 1.06f64.powi(30);
        let corpus = monthly * 12.0 * 25.0;
        assert_relative_eq!(r.retirement_corpus_needed, corpus.round());
        let saving = corpus / annuity_immediate_factor(0.08 / 12.0, 360);
        assert_relative_eq!(r.monthly_savings_required, saving.round());
        assert_eq!(r.year_wise_data.len(), 30);
        assert_eq!(r.year_wise_data[0].opening_balance, 0.0);
    }

    #[test]
    fn test_pension_covered_by_savings() {
        let req: PensionRequest = serde_json::from_str(
            r#"{"current_expenses": 10000, "current_age": 50, "retirement_age": 60, "life_expectancy": 70,
                "existing_savings": 100000000}"#,
        )
        .unwrap();
        let r = calculate_pension_requirements(&req).unwrap();
        assert_eq!(r.net_corpus_needed, 0.0);
        assert_eq!(r.monthly_savings_required, 0.0);
    }
}
