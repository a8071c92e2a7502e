//! Long-horizon planning: goals, retirement, pensions, NPS and EPF, plus
//! household balance sheets

mod goals;
mod household;
mod pension;
mod provident;
mod retirement;

pub use goals::{
    calculate_child_education, calculate_marriage_plan, ChildEducationRequest, ChildEducationResult, EducationYear,
    GoalLedgerYear, GoalOutcome, GoalPlan, MarriagePlanRequest, MarriagePlanResult, MarriageYear, MAX_GOAL_YEARS,
};
pub use household::{
    calculate_net_worth, calculate_vacation_savings, NetWorthRequest, NetWorthResult, NetWorthStanding,
    VacationMonth, VacationRequest, VacationResult,
};
pub use pension::{
    apy_monthly_contribution, calculate_apy, calculate_pension_requirements, calculate_pm_sym, calculate_pmvvy,
    ApyMonth, ApyRequest, ApyResult, ApyYear, PensionRequest, PensionResult, PensionYear, PmSymRequest, PmSymResult,
    PmSymYear, PmvvyRequest, PmvvyResult, PmvvyYear, PENSION_EXIT_AGE, PMVVY_RATE, PMVVY_TERM_YEARS, PM_SYM_PENSION,
};
pub use provident::{calculate_epf, monthly_split, EpfRequest, EpfResult, EpfYear, EPS_RATE, EPS_WAGE_CEILING};
pub use retirement::{
    calculate_nps, calculate_retirement, growing_annuity_due_pv, NpsRequest, NpsResult, RetirementRequest,
    RetirementResult,
};
