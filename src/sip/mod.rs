//! Installment investing: SIP variants, lump sums, systematic withdrawals and fund charges

mod charges;
mod goal;
mod ledger;
mod lumpsum;
mod plan;
mod real;
mod swp;

pub use charges::{
    calculate_exit_load, calculate_expense_ratio, calculate_sip_exit_load, calculate_sip_with_expense_ratio,
    ExitLoadRequest, ExitLoadResult, ExitLoadYear, ExpenseRatioRequest, ExpenseRatioResult, ExpenseYear,
    InvestmentMode, SipExitLoadRequest, SipExitLoadResult, SipExpenseRequest, SipExpenseResult, SipExpenseYear,
};
pub use goal::{calculate_goal_sip, required_installment, GoalMonth, GoalSipRequest, GoalSipResult, GoalYear};
pub use ledger::{InstallmentLedger, LedgerYear};
pub use lumpsum::{
    calculate_lumpsum, calculate_lumpsum_vs_sip, lumpsum_value, BetterOption, ComparisonYear, LumpsumRequest,
    LumpsumResponse, LumpsumVsSipRequest, LumpsumVsSipResponse, LumpsumYear,
};
pub use plan::{
    calculate_sip, calculate_sip_delay, calculate_step_up_sip, sip_future_value, SipDelayRequest,
    SipDelayResponse, SipDelayYear, SipRequest, SipResponse, SipYear, StepUpSipRequest, StepUpSipResponse,
    StepUpType,
};
pub use real::{
    calculate_goal_sip_with_inflation_and_tax, calculate_sip_with_inflation, calculate_sip_with_inflation_and_tax,
    GoalSipInflationTaxRequest, GoalSipInflationTaxResult, GoalSipInflationTaxYear, SipInflationRequest,
    SipInflationResult, SipInflationTaxRequest, SipInflationTaxResult, SipInflationTaxYear, SipInflationYear,
};
pub use swp::{calculate_swp, SwpRequest, SwpResult, SwpYear};
