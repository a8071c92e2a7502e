//! Loan amortization engine: EMI, month-by-month ledger and inverse solvers

mod engine;
mod schedule;
mod solve;
mod state;

pub use engine::{
    calculate_emi, emi, tenure_months, EmiRequest, EmiResponse, EmiTiming, LoanEngine, LoanTerms, LoanType,
    MAX_TENURE_MONTHS,
};
pub use schedule::{
    AmortizationRow, AmortizationSchedule, MonthlyPaymentRow, ScheduleSummary, YearlyPaymentRow, YearlySummary,
};
pub use solve::{
    calculate_interest_rate, calculate_loan_amount, calculate_loan_tenure, loan_amount_for_emi, rate_for_emi,
    tenure_for_emi, InterestRateRequest, InterestRateResponse, LoanAmountRequest, LoanAmountResponse,
    LoanTenureRequest, LoanTenureResponse,
};
pub use state::LoanState;
