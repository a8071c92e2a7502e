//! fincalc - Financial-formula engine for loan, investment, savings-scheme and tax calculators
//!
//! This library provides:
//! - Loan amortization ledgers and inverse solvers (amount, tenure, rate)
//! - Compound growth, inflation, SIP and systematic-withdrawal ledgers, fund charges
//! - Deposit, small-savings and bond schemes (FD, RD, PPF, NSC, SCSS, POMIS, SSY, SGB)
//! - Goal, retirement, pension-scheme and household planning
//! - Product comparisons and market returns
//! - Indian income tax, CTC, HRA, capital gains, GST, gratuity and TDS
//! - A JSON endpoint layer with a remote-first, local-fallback client

pub mod error;
pub mod rates;
pub mod rules;
pub mod loan;
pub mod growth;
pub mod deposits;
pub mod sip;
pub mod planning;
pub mod compare;
pub mod tax;
pub mod returns;
pub mod api;
pub mod client;
pub mod export;
pub mod scenario;
pub mod config;

// Re-export commonly used types
pub use api::{CalculatorService, Endpoint};
pub use client::{FallbackCalculator, RemoteCalculator, Source};
pub use config::RuntimeConfig;
pub use error::{CalcError, CalcResult};
pub use loan::{AmortizationRow, AmortizationSchedule, LoanEngine, LoanTerms};
pub use rates::Frequency;
pub use rules::TaxRules;
pub use scenario::{Scenario, ScenarioOutcome, ScenarioRunner};
