//! JSON dispatch from an endpoint to its calculator

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::api::Endpoint;
use crate::compare::{
    calculate_elss_vs_sip, calculate_fd_vs_sip, calculate_nps_vs_sip, calculate_ppf_vs_sip, calculate_rd_vs_fd_vs_sip,
    calculate_rd_vs_sip, calculate_ulip, calculate_ulip_vs_sip,
};
use crate::deposits::{
    calculate_fd, calculate_nsc, calculate_pomis, calculate_post_office_rd, calculate_ppf, calculate_rbi_bonds,
    calculate_rd, calculate_scss, calculate_sgb, calculate_ssy,
};
use crate::error::{CalcError, CalcResult};
use crate::growth::{
    calculate_compound_interest, calculate_future_value, calculate_inflation, calculate_kvp, calculate_reverse_cagr,
    calculate_roi, calculate_rule_of_72,
};
use crate::loan::{calculate_emi, calculate_interest_rate, calculate_loan_amount, calculate_loan_tenure};
use crate::planning::{
    calculate_apy, calculate_child_education, calculate_epf, calculate_marriage_plan, calculate_net_worth,
    calculate_nps, calculate_pension_requirements, calculate_pm_sym, calculate_pmvvy, calculate_retirement,
    calculate_vacation_savings,
};
use crate::returns::{
    analyse_xirr, calculate_etf_return, calculate_index_fund, calculate_stock_average, calculate_stock_return,
};
use crate::rules::TaxRules;
use crate::sip::{
    calculate_exit_load, calculate_expense_ratio, calculate_goal_sip, calculate_goal_sip_with_inflation_and_tax,
    calculate_lumpsum, calculate_lumpsum_vs_sip, calculate_sip, calculate_sip_delay, calculate_sip_exit_load,
    calculate_sip_with_expense_ratio, calculate_sip_with_inflation, calculate_sip_with_inflation_and_tax,
    calculate_step_up_sip, calculate_swp,
};
use crate::tax::{
    calculate_capital_gains, calculate_ctc, calculate_equity_gains, calculate_gratuity, calculate_gst, calculate_hra,
    calculate_income_tax, calculate_tds,
};

/// Decode `body`, run the calculator and encode its result
fn run<Req, Res, F>(body: Value, calculate: F) -> CalcResult<Value>
where
    Req: DeserializeOwned,
    Res: Serialize,
    F: FnOnce(&Req) -> CalcResult<Res>,
{
    let request: Req = serde_json::from_value(body)?;
    let result = calculate(&request)?;
    Ok(serde_json::to_value(result)?)
}

/// Routes JSON requests to calculators; the one place tax rules are injected
#[derive(Debug, Clone, Default)]
pub struct CalculatorService {
    rules: TaxRules,
}

impl CalculatorService {
    pub fn new(rules: TaxRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &TaxRules {
        &self.rules
    }

    /// Run one calculator; a successful object result carries `"status": "success"`
    pub fn handle(&self, endpoint: Endpoint, body: Value) -> CalcResult<Value> {
        debug!("Handling {}", endpoint);
        let rules = &self.rules;
        let mut value = match endpoint {
            Endpoint::Emi => run(body, calculate_emi),
            Endpoint::LoanAmount => run(body, calculate_loan_amount),
            Endpoint::LoanTenure => run(body, calculate_loan_tenure),
            Endpoint::InterestRate => run(body, calculate_interest_rate),
            Endpoint::CompoundInterest => run(body, calculate_compound_interest),
            Endpoint::FutureValue => run(body, calculate_future_value),
            Endpoint::Inflation => run(body, calculate_inflation),
            Endpoint::RuleOf72 => run(body, calculate_rule_of_72),
            Endpoint::Roi => run(body, calculate_roi),
            Endpoint::ReverseCagr => run(body, calculate_reverse_cagr),
            Endpoint::Kvp => run(body, calculate_kvp),
            Endpoint::Fd => run(body, calculate_fd),
            Endpoint::Rd => run(body, calculate_rd),
            Endpoint::Ppf => run(body, calculate_ppf),
            Endpoint::Nsc => run(body, calculate_nsc),
            Endpoint::Scss => run(body, calculate_scss),
            Endpoint::Pomis => run(body, calculate_pomis),
            Endpoint::Sip => run(body, calculate_sip),
            Endpoint::StepUpSip => run(body, calculate_step_up_sip),
            Endpoint::GoalSip => run(body, calculate_goal_sip),
            Endpoint::SipDelay => run(body, calculate_sip_delay),
            Endpoint::Lumpsum => run(body, calculate_lumpsum),
            Endpoint::LumpsumVsSip => run(body, calculate_lumpsum_vs_sip),
            Endpoint::Swp => run(body, calculate_swp),
            Endpoint::ChildEducation => run(body, calculate_child_education),
            Endpoint::MarriagePlanning => run(body, calculate_marriage_plan),
            Endpoint::Retirement => run(body, calculate_retirement),
            Endpoint::Nps => run(body, calculate_nps),
            Endpoint::Epf => run(body, calculate_epf),
            Endpoint::Ulip => run(body, calculate_ulip),
            Endpoint::UlipVsSip => run(body, calculate_ulip_vs_sip),
            Endpoint::ElssVsSip => run(body, calculate_elss_vs_sip),
            Endpoint::FdVsSip => run(body, calculate_fd_vs_sip),
            Endpoint::IncomeTax => run(body, |r| calculate_income_tax(r, rules)),
            Endpoint::Hra => run(body, calculate_hra),
            Endpoint::Ctc => run(body, |r| calculate_ctc(r, rules)),
            Endpoint::CapitalGains => run(body, |r| calculate_capital_gains(r, rules)),
            Endpoint::Ltcg => run(body, |r| calculate_equity_gains(r, rules)),
            Endpoint::Gst => run(body, calculate_gst),
            Endpoint::Gratuity => run(body, |r| calculate_gratuity(r, rules)),
            Endpoint::Xirr => run(body, analyse_xirr),
            Endpoint::StockAverage => run(body, calculate_stock_average),
            Endpoint::PpfVsSip => run(body, calculate_ppf_vs_sip),
            Endpoint::Ssy => run(body, calculate_ssy),
            Endpoint::Apy => run(body, calculate_apy),
            Endpoint::Pmvvy => run(body, calculate_pmvvy),
            Endpoint::PmSym => run(body, calculate_pm_sym),
            Endpoint::Sgb => run(body, calculate_sgb),
            Endpoint::RbiBonds => run(body, calculate_rbi_bonds),
            Endpoint::PostOfficeRd => run(body, calculate_post_office_rd),
            Endpoint::RdVsSip => run(body, calculate_rd_vs_sip),
            Endpoint::RdVsFdVsSip => run(body, calculate_rd_vs_fd_vs_sip),
            Endpoint::NpsVsSip => run(body, |r| calculate_nps_vs_sip(r, rules)),
            Endpoint::Tds => run(body, calculate_tds),
            Endpoint::ExitLoad => run(body, calculate_exit_load),
            Endpoint::SipExitLoad => run(body, calculate_sip_exit_load),
            Endpoint::SipWithInflation => run(body, calculate_sip_with_inflation),
            Endpoint::SipWithInflationAndTax => run(body, calculate_sip_with_inflation_and_tax),
            Endpoint::GoalSipWithInflationAndTax => run(body, calculate_goal_sip_with_inflation_and_tax),
            Endpoint::ExpenseRatio => run(body, calculate_expense_ratio),
            Endpoint::SipWithExpenseRatio => run(body, calculate_sip_with_expense_ratio),
            Endpoint::Pension => run(body, calculate_pension_requirements),
            Endpoint::StockReturn => run(body, calculate_stock_return),
            Endpoint::EtfReturn => run(body, calculate_etf_return),
            Endpoint::IndexFund => run(body, calculate_index_fund),
            Endpoint::NetWorth => run(body, calculate_net_worth),
            Endpoint::VacationSavings => run(body, calculate_vacation_savings),
        }?;
        if let Value::Object(map) = &mut value {
            map.insert("status".to_string(), Value::String("success".to_string()));
        }
        Ok(value)
    }

    pub fn handle_path(&self, path: &str, body: Value) -> CalcResult<Value> {
        let endpoint = Endpoint::from_path(path).ok_or_else(|| CalcError::UnknownEndpoint(path.to_string()))?;
        self.handle(endpoint, body)
    }

    /// HTTP status and JSON body for a request, errors included
    pub fn respond(&self, path: &str, body: Value) -> (u16, Value) {
        match self.handle_path(path, body) {
            Ok(value) => (200, value),
            Err(e) => (status_code(&e), error_body(&e)),
        }
    }
}

pub fn status_code(error: &CalcError) -> u16 {
    match error {
        CalcError::UnknownEndpoint(_) => 404,
        e if e.is_client_error() => 400,
        _ => 500,
    }
}

pub fn error_body(error: &CalcError) -> Value {
    json!({ "status": "error", "error": error.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_injects_status() {
        let service = CalculatorService::default();
        let value = service
            .handle(
                Endpoint::Gst,
                json!({"amount": 100, "gst_rate": 18, "calculation_type": "add"}),
            )
            .unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["total_amount"], 118.0);
    }

    #[test]
    fn test_respond_status_codes() {
        let service = CalculatorService::default();
        let (code, body) = service.respond("/calculate-nothing", json!({}));
        assert_eq!(code, 404);
        assert_eq!(body["status"], "error");

        let (code, body) = service.respond("/calculate-gst", json!({"amount": "lots"}));
        assert_eq!(code, 400);
        assert!(body["error"].as_str().unwrap().starts_with("malformed request"));

        let (code, _) = service.respond("/calculate-gst/", json!({"amount": -5, "gst_rate": 18}));
        assert_eq!(code, 400);
    }

    #[test]
    fn test_rules_reach_tax_calculators() {
        let mut rules = TaxRules::default_rules();
        rules.gratuity_exemption_cap = 100_000.0;
        let service = CalculatorService::new(rules);
        let value = service
            .handle(
                Endpoint::Gratuity,
                json!({"last_salary": 52000, "years_of_service": 10}),
            )
            .unwrap();
        assert_eq!(value["gratuity_amount"], 300_000.0);
        assert_eq!(value["tax_exempt_amount"], 100_000.0);
    }

    #[test]
    fn test_rules_reach_nps_comparison() {
        let mut rules = TaxRules::default_rules();
        rules.deductions.section_80ccd_1b = 20_000.0;
        let service = CalculatorService::new(rules);
        let value = service
            .handle(
                Endpoint::NpsVsSip,
                json!({"monthly_investment": 5000, "investment_duration": 10, "tax_slab": 30}),
            )
            .unwrap();
        assert_eq!(value["nps"]["annual_tax_saved"], 6_000.0);
    }
}
