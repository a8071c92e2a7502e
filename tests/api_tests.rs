//! End-to-end calls through the JSON endpoint layer

use approx::assert_abs_diff_eq;
use fincalc::{CalculatorService, Endpoint, RuntimeConfig, Scenario, ScenarioRunner};
use serde_json::{json, Value};

fn ok(service: &CalculatorService, path: &str, body: Value) -> Value {
    let (status, value) = service.respond(path, body);
    assert_eq!(status, 200, "{} answered {}", path, value);
    assert_eq!(value["status"], "success");
    value
}

#[test]
fn emi_on_the_legacy_path() {
    let service = CalculatorService::default();
    let value = ok(
        &service,
        "/calculate",
        json!({"loanAmount": 100000, "interestRate": 12, "tenureYears": 1, "startYear": 2025, "startMonth": 1}),
    );
    assert_abs_diff_eq!(value["emi"].as_f64().unwrap(), 8884.88, epsilon = 0.01);
    assert_abs_diff_eq!(value["totalAmount"].as_f64().unwrap(), 106_618.55, epsilon = 0.05);
    assert_eq!(value["yearlyPaymentSchedule"].as_array().unwrap().len(), 1);
}

#[test]
fn income_tax_compares_regimes() {
    let service = CalculatorService::default();
    let value = ok(
        &service,
        "/calculate-income-tax-old-new-regime",
        json!({"salary": 1200000, "age_group": "0-60"}),
    );
    assert_abs_diff_eq!(value["old_regime"]["total_tax"].as_f64().unwrap(), 163_800.0, epsilon = 0.01);
    assert_abs_diff_eq!(value["new_regime"]["total_tax"].as_f64().unwrap(), 85_800.0, epsilon = 0.01);
    assert_eq!(value["better_regime"], "New Regime");
}

#[test]
fn equity_capital_gains() {
    let service = CalculatorService::default();
    let value = ok(
        &service,
        "/calculate-capital-gains",
        json!({
            "assetType": "equity_share",
            "purchaseDate": "2022-01-01",
            "saleDate": "2024-08-01",
            "purchaseValue": 500000,
            "saleValue": 800000
        }),
    );
    assert_eq!(value["isLongTerm"], true);
    assert_eq!(value["taxableGain"], 175_000.0);
    assert_eq!(value["taxDetails"]["totalTax"], 22_750.0);
}

#[test]
fn ppf_yearly_ledger() {
    let service = CalculatorService::default();
    let value = ok(
        &service,
        "/calculate-ppf",
        json!({"annual_contribution": 150000, "duration_years": 15}),
    );
    let years = value["year_wise_data"].as_array().unwrap();
    assert_eq!(years.len(), 15);
    assert_eq!(years[0]["closing_balance"], 160_650.0);
    assert_eq!(value["total_investment"], 2_250_000.0);
}

#[test]
fn ppf_against_sip() {
    let service = CalculatorService::default();
    let value = ok(
        &service,
        "/calculate-ppf-vs-sip",
        json!({"ppfMonthlyAmount": 12500, "sipMonthlyAmount": 12500, "sipReturnRate": 12, "duration": 15}),
    );
    assert_eq!(value["betterOption"], "SIP");
    assert_eq!(value["ppf"]["totalInvested"], 2_250_000.0);
    assert_eq!(value["yearlyBreakdown"].as_array().unwrap().len(), 15);
    assert_eq!(value["yearlyBreakdown"][0]["ppf"]["balance"], 160_650.0);

    let value = ok(&service, "/calculate-ppf-vs-sip", json!({"sipReturnRate": 4}));
    assert_eq!(value["betterOption"], "PPF");
}

#[test]
fn tds_on_professional_fees() {
    let service = CalculatorService::default();
    let value = ok(
        &service,
        "/calculate-tds",
        json!({"payment_type": "194J", "payment_amount": 100000, "pan_available": "no"}),
    );
    assert_eq!(value["applicable_rate"], 20.0);
    assert_eq!(value["tds_amount"], 20_000.0);

    let (status, _) = service.respond("/calculate-tds", json!({"payment_type": "194Z", "payment_amount": 1000}));
    assert_eq!(status, 400);
}

#[test]
fn government_schemes() {
    let service = CalculatorService::default();
    let value = ok(
        &service,
        "/calculate-ssy",
        json!({"investment_amount": 150000, "investment_frequency": "yearly"}),
    );
    assert_eq!(value["yearly_breakdown"].as_array().unwrap().len(), 21);
    assert_eq!(value["total_investment"], 2_250_000.0);

    let (status, _) = service.respond("/calculate-ssy", json!({"investment_amount": 200000}));
    assert_eq!(status, 400);
}

#[test]
fn exit_load_inside_window() {
    let service = CalculatorService::default();
    let value = ok(
        &service,
        "/calculate-exit-load",
        json!({
            "investment_amount": 100000, "exit_load_rate": 1, "exit_load_period": 365,
            "purchase_nav": 20, "current_nav": 25, "holding_period_days": 200
        }),
    );
    assert_eq!(value["exit_load_charge"], 1_250.0);
    assert_eq!(value["net_redemption_amount"], 123_750.0);
}

#[test]
fn nps_against_sip_uses_service_rules() {
    let service = CalculatorService::default();
    let value = ok(
        &service,
        "/calculate-nps-vs-sip",
        json!({"monthly_investment": 5000, "investment_duration": 20}),
    );
    assert_eq!(value["better_option"], "SIP");
    assert_eq!(value["nps"]["annual_tax_saved"], 15_000.0);
    assert_eq!(value["yearly_breakdown"].as_array().unwrap().len(), 20);
}

#[test]
fn expense_ratio_alias_path() {
    let service = CalculatorService::default();
    let body = json!({"investmentAmount": 100000, "expectedReturn": 12, "expenseRatio": 1, "investmentPeriod": 10});
    let direct = ok(&service, "/calculate-expense-ratio", body.clone());
    let alias = ok(&service, "/calculate-mutual-fund-expense-ratio", body);
    assert_eq!(direct, alias);
}

#[test]
fn errors_map_to_status_codes() {
    let service = CalculatorService::default();

    let (status, value) = service.respond("/calculate-everything", json!({}));
    assert_eq!(status, 404);
    assert_eq!(value["status"], "error");

    let (status, value) = service.respond("/calculate-sip", json!({"sipAmount": -1, "returnRate": 12, "tenureYears": 5}));
    assert_eq!(status, 400);
    assert!(value["error"].is_string());
}

#[test]
fn every_endpoint_rejects_garbage_without_panicking() {
    let service = CalculatorService::default();
    for endpoint in Endpoint::ALL {
        let (status, value) = service.respond(endpoint.path(), json!("not an object"));
        assert_eq!(status, 400, "{}", endpoint);
        assert_eq!(value["status"], "error");
    }

    let oversized = [
        ("/calculate-emi", json!({"loanAmount": 100000, "interestRate": 10, "tenureYears": 400000000})),
        ("/calculate-loan-amount", json!({"emi": 10000, "interestRate": 10, "tenureYears": 400000000})),
        ("/calculate-interest-rate", json!({"loanAmount": 100000, "emi": 10000, "tenureYears": 357913942})),
        ("/calculate-marriage-planning", json!({
            "current_marriage_cost": 2000000, "inflation_rate": 6, "current_age": 0,
            "marriage_age": 4294967295u32, "expected_return": 12
        })),
    ];
    for (path, body) in oversized {
        let (status, value) = service.respond(path, body);
        assert_eq!(status, 400, "{} answered {}", path, value);
        assert_eq!(value["status"], "error");
    }
}

#[test]
fn repo_rule_tables_match_built_in_rules() {
    let config = RuntimeConfig {
        rules_path: Some("data/tax_rules".into()),
        ..RuntimeConfig::default()
    };
    let from_files = config.service().unwrap();
    let built_in = CalculatorService::default();
    let body = json!({"salary": 1800000, "section_80c": 150000});
    assert_eq!(
        from_files.handle(Endpoint::IncomeTax, body.clone()).unwrap(),
        built_in.handle(Endpoint::IncomeTax, body).unwrap()
    );
}

#[test]
fn batch_from_json() {
    let scenarios: Vec<Scenario> = serde_json::from_value(json!([
        {"name": "gst", "endpoint": "gst", "request": {"amount": 1000, "gst_rate": 18}},
        {"name": "gratuity", "endpoint": "gratuity", "request": {"last_salary": 52000, "years_of_service": 10}}
    ]))
    .unwrap();
    let outcomes = ScenarioRunner::new().run_batch(&scenarios);
    assert!(outcomes.iter().all(|o| o.ok));
    assert_eq!(outcomes[1].response["gratuity_amount"], 300_000.0);
}
