//! Batch runner for many calculator requests
//!
//! Holds one `CalculatorService` (and so one copy of the tax rules) and fans
//! a batch of requests out over the rayon thread pool.

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Instant;

use crate::api::{error_body, CalculatorService, Endpoint};
use crate::error::CalcResult;
use crate::rules::TaxRules;

/// One request of a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Free-form label echoed in the outcome
    #[serde(default)]
    pub name: Option<String>,
    pub endpoint: Endpoint,
    pub request: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub name: Option<String>,
    pub endpoint: Endpoint,
    pub ok: bool,
    /// Calculator result, or the error body
    pub response: Value,
}

/// ```ignore
/// let runner = ScenarioRunner::from_csv()?;
/// let outcomes = runner.run_batch(&scenarios);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    service: CalculatorService,
}

impl ScenarioRunner {
    /// Runner with the built-in tax rules
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner with rules loaded from the default CSV directory
    pub fn from_csv() -> CalcResult<Self> {
        Ok(Self::with_rules(TaxRules::from_csv()?))
    }

    pub fn from_csv_path(path: &Path) -> CalcResult<Self> {
        Ok(Self::with_rules(TaxRules::from_csv_path(path)?))
    }

    pub fn with_rules(rules: TaxRules) -> Self {
        Self {
            service: CalculatorService::new(rules),
        }
    }

    pub fn service(&self) -> &CalculatorService {
        &self.service
    }

    pub fn run(&self, scenario: &Scenario) -> ScenarioOutcome {
        let (ok, response) = match self.service.handle(scenario.endpoint, scenario.request.clone()) {
            Ok(value) => (true, value),
            Err(e) => (false, error_body(&e)),
        };
        ScenarioOutcome {
            name: scenario.name.clone(),
            endpoint: scenario.endpoint,
            ok,
            response,
        }
    }

    /// Outcomes come back in input order
    pub fn run_batch(&self, scenarios: &[Scenario]) -> Vec<ScenarioOutcome> {
        let start = Instant::now();
        let outcomes: Vec<ScenarioOutcome> = scenarios.par_iter().map(|s| self.run(s)).collect();
        let failed = outcomes.iter().filter(|o| !o.ok).count();
        info!(
            "Ran {} scenarios ({} failed) in {:?}",
            outcomes.len(),
            failed,
            start.elapsed()
        );
        outcomes
    }

    /// The same calculator over a list of request variants
    pub fn run_variants(&self, endpoint: Endpoint, requests: &[Value]) -> Vec<ScenarioOutcome> {
        let scenarios: Vec<Scenario> = requests
            .iter()
            .map(|request| Scenario {
                name: None,
                endpoint,
                request: request.clone(),
            })
            .collect();
        self.run_batch(&scenarios)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_batch_keeps_order_and_isolates_failures() {
        let runner = ScenarioRunner::new();
        let scenarios: Vec<Scenario> = serde_json::from_value(json!([
            {"name": "sip", "endpoint": "sip", "request": {"sipAmount": 5000, "returnRate": 12, "tenureYears": 5}},
            {"name": "bad", "endpoint": "gst", "request": {"amount": 0, "gst_rate": 18}},
            {"name": "fd", "endpoint": "fd", "request": {"principal_amount": 100000, "annual_interest_rate": 7, "tenure_years": 3}}
        ]))
        .unwrap();
        let outcomes = runner.run_batch(&scenarios);
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].name.as_deref(), Some("sip"));
        assert!(outcomes[0].ok);
        assert!(!outcomes[1].ok);
        assert_eq!(outcomes[1].response["status"], "error");
        assert!(outcomes[2].ok);
        assert_eq!(outcomes[2].endpoint, Endpoint::Fd);
    }

    #[test]
    fn test_variants() {
        let runner = ScenarioRunner::new();
        let requests: Vec<Value> = [8.0, 10.0, 12.0]
            .iter()
            .map(|rate| json!({"sipAmount": 1000, "returnRate": rate, "tenureYears": 10}))
            .collect();
        let outcomes = runner.run_variants(Endpoint::Sip, &requests);
        let values: Vec<f64> = outcomes
            .iter()
            .map(|o| o.response["futureValue"].as_f64().unwrap())
            .collect();
        assert!(values[0] < values[1] && values[1] < values[2]);
    }
}
