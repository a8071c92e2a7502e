//! Runtime configuration from the environment

use log::{info, warn};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::api::CalculatorService;
use crate::client::{FallbackCalculator, RemoteCalculator};
use crate::error::{CalcError, CalcResult};
use crate::rules::TaxRules;

pub const RULES_PATH_VAR: &str = "FINCALC_RULES_PATH";
pub const REMOTE_URL_VAR: &str = "FINCALC_REMOTE_URL";
pub const REMOTE_TIMEOUT_VAR: &str = "FINCALC_REMOTE_TIMEOUT_SECS";
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// Directory of tax-rule CSV tables; built-in rules when None
    pub rules_path: Option<PathBuf>,
    pub remote_url: Option<String>,
    pub remote_timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            rules_path: None,
            remote_url: None,
            remote_timeout: Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS),
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let remote_timeout = match get(REMOTE_TIMEOUT_VAR) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) => Duration::from_secs(secs),
                Err(_) => {
                    warn!(
                        "Ignoring {}={:?}, using {}s",
                        REMOTE_TIMEOUT_VAR, raw, DEFAULT_REMOTE_TIMEOUT_SECS
                    );
                    Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS)
                }
            },
            None => Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS),
        };

        Self {
            rules_path: get(RULES_PATH_VAR).map(PathBuf::from),
            remote_url: get(REMOTE_URL_VAR),
            remote_timeout,
        }
    }

    pub fn load_rules(&self) -> CalcResult<TaxRules> {
        match &self.rules_path {
            Some(path) => {
                info!("Loading tax rules from {}", path.display());
                TaxRules::from_csv_path(path)
            }
            None => Ok(TaxRules::default_rules()),
        }
    }

    pub fn service(&self) -> CalcResult<CalculatorService> {
        Ok(CalculatorService::new(self.load_rules()?))
    }

    pub fn fallback_calculator(&self) -> CalcResult<FallbackCalculator> {
        let remote = self
            .remote_url
            .as_ref()
            .map(|url| RemoteCalculator::new(url.clone(), self.remote_timeout))
            .transpose()
            .map_err(|e| CalcError::Remote(format!("{}: {}", REMOTE_URL_VAR, e)))?;
        Ok(FallbackCalculator::new(remote, self.service()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> RuntimeConfig {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        RuntimeConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let c = config(&[]);
        assert_eq!(c, RuntimeConfig::default());
        assert_eq!(c.load_rules().unwrap(), TaxRules::default_rules());
    }

    #[test]
    fn test_values_and_bad_timeout() {
        let c = config(&[
            (REMOTE_URL_VAR, "https://calc.example.com"),
            (REMOTE_TIMEOUT_VAR, "12"),
            (RULES_PATH_VAR, "  "),
        ]);
        assert_eq!(c.remote_url.as_deref(), Some("https://calc.example.com"));
        assert_eq!(c.remote_timeout, Duration::from_secs(12));
        assert_eq!(c.rules_path, None);

        let bad = config(&[(REMOTE_TIMEOUT_VAR, "soon")]);
        assert_eq!(bad.remote_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_bad_remote_url_fails_fast() {
        let err = config(&[(REMOTE_URL_VAR, "calc.example.com")]).fallback_calculator().unwrap_err();
        assert!(matches!(err, CalcError::Remote(ref m) if m.contains(REMOTE_URL_VAR)), "{}", err);
        assert!(config(&[(REMOTE_URL_VAR, "http://127.0.0.1:9")]).fallback_calculator().is_ok());
    }

    #[test]
    fn test_rules_from_repo_tables() {
        let c = config(&[(RULES_PATH_VAR, "data/tax_rules")]);
        let rules = c.load_rules().unwrap();
        assert_eq!(rules.new_regime, TaxRules::default_rules().new_regime);
    }
}
