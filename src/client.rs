//! Remote calculation with a local fallback
//!
//! The remote endpoint is tried first. When it cannot be reached or answers
//! with a non-success HTTP status the same calculator runs in-process. An
//! error reported by the remote itself is passed through unchanged.

use log::{debug, warn};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::api::{CalculatorService, Endpoint};
use crate::error::{CalcError, CalcResult};

/// Where a result was computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Remote,
    Local,
}

#[derive(Debug, Error)]
pub enum RemoteFailure {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("invalid base URL '{0}'")]
    BaseUrl(String),

    /// The server answered and named an error; not retried locally
    #[error("{0}")]
    Reported(String),
}

/// Posts calculator requests to `{base_url}{endpoint path}`
#[derive(Debug, Clone)]
pub struct RemoteCalculator {
    client: Client,
    base_url: String,
}

impl RemoteCalculator {
    /// Fails when the base URL is not an absolute http(s) URL or the HTTP
    /// client cannot be built
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteFailure> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        match Url::parse(&base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => return Err(RemoteFailure::BaseUrl(base_url)),
        }
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self { client, base_url })
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    pub async fn calculate(&self, endpoint: Endpoint, body: &Value) -> Result<Value, RemoteFailure> {
        let response = self.client.post(self.url(endpoint)).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteFailure::Status(status.as_u16()));
        }
        let value: Value = response.json().await?;
        if let Some(message) = value.get("error").and_then(Value::as_str) {
            return Err(RemoteFailure::Reported(message.to_string()));
        }
        Ok(value)
    }
}

/// Remote first, local engine on transport failure
#[derive(Debug, Clone)]
pub struct FallbackCalculator {
    remote: Option<RemoteCalculator>,
    local: CalculatorService,
}

impl FallbackCalculator {
    pub fn new(remote: Option<RemoteCalculator>, local: CalculatorService) -> Self {
        Self { remote, local }
    }

    pub fn local_only(local: CalculatorService) -> Self {
        Self::new(None, local)
    }

    pub async fn calculate(&self, endpoint: Endpoint, body: Value) -> CalcResult<(Value, Source)> {
        if let Some(remote) = &self.remote {
            match remote.calculate(endpoint, &body).await {
                Ok(value) => {
                    debug!("{} answered by {}", endpoint, remote.url(endpoint));
                    return Ok((value, Source::Remote));
                }
                Err(RemoteFailure::Reported(message)) => return Err(CalcError::Remote(message)),
                Err(e) => warn!("Remote {} failed ({}), computing locally", endpoint, e),
            }
        }
        let value = self.local.handle(endpoint, body)?;
        Ok((value, Source::Local))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sip_body() -> Value {
        json!({"sipAmount": 10000, "returnRate": 12, "tenureYears": 10})
    }

    #[tokio::test]
    async fn test_local_only() {
        let calc = FallbackCalculator::local_only(CalculatorService::default());
        let (value, source) = calc.calculate(Endpoint::Sip, sip_body()).await.unwrap();
        assert_eq!(source, Source::Local);
        assert_eq!(value["status"], "success");
    }

    #[tokio::test]
    async fn test_unreachable_remote_falls_back() {
        // Nothing listens on port 9 of the loopback interface
        let remote = RemoteCalculator::new("http://127.0.0.1:9/", Duration::from_secs(2)).unwrap();
        assert_eq!(remote.url(Endpoint::Sip), "http://127.0.0.1:9/calculate-sip");
        let calc = FallbackCalculator::new(Some(remote), CalculatorService::default());
        let (value, source) = calc.calculate(Endpoint::Sip, sip_body()).await.unwrap();
        assert_eq!(source, Source::Local);
        let fv = value["futureValue"].as_f64().unwrap();
        assert!((fv - 2_323_390.76).abs() < 0.05, "{}", fv);
    }

    #[test]
    fn test_bad_base_url_is_an_error() {
        for url in ["calc.example.com", "ftp://calc.example.com", ""] {
            let err = RemoteCalculator::new(url, Duration::from_secs(1)).unwrap_err();
            assert!(matches!(err, RemoteFailure::BaseUrl(_)), "{}: {}", url, err);
        }
        assert!(RemoteCalculator::new("https://calc.example.com/", Duration::from_secs(1)).is_ok());
    }

    #[tokio::test]
    async fn test_local_errors_surface() {
        let calc = FallbackCalculator::local_only(CalculatorService::default());
        let err = calc
            .calculate(Endpoint::Sip, json!({"sipAmount": 0, "returnRate": 12, "tenureYears": 10}))
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }
}
