//! Error taxonomy and input validation shared by every calculator

use thiserror::Error;

/// Errors produced by the calculation engine
#[derive(Debug, Error)]
pub enum CalcError {
    /// An input value is outside its accepted range
    #[error("invalid {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },

    /// The requested quantity cannot be solved for with these inputs
    #[error("no solution: {0}")]
    NoSolution(String),

    /// No calculator is registered under the requested path
    #[error("unknown calculator endpoint: {0}")]
    UnknownEndpoint(String),

    /// The request body could not be decoded into the calculator's input
    #[error("malformed request: {0}")]
    Request(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A rule table on disk is inconsistent
    #[error("rule table error: {0}")]
    Rules(String),

    /// The remote endpoint reported a failure of its own
    #[error("remote calculation failed: {0}")]
    Remote(String),
}

pub type CalcResult<T> = Result<T, CalcError>;

impl CalcError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Whether the error was caused by the caller's input (HTTP 4xx)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. }
                | CalcError::NoSolution(_)
                | CalcError::UnknownEndpoint(_)
                | CalcError::Request(_)
        )
    }
}

fn ensure_finite(field: &'static str, value: f64) -> CalcResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CalcError::invalid(field, "must be a finite number"))
    }
}

/// Reject zero, negative and non-finite values
pub fn ensure_positive(field: &'static str, value: f64) -> CalcResult<()> {
    ensure_finite(field, value)?;
    if value <= 0.0 {
        return Err(CalcError::invalid(field, format!("must be greater than 0, got {}", value)));
    }
    Ok(())
}

/// Reject negative and non-finite values
pub fn ensure_non_negative(field: &'static str, value: f64) -> CalcResult<()> {
    ensure_finite(field, value)?;
    if value < 0.0 {
        return Err(CalcError::invalid(field, format!("must not be negative, got {}", value)));
    }
    Ok(())
}

/// Inclusive range check
pub fn ensure_range(field: &'static str, value: f64, min: f64, max: f64) -> CalcResult<()> {
    ensure_finite(field, value)?;
    if value < min || value > max {
        return Err(CalcError::invalid(
            field,
            format!("must be between {} and {}, got {}", min, max, value),
        ));
    }
    Ok(())
}
