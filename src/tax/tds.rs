//! Tax deducted at source on common non-salary payments

use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, CalcResult};
use crate::rates::round2;

use super::slabs::TaxRegime;

/// Income-tax Act section a payment is made under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TdsSection {
    /// EPF withdrawal before five years of service
    #[serde(rename = "192A")]
    S192A,
    /// Interest other than on securities
    #[serde(rename = "194A")]
    S194A,
    #[serde(rename = "194C")]
    S194C,
    #[serde(rename = "194D")]
    S194D,
    #[serde(rename = "194G")]
    S194G,
    #[serde(rename = "194H")]
    S194H,
    /// Rent
    #[serde(rename = "194I")]
    S194I,
    /// Professional or technical fees
    #[serde(rename = "194J")]
    S194J,
    #[serde(rename = "194K")]
    S194K,
    #[serde(rename = "194LA")]
    S194LA,
    #[serde(rename = "194M")]
    S194M,
    /// Cash withdrawals
    #[serde(rename = "194N")]
    S194N,
    /// E-commerce operators
    #[serde(rename = "194O")]
    S194O,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PayeeCategory {
    /// Individuals and HUFs
    #[default]
    Individual,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PanStatus {
    #[default]
    Yes,
    No,
}

/// Rate with PAN, rate without PAN and the threshold below which nothing is deducted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TdsRate {
    pub with_pan: f64,
    pub without_pan: f64,
    pub threshold: f64,
}

const fn rate(with_pan: f64, without_pan: f64, threshold: f64) -> TdsRate {
    TdsRate {
        with_pan,
        without_pan,
        threshold,
    }
}

/// New-regime interest: nothing up to 50,000, then 10 % up to 5 lakh and 15 % beyond
const INTEREST_SLAB_THRESHOLD: f64 = 50_000.0;
const INTEREST_SLAB_TOP: f64 = 500_000.0;

impl TdsSection {
    pub fn rate(&self, category: PayeeCategory) -> TdsRate {
        match self {
            TdsSection::S192A => rate(10.0, 20.0, 30_000.0),
            TdsSection::S194A => rate(10.0, 20.0, 40_000.0),
            TdsSection::S194C => match category {
                PayeeCategory::Individual => rate(1.0, 20.0, 30_000.0),
                PayeeCategory::Other => rate(2.0, 20.0, 30_000.0),
            },
            TdsSection::S194D => rate(5.0, 20.0, 15_000.0),
            TdsSection::S194G => rate(5.0, 20.0, 15_000.0),
            TdsSection::S194H => rate(5.0, 20.0, 15_000.0),
            TdsSection::S194I => rate(10.0, 20.0, 240_000.0),
            TdsSection::S194J => rate(10.0, 20.0, 30_000.0),
            TdsSection::S194K => rate(10.0, 20.0, 25_000.0),
            TdsSection::S194LA => rate(10.0, 20.0, 250_000.0),
            TdsSection::S194M => rate(0.1, 5.0, 500_000.0),
            TdsSection::S194N => rate(2.0, 2.0, 1_000_000.0),
            TdsSection::S194O => rate(1.0, 5.0, 500_000.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TdsRequest {
    #[serde(default)]
    pub category: PayeeCategory,
    #[serde(default)]
    pub regime_type: TaxRegime,
    #[serde(default)]
    pub pan_available: PanStatus,
    pub payment_type: TdsSection,
    pub payment_amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TdsResult {
    pub payment_amount: f64,
    pub tds_amount: f64,
    pub net_amount: f64,
    /// Rate actually applied, 0 below the threshold
    pub applicable_rate: f64,
    pub threshold: f64,
    pub threshold_message: String,
    pub payment_type: TdsSection,
    pub pan_available: PanStatus,
    pub category: PayeeCategory,
    pub regime_type: TaxRegime,
    /// Deduction as a share of the payment
    pub tds_percentage: f64,
}

fn section_name(section: TdsSection) -> String {
    serde_json::to_value(section)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// Rate and threshold that apply to one payment
fn applicable(request: &TdsRequest) -> (f64, f64) {
    let amount = request.payment_amount;
    if request.payment_type == TdsSection::S194A && request.regime_type == TaxRegime::New {
        let rate = match request.pan_available {
            _ if amount <= INTEREST_SLAB_THRESHOLD => 0.0,
            PanStatus::No => 20.0,
            PanStatus::Yes if amount <= INTEREST_SLAB_TOP => 10.0,
            PanStatus::Yes => 15.0,
        };
        return (rate, INTEREST_SLAB_THRESHOLD);
    }
    let table = request.payment_type.rate(request.category);
    if amount < table.threshold {
        return (0.0, table.threshold);
    }
    let rate = match request.pan_available {
        PanStatus::Yes => table.with_pan,
        PanStatus::No => table.without_pan,
    };
    (rate, table.threshold)
}

pub fn calculate_tds(request: &TdsRequest) -> CalcResult<TdsResult> {
    ensure_positive("payment_amount", request.payment_amount)?;

    let amount = request.payment_amount;
    let (rate, threshold) = applicable(request);
    let tds = amount * rate / 100.0;
    let threshold_message = if rate == 0.0 {
        format!(
            "No TDS required as payment amount (₹{:.0}) is below threshold (₹{:.0})",
            amount, threshold
        )
    } else {
        format!(
            "TDS at {}% under section {} as payment amount (₹{:.0}) exceeds threshold (₹{:.0})",
            rate,
            section_name(request.payment_type),
            amount,
            threshold
        )
    };

    Ok(TdsResult {
        payment_amount: amount,
        tds_amount: round2(tds),
        net_amount: round2(amount - tds),
        applicable_rate: rate,
        threshold,
        threshold_message,
        payment_type: request.payment_type,
        pan_available: request.pan_available,
        category: request.category,
        regime_type: request.regime_type,
        tds_percentage: round2(tds / amount * 100.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tds(section: &str, amount: f64, pan: &str, regime: &str) -> TdsResult {
        let req: TdsRequest = serde_json::from_value(serde_json::json!({
            "payment_type": section,
            "payment_amount": amount,
            "pan_available": pan,
            "regime_type": regime,
        }))
        .unwrap();
        calculate_tds(&req).unwrap()
    }

    #[test]
    fn test_professional_fees() {
        let r = tds("194J", 100_000.0, "yes", "old");
        assert_eq!(r.tds_amount, 10_000.0);
        assert_eq!(r.net_amount, 90_000.0);
        assert_eq!(r.threshold, 30_000.0);
        assert!(r.threshold_message.contains("194J"));

        let r = tds("194J", 100_000.0, "no", "old");
        assert_eq!(r.applicable_rate, 20.0);
    }

    #[test]
    fn test_below_threshold() {
        let r = tds("194I", 200_000.0, "yes", "old");
        assert_eq!(r.tds_amount, 0.0);
        assert_eq!(r.applicable_rate, 0.0);
        assert!(r.threshold_message.starts_with("No TDS"));
    }

    #[test]
    fn test_new_regime_interest_slabs() {
        assert_eq!(tds("194A", 45_000.0, "yes", "new").tds_amount, 0.0);
        assert_eq!(tds("194A", 45_000.0, "yes", "old").tds_amount, 4_500.0);
        assert_eq!(tds("194A", 100_000.0, "yes", "new").tds_amount, 10_000.0);
        assert_eq!(tds("194A", 600_000.0, "yes", "new").applicable_rate, 15.0);
        assert_eq!(tds("194A", 100_000.0, "no", "new").applicable_rate, 20.0);
    }

    #[test]
    fn test_contractor_rate_depends_on_payee() {
        let req: TdsRequest = serde_json::from_str(
            r#"{"category": "other", "payment_type": "194C", "payment_amount": 50000}"#,
        )
        .unwrap();
        assert_eq!(calculate_tds(&req).unwrap().tds_amount, 1_000.0);
        assert_eq!(tds("194C", 50_000.0, "yes", "old").tds_amount, 500.0);
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        let parsed: Result<TdsRequest, _> =
            serde_json::from_str(r#"{"payment_type": "999Z", "payment_amount": 50000}"#);
        assert!(parsed.is_err());
    }
}
