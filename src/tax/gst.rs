//! Goods and services tax: adding it to a price or backing it out of one

use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, ensure_range, CalcResult};
use crate::rates::round2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GstCalculation {
    /// The amount excludes GST
    #[default]
    Add,
    /// The amount already includes GST
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SupplyType {
    #[default]
    #[serde(alias = "intra_state")]
    IntraState,
    #[serde(alias = "inter_state")]
    InterState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GstRequest {
    pub amount: f64,
    pub gst_rate: f64,
    #[serde(default)]
    pub calculation_type: GstCalculation,
    #[serde(default, alias = "transaction_type")]
    pub supply_type: SupplyType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GstResult {
    pub original_amount: f64,
    pub base_amount: f64,
    pub gst_amount: f64,
    pub total_amount: f64,
    pub gst_rate: f64,
    pub calculation_type: GstCalculation,
    pub supply_type: SupplyType,
    pub cgst: f64,
    pub sgst: f64,
    pub igst: f64,
}

/// Split of `amount` into (base, tax) for an inclusive or exclusive price
pub fn split_gst(amount: f64, rate_pct: f64, calculation: GstCalculation) -> (f64, f64) {
    match calculation {
        GstCalculation::Add => (amount, amount * rate_pct / 100.0),
        GstCalculation::Remove => {
            let base = amount / (1.0 + rate_pct / 100.0);
            (base, amount - base)
        }
    }
}

pub fn calculate_gst(request: &GstRequest) -> CalcResult<GstResult> {
    ensure_positive("amount", request.amount)?;
    ensure_range("gst_rate", request.gst_rate, 0.0, 100.0)?;

    let (base, gst) = split_gst(request.amount, request.gst_rate, request.calculation_type);
    let (cgst, sgst, igst) = match request.supply_type {
        SupplyType::IntraState => (gst / 2.0, gst / 2.0, 0.0),
        SupplyType::InterState => (0.0, 0.0, gst),
    };

    Ok(GstResult {
        original_amount: request.amount,
        base_amount: round2(base),
        gst_amount: round2(gst),
        total_amount: round2(base + gst),
        gst_rate: request.gst_rate,
        calculation_type: request.calculation_type,
        supply_type: request.supply_type,
        cgst: round2(cgst),
        sgst: round2(sgst),
        igst: round2(igst),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_gst_intra_state() {
        let r = calculate_gst(&GstRequest {
            amount: 1_000.0,
            gst_rate: 18.0,
            calculation_type: GstCalculation::Add,
            supply_type: SupplyType::IntraState,
        })
        .unwrap();
        assert_eq!(r.gst_amount, 180.0);
        assert_eq!(r.total_amount, 1_180.0);
        assert_eq!(r.cgst, 90.0);
        assert_eq!(r.sgst, 90.0);
        assert_eq!(r.igst, 0.0);
    }

    #[test]
    fn test_remove_gst_inter_state() {
        let req: GstRequest = serde_json::from_str(
            r#"{"amount": 1180, "gst_rate": 18, "calculation_type": "remove", "transaction_type": "inter-state"}"#,
        )
        .unwrap();
        let r = calculate_gst(&req).unwrap();
        assert_eq!(r.base_amount, 1_000.0);
        assert_eq!(r.gst_amount, 180.0);
        assert_eq!(r.total_amount, 1_180.0);
        assert_eq!(r.igst, 180.0);
        assert_eq!(r.cgst, 0.0);
    }
}
