//! Indian income tax, salary structure, capital gains, GST, gratuity and TDS

mod capital_gains;
mod ctc;
mod gratuity;
mod gst;
mod hra;
mod income_tax;
mod slabs;
mod tds;

pub use capital_gains::{
    calculate_capital_gains, calculate_equity_gains, AssetType, CapitalGainsRequest, CapitalGainsResult,
    CapitalGainsTax, CapitalGainsTaxMode, EquityGainsRequest, EquityGainsResult, ExemptionDetails, GainClass,
};
pub use ctc::{calculate_ctc, CtcRequest, CtcResult};
pub use gratuity::{
    calculate_gratuity, counted_years, GratuityRequest, GratuityResult, GratuityType, ACT_ELIGIBILITY_YEARS,
};
pub use gst::{calculate_gst, split_gst, GstCalculation, GstRequest, GstResult, SupplyType};
pub use hra::{calculate_hra, hra_exemption, CityType, HraRequest, HraResult};
pub use income_tax::{
    calculate_income_tax, BetterRegime, IncomeTaxRequest, IncomeTaxResult, RegimeTax, REGIME_TIE_THRESHOLD,
};
pub use slabs::{AgeGroup, SlabSchedule, SlabTax, TaxRegime, TaxSlab};
pub use tds::{calculate_tds, PanStatus, PayeeCategory, TdsRate, TdsRequest, TdsResult, TdsSection};
