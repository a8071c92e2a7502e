//! Lump-sum growth: compound interest, inflation, doubling time and CAGR

mod compound;
mod doubling;
mod inflation;

pub use compound::{
    calculate_compound_interest, calculate_future_value, compare_frequencies, compound_amount,
    CompoundInterestRequest, CompoundInterestResult, FrequencyComparison, FutureValueRequest, FutureValueResult,
    GrowthRow,
};
pub use doubling::{
    cagr, calculate_kvp, calculate_reverse_cagr, calculate_roi, calculate_rule_of_72, reverse_cagr,
    years_to_double, GrowthPoint, KvpRequest, KvpResult, KvpYear, ReverseCagrRequest, ReverseCagrResult,
    RoiRequest, RoiResult, RuleOf72Request, RuleOf72Result, KVP_LOCK_IN_MONTHS,
};
pub use inflation::{calculate_inflation, deflate, inflate, InflationRequest, InflationResult, InflationYear};
