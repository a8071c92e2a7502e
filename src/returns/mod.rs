//! Return measures: IRR over periodic flows, XIRR over dated flows,
//! average-cost accounting for share purchases and market instrument returns

mod irr;
mod market;
mod stock_average;
mod xirr;

pub use irr::{calculate_irr, npv, solve_periodic_rate};
pub use market::{
    calculate_etf_return, calculate_index_fund, calculate_stock_return, EtfPeriod, EtfProfile, EtfReturnRequest,
    EtfReturnResult, IndexFundRequest, IndexFundResult, IndexFundYear, StockReturnRequest, StockReturnResult,
    ETF_MAX_INVESTMENT, ETF_MIN_INVESTMENT, ETF_PROFILES,
};
pub use stock_average::{calculate_stock_average, Purchase, PurchaseBreakdown, StockAverageRequest, StockAverageResult};
pub use xirr::{analyse_xirr, xirr, CumulativeFlow, DatedFlow, XirrAnalysis, XirrRequest};
