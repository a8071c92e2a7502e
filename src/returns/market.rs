//! Market returns: a single stock trade, ETFs over fixed look-back windows and index funds

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_positive, ensure_range, CalcError, CalcResult};
use crate::growth::cagr;
use crate::rates::{round2, Frequency};
use crate::sip::{lumpsum_value, InstallmentLedger, InvestmentMode};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockReturnRequest {
    pub buy_price: f64,
    pub sell_price: f64,
    pub num_shares: f64,
    pub holding_years: f64,
    /// Dividends received over the holding period, in total
    #[serde(default)]
    pub dividends: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockReturnResult {
    pub total_invested: f64,
    /// Sale proceeds plus dividends
    pub total_value: f64,
    pub net_profit: f64,
    pub absolute_return: f64,
    pub cagr: f64,
    pub is_profitable: bool,
}

pub fn calculate_stock_return(request: &StockReturnRequest) -> CalcResult<StockReturnResult> {
    ensure_positive("buyPrice", request.buy_price)?;
    ensure_positive("sellPrice", request.sell_price)?;
    ensure_positive("numShares", request.num_shares)?;
    ensure_positive("holdingYears", request.holding_years)?;
    ensure_non_negative("dividends", request.dividends)?;

    let invested = request.buy_price * request.num_shares;
    let value = request.sell_price * request.num_shares + request.dividends;
    let profit = value - invested;

    Ok(StockReturnResult {
        total_invested: round2(invested),
        total_value: round2(value),
        net_profit: round2(profit),
        absolute_return: round2(profit / invested * 100.0),
        cagr: round2(cagr(invested, value, request.holding_years)?),
        is_profitable: profit > 0.0,
    })
}

pub const ETF_MIN_INVESTMENT: f64 = 1_000.0;
pub const ETF_MAX_INVESTMENT: f64 = 10_000_000.0;

/// Look-back window for an ETF's trailing return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EtfPeriod {
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
    #[default]
    #[serde(rename = "1Y")]
    OneYear,
    /// Multi-year windows quote an annualised figure
    #[serde(rename = "3Y")]
    ThreeYears,
    #[serde(rename = "5Y")]
    FiveYears,
}

impl EtfPeriod {
    fn index(self) -> usize {
        match self {
            EtfPeriod::OneWeek => 0,
            EtfPeriod::OneMonth => 1,
            EtfPeriod::OneYear => 2,
            EtfPeriod::ThreeYears => 3,
            EtfPeriod::FiveYears => 4,
        }
    }

    /// Years over which a quoted rate compounds; short windows apply it once
    fn compounding_years(self) -> i32 {
        match self {
            EtfPeriod::ThreeYears => 3,
            EtfPeriod::FiveYears => 5,
            _ => 1,
        }
    }
}

/// Reference figures for a listed ETF; returns are ordered 1W, 1M, 1Y, 3Y, 5Y
#[derive(Debug, Clone, Copy)]
pub struct EtfProfile {
    pub symbol: &'static str,
    pub name: &'static str,
    pub returns: [f64; 5],
    pub volatility: f64,
    pub description: &'static str,
}

const fn etf(
    symbol: &'static str,
    name: &'static str,
    returns: [f64; 5],
    volatility: f64,
    description: &'static str,
) -> EtfProfile {
    EtfProfile {
        symbol,
        name,
        returns,
        volatility,
        description,
    }
}

pub const ETF_PROFILES: [EtfProfile; 8] = [
    etf("NIFTY50", "Nifty 50 ETF", [1.2, 3.5, 15.8, 12.4, 14.2], 18.5, "Tracks the Nifty 50 index - India's top 50 companies"),
    etf("BANKNIFTY", "Bank Nifty ETF", [0.8, 4.2, 18.5, 10.8, 16.3], 25.2, "Tracks banking sector stocks"),
    etf("NIFTYIT", "Nifty IT ETF", [2.1, 6.8, 22.4, 18.7, 20.1], 28.4, "Tracks IT sector stocks"),
    etf("GOLDBEES", "Gold BeES", [0.3, 1.8, 8.2, 9.5, 11.3], 12.8, "Tracks gold prices"),
    etf("LIQUIDBEES", "Liquid BeES", [0.1, 0.4, 4.8, 4.2, 4.5], 0.5, "Tracks liquid fund returns"),
    etf("NIFTYNEXT50", "Nifty Next 50 ETF", [1.5, 4.1, 19.2, 14.8, 16.7], 22.1, "Tracks the next 50 largest companies after Nifty 50"),
    etf("NIFTYMIDCAP", "Nifty Midcap ETF", [1.8, 5.2, 25.4, 16.9, 18.3], 26.8, "Tracks mid-cap stocks"),
    etf("NIFTYSMLCAP", "Nifty Smallcap ETF", [2.2, 6.8, 32.1, 19.5, 21.2], 32.5, "Tracks small-cap stocks"),
];

const CUSTOM_ETF_RETURNS: [f64; 5] = [0.5, 2.0, 12.0, 10.5, 11.8];
const CUSTOM_ETF_VOLATILITY: f64 = 20.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtfReturnRequest {
    pub etf_symbol: String,
    pub investment_amount: f64,
    #[serde(default)]
    pub time_period: EtfPeriod,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtfReturnResult {
    pub etf_name: String,
    pub investment_amount: f64,
    pub final_value: f64,
    pub absolute_return: f64,
    /// Quoted return for the window
    pub return_percentage: f64,
    pub time_period: EtfPeriod,
    pub annualized_return: f64,
    pub volatility: f64,
    pub description: String,
    /// False when the symbol is not a listed profile and market averages were assumed
    pub known_symbol: bool,
}

pub fn calculate_etf_return(request: &EtfReturnRequest) -> CalcResult<EtfReturnResult> {
    let symbol = request.etf_symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(CalcError::invalid("etf_symbol", "must not be empty"));
    }
    ensure_range("investment_amount", request.investment_amount, ETF_MIN_INVESTMENT, ETF_MAX_INVESTMENT)?;

    let profile = ETF_PROFILES.iter().find(|p| p.symbol == symbol);
    let (name, returns, volatility, description) = match profile {
        Some(p) => (p.name.to_string(), p.returns, p.volatility, p.description.to_string()),
        None => (
            symbol.clone(),
            CUSTOM_ETF_RETURNS,
            CUSTOM_ETF_VOLATILITY,
            "Custom ETF - Returns are estimated based on market averages".to_string(),
        ),
    };

    let period = request.time_period;
    let rate = returns[period.index()];
    let final_value = (request.investment_amount * (1.0 + rate / 100.0).powi(period.compounding_years())).round();

    Ok(EtfReturnResult {
        etf_name: name,
        investment_amount: request.investment_amount,
        final_value,
        absolute_return: round2(final_value - request.investment_amount),
        return_percentage: rate,
        time_period: period,
        annualized_return: rate,
        volatility,
        description,
        known_symbol: profile.is_some(),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexFundRequest {
    #[serde(default)]
    pub investment_type: InvestmentMode,
    /// Required for SIP investing
    #[serde(default)]
    pub monthly_amount: Option<f64>,
    /// Required for lump-sum investing
    #[serde(default)]
    pub lumpsum_amount: Option<f64>,
    pub investment_duration: u32,
    pub expected_return: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexFundYear {
    pub year: u32,
    pub cumulative_invested: f64,
    pub current_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexFundResult {
    pub total_invested: f64,
    pub maturity_amount: f64,
    pub total_gain: f64,
    pub expected_return: f64,
    pub yearly_breakdown: Vec<IndexFundYear>,
}

pub fn calculate_index_fund(request: &IndexFundRequest) -> CalcResult<IndexFundResult> {
    ensure_range("investmentDuration", request.investment_duration as f64, 1.0, 50.0)?;
    ensure_range("expectedReturn", request.expected_return, 0.0, 50.0)?;
    let years = request.investment_duration;
    let rate = request.expected_return;

    let yearly_breakdown: Vec<IndexFundYear> = match request.investment_type {
        InvestmentMode::Sip => {
            let monthly = request
                .monthly_amount
                .ok_or_else(|| CalcError::invalid("monthlyAmount", "is required for SIP investing"))?;
            ensure_positive("monthlyAmount", monthly)?;
            InstallmentLedger::new(rate, Frequency::Monthly, years)
                .run(|_| monthly)
                .into_iter()
                .map(|r| IndexFundYear {
                    year: r.year,
                    cumulative_invested: round2(r.cumulative_invested),
                    current_value: round2(r.value),
                })
                .collect()
        }
        InvestmentMode::Lumpsum => {
            let amount = request
                .lumpsum_amount
                .ok_or_else(|| CalcError::invalid("lumpsumAmount", "is required for lump-sum investing"))?;
            ensure_positive("lumpsumAmount", amount)?;
            (1..=years)
                .map(|year| IndexFundYear {
                    year,
                    cumulative_invested: round2(amount),
                    current_value: round2(lumpsum_value(amount, rate, year)),
                })
                .collect()
        }
    };

    let (invested, value) = yearly_breakdown
        .last()
        .map(|r| (r.cumulative_invested, r.current_value))
        .unwrap_or_default();

    Ok(IndexFundResult {
        total_invested: invested,
        maturity_amount: value,
        total_gain: round2(value - invested),
        expected_return: rate,
        yearly_breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sip::sip_future_value;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_stock_return_with_dividends() {
        let req: StockReturnRequest = serde_json::from_str(
            r#"{"buyPrice": 100, "sellPrice": 150, "numShares": 100, "holdingYears": 2, "dividends": 1000}"#,
        )
        .unwrap();
        let r = calculate_stock_return(&req).unwrap();
        assert_eq!(r.total_invested, 10_000.0);
        assert_eq!(r.total_value, 16_000.0);
        assert_eq!(r.net_profit, 6_000.0);
        assert_eq!(r.absolute_return, 60.0);
        assert_abs_diff_eq!(r.cagr, (1.6f64.sqrt() - 1.0) * 100.0, epsilon = 0.01);
        assert!(r.is_profitable);
    }

    #[test]
    fn test_stock_loss() {
        let r = calculate_stock_return(&StockReturnRequest {
            buy_price: 200.0,
            sell_price: 150.0,
            num_shares: 10.0,
            holding_years: 1.0,
            dividends: 0.0,
        })
        .unwrap();
        assert_eq!(r.net_profit, -500.0);
        assert_eq!(r.cagr, -25.0);
        assert!(!r.is_profitable);
    }

    #[test]
    fn test_etf_known_symbol() {
        let req: EtfReturnRequest = serde_json::from_str(
            r#"{"etf_symbol": "nifty50", "investment_amount": 100000, "time_period": "3Y"}"#,
        )
        .unwrap();
        let r = calculate_etf_return(&req).unwrap();
        assert_eq!(r.etf_name, "Nifty 50 ETF");
        assert_eq!(r.final_value, (100_000.0 * 1.124f64.powi(3)).round());
        assert_eq!(r.annualized_return, 12.4);
        assert!(r.known_symbol);
    }

    #[test]
    fn test_etf_custom_symbol_and_limits() {
        let r = calculate_etf_return(&EtfReturnRequest {
            etf_symbol: "myetf".into(),
            investment_amount: 50_000.0,
            time_period: EtfPeriod::OneYear,
        })
        .unwrap();
        assert_eq!(r.etf_name, "MYETF");
        assert_eq!(r.final_value, 56_000.0);
        assert!(!r.known_symbol);

        let low = EtfReturnRequest {
            etf_symbol: "NIFTY50".into(),
            investment_amount: 500.0,
            time_period: EtfPeriod::OneWeek,
        };
        assert!(calculate_etf_return(&low).is_err());
    }

    #[test]
    fn test_index_fund_modes() {
        let sip: IndexFundRequest = serde_json::from_str(
            r#"{"investmentType": "sip", "monthlyAmount": 5000, "investmentDuration": 10, "expectedReturn": 12}"#,
        )
        .unwrap();
        let r = calculate_index_fund(&sip).unwrap();
        assert_abs_diff_eq!(r.maturity_amount, sip_future_value(5_000.0, 12.0, Frequency::Monthly, 10), epsilon = 0.01);
        assert_eq!(r.total_invested, 600_000.0);

        let lump: IndexFundRequest = serde_json::from_str(
            r#"{"investmentType": "lumpsum", "lumpsumAmount": 100000, "investmentDuration": 2, "expectedReturn": 10}"#,
        )
        .unwrap();
        let r = calculate_index_fund(&lump).unwrap();
        assert_eq!(r.maturity_amount, 121_000.0);
        assert_eq!(r.yearly_breakdown[0].current_value, 110_000.0);

        let missing: IndexFundRequest =
            serde_json::from_str(r#"{"investmentType": "sip", "investmentDuration": 5, "expectedReturn": 12}"#).unwrap();
        assert!(calculate_index_fund(&missing).unwrap_err().is_client_error());
    }
}
