//! Weighted average purchase price across multiple buys

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, CalcError, CalcResult};
use crate::rates::round2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Purchase {
    pub shares: f64,
    pub price: f64,
}

/// Input contract of the stock average calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAverageRequest {
    pub purchases: Vec<Purchase>,
    /// Falls back to the average price when absent
    #[serde(default)]
    pub current_market_price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseBreakdown {
    pub purchase_number: usize,
    pub shares: f64,
    pub price_per_share: f64,
    pub investment: f64,
    pub current_value: f64,
    pub profit_loss: f64,
    pub profit_loss_percentage: f64,
    /// Share of total investment
    pub weight_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAverageResult {
    pub total_shares: f64,
    pub total_investment: f64,
    pub average_price: f64,
    pub current_value: f64,
    pub profit_loss: f64,
    pub profit_loss_percentage: f64,
    pub breakdown_by_purchase: Vec<PurchaseBreakdown>,
}

/// Purchases with non-positive shares or price are ignored
pub fn calculate_stock_average(request: &StockAverageRequest) -> CalcResult<StockAverageResult> {
    let valid: Vec<(usize, Purchase)> = request
        .purchases
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, p)| p.shares > 0.0 && p.price > 0.0 && p.shares.is_finite() && p.price.is_finite())
        .collect();

    if valid.is_empty() {
        return Err(CalcError::invalid("purchases", "no purchase has positive shares and price"));
    }

    let total_shares: f64 = valid.iter().map(|(_, p)| p.shares).sum();
    let total_investment: f64 = valid.iter().map(|(_, p)| p.shares * p.price).sum();
    let average_price = total_investment / total_shares;

    let market = match request.current_market_price {
        Some(price) => {
            ensure_non_negative("currentMarketPrice", price)?;
            price
        }
        None => average_price,
    };

    let current_value = total_shares * market;
    let profit_loss = current_value - total_investment;

    let breakdown_by_purchase = valid
        .iter()
        .map(|(i, p)| {
            let investment = p.shares * p.price;
            let value = p.shares * market;
            PurchaseBreakdown {
                purchase_number: i + 1,
                shares: p.shares,
                price_per_share: round2(p.price),
                investment: round2(investment),
                current_value: round2(value),
                profit_loss: round2(value - investment),
                profit_loss_percentage: round2((value - investment) / investment * 100.0),
                weight_percentage: round2(investment / total_investment * 100.0),
            }
        })
        .collect();

    Ok(StockAverageResult {
        total_shares,
        total_investment: round2(total_investment),
        average_price: round2(average_price),
        current_value: round2(current_value),
        profit_loss: round2(profit_loss),
        profit_loss_percentage: round2(profit_loss / total_investment * 100.0),
        breakdown_by_purchase,
    })
}
