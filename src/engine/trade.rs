//! Buy and sell execution.
//!
//! Validation runs front-to-back — amount, pause flag, legality table,
//! pricing, slippage bound, fee split — and only then does anything
//! mutate. The commit works on copies of the market and position, so a
//! late kernel failure leaves the entry untouched: every trade is
//! all-or-nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{
    AccountId, FeeBreakdown, Fixed, MarketId, Operation, Position, Price, Shares, Side,
};
use crate::error::{Error, Result};

use super::Engine;

/// The result of an executed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeReceipt {
    /// The market traded.
    pub market_id: MarketId,
    /// The side traded.
    pub side: Side,
    /// Shares added to (buy) or removed from (sell) the position.
    pub shares_delta: Shares,
    /// Base cost (buy) or gross proceeds (sell), before fees.
    pub cost_or_proceeds: Fixed,
    /// The fee split charged on this trade.
    pub fees: FeeBreakdown,
    /// What the trader pays (buy: cost + fee) or receives
    /// (sell: proceeds − fee).
    pub net: Fixed,
    /// YES price after the trade.
    pub price_yes: Price,
    /// NO price after the trade.
    pub price_no: Price,
}

impl Engine {
    /// Buy `amount` shares of `side`, paying at most `max_cost` base
    /// cost.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidAmount`] for `amount ≤ 0`
    /// - [`Error::TradingPaused`] while the global pause flag is set
    /// - [`Error::InvalidState`] outside `Active`
    /// - [`Error::SlippageExceeded`] when the base cost exceeds `max_cost`
    /// - kernel errors when the trade would leave the safe price domain
    pub fn buy(
        &self,
        market_id: &MarketId,
        trader: &AccountId,
        side: Side,
        amount: Fixed,
        max_cost: Fixed,
        now: DateTime<Utc>,
    ) -> Result<TradeReceipt> {
        let config = self.config_snapshot();
        if !amount.is_positive() {
            return Err(Error::InvalidAmount { amount });
        }
        if config.paused {
            return Err(Error::TradingPaused);
        }

        self.with_entry(market_id, |entry| {
            entry.market.ensure_allows(Operation::Buy)?;

            let base_cost = entry.market.model().buy_cost(
                entry.market.q_yes(),
                entry.market.q_no(),
                side,
                amount,
            )?;
            if base_cost > max_cost {
                return Err(Error::SlippageExceeded {
                    limit: max_cost,
                    actual: base_cost,
                });
            }

            let fees = config.split_fee(base_cost)?;
            let net = base_cost.checked_add(fees.total())?;

            // Stage the mutation on copies; commit only when every
            // checked step has succeeded.
            let mut market = entry.market.clone();
            market.apply_buy(side, amount, base_cost)?;
            market.accrue_fees(&fees)?;
            let (price_yes, price_no) = market.prices()?;

            let mut position = entry
                .positions
                .get(trader)
                .cloned()
                .unwrap_or_else(|| Position::new(now));
            position.add_shares(side, amount)?;

            entry.market = market;
            entry.positions.insert(trader.clone(), position);

            info!(
                market_id = %market_id,
                trader = %trader,
                side = %side,
                amount = %amount,
                cost = %base_cost,
                fee = %fees.total(),
                "buy executed"
            );

            Ok(TradeReceipt {
                market_id: market_id.clone(),
                side,
                shares_delta: amount,
                cost_or_proceeds: base_cost,
                fees,
                net,
                price_yes,
                price_no,
            })
        })
    }

    /// Sell `amount` shares of `side`, receiving at least
    /// `min_proceeds` gross proceeds.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidAmount`] for `amount ≤ 0`
    /// - [`Error::TradingPaused`] while the global pause flag is set
    /// - [`Error::InvalidState`] outside `Active`
    /// - [`Error::InsufficientShares`] when the position is short
    /// - [`Error::SlippageExceeded`] when proceeds fall below
    ///   `min_proceeds`
    pub fn sell(
        &self,
        market_id: &MarketId,
        trader: &AccountId,
        side: Side,
        amount: Fixed,
        min_proceeds: Fixed,
        now: DateTime<Utc>,
    ) -> Result<TradeReceipt> {
        let config = self.config_snapshot();
        if !amount.is_positive() {
            return Err(Error::InvalidAmount { amount });
        }
        if config.paused {
            return Err(Error::TradingPaused);
        }

        self.with_entry(market_id, |entry| {
            entry.market.ensure_allows(Operation::Sell)?;

            let have = entry
                .positions
                .get(trader)
                .map(|p| p.shares(side))
                .unwrap_or(Fixed::ZERO);
            if have < amount {
                return Err(Error::InsufficientShares { have, need: amount });
            }

            let proceeds = entry.market.model().sell_proceeds(
                entry.market.q_yes(),
                entry.market.q_no(),
                side,
                amount,
            )?;
            if proceeds < min_proceeds {
                return Err(Error::SlippageExceeded {
                    limit: min_proceeds,
                    actual: proceeds,
                });
            }

            // The fee is withheld from the gross proceeds; bps ≤ 10⁴
            // guarantees it never exceeds them.
            let fees = config.split_fee(proceeds)?;
            let net = proceeds.checked_sub(fees.total())?;

            let mut market = entry.market.clone();
            market.apply_sell(side, amount, proceeds)?;
            market.accrue_fees(&fees)?;
            let (price_yes, price_no) = market.prices()?;

            // The sufficiency check above makes this infallible in
            // practice; it stays checked regardless.
            let mut position = entry
                .positions
                .get(trader)
                .cloned()
                .unwrap_or_else(|| Position::new(now));
            position.remove_shares(side, amount)?;

            entry.market = market;
            entry.positions.insert(trader.clone(), position);

            info!(
                market_id = %market_id,
                trader = %trader,
                side = %side,
                amount = %amount,
                proceeds = %proceeds,
                fee = %fees.total(),
                "sell executed"
            );

            Ok(TradeReceipt {
                market_id: market_id.clone(),
                side,
                shares_delta: amount,
                cost_or_proceeds: proceeds,
                fees,
                net,
                price_yes,
                price_no,
            })
        })
    }
}
