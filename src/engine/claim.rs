//! Winner payouts and fee-pool claims.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{AccountId, FeePool, Fixed, MarketId, Operation, Shares};
use crate::error::{Error, Result};

use super::Engine;

/// The result of a successful payout claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimReceipt {
    /// The market claimed against.
    pub market_id: MarketId,
    /// The claimant.
    pub claimant: AccountId,
    /// Winning shares the payout was computed from.
    pub winning_shares: Shares,
    /// Amount paid out of the collateral pool.
    pub payout: Fixed,
}

impl Engine {
    /// Claim a winner's pro-rata share of the collateral pool.
    ///
    /// `payout = winning_shares · pool / total_winning_shares`, floored;
    /// rounding dust stays in the pool rather than overpaying the last
    /// claimant.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFinalized`] before the market finalizes
    /// - [`Error::AlreadyClaimed`] on a second claim — nothing transfers
    /// - [`Error::NotAWinner`] when the claimant holds no winning shares
    pub fn claim(&self, market_id: &MarketId, claimant: &AccountId) -> Result<ClaimReceipt> {
        self.with_entry(market_id, |entry| {
            let state = entry.market.state();
            if entry.market.ensure_allows(Operation::Claim).is_err() {
                return Err(Error::NotFinalized { state });
            }
            let Some(outcome) = entry.market.winning_outcome() else {
                return Err(Error::NotFinalized { state });
            };

            let Some(position) = entry.positions.get(claimant) else {
                return Err(Error::NotAWinner);
            };
            if position.is_claimed() {
                return Err(Error::AlreadyClaimed);
            }
            let winning_shares = position.shares(outcome);
            if !winning_shares.is_positive() {
                return Err(Error::NotAWinner);
            }

            // Every outstanding share was minted by a trade, so the
            // winning pool total is exactly q on the winning side. The
            // dividend is the pool frozen at finalization, so payouts
            // are claim-order independent.
            let total_winning = entry.market.quantity(outcome);
            let payout = winning_shares
                .checked_mul(entry.market.payout_pool())?
                .checked_div(total_winning)?;

            let mut market = entry.market.clone();
            market.draw_collateral(payout)?;
            let mut position = position.clone();
            position.mark_claimed(payout);

            entry.market = market;
            entry.positions.insert(claimant.clone(), position);

            info!(
                market_id = %market_id,
                claimant = %claimant,
                payout = %payout,
                "payout claimed"
            );

            Ok(ClaimReceipt {
                market_id: market_id.clone(),
                claimant: claimant.clone(),
                winning_shares,
                payout,
            })
        })
    }

    /// Claim `amount` from one of a market's fee pools.
    ///
    /// Authorization is per pool: protocol → the configured treasury,
    /// creator → the market creator, staker → the admin.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidAmount`] for `amount ≤ 0`
    /// - [`Error::Unauthorized`] for the wrong identity
    /// - [`Error::InsufficientFunds`] past the claimable balance —
    ///   pool balances never go negative
    pub fn claim_fees(
        &self,
        market_id: &MarketId,
        pool: FeePool,
        claimant: &AccountId,
        amount: Fixed,
    ) -> Result<Fixed> {
        if !amount.is_positive() {
            return Err(Error::InvalidAmount { amount });
        }
        let config = self.config_snapshot();

        self.with_entry(market_id, |entry| {
            entry.market.ensure_allows(Operation::ClaimFees)?;

            let authorized = match pool {
                FeePool::Protocol => claimant == &config.treasury,
                FeePool::Creator => claimant == entry.market.creator(),
                FeePool::Staker => claimant == &config.admin,
            };
            if !authorized {
                let required = match pool {
                    FeePool::Protocol => "treasury",
                    FeePool::Creator => "market creator",
                    FeePool::Staker => "admin",
                };
                return Err(Error::Unauthorized {
                    action: "claim fees",
                    required,
                });
            }

            let available = entry.market.fees().claimable(pool);
            if amount > available {
                return Err(Error::InsufficientFunds {
                    available,
                    requested: amount,
                });
            }

            entry.market.record_fee_claim(pool, amount)?;

            info!(
                market_id = %market_id,
                pool = %pool,
                claimant = %claimant,
                amount = %amount,
                "fees claimed"
            );
            Ok(amount)
        })
    }
}
