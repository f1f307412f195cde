//! Market-related domain types.
//!
//! - [`Side`] - the two tradeable outcomes of a binary market
//! - [`Market`] - lifecycle state, share pools, pricing model, tallies,
//!   collateral, and the embedded fee ledger
//!
//! A `Market` never mutates itself out of band: every change goes
//! through a named method invoked by the engine while the market's
//! entry is exclusively locked.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fee::{FeeBreakdown, FeeLedger, FeePool};
use super::fixed::{Fixed, NumericError};
use super::id::{AccountId, MarketId};
use super::lifecycle::{MarketState, Operation};
use super::lmsr::LmsrModel;
use super::vote::{VoteChoice, VoteKind, VoteTally};
use crate::error::{Error, Result};

/// One side of a binary market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Yes,
    No,
}

impl Side {
    /// The other side.
    #[must_use]
    pub const fn opposite(self) -> Side {
        match self {
            Side::Yes => Side::No,
            Side::No => Side::Yes,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Yes => write!(f, "yes"),
            Side::No => write!(f, "no"),
        }
    }
}

/// A binary prediction market priced by the LMSR cost function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    id: MarketId,
    question_ref: String,
    creator: AccountId,
    state: MarketState,
    model: LmsrModel,
    q_yes: Fixed,
    q_no: Fixed,
    /// Net trade inflow (cost in minus proceeds out, fees excluded) —
    /// the pool winning claims draw on.
    collateral: Fixed,
    /// Liquidity escrowed at activation; zero before.
    funding: Fixed,
    /// Collateral snapshot taken at finalization — the fixed total
    /// every pro-rata payout divides, regardless of claim order.
    payout_pool: Fixed,
    fees: FeeLedger,
    proposal_tally: VoteTally,
    dispute_tally: VoteTally,
    winning_outcome: Option<Side>,
    created_at: DateTime<Utc>,
    resolution_at: DateTime<Utc>,
    cancelled_at: Option<DateTime<Utc>>,
}

impl Market {
    /// Create a new market in the `Proposed` state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidResolutionTime`] unless `resolution_at`
    /// is after `created_at`, and a numeric domain error unless the
    /// liquidity parameter is positive.
    pub fn new(
        id: MarketId,
        question_ref: impl Into<String>,
        creator: AccountId,
        resolution_at: DateTime<Utc>,
        liquidity: Fixed,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        if resolution_at <= created_at {
            return Err(Error::InvalidResolutionTime);
        }
        let model = LmsrModel::new(liquidity)?;
        Ok(Self {
            id,
            question_ref: question_ref.into(),
            creator,
            state: MarketState::Proposed,
            model,
            q_yes: Fixed::ZERO,
            q_no: Fixed::ZERO,
            collateral: Fixed::ZERO,
            funding: Fixed::ZERO,
            payout_pool: Fixed::ZERO,
            fees: FeeLedger::new(),
            proposal_tally: VoteTally::new(),
            dispute_tally: VoteTally::new(),
            winning_outcome: None,
            created_at,
            resolution_at,
            cancelled_at: None,
        })
    }

    /// Get the market ID.
    #[must_use]
    pub const fn id(&self) -> &MarketId {
        &self.id
    }

    /// Get the reference to the question content held by the host.
    #[must_use]
    pub fn question_ref(&self) -> &str {
        &self.question_ref
    }

    /// Get the creator.
    #[must_use]
    pub const fn creator(&self) -> &AccountId {
        &self.creator
    }

    /// Get the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> MarketState {
        self.state
    }

    /// Get the pricing model.
    #[must_use]
    pub const fn model(&self) -> &LmsrModel {
        &self.model
    }

    /// Outstanding shares on `side`.
    #[must_use]
    pub const fn quantity(&self, side: Side) -> Fixed {
        match side {
            Side::Yes => self.q_yes,
            Side::No => self.q_no,
        }
    }

    /// Outstanding YES shares.
    #[must_use]
    pub const fn q_yes(&self) -> Fixed {
        self.q_yes
    }

    /// Outstanding NO shares.
    #[must_use]
    pub const fn q_no(&self) -> Fixed {
        self.q_no
    }

    /// Current `(price_yes, price_no)`.
    pub fn prices(&self) -> Result<(Fixed, Fixed)> {
        Ok(self.model.prices(self.q_yes, self.q_no)?)
    }

    /// The collateral pool claims draw on.
    #[must_use]
    pub const fn collateral(&self) -> Fixed {
        self.collateral
    }

    /// Liquidity escrowed at activation.
    #[must_use]
    pub const fn funding(&self) -> Fixed {
        self.funding
    }

    /// The pool total fixed at finalization; zero before it.
    #[must_use]
    pub const fn payout_pool(&self) -> Fixed {
        self.payout_pool
    }

    /// The embedded fee ledger.
    #[must_use]
    pub const fn fees(&self) -> &FeeLedger {
        &self.fees
    }

    /// Cached proposal-vote tally.
    #[must_use]
    pub const fn proposal_tally(&self) -> VoteTally {
        self.proposal_tally
    }

    /// Cached dispute-vote tally.
    #[must_use]
    pub const fn dispute_tally(&self) -> VoteTally {
        self.dispute_tally
    }

    /// The winning outcome, set at finalization.
    #[must_use]
    pub const fn winning_outcome(&self) -> Option<Side> {
        self.winning_outcome
    }

    /// When the market was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When trading closes and resolution opens.
    #[must_use]
    pub const fn resolution_at(&self) -> DateTime<Utc> {
        self.resolution_at
    }

    /// When the market was cancelled, if ever.
    #[must_use]
    pub const fn cancelled_at(&self) -> Option<DateTime<Utc>> {
        self.cancelled_at
    }

    /// Check the legality table for `op` in the current state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the table forbids it.
    pub fn ensure_allows(&self, op: Operation) -> Result<()> {
        if self.state.allows(op) {
            Ok(())
        } else {
            Err(Error::InvalidState {
                state: self.state,
                operation: op,
            })
        }
    }

    /// Move to `next` along a legal edge.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] (tagged with the driving
    /// operation) if the edge is not in the transition set.
    pub fn transition_to(&mut self, next: MarketState, op: Operation) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(Error::InvalidState {
                state: self.state,
                operation: op,
            });
        }
        self.state = next;
        Ok(())
    }

    /// Apply a validated buy: grow the side's pool and the collateral.
    ///
    /// # Errors
    ///
    /// Returns a kernel error if a balance does not fit; the market is
    /// unchanged on error.
    pub fn apply_buy(
        &mut self,
        side: Side,
        amount: Fixed,
        base_cost: Fixed,
    ) -> std::result::Result<(), NumericError> {
        let new_q = self.quantity(side).checked_add(amount)?;
        let new_collateral = self.collateral.checked_add(base_cost)?;
        match side {
            Side::Yes => self.q_yes = new_q,
            Side::No => self.q_no = new_q,
        }
        self.collateral = new_collateral;
        Ok(())
    }

    /// Apply a validated sell: shrink the side's pool and the collateral.
    ///
    /// # Errors
    ///
    /// Returns a kernel error on underflow; the market is unchanged on
    /// error.
    pub fn apply_sell(
        &mut self,
        side: Side,
        amount: Fixed,
        proceeds: Fixed,
    ) -> std::result::Result<(), NumericError> {
        let new_q = self.quantity(side).checked_sub(amount)?;
        let new_collateral = self.collateral.checked_sub(proceeds)?;
        match side {
            Side::Yes => self.q_yes = new_q,
            Side::No => self.q_no = new_q,
        }
        self.collateral = new_collateral;
        Ok(())
    }

    /// Accrue a trade's fee split into the ledger.
    pub fn accrue_fees(&mut self, fees: &FeeBreakdown) -> std::result::Result<(), NumericError> {
        self.fees.accrue(fees)
    }

    /// Record a validated fee claim.
    pub fn record_fee_claim(
        &mut self,
        pool: FeePool,
        amount: Fixed,
    ) -> std::result::Result<(), NumericError> {
        self.fees.record_claim(pool, amount)
    }

    /// Count a ballot into the matching tally cache.
    pub fn record_vote(&mut self, kind: VoteKind, choice: VoteChoice) {
        match kind {
            VoteKind::Proposal => self.proposal_tally.record(choice),
            VoteKind::Dispute => self.dispute_tally.record(choice),
        }
    }

    /// Replace a tally cache with a recomputed one.
    pub fn set_tally(&mut self, kind: VoteKind, tally: VoteTally) {
        match kind {
            VoteKind::Proposal => self.proposal_tally = tally,
            VoteKind::Dispute => self.dispute_tally = tally,
        }
    }

    /// Record the activation funding escrow.
    pub fn set_funding(&mut self, funding: Fixed) {
        self.funding = funding;
    }

    /// Settle at finalization: record the outcome and freeze the
    /// payout pool at the current collateral.
    pub fn settle(&mut self, outcome: Side) {
        self.winning_outcome = Some(outcome);
        self.payout_pool = self.collateral;
    }

    /// Draw a validated payout from the collateral pool.
    pub fn draw_collateral(&mut self, amount: Fixed) -> std::result::Result<(), NumericError> {
        self.collateral = self.collateral.checked_sub(amount)?;
        Ok(())
    }

    /// Stamp the cancellation time.
    pub fn set_cancelled(&mut self, at: DateTime<Utc>) {
        self.cancelled_at = Some(at);
    }
}
