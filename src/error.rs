//! Error types for the crate.
//!
//! One enum per concern, aggregated into a top-level [`Error`]:
//! [`NumericError`](crate::domain::NumericError) for the kernel,
//! [`ConfigError`](crate::config::ConfigError) for configuration, and
//! the engine taxonomy here. Every operation is all-or-nothing: an
//! error means no state was mutated.

use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::{AccountId, Fixed, MarketId, MarketState, NumericError, Operation, VoteKind};

/// Errors returned by engine operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Trade amounts and claim amounts must be positive.
    #[error("amount must be positive, got {amount}")]
    InvalidAmount {
        /// The invalid amount that was provided.
        amount: Fixed,
    },

    /// The operation is not legal in the market's current state.
    #[error("operation {operation} not allowed in state {state}")]
    InvalidState {
        /// The market's current state.
        state: MarketState,
        /// The operation that was attempted.
        operation: Operation,
    },

    /// Buy and sell are blocked while the global pause flag is set.
    #[error("trading is paused")]
    TradingPaused,

    /// The executed cost or proceeds fell outside the caller's bound.
    #[error("slippage exceeded: cost {actual} outside limit {limit}")]
    SlippageExceeded {
        /// The caller-supplied bound.
        limit: Fixed,
        /// The computed cost or proceeds.
        actual: Fixed,
    },

    /// The position holds fewer shares than the sell requires.
    #[error("insufficient shares: have {have}, need {need}")]
    InsufficientShares {
        /// Shares held on the requested side.
        have: Fixed,
        /// Shares the sell requires.
        need: Fixed,
    },

    /// A fee claim exceeds the pool's claimable balance.
    #[error("insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds {
        /// Claimable balance of the pool.
        available: Fixed,
        /// Amount requested.
        requested: Fixed,
    },

    /// The voter already cast this ballot kind on this market.
    #[error("duplicate {kind:?} vote by {voter}")]
    DuplicateVote {
        /// The offending voter.
        voter: AccountId,
        /// The ballot kind already cast.
        kind: VoteKind,
    },

    /// The position's payout was already claimed.
    #[error("position already claimed")]
    AlreadyClaimed,

    /// The claimant holds no shares on the winning side.
    #[error("claimant holds no winning shares")]
    NotAWinner,

    /// Claims require a finalized market.
    #[error("market not finalized, state is {state}")]
    NotFinalized {
        /// The market's current state.
        state: MarketState,
    },

    /// The caller lacks the identity this action requires.
    #[error("unauthorized: {action} requires {required}")]
    Unauthorized {
        /// What was attempted.
        action: &'static str,
        /// Which identity may do it.
        required: &'static str,
    },

    /// No market with the given identifier.
    #[error("market not found: {market_id}")]
    MarketNotFound {
        /// The unknown identifier.
        market_id: MarketId,
    },

    /// Markets must resolve after they are created.
    #[error("resolution time must be after creation")]
    InvalidResolutionTime,

    /// The activation funding does not cover the worst-case maker loss.
    #[error("funding {funding} below required bound {required}")]
    InsufficientFunding {
        /// Funding supplied.
        funding: Fixed,
        /// Required minimum, `b · ln 2`.
        required: Fixed,
    },

    #[error(transparent)]
    Numeric(#[from] NumericError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
