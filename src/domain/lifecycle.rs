//! Market lifecycle states and the operation legality table.
//!
//! - [`MarketState`] - the six-state progression plus terminal `Cancelled`
//! - [`Operation`] - every public operation that consults the table
//! - [`MarketState::allows`] - the static `(state, operation) → allowed` map
//! - [`MarketState::can_transition_to`] - the legal edge set
//!
//! Every public engine operation checks `allows` before acting, so
//! legality lives in one table instead of scattered conditionals.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a market.
///
/// Discriminants are stable and ordered by progression; hosts may
/// persist them as integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MarketState {
    /// Created, awaiting proposal votes.
    Proposed = 0,
    /// Proposal approved, awaiting initial liquidity.
    Approved = 1,
    /// Trading open. The only state permitting buy/sell.
    Active = 2,
    /// Past resolution time, collecting resolution votes.
    Resolving = 3,
    /// A dispute was raised during the resolving window.
    Disputed = 4,
    /// Outcome set; claims open. Terminal.
    Finalized = 5,
    /// Cancelled by the admin before trading started. Terminal.
    Cancelled = 6,
}

/// A public operation gated by the legality table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Buy,
    Sell,
    SubmitProposalVote,
    SubmitDisputeVote,
    AggregateProposalVotes,
    AggregateDisputeVotes,
    RaiseDispute,
    Activate,
    EvaluateTransitions,
    Claim,
    ClaimFees,
    Cancel,
}

impl MarketState {
    /// True if `op` is legal in this state.
    ///
    /// This is the single source of truth consulted by every public
    /// operation; a `false` here surfaces as `InvalidState`.
    #[must_use]
    pub const fn allows(self, op: Operation) -> bool {
        use MarketState::*;
        use Operation::*;
        match op {
            Buy | Sell => matches!(self, Active),
            SubmitProposalVote | AggregateProposalVotes => matches!(self, Proposed),
            SubmitDisputeVote | AggregateDisputeVotes => matches!(self, Resolving | Disputed),
            RaiseDispute => matches!(self, Resolving),
            Activate => matches!(self, Approved),
            EvaluateTransitions => matches!(self, Active),
            Claim => matches!(self, Finalized),
            // Accrued fees stay claimable through the whole lifecycle.
            ClaimFees => true,
            Cancel => matches!(self, Proposed | Approved),
        }
    }

    /// True if the edge `self → next` is in the legal transition set.
    #[must_use]
    pub const fn can_transition_to(self, next: MarketState) -> bool {
        use MarketState::*;
        matches!(
            (self, next),
            (Proposed, Approved)
                | (Approved, Active)
                | (Active, Resolving)
                | (Resolving, Disputed)
                | (Resolving, Finalized)
                | (Disputed, Finalized)
                | (Proposed, Cancelled)
                | (Approved, Cancelled)
        )
    }

    /// True for states with no outgoing edges.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, MarketState::Finalized | MarketState::Cancelled)
    }
}

impl fmt::Display for MarketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MarketState::Proposed => "proposed",
            MarketState::Approved => "approved",
            MarketState::Active => "active",
            MarketState::Resolving => "resolving",
            MarketState::Disputed => "disputed",
            MarketState::Finalized => "finalized",
            MarketState::Cancelled => "cancelled",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Buy => "buy",
            Operation::Sell => "sell",
            Operation::SubmitProposalVote => "submit_proposal_vote",
            Operation::SubmitDisputeVote => "submit_dispute_vote",
            Operation::AggregateProposalVotes => "aggregate_proposal_votes",
            Operation::AggregateDisputeVotes => "aggregate_dispute_votes",
            Operation::RaiseDispute => "raise_dispute",
            Operation::Activate => "activate",
            Operation::EvaluateTransitions => "evaluate_transitions",
            Operation::Claim => "claim",
            Operation::ClaimFees => "claim_fees",
            Operation::Cancel => "cancel",
        };
        write!(f, "{name}")
    }
}
