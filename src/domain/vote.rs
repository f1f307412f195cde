//! Ballots and tallies for market governance.
//!
//! A [`VoteRecord`] is immutable once cast; uniqueness on
//! `(market, voter, kind)` is enforced by the keyed map each market
//! entry holds, which is what makes duplicate voting impossible.
//! Tallies are head counts — one voter, one vote.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::AccountId;

/// The two governance ballot kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteKind {
    /// Should this proposed market open? Cast while `Proposed`.
    Proposal,
    /// Which outcome is correct? Cast while `Resolving` or `Disputed`.
    Dispute,
}

/// A ballot choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteChoice {
    Yes,
    No,
}

/// One cast ballot. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    voter: AccountId,
    kind: VoteKind,
    choice: VoteChoice,
    cast_at: DateTime<Utc>,
}

impl VoteRecord {
    /// Create a new vote record.
    #[must_use]
    pub fn new(voter: AccountId, kind: VoteKind, choice: VoteChoice, cast_at: DateTime<Utc>) -> Self {
        Self {
            voter,
            kind,
            choice,
            cast_at,
        }
    }

    /// Get the voter.
    #[must_use]
    pub const fn voter(&self) -> &AccountId {
        &self.voter
    }

    /// Get the ballot kind.
    #[must_use]
    pub const fn kind(&self) -> VoteKind {
        self.kind
    }

    /// Get the choice.
    #[must_use]
    pub const fn choice(&self) -> VoteChoice {
        self.choice
    }

    /// Get when the ballot was cast.
    #[must_use]
    pub const fn cast_at(&self) -> DateTime<Utc> {
        self.cast_at
    }
}

/// A head-count tally of one ballot kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoteTally {
    yes: u64,
    no: u64,
}

impl VoteTally {
    /// An empty tally.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a tally from an iterator of choices.
    pub fn from_choices<I: IntoIterator<Item = VoteChoice>>(choices: I) -> Self {
        let mut tally = Self::new();
        for choice in choices {
            tally.record(choice);
        }
        tally
    }

    /// Count one ballot.
    pub fn record(&mut self, choice: VoteChoice) {
        match choice {
            VoteChoice::Yes => self.yes += 1,
            VoteChoice::No => self.no += 1,
        }
    }

    /// Ballots for YES.
    #[must_use]
    pub const fn yes(&self) -> u64 {
        self.yes
    }

    /// Ballots for NO.
    #[must_use]
    pub const fn no(&self) -> u64 {
        self.no
    }

    /// Total ballots cast.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.yes + self.no
    }

    /// True once the given side's share of the vote reaches
    /// `threshold_bps` (comparison is ≥).
    ///
    /// Evaluated as `side · 10⁴ ≥ threshold · total` in widened
    /// integers — no division, no rounding ambiguity. An empty tally
    /// never meets any threshold.
    #[must_use]
    pub fn meets_threshold(&self, side: VoteChoice, threshold_bps: u16) -> bool {
        let total = self.total();
        if total == 0 {
            return false;
        }
        let count = match side {
            VoteChoice::Yes => self.yes,
            VoteChoice::No => self.no,
        };
        u128::from(count) * 10_000 >= u128::from(threshold_bps) * u128::from(total)
    }
}
