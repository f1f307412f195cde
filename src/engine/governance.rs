//! Ballot submission, tally aggregation, and dispute handling.
//!
//! Aggregation recomputes its tally from the stored vote records every
//! time — the cached tally on the market is a convenience, never the
//! authority — so repeated calls can neither double-count nor drift.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::{
    AccountId, MarketId, MarketState, Operation, Side, VoteChoice, VoteKind, VoteRecord, VoteTally,
};
use crate::error::{Error, Result};

use super::{Engine, MarketEntry};

impl Engine {
    /// Cast a proposal ballot. Accepted only while `Proposed`.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateVote`] if this voter already cast a proposal
    /// ballot here; [`Error::InvalidState`] outside `Proposed`.
    pub fn submit_proposal_vote(
        &self,
        market_id: &MarketId,
        voter: &AccountId,
        choice: VoteChoice,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.submit_vote(
            market_id,
            voter,
            VoteKind::Proposal,
            Operation::SubmitProposalVote,
            choice,
            now,
        )
    }

    /// Cast a dispute/resolution ballot. Accepted while `Resolving` or
    /// `Disputed`.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateVote`] if this voter already cast a dispute
    /// ballot here; [`Error::InvalidState`] in any other state.
    pub fn submit_dispute_vote(
        &self,
        market_id: &MarketId,
        voter: &AccountId,
        choice: VoteChoice,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.submit_vote(
            market_id,
            voter,
            VoteKind::Dispute,
            Operation::SubmitDisputeVote,
            choice,
            now,
        )
    }

    fn submit_vote(
        &self,
        market_id: &MarketId,
        voter: &AccountId,
        kind: VoteKind,
        op: Operation,
        choice: VoteChoice,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.with_entry(market_id, |entry| {
            entry.market.ensure_allows(op)?;

            let key = (voter.clone(), kind);
            if entry.votes.contains_key(&key) {
                return Err(Error::DuplicateVote {
                    voter: voter.clone(),
                    kind,
                });
            }

            entry
                .votes
                .insert(key, VoteRecord::new(voter.clone(), kind, choice, now));
            entry.market.record_vote(kind, choice);

            info!(
                market_id = %market_id,
                voter = %voter,
                kind = ?kind,
                choice = ?choice,
                "vote recorded"
            );
            Ok(())
        })
    }

    /// Recount proposal ballots and approve the market once the YES
    /// share reaches the configured threshold.
    ///
    /// Returns `true` if the call transitioned `Proposed → Approved`.
    /// Safely re-invocable as more votes arrive.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] outside `Proposed`.
    pub fn aggregate_proposal_votes(&self, market_id: &MarketId) -> Result<bool> {
        let threshold = self.config_snapshot().proposal_threshold_bps;
        self.with_entry(market_id, |entry| {
            entry
                .market
                .ensure_allows(Operation::AggregateProposalVotes)?;

            let tally = recount(entry, VoteKind::Proposal);
            entry.market.set_tally(VoteKind::Proposal, tally);

            if !tally.meets_threshold(VoteChoice::Yes, threshold) {
                return Ok(false);
            }

            entry
                .market
                .transition_to(MarketState::Approved, Operation::AggregateProposalVotes)?;
            info!(
                market_id = %market_id,
                yes = tally.yes(),
                total = tally.total(),
                "proposal approved"
            );
            Ok(true)
        })
    }

    /// Recount dispute ballots and finalize the market once either
    /// side reaches the configured threshold.
    ///
    /// The YES side is tested first; with thresholds above 50% both
    /// sides can never qualify at once. Returns `true` if the call
    /// transitioned to `Finalized`. Safely re-invocable as more votes
    /// arrive.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] outside `Resolving`/`Disputed`.
    pub fn aggregate_dispute_votes(&self, market_id: &MarketId) -> Result<bool> {
        let threshold = self.config_snapshot().dispute_threshold_bps;
        self.with_entry(market_id, |entry| {
            entry
                .market
                .ensure_allows(Operation::AggregateDisputeVotes)?;

            let tally = recount(entry, VoteKind::Dispute);
            entry.market.set_tally(VoteKind::Dispute, tally);

            let outcome = if tally.meets_threshold(VoteChoice::Yes, threshold) {
                Side::Yes
            } else if tally.meets_threshold(VoteChoice::No, threshold) {
                Side::No
            } else {
                return Ok(false);
            };

            entry
                .market
                .transition_to(MarketState::Finalized, Operation::AggregateDisputeVotes)?;
            entry.market.settle(outcome);
            info!(
                market_id = %market_id,
                outcome = %outcome,
                yes = tally.yes(),
                total = tally.total(),
                "market finalized"
            );
            Ok(true)
        })
    }

    /// Finalize the market from its dispute tally.
    ///
    /// The operation-contract name for
    /// [`aggregate_dispute_votes`](Self::aggregate_dispute_votes): the
    /// same recount-compare-transition path, setting the winning
    /// outcome when a side carries the threshold.
    pub fn finalize(&self, market_id: &MarketId) -> Result<bool> {
        self.aggregate_dispute_votes(market_id)
    }

    /// Raise a dispute during the resolving window:
    /// `Resolving → Disputed`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] outside `Resolving`.
    pub fn raise_dispute(&self, market_id: &MarketId, disputer: &AccountId) -> Result<()> {
        self.with_entry(market_id, |entry| {
            entry.market.ensure_allows(Operation::RaiseDispute)?;
            entry
                .market
                .transition_to(MarketState::Disputed, Operation::RaiseDispute)?;
            info!(market_id = %market_id, disputer = %disputer, "dispute raised");
            Ok(())
        })
    }
}

/// Rebuild a tally from the stored records of one ballot kind.
fn recount(entry: &MarketEntry, kind: VoteKind) -> VoteTally {
    VoteTally::from_choices(
        entry
            .votes
            .values()
            .filter(|record| record.kind() == kind)
            .map(VoteRecord::choice),
    )
}
