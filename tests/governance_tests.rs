//! Tests for vote submission and tally aggregation: duplicates,
//! thresholds, idempotency, and the dispute flow.

use oddsmith::config::GlobalConfig;
use oddsmith::domain::{MarketState, Side, VoteChoice};
use oddsmith::error::Error;
use oddsmith::testkit::domain::{account, t};
use oddsmith::testkit::market::{engine, engine_with, proposed_market, resolving_market, RESOLUTION_SECS};

#[test]
fn duplicate_proposal_vote_rejected() {
    let e = engine();
    let id = proposed_market(&e);
    let alice = account("alice");

    e.submit_proposal_vote(&id, &alice, VoteChoice::Yes, t(1)).unwrap();

    // Same voter, same kind - even with the other choice.
    let err = e
        .submit_proposal_vote(&id, &alice, VoteChoice::No, t(2))
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateVote { .. }));

    assert_eq!(e.market(&id).unwrap().proposal_tally().total(), 1);
}

#[test]
fn duplicate_dispute_vote_rejected() {
    let e = engine();
    let id = resolving_market(&e);
    let alice = account("alice");
    let now = t(RESOLUTION_SECS + 1);

    e.submit_dispute_vote(&id, &alice, VoteChoice::No, now).unwrap();
    let err = e.submit_dispute_vote(&id, &alice, VoteChoice::No, now).unwrap_err();
    assert!(matches!(err, Error::DuplicateVote { .. }));
}

#[test]
fn proposal_votes_rejected_outside_proposed() {
    let e = engine();
    let id = resolving_market(&e);

    let err = e
        .submit_proposal_vote(&id, &account("alice"), VoteChoice::Yes, t(1))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidState { .. }));
}

#[test]
fn dispute_votes_rejected_outside_resolving_window() {
    let e = engine();
    let id = proposed_market(&e);

    let err = e
        .submit_dispute_vote(&id, &account("alice"), VoteChoice::Yes, t(1))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidState { .. }));
}

#[test]
fn seventy_percent_exactly_approves() {
    // 7 yes / 3 no at a 7000 bps threshold: comparison is >=.
    let e = engine();
    let id = proposed_market(&e);

    for i in 0..7 {
        e.submit_proposal_vote(&id, &account(&format!("y{i}")), VoteChoice::Yes, t(1))
            .unwrap();
    }
    for i in 0..3 {
        e.submit_proposal_vote(&id, &account(&format!("n{i}")), VoteChoice::No, t(1))
            .unwrap();
    }

    assert!(e.aggregate_proposal_votes(&id).unwrap());
    assert_eq!(e.market(&id).unwrap().state(), MarketState::Approved);
}

#[test]
fn sixty_nine_point_nine_percent_does_not_approve() {
    let e = engine();
    let id = proposed_market(&e);

    for i in 0..699 {
        e.submit_proposal_vote(&id, &account(&format!("y{i}")), VoteChoice::Yes, t(1))
            .unwrap();
    }
    for i in 0..301 {
        e.submit_proposal_vote(&id, &account(&format!("n{i}")), VoteChoice::No, t(1))
            .unwrap();
    }

    assert!(!e.aggregate_proposal_votes(&id).unwrap());
    assert_eq!(e.market(&id).unwrap().state(), MarketState::Proposed);
}

#[test]
fn aggregation_is_idempotent_without_new_votes() {
    let e = engine();
    let id = proposed_market(&e);

    e.submit_proposal_vote(&id, &account("y0"), VoteChoice::Yes, t(1)).unwrap();
    e.submit_proposal_vote(&id, &account("n0"), VoteChoice::No, t(1)).unwrap();

    // 50% < 70%: repeated calls neither transition nor double-count.
    for _ in 0..3 {
        assert!(!e.aggregate_proposal_votes(&id).unwrap());
        let market = e.market(&id).unwrap();
        assert_eq!(market.state(), MarketState::Proposed);
        assert_eq!(market.proposal_tally().total(), 2);
        assert_eq!(market.proposal_tally().yes(), 1);
    }

    // More votes arrive; the same entry point now transitions.
    e.submit_proposal_vote(&id, &account("y1"), VoteChoice::Yes, t(2)).unwrap();
    e.submit_proposal_vote(&id, &account("y2"), VoteChoice::Yes, t(2)).unwrap();
    e.submit_proposal_vote(&id, &account("y3"), VoteChoice::Yes, t(2)).unwrap();
    e.submit_proposal_vote(&id, &account("y4"), VoteChoice::Yes, t(2)).unwrap();
    e.submit_proposal_vote(&id, &account("y5"), VoteChoice::Yes, t(2)).unwrap();
    assert!(e.aggregate_proposal_votes(&id).unwrap());
}

#[test]
fn empty_tally_never_transitions() {
    let e = engine();
    let id = proposed_market(&e);
    assert!(!e.aggregate_proposal_votes(&id).unwrap());
    assert_eq!(e.market(&id).unwrap().state(), MarketState::Proposed);
}

#[test]
fn dispute_votes_finalize_with_no_outcome() {
    // 60% threshold on the NO side.
    let e = engine();
    let id = resolving_market(&e);
    let now = t(RESOLUTION_SECS + 1);

    for i in 0..3 {
        e.submit_dispute_vote(&id, &account(&format!("n{i}")), VoteChoice::No, now)
            .unwrap();
    }
    e.submit_dispute_vote(&id, &account("y0"), VoteChoice::Yes, now).unwrap();

    // 3/4 = 75% >= 60%
    assert!(e.aggregate_dispute_votes(&id).unwrap());
    let market = e.market(&id).unwrap();
    assert_eq!(market.state(), MarketState::Finalized);
    assert_eq!(market.winning_outcome(), Some(Side::No));
}

#[test]
fn split_vote_leaves_market_resolving() {
    let e = engine();
    let id = resolving_market(&e);
    let now = t(RESOLUTION_SECS + 1);

    // 50/50 - neither side reaches 60%.
    e.submit_dispute_vote(&id, &account("y0"), VoteChoice::Yes, now).unwrap();
    e.submit_dispute_vote(&id, &account("n0"), VoteChoice::No, now).unwrap();

    assert!(!e.aggregate_dispute_votes(&id).unwrap());
    let market = e.market(&id).unwrap();
    assert_eq!(market.state(), MarketState::Resolving);
    assert_eq!(market.winning_outcome(), None);
}

#[test]
fn disputed_market_finalizes_through_same_path() {
    let e = engine();
    let id = resolving_market(&e);
    let now = t(RESOLUTION_SECS + 1);

    // A vote cast during Resolving still counts after the dispute.
    e.submit_dispute_vote(&id, &account("v1"), VoteChoice::Yes, now).unwrap();
    e.raise_dispute(&id, &account("carol")).unwrap();

    e.submit_dispute_vote(&id, &account("v2"), VoteChoice::Yes, now).unwrap();
    e.submit_dispute_vote(&id, &account("v3"), VoteChoice::Yes, now).unwrap();

    assert!(e.finalize(&id).unwrap());
    let market = e.market(&id).unwrap();
    assert_eq!(market.state(), MarketState::Finalized);
    assert_eq!(market.winning_outcome(), Some(Side::Yes));
}

#[test]
fn custom_threshold_is_respected() {
    let config = GlobalConfig {
        proposal_threshold_bps: 5_000,
        ..GlobalConfig::default()
    };
    let e = engine_with(config);
    let id = proposed_market(&e);

    e.submit_proposal_vote(&id, &account("y0"), VoteChoice::Yes, t(1)).unwrap();
    e.submit_proposal_vote(&id, &account("n0"), VoteChoice::No, t(1)).unwrap();

    // Exactly 50% meets a 5000 bps threshold.
    assert!(e.aggregate_proposal_votes(&id).unwrap());
}

#[test]
fn aggregation_after_approval_is_rejected() {
    let e = engine();
    let id = proposed_market(&e);
    oddsmith::testkit::market::approve(&e, &id);

    // The proposal window is closed; the table says so.
    let err = e.aggregate_proposal_votes(&id).unwrap_err();
    assert!(matches!(err, Error::InvalidState { .. }));
    assert_eq!(e.market(&id).unwrap().state(), MarketState::Approved);
}
