//! Tests for the lifecycle state machine: the full progression,
//! time gating, activation preconditions, and cancellation.

use oddsmith::domain::{Fixed, MarketState, Side, VoteChoice};
use oddsmith::error::Error;
use oddsmith::testkit::domain::{account, fix, t};
use oddsmith::testkit::market::{
    active_market, approve, engine, finalize_with, proposed_market, resolving_market,
    RESOLUTION_SECS,
};

#[test]
fn full_lifecycle_walks_every_state() {
    let e = engine();
    let id = proposed_market(&e);
    assert_eq!(e.market(&id).unwrap().state(), MarketState::Proposed);

    approve(&e, &id);
    assert_eq!(e.market(&id).unwrap().state(), MarketState::Approved);

    e.activate_market(&id, fix(100)).unwrap();
    assert_eq!(e.market(&id).unwrap().state(), MarketState::Active);

    e.buy(&id, &account("bob"), Side::Yes, fix(20), fix(20), t(100))
        .unwrap();

    let state = e.evaluate_transitions(&id, t(RESOLUTION_SECS)).unwrap();
    assert_eq!(state, MarketState::Resolving);

    e.raise_dispute(&id, &account("carol")).unwrap();
    assert_eq!(e.market(&id).unwrap().state(), MarketState::Disputed);

    finalize_with(&e, &id, VoteChoice::Yes);
    let market = e.market(&id).unwrap();
    assert_eq!(market.state(), MarketState::Finalized);
    assert_eq!(market.winning_outcome(), Some(Side::Yes));
}

#[test]
fn resolution_is_time_gated() {
    let e = engine();
    let id = active_market(&e);

    // Before the resolution timestamp: nothing happens.
    let state = e.evaluate_transitions(&id, t(RESOLUTION_SECS - 1)).unwrap();
    assert_eq!(state, MarketState::Active);

    // At the timestamp (comparison is >=): trading closes.
    let state = e.evaluate_transitions(&id, t(RESOLUTION_SECS)).unwrap();
    assert_eq!(state, MarketState::Resolving);

    // Re-invocation is a no-op.
    let state = e.evaluate_transitions(&id, t(RESOLUTION_SECS + 100)).unwrap();
    assert_eq!(state, MarketState::Resolving);
}

#[test]
fn activation_requires_funding_above_loss_bound() {
    let e = engine();
    let id = proposed_market(&e);
    approve(&e, &id);

    // b = 100, so the bound is 100·ln2 ≈ 69.3; 60 is short.
    let err = e.activate_market(&id, fix(60)).unwrap_err();
    assert!(matches!(err, Error::InsufficientFunding { .. }));
    assert_eq!(e.market(&id).unwrap().state(), MarketState::Approved);

    e.activate_market(&id, fix(70)).unwrap();
    let market = e.market(&id).unwrap();
    assert_eq!(market.state(), MarketState::Active);
    assert_eq!(market.funding(), fix(70));
}

#[test]
fn activation_rejected_outside_approved() {
    let e = engine();
    let id = proposed_market(&e);

    let err = e.activate_market(&id, fix(100)).unwrap_err();
    assert!(matches!(err, Error::InvalidState { .. }));

    approve(&e, &id);
    e.activate_market(&id, fix(100)).unwrap();

    // A second activation is illegal.
    let err = e.activate_market(&id, fix(100)).unwrap_err();
    assert!(matches!(err, Error::InvalidState { .. }));
}

#[test]
fn cancel_from_proposed_and_approved_only() {
    let admin = account("admin");

    let e = engine();
    let id = proposed_market(&e);
    e.cancel_market(&admin, &id, t(5)).unwrap();
    let market = e.market(&id).unwrap();
    assert_eq!(market.state(), MarketState::Cancelled);
    assert_eq!(market.cancelled_at(), Some(t(5)));

    let e = engine();
    let id = proposed_market(&e);
    approve(&e, &id);
    e.cancel_market(&admin, &id, t(6)).unwrap();
    assert_eq!(e.market(&id).unwrap().state(), MarketState::Cancelled);

    // Once trading starts, cancellation is off the table.
    let e = engine();
    let id = active_market(&e);
    let err = e.cancel_market(&admin, &id, t(7)).unwrap_err();
    assert!(matches!(err, Error::InvalidState { .. }));
}

#[test]
fn cancel_requires_admin() {
    let e = engine();
    let id = proposed_market(&e);

    let err = e.cancel_market(&account("mallory"), &id, t(5)).unwrap_err();
    assert!(matches!(err, Error::Unauthorized { .. }));
    assert_eq!(e.market(&id).unwrap().state(), MarketState::Proposed);
}

#[test]
fn cancelled_market_blocks_everything_but_fee_claims() {
    let e = engine();
    let id = proposed_market(&e);
    e.cancel_market(&account("admin"), &id, t(5)).unwrap();

    assert!(matches!(
        e.submit_proposal_vote(&id, &account("v1"), VoteChoice::Yes, t(6)),
        Err(Error::InvalidState { .. })
    ));
    assert!(matches!(
        e.aggregate_proposal_votes(&id),
        Err(Error::InvalidState { .. })
    ));
    assert!(matches!(
        e.activate_market(&id, fix(100)),
        Err(Error::InvalidState { .. })
    ));
    assert!(matches!(
        e.raise_dispute(&id, &account("carol")),
        Err(Error::InvalidState { .. })
    ));
    // Terminal: evaluation is a no-op.
    assert_eq!(
        e.evaluate_transitions(&id, t(RESOLUTION_SECS)).unwrap(),
        MarketState::Cancelled
    );
}

#[test]
fn dispute_only_during_resolving() {
    let e = engine();
    let id = active_market(&e);

    let err = e.raise_dispute(&id, &account("carol")).unwrap_err();
    assert!(matches!(err, Error::InvalidState { .. }));

    e.evaluate_transitions(&id, t(RESOLUTION_SECS)).unwrap();
    e.raise_dispute(&id, &account("carol")).unwrap();

    // A second dispute has nowhere to go.
    let err = e.raise_dispute(&id, &account("dave")).unwrap_err();
    assert!(matches!(err, Error::InvalidState { .. }));
}

#[test]
fn finalized_market_is_terminal() {
    let e = engine();
    let id = resolving_market(&e);
    finalize_with(&e, &id, VoteChoice::No);

    let market = e.market(&id).unwrap();
    assert_eq!(market.state(), MarketState::Finalized);
    assert_eq!(market.winning_outcome(), Some(Side::No));

    assert!(matches!(
        e.raise_dispute(&id, &account("carol")),
        Err(Error::InvalidState { .. })
    ));
    assert!(matches!(
        e.submit_dispute_vote(&id, &account("v9"), VoteChoice::Yes, t(RESOLUTION_SECS + 9)),
        Err(Error::InvalidState { .. })
    ));
    assert_eq!(
        e.evaluate_transitions(&id, t(RESOLUTION_SECS * 2)).unwrap(),
        MarketState::Finalized
    );
}

#[test]
fn create_market_validates_inputs() {
    let e = engine();

    // Resolution must be after creation.
    let err = e
        .create_market("q", account("alice"), t(0), fix(100), t(0))
        .unwrap_err();
    assert_eq!(err, Error::InvalidResolutionTime);

    // Liquidity must be positive.
    let err = e
        .create_market("q", account("alice"), t(10), Fixed::ZERO, t(0))
        .unwrap_err();
    assert!(matches!(err, Error::Numeric(_)));

    assert_eq!(e.market_count(), 0);
}
