//! Engine drivers that walk a market to a given lifecycle state.
//!
//! Conventions: markets are created at `t(0)` with liquidity 100 and
//! resolve at `t(10_000)`; activation escrows 100 units of funding
//! (comfortably above the `b·ln 2 ≈ 69.3` bound); governance quorums
//! are three unanimous voters `v1`/`v2`/`v3`.

use super::config;
use super::domain::{account, fix, t};
use crate::config::GlobalConfig;
use crate::domain::{MarketId, VoteChoice};
use crate::engine::Engine;

/// The default resolution timestamp used by these drivers.
pub const RESOLUTION_SECS: i64 = 10_000;

/// An engine with the standard test config.
pub fn engine() -> Engine {
    engine_with(config::config())
}

/// An engine with a specific config.
pub fn engine_with(config: GlobalConfig) -> Engine {
    Engine::with_config(config).expect("test config must be valid")
}

/// A market in `Proposed`, created by `creator`.
pub fn proposed_market(engine: &Engine) -> MarketId {
    engine
        .create_market("q-ref", account("creator"), t(RESOLUTION_SECS), fix(100), t(0))
        .expect("market creation must succeed")
}

/// Approve a proposed market with three unanimous YES votes.
pub fn approve(engine: &Engine, market_id: &MarketId) {
    for voter in ["v1", "v2", "v3"] {
        engine
            .submit_proposal_vote(market_id, &account(voter), VoteChoice::Yes, t(1))
            .expect("proposal vote must succeed");
    }
    assert!(engine
        .aggregate_proposal_votes(market_id)
        .expect("aggregation must succeed"));
}

/// A market in `Active`: proposed, approved, and funded.
pub fn active_market(engine: &Engine) -> MarketId {
    let market_id = proposed_market(engine);
    approve(engine, &market_id);
    engine
        .activate_market(&market_id, fix(100))
        .expect("activation must succeed");
    market_id
}

/// A market in `Resolving`: active, then past its resolution time.
pub fn resolving_market(engine: &Engine) -> MarketId {
    let market_id = active_market(engine);
    engine
        .evaluate_transitions(&market_id, t(RESOLUTION_SECS))
        .expect("evaluation must succeed");
    market_id
}

/// Finalize a resolving or disputed market with three unanimous votes
/// for `choice`.
pub fn finalize_with(engine: &Engine, market_id: &MarketId, choice: VoteChoice) {
    for voter in ["v1", "v2", "v3"] {
        engine
            .submit_dispute_vote(market_id, &account(voter), choice, t(RESOLUTION_SECS + 1))
            .expect("dispute vote must succeed");
    }
    assert!(engine
        .aggregate_dispute_votes(market_id)
        .expect("aggregation must succeed"));
}
