//! The engine: per-market serialized execution over shared state.
//!
//! [`Engine`] owns every market entry behind a [`DashMap`] keyed by
//! [`MarketId`], with a [`parking_lot::Mutex`] per entry. Each mutating
//! operation locks exactly one market for its full duration, so
//! operations on the same market serialize while different markets
//! proceed independently — no cross-market lock ordering exists.
//!
//! The engine performs pure computation plus local mutation only: no
//! I/O, no timers, no ambient clock. Callers supply timestamps, and a
//! host process drives time-gated transitions through
//! [`Engine::evaluate_transitions`].

mod admin;
mod claim;
mod governance;
mod trade;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use tracing::info;

use crate::config::{ConfigError, GlobalConfig};
use crate::domain::{
    AccountId, FeeLedger, Fixed, Market, MarketId, MarketState, Operation, Position, VoteKind,
    VoteRecord,
};
use crate::error::{Error, Result};

pub use claim::ClaimReceipt;
pub use trade::TradeReceipt;

/// One market plus everything it exclusively owns.
pub(crate) struct MarketEntry {
    pub(crate) market: Market,
    pub(crate) positions: HashMap<AccountId, Position>,
    pub(crate) votes: HashMap<(AccountId, VoteKind), VoteRecord>,
}

/// The deterministic market engine.
pub struct Engine {
    config: RwLock<GlobalConfig>,
    markets: DashMap<MarketId, Mutex<MarketEntry>>,
}

impl Engine {
    /// Create an engine with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: RwLock::new(GlobalConfig::default()),
            markets: DashMap::new(),
        }
    }

    /// Create an engine with a caller-supplied configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid; a
    /// config is validated before it is ever used.
    pub fn with_config(config: GlobalConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: RwLock::new(config),
            markets: DashMap::new(),
        })
    }

    /// Snapshot the current global configuration.
    #[must_use]
    pub fn global_config(&self) -> GlobalConfig {
        self.config.read().clone()
    }

    pub(crate) fn config_snapshot(&self) -> GlobalConfig {
        self.config.read().clone()
    }

    pub(crate) fn replace_config(&self, config: GlobalConfig) {
        *self.config.write() = config;
    }

    pub(crate) fn set_paused(&self, paused: bool) {
        self.config.write().paused = paused;
    }

    /// Run `f` with the market's entry exclusively locked.
    pub(crate) fn with_entry<T>(
        &self,
        market_id: &MarketId,
        f: impl FnOnce(&mut MarketEntry) -> Result<T>,
    ) -> Result<T> {
        let entry = self.markets.get(market_id).ok_or_else(|| Error::MarketNotFound {
            market_id: market_id.clone(),
        })?;
        let mut guard = entry.lock();
        f(&mut guard)
    }

    /// Create a market in the `Proposed` state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidResolutionTime`] unless `resolution_at`
    /// is after `now`, and a numeric domain error unless `liquidity` is
    /// positive.
    pub fn create_market(
        &self,
        question_ref: impl Into<String>,
        creator: AccountId,
        resolution_at: DateTime<Utc>,
        liquidity: Fixed,
        now: DateTime<Utc>,
    ) -> Result<MarketId> {
        let market_id = MarketId::new();
        let market = Market::new(
            market_id.clone(),
            question_ref,
            creator.clone(),
            resolution_at,
            liquidity,
            now,
        )?;
        self.markets.insert(
            market_id.clone(),
            Mutex::new(MarketEntry {
                market,
                positions: HashMap::new(),
                votes: HashMap::new(),
            }),
        );
        info!(
            market_id = %market_id,
            creator = %creator,
            liquidity = %liquidity,
            "market created"
        );
        Ok(market_id)
    }

    /// Supply initial liquidity and open trading: `Approved → Active`.
    ///
    /// The funding must cover the worst-case maker loss `b·ln 2`; the
    /// host escrows the funds, the engine validates the precondition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] outside `Approved` and
    /// [`Error::InsufficientFunding`] when the funding is short.
    pub fn activate_market(&self, market_id: &MarketId, funding: Fixed) -> Result<()> {
        self.with_entry(market_id, |entry| {
            entry.market.ensure_allows(Operation::Activate)?;
            let required = entry.market.model().max_loss()?;
            if funding < required {
                return Err(Error::InsufficientFunding { funding, required });
            }
            entry
                .market
                .transition_to(MarketState::Active, Operation::Activate)?;
            entry.market.set_funding(funding);
            info!(market_id = %market_id, funding = %funding, "market activated");
            Ok(())
        })
    }

    /// Evaluate time-gated transitions for one market.
    ///
    /// The only such edge is `Active → Resolving`, taken once `now ≥
    /// resolution_at`. Idempotent: in every other state this is a
    /// no-op returning the current state. The engine has no scheduler;
    /// the host invokes this periodically.
    pub fn evaluate_transitions(
        &self,
        market_id: &MarketId,
        now: DateTime<Utc>,
    ) -> Result<MarketState> {
        self.with_entry(market_id, |entry| {
            if entry.market.state().allows(Operation::EvaluateTransitions)
                && now >= entry.market.resolution_at()
            {
                entry
                    .market
                    .transition_to(MarketState::Resolving, Operation::EvaluateTransitions)?;
                info!(market_id = %market_id, "trading closed, market resolving");
            }
            Ok(entry.market.state())
        })
    }

    /// Read a snapshot of a market.
    pub fn market(&self, market_id: &MarketId) -> Result<Market> {
        self.with_entry(market_id, |entry| Ok(entry.market.clone()))
    }

    /// Current `(price_yes, price_no)` of a market.
    pub fn prices(&self, market_id: &MarketId) -> Result<(Fixed, Fixed)> {
        self.with_entry(market_id, |entry| entry.market.prices())
    }

    /// Read a holder's position, if any trade ever created one.
    pub fn position(&self, market_id: &MarketId, holder: &AccountId) -> Result<Option<Position>> {
        self.with_entry(market_id, |entry| Ok(entry.positions.get(holder).cloned()))
    }

    /// Read a market's fee ledger.
    pub fn fee_ledger(&self, market_id: &MarketId) -> Result<FeeLedger> {
        self.with_entry(market_id, |entry| Ok(*entry.market.fees()))
    }

    /// Number of markets the engine holds.
    #[must_use]
    pub fn market_count(&self) -> usize {
        self.markets.len()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
