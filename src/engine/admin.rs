//! Administrative operations: config updates, pause, cancellation.
//!
//! Every operation here authenticates against the current admin
//! identity and validates fully before mutating anything.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::config::GlobalConfig;
use crate::domain::{AccountId, MarketId, MarketState, Operation};
use crate::error::{Error, Result};

use super::Engine;

impl Engine {
    /// Replace the global configuration.
    ///
    /// The new value is validated in full before the swap; on error the
    /// old configuration remains in force. The new config may name a
    /// different admin — handover is a config update like any other.
    ///
    /// # Errors
    ///
    /// [`Error::Unauthorized`] for a non-admin caller;
    /// [`Error::Config`] wrapping the structural violation.
    pub fn update_global_config(&self, caller: &AccountId, config: GlobalConfig) -> Result<()> {
        self.ensure_admin(caller, "update global config")?;
        config.validate()?;
        self.replace_config(config);
        info!(caller = %caller, "global config updated");
        Ok(())
    }

    /// Set or clear the global pause flag.
    ///
    /// Pausing blocks only buy and sell; voting, aggregation,
    /// resolution, and claims continue so in-flight governance can
    /// complete while trading is halted.
    ///
    /// # Errors
    ///
    /// [`Error::Unauthorized`] for a non-admin caller.
    pub fn emergency_pause(&self, caller: &AccountId, paused: bool) -> Result<()> {
        self.ensure_admin(caller, "toggle emergency pause")?;
        self.set_paused(paused);
        if paused {
            warn!(caller = %caller, "trading paused");
        } else {
            info!(caller = %caller, "trading resumed");
        }
        Ok(())
    }

    /// Cancel a market that has not started trading.
    ///
    /// Legal only from `Proposed` or `Approved`. The engine flips the
    /// state and blocks all further activity; refund settlement is the
    /// host's batch concern.
    ///
    /// # Errors
    ///
    /// [`Error::Unauthorized`] for a non-admin caller;
    /// [`Error::InvalidState`] once trading has started.
    pub fn cancel_market(
        &self,
        caller: &AccountId,
        market_id: &MarketId,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.ensure_admin(caller, "cancel market")?;
        self.with_entry(market_id, |entry| {
            entry.market.ensure_allows(Operation::Cancel)?;
            entry
                .market
                .transition_to(MarketState::Cancelled, Operation::Cancel)?;
            entry.market.set_cancelled(now);
            warn!(market_id = %market_id, caller = %caller, "market cancelled");
            Ok(())
        })
    }

    fn ensure_admin(&self, caller: &AccountId, action: &'static str) -> Result<()> {
        if caller == &self.config_snapshot().admin {
            Ok(())
        } else {
            Err(Error::Unauthorized {
                action,
                required: "admin",
            })
        }
    }
}
