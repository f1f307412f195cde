//! Global engine configuration.
//!
//! [`GlobalConfig`] is the singleton described by the platform: fee
//! basis points, governance thresholds, the pause flag, and the admin
//! and treasury identities. It is created once at initialization,
//! passed explicitly into every operation (no ambient mutable state),
//! and replaced only through a validated admin update.
//!
//! Validation always runs before a config value is used: [`load`]
//! validates after parsing, and `update_global_config` validates before
//! swapping.
//!
//! [`load`]: GlobalConfig::load

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{AccountId, FeeBreakdown, Fixed, NumericError};

/// Configuration-related errors with structured variants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A fee basis-point field is out of range or the components do not
    /// sum to the total.
    #[error("invalid fee structure: {reason}")]
    InvalidFeeStructure { reason: String },

    /// A governance threshold is out of the (0, 10000] range.
    #[error("invalid threshold for {field}: {value} bps")]
    InvalidThreshold { field: &'static str, value: u16 },

    /// Failed to read the config file.
    #[error("failed to read config file: {0}")]
    ReadFile(String),

    /// Failed to parse the config file.
    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Upper bound for any basis-point field (100%).
pub const MAX_BPS: u16 = 10_000;

/// The platform-wide configuration singleton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Total trading fee, in basis points of the base cost.
    pub total_fee_bps: u16,
    /// Protocol's share of the total fee, in basis points of the base cost.
    pub protocol_fee_bps: u16,
    /// Creator's share of the total fee, in basis points of the base cost.
    pub creator_fee_bps: u16,
    /// Stakers' share of the total fee, in basis points of the base cost.
    pub staker_fee_bps: u16,
    /// Proposal approval threshold (share of YES ballots, ≥ comparison).
    pub proposal_threshold_bps: u16,
    /// Dispute/resolution success threshold (≥ comparison).
    pub dispute_threshold_bps: u16,
    /// When set, buy and sell are rejected; governance and claims run on.
    pub paused: bool,
    /// The administrative identity.
    pub admin: AccountId,
    /// The identity allowed to claim the protocol fee pool.
    pub treasury: AccountId,
}

impl GlobalConfig {
    /// Load a configuration from a TOML file and validate it.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed,
    /// or if validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadFile(e.to_string()))?;

        let config: GlobalConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check every structural invariant.
    ///
    /// - each basis-point field ≤ 10000
    /// - `protocol + creator + staker == total`
    /// - thresholds in (0, 10000]
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidFeeStructure`] or
    /// [`ConfigError::InvalidThreshold`] on the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("total_fee_bps", self.total_fee_bps),
            ("protocol_fee_bps", self.protocol_fee_bps),
            ("creator_fee_bps", self.creator_fee_bps),
            ("staker_fee_bps", self.staker_fee_bps),
        ] {
            if value > MAX_BPS {
                return Err(ConfigError::InvalidFeeStructure {
                    reason: format!("{name} is {value}, max is {MAX_BPS}"),
                });
            }
        }

        let component_sum = u32::from(self.protocol_fee_bps)
            + u32::from(self.creator_fee_bps)
            + u32::from(self.staker_fee_bps);
        if component_sum != u32::from(self.total_fee_bps) {
            return Err(ConfigError::InvalidFeeStructure {
                reason: format!(
                    "components sum to {component_sum}, total is {}",
                    self.total_fee_bps
                ),
            });
        }

        for (field, value) in [
            ("proposal_threshold_bps", self.proposal_threshold_bps),
            ("dispute_threshold_bps", self.dispute_threshold_bps),
        ] {
            if value == 0 || value > MAX_BPS {
                return Err(ConfigError::InvalidThreshold { field, value });
            }
        }

        Ok(())
    }

    /// Split the fee on a trade's base cost across the three pools.
    ///
    /// The protocol and creator cuts are floored from the base cost;
    /// the staker pool receives `total − protocol − creator`, absorbing
    /// the integer-division remainder. One fixed rule, so the split
    /// sums exactly to the total on every trade.
    ///
    /// # Errors
    ///
    /// Propagates kernel overflow.
    pub fn split_fee(&self, base_cost: Fixed) -> Result<FeeBreakdown, NumericError> {
        let total = base_cost.mul_bps(self.total_fee_bps)?;
        let protocol = base_cost.mul_bps(self.protocol_fee_bps)?;
        let creator = base_cost.mul_bps(self.creator_fee_bps)?;
        let staker = total.checked_sub(protocol)?.checked_sub(creator)?;
        FeeBreakdown::new(protocol, creator, staker)
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            total_fee_bps: 200,
            protocol_fee_bps: 100,
            creator_fee_bps: 50,
            staker_fee_bps: 50,
            proposal_threshold_bps: 7_000,
            dispute_threshold_bps: 6_000,
            paused: false,
            admin: AccountId::new("admin"),
            treasury: AccountId::new("treasury"),
        }
    }
}
