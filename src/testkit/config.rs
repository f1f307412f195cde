//! Canonical test configurations.
//!
//! Single source of truth for config values used across tests.
//! Avoids each test module defining its own slightly-different
//! defaults.

use crate::config::GlobalConfig;

/// The standard test config: default fees and thresholds, admin
/// identity `admin`, treasury identity `treasury`.
pub fn config() -> GlobalConfig {
    GlobalConfig::default()
}

/// A fee-heavy config matching the worked example: 1000 bps total,
/// split 300 protocol / 200 creator / 500 staker.
pub fn fee_heavy() -> GlobalConfig {
    GlobalConfig {
        total_fee_bps: 1_000,
        protocol_fee_bps: 300,
        creator_fee_bps: 200,
        staker_fee_bps: 500,
        ..GlobalConfig::default()
    }
}

/// A zero-fee config for tests that check pure pricing arithmetic.
pub fn zero_fee() -> GlobalConfig {
    GlobalConfig {
        total_fee_bps: 0,
        protocol_fee_bps: 0,
        creator_fee_bps: 0,
        staker_fee_bps: 0,
        ..GlobalConfig::default()
    }
}
