//! Tests for configuration loading, validation, and admin updates.

use std::io::Write;

use oddsmith::config::{ConfigError, GlobalConfig};
use oddsmith::domain::{AccountId, Fixed, Market, MarketId, Side};
use oddsmith::error::Error;
use oddsmith::testkit::domain::{account, fix, t};
use oddsmith::testkit::market::{active_market, engine};

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn load_parses_and_validates_a_toml_file() {
    let file = write_config(
        r#"
total_fee_bps = 1000
protocol_fee_bps = 300
creator_fee_bps = 200
staker_fee_bps = 500
proposal_threshold_bps = 7000
dispute_threshold_bps = 6000
paused = false
admin = "ops"
treasury = "vault"
"#,
    );

    let config = GlobalConfig::load(file.path()).unwrap();
    assert_eq!(config.total_fee_bps, 1000);
    assert_eq!(config.admin, AccountId::new("ops"));
    assert_eq!(config.treasury, AccountId::new("vault"));
    assert!(!config.paused);
}

#[test]
fn load_rejects_missing_file() {
    let err = GlobalConfig::load("/definitely/not/here.toml").unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile(_)));
}

#[test]
fn load_rejects_malformed_toml() {
    let file = write_config("total_fee_bps = [not a number");
    let err = GlobalConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn load_rejects_invalid_fee_structure() {
    // Components sum to 900, total says 1000.
    let file = write_config(
        r#"
total_fee_bps = 1000
protocol_fee_bps = 300
creator_fee_bps = 200
staker_fee_bps = 400
proposal_threshold_bps = 7000
dispute_threshold_bps = 6000
paused = false
admin = "ops"
treasury = "vault"
"#,
    );

    let err = GlobalConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidFeeStructure { .. }));
}

#[test]
fn update_global_config_requires_admin() {
    let e = engine();
    let err = e
        .update_global_config(&account("mallory"), GlobalConfig::default())
        .unwrap_err();
    assert!(matches!(err, Error::Unauthorized { .. }));
}

#[test]
fn update_global_config_validates_before_swapping() {
    let e = engine();
    let bad = GlobalConfig {
        dispute_threshold_bps: 10_001,
        ..GlobalConfig::default()
    };

    let err = e.update_global_config(&account("admin"), bad).unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidThreshold { .. })
    ));

    // The old configuration remains in force.
    assert_eq!(e.global_config().dispute_threshold_bps, 6_000);
}

#[test]
fn update_global_config_swaps_on_success() {
    let e = engine();
    let next = GlobalConfig {
        total_fee_bps: 400,
        protocol_fee_bps: 200,
        creator_fee_bps: 100,
        staker_fee_bps: 100,
        ..GlobalConfig::default()
    };

    e.update_global_config(&account("admin"), next.clone()).unwrap();
    assert_eq!(e.global_config(), next);
}

#[test]
fn admin_handover_transfers_authority() {
    let e = engine();
    let next = GlobalConfig {
        admin: AccountId::new("ops-2"),
        ..GlobalConfig::default()
    };
    e.update_global_config(&account("admin"), next).unwrap();

    // Old admin is out, new admin is in.
    assert!(matches!(
        e.emergency_pause(&account("admin"), true),
        Err(Error::Unauthorized { .. })
    ));
    e.emergency_pause(&account("ops-2"), true).unwrap();
}

#[test]
fn pause_toggle_requires_admin() {
    let e = engine();
    let err = e.emergency_pause(&account("bob"), true).unwrap_err();
    assert!(matches!(err, Error::Unauthorized { .. }));
    assert!(!e.global_config().paused);
}

#[test]
fn market_state_serializes_round_trip() {
    // The host persists markets; serde must reproduce them exactly.
    let e = engine();
    let id = active_market(&e);
    e.buy(&id, &account("bob"), Side::Yes, fix(25), fix(50), t(100)).unwrap();

    let market = e.market(&id).unwrap();
    let json = serde_json::to_string(&market).unwrap();
    let restored: Market = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, market);
}

#[test]
fn fixed_values_serialize_round_trip() {
    for raw in [0i128, 1, -1, 500_000_000, i128::from(u64::MAX)] {
        let value = Fixed::from_raw(raw);
        let json = serde_json::to_string(&value).unwrap();
        let restored: Fixed = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, value);
    }
}

#[test]
fn market_ids_serialize_as_plain_strings() {
    let id = MarketId::from("abc-123");
    assert_eq!(serde_json::to_string(&id).unwrap(), r#""abc-123""#);
}
