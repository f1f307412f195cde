//! Builders for domain primitives used across tests.

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::{AccountId, Fixed};

/// A whole-unit [`Fixed`] value.
pub fn fix(n: i64) -> Fixed {
    Fixed::from_int(n)
}

/// A raw-quanta [`Fixed`] value.
pub fn fixr(raw: i128) -> Fixed {
    Fixed::from_raw(raw)
}

/// An [`AccountId`] from a string.
pub fn account(id: &str) -> AccountId {
    AccountId::new(id)
}

/// A timestamp at `secs` past the epoch.
pub fn t(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}
