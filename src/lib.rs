//! Oddsmith - Deterministic LMSR prediction market engine.
//!
//! This crate is the computation core of a binary-outcome prediction
//! market platform: pricing, trade execution, fee accounting, lifecycle
//! governance. Every operation is pure computation plus local mutation
//! over scaled integers, so any party re-executing the same operation
//! sequence against the same inputs obtains bit-identical results.
//!
//! # Architecture
//!
//! Leaves first:
//!
//! - **`domain::Fixed`** - overflow-checked scaled-integer kernel with
//!   bounded `exp`/`ln`
//! - **`domain::LmsrModel`** - logarithmic-scoring-rule cost, prices,
//!   and the `b·ln 2` loss bound
//! - **`domain`** - markets, positions, votes, fee ledger, and the
//!   lifecycle legality table
//! - **`engine`** - the operation surface: trades, governance, claims,
//!   admin, serialized per market
//!
//! The host owns everything else: persistence, identity, the clock,
//! and the transport. The engine performs no I/O and spawns no timers;
//! time-gated transitions run when the host calls
//! [`engine::Engine::evaluate_transitions`].
//!
//! # Modules
//!
//! - [`config`] - Global configuration with TOML loading and validation
//! - [`domain`] - Host-agnostic domain types and the numeric kernel
//! - [`engine`] - The engine and its operation surface
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use oddsmith::domain::{AccountId, Fixed, Side, VoteChoice};
//! use oddsmith::engine::Engine;
//!
//! let engine = Engine::new();
//! let created = Utc.timestamp_opt(0, 0).unwrap();
//! let resolves = Utc.timestamp_opt(86_400, 0).unwrap();
//!
//! let market = engine
//!     .create_market("q-ref", AccountId::new("alice"), resolves, Fixed::from_int(100), created)
//!     .unwrap();
//!
//! for voter in ["v1", "v2", "v3"] {
//!     engine
//!         .submit_proposal_vote(&market, &AccountId::new(voter), VoteChoice::Yes, created)
//!         .unwrap();
//! }
//! assert!(engine.aggregate_proposal_votes(&market).unwrap());
//! engine.activate_market(&market, Fixed::from_int(100)).unwrap();
//!
//! let receipt = engine
//!     .buy(&market, &AccountId::new("bob"), Side::Yes, Fixed::from_int(50), Fixed::from_int(30), created)
//!     .unwrap();
//! assert!(receipt.price_yes > receipt.price_no);
//! ```

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
