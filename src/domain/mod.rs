//! Host-agnostic domain logic.

mod fee;
mod fixed;
mod id;
mod lifecycle;
mod lmsr;
mod market;
mod money;
mod position;
mod vote;

// Core domain types
pub use fee::{FeeBreakdown, FeeLedger, FeePool};
pub use fixed::{Fixed, NumericError, DECIMALS};
pub use id::{AccountId, MarketId};
pub use lifecycle::{MarketState, Operation};
pub use lmsr::LmsrModel;
pub use market::{Market, Side};
pub use money::{Price, Shares};
pub use position::Position;
pub use vote::{VoteChoice, VoteKind, VoteRecord, VoteTally};
