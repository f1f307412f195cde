//! Monetary types for price and share-quantity representation.

use super::fixed::Fixed;

/// Price represented as a scaled integer for determinism.
pub type Price = Fixed;

/// Share quantity represented as a scaled integer for determinism.
pub type Shares = Fixed;
