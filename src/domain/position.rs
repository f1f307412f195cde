//! Per-holder share positions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fixed::{Fixed, NumericError};
use super::market::Side;
use super::money::Shares;

/// One holder's stake in one market.
///
/// Created on the holder's first trade and retained indefinitely for
/// audit. Mutated only through validated trades and a single claim:
/// once `claimed` is set it never clears, which is what makes a second
/// claim impossible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    shares_yes: Shares,
    shares_no: Shares,
    claimed: bool,
    claimed_amount: Fixed,
    opened_at: DateTime<Utc>,
}

impl Position {
    /// Create an empty position.
    #[must_use]
    pub fn new(opened_at: DateTime<Utc>) -> Self {
        Self {
            shares_yes: Fixed::ZERO,
            shares_no: Fixed::ZERO,
            claimed: false,
            claimed_amount: Fixed::ZERO,
            opened_at,
        }
    }

    /// Shares held on `side`.
    #[must_use]
    pub const fn shares(&self, side: Side) -> Shares {
        match side {
            Side::Yes => self.shares_yes,
            Side::No => self.shares_no,
        }
    }

    /// Shares held on the YES side.
    #[must_use]
    pub const fn shares_yes(&self) -> Shares {
        self.shares_yes
    }

    /// Shares held on the NO side.
    #[must_use]
    pub const fn shares_no(&self) -> Shares {
        self.shares_no
    }

    /// True once the payout was claimed.
    #[must_use]
    pub const fn is_claimed(&self) -> bool {
        self.claimed
    }

    /// Amount paid out by the claim, zero before it.
    #[must_use]
    pub const fn claimed_amount(&self) -> Fixed {
        self.claimed_amount
    }

    /// When the position was opened.
    #[must_use]
    pub const fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Add bought shares to `side`.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Overflow`] if the balance does not fit.
    pub fn add_shares(&mut self, side: Side, amount: Fixed) -> Result<(), NumericError> {
        let slot = match side {
            Side::Yes => &mut self.shares_yes,
            Side::No => &mut self.shares_no,
        };
        *slot = slot.checked_add(amount)?;
        Ok(())
    }

    /// Remove sold shares from `side`.
    ///
    /// The caller validates sufficiency first; the subtraction is still
    /// checked.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Overflow`] on underflow.
    pub fn remove_shares(&mut self, side: Side, amount: Fixed) -> Result<(), NumericError> {
        let slot = match side {
            Side::Yes => &mut self.shares_yes,
            Side::No => &mut self.shares_no,
        };
        *slot = slot.checked_sub(amount)?;
        Ok(())
    }

    /// Record the one-and-only claim.
    pub fn mark_claimed(&mut self, amount: Fixed) {
        self.claimed = true;
        self.claimed_amount = amount;
    }
}
