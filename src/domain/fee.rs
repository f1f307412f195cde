//! Fee split bookkeeping.
//!
//! Every trade's fee is split across three pools — protocol, creator,
//! staker — and accrued into the market's [`FeeLedger`]. Accrued totals
//! are cumulative for the market's lifetime; claims are tracked
//! separately so pool balances never go negative and never reset.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::fixed::{Fixed, NumericError};

/// The three fee pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeePool {
    /// Claimable only by the configured treasury identity.
    Protocol,
    /// Claimable only by the market creator.
    Creator,
    /// Claimable only by the admin; distribution happens off-engine.
    Staker,
}

impl fmt::Display for FeePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeePool::Protocol => "protocol",
            FeePool::Creator => "creator",
            FeePool::Staker => "staker",
        };
        write!(f, "{name}")
    }
}

/// The fee split of a single trade.
///
/// Invariant: `protocol + creator + staker == total`, exactly. The
/// constructor enforces it, so a breakdown cannot exist out of balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    protocol: Fixed,
    creator: Fixed,
    staker: Fixed,
    total: Fixed,
}

impl FeeBreakdown {
    /// A breakdown with every component zero.
    pub const ZERO: FeeBreakdown = FeeBreakdown {
        protocol: Fixed::ZERO,
        creator: Fixed::ZERO,
        staker: Fixed::ZERO,
        total: Fixed::ZERO,
    };

    /// Build a breakdown from its components; the total is their sum.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Overflow`] if the sum does not fit, and
    /// [`NumericError::DomainError`] if any component is negative.
    pub fn new(protocol: Fixed, creator: Fixed, staker: Fixed) -> Result<Self, NumericError> {
        if protocol.is_negative() || creator.is_negative() || staker.is_negative() {
            return Err(NumericError::DomainError);
        }
        let total = protocol.checked_add(creator)?.checked_add(staker)?;
        Ok(Self {
            protocol,
            creator,
            staker,
            total,
        })
    }

    /// Protocol pool share.
    #[must_use]
    pub const fn protocol(&self) -> Fixed {
        self.protocol
    }

    /// Creator pool share.
    #[must_use]
    pub const fn creator(&self) -> Fixed {
        self.creator
    }

    /// Staker pool share.
    #[must_use]
    pub const fn staker(&self) -> Fixed {
        self.staker
    }

    /// Grand total, exactly the sum of the three shares.
    #[must_use]
    pub const fn total(&self) -> Fixed {
        self.total
    }

    /// Share for a given pool.
    #[must_use]
    pub const fn pool(&self, pool: FeePool) -> Fixed {
        match pool {
            FeePool::Protocol => self.protocol,
            FeePool::Creator => self.creator,
            FeePool::Staker => self.staker,
        }
    }
}

/// Per-pool running totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
struct PoolTotals {
    protocol: Fixed,
    creator: Fixed,
    staker: Fixed,
}

impl PoolTotals {
    fn get(&self, pool: FeePool) -> Fixed {
        match pool {
            FeePool::Protocol => self.protocol,
            FeePool::Creator => self.creator,
            FeePool::Staker => self.staker,
        }
    }

    fn get_mut(&mut self, pool: FeePool) -> &mut Fixed {
        match pool {
            FeePool::Protocol => &mut self.protocol,
            FeePool::Creator => &mut self.creator,
            FeePool::Staker => &mut self.staker,
        }
    }
}

/// A market's cumulative fee accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeeLedger {
    accrued: PoolTotals,
    claimed: PoolTotals,
}

impl FeeLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accrue a trade's fee split into the pools.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Overflow`] if a running total does not
    /// fit; the ledger is unchanged on error.
    pub fn accrue(&mut self, fees: &FeeBreakdown) -> Result<(), NumericError> {
        let next = PoolTotals {
            protocol: self.accrued.protocol.checked_add(fees.protocol())?,
            creator: self.accrued.creator.checked_add(fees.creator())?,
            staker: self.accrued.staker.checked_add(fees.staker())?,
        };
        self.accrued = next;
        Ok(())
    }

    /// Cumulative amount ever accrued to `pool`.
    #[must_use]
    pub fn accrued(&self, pool: FeePool) -> Fixed {
        self.accrued.get(pool)
    }

    /// Cumulative amount ever claimed from `pool`.
    #[must_use]
    pub fn claimed(&self, pool: FeePool) -> Fixed {
        self.claimed.get(pool)
    }

    /// Balance currently claimable from `pool`.
    #[must_use]
    pub fn claimable(&self, pool: FeePool) -> Fixed {
        // Claims never exceed accruals, so this cannot underflow.
        Fixed::from_raw(self.accrued.get(pool).raw() - self.claimed.get(pool).raw())
    }

    /// Sum of all accrued pools — the ledger grand total.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Overflow`] if the sum does not fit.
    pub fn accrued_total(&self) -> Result<Fixed, NumericError> {
        self.accrued
            .protocol
            .checked_add(self.accrued.creator)?
            .checked_add(self.accrued.staker)
    }

    /// Record a claim against `pool`.
    ///
    /// The caller validates `amount ≤ claimable(pool)` first; this only
    /// updates the running total.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Overflow`] if the claimed total does not
    /// fit.
    pub fn record_claim(&mut self, pool: FeePool, amount: Fixed) -> Result<(), NumericError> {
        let slot = self.claimed.get_mut(pool);
        *slot = slot.checked_add(amount)?;
        Ok(())
    }
}
