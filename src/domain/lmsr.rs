//! Logarithmic Market Scoring Rule (LMSR) pricing.
//!
//! The LMSR is the cost-function market maker used to price both sides
//! of a binary market from accumulated share quantities.
//! Reference: Hanson (2003) "Combinatorial Information Market Design".
//!
//! Built entirely on the [`Fixed`] kernel; every computation is
//! deterministic and overflow-checked.

use serde::{Deserialize, Serialize};

use super::fixed::{Fixed, NumericError};
use super::market::Side;

/// LMSR pricing model for binary outcome markets.
///
/// The liquidity parameter `b` controls market depth:
/// - Higher `b` = more liquidity, tighter spreads, slower price movement
/// - Lower `b` = less liquidity, wider spreads, faster price movement
///
/// The safe domain is `|q_yes − q_no| ≤ 20·b`; past that the underlying
/// exponential leaves its bounded domain and operations fail with
/// [`NumericError::Overflow`]. Callers choose `b` large enough for the
/// volume they expect to absorb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LmsrModel {
    /// Liquidity parameter (b > 0).
    b: Fixed,
}

impl LmsrModel {
    /// Create a new LMSR model with the given liquidity parameter.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::DomainError`] unless `b > 0`.
    pub fn new(b: Fixed) -> Result<Self, NumericError> {
        if !b.is_positive() {
            return Err(NumericError::DomainError);
        }
        Ok(Self { b })
    }

    /// Get the liquidity parameter.
    #[must_use]
    pub const fn liquidity(&self) -> Fixed {
        self.b
    }

    /// The LMSR cost function: `C(q) = b · ln(e^(q_yes/b) + e^(q_no/b))`.
    ///
    /// Computed as `q_max + b · ln(1 + e^((q_min − q_max)/b))` so the
    /// exponent is never positive and large share counts cannot
    /// overflow the exponential.
    ///
    /// # Errors
    ///
    /// Propagates kernel errors; in particular
    /// [`NumericError::Overflow`] when `|q_yes − q_no| > 20·b`.
    pub fn cost(&self, q_yes: Fixed, q_no: Fixed) -> Result<Fixed, NumericError> {
        let hi = q_yes.max(q_no);
        let lo = q_yes.min(q_no);
        let d = lo.checked_sub(hi)?.checked_div(self.b)?;
        let e = d.exp()?;
        let lse = Fixed::ONE.checked_add(e)?.ln()?;
        hi.checked_add(self.b.checked_mul(lse)?)
    }

    /// Instantaneous price of the YES outcome.
    ///
    /// `price_yes = 1 / (1 + e^((q_no − q_yes)/b))`, the logistic form
    /// of `e^(q_yes/b) / (e^(q_yes/b) + e^(q_no/b))`.
    pub fn price_yes(&self, q_yes: Fixed, q_no: Fixed) -> Result<Fixed, NumericError> {
        let d = q_no.checked_sub(q_yes)?.checked_div(self.b)?;
        let e = d.exp()?;
        Fixed::ONE.checked_div(Fixed::ONE.checked_add(e)?)
    }

    /// Instantaneous price of the NO outcome.
    ///
    /// Derived as `1 − price_yes`, never recomputed independently, so
    /// `price_yes + price_no == 1` holds exactly by construction.
    pub fn price_no(&self, q_yes: Fixed, q_no: Fixed) -> Result<Fixed, NumericError> {
        Fixed::ONE.checked_sub(self.price_yes(q_yes, q_no)?)
    }

    /// Both prices at once: `(price_yes, price_no)`.
    pub fn prices(&self, q_yes: Fixed, q_no: Fixed) -> Result<(Fixed, Fixed), NumericError> {
        let yes = self.price_yes(q_yes, q_no)?;
        let no = Fixed::ONE.checked_sub(yes)?;
        Ok((yes, no))
    }

    /// Cost of buying `delta` shares on `side`: `C(q + Δ) − C(q)`.
    ///
    /// Truncation can push a dust-sized difference one quantum below
    /// zero; the result is floored at zero — cost is never negative.
    pub fn buy_cost(
        &self,
        q_yes: Fixed,
        q_no: Fixed,
        side: Side,
        delta: Fixed,
    ) -> Result<Fixed, NumericError> {
        let before = self.cost(q_yes, q_no)?;
        let after = match side {
            Side::Yes => self.cost(q_yes.checked_add(delta)?, q_no)?,
            Side::No => self.cost(q_yes, q_no.checked_add(delta)?)?,
        };
        Ok(after.checked_sub(before)?.max(Fixed::ZERO))
    }

    /// Proceeds of selling `delta` shares on `side`: `C(q) − C(q − Δ)`.
    ///
    /// Floored at zero like [`buy_cost`](Self::buy_cost).
    pub fn sell_proceeds(
        &self,
        q_yes: Fixed,
        q_no: Fixed,
        side: Side,
        delta: Fixed,
    ) -> Result<Fixed, NumericError> {
        let before = self.cost(q_yes, q_no)?;
        let after = match side {
            Side::Yes => self.cost(q_yes.checked_sub(delta)?, q_no)?,
            Side::No => self.cost(q_yes, q_no.checked_sub(delta)?)?,
        };
        Ok(before.checked_sub(after)?.max(Fixed::ZERO))
    }

    /// The maximum loss the market maker can realize: `b · ln 2`.
    ///
    /// A structural consequence of the cost function — `C(q) ≥
    /// max(q_yes, q_no)` and `C(0, 0) = b·ln 2` — not an enforced clamp.
    pub fn max_loss(&self) -> Result<Fixed, NumericError> {
        self.b.checked_mul(Fixed::LN_2)
    }
}
