//! Deterministic scaled-integer arithmetic.
//!
//! [`Fixed`] is the single numeric type used for every price, share
//! quantity, and fee in the engine. It stores values as an `i128` scaled
//! by 10^9, so identical operation sequences produce bit-identical
//! results on every platform. Native floating point never appears in
//! this crate.
//!
//! All arithmetic is overflow-checked: a result that does not fit fails
//! with [`NumericError::Overflow`] instead of wrapping. Division
//! truncates toward zero.
//!
//! # Transcendental accuracy
//!
//! [`Fixed::exp`] and [`Fixed::ln`] use bounded series approximations:
//!
//! - `exp(x)` accepts |x| ≤ 20 and is accurate to within a relative
//!   error of 1e-4 for |x| ≤ 11 (absolute error stays at a handful of
//!   10^-9 quanta across the full domain; the relative bound loosens
//!   only where `e^x` itself approaches the representation floor).
//! - `ln(x)` accepts any x > 0 and is accurate to within a relative
//!   error of 1e-4 (observed error is far below 1e-6).

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by the numeric kernel.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericError {
    /// A result does not fit in the scaled representation, or an input
    /// lies outside a function's bounded domain.
    #[error("arithmetic overflow")]
    Overflow,

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// An input outside a function's mathematical domain, e.g. `ln(x)`
    /// for x ≤ 0.
    #[error("input outside function domain")]
    DomainError,
}

/// Number of fractional decimal digits carried by [`Fixed`].
pub const DECIMALS: u32 = 9;

/// Raw scale factor: one whole unit is this many quanta.
const SCALE: i128 = 1_000_000_000;

/// `ln 2` in raw quanta, rounded to nearest.
const LN2_RAW: i128 = 693_147_181;

/// Largest |x| accepted by [`Fixed::exp`], in raw quanta (20.0).
const EXP_INPUT_MAX: i128 = 20 * SCALE;

/// A fixed-point number with nine fractional decimal digits.
///
/// The inner `i128` is private so all construction goes through the
/// defined constructors.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Fixed(i128);

impl Fixed {
    /// Zero.
    pub const ZERO: Fixed = Fixed(0);

    /// One whole unit.
    pub const ONE: Fixed = Fixed(SCALE);

    /// `ln 2`, the constant behind the bounded-loss guarantee.
    pub const LN_2: Fixed = Fixed(LN2_RAW);

    /// Create a value from a whole number of units.
    #[must_use]
    pub const fn from_int(n: i64) -> Self {
        Self(n as i128 * SCALE)
    }

    /// Create a value directly from raw quanta (10^-9 units).
    #[must_use]
    pub const fn from_raw(raw: i128) -> Self {
        Self(raw)
    }

    /// Get the raw quanta.
    #[must_use]
    pub const fn raw(&self) -> i128 {
        self.0
    }

    /// True if the value is exactly zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// True if the value is greater than zero.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// True if the value is less than zero.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Absolute value.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Overflow`] for `i128::MIN` quanta.
    pub fn abs(self) -> Result<Self, NumericError> {
        self.0.checked_abs().map(Self).ok_or(NumericError::Overflow)
    }

    /// Smaller of two values.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }

    /// Larger of two values.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        if self.0 >= other.0 {
            self
        } else {
            other
        }
    }

    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Overflow`] if the sum does not fit.
    pub fn checked_add(self, other: Self) -> Result<Self, NumericError> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(NumericError::Overflow)
    }

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Overflow`] if the difference does not fit.
    pub fn checked_sub(self, other: Self) -> Result<Self, NumericError> {
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or(NumericError::Overflow)
    }

    /// Checked negation.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Overflow`] for `i128::MIN` quanta.
    pub fn checked_neg(self) -> Result<Self, NumericError> {
        self.0.checked_neg().map(Self).ok_or(NumericError::Overflow)
    }

    /// Checked multiplication: `a · b / SCALE`, truncating toward zero.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Overflow`] if the intermediate product
    /// does not fit.
    pub fn checked_mul(self, other: Self) -> Result<Self, NumericError> {
        self.0
            .checked_mul(other.0)
            .map(|p| Self(p / SCALE))
            .ok_or(NumericError::Overflow)
    }

    /// Checked division: `a · SCALE / b`, truncating toward zero.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::DivisionByZero`] for a zero divisor and
    /// [`NumericError::Overflow`] if the scaled numerator does not fit.
    pub fn checked_div(self, other: Self) -> Result<Self, NumericError> {
        if other.0 == 0 {
            return Err(NumericError::DivisionByZero);
        }
        self.0
            .checked_mul(SCALE)
            .map(|n| Self(n / other.0))
            .ok_or(NumericError::Overflow)
    }

    /// Multiply by a basis-point fraction: `a · bps / 10_000`, floored.
    ///
    /// Callers pass non-negative values; the floor is exact for them.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Overflow`] if the intermediate product
    /// does not fit.
    pub fn mul_bps(self, bps: u16) -> Result<Self, NumericError> {
        self.0
            .checked_mul(i128::from(bps))
            .map(|p| Self(p / 10_000))
            .ok_or(NumericError::Overflow)
    }

    /// Bounded exponential, `e^x`.
    ///
    /// Maclaurin series evaluated until the running term underflows to
    /// zero quanta; negative arguments go through the reciprocal.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Overflow`] when |x| exceeds 20.
    pub fn exp(self) -> Result<Self, NumericError> {
        if self.0 < 0 {
            let pos = self.checked_neg()?.exp()?;
            return Self::ONE.checked_div(pos);
        }
        if self.0 > EXP_INPUT_MAX {
            return Err(NumericError::Overflow);
        }

        // sum_{k} x^k / k!, with term_k = term_{k-1} · x / k.
        let mut term = SCALE;
        let mut sum = SCALE;
        let mut k: i128 = 1;
        while term != 0 && k <= 150 {
            term = term
                .checked_mul(self.0)
                .ok_or(NumericError::Overflow)?
                / (k * SCALE);
            sum = sum.checked_add(term).ok_or(NumericError::Overflow)?;
            k += 1;
        }
        Ok(Self(sum))
    }

    /// Bounded natural logarithm, `ln x`.
    ///
    /// Range-reduces by powers of two into [1, 2), then evaluates
    /// `ln m = 2·atanh((m−1)/(m+1))`, whose argument stays below 1/3.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::DomainError`] for x ≤ 0.
    pub fn ln(self) -> Result<Self, NumericError> {
        if self.0 <= 0 {
            return Err(NumericError::DomainError);
        }

        let mut m = self.0;
        let mut k: i128 = 0;
        while m < SCALE {
            m *= 2;
            k -= 1;
        }
        while m >= 2 * SCALE {
            m /= 2;
            k += 1;
        }

        // z ∈ [0, 1/3): atanh(z) = z + z³/3 + z⁵/5 + …
        let z = (m - SCALE) * SCALE / (m + SCALE);
        let z2 = z * z / SCALE;
        let mut term = z;
        let mut sum = z;
        let mut n: i128 = 3;
        while term != 0 && n <= 99 {
            term = term * z2 / SCALE;
            sum += term / n;
            n += 2;
        }

        Ok(Self(k * LN2_RAW + 2 * sum))
    }

    /// Convert to a [`Decimal`] for reporting.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Overflow`] if the value exceeds the
    /// decimal range.
    pub fn to_decimal(self) -> Result<Decimal, NumericError> {
        Decimal::try_from_i128_with_scale(self.0, DECIMALS).map_err(|_| NumericError::Overflow)
    }

    /// Convert from a [`Decimal`], truncating digits beyond 10^-9.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Overflow`] if the rescaled mantissa does
    /// not fit.
    pub fn try_from_decimal(d: Decimal) -> Result<Self, NumericError> {
        let mantissa = d.mantissa();
        let scale = d.scale();
        if scale <= DECIMALS {
            let factor = 10i128
                .checked_pow(DECIMALS - scale)
                .ok_or(NumericError::Overflow)?;
            mantissa
                .checked_mul(factor)
                .map(Self)
                .ok_or(NumericError::Overflow)
        } else {
            let factor = 10i128
                .checked_pow(scale - DECIMALS)
                .ok_or(NumericError::Overflow)?;
            Ok(Self(mantissa / factor))
        }
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / SCALE as u128;
        let frac = abs % SCALE as u128;
        if frac == 0 {
            write!(f, "{sign}{whole}")
        } else {
            let digits = format!("{frac:09}");
            write!(f, "{sign}{whole}.{}", digits.trim_end_matches('0'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn fix(n: i64) -> Fixed {
        Fixed::from_int(n)
    }

    #[test]
    fn add_sub_round_trip() {
        let a = Fixed::from_raw(1_500_000_000);
        let b = Fixed::from_raw(250_000_000);
        let sum = a.checked_add(b).unwrap();
        assert_eq!(sum.raw(), 1_750_000_000);
        assert_eq!(sum.checked_sub(b).unwrap(), a);
    }

    #[test]
    fn add_overflow_fails_loudly() {
        let max = Fixed::from_raw(i128::MAX);
        assert_eq!(max.checked_add(Fixed::ONE), Err(NumericError::Overflow));
    }

    #[test]
    fn mul_scales_correctly() {
        // 1.5 * 2 = 3
        let a = Fixed::from_raw(1_500_000_000);
        assert_eq!(a.checked_mul(fix(2)).unwrap(), fix(3));
    }

    #[test]
    fn mul_truncates_toward_zero() {
        // 0.000000001 * 0.5 = 0.0000000005 -> truncates to 0
        let tiny = Fixed::from_raw(1);
        let half = Fixed::from_raw(500_000_000);
        assert_eq!(tiny.checked_mul(half).unwrap(), Fixed::ZERO);
    }

    #[test]
    fn div_by_zero_is_an_error() {
        assert_eq!(
            fix(1).checked_div(Fixed::ZERO),
            Err(NumericError::DivisionByZero)
        );
    }

    #[test]
    fn div_inverse_of_mul() {
        let a = fix(7);
        let b = fix(4);
        let q = a.checked_div(b).unwrap();
        assert_eq!(q.raw(), 1_750_000_000); // 1.75
    }

    #[test]
    fn mul_bps_floors() {
        // 1.0 * 333 bps = 0.0333
        assert_eq!(fix(1).mul_bps(333).unwrap().raw(), 33_300_000);
        // 0.000000001 * 1 bps floors to zero
        assert_eq!(Fixed::from_raw(1).mul_bps(1).unwrap(), Fixed::ZERO);
    }

    #[test]
    fn exp_of_zero_is_one() {
        assert_eq!(Fixed::ZERO.exp().unwrap(), Fixed::ONE);
    }

    #[test]
    fn exp_of_one_approximates_e() {
        let e = fix(1).exp().unwrap();
        // e = 2.718281828...; series truncation loses a few quanta.
        let err = (e.raw() - 2_718_281_828).abs();
        assert!(err <= 10, "exp(1) off by {err} quanta: {e}");
    }

    #[test]
    fn exp_of_negative_is_reciprocal() {
        let pos = fix(2).exp().unwrap();
        let neg = fix(-2).exp().unwrap();
        let product = pos.checked_mul(neg).unwrap();
        let err = (product.raw() - Fixed::ONE.raw()).abs();
        assert!(err <= 50, "e^2 · e^-2 = {product}");
    }

    #[test]
    fn exp_rejects_out_of_domain() {
        let just_over = Fixed::from_raw(EXP_INPUT_MAX + 1);
        assert_eq!(just_over.exp(), Err(NumericError::Overflow));
        assert_eq!(
            just_over.checked_neg().unwrap().exp(),
            Err(NumericError::Overflow)
        );
        // The boundary itself is accepted.
        assert!(Fixed::from_raw(EXP_INPUT_MAX).exp().is_ok());
    }

    #[test]
    fn ln_of_one_is_zero() {
        assert_eq!(Fixed::ONE.ln().unwrap(), Fixed::ZERO);
    }

    #[test]
    fn ln_of_two_matches_constant() {
        let ln2 = fix(2).ln().unwrap();
        let err = (ln2.raw() - Fixed::LN_2.raw()).abs();
        assert!(err <= 2, "ln(2) off by {err} quanta: {ln2}");
    }

    #[test]
    fn ln_rejects_non_positive() {
        assert_eq!(Fixed::ZERO.ln(), Err(NumericError::DomainError));
        assert_eq!(fix(-1).ln(), Err(NumericError::DomainError));
    }

    #[test]
    fn exp_ln_round_trip() {
        for n in [1i64, 2, 5, 42, 1000] {
            let x = fix(n);
            let back = x.ln().unwrap().exp().unwrap();
            let err = (back.raw() - x.raw()).abs();
            // Relative error well under the documented 1e-4.
            assert!(
                err <= x.raw() / 100_000,
                "exp(ln({n})) = {back}, off by {err} quanta"
            );
        }
    }

    #[test]
    fn decimal_round_trip() {
        let x = Fixed::from_raw(1_234_567_891);
        let d = x.to_decimal().unwrap();
        assert_eq!(d, dec!(1.234567891));
        assert_eq!(Fixed::try_from_decimal(d).unwrap(), x);
    }

    #[test]
    fn from_decimal_truncates_excess_digits() {
        let d = dec!(0.12345678999);
        assert_eq!(
            Fixed::try_from_decimal(d).unwrap(),
            Fixed::from_raw(123_456_789)
        );
    }

    #[test]
    fn display_renders_decimal_form() {
        assert_eq!(fix(3).to_string(), "3");
        assert_eq!(Fixed::from_raw(1_500_000_000).to_string(), "1.5");
        assert_eq!(Fixed::from_raw(-500_000_000).to_string(), "-0.5");
        assert_eq!(Fixed::from_raw(1).to_string(), "0.000000001");
    }

    #[test]
    fn ordering_follows_raw_value() {
        assert!(fix(2) > fix(1));
        assert!(fix(-1) < Fixed::ZERO);
        assert_eq!(fix(5).min(fix(3)), fix(3));
        assert_eq!(fix(5).max(fix(3)), fix(5));
    }
}
