//! Fixed-point decimal numbers.
//!
//! Every point, cost, level and percentage in a sheet is an [`Fxp`]: a signed
//! 64-bit integer scaled by 10⁴, so four decimal digits are exact and repeated
//! additions never drift. Products and quotients use 128-bit intermediates and
//! truncate toward zero; rounding to whole numbers is always explicit.
//! Arithmetic saturates at the ends of the range instead of overflowing.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fixed-point value with four decimal places.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fxp(i64);

impl Fxp {
    /// Raw units per whole number.
    pub const SCALE: i64 = 10_000;
    const DECIMALS: usize = 4;

    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self::from_int(1);
    pub const TWO: Self = Self::from_int(2);
    pub const TWENTY: Self = Self::from_int(20);
    pub const EIGHTY: Self = Self::from_int(80);
    pub const HUNDRED: Self = Self::from_int(100);
    pub const MAX: Self = Self(i64::MAX);
    pub const MIN: Self = Self(i64::MIN);

    pub const fn from_int(value: i64) -> Self {
        Self(value.saturating_mul(Self::SCALE))
    }

    /// Builds a value from raw scaled units (`from_raw(15_000)` is 1.5).
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Builds `numerator / denominator`, truncated to four decimals.
    pub const fn from_ratio(numerator: i64, denominator: i64) -> Self {
        Self(numerator * Self::SCALE / denominator)
    }

    /// Saturates out-of-range values; NaN reads as zero.
    pub fn from_f64(value: f64) -> Self {
        Self((value * Self::SCALE as f64).round() as i64)
    }

    /// `None` for NaN, infinities and values outside the representable range.
    pub fn checked_from_f64(value: f64) -> Option<Self> {
        let scaled = (value * Self::SCALE as f64).round();
        // i64::MAX is not exactly representable; 2^63 is the first value out of range.
        (scaled.is_finite() && scaled >= i64::MIN as f64 && scaled < i64::MAX as f64)
            .then_some(Self(scaled as i64))
    }

    pub const fn raw(self) -> i64 {
        self.0
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    /// Whole-number part, truncated toward zero.
    pub const fn as_int(self) -> i64 {
        self.0 / Self::SCALE
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// By-reference form of [`is_zero`](Self::is_zero) for
    /// `skip_serializing_if`.
    pub const fn is_zero_ref(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Drops the fractional part (rounds toward zero).
    pub const fn trunc(self) -> Self {
        Self(self.0 / Self::SCALE * Self::SCALE)
    }

    pub const fn floor(self) -> Self {
        let t = self.trunc();
        if self.0 < 0 && t.0 != self.0 {
            Self(t.0.saturating_sub(Self::SCALE))
        } else {
            t
        }
    }

    pub const fn ceil(self) -> Self {
        let t = self.trunc();
        if self.0 > 0 && t.0 != self.0 {
            Self(t.0.saturating_add(Self::SCALE))
        } else {
            t
        }
    }

    /// Rounds to the nearest whole number; ties go away from zero.
    pub const fn round(self) -> Self {
        let half = Self::SCALE / 2;
        if self.0 >= 0 {
            Self(self.0.saturating_add(half) / Self::SCALE * Self::SCALE)
        } else {
            Self(-(self.0.saturating_neg().saturating_add(half) / Self::SCALE * Self::SCALE))
        }
    }

    /// Final rounding for point costs: truncate when `round_down`, otherwise
    /// round half away from zero.
    pub const fn apply_rounding(self, round_down: bool) -> Self {
        if round_down { self.trunc() } else { self.round() }
    }

    pub fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Formats with an explicit leading `+` for non-negative values.
    pub fn string_with_sign(self) -> String {
        if self.0 >= 0 {
            format!("+{self}")
        } else {
            self.to_string()
        }
    }

    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        if rhs.0 == 0 {
            return None;
        }
        let value = i128::from(self.0) * i128::from(Self::SCALE) / i128::from(rhs.0);
        i64::try_from(value).ok().map(Self)
    }

    fn saturating_from_wide(value: i128) -> Self {
        Self(i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX }))
    }
}

impl Add for Fxp {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Fxp {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Fxp {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Fxp {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Fxp {
    type Output = Self;
    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl Mul for Fxp {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let value = i128::from(self.0) * i128::from(rhs.0) / i128::from(Self::SCALE);
        Self::saturating_from_wide(value)
    }
}

impl MulAssign for Fxp {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

/// # Panics
///
/// Panics when dividing by zero, like integer division.
impl Div for Fxp {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        let value = i128::from(self.0) * i128::from(Self::SCALE) / i128::from(rhs.0);
        Self::saturating_from_wide(value)
    }
}

impl Sum for Fxp {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<i64> for Fxp {
    fn from(value: i64) -> Self {
        Self::from_int(value)
    }
}

impl From<i32> for Fxp {
    fn from(value: i32) -> Self {
        Self::from_int(i64::from(value))
    }
}

impl fmt::Display for Fxp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.0.unsigned_abs();
        let scale = Self::SCALE as u64;
        let whole = magnitude / scale;
        let frac = magnitude % scale;
        if self.0 < 0 {
            f.write_str("-")?;
        }
        if frac == 0 {
            write!(f, "{whole}")
        } else {
            let digits = format!("{frac:0width$}", width = Self::DECIMALS);
            write!(f, "{whole}.{}", digits.trim_end_matches('0'))
        }
    }
}

/// Error returned when text is not a decimal number.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid fixed-point number '{0}'")]
pub struct FxpParseError(pub String);

impl FromStr for Fxp {
    type Err = FxpParseError;

    /// Parses `[+-]digits[.digits]`; digits past the fourth decimal are dropped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || FxpParseError(s.to_string());
        let text = s.trim();
        let (negative, body) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };
        let (whole, frac) = body.split_once('.').unwrap_or((body, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(err());
        }
        if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| err())?
        };
        let mut frac_raw = 0i64;
        for (i, digit) in frac.bytes().take(Self::DECIMALS).enumerate() {
            frac_raw += i64::from(digit - b'0') * 10i64.pow((Self::DECIMALS - 1 - i) as u32);
        }
        let raw = whole
            .checked_mul(Self::SCALE)
            .and_then(|w| w.checked_add(frac_raw))
            .ok_or_else(err)?;
        Ok(Self(if negative { -raw } else { raw }))
    }
}

impl Serialize for Fxp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % Self::SCALE == 0 {
            serializer.serialize_i64(self.as_int())
        } else {
            serializer.serialize_f64(self.to_f64())
        }
    }
}

impl<'de> Deserialize<'de> for Fxp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FxpVisitor)
    }
}

struct FxpVisitor;

impl Visitor<'_> for FxpVisitor {
    type Value = Fxp;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a decimal string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Fxp, E> {
        v.checked_mul(Fxp::SCALE)
            .map(Fxp)
            .ok_or_else(|| E::custom(format!("{v} is out of range")))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Fxp, E> {
        let v = i64::try_from(v).map_err(|_| E::custom(format!("{v} is out of range")))?;
        self.visit_i64(v)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Fxp, E> {
        Fxp::checked_from_f64(v).ok_or_else(|| E::custom(format!("{v} is out of range")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Fxp, E> {
        v.parse().map_err(E::custom)
    }
}
