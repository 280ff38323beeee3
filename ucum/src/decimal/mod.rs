//! Arbitrary-precision decimal with significant-figure tracking.
//!
//! A [`Decimal`] is an exact `unscaled × 10^exponent` value plus the
//! measurement bookkeeping UCUM conversions need: whether the value is
//! *limited* (it came from a literal with a fractional part and carries a
//! fixed number of significant digits) and, if so, its `precision` and
//! `scale`. Unlimited values are exact and never truncated.

pub(crate) mod math;

use crate::error::UcumError;
use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

/// Significant digits kept by inexact division and transcendental functions
pub const WORKING_PRECISION: u32 = 100;

/// Largest `e` exponent a literal may carry, either sign. Plain rendering
/// writes every digit, so `1e999999999999` would never finish printing.
pub const MAX_LITERAL_EXPONENT: i64 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
    /// Trailing zeros are always stripped into `exponent`
    unscaled: BigInt,
    exponent: i64,
    limited: bool,
    precision: u32,
    scale: u32,
}

impl Decimal {
    pub fn zero() -> Self {
        Self::exact_parts(BigInt::zero(), 0)
    }

    pub fn one() -> Self {
        Self::exact_parts(BigInt::one(), 0)
    }

    /// Parse a literal as an exact (unlimited) value regardless of its form.
    /// Used for definition tables where every digit is authoritative.
    pub fn exact(literal: &str) -> Result<Self, UcumError> {
        let parsed = Literal::parse(literal)?;
        Ok(Self::exact_parts(parsed.unscaled, parsed.exponent))
    }

    /// Value from a float's shortest round-trip representation, unlimited
    pub fn from_f64(value: f64) -> Result<Self, UcumError> {
        if !value.is_finite() {
            return Err(UcumError::InvalidNumber(value.to_string()));
        }
        Self::exact(&format!("{}", value))
    }

    pub(crate) fn exact_parts(unscaled: BigInt, exponent: i64) -> Self {
        let (unscaled, exponent) = strip(unscaled, exponent);
        Self {
            unscaled,
            exponent,
            limited: false,
            precision: 0,
            scale: 0,
        }
    }

    /// A limited value rounded (HALF_UP) to `scale` fractional digits
    fn limited_at_scale(unscaled: BigInt, exponent: i64, scale: u32) -> Self {
        let (unscaled, exponent) = round_to_exponent(&unscaled, exponent, -(scale as i64));
        let precision = digits_at_exponent(&unscaled, exponent, -(scale as i64));
        let (unscaled, exponent) = strip(unscaled, exponent);
        Self {
            unscaled,
            exponent,
            limited: true,
            precision,
            scale,
        }
    }

    /// A limited value rounded (HALF_UP) to `precision` significant digits
    fn limited_at_precision(unscaled: BigInt, exponent: i64, precision: u32) -> Self {
        let precision = precision.max(1);
        let (unscaled, exponent) = round_significant(&unscaled, exponent, precision);
        let scale = if unscaled.is_zero() {
            precision.saturating_sub(1)
        } else {
            let adjusted = digit_count(&unscaled) as i64 - 1 + exponent;
            (precision as i64 - 1 - adjusted).max(0) as u32
        };
        let (unscaled, exponent) = strip(unscaled, exponent);
        Self {
            unscaled,
            exponent,
            limited: true,
            precision,
            scale,
        }
    }

    pub fn is_limited(&self) -> bool {
        self.limited
    }

    /// Significant digits of a limited value, `None` when exact
    pub fn precision(&self) -> Option<u32> {
        self.limited.then_some(self.precision)
    }

    /// Digits right of the decimal point of a limited value, `None` when exact
    pub fn scale(&self) -> Option<u32> {
        self.limited.then_some(self.scale)
    }

    pub fn is_zero(&self) -> bool {
        self.unscaled.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.unscaled.is_negative()
    }

    /// True when the value has no fractional digits
    pub fn is_integer(&self) -> bool {
        self.exponent >= 0 || self.unscaled.is_zero()
    }

    /// The same value with limitedness dropped
    pub fn to_exact(&self) -> Self {
        Self::exact_parts(self.unscaled.clone(), self.exponent)
    }

    pub fn abs(&self) -> Self {
        Self {
            unscaled: self.unscaled.abs(),
            ..self.clone()
        }
    }

    pub fn compare(&self, other: &Self) -> Ordering {
        let exponent = self.exponent.min(other.exponent);
        rescale(&self.unscaled, self.exponent, exponent)
            .cmp(&rescale(&other.unscaled, other.exponent, exponent))
    }

    /// Division, failing on a zero divisor.
    ///
    /// Inexact quotients are rounded to [`WORKING_PRECISION`] significant
    /// digits. Two limited operands produce a limited quotient at the smaller
    /// precision.
    pub fn checked_div(&self, divisor: &Self) -> Result<Self, UcumError> {
        if divisor.is_zero() {
            return Err(UcumError::Arithmetic(format!("division of {} by zero", self)));
        }
        let (unscaled, exponent) = divide(
            &self.unscaled,
            self.exponent,
            &divisor.unscaled,
            divisor.exponent,
            WORKING_PRECISION,
        );
        Ok(self.multiplicative_result(divisor, unscaled, exponent))
    }

    /// Multiplicative inverse, `1 / self`
    pub fn reciprocal(&self) -> Result<Self, UcumError> {
        Self::one().checked_div(self)
    }

    /// Integer power. Negative exponents divide.
    pub fn pow(&self, exponent: i32) -> Result<Self, UcumError> {
        let magnitude = exponent.unsigned_abs();
        let scaled_exponent = self
            .exponent
            .checked_mul(i64::from(magnitude))
            .ok_or_else(|| UcumError::ExponentOverflow(format!("({})^{}", self, exponent)))?;
        let raised = Self {
            unscaled: num_traits::pow(self.unscaled.clone(), magnitude as usize),
            exponent: scaled_exponent,
            ..Self::zero()
        };
        let raised = if self.limited {
            Self::limited_at_precision(raised.unscaled, raised.exponent, self.precision)
        } else {
            Self::exact_parts(raised.unscaled, raised.exponent)
        };
        if exponent < 0 {
            raised.reciprocal().map(|r| {
                if self.limited {
                    Self::limited_at_precision(r.unscaled, r.exponent, self.precision)
                } else {
                    r
                }
            })
        } else {
            Ok(raised)
        }
    }

    /// Round half-up to the given number of significant digits, exact result
    pub fn round_significant(&self, digits: u32) -> Self {
        let (unscaled, exponent) = round_significant(&self.unscaled, self.exponent, digits.max(1));
        Self::exact_parts(unscaled, exponent)
    }

    /// Carry the limitedness of `source` over to a computed value
    pub(crate) fn with_precision_of(self, source: &Self) -> Self {
        if source.limited {
            Self::limited_at_precision(self.unscaled, self.exponent, source.precision)
        } else {
            self.round_significant(WORKING_PRECISION)
        }
    }

    pub fn to_f64(&self) -> Option<f64> {
        self.to_plain_string().parse::<f64>().ok()
    }

    pub fn to_i64(&self) -> Option<i64> {
        if !self.is_integer() {
            return None;
        }
        rescale(&self.unscaled, self.exponent, 0).to_i64()
    }

    /// Convert to a `rust_decimal::Decimal`, rounding to its 28 digit mantissa.
    pub fn to_rust_decimal(&self) -> Option<rust_decimal::Decimal> {
        rust_decimal::Decimal::from_str_exact(&self.to_plain_string())
            .or_else(|_| {
                let rounded = self.round_significant(28);
                rust_decimal::Decimal::from_str_exact(&rounded.to_plain_string())
            })
            .ok()
    }

    pub(crate) fn parts(&self) -> (&BigInt, i64) {
        (&self.unscaled, self.exponent)
    }

    fn additive_result(&self, other: &Self, unscaled: BigInt, exponent: i64) -> Self {
        match (self.limited, other.limited) {
            (false, false) => Self::exact_parts(unscaled, exponent),
            (true, false) => Self::limited_at_scale(unscaled, exponent, self.scale),
            (false, true) => Self::limited_at_scale(unscaled, exponent, other.scale),
            (true, true) => {
                Self::limited_at_scale(unscaled, exponent, self.scale.min(other.scale))
            }
        }
    }

    fn multiplicative_result(&self, other: &Self, unscaled: BigInt, exponent: i64) -> Self {
        if self.limited && other.limited {
            Self::limited_at_precision(unscaled, exponent, self.precision.min(other.precision))
        } else {
            Self::exact_parts(unscaled, exponent)
        }
    }

    fn to_plain_string(&self) -> String {
        if self.limited {
            plain(&self.unscaled, self.exponent, self.scale)
        } else {
            plain(&self.unscaled, self.exponent, 0)
        }
    }
}

impl Default for Decimal {
    fn default() -> Self {
        Self::zero()
    }
}

impl FromStr for Decimal {
    type Err = UcumError;

    /// Parse a measurement literal.
    ///
    /// `"1.001"` is limited (precision 4, scale 3), `"12"` and `"1e2"` are
    /// exact, and `"2.54e-2"` is limited with the mantissa's significant
    /// digits and a scale grown by the negative exponent.
    fn from_str(literal: &str) -> Result<Self, Self::Err> {
        let parsed = Literal::parse(literal)?;
        if !parsed.fractional {
            return Ok(Self::exact_parts(parsed.unscaled, parsed.exponent));
        }
        let scale = if parsed.shift >= 0 {
            parsed.fraction_digits
        } else {
            parsed.fraction_digits + parsed.shift.unsigned_abs() as u32
        };
        let (unscaled, exponent) = strip(parsed.unscaled, parsed.exponent);
        Ok(Self {
            unscaled,
            exponent,
            limited: true,
            precision: parsed.significant_digits,
            scale,
        })
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Self::exact_parts(BigInt::from(value), 0)
    }
}

impl From<u64> for Decimal {
    fn from(value: u64) -> Self {
        Self::exact_parts(BigInt::from(value), 0)
    }
}

impl From<i32> for Decimal {
    fn from(value: i32) -> Self {
        Self::exact_parts(BigInt::from(value), 0)
    }
}

/// The source scale becomes a limited scale, so `2.50` keeps three
/// significant digits. Integral values are exact.
impl From<rust_decimal::Decimal> for Decimal {
    fn from(value: rust_decimal::Decimal) -> Self {
        let unscaled = BigInt::from(value.mantissa());
        let scale = value.scale();
        if scale == 0 {
            Self::exact_parts(unscaled, 0)
        } else {
            Self::limited_at_scale(unscaled, -(scale as i64), scale)
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_plain_string())
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_plain_string())
    }
}

impl Add for &Decimal {
    type Output = Decimal;

    fn add(self, rhs: &Decimal) -> Decimal {
        let exponent = self.exponent.min(rhs.exponent);
        let sum = rescale(&self.unscaled, self.exponent, exponent)
            + rescale(&rhs.unscaled, rhs.exponent, exponent);
        self.additive_result(rhs, sum, exponent)
    }
}

impl Sub for &Decimal {
    type Output = Decimal;

    fn sub(self, rhs: &Decimal) -> Decimal {
        self + &(-rhs)
    }
}

impl Mul for &Decimal {
    type Output = Decimal;

    fn mul(self, rhs: &Decimal) -> Decimal {
        self.multiplicative_result(
            rhs,
            &self.unscaled * &rhs.unscaled,
            self.exponent + rhs.exponent,
        )
    }
}

impl Neg for &Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal {
            unscaled: -&self.unscaled,
            ..self.clone()
        }
    }
}

macro_rules! forward_owned_binop {
    ($imp:ident, $method:ident) => {
        impl $imp for Decimal {
            type Output = Decimal;

            fn $method(self, rhs: Decimal) -> Decimal {
                (&self).$method(&rhs)
            }
        }
    };
}

forward_owned_binop!(Add, add);
forward_owned_binop!(Sub, sub);
forward_owned_binop!(Mul, mul);

/// Decomposed numeric literal: sign, digits, fractional part, exponent
struct Literal {
    unscaled: BigInt,
    exponent: i64,
    fractional: bool,
    fraction_digits: u32,
    significant_digits: u32,
    shift: i64,
}

impl Literal {
    fn parse(literal: &str) -> Result<Self, UcumError> {
        let invalid = || UcumError::InvalidNumber(literal.to_string());
        let text = literal.trim();
        let (mantissa, shift) = match text.find(['e', 'E']) {
            Some(index) => {
                let shift = text[index + 1..].parse::<i64>().map_err(|_| invalid())?;
                if shift.unsigned_abs() > MAX_LITERAL_EXPONENT as u64 {
                    return Err(invalid());
                }
                (&text[..index], shift)
            }
            None => (text, 0),
        };
        let (negative, mantissa) = match mantissa.as_bytes().first() {
            Some(b'-') => (true, &mantissa[1..]),
            Some(b'+') => (false, &mantissa[1..]),
            _ => (false, mantissa),
        };
        let (integer_part, fraction_part) = match mantissa.split_once('.') {
            Some((integer, fraction)) => (integer, fraction),
            None => (mantissa, ""),
        };
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if integer_part.is_empty() && fraction_part.is_empty()
            || !all_digits(integer_part)
            || !all_digits(fraction_part)
        {
            return Err(invalid());
        }
        let digits = format!("{}{}", integer_part, fraction_part);
        let magnitude = BigInt::from_str(&digits).map_err(|_| invalid())?;
        let unscaled = if negative { -magnitude } else { magnitude };
        let significant = digits.trim_start_matches('0').len().max(1) as u32;
        let exponent = i64::try_from(fraction_part.len())
            .ok()
            .and_then(|digits| shift.checked_sub(digits))
            .ok_or_else(invalid)?;
        Ok(Self {
            unscaled,
            exponent,
            fractional: !fraction_part.is_empty(),
            fraction_digits: fraction_part.len() as u32,
            significant_digits: significant,
            shift,
        })
    }
}

fn ten_pow(n: u64) -> BigInt {
    num_traits::pow(BigInt::from(10u8), n as usize)
}

pub(crate) fn digit_count(value: &BigInt) -> u64 {
    if value.is_zero() {
        1
    } else {
        value.magnitude().to_str_radix(10).len() as u64
    }
}

fn strip(mut unscaled: BigInt, mut exponent: i64) -> (BigInt, i64) {
    if unscaled.is_zero() {
        return (unscaled, 0);
    }
    let ten = BigInt::from(10u8);
    loop {
        let (quotient, remainder) = unscaled.div_rem(&ten);
        if !remainder.is_zero() {
            return (unscaled, exponent);
        }
        unscaled = quotient;
        exponent += 1;
    }
}

/// The unscaled value re-expressed at a smaller exponent
fn rescale(unscaled: &BigInt, exponent: i64, target: i64) -> BigInt {
    if exponent <= target {
        unscaled.clone()
    } else {
        unscaled * ten_pow((exponent - target) as u64)
    }
}

/// Drop digits below `10^target`, rounding half away from zero
fn round_to_exponent(unscaled: &BigInt, exponent: i64, target: i64) -> (BigInt, i64) {
    if exponent >= target {
        return (rescale(unscaled, exponent, target), target);
    }
    let divisor = ten_pow((target - exponent) as u64);
    (divide_half_up(unscaled, &divisor), target)
}

fn round_significant(unscaled: &BigInt, exponent: i64, digits: u32) -> (BigInt, i64) {
    let count = digit_count(unscaled);
    if count <= digits as u64 {
        return (unscaled.clone(), exponent);
    }
    round_to_exponent(unscaled, exponent, exponent + (count - digits as u64) as i64)
}

/// Significant digits of a value displayed down to `10^target`
fn digits_at_exponent(unscaled: &BigInt, exponent: i64, target: i64) -> u32 {
    let scaled = rescale(unscaled, exponent, target);
    if scaled.is_zero() {
        1
    } else {
        digit_count(&scaled) as u32
    }
}

fn divide_half_up(numerator: &BigInt, divisor: &BigInt) -> BigInt {
    let (quotient, remainder) = numerator.abs().div_rem(&divisor.abs());
    let quotient = if remainder * 2 >= divisor.abs() {
        quotient + 1
    } else {
        quotient
    };
    let negative = (numerator.sign() == Sign::Minus) != (divisor.sign() == Sign::Minus);
    if negative {
        -quotient
    } else {
        quotient
    }
}

/// Quotient with at least `digits` significant digits, trailing zeros stripped
fn divide(
    numerator: &BigInt,
    numerator_exponent: i64,
    divisor: &BigInt,
    divisor_exponent: i64,
    digits: u32,
) -> (BigInt, i64) {
    let shift = digits as i64 + digit_count(divisor) as i64 - digit_count(numerator) as i64 + 1;
    let shift = shift.max(0);
    let widened = numerator * ten_pow(shift as u64);
    let quotient = divide_half_up(&widened, divisor);
    let exponent = numerator_exponent - divisor_exponent - shift;
    let (quotient, exponent) = round_significant(&quotient, exponent, digits);
    strip(quotient, exponent)
}

fn plain(unscaled: &BigInt, exponent: i64, min_scale: u32) -> String {
    let target = exponent.min(-(min_scale as i64));
    let scaled = rescale(unscaled, exponent, target);
    let digits = scaled.magnitude().to_str_radix(10);
    let sign = if scaled.is_negative() { "-" } else { "" };
    let scale = (-target).max(0) as usize;
    if scale == 0 {
        return format!("{}{}", sign, digits);
    }
    let padded = if digits.len() <= scale {
        format!("{}{}", "0".repeat(scale - digits.len() + 1), digits)
    } else {
        digits
    };
    let (integer, fraction) = padded.split_at(padded.len() - scale);
    format!("{}{}.{}", sign, integer, fraction)
}
