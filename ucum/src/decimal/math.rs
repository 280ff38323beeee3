//! Transcendental functions over [`Decimal`].
//!
//! Everything is evaluated in fixed point with `GUARD_DIGITS` fractional
//! digits and narrowed to [`WORKING_PRECISION`] significant digits, so
//! results are reproducible and round trips like `exp(ln(x))` come back
//! exact after narrowing.

use super::{digit_count, ten_pow, Decimal, WORKING_PRECISION};
use crate::error::UcumError;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

const GUARD_DIGITS: u64 = 120;

/// Integer exponents up to this size are evaluated exactly
const MAX_EXACT_POWER: i64 = 10_000;

struct Fixed {
    one: BigInt,
}

impl Fixed {
    fn new() -> Self {
        Self {
            one: ten_pow(GUARD_DIGITS),
        }
    }

    fn from_decimal(&self, value: &Decimal) -> BigInt {
        let (unscaled, exponent) = value.parts();
        let shift = exponent + GUARD_DIGITS as i64;
        if shift >= 0 {
            unscaled * ten_pow(shift as u64)
        } else {
            unscaled / ten_pow(shift.unsigned_abs())
        }
    }

    fn to_decimal(&self, value: BigInt) -> Decimal {
        Decimal::exact_parts(value, -(GUARD_DIGITS as i64)).round_significant(WORKING_PRECISION)
    }

    fn mul(&self, a: &BigInt, b: &BigInt) -> BigInt {
        a * b / &self.one
    }

    fn div(&self, a: &BigInt, b: &BigInt) -> BigInt {
        a * &self.one / b
    }

    fn sqrt(&self, a: &BigInt) -> BigInt {
        (a * &self.one).sqrt()
    }

    /// atanh(z) for |z| well below 1
    fn atanh(&self, z: &BigInt) -> BigInt {
        let z2 = self.mul(z, z);
        let mut sum = z.clone();
        let mut power = z.clone();
        let mut k: u64 = 1;
        loop {
            power = self.mul(&power, &z2);
            let term = &power / BigInt::from(2 * k + 1);
            if term.is_zero() {
                return sum;
            }
            sum += term;
            k += 1;
        }
    }

    /// atan(1/n) for integer n > 1
    fn atan_inverse(&self, n: u64) -> BigInt {
        let n2 = BigInt::from(n * n);
        let mut power = &self.one / BigInt::from(n);
        let mut sum = power.clone();
        let mut k: u64 = 1;
        loop {
            power = &power / &n2;
            let term = &power / BigInt::from(2 * k + 1);
            if term.is_zero() {
                return sum;
            }
            if k % 2 == 1 {
                sum -= term;
            } else {
                sum += term;
            }
            k += 1;
        }
    }

    fn ln2(&self) -> BigInt {
        self.atanh(&(&self.one / 3)) * 2
    }

    fn ln10(&self) -> BigInt {
        self.ln2() * 3 + self.atanh(&(&self.one / 9)) * 2
    }

    fn pi(&self) -> BigInt {
        self.atan_inverse(5) * 16 - self.atan_inverse(239) * 4
    }

    fn ln(&self, value: &Decimal) -> Result<BigInt, UcumError> {
        if value.is_zero() || value.is_negative() {
            return Err(UcumError::Arithmetic(format!(
                "logarithm of non-positive value {}",
                value
            )));
        }
        let (unscaled, exponent) = value.parts();
        let digits = digit_count(unscaled) as i64;
        let shift = GUARD_DIGITS as i64 - digits;
        // mantissa in [0.1, 1)
        let mut mantissa = if shift >= 0 {
            unscaled * ten_pow(shift as u64)
        } else {
            unscaled / ten_pow(shift.unsigned_abs())
        };
        let decimal_exponent = exponent + digits;
        let mut binary_exponent: i64 = 0;
        while mantissa < self.one {
            mantissa *= 2;
            binary_exponent -= 1;
        }
        let z = self.div(&(&mantissa - &self.one), &(&mantissa + &self.one));
        Ok(self.atanh(&z) * 2 + self.ln2() * binary_exponent + self.ln10() * decimal_exponent)
    }

    /// e^x for x >= 0
    fn exp(&self, x: &BigInt) -> BigInt {
        let threshold = &self.one / 1000;
        let mut halvings: u32 = 0;
        while (x >> halvings) > threshold {
            halvings += 1;
        }
        let r = x / (BigInt::one() << halvings);
        let mut sum = self.one.clone();
        let mut term = self.one.clone();
        let mut n: u64 = 1;
        loop {
            term = self.mul(&term, &r) / BigInt::from(n);
            if term.is_zero() {
                break;
            }
            sum += &term;
            n += 1;
        }
        for _ in 0..halvings {
            sum = self.mul(&sum, &sum);
        }
        sum
    }

    fn sin_cos(&self, r: &BigInt) -> (BigInt, BigInt) {
        let r2 = self.mul(r, r);
        let mut sin = r.clone();
        let mut term = r.clone();
        let mut n: u64 = 1;
        loop {
            term = -self.mul(&term, &r2) / BigInt::from((2 * n) * (2 * n + 1));
            if term.is_zero() {
                break;
            }
            sin += &term;
            n += 1;
        }
        let mut cos = self.one.clone();
        let mut term = self.one.clone();
        let mut n: u64 = 1;
        loop {
            term = -self.mul(&term, &r2) / BigInt::from((2 * n - 1) * (2 * n));
            if term.is_zero() {
                break;
            }
            cos += &term;
            n += 1;
        }
        (sin, cos)
    }

    fn atan(&self, x: &BigInt) -> BigInt {
        if x.is_negative() {
            return -self.atan(&-x);
        }
        if x > &self.one {
            let half_pi = self.pi() / 2;
            return half_pi - self.atan(&self.div(&self.one, x));
        }
        // halve the angle three times: atan(x) = 2 atan(x / (1 + sqrt(1 + x^2)))
        let mut reduced = x.clone();
        for _ in 0..3 {
            let hypot = self.sqrt(&(&self.one + self.mul(&reduced, &reduced)));
            reduced = self.div(&reduced, &(&self.one + hypot));
        }
        let x2 = self.mul(&reduced, &reduced);
        let mut sum = reduced.clone();
        let mut power = reduced;
        let mut k: u64 = 1;
        loop {
            power = self.mul(&power, &x2);
            let term = &power / BigInt::from(2 * k + 1);
            if term.is_zero() {
                break;
            }
            if k % 2 == 1 {
                sum -= term;
            } else {
                sum += term;
            }
            k += 1;
        }
        sum * 8
    }
}

/// Natural logarithm, failing for non-positive input
pub(crate) fn ln(value: &Decimal) -> Result<Decimal, UcumError> {
    let fixed = Fixed::new();
    let result = fixed.ln(value)?;
    Ok(fixed.to_decimal(result))
}

/// Logarithm to an arbitrary positive base
pub(crate) fn log(value: &Decimal, base: &Decimal) -> Result<Decimal, UcumError> {
    let fixed = Fixed::new();
    let numerator = fixed.ln(value)?;
    let denominator = fixed.ln(base)?;
    if denominator.is_zero() {
        return Err(UcumError::Arithmetic(format!("logarithm to base {}", base)));
    }
    Ok(fixed.to_decimal(fixed.div(&numerator, &denominator)))
}

pub(crate) fn log10(value: &Decimal) -> Result<Decimal, UcumError> {
    let fixed = Fixed::new();
    let numerator = fixed.ln(value)?;
    Ok(fixed.to_decimal(fixed.div(&numerator, &fixed.ln10())))
}

pub(crate) fn log2(value: &Decimal) -> Result<Decimal, UcumError> {
    let fixed = Fixed::new();
    let numerator = fixed.ln(value)?;
    Ok(fixed.to_decimal(fixed.div(&numerator, &fixed.ln2())))
}

pub(crate) fn exp(value: &Decimal) -> Result<Decimal, UcumError> {
    let fixed = Fixed::new();
    let x = fixed.from_decimal(value);
    let result = fixed.to_decimal(fixed.exp(&x.abs()));
    if x.is_negative() {
        result.reciprocal()
    } else {
        Ok(result)
    }
}

/// `base^exponent` for a real exponent. Integral exponents stay exact.
pub(crate) fn power(base: &Decimal, exponent: &Decimal) -> Result<Decimal, UcumError> {
    if let Some(n) = exponent.to_i64().filter(|n| n.abs() <= MAX_EXACT_POWER) {
        return base.to_exact().pow(n as i32);
    }
    if base.is_zero() || base.is_negative() {
        return Err(UcumError::Arithmetic(format!(
            "{} raised to non-integer power {}",
            base, exponent
        )));
    }
    let fixed = Fixed::new();
    let ln_base = fixed.to_decimal(fixed.ln(base)?);
    exp(&(&ln_base * &exponent.to_exact()))
}

pub(crate) fn tan(value: &Decimal) -> Result<Decimal, UcumError> {
    let fixed = Fixed::new();
    let x = fixed.from_decimal(value);
    let pi = fixed.pi();
    // bring x into [-pi/2, pi/2] using the period of tan
    let shifted: BigInt = &x * 2 + &pi;
    let turns = shifted.div_floor(&(&pi * 2));
    let reduced = x - turns * &pi;
    let (sin, cos) = fixed.sin_cos(&reduced);
    if cos.is_zero() {
        return Err(UcumError::Arithmetic(format!("tangent undefined at {}", value)));
    }
    Ok(fixed.to_decimal(fixed.div(&sin, &cos)))
}

pub(crate) fn atan(value: &Decimal) -> Decimal {
    let fixed = Fixed::new();
    let x = fixed.from_decimal(value);
    fixed.to_decimal(fixed.atan(&x))
}

pub(crate) fn sqrt(value: &Decimal) -> Result<Decimal, UcumError> {
    if value.is_negative() {
        return Err(UcumError::Arithmetic(format!("square root of negative value {}", value)));
    }
    if value.is_zero() {
        return Ok(Decimal::zero());
    }
    let (unscaled, exponent) = value.parts();
    let (mut unscaled, mut exponent) = if exponent % 2 != 0 {
        (unscaled * 10, exponent - 1)
    } else {
        (unscaled.clone(), exponent)
    };
    let wanted = 2 * (WORKING_PRECISION as u64 + 10);
    let have = digit_count(&unscaled);
    if have < wanted {
        let pad = (wanted - have + 1) / 2 * 2;
        unscaled *= ten_pow(pad);
        exponent -= pad as i64;
    }
    Ok(Decimal::exact_parts(unscaled.sqrt(), exponent / 2).round_significant(WORKING_PRECISION))
}
