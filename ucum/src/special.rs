//! Conversion functions of special units.
//!
//! A special unit relates to its base form through a non-linear function
//! instead of a factor. Each function converts between a value in the special
//! unit and a value in the unit it is defined on, e.g. `Cel` and `K`.

use crate::decimal::{math, Decimal};
use crate::error::UcumError;
use crate::UcumResult;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A pair of mutually inverse functions
pub trait ConversionFunction: fmt::Debug + Send + Sync {
    /// Canonical value to a value in the special unit
    fn from_canonical(&self, value: &Decimal) -> UcumResult<Decimal>;

    /// Value in the special unit to a canonical value
    fn to_canonical(&self, value: &Decimal) -> UcumResult<Decimal>;
}

/// Named table of conversion functions
#[derive(Debug, Clone)]
pub struct SpecialFunctions {
    functions: HashMap<String, Arc<dyn ConversionFunction>>,
}

impl Default for SpecialFunctions {
    fn default() -> Self {
        Self::standard()
    }
}

impl SpecialFunctions {
    pub fn empty() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Every function the bundled registry refers to
    pub fn standard() -> Self {
        let mut table = Self::empty();
        table.register("Cel", Shift::new("273.15"));
        table.register("degF", Shift::new("459.67"));
        table.register("degRe", Shift::new("218.52"));
        table.register("tanTimes100", TanTimes100);
        table.register("100tan", TanTimes100);
        table.register("pH", NegativeLog::new(10));
        table.register("hpX", NegativeLog::new(10));
        table.register("hpC", NegativeLog::new(100));
        table.register("hpM", NegativeLog::new(1_000));
        table.register("hpQ", NegativeLog::new(50_000));
        table.register("ln", NaturalLog);
        table.register("lg", Log::new(10, 1));
        table.register("lgTimes2", Log::new(10, 2));
        table.register("ld", Log::new(2, 1));
        table.register("sqrt", SquareRoot);
        table
    }

    /// Add or replace the function stored under `name`
    pub fn register(&mut self, name: impl Into<String>, function: impl ConversionFunction + 'static) {
        self.functions.insert(name.into(), Arc::new(function));
    }

    pub fn lookup(&self, name: &str) -> UcumResult<Arc<dyn ConversionFunction>> {
        self.functions
            .get(name)
            .cloned()
            .ok_or_else(|| UcumError::UnknownFunction(name.to_string()))
    }
}

/// `x + offset`, exact
#[derive(Debug)]
pub struct Shift {
    offset: Decimal,
}

impl Shift {
    fn new(offset: &str) -> Self {
        Self {
            offset: Decimal::exact(offset).unwrap_or_default(),
        }
    }
}

impl ConversionFunction for Shift {
    fn from_canonical(&self, value: &Decimal) -> UcumResult<Decimal> {
        Ok(value - &self.offset)
    }

    fn to_canonical(&self, value: &Decimal) -> UcumResult<Decimal> {
        Ok(value + &self.offset)
    }
}

/// `100 tan(x)`, used for slopes and prism diopters
#[derive(Debug)]
pub struct TanTimes100;

impl ConversionFunction for TanTimes100 {
    fn from_canonical(&self, value: &Decimal) -> UcumResult<Decimal> {
        let tan = math::tan(value)?;
        Ok((&tan * &Decimal::from(100)).with_precision_of(value))
    }

    fn to_canonical(&self, value: &Decimal) -> UcumResult<Decimal> {
        let scaled = value.checked_div(&Decimal::from(100))?;
        Ok(math::atan(&scaled).with_precision_of(value))
    }
}

/// `-log_base(x)`, pH and homeopathic potencies
#[derive(Debug)]
pub struct NegativeLog {
    base: Decimal,
}

impl NegativeLog {
    fn new(base: i64) -> Self {
        Self {
            base: Decimal::from(base),
        }
    }
}

impl ConversionFunction for NegativeLog {
    fn from_canonical(&self, value: &Decimal) -> UcumResult<Decimal> {
        let log = math::log(value, &self.base)?;
        Ok((-&log).with_precision_of(value))
    }

    fn to_canonical(&self, value: &Decimal) -> UcumResult<Decimal> {
        Ok(math::power(&self.base, &-value)?.with_precision_of(value))
    }
}

#[derive(Debug)]
pub struct NaturalLog;

impl ConversionFunction for NaturalLog {
    fn from_canonical(&self, value: &Decimal) -> UcumResult<Decimal> {
        Ok(math::ln(value)?.with_precision_of(value))
    }

    fn to_canonical(&self, value: &Decimal) -> UcumResult<Decimal> {
        Ok(math::exp(value)?.with_precision_of(value))
    }
}

/// `factor · log_base(x)`, the level units bel and bit
#[derive(Debug)]
pub struct Log {
    base: Decimal,
    factor: Decimal,
}

impl Log {
    fn new(base: i64, factor: i64) -> Self {
        Self {
            base: Decimal::from(base),
            factor: Decimal::from(factor),
        }
    }
}

impl ConversionFunction for Log {
    fn from_canonical(&self, value: &Decimal) -> UcumResult<Decimal> {
        let log = math::log(value, &self.base)?;
        Ok((&log * &self.factor).with_precision_of(value))
    }

    fn to_canonical(&self, value: &Decimal) -> UcumResult<Decimal> {
        let exponent = value.checked_div(&self.factor)?;
        Ok(math::power(&self.base, &exponent)?.with_precision_of(value))
    }
}

#[derive(Debug)]
pub struct SquareRoot;

impl ConversionFunction for SquareRoot {
    fn from_canonical(&self, value: &Decimal) -> UcumResult<Decimal> {
        Ok(math::sqrt(value)?.with_precision_of(value))
    }

    fn to_canonical(&self, value: &Decimal) -> UcumResult<Decimal> {
        Ok((value * value).with_precision_of(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn close(a: &Decimal, b: &Decimal, digits: u32) -> bool {
        a.round_significant(digits) == b.round_significant(digits)
    }

    #[test]
    fn test_unknown_function() {
        let table = SpecialFunctions::standard();
        assert!(matches!(table.lookup("nope"), Err(UcumError::UnknownFunction(_))));
    }

    #[test]
    fn test_celsius_is_exact() {
        let cel = SpecialFunctions::standard().lookup("Cel").unwrap();
        assert_eq!(cel.to_canonical(&Decimal::from(1)).unwrap().to_string(), "274.15");
        assert_eq!(cel.from_canonical(&d("274.15")).unwrap().to_string(), "1.00");
        assert_eq!(cel.to_canonical(&Decimal::from(-273)).unwrap().to_string(), "0.15");
    }

    #[test]
    fn test_fahrenheit_offset() {
        let f = SpecialFunctions::standard().lookup("degF").unwrap();
        assert_eq!(f.to_canonical(&Decimal::from(32)).unwrap().to_string(), "491.67");
    }

    #[test]
    fn test_ph() {
        let ph = SpecialFunctions::standard().lookup("pH").unwrap();
        let concentration = ph.to_canonical(&Decimal::from(7)).unwrap();
        assert_eq!(concentration.to_string(), "0.0000001");
        let back = ph.from_canonical(&concentration).unwrap();
        assert!(close(&back, &Decimal::from(7), 30));
    }

    #[test]
    fn test_functions_are_inverses() {
        let table = SpecialFunctions::standard();
        let value = Decimal::from(3);
        for name in ["tanTimes100", "hpC", "hpM", "hpQ", "ln", "lg", "lgTimes2", "ld", "sqrt"] {
            let function = table.lookup(name).unwrap();
            let canonical = function.to_canonical(&value).unwrap();
            let back = function.from_canonical(&canonical).unwrap();
            assert!(close(&back, &value, 30), "{} did not round trip: {}", name, back);
        }
    }

    #[test]
    fn test_log_of_non_positive_fails() {
        let lg = SpecialFunctions::standard().lookup("lg").unwrap();
        assert!(matches!(lg.from_canonical(&Decimal::zero()), Err(UcumError::Arithmetic(_))));
        assert!(matches!(lg.from_canonical(&Decimal::from(-1)), Err(UcumError::Arithmetic(_))));
    }

    #[test]
    fn test_binary_log_is_exact_for_powers() {
        let ld = SpecialFunctions::standard().lookup("ld").unwrap();
        assert_eq!(ld.to_canonical(&Decimal::from(10)).unwrap().to_string(), "1024");
    }

    #[test]
    fn test_custom_function_replaces_bundled() {
        #[derive(Debug)]
        struct Identity;
        impl ConversionFunction for Identity {
            fn from_canonical(&self, value: &Decimal) -> UcumResult<Decimal> {
                Ok(value.clone())
            }
            fn to_canonical(&self, value: &Decimal) -> UcumResult<Decimal> {
                Ok(value.clone())
            }
        }

        let mut table = SpecialFunctions::standard();
        table.register("Cel", Identity);
        let cel = table.lookup("Cel").unwrap();
        assert_eq!(cel.to_canonical(&Decimal::from(5)).unwrap().to_string(), "5");
    }
}
