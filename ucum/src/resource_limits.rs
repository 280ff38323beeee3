use crate::error::UcumError;
use crate::UcumResult;

/// Resource limits to bound the work a single expression can cause
///
/// These limits protect against hostile inputs while being generous enough
/// for every unit expression found in practice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLimits {
    /// Maximum expression length in bytes
    /// Real usage: ~20 bytes, Limit: 1KB (50x)
    pub max_expression_length: usize,

    /// Maximum parenthesis nesting depth
    /// Real usage: ~2 levels, Limit: 64 (30x)
    pub max_nesting_depth: usize,

    /// Maximum absolute exponent on a single unit
    /// Real usage: ~4, Limit: 100 (25x)
    pub max_exponent: u32,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_expression_length: 1024,
            max_nesting_depth: 64,
            max_exponent: 100,
        }
    }
}

impl ResourceLimits {
    /// Create a new ResourceLimits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject an expression before it reaches the parser
    pub fn check(&self, input: &str) -> UcumResult<()> {
        if input.len() > self.max_expression_length {
            return Err(UcumError::ResourceLimitExceeded {
                limit_name: "max_expression_length".to_string(),
                limit_value: format!("{} bytes", self.max_expression_length),
                actual_value: format!("{} bytes", input.len()),
            });
        }

        let depth = nesting_depth(input);
        if depth > self.max_nesting_depth {
            return Err(UcumError::ResourceLimitExceeded {
                limit_name: "max_nesting_depth".to_string(),
                limit_value: self.max_nesting_depth.to_string(),
                actual_value: depth.to_string(),
            });
        }
        Ok(())
    }

    /// Reject exponents whose powers would grow magnitudes without bound
    pub fn check_exponent(&self, exponent: i32) -> UcumResult<()> {
        if exponent.unsigned_abs() > self.max_exponent {
            return Err(UcumError::ResourceLimitExceeded {
                limit_name: "max_exponent".to_string(),
                limit_value: self.max_exponent.to_string(),
                actual_value: exponent.to_string(),
            });
        }
        Ok(())
    }
}

/// Deepest parenthesis level, ignoring anything inside `[...]` or `{...}`
fn nesting_depth(input: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut closer = None;
    for c in input.chars() {
        match (closer, c) {
            (Some(end), c) if c == end => closer = None,
            (Some(_), _) => {}
            (None, '[') => closer = Some(']'),
            (None, '{') => closer = Some('}'),
            (None, '(') => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            (None, ')') => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nesting_depth() {
        assert_eq!(nesting_depth("m"), 0);
        assert_eq!(nesting_depth("m/(s/(g/C))"), 2);
        assert_eq!(nesting_depth("[m/s2/Hz^(1/2)]"), 0);
        assert_eq!(nesting_depth("{((}"), 0);
    }

    #[test]
    fn test_length_limit() {
        let limits = ResourceLimits {
            max_expression_length: 4,
            ..ResourceLimits::default()
        };
        assert!(limits.check("m.s").is_ok());
        match limits.check("m.s.g") {
            Err(UcumError::ResourceLimitExceeded { limit_name, .. }) => {
                assert_eq!(limit_name, "max_expression_length")
            }
            other => panic!("expected limit error, got {:?}", other),
        }
    }

    #[test]
    fn test_depth_limit() {
        let limits = ResourceLimits {
            max_nesting_depth: 2,
            ..ResourceLimits::default()
        };
        assert!(limits.check("((m))").is_ok());
        assert!(limits.check("(((m)))").is_err());
    }

    #[test]
    fn test_exponent_limit() {
        let limits = ResourceLimits::default();
        assert!(limits.check_exponent(100).is_ok());
        assert!(limits.check_exponent(-100).is_ok());
        assert!(limits.check_exponent(101).is_err());
        match limits.check_exponent(i32::MIN) {
            Err(UcumError::ResourceLimitExceeded { limit_name, actual_value, .. }) => {
                assert_eq!(limit_name, "max_exponent");
                assert_eq!(actual_value, "-2147483648");
            }
            other => panic!("expected limit error, got {:?}", other),
        }
    }
}
