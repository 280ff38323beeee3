use thiserror::Error;

/// Error types for UCUM validation, canonicalization and conversion.
///
/// Every public operation returns one of these instead of panicking. The enum
/// is `Clone` so failed validations can be memoized next to successful ones.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UcumError {
    /// The input does not follow UCUM syntax
    #[error("{}", syntax_message(.message, .position, .suggestion))]
    Syntax {
        message: String,
        input: String,
        /// Character offset of the failure within `input`
        position: usize,
        suggestion: Option<String>,
    },

    /// A unit or prefix code the registry does not know
    #[error("unresolved symbol '{symbol}'{}", did_you_mean(.suggestions))]
    UnresolvedSymbol {
        symbol: String,
        suggestions: Vec<String>,
    },

    #[error("prefix '{prefix}' is not allowed on non-metric unit '{unit}'")]
    NonMetricPrefix { prefix: String, unit: String },

    #[error("annotation after parentheses is not enabled: '{0}'")]
    AnnotationAfterParens(String),

    #[error("invalid annotation '{{{0}}}': only ASCII characters 33..126 without braces are allowed")]
    InvalidAnnotation(String),

    /// A special unit used with an exponent or inside a division
    #[error("invalid special unit usage: {0}")]
    InvalidSpecialUnitUsage(String),

    #[error("'{from}' is not commensurable with '{to}'")]
    NotCommensurable { from: String, to: String },

    #[error("ambiguous special unit conversion: {0}")]
    AmbiguousSpecialUnitConversion(String),

    #[error("conversion between '{from}' and '{to}' requires a molar mass coefficient")]
    MissingMolarMass { from: String, to: String },

    /// Builder contract violation: a caller defect, not bad input
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    #[error("unknown special unit function '{0}'")]
    UnknownFunction(String),

    /// Arbitrary units have no defined relation to base units
    #[error("'{0}' is an arbitrary unit and cannot be canonicalized")]
    ArbitraryUnit(String),

    #[error("exponent overflow while raising '{0}'")]
    ExponentOverflow(String),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("resource limit exceeded: {limit_name} is {limit_value}, got {actual_value}")]
    ResourceLimitExceeded {
        limit_name: String,
        limit_value: String,
        actual_value: String,
    },
}

impl UcumError {
    /// Create a syntax error at the given character offset
    pub fn syntax(message: impl Into<String>, input: impl Into<String>, position: usize) -> Self {
        Self::Syntax {
            message: message.into(),
            input: input.into(),
            position,
            suggestion: None,
        }
    }

    /// Create an unresolved symbol error without suggestions
    pub fn unresolved(symbol: impl Into<String>) -> Self {
        Self::UnresolvedSymbol {
            symbol: symbol.into(),
            suggestions: Vec::new(),
        }
    }

    /// Attach a human readable hint to a syntax error. Other variants are
    /// returned unchanged.
    pub fn with_suggestion(self, hint: impl Into<String>) -> Self {
        match self {
            Self::Syntax {
                message,
                input,
                position,
                ..
            } => Self::Syntax {
                message,
                input,
                position,
                suggestion: Some(hint.into()),
            },
            other => other,
        }
    }

    /// Short machine-friendly name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Syntax { .. } => "SyntaxError",
            Self::UnresolvedSymbol { .. } => "UnresolvedSymbol",
            Self::NonMetricPrefix { .. } => "NonMetricPrefix",
            Self::AnnotationAfterParens(_) => "AnnotationAfterParens",
            Self::InvalidAnnotation(_) => "InvalidAnnotation",
            Self::InvalidSpecialUnitUsage(_) => "InvalidSpecialUnitUsage",
            Self::NotCommensurable { .. } => "NotCommensurable",
            Self::AmbiguousSpecialUnitConversion(_) => "AmbiguousSpecialUnitConversion",
            Self::MissingMolarMass { .. } => "MissingMolarMass",
            Self::TypeMismatch(_) => "TypeMismatch",
            Self::Arithmetic(_) => "ArithmeticError",
            Self::UnknownFunction(_) => "UnknownFunction",
            Self::ArbitraryUnit(_) => "ArbitraryUnit",
            Self::ExponentOverflow(_) => "ExponentOverflow",
            Self::InvalidNumber(_) => "InvalidNumber",
            Self::ResourceLimitExceeded { .. } => "ResourceLimitExceeded",
        }
    }
}

fn syntax_message(message: &str, position: &usize, suggestion: &Option<String>) -> String {
    match suggestion {
        Some(hint) => format!("syntax error at {}: {} (suggestion: {})", position, message, hint),
        None => format!("syntax error at {}: {}", position, message),
    }
}

fn did_you_mean(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean {}?)", suggestions.join(", "))
    }
}
