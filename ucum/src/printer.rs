//! Structural printers. Printing never computes anything numeric.

use crate::registry::Prefix;
use crate::term::{Component, Operator, TermNode, UnitNode, UnitSymbol};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrintStyle {
    /// Case-sensitive UCUM syntax, reparses to the same term
    #[default]
    Ucum,
    /// Print symbols with `·` and superscript exponents
    Pretty,
    /// Input syntax understood by WolframAlpha
    WolframAlpha,
    /// Full unit names
    Expressive,
}

impl PrintStyle {
    pub fn print<D: UnitSymbol>(&self, term: &TermNode<D>) -> String {
        match self {
            PrintStyle::Ucum => UcumPrinter.print(term),
            PrintStyle::Pretty => PrettyPrinter.print(term),
            PrintStyle::WolframAlpha => WolframAlphaPrinter.print(term),
            PrintStyle::Expressive => ExpressivePrinter.print(term),
        }
    }
}

impl FromStr for PrintStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ucum" => Ok(PrintStyle::Ucum),
            "pretty" => Ok(PrintStyle::Pretty),
            "wolfram" | "wolframalpha" | "wolfram_alpha" => Ok(PrintStyle::WolframAlpha),
            "expressive" => Ok(PrintStyle::Expressive),
            other => Err(format!("unknown print style '{}'", other)),
        }
    }
}

/// A walk over the term tree. The hooks default to UCUM syntax; styles
/// override the pieces that differ.
pub trait Printer {
    fn unit(&self, code: &str, _name: &str, _symbol: Option<&str>) -> String {
        code.to_string()
    }

    fn prefix(&self, prefix: &Prefix) -> String {
        prefix.code.clone()
    }

    fn exponent(&self, exponent: i32) -> String {
        exponent.to_string()
    }

    fn operator(&self, op: Operator) -> &'static str {
        match op {
            Operator::Mul => ".",
            Operator::Div => "/",
        }
    }

    fn annotation(&self, text: &str) -> String {
        format!("{{{}}}", text)
    }

    fn unary_div(&self, inner: String) -> String {
        format!("/{}", inner)
    }

    fn parens(&self, inner: String) -> String {
        format!("({})", inner)
    }

    fn print<D: UnitSymbol>(&self, term: &TermNode<D>) -> String
    where
        Self: Sized,
    {
        match term {
            TermNode::Component(component) => self.print_component(component),
            TermNode::Annot(inner, text) => format!("{}{}", self.print(inner), self.annotation(text)),
            TermNode::AnnotOnly(text) => self.annotation(text),
            TermNode::Paren(inner) => self.parens(self.print(inner)),
            TermNode::UnaryDiv(inner) => self.unary_div(self.print(inner)),
            TermNode::Binary(left, op, right) => {
                format!("{}{}{}", self.print(left), self.operator(*op), self.print(right))
            }
        }
    }

    fn print_component<D: UnitSymbol>(&self, component: &Component<D>) -> String
    where
        Self: Sized,
    {
        let unit = match component.unit() {
            UnitNode::Integer(n) => n.to_string(),
            UnitNode::NoPrefix(unit) => self.unit(unit.code(), unit.name(), unit.print_symbol()),
            UnitNode::Prefixed(prefix, unit) => format!(
                "{}{}",
                self.prefix(prefix),
                self.unit(unit.code(), unit.name(), unit.print_symbol())
            ),
        };
        match component {
            Component::NoExponent(_) => unit,
            Component::Exponent(_, exponent) => format!("{}{}", unit, self.exponent(*exponent)),
        }
    }
}

pub struct UcumPrinter;

impl Printer for UcumPrinter {}

pub struct PrettyPrinter;

impl Printer for PrettyPrinter {
    fn unit(&self, code: &str, _name: &str, symbol: Option<&str>) -> String {
        symbol.unwrap_or(code).to_string()
    }

    fn exponent(&self, exponent: i32) -> String {
        exponent
            .to_string()
            .chars()
            .map(|c| match c {
                '-' => '⁻',
                '0' => '⁰',
                '1' => '¹',
                '2' => '²',
                '3' => '³',
                '4' => '⁴',
                '5' => '⁵',
                '6' => '⁶',
                '7' => '⁷',
                '8' => '⁸',
                '9' => '⁹',
                other => other,
            })
            .collect()
    }

    fn operator(&self, op: Operator) -> &'static str {
        match op {
            Operator::Mul => "·",
            Operator::Div => "/",
        }
    }
}

pub struct WolframAlphaPrinter;

impl Printer for WolframAlphaPrinter {
    fn unit(&self, code: &str, _name: &str, symbol: Option<&str>) -> String {
        symbol.unwrap_or(code).to_string()
    }

    fn exponent(&self, exponent: i32) -> String {
        if exponent < 0 {
            format!("^({})", exponent)
        } else {
            format!("^{}", exponent)
        }
    }

    fn operator(&self, op: Operator) -> &'static str {
        match op {
            Operator::Mul => " * ",
            Operator::Div => " / ",
        }
    }

    fn annotation(&self, _text: &str) -> String {
        String::new()
    }

    fn unary_div(&self, inner: String) -> String {
        format!("1 / {}", inner)
    }
}

pub struct ExpressivePrinter;

impl Printer for ExpressivePrinter {
    fn unit(&self, _code: &str, name: &str, _symbol: Option<&str>) -> String {
        name.to_string()
    }

    fn prefix(&self, prefix: &Prefix) -> String {
        prefix.name.clone()
    }

    fn exponent(&self, exponent: i32) -> String {
        format!("^{}", exponent)
    }

    fn operator(&self, op: Operator) -> &'static str {
        match op {
            Operator::Mul => " · ",
            Operator::Div => " per ",
        }
    }

    fn annotation(&self, text: &str) -> String {
        format!(" ({})", text)
    }

    fn unary_div(&self, inner: String) -> String {
        format!("per {}", inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_names_parse() {
        assert_eq!("pretty".parse::<PrintStyle>(), Ok(PrintStyle::Pretty));
        assert_eq!("WolframAlpha".parse::<PrintStyle>(), Ok(PrintStyle::WolframAlpha));
        assert!("fancy".parse::<PrintStyle>().is_err());
    }

    #[test]
    fn test_superscript_exponent() {
        assert_eq!(PrettyPrinter.exponent(-12), "⁻¹²");
        assert_eq!(WolframAlphaPrinter.exponent(-2), "^(-2)");
        assert_eq!(WolframAlphaPrinter.exponent(3), "^3");
    }
}
