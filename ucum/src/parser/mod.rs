use crate::config::FeatureFlags;
use crate::error::UcumError;
use crate::feedback;
use crate::registry::Registry;
use crate::resource_limits::ResourceLimits;
use crate::term::{AnnotationStage, CombineTermBuilder, SoloTermBuilder, Term, TermStage};
use crate::UcumResult;
use pest::error::InputLocation;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

pub mod units;

#[derive(Parser)]
#[grammar = "src/parser/ucum.pest"]
pub struct UcumParser;

/// Parse a UCUM expression into a term, resolving every symbol against `registry`
pub fn parse(
    input: &str,
    registry: &dyn Registry,
    flags: &FeatureFlags,
    limits: &ResourceLimits,
) -> UcumResult<Term> {
    limits.check(input)?;
    parse_unchecked(input, registry, flags, Some(limits))
}

/// Parse the base form of a bundled definition. Definitions are trusted, so
/// every feature flag is enabled and no resource limit applies.
pub(crate) fn parse_definition(base_form: &str, registry: &dyn Registry) -> UcumResult<Term> {
    parse_unchecked(base_form, registry, &FeatureFlags::permissive(), None)
}

fn parse_unchecked(
    input: &str,
    registry: &dyn Registry,
    flags: &FeatureFlags,
    limits: Option<&ResourceLimits>,
) -> UcumResult<Term> {
    let pairs = UcumParser::parse(Rule::main_term, input).map_err(|e| syntax_error(input, e))?;

    let visitor = TermVisitor {
        registry,
        flags,
        limits,
        input,
    };
    let main = pairs
        .into_iter()
        .next()
        .ok_or_else(|| visitor.malformed("empty parse result"))?;
    let expression = main
        .into_inner()
        .find(|pair| pair.as_rule() == Rule::expression)
        .ok_or_else(|| visitor.malformed("missing expression"))?;
    visitor.expression(expression)
}

fn syntax_error(input: &str, error: pest::error::Error<Rule>) -> UcumError {
    let offset = match error.location {
        InputLocation::Pos(pos) => pos,
        InputLocation::Span((start, _)) => start,
    }
    .min(input.len());
    let position = input[..offset].chars().count();
    let message = match input[offset..].chars().next() {
        Some(c) => format!("unexpected '{}'", c),
        None => "unexpected end of expression".to_string(),
    };
    let error = UcumError::syntax(message, input, position);
    match feedback::syntax_hint(input) {
        Some(hint) => error.with_suggestion(hint),
        None => error,
    }
}

/// Builds terms from pest pairs, only ever through the term builders
struct TermVisitor<'a> {
    registry: &'a dyn Registry,
    flags: &'a FeatureFlags,
    limits: Option<&'a ResourceLimits>,
    input: &'a str,
}

impl TermVisitor<'_> {
    fn malformed(&self, what: &str) -> UcumError {
        UcumError::syntax(format!("malformed expression: {}", what), self.input, 0)
    }

    fn expression(&self, pair: Pair<Rule>) -> UcumResult<Term> {
        let mut inner = pair.into_inner().peekable();

        let leading_div = inner.peek().map(|p| p.as_rule()) == Some(Rule::leading_div);
        if leading_div {
            inner.next();
        }

        let first = inner.next().ok_or_else(|| self.malformed("missing operand"))?;
        let mut term = self.operand(first)?;
        if leading_div {
            term = CombineTermBuilder::unary_div(term).as_term();
        }

        while let Some(operator) = inner.next() {
            let right = inner
                .next()
                .ok_or_else(|| self.malformed("operator without right operand"))?;
            let right = self.operand(right)?;
            let stage = CombineTermBuilder::left(term);
            term = match operator.as_str() {
                "/" => stage.divide_by(right),
                _ => stage.multiply_by(right),
            }
            .as_term();
        }

        Ok(term)
    }

    fn operand(&self, pair: Pair<Rule>) -> UcumResult<Term> {
        let text = pair.as_str();
        let mut inner = pair.into_inner();
        let first = inner.next().ok_or_else(|| self.malformed("empty operand"))?;

        if first.as_rule() == Rule::annotation {
            return Ok(SoloTermBuilder::annotation_only(self.annotation(first)?).as_term());
        }

        let annotation = inner.next().map(|p| self.annotation(p)).transpose()?;

        match first.as_rule() {
            Rule::paren_term => {
                let expression = first
                    .into_inner()
                    .next()
                    .ok_or_else(|| self.malformed("empty parentheses"))?;
                let stage = TermStage::from(self.expression(expression)?).with_parens();
                let stage = match annotation {
                    Some(_) if !self.flags.annotation_after_parens => {
                        return Err(UcumError::AnnotationAfterParens(text.to_string()))
                    }
                    Some(annotation) => stage.annotate(annotation),
                    None => stage,
                };
                Ok(stage.as_term())
            }
            Rule::component => {
                let stage = self.component(first)?;
                let stage = match annotation {
                    Some(annotation) => stage.with_annotation(annotation),
                    None => stage.no_annotation(),
                };
                Ok(stage.as_term())
            }
            _ => Err(self.malformed("unexpected operand")),
        }
    }

    fn component(&self, pair: Pair<Rule>) -> UcumResult<AnnotationStage> {
        let inner = pair
            .into_inner()
            .next()
            .ok_or_else(|| self.malformed("empty component"))?;

        match inner.as_rule() {
            Rule::factor => {
                let value: u64 = inner
                    .as_str()
                    .parse()
                    .map_err(|_| UcumError::InvalidNumber(inner.as_str().to_string()))?;
                Ok(SoloTermBuilder::integer(value).no_exponent())
            }
            Rule::annotatable => {
                let mut parts = inner.into_inner();
                let symbol = parts
                    .next()
                    .ok_or_else(|| self.malformed("missing unit symbol"))?;
                let (unit, prefix) = self.resolve(&symbol)?;

                let stage = SoloTermBuilder::unit(unit);
                let stage = match prefix {
                    Some(prefix) => stage.with_prefix(prefix),
                    None => stage.no_prefix(),
                };
                match parts.next() {
                    Some(exponent) => Ok(stage.with_exponent(self.exponent(exponent.as_str())?)),
                    None => Ok(stage.no_exponent()),
                }
            }
            _ => Err(self.malformed("unexpected component")),
        }
    }

    fn resolve(&self, symbol: &Pair<Rule>) -> UcumResult<units::Resolved> {
        units::resolve(symbol.as_str(), self.registry, self.flags).map_err(|error| {
            // `m*s` and `m^2` lex as one symbol; report them as syntax slips
            match (&error, feedback::syntax_hint(symbol.as_str())) {
                (UcumError::UnresolvedSymbol { .. }, Some(_)) => {
                    let position = self.input[..symbol.as_span().start()].chars().count();
                    let error = UcumError::syntax(
                        format!("unexpected symbol '{}'", symbol.as_str()),
                        self.input,
                        position,
                    );
                    match feedback::syntax_hint(self.input) {
                        Some(hint) => error.with_suggestion(hint),
                        None => error,
                    }
                }
                _ => error,
            }
        })
    }

    fn exponent(&self, text: &str) -> UcumResult<i32> {
        let exponent = parse_exponent(text)?;
        if let Some(limits) = self.limits {
            limits.check_exponent(exponent)?;
        }
        Ok(exponent)
    }

    fn annotation(&self, pair: Pair<Rule>) -> UcumResult<String> {
        let text = pair
            .into_inner()
            .next()
            .map(|p| p.as_str().to_string())
            .unwrap_or_default();
        if text.chars().all(|c| ('!'..='~').contains(&c) && c != '{' && c != '}') {
            Ok(text)
        } else {
            Err(UcumError::InvalidAnnotation(text))
        }
    }
}

fn parse_exponent(text: &str) -> UcumResult<i32> {
    text.parse::<i32>()
        .map_err(|_| UcumError::ExponentOverflow(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::EssenceRegistry;

    fn parse_default(input: &str) -> UcumResult<Term> {
        parse(
            input,
            EssenceRegistry::shared().as_ref(),
            &FeatureFlags::default(),
            &ResourceLimits::default(),
        )
    }

    #[test]
    fn test_trailing_digits_are_the_exponent() {
        assert_eq!(parse_default("m2").unwrap().to_string(), "m2");
        assert_eq!(parse_default("[in_i]3").unwrap().to_string(), "[in_i]3");
        assert_eq!(parse_default("10*-5.Pa").unwrap().to_string(), "10*-5.Pa");
    }

    #[test]
    fn test_bracketed_symbols_are_opaque() {
        assert!(parse_default("[m/s2/Hz^(1/2)]").is_ok());
        assert!(parse_default("B[10.nV]").is_ok());
        assert!(parse_default("cal_[15]").is_ok());
    }

    #[test]
    fn test_leading_division_binds_first_operand() {
        let term = parse_default("/s.m").unwrap();
        assert_eq!(term.to_string(), "/s.m");
        match term {
            Term::Canonical(crate::term::TermNode::Binary(left, _, _)) => {
                assert!(matches!(*left, crate::term::TermNode::UnaryDiv(_)))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_rank_follows_symbols() {
        assert!(parse_default("kg.m/s2").unwrap().is_canonical());
        assert!(!parse_default("N").unwrap().is_canonical());
        assert!(parse_default("10.{rbc}").unwrap().is_canonical());
    }

    #[test]
    fn test_syntax_error_position() {
        match parse_default("m/(s") {
            Err(UcumError::Syntax { position, .. }) => assert_eq!(position, 4),
            other => panic!("expected syntax error, got {:?}", other),
        }
        assert!(matches!(parse_default(""), Err(UcumError::Syntax { .. })));
        assert!(matches!(parse_default("m//s"), Err(UcumError::Syntax { .. })));
    }

    #[test]
    fn test_foreign_operators_become_syntax_errors() {
        match parse_default("m*s") {
            Err(UcumError::Syntax { suggestion, .. }) => {
                assert!(suggestion.unwrap().contains("m.s"))
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
        match parse_default("m s") {
            Err(UcumError::Syntax { position, suggestion, .. }) => {
                assert_eq!(position, 1);
                assert!(suggestion.is_some());
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_annotations() {
        assert!(parse_default("{cells}/uL").is_ok());
        assert!(matches!(
            parse_default("{zellen\u{e4}}"),
            Err(UcumError::InvalidAnnotation(_))
        ));
        assert!(matches!(
            parse_default("(m.s){x}"),
            Err(UcumError::AnnotationAfterParens(_))
        ));

        let flags = FeatureFlags {
            annotation_after_parens: true,
            ..FeatureFlags::default()
        };
        let term = parse(
            "(m.s){x}",
            EssenceRegistry::shared().as_ref(),
            &flags,
            &ResourceLimits::default(),
        )
        .unwrap();
        assert_eq!(term.to_string(), "(m.s){x}");
    }

    #[test]
    fn test_exponent_overflow() {
        assert!(matches!(
            parse_default("m99999999999"),
            Err(UcumError::ExponentOverflow(_))
        ));
    }

    #[test]
    fn test_resource_limits_apply_first() {
        let limits = ResourceLimits {
            max_nesting_depth: 1,
            ..ResourceLimits::default()
        };
        let result = parse(
            "((m))",
            EssenceRegistry::shared().as_ref(),
            &FeatureFlags::default(),
            &limits,
        );
        assert!(matches!(result, Err(UcumError::ResourceLimitExceeded { .. })));
    }

    #[test]
    fn test_exponent_limit() {
        assert!(parse_default("m100").is_ok());
        assert!(matches!(
            parse_default("[in_i]2000000"),
            Err(UcumError::ResourceLimitExceeded { .. })
        ));
        assert!(matches!(
            parse_default("s-101"),
            Err(UcumError::ResourceLimitExceeded { .. })
        ));
    }
}
