use ariadne::{Color, Label, Report, ReportKind, Source};
use ucum::UcumError;

const SOURCE_ID: &str = "expression";

/// Format a UcumError with fancy terminal output using Ariadne
pub fn format_error(error: &UcumError) -> String {
    match error {
        UcumError::Syntax {
            message,
            input,
            position,
            suggestion,
        } => {
            let mut output = Vec::new();
            let length = input.chars().count();
            let start = (*position).min(length);
            let end = (start + 1).min(length).max(start);

            let mut report = Report::build(ReportKind::Error, SOURCE_ID, start)
                .with_message(format!("Syntax error: {}", message))
                .with_label(
                    Label::new((SOURCE_ID, start..end))
                        .with_message(message)
                        .with_color(Color::Red),
                );

            if let Some(suggestion) = suggestion {
                report = report.with_help(suggestion);
            }

            match report
                .finish()
                .write((SOURCE_ID, Source::from(input.as_str())), &mut output)
            {
                Ok(_) => String::from_utf8_lossy(&output).to_string(),
                Err(_) => format!("{}", error),
            }
        }
        UcumError::UnresolvedSymbol {
            symbol,
            suggestions,
        } => {
            let mut result = format!("Unresolved symbol: '{}'", symbol);
            if !suggestions.is_empty() {
                result.push_str(&format!("\n  Did you mean: {}", suggestions.join(", ")));
            }
            result
        }
        UcumError::ResourceLimitExceeded {
            limit_name,
            limit_value,
            actual_value,
        } => format!(
            "Resource limit exceeded: {}\n  Limit: {}\n  Actual: {}",
            limit_name, limit_value, actual_value
        ),
        other => format!("{}: {}", other.kind(), other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_shows_hint() {
        let error = UcumError::syntax("unexpected ' '", "m s", 1).with_suggestion("try 'm.s'");
        let text = format_error(&error);
        assert!(text.contains("Syntax error"));
        assert!(text.contains("try 'm.s'"));
    }

    #[test]
    fn test_other_errors_name_their_kind() {
        let error = UcumError::NotCommensurable {
            from: "m".to_string(),
            to: "s".to_string(),
        };
        assert_eq!(format_error(&error), "NotCommensurable: 'm' is not commensurable with 's'");
    }
}
