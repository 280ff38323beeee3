//! Hints attached to failed validations.

use crate::registry::Registry;

const MAX_SUGGESTIONS: usize = 5;

/// Explain a common syntax mistake found in `input`, if any
pub fn syntax_hint(input: &str) -> Option<String> {
    if input.chars().any(char::is_whitespace) {
        let fixed: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        return Some(format!("UCUM expressions contain no whitespace, try '{}'", fixed));
    }
    if input.contains('×') || (input.contains('*') && !input.contains("10*")) {
        let fixed = input.replace(['×', '*'], ".");
        return Some(format!("multiplication is written with '.', try '{}'", fixed));
    }
    if input.contains('÷') || input.contains('∕') {
        let fixed = input.replace(['÷', '∕'], "/");
        return Some(format!("division is written with '/', try '{}'", fixed));
    }
    if input.contains('^') && !input.contains("10^") {
        let fixed = input.replace('^', "");
        return Some(format!("exponents follow the unit directly, try '{}'", fixed));
    }
    None
}

/// Registry codes the author of `symbol` may have meant
pub fn suggest_symbols(symbol: &str, registry: &dyn Registry) -> Vec<String> {
    let lower = symbol.to_lowercase();
    let bare = lower.trim_start_matches('[').trim_end_matches(']');

    let mut suggestions: Vec<String> = Vec::new();
    let mut push = |code: &str| {
        if code != symbol && !suggestions.iter().any(|s| s == code) {
            suggestions.push(code.to_string());
        }
    };

    let mut units = registry.units();
    units.sort_by(|a, b| a.code().cmp(b.code()));

    for unit in &units {
        let code = unit.code();
        let code_lower = code.to_lowercase();
        if code_lower == lower {
            push(code);
        }
    }
    for unit in &units {
        if unit.name().eq_ignore_ascii_case(symbol) {
            push(unit.code());
        }
    }
    for unit in &units {
        if unit.print_symbol() == Some(symbol) {
            push(unit.code());
        }
    }
    if !symbol.starts_with('[') {
        for unit in &units {
            let code = unit.code();
            if code.starts_with('[') && code[1..].trim_end_matches(']').to_lowercase() == bare {
                push(code);
            }
        }
    }

    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::EssenceRegistry;

    #[test]
    fn test_whitespace_hint() {
        let hint = syntax_hint("m / s").unwrap();
        assert!(hint.contains("'m/s'"));
    }

    #[test]
    fn test_foreign_operator_hints() {
        assert!(syntax_hint("m*s").unwrap().contains("'m.s'"));
        assert!(syntax_hint("m×s").unwrap().contains("'m.s'"));
        assert!(syntax_hint("m÷s").unwrap().contains("'m/s'"));
        assert!(syntax_hint("m^2").unwrap().contains("'m2'"));
        assert_eq!(syntax_hint("10*3.m"), None);
        assert_eq!(syntax_hint("m/s"), None);
    }

    #[test]
    fn test_case_insensitive_code() {
        let registry = EssenceRegistry::shared();
        let suggestions = suggest_symbols("PA", registry.as_ref());
        assert!(suggestions.contains(&"Pa".to_string()));
    }

    #[test]
    fn test_name_and_bracketless_code() {
        let registry = EssenceRegistry::shared();
        assert!(suggest_symbols("newton", registry.as_ref()).contains(&"N".to_string()));
        assert!(suggest_symbols("in_i", registry.as_ref()).contains(&"[in_i]".to_string()));
        assert!(suggest_symbols("°C", registry.as_ref()).contains(&"Cel".to_string()));
    }
}
