use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Row, Table};
use serde_json::json;
use ucum::{Canonicalized, Converted, PrintStyle, Relation, Term, UcumError, UcumResult};

pub struct Formatter {
    json: bool,
}

impl Formatter {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn format_valid(&self, expression: &str, term: &Term) -> Result<String> {
        if self.json {
            return to_json(&json!({
                "expression": expression,
                "valid": true,
                "term": term,
                "canonical_rank": term.is_canonical(),
            }));
        }
        Ok(format!("✓ {} is valid\n", term))
    }

    pub fn format_canonical(&self, expression: &str, canonical: &Canonicalized) -> Result<String> {
        if self.json {
            return to_json(&json!({
                "expression": expression,
                "canonical": canonical,
            }));
        }

        let mut table = key_value_table(expression);
        table.add_row(Row::from(vec!["Canonical", canonical.code.as_str()]));
        table.add_row(Row::from(vec!["Magnitude", canonical.magnitude.to_string().as_str()]));
        table.add_row(Row::from(vec!["Dimension", canonical.dimension.to_string().as_str()]));
        if let Some(special) = &canonical.special {
            let function = format!("{} ({} {})", special.name, special.value, special.unit);
            table.add_row(Row::from(vec!["Function", function.as_str()]));
            if !canonical.cf_prefix.compare(&ucum::Decimal::one()).is_eq() {
                table.add_row(Row::from(vec!["Prefix factor", canonical.cf_prefix.to_string().as_str()]));
            }
        }
        Ok(format!("{}\n", table))
    }

    pub fn format_conversion(&self, converted: &Converted) -> Result<String> {
        if self.json {
            return to_json(converted);
        }
        Ok(format!(
            "{} {} = {} {}\n",
            converted.factor, converted.from, converted.value, converted.to
        ))
    }

    pub fn format_printed(&self, style: PrintStyle, printed: &str) -> Result<String> {
        if self.json {
            return to_json(&json!({ "style": style, "printed": printed }));
        }
        Ok(format!("{}\n", printed))
    }

    pub fn format_relation(&self, left: &str, right: &str, relation: &Relation) -> Result<String> {
        if self.json {
            return to_json(&json!({ "left": left, "right": right, "result": relation }));
        }
        Ok(format!("{} and {}: {}\n", left, right, relation))
    }

    pub fn format_batch(&self, expressions: &[&str], results: &[UcumResult<Term>]) -> Result<String> {
        if self.json {
            let rows: Vec<_> = expressions
                .iter()
                .zip(results)
                .map(|(expression, result)| match result {
                    Ok(term) => json!({ "expression": expression, "valid": true, "term": term }),
                    Err(e) => json!({
                        "expression": expression,
                        "valid": false,
                        "kind": e.kind(),
                        "error": e.to_string(),
                    }),
                })
                .collect();
            return to_json(&rows);
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("Expression").set_alignment(CellAlignment::Left),
            Cell::new("Result").set_alignment(CellAlignment::Left),
        ]));
        for (expression, result) in expressions.iter().zip(results) {
            table.add_row(Row::from(vec![expression.to_string(), describe(result)]));
        }
        Ok(format!("{}\n", table))
    }
}

fn key_value_table(expression: &str) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(Row::from(vec![
        Cell::new("Expression").set_alignment(CellAlignment::Left),
        Cell::new(expression).set_alignment(CellAlignment::Left),
    ]));
    table
}

fn describe(result: &Result<Term, UcumError>) -> String {
    match result {
        Ok(_) => "✓ valid".to_string(),
        Err(e) => format!("✗ {}", e),
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(format!("{}\n", serde_json::to_string_pretty(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ucum::Engine;

    #[test]
    fn test_conversion_line() {
        let engine = Engine::new();
        let from = engine.validate("[in_i]").unwrap();
        let to = engine.validate("cm").unwrap();
        let converted = engine.convert(&ucum::Decimal::one(), &from, &to).unwrap();
        let text = Formatter::new(false).format_conversion(&converted).unwrap();
        assert_eq!(text, "1 [in_i] = 2.54 cm\n");
    }

    #[test]
    fn test_batch_json() {
        let engine = Engine::new();
        let expressions = vec!["m", "foo"];
        let results = engine.validate_batch(&expressions);
        let text = Formatter::new(true).format_batch(&expressions, &results).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["valid"], true);
        assert_eq!(value[1]["kind"], "UnresolvedSymbol");
    }
}
