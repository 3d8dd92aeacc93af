//! Explain command implementation.
//!
//! Parses a query and field catalog and reports how each rule will be
//! evaluated: the normalized expression, each field's resolved type, and
//! anything the lenient compiler would silently accept.

use qq_predicate::{
    compile_with, CompileOptions, FieldCatalog, QueryNode, QueryParser, SemanticType,
};

use super::{builtin_catalog, CommandContext, Result};
use crate::output::{format_explain_json, format_explain_table};

/// Options for the explain command.
#[derive(Debug)]
pub struct ExplainOptions {
    /// Query tree as JSON.
    pub query: String,
    /// Field catalog as JSON; the table's built-in catalog when absent.
    pub fields: Option<String>,
    /// Table whose built-in catalog is used.
    pub table: String,
}

/// How a single rule will be evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleExplanation {
    pub field: String,
    pub operator: String,
    pub semantic_type: SemanticType,
    pub in_catalog: bool,
    pub known_operator: bool,
    pub suggestion: Option<String>,
}

/// Full explanation of a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Explanation {
    pub expression: String,
    pub rule_count: usize,
    pub rules: Vec<RuleExplanation>,
    /// Present when strict compilation would reject the query.
    pub strict_error: Option<String>,
}

/// Builds the explanation for a parsed tree.
pub fn explain(tree: &QueryNode, catalog: &FieldCatalog) -> Explanation {
    let mut rules = Vec::new();
    tree.for_each_rule(&mut |rule| {
        rules.push(RuleExplanation {
            field: rule.field.clone(),
            operator: rule.operator.as_str().to_string(),
            semantic_type: catalog.resolve(&rule.field),
            in_catalog: catalog.get(&rule.field).is_some(),
            known_operator: rule.operator.is_known(),
            suggestion: catalog.suggest(&rule.field).map(str::to_string),
        });
    });

    let strict_error = compile_with(tree, catalog, CompileOptions::strict())
        .err()
        .map(|e| e.to_string());

    Explanation {
        expression: tree.to_string(),
        rule_count: tree.rule_count(),
        rules,
        strict_error,
    }
}

/// Executes the explain command.
///
/// # Errors
///
/// Returns an error if the query or field catalog is malformed, or if the
/// table has no built-in catalog and no `--fields` was given.
pub fn execute(ctx: &CommandContext, opts: &ExplainOptions) -> Result<()> {
    let tree = QueryParser::parse(&opts.query)?;
    let catalog = match &opts.fields {
        Some(fields) => QueryParser::parse_fields(fields)?,
        None => builtin_catalog(&opts.table)?,
    };

    let explanation = explain(&tree, &catalog);

    if ctx.json_output {
        println!("{}", format_explain_json(&explanation)?);
    } else if !ctx.quiet {
        print!("{}", format_explain_table(&explanation, ctx.use_colors));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qq_store::schema::catalog_for;

    fn players() -> FieldCatalog {
        catalog_for("players").unwrap()
    }

    #[test]
    fn test_explain_resolves_types() {
        let tree = QueryParser::parse(
            r#"{"combinator": "or", "rules": [
                {"field": "totalScore", "operator": ">", "value": "500"},
                {"field": "isActive", "operator": "=", "value": "true"}
            ]}"#,
        )
        .unwrap();

        let explanation = explain(&tree, &players());
        assert_eq!(explanation.rule_count, 2);
        assert_eq!(explanation.rules[0].semantic_type, SemanticType::Number);
        assert_eq!(explanation.rules[1].semantic_type, SemanticType::Boolean);
        assert!(explanation.rules.iter().all(|r| r.in_catalog && r.known_operator));
        assert!(explanation.strict_error.is_none());
        assert!(explanation.expression.contains(" or "));
    }

    #[test]
    fn test_explain_flags_typo_field() {
        let tree =
            QueryParser::parse(r#"{"field": "totalScor", "operator": ">", "value": "1"}"#).unwrap();
        let explanation = explain(&tree, &players());
        let rule = &explanation.rules[0];
        assert!(!rule.in_catalog);
        assert_eq!(rule.semantic_type, SemanticType::Text);
        assert_eq!(rule.suggestion.as_deref(), Some("totalScore"));
    }

    #[test]
    fn test_explain_reports_strict_error() {
        let tree =
            QueryParser::parse(r#"{"field": "name", "operator": "like", "value": "A"}"#).unwrap();
        let explanation = explain(&tree, &players());
        assert!(!explanation.rules[0].known_operator);
        assert_eq!(
            explanation.strict_error.as_deref(),
            Some("unknown operator: like")
        );
    }

    #[test]
    fn test_explain_empty_query() {
        let tree = QueryParser::parse(r#"{"combinator": "and", "rules": []}"#).unwrap();
        let explanation = explain(&tree, &players());
        assert_eq!(explanation.rule_count, 0);
        assert!(explanation.rules.is_empty());
        assert_eq!(explanation.expression, "true");
    }
}
