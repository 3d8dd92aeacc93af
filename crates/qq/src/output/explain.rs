//! Explain output formatting.

use owo_colors::OwoColorize;
use serde::Serialize;

use crate::commands::explain::Explanation;

/// JSON output structure for one explained rule.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleOutput<'a> {
    pub field: &'a str,
    pub operator: &'a str,
    #[serde(rename = "type")]
    pub semantic_type: &'a str,
    pub in_catalog: bool,
    pub known_operator: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<&'a str>,
}

/// JSON output structure for the explain command.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainOutput<'a> {
    pub expression: &'a str,
    pub rule_count: usize,
    pub rules: Vec<RuleOutput<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict_error: Option<&'a str>,
}

/// Formats an explanation as JSON.
pub fn format_explain_json(explanation: &Explanation) -> Result<String, serde_json::Error> {
    let output = ExplainOutput {
        expression: &explanation.expression,
        rule_count: explanation.rule_count,
        rules: explanation
            .rules
            .iter()
            .map(|r| RuleOutput {
                field: &r.field,
                operator: &r.operator,
                semantic_type: r.semantic_type.as_str(),
                in_catalog: r.in_catalog,
                known_operator: r.known_operator,
                suggestion: r.suggestion.as_deref(),
            })
            .collect(),
        strict_error: explanation.strict_error.as_deref(),
    };
    serde_json::to_string_pretty(&output)
}

/// Formats an explanation for humans.
pub fn format_explain_table(explanation: &Explanation, use_colors: bool) -> String {
    let mut output = String::new();

    if use_colors {
        output.push_str(&format!("{}\n", "Expression".green().bold()));
    } else {
        output.push_str("Expression\n");
    }
    output.push_str(&format!("  {}\n", explanation.expression));

    if explanation.rules.is_empty() {
        output.push_str("\nNo rules: every record matches.\n");
    } else {
        output.push('\n');
        let header = format!("{:<20} {:<16} {:<8} {}", "Field", "Operator", "Type", "Notes");
        if use_colors {
            output.push_str(&format!("{}\n", header.dimmed()));
        } else {
            output.push_str(&header);
            output.push('\n');
        }

        for rule in &explanation.rules {
            let mut notes = Vec::new();
            if !rule.in_catalog {
                notes.push(match &rule.suggestion {
                    Some(s) => format!("not in catalog (did you mean '{s}'?)"),
                    None => "not in catalog".to_string(),
                });
            }
            if !rule.known_operator {
                notes.push("unknown operator, always matches".to_string());
            }
            let line = format!(
                "{:<20} {:<16} {:<8} {}",
                rule.field,
                rule.operator,
                rule.semantic_type.as_str(),
                notes.join("; ")
            );
            output.push_str(line.trim_end());
            output.push('\n');
        }
    }

    if let Some(error) = &explanation.strict_error {
        let line = format!("Strict mode would reject this query: {error}");
        if use_colors {
            output.push_str(&format!("\n{}\n", line.yellow()));
        } else {
            output.push_str(&format!("\n{line}\n"));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::explain::RuleExplanation;
    use qq_predicate::SemanticType;

    fn explanation() -> Explanation {
        Explanation {
            expression: "(totalScor > \"5\" and name like \"A\")".to_string(),
            rule_count: 2,
            rules: vec![
                RuleExplanation {
                    field: "totalScor".to_string(),
                    operator: ">".to_string(),
                    semantic_type: SemanticType::Text,
                    in_catalog: false,
                    known_operator: true,
                    suggestion: Some("totalScore".to_string()),
                },
                RuleExplanation {
                    field: "name".to_string(),
                    operator: "like".to_string(),
                    semantic_type: SemanticType::Text,
                    in_catalog: true,
                    known_operator: false,
                    suggestion: None,
                },
            ],
            strict_error: Some("unknown operator: like".to_string()),
        }
    }

    #[test]
    fn test_explain_table_notes() {
        let text = format_explain_table(&explanation(), false);
        assert!(text.contains("did you mean 'totalScore'?"));
        assert!(text.contains("unknown operator, always matches"));
        assert!(text.contains("Strict mode would reject this query: unknown operator: like"));
    }

    #[test]
    fn test_explain_json_shape() {
        let json = format_explain_json(&explanation()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["ruleCount"], 2);
        assert_eq!(value["rules"][0]["type"], "text");
        assert_eq!(value["rules"][0]["suggestion"], "totalScore");
        assert!(value["rules"][1].get("suggestion").is_none());
        assert_eq!(value["strictError"], "unknown operator: like");
    }
}
