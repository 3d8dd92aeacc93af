//! Common helper functions for output formatting.

use owo_colors::OwoColorize;
use serde_json::Value;

/// Truncates an ID to 8 characters for display.
pub fn truncate_id(id: &str) -> String {
    id.chars().take(8).collect()
}

/// Truncates a string to a maximum number of characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Formats a record value for a table cell.
///
/// Strings are shown without quotes; missing values and nulls are blank.
pub fn format_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Formats a value, coloring booleans when colors are enabled.
pub fn format_cell(value: Option<&Value>, use_colors: bool) -> String {
    let text = format_value(value);
    if !use_colors {
        return text;
    }
    match value {
        Some(Value::Bool(true)) => text.green().to_string(),
        Some(Value::Bool(false)) => text.red().to_string(),
        _ => text,
    }
}

/// Pads `text` to `width` characters, measuring the uncolored text.
///
/// `format!("{:<w$}")` counts ANSI escape bytes, so colored cells are padded
/// by hand.
pub fn pad(text: &str, plain_len: usize, width: usize) -> String {
    let mut out = text.to_string();
    for _ in plain_len..width {
        out.push(' ');
    }
    out
}
