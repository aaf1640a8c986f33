//! CLI output formatting.

use std::fmt::Write;

use colored::Colorize;
use serde_json::Value;

const INDENT: &str = "  ";

/// Prints JSON with syntax highlighting.
///
/// Keys are cyan, strings green, numbers yellow, booleans and null magenta.
pub fn print_highlighted_json(value: &Value) { println!("{}", highlight_json(value)); }

/// Pretty-prints `value` with ANSI colors.
#[must_use]
pub fn highlight_json(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0);
    out
}

fn quoted(text: &str) -> String { Value::String(text.to_string()).to_string() }

fn write_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Null => out.push_str(&"null".magenta().to_string()),
        Value::Bool(flag) => out.push_str(&flag.to_string().magenta().to_string()),
        Value::Number(number) => out.push_str(&number.to_string().yellow().to_string()),
        Value::String(text) => out.push_str(&quoted(text).green().to_string()),
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Object(fields) if fields.is_empty() => out.push_str("{}"),
        Value::Array(items) => {
            out.push_str(&"[".bold().to_string());
            for (i, item) in items.iter().enumerate() {
                let _ = write!(out, "\n{}", INDENT.repeat(depth + 1));
                write_value(out, item, depth + 1);
                if i + 1 < items.len() {
                    out.push(',');
                }
            }
            let _ = write!(out, "\n{}{}", INDENT.repeat(depth), "]".bold());
        }
        Value::Object(fields) => {
            out.push_str(&"{".bold().to_string());
            for (i, (key, field)) in fields.iter().enumerate() {
                let _ = write!(out, "\n{}{}: ", INDENT.repeat(depth + 1), quoted(key).cyan());
                write_value(out, field, depth + 1);
                if i + 1 < fields.len() {
                    out.push(',');
                }
            }
            let _ = write!(out, "\n{}{}", INDENT.repeat(depth), "}".bold());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_output_matches_pretty_json() {
        colored::control::set_override(false);

        let value = serde_json::json!({
            "gif": ["FiestaParrot", "say \"hi\""],
            "frames": 10,
            "fellBack": false,
            "offset": null,
            "empty": []
        });

        assert_eq!(highlight_json(&value), serde_json::to_string_pretty(&value).unwrap());
    }
}
