use std::io::{self, BufRead, Write};

use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::error::ApiError;
use crate::views::Confirm;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an API error. Text mode prints only the per-field messages; the
/// summary line is printed by `main` along with every other error.
pub fn output_api_error(output_format: &OutputFormat, err: &ApiError) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = err.to_json();
            response["success"] = json!(false);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            if let Some(fields) = err.field_errors() {
                for (field, message) in fields {
                    eprintln!("  {:<18} {}", field, message);
                }
            }
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(output_format: &OutputFormat, collection_name: &str, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ collection_name: [] }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => "-",
    }
}

/// Truncate for table columns without splitting a character
pub fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut clipped: String = value.chars().take(width.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

/// Read a line from stdin after printing `prompt`
pub fn prompt_line(prompt: &str) -> anyhow::Result<String> {
    eprint!("{}", prompt);
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Use the flag value when given, otherwise ask on stdin
pub fn password_or_prompt(password: Option<String>, prompt: &str) -> anyhow::Result<String> {
    match password {
        Some(password) => Ok(password),
        None => prompt_line(prompt),
    }
}

/// y/N prompt on stdin, skipped entirely with `--yes`
pub struct StdinConfirm {
    pub assume_yes: bool,
}

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        match prompt_line(&format!("{} [y/N] ", prompt)) {
            Ok(answer) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_respects_width() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("a much longer value", 8), "a much …");
    }

    #[test]
    fn dash_for_missing_values() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("  ")), "-");
        assert_eq!(or_dash(Some("Boston")), "Boston");
    }

    #[test]
    fn assume_yes_skips_the_prompt() {
        assert!(StdinConfirm { assume_yes: true }.confirm("Delete?"));
    }
}
