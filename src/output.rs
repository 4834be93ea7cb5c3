//! Output formatting for comparison results.
//!
//! Both result forms can be printed: the list form (`path: old != new`
//! lines) and the map form (path → old/new pair). Each supports colored
//! terminal output, plain text and JSON.
//!
//! # Examples
//!
//! ```
//! use deepdiff::{compare_as_list, format_list, OutputFormat, OutputOptions};
//!
//! let (diffs, _) = compare_as_list(&42, &43);
//! let output = format_list(&diffs, &OutputFormat::Plain, &OutputOptions::default()).unwrap();
//! assert!(output.contains("42 != 43"));
//! ```

use crate::error::OutputError;
use crate::sink::DiffResult;
use colored::*;
use std::collections::BTreeMap;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Colored terminal output with ANSI escape codes
    Terminal,
    /// JSON representation of the differences
    Json,
    /// Plain text, no colors (suitable for piping)
    Plain,
}

/// Options for controlling output formatting.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    /// Maximum length for displayed values in the map form (truncate if longer)
    pub max_value_length: usize,
    /// Append a summary line to text output
    pub summary: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            max_value_length: 80,
            summary: true,
        }
    }
}

/// Formats list-form differences.
pub fn format_list(
    diffs: &[String],
    format: &OutputFormat,
    options: &OutputOptions,
) -> Result<String, OutputError> {
    match format {
        OutputFormat::Json => to_json(&diffs),
        OutputFormat::Terminal => Ok(format_lines(
            diffs.iter().map(|line| format!("{} {}", "•".bright_yellow(), line.yellow())),
            diffs.len(),
            options,
            true,
        )),
        OutputFormat::Plain => Ok(format_lines(
            diffs.iter().map(|line| format!("• {}", line)),
            diffs.len(),
            options,
            false,
        )),
    }
}

/// Formats map-form differences.
pub fn format_map(
    diffs: &BTreeMap<String, DiffResult>,
    format: &OutputFormat,
    options: &OutputOptions,
) -> Result<String, OutputError> {
    let max = options.max_value_length;
    match format {
        OutputFormat::Json => to_json(diffs),
        OutputFormat::Terminal => Ok(format_lines(
            diffs.iter().map(|(path, result)| {
                format!(
                    "{} {}: {} {} {}",
                    "•".bright_yellow(),
                    path.yellow(),
                    truncate(&result.old_value.to_string(), max).red(),
                    "→".bright_yellow(),
                    truncate(&result.new_value.to_string(), max).green()
                )
            }),
            diffs.len(),
            options,
            true,
        )),
        OutputFormat::Plain => Ok(format_lines(
            diffs.iter().map(|(path, result)| {
                format!(
                    "• {}: {} → {}",
                    path,
                    truncate(&result.old_value.to_string(), max),
                    truncate(&result.new_value.to_string(), max)
                )
            }),
            diffs.len(),
            options,
            false,
        )),
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, OutputError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| OutputError::JsonSerializationError { source: e })
}

fn format_lines(
    lines: impl Iterator<Item = String>,
    count: usize,
    options: &OutputOptions,
    styled: bool,
) -> String {
    if count == 0 {
        let message = "No differences found.";
        return if styled {
            message.dimmed().to_string()
        } else {
            message.to_string()
        };
    }

    let mut output = String::new();
    for line in lines {
        output.push_str(&line);
        output.push('\n');
    }

    if options.summary {
        output.push('\n');
        output.push_str(&format_summary(count));
    }

    output
}

/// Formats the summary line.
fn format_summary(count: usize) -> String {
    match count {
        0 => "Summary: No differences".to_string(),
        1 => "Summary: 1 difference".to_string(),
        n => format!("Summary: {} differences", n),
    }
}

/// Truncates `value` to at most `max_len` characters, ending in `...`.
fn truncate(value: &str, max_len: usize) -> String {
    if value.chars().count() <= max_len {
        return value.to_string();
    }
    let kept: String = value.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
}
