//! Plain-text rendering of analysis results and history.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use futuredoc_core::{AnalysisRecord, AnalysisResult};

pub const DISCLAIMER: &str =
    "Disclaimer: this tool uses AI to assist review and does not replace a human legal opinion.";

const RULE_WIDTH: usize = 72;

/// Render one result as a card: title, summary, numbered facts, disclaimer.
pub fn render_result_card(title: &str, result: &AnalysisResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {title} ===");
    out.push('\n');

    let _ = writeln!(out, "Summary");
    for line in wrap(&result.summary, RULE_WIDTH - 2) {
        let _ = writeln!(out, "  {line}");
    }
    out.push('\n');

    let _ = writeln!(out, "Facts ({})", result.facts.len());
    if result.facts.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    let width = result.facts.len().to_string().len();
    for (i, fact) in result.facts.iter().enumerate() {
        let _ = writeln!(out, "  {:>width$}. {}", i + 1, fact);
    }
    out.push('\n');

    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    let _ = writeln!(out, "{DISCLAIMER}");
    out
}

/// Render the history list, newest first.
pub fn render_history(records: &[AnalysisRecord]) -> String {
    if records.is_empty() {
        return "No analyses stored yet.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(out, "Analysis history ({})", records.len());
    for record in records {
        let _ = writeln!(
            out,
            "  {}  {:<22} {}",
            record.id,
            format_created_at(&record.created_at),
            record.source_file_name
        );
    }
    out
}

pub fn format_created_at(ts: &DateTime<Utc>) -> String {
    ts.format("%d %B %Y %H:%M").to_string()
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
