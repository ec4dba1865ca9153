//! Document scanner.
//!
//! Core lint logic separated from protocol concerns. A scan is a pure
//! function of `(text, settings)`: the same input always produces the same
//! diagnostic sequence, in line-major, rule-registration order.

use crate::config::Settings;

use super::diagnostic::Diagnostic;
use super::rules::RuleSet;

/// Run every registered rule against a single line, appending findings.
pub fn validate_line(line: &str, line_number: u32, rules: &RuleSet, out: &mut Vec<Diagnostic>) {
    for rule in rules.iter() {
        rule(line, line_number, out);
    }
}

/// Validate an entire document.
///
/// Returns an empty sequence immediately when linting is disabled. Lines
/// are split on `\n` only; a trailing `\r` from CRLF endings stays part of
/// the line and is reported as trailing whitespace like any other.
pub fn validate_document(text: &str, settings: &Settings) -> Vec<Diagnostic> {
    if !settings.linting_enabled {
        return Vec::new();
    }

    let rules = RuleSet::new();
    let mut diagnostics = Vec::new();

    for (line_number, line) in text.split('\n').enumerate() {
        validate_line(line, line_number as u32, &rules, &mut diagnostics);
    }

    diagnostics
}
