//! Lint rules for EDL source lines.
//!
//! Every rule is a pure function over a single line and its 0-based line
//! number. Rules never fail: a line that matches no pattern simply yields
//! nothing. Registration order is fixed in [`RuleSet::new`] and determines
//! the order of diagnostics within a line (syntax, semantic, style).

use std::sync::LazyLock;

use regex::Regex;

use super::diagnostic::{Diagnostic, LintRange};

/// A single lint check over `(line, line_number)`, appending its findings.
pub type Rule = fn(&str, u32, &mut Vec<Diagnostic>);

/// Ordered collection of lint rules, registered once at construction.
///
/// Adding a rule means appending to the list in [`RuleSet::new`]; nothing
/// else needs to change.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSet {
    pub fn new() -> Self {
        Self {
            rules: vec![
                check_unmatched_bracket,
                check_event_name,
                check_missing_semicolon,
                check_undefined_event,
                check_self_transition,
                check_line_length,
                check_mixed_indentation,
                check_trailing_whitespace,
            ],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

static EVENT_DECL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"event\s+(\w+)").expect("valid regex"));
static EVENT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("valid regex"));
static BUILTIN_CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:emit|listen|schedule|delay|cancel)\s*\([^)]*\)$").expect("valid regex")
});
static EMIT_ARG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"emit\s*\(\s*(\w+)").expect("valid regex"));
static TRANSITION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\s*->\s*(\w+)").expect("valid regex"));

/// More `{` than `}` on the line.
///
/// This is a per-line heuristic, not brace balancing across the document:
/// it also flags lines that legitimately open a block continued below.
fn check_unmatched_bracket(line: &str, line_number: u32, out: &mut Vec<Diagnostic>) {
    let open = line.bytes().filter(|&b| b == b'{').count();
    let close = line.bytes().filter(|&b| b == b'}').count();

    if open > close {
        let len = line.len() as u32;
        out.push(Diagnostic::error(
            LintRange::on_line(line_number, len.saturating_sub(1), len),
            "Missing closing bracket",
            "missing-bracket",
        ));
    }
}

/// `event <name>` where the name is not lowercase_with_underscores.
fn check_event_name(line: &str, line_number: u32, out: &mut Vec<Diagnostic>) {
    let Some(caps) = EVENT_DECL_RE.captures(line) else {
        return;
    };
    let name = &caps[1];

    if !EVENT_NAME_RE.is_match(name) {
        // Range spans the name's first occurrence on the line.
        let Some(start) = line.find(name) else {
            return;
        };
        out.push(Diagnostic::error(
            LintRange::on_line(line_number, start as u32, (start + name.len()) as u32),
            "Event names should be lowercase with underscores",
            "invalid-event-name",
        ));
    }
}

/// A bare builtin call (emit/listen/schedule/delay/cancel) with no `;`
/// anywhere on the line.
fn check_missing_semicolon(line: &str, line_number: u32, out: &mut Vec<Diagnostic>) {
    if BUILTIN_CALL_RE.is_match(line.trim()) && !line.contains(';') {
        let len = line.len() as u32;
        out.push(Diagnostic::warning(
            LintRange::on_line(line_number, len.saturating_sub(1), len),
            "Missing semicolon",
            "missing-semicolon",
        ));
    }
}

/// `emit(<name>)` where the name looks like a placeholder.
///
/// This is a literal-string heuristic, not symbol resolution: there is no
/// cross-line state, so "undefined" is detected by name alone.
fn check_undefined_event(line: &str, line_number: u32, out: &mut Vec<Diagnostic>) {
    let Some(caps) = EMIT_ARG_RE.captures(line) else {
        return;
    };
    let name = &caps[1];

    if name.contains("undefined") || name == "null" {
        let Some(start) = line.find(name) else {
            return;
        };
        out.push(Diagnostic::error(
            LintRange::on_line(line_number, start as u32, (start + name.len()) as u32),
            format!("Undefined event: {name}"),
            "undefined-event",
        ));
    }
}

/// `a -> a`: transition whose source and target are textually identical.
fn check_self_transition(line: &str, line_number: u32, out: &mut Vec<Diagnostic>) {
    let Some(caps) = TRANSITION_RE.captures(line) else {
        return;
    };

    if caps[1] == caps[2] {
        out.push(Diagnostic::warning(
            LintRange::on_line(line_number, 0, line.len() as u32),
            "Self-transitions should be explicit",
            "self-transition",
        ));
    }
}

const MAX_LINE_LENGTH: usize = 120;

fn check_line_length(line: &str, line_number: u32, out: &mut Vec<Diagnostic>) {
    if line.chars().count() > MAX_LINE_LENGTH {
        // The threshold counts characters; the range column is the byte
        // offset of the first character past it.
        let start = line
            .char_indices()
            .nth(MAX_LINE_LENGTH)
            .map(|(idx, _)| idx)
            .unwrap_or(line.len());
        out.push(Diagnostic::info(
            LintRange::on_line(line_number, start as u32, line.len() as u32),
            format!("Line too long (>{MAX_LINE_LENGTH} characters)"),
            "line-too-long",
        ));
    }
}

/// Leading whitespace run containing both a tab and a space.
fn check_mixed_indentation(line: &str, line_number: u32, out: &mut Vec<Diagnostic>) {
    let ws_len = line.len() - line.trim_start().len();
    let leading = &line[..ws_len];

    if leading.contains('\t') && leading.contains(' ') {
        out.push(Diagnostic::warning(
            LintRange::on_line(line_number, 0, ws_len as u32),
            "Mixed tabs and spaces for indentation",
            "mixed-indentation",
        ));
    }
}

/// Trailing whitespace, including a stray `\r` left by CRLF line endings.
fn check_trailing_whitespace(line: &str, line_number: u32, out: &mut Vec<Diagnostic>) {
    let trimmed_len = line.trim_end().len();

    if trimmed_len < line.len() {
        out.push(Diagnostic::info(
            LintRange::on_line(line_number, trimmed_len as u32, line.len() as u32),
            "Trailing whitespace",
            "trailing-whitespace",
        ));
    }
}
