//! Diagnostic types produced by the lint engine.
//!
//! These are protocol-independent; conversion to LSP diagnostics lives in
//! the `lsp` module.

/// Severity of a diagnostic message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A source range within a single line.
///
/// Columns are byte offsets into the line. Ranges never span lines: even
/// the missing-bracket check anchors at end-of-line rather than end of the
/// block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LintRange {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl LintRange {
    /// Range within a single line, from `start_col` to `end_col`.
    pub fn on_line(line: u32, start_col: u32, end_col: u32) -> Self {
        Self {
            start_line: line,
            start_col,
            end_line: line,
            end_col,
        }
    }
}

/// A single lint finding, immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub range: LintRange,
    pub message: String,
    pub severity: Severity,
    /// Stable machine-readable tag, e.g. "missing-bracket"
    pub code: &'static str,
}

impl Diagnostic {
    pub fn error(range: LintRange, message: impl Into<String>, code: &'static str) -> Self {
        Self {
            range,
            message: message.into(),
            severity: Severity::Error,
            code,
        }
    }

    pub fn warning(range: LintRange, message: impl Into<String>, code: &'static str) -> Self {
        Self {
            range,
            message: message.into(),
            severity: Severity::Warning,
            code,
        }
    }

    pub fn info(range: LintRange, message: impl Into<String>, code: &'static str) -> Self {
        Self {
            range,
            message: message.into(),
            severity: Severity::Info,
            code,
        }
    }
}
