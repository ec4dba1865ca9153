//! Offline lint runner: check an EDL file from the command line and print
//! its diagnostics in `path:line:col` form.

use anyhow::{Context, Result};
use edl_language_server::config::Settings;
use edl_language_server::lint::{validate_document, Severity};

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .context("usage: edl-lint <file.edl>")?;
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read file: {}", path))?;

    let diagnostics = validate_document(&text, &Settings::default());

    for diagnostic in &diagnostics {
        let severity = match diagnostic.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        println!(
            "{}:{}:{}: {}: {} [{}]",
            path,
            diagnostic.range.start_line + 1,
            diagnostic.range.start_col + 1,
            severity,
            diagnostic.message,
            diagnostic.code,
        );
    }

    if diagnostics.iter().any(|d| d.severity == Severity::Error) {
        std::process::exit(1);
    }

    Ok(())
}
