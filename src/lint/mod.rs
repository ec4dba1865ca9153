//! Lint Engine
//!
//! Clean separation of lint logic from LSP concerns: diagnostic types, the
//! rule set, the per-document scanner, and the diagnostic store.

pub mod diagnostic;
pub mod engine;
pub mod rules;
pub mod store;

pub use diagnostic::{Diagnostic, LintRange, Severity};
pub use engine::{validate_document, validate_line};
pub use rules::RuleSet;
pub use store::DiagnosticStore;
