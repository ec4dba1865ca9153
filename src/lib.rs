//! EDL Language Server
//!
//! A clean, fast Language Server Protocol implementation for EDL
//! event/state-machine description files.
//!
//! This library provides:
//! - Line-oriented lint engine with positioned diagnostics
//! - LSP protocol implementation
//! - Static completion and hover tables for the EDL language
//! - Configuration management

pub mod config;
pub mod lang;
pub mod lint;
pub mod lsp;

// Re-exports for clean public API
pub use config::{Config, Settings};
pub use lint::{validate_document, Diagnostic, DiagnosticStore, RuleSet, Severity};
