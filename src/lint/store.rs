//! Diagnostic store.
//!
//! Maps each open document to its current diagnostic list. Every write is
//! a wholesale replacement: a validation pass fully supersedes the prior
//! list for that document, never merging or patching individual entries.

use std::collections::HashMap;

use tower_lsp::lsp_types::Url;

use super::diagnostic::Diagnostic;

#[derive(Debug, Default)]
pub struct DiagnosticStore {
    entries: HashMap<Url, Vec<Diagnostic>>,
}

impl DiagnosticStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the diagnostic list for a document.
    pub fn replace(&mut self, uri: Url, diagnostics: Vec<Diagnostic>) {
        self.entries.insert(uri, diagnostics);
    }

    pub fn get(&self, uri: &Url) -> Option<&[Diagnostic]> {
        self.entries.get(uri).map(Vec::as_slice)
    }

    /// Drop a document's diagnostics, e.g. when it is closed.
    pub fn remove(&mut self, uri: &Url) {
        self.entries.remove(uri);
    }

    /// Drop everything, used on subsystem teardown.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
