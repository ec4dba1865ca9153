use tower_lsp::jsonrpc::Result as LspResult;
use tower_lsp::lsp_types::*;

use crate::config::Settings;
use crate::lang;
use crate::lint::validate_document;
use crate::lsp::backend::Backend;

/// Command id for explicit validation, exposed through executeCommand.
pub const VALIDATE_COMMAND: &str = "edl.validateDocument";

/// Trait for handling hover requests
#[tower_lsp::async_trait]
pub trait HandleHover {
    async fn handle_hover(&self, params: HoverParams) -> LspResult<Option<Hover>>;
}

/// Trait for handling completion requests
#[tower_lsp::async_trait]
pub trait HandleCompletion {
    async fn handle_completion(
        &self,
        params: CompletionParams,
    ) -> LspResult<Option<CompletionResponse>>;
}

/// Trait for handling diagnostics
#[tower_lsp::async_trait]
pub trait HandleDiagnostics {
    async fn publish_diagnostics(&self, uri: Url);
    async fn revalidate_all(&self);
    fn create_lsp_diagnostic(
        &self,
        lint_diagnostic: crate::lint::Diagnostic,
        line: &str,
    ) -> tower_lsp::lsp_types::Diagnostic;
}

/// Convert an LSP UTF-16 column into a char index into `line`, clamped to
/// the line's length.
fn utf16_col_to_char_idx(line: &str, utf16_col: usize) -> usize {
    let mut units = 0;
    for (idx, c) in line.chars().enumerate() {
        if units >= utf16_col {
            return idx;
        }
        units += c.len_utf16();
    }
    line.chars().count()
}

/// Convert a byte offset within `line` into a UTF-16 column.
///
/// Lint columns are byte offsets; LSP positions count UTF-16 code units.
fn byte_col_to_utf16(line: &str, byte_col: usize) -> u32 {
    let mut units = 0usize;
    for (idx, c) in line.char_indices() {
        if idx >= byte_col {
            break;
        }
        units += c.len_utf16();
    }
    units as u32
}

/// The first `char_count` characters of `line`, safe on multi-byte text.
fn line_prefix(line: &str, char_count: usize) -> String {
    line.chars().take(char_count).collect()
}

/// Find the token under the cursor: an identifier first, then an operator
/// run (`->`, `=>`, `<-`, `|>`).
fn token_at(line: &str, char_idx: usize) -> Option<String> {
    let chars: Vec<char> = line.chars().collect();
    let cursor = char_idx.min(chars.len());

    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let mut start = cursor;
    while start > 0 && is_word(chars[start - 1]) {
        start -= 1;
    }
    let mut end = cursor;
    while end < chars.len() && is_word(chars[end]) {
        end += 1;
    }
    if start < end {
        return Some(chars[start..end].iter().collect());
    }

    let is_operator = |c: char| matches!(c, '-' | '>' | '<' | '=' | '|');
    let mut start = cursor;
    while start > 0 && is_operator(chars[start - 1]) {
        start -= 1;
    }
    let mut end = cursor;
    while end < chars.len() && is_operator(chars[end]) {
        end += 1;
    }
    (start < end).then(|| chars[start..end].iter().collect())
}

#[tower_lsp::async_trait]
impl HandleHover for Backend {
    async fn handle_hover(&self, params: HoverParams) -> LspResult<Option<Hover>> {
        let tdpp = params.text_document_position_params;
        let uri = tdpp.text_document.uri;
        let pos = tdpp.position;

        let docs = self.documents.lock().await;
        let doc_state = match docs.get(&uri) {
            Some(state) => state,
            None => return Ok(None),
        };

        let line = doc_state
            .content
            .split('\n')
            .nth(pos.line as usize)
            .unwrap_or("");

        let char_idx = utf16_col_to_char_idx(line, pos.character as usize);
        let token = match token_at(line, char_idx) {
            Some(token) => token,
            None => return Ok(None),
        };

        if let Some(doc) = lang::hover_markdown(&token) {
            let m = MarkupContent {
                kind: MarkupKind::Markdown,
                value: doc.to_string(),
            };
            return Ok(Some(Hover {
                contents: HoverContents::Markup(m),
                range: None,
            }));
        }

        Ok(None)
    }
}

#[tower_lsp::async_trait]
impl HandleCompletion for Backend {
    async fn handle_completion(
        &self,
        params: CompletionParams,
    ) -> LspResult<Option<CompletionResponse>> {
        let settings = *self.settings.lock().await;
        if !settings.intellisense_enabled {
            return Ok(None);
        }

        let uri = params.text_document_position.text_document.uri;
        let pos = params.text_document_position.position;

        let docs = self.documents.lock().await;
        let doc_state = match docs.get(&uri) {
            Some(state) => state,
            None => return Ok(None),
        };

        let line = doc_state
            .content
            .split('\n')
            .nth(pos.line as usize)
            .unwrap_or("");

        let mut completions = Vec::new();

        for keyword in lang::KEYWORDS {
            completions.push(CompletionItem {
                label: keyword.to_string(),
                kind: Some(CompletionItemKind::KEYWORD),
                detail: Some("EDL Keyword".to_string()),
                documentation: Some(Documentation::String(
                    lang::keyword_doc(keyword).to_string(),
                )),
                ..Default::default()
            });
        }

        for func in lang::BUILTIN_FUNCTIONS {
            completions.push(CompletionItem {
                label: func.to_string(),
                kind: Some(CompletionItemKind::FUNCTION),
                detail: Some("EDL Built-in Function".to_string()),
                documentation: Some(Documentation::String(lang::function_doc(func).to_string())),
                insert_text: Some(format!("{func}($1)")),
                insert_text_format: Some(InsertTextFormat::SNIPPET),
                ..Default::default()
            });
        }

        for ty in lang::TYPES {
            completions.push(CompletionItem {
                label: ty.to_string(),
                kind: Some(CompletionItemKind::TYPE_PARAMETER),
                detail: Some("EDL Type".to_string()),
                documentation: Some(Documentation::String(lang::type_doc(ty).to_string())),
                ..Default::default()
            });
        }

        // Context-aware snippets
        let char_idx = utf16_col_to_char_idx(line, pos.character as usize);
        let before_cursor = line_prefix(line, char_idx);

        if before_cursor.contains("event") {
            completions.push(CompletionItem {
                label: "on_trigger".to_string(),
                kind: Some(CompletionItemKind::SNIPPET),
                detail: Some("Event Handler Template".to_string()),
                insert_text: Some("on_trigger(${1:condition}) {\n\t$2\n}".to_string()),
                insert_text_format: Some(InsertTextFormat::SNIPPET),
                ..Default::default()
            });
        }

        if before_cursor.contains("state") {
            completions.push(CompletionItem {
                label: "transition_to".to_string(),
                kind: Some(CompletionItemKind::SNIPPET),
                detail: Some("State Transition".to_string()),
                insert_text: Some("transition_to(${1:target_state})".to_string()),
                insert_text_format: Some(InsertTextFormat::SNIPPET),
                ..Default::default()
            });
        }

        if completions.is_empty() {
            Ok(None)
        } else {
            Ok(Some(CompletionResponse::Array(completions)))
        }
    }
}

#[tower_lsp::async_trait]
impl HandleDiagnostics for Backend {
    /// Validate a document and publish the resulting diagnostics.
    ///
    /// The store entry for the document is replaced wholesale: the new
    /// list fully supersedes the prior one.
    async fn publish_diagnostics(&self, uri: Url) {
        let docs = self.documents.lock().await;
        let doc_state = match docs.get(&uri) {
            Some(state) => state,
            None => return,
        };
        if !doc_state.is_edl() {
            return;
        }
        let content = doc_state.content.clone();
        drop(docs);

        let settings: Settings = *self.settings.lock().await;
        let lint_diagnostics = validate_document(&content, &settings);

        self.store
            .lock()
            .await
            .replace(uri.clone(), lint_diagnostics.clone());

        let lines: Vec<&str> = content.split('\n').collect();
        let diagnostics: Vec<_> = lint_diagnostics
            .into_iter()
            .map(|d| {
                let line = lines
                    .get(d.range.start_line as usize)
                    .copied()
                    .unwrap_or("");
                self.create_lsp_diagnostic(d, line)
            })
            .collect();

        self.client
            .publish_diagnostics(uri, diagnostics, None)
            .await;
    }

    /// Re-validate every open EDL document, e.g. after a settings change.
    async fn revalidate_all(&self) {
        let uris: Vec<Url> = {
            let docs = self.documents.lock().await;
            docs.iter()
                .filter(|(_, state)| state.is_edl())
                .map(|(uri, _)| uri.clone())
                .collect()
        };

        for uri in uris {
            self.publish_diagnostics(uri).await;
        }
    }

    fn create_lsp_diagnostic(
        &self,
        lint_diagnostic: crate::lint::Diagnostic,
        line: &str,
    ) -> tower_lsp::lsp_types::Diagnostic {
        use crate::lint::Severity;

        let severity = match lint_diagnostic.severity {
            Severity::Error => DiagnosticSeverity::ERROR,
            Severity::Warning => DiagnosticSeverity::WARNING,
            Severity::Info => DiagnosticSeverity::INFORMATION,
        };

        let range = lint_diagnostic.range;
        tower_lsp::lsp_types::Diagnostic {
            range: Range::new(
                Position::new(
                    range.start_line,
                    byte_col_to_utf16(line, range.start_col as usize),
                ),
                Position::new(
                    range.end_line,
                    byte_col_to_utf16(line, range.end_col as usize),
                ),
            ),
            severity: Some(severity),
            code: Some(NumberOrString::String(lint_diagnostic.code.to_string())),
            source: Some("edl-ls".to_string()),
            message: lint_diagnostic.message,
            ..Default::default()
        }
    }
}
