use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::config::Settings;
use crate::lint::DiagnosticStore;
use crate::lsp::document::DocumentState;
use crate::lsp::handlers::{HandleCompletion, HandleDiagnostics, HandleHover, VALIDATE_COMMAND};

/// The main LSP backend that holds state and implements the Language Server Protocol
#[derive(Clone)]
pub struct Backend {
    pub client: Client,
    pub settings: Arc<Mutex<Settings>>,
    pub documents: Arc<Mutex<HashMap<Url, DocumentState>>>,
    pub store: Arc<Mutex<DiagnosticStore>>,
}

impl Backend {
    pub fn new(client: Client, settings: Settings) -> Self {
        Self {
            client,
            settings: Arc::new(Mutex::new(settings)),
            documents: Arc::new(Mutex::new(HashMap::new())),
            store: Arc::new(Mutex::new(DiagnosticStore::new())),
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(
        &self,
        _: InitializeParams,
    ) -> tower_lsp::jsonrpc::Result<InitializeResult> {
        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(false),
                    trigger_characters: Some(vec![
                        ".".to_string(),
                        "-".to_string(),
                        ">".to_string(),
                    ]),
                    work_done_progress_options: Default::default(),
                    all_commit_characters: None,
                    completion_item: None,
                }),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: vec![VALIDATE_COMMAND.to_string()],
                    work_done_progress_options: Default::default(),
                }),
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "edl-language-server initialized")
            .await;
    }

    async fn shutdown(&self) -> tower_lsp::jsonrpc::Result<()> {
        // Teardown: the diagnostic store and the document map go together.
        self.store.lock().await.clear();
        self.documents.lock().await.clear();
        Ok(())
    }

    async fn hover(&self, params: HoverParams) -> tower_lsp::jsonrpc::Result<Option<Hover>> {
        self.handle_hover(params).await
    }

    async fn completion(
        &self,
        params: CompletionParams,
    ) -> tower_lsp::jsonrpc::Result<Option<CompletionResponse>> {
        self.handle_completion(params).await
    }

    // Store opened documents for hover/diagnostics
    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri.clone();
        let doc_state = DocumentState {
            content: params.text_document.text,
            language_id: params.text_document.language_id,
        };

        let mut docs = self.documents.lock().await;
        docs.insert(uri.clone(), doc_state);
        drop(docs); // Release the lock before calling publish_diagnostics

        self.publish_diagnostics(uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri.clone();
        if let Some(change) = params.content_changes.into_iter().next_back() {
            // Full sync: the last change carries the complete new text.
            let mut docs = self.documents.lock().await;
            if let Some(doc_state) = docs.get_mut(&uri) {
                doc_state.content = change.text;
            }
            drop(docs); // Release the lock before calling publish_diagnostics

            self.publish_diagnostics(uri).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;

        self.documents.lock().await.remove(&uri);
        self.store.lock().await.remove(&uri);

        // Clear any diagnostics still shown by the host.
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        {
            let mut settings = self.settings.lock().await;
            settings.update_from_json(&params.settings);
            log::info!("Configuration changed: {:?}", *settings);
        }

        // Configuration changes cascade to every open document.
        self.revalidate_all().await;
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> tower_lsp::jsonrpc::Result<Option<serde_json::Value>> {
        if params.command != VALIDATE_COMMAND {
            log::warn!("Unknown command: {}", params.command);
            return Ok(None);
        }

        // Explicit validation of one document (first argument is its URI),
        // or of every open document when no argument is given.
        let uri = params
            .arguments
            .first()
            .and_then(|arg| arg.as_str())
            .and_then(|raw| Url::parse(raw).ok());

        match uri {
            Some(uri) => self.publish_diagnostics(uri).await,
            None => self.revalidate_all().await,
        }

        Ok(None)
    }
}
