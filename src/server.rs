//! Implements the Language Server Protocol (LSP) logic for style sheets.
//!
//! This module handles document synchronization, advertises the folding
//! range capability, and manages the lifecycle of the LSP server. The
//! folding computation itself lives in [`crate::folding`].

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tower_lsp::async_trait;
use tower_lsp::jsonrpc::Result;
#[allow(clippy::wildcard_imports)]
use tower_lsp::lsp_types::*;
use tower_lsp::Client;
use tower_lsp::LanguageServer;

use crate::document::{Dialect, StyleSheetDocument};
use crate::folding_range::handle_folding_range;
use crate::utils::spawn_log;

/// Settings accepted through `initializationOptions`.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Maximum number of folding ranges reported per document. Overrides the
    /// client's `textDocument.foldingRange.rangeLimit` capability.
    pub range_limit: Option<u32>,
}

/// The core style sheet language server state.
#[derive(Debug)]
pub struct StyleSheetServer {
    pub client: Client,
    pub documents: Arc<RwLock<HashMap<Url, StyleSheetDocument>>>,
    pub range_limit: Arc<RwLock<Option<u32>>>,
}

impl StyleSheetServer {
    pub fn new(client: Client) -> StyleSheetServer {
        StyleSheetServer {
            client,
            documents: Arc::new(RwLock::new(HashMap::new())),
            range_limit: Arc::new(RwLock::new(None)),
        }
    }

    /// The effective range limit for folding requests, if any.
    pub fn range_limit(&self) -> Option<u32> {
        *self.range_limit.read().expect("Server: lock poisoned")
    }

    fn open_document(&self, uri: Url, language_id: &str, text: String) {
        let dialect = Dialect::from_language_id(language_id);
        self.documents
            .write()
            .expect("Server: lock poisoned")
            .insert(uri, StyleSheetDocument::new(text, dialect));
    }

    fn replace_document_text(&self, uri: &Url, text: String) {
        let mut documents = self.documents.write().expect("Server: lock poisoned");
        if let Some(document) = documents.get_mut(uri) {
            document.update(text);
        } else {
            // A change for a document we never saw opened. Sync it anyway,
            // inferring the dialect from the file extension.
            let dialect = Dialect::from_language_id(
                uri.path().rsplit('.').next().unwrap_or_default(),
            );
            documents.insert(uri.clone(), StyleSheetDocument::new(text, dialect));
        }
    }
}

fn build_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
        folding_range_provider: Some(FoldingRangeProviderCapability::Simple(true)),
        ..Default::default()
    }
}

#[async_trait]
impl LanguageServer for StyleSheetServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        // Initialization options win over the client capability.
        let configured = params
            .initialization_options
            .and_then(|options| serde_json::from_value::<ServerConfig>(options).ok())
            .and_then(|config| config.range_limit);
        let advertised = params
            .capabilities
            .text_document
            .as_ref()
            .and_then(|td| td.folding_range.as_ref())
            .and_then(|fr| fr.range_limit);

        *self.range_limit.write().expect("Server: lock poisoned") = configured.or(advertised);

        Ok(InitializeResult { capabilities: build_capabilities(), ..Default::default() })
    }

    async fn initialized(&self, _: InitializedParams) {
        let limit = self.range_limit();
        self.client
            .log_message(
                MessageType::INFO,
                format!("[INFO] stylefold initialized (range limit: {limit:?})"),
            )
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        spawn_log(self.client.clone(), MessageType::INFO, "[INFO] stylefold shutting down".to_string());
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let start = std::time::Instant::now();
        let text_len = params.text_document.text.len();
        self.open_document(
            params.text_document.uri,
            &params.text_document.language_id,
            params.text_document.text,
        );
        spawn_log(self.client.clone(), MessageType::LOG, format!("[PERF] did_open: {text_len} chars in {elapsed:?}", elapsed = start.elapsed()));
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let start = std::time::Instant::now();
        if let Some(change) = params.content_changes.into_iter().next() {
            let text_len = change.text.len();
            self.replace_document_text(&params.text_document.uri, change.text);
            spawn_log(self.client.clone(), MessageType::LOG, format!("[PERF] did_change: {text_len} chars in {elapsed:?}", elapsed = start.elapsed()));
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.documents
            .write()
            .expect("Server: lock poisoned")
            .remove(&params.text_document.uri);
    }

    async fn folding_range(&self, params: FoldingRangeParams) -> Result<Option<Vec<FoldingRange>>> {
        handle_folding_range(self, params).await
    }
}
