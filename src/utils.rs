use tower_lsp::Client;
use tower_lsp::lsp_types::MessageType;

/// Sends a `window/logMessage` notification without blocking the handler
/// that produced it.
pub fn spawn_log(client: Client, ty: MessageType, msg: String) {
    tokio::spawn(async move {
        let _ = client.log_message(ty, msg).await;
    });
}
