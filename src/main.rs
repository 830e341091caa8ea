mod document;
mod folding;
mod folding_range;
mod region;
mod scanner;
mod server;
mod utils;

use server::StyleSheetServer;
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};

#[tokio::main]
async fn main() {
    // Log to a file next to the working directory; stdout belongs to the
    // LSP transport.
    let log_path = std::env::current_dir()
        .map(|dir| dir.join("stylefold.log"))
        .unwrap_or_else(|_| "stylefold.log".into());

    let file_appender = tracing_appender::rolling::never(".", "stylefold.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_ansi(false)
        .with_target(true)
        .init();

    tracing::info!("Starting stylefold server...");
    tracing::info!("Log file location: {}", log_path.display());

    let (service, socket) = LspService::new(StyleSheetServer::new);

    tracing::info!("stylefold ready, serving requests over stdio");
    Server::new(stdin(), stdout(), socket).serve(service).await;

    tracing::info!("stylefold shutting down");
}
