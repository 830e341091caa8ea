use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types;
use tower_lsp::lsp_types::{FoldingRange, FoldingRangeParams};

use crate::folding::{FoldingContext, FoldingRangeKind, get_folding_ranges};
use crate::server::StyleSheetServer;

/// Handles `textDocument/foldingRange`: runs the folding engine over the
/// synced document and converts the result to the wire type.
pub async fn handle_folding_range(
    server: &StyleSheetServer,
    params: FoldingRangeParams,
) -> Result<Option<Vec<FoldingRange>>> {
    let uri = params.text_document.uri;
    let document = server
        .documents
        .read()
        .expect("Server: lock poisoned")
        .get(&uri)
        .cloned()
        .ok_or(tower_lsp::jsonrpc::Error::invalid_params("No document"))?;

    let context = FoldingContext { range_limit: server.range_limit() };
    let ranges = get_folding_ranges(&document, context)
        .into_iter()
        .map(|r| FoldingRange {
            start_line: r.start_line,
            start_character: None,
            end_line: r.end_line,
            end_character: None,
            kind: r.kind.map(|k| match k {
                FoldingRangeKind::Comment => lsp_types::FoldingRangeKind::Comment,
                FoldingRangeKind::Region => lsp_types::FoldingRangeKind::Region,
            }),
            collapsed_text: None,
        })
        .collect();

    Ok(Some(ranges))
}
