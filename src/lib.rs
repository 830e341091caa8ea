//! Library entry point for the stylefold language server.
//!
//! The folding engine ([`folding`]) is pure and usable without the server:
//! build a [`document::StyleSheetDocument`] and call
//! [`folding::get_folding_ranges`]. The remaining modules wire that engine
//! into a `tower-lsp` server served by the binary.

pub mod document;
pub mod folding;
pub mod folding_range;
pub mod region;
pub mod scanner;
pub mod server;
pub mod utils;

pub use document::{Dialect, StyleSheetDocument};
pub use folding::{FoldingContext, FoldingRange, FoldingRangeKind, get_folding_ranges};
