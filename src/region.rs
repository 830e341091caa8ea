//! Recognition of `#region` / `#endregion` comment markers.
//!
//! Markers live inside ordinary comments, so they reach the folding engine
//! as comment tokens. The block form works in every dialect; the line form
//! only exists where `//` comments do (SCSS and LESS). A trailing label
//! (`/* #region imports */`) is tolerated but not reported.

use std::sync::LazyLock;

use regex::Regex;

use crate::document::Dialect;

/// Regex for a marker in a block comment. The keyword must be a whole word,
/// so `#regionX` is a plain comment.
static BLOCK_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*/\*\s*(#region|#endregion)\b\s*(.*?)\s*\*/").expect("Region: regex failure")
});

/// Regex for a marker in a `//` line comment.
static LINE_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*//\s*(#region|#endregion)\b").expect("Region: regex failure")
});

/// How a comment participates in region folding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionMarker {
    Start,
    End,
}

/// Classifies a comment token's text. Returns `None` for anything that is
/// not a complete marker, including partial lookalikes.
pub fn classify_comment(text: &str, dialect: Dialect) -> Option<RegionMarker> {
    let keyword = if let Some(captures) = BLOCK_MARKER_RE.captures(text) {
        captures.get(1)?.as_str()
    } else if dialect.has_line_comments() {
        LINE_MARKER_RE.captures(text)?.get(1)?.as_str()
    } else {
        return None;
    };

    if keyword == "#region" {
        Some(RegionMarker::Start)
    } else {
        Some(RegionMarker::End)
    }
}
