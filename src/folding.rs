//! Folding range computation.
//!
//! A single forward pass over the token stream matches opening and closing
//! delimiters and records one folding range per completed construct:
//! brace blocks, `#region` pairs, and plain multi-line comments. Brace and
//! comment-region nesting are independent, so the delimiter stack supports
//! removing the nearest entry of a requested kind rather than only the top.
//! Malformed input never fails; unmatched delimiters are simply dropped.

use crate::document::StyleSheetDocument;
use crate::region::{RegionMarker, classify_comment};
use crate::scanner::{Token, TokenKind, scanner_for};

/// The LSP-visible classification of a folding range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldingRangeKind {
    Comment,
    Region,
}

/// A collapsible span of lines. `start_line < end_line` always holds;
/// single-line constructs are never reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldingRange {
    pub start_line: u32,
    pub end_line: u32,
    pub kind: Option<FoldingRangeKind>,
}

/// Options for one folding computation.
#[derive(Debug, Clone, Copy, Default)]
pub struct FoldingContext {
    /// Maximum number of ranges to report. `None` or `Some(0)` means
    /// unbounded.
    pub range_limit: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DelimiterKind {
    Brace,
    CommentRegion,
}

/// An unmatched opening marker currently in scope.
#[derive(Debug, Clone, Copy)]
struct Delimiter {
    line: u32,
    kind: DelimiterKind,
    is_start: bool,
}

/// Stack of open delimiters. Because brace blocks and comment regions nest
/// independently, a pop searches downward for the nearest entry of its own
/// kind and may remove below the top.
#[derive(Debug, Default)]
struct DelimiterStack(Vec<Delimiter>);

impl DelimiterStack {
    fn push(&mut self, delimiter: Delimiter) {
        self.0.push(delimiter);
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Removes and returns the most recently pushed opening delimiter of the
    /// given kind, leaving entries of the other kind in place. Returns `None`
    /// without touching the stack when no such entry exists.
    fn pop_nearest(&mut self, kind: DelimiterKind) -> Option<Delimiter> {
        let index = self
            .0
            .iter()
            .rposition(|d| d.kind == kind && d.is_start)?;
        Some(self.0.remove(index))
    }
}

/// Computes the folding ranges for a document: every multi-line brace block,
/// `#region` pair and multi-line comment, sorted, de-overlapped and capped
/// per `context`. Always succeeds; malformed input yields fewer ranges.
pub fn get_folding_ranges(
    document: &StyleSheetDocument,
    context: FoldingContext,
) -> Vec<FoldingRange> {
    let ranges = compute_folding_ranges(document);
    limit_folding_ranges(ranges, context)
}

fn compute_folding_ranges(document: &StyleSheetDocument) -> Vec<FoldingRange> {
    let start_line = |t: &Token| document.line_at(t.offset);
    let end_line = |t: &Token| document.line_at(t.end());

    let mut ranges: Vec<FoldingRange> = Vec::new();
    let mut stack = DelimiterStack::default();

    let dialect = document.dialect();
    let mut scanner = scanner_for(dialect, document.get_text());
    // Region markers live in comments, so comments must be surfaced.
    scanner.set_ignore_comment(false);

    let mut token = scanner.scan();
    let mut prev_token: Option<Token> = None;

    while token.kind != TokenKind::Eof {
        match token.kind {
            // The SCSS interpolation opener nests like an ordinary brace and
            // is closed by an ordinary `}`.
            TokenKind::CurlyL | TokenKind::InterpolationStart => {
                stack.push(Delimiter {
                    line: start_line(&token),
                    kind: DelimiterKind::Brace,
                    is_start: true,
                });
            }
            TokenKind::CurlyR => {
                // A stray closer on an empty stack is ignored entirely.
                if !stack.is_empty()
                    && let Some(open) = stack.pop_nearest(DelimiterKind::Brace)
                {
                    let mut end = end_line(&token);
                    // When the closing brace sits alone on its line, stop the
                    // fold one line short so the brace stays visible. The
                    // exception is a brace trailing its content, for example
                    //   .foo {
                    //     color: red; }
                    // where the fold runs through the brace's own line.
                    if let Some(prev) = &prev_token
                        && end_line(prev) != end
                    {
                        end = end.saturating_sub(1);
                    }
                    if open.line != end {
                        ranges.push(FoldingRange {
                            start_line: open.line,
                            end_line: end,
                            kind: None,
                        });
                    }
                }
            }
            TokenKind::Comment => match classify_comment(&token.text, dialect) {
                Some(RegionMarker::Start) => {
                    stack.push(Delimiter {
                        line: start_line(&token),
                        kind: DelimiterKind::CommentRegion,
                        is_start: true,
                    });
                }
                Some(RegionMarker::End) => {
                    let marker_line = end_line(&token);
                    if let Some(open) = stack.pop_nearest(DelimiterKind::CommentRegion)
                        && open.line != marker_line
                    {
                        ranges.push(FoldingRange {
                            start_line: open.line,
                            end_line: marker_line,
                            kind: Some(FoldingRangeKind::Region),
                        });
                    }
                }
                // A comment that is not a marker folds on its own when it
                // spans multiple lines.
                None => {
                    let (start, end) = (start_line(&token), end_line(&token));
                    if start != end {
                        ranges.push(FoldingRange {
                            start_line: start,
                            end_line: end,
                            kind: Some(FoldingRangeKind::Comment),
                        });
                    }
                }
            },
            _ => {}
        }

        prev_token = Some(token);
        token = scanner.scan();
    }

    // Unmatched openers left on the stack are discarded silently.
    ranges
}

/// Sorts ranges, removes partial overlaps and applies the range limit.
///
/// A range is rejected when it starts inside a previously accepted range but
/// ends beyond it. Proper nesting and disjoint ranges both pass.
fn limit_folding_ranges(
    mut ranges: Vec<FoldingRange>,
    context: FoldingContext,
) -> Vec<FoldingRange> {
    let max_ranges = match context.range_limit {
        Some(n) if n > 0 => n as usize,
        _ => usize::MAX,
    };

    ranges.sort_by(|r1, r2| {
        r1.start_line
            .cmp(&r2.start_line)
            .then(r1.end_line.cmp(&r2.end_line))
    });

    let mut valid_ranges: Vec<FoldingRange> = Vec::new();
    let mut prev_end_line: Option<u32> = None;

    for range in ranges {
        let overlaps = prev_end_line
            .is_some_and(|prev| range.start_line < prev && prev < range.end_line);
        if !overlaps {
            prev_end_line = Some(range.end_line);
            valid_ranges.push(range);
        }
    }

    valid_ranges.truncate(max_ranges);
    valid_ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Dialect;

    fn ranges(dialect: Dialect, text: &str) -> Vec<FoldingRange> {
        let document = StyleSheetDocument::new(text.to_string(), dialect);
        get_folding_ranges(&document, FoldingContext::default())
    }

    fn range(start_line: u32, end_line: u32, kind: Option<FoldingRangeKind>) -> FoldingRange {
        FoldingRange { start_line, end_line, kind }
    }

    #[test]
    fn test_nested_brace_blocks() {
        let text = "@media screen {\n.foo {\n  color: red;\n}\n}";
        assert_eq!(
            ranges(Dialect::Css, text),
            vec![range(0, 3, None), range(1, 2, None)]
        );
    }

    #[test]
    fn test_single_line_rule_yields_nothing() {
        assert!(ranges(Dialect::Css, ".foo { color: red; }").is_empty());
        assert!(ranges(Dialect::Css, "").is_empty());
    }

    #[test]
    fn test_closing_brace_line_adjustment() {
        // Brace alone on its line: the fold stops one line short so the
        // brace remains visible while collapsed.
        let alone = ".foo {\n  color: red;\n}";
        assert_eq!(ranges(Dialect::Css, alone), vec![range(0, 1, None)]);

        // Brace trailing its content: the fold runs through the brace line.
        let trailing = ".foo {\n  color: red; }";
        assert_eq!(ranges(Dialect::Css, trailing), vec![range(0, 1, None)]);
    }

    #[test]
    fn test_multiline_token_before_closing_brace() {
        // The adjustment compares the previous token's end line with the
        // brace's line, even when that token spans several lines.

        // Comment ends on the brace's own line: fold runs through it.
        let same_line = ".foo {\n/* a\nb */ }";
        assert_eq!(
            ranges(Dialect::Css, same_line),
            vec![range(0, 2, None), range(1, 2, Some(FoldingRangeKind::Comment))]
        );

        // Comment ends on the line before the brace: fold stops short.
        let line_before = ".foo {\n/* a\nb */\n}";
        assert_eq!(
            ranges(Dialect::Css, line_before),
            vec![range(0, 2, None), range(1, 2, Some(FoldingRangeKind::Comment))]
        );
    }

    #[test]
    fn test_unbalanced_input_degrades_silently() {
        // Stray closers are ignored, unmatched openers are discarded.
        assert!(ranges(Dialect::Css, "}\n}\n.foo }").is_empty());
        assert!(ranges(Dialect::Css, ".foo {\n.bar {\n").is_empty());

        let partial = ".foo {\n  color: red;\n}\n.bar {\n";
        assert_eq!(ranges(Dialect::Css, partial), vec![range(0, 1, None)]);
    }

    #[test]
    fn test_block_comment_region() {
        let text = "\n\n\n/* #region */\n.foo {}\n.bar {}\n\n\n\n\n/* #endregion */";
        assert_eq!(
            ranges(Dialect::Css, text),
            vec![range(3, 10, Some(FoldingRangeKind::Region))]
        );
    }

    #[test]
    fn test_unterminated_region_yields_nothing() {
        assert!(ranges(Dialect::Css, "/* #region */\n.foo {}\n").is_empty());
        assert!(ranges(Dialect::Css, ".foo {}\n/* #endregion */\n").is_empty());
    }

    #[test]
    fn test_line_comment_region_in_scss_and_less() {
        let text = "// #region\n.foo {}\n// #endregion";
        for dialect in [Dialect::Scss, Dialect::Less] {
            assert_eq!(
                ranges(dialect, text),
                vec![range(0, 2, Some(FoldingRangeKind::Region))],
                "{:?}",
                dialect
            );
        }
    }

    #[test]
    fn test_multiline_comment_folds_as_comment() {
        let text = "/*\n * licence\n */\n.foo {}";
        assert_eq!(
            ranges(Dialect::Css, text),
            vec![range(0, 2, Some(FoldingRangeKind::Comment))]
        );
        // Single-line comments never fold.
        assert!(ranges(Dialect::Css, "/* one line */\n.foo {}").is_empty());
    }

    #[test]
    fn test_region_interleaved_with_braces() {
        // The region opens and closes inside the brace block; each pop must
        // skip entries of the other kind on the stack.
        let text = "@media screen {\n/* #region */\n.foo {\n  color: red;\n}\n/* #endregion */\n}";
        let result = ranges(Dialect::Css, text);
        assert_eq!(
            result,
            vec![
                range(0, 5, None),
                range(1, 5, Some(FoldingRangeKind::Region)),
                range(2, 3, None),
            ]
        );
    }

    #[test]
    fn test_scss_interpolation_counts_as_brace() {
        let text = ".#{\n$name\n} {\n  color: red;\n}";
        let result = ranges(Dialect::Scss, text);
        assert_eq!(result, vec![range(0, 1, None), range(2, 3, None)]);
    }

    #[test]
    fn test_limiter_rejects_partial_overlap() {
        let raw = vec![range(0, 10, None), range(3, 12, None), range(2, 5, None)];
        let result = limit_folding_ranges(raw, FoldingContext::default());
        // {3,12} starts inside {0,10} but ends past it.
        assert_eq!(result, vec![range(0, 10, None), range(2, 5, None)]);
    }

    #[test]
    fn test_range_limit_truncates_after_sort() {
        let text = ".a {\n x\n}\n.b {\n x\n}\n.c {\n x\n}";
        let document = StyleSheetDocument::new(text.to_string(), Dialect::Css);

        let all = get_folding_ranges(&document, FoldingContext::default());
        assert_eq!(all.len(), 3);

        let capped = get_folding_ranges(&document, FoldingContext { range_limit: Some(1) });
        assert_eq!(capped, vec![range(0, 1, None)]);

        // A zero limit means unbounded, like an absent one.
        let zero = get_folding_ranges(&document, FoldingContext { range_limit: Some(0) });
        assert_eq!(zero.len(), 3);
    }

    #[test]
    fn test_deterministic() {
        let text = "@media screen {\n.foo {\n a\n}\n/* #region */\n.bar {\n b\n}\n/* #endregion */\n}";
        let document = StyleSheetDocument::new(text.to_string(), Dialect::Css);
        let first = get_folding_ranges(&document, FoldingContext::default());
        let second = get_folding_ranges(&document, FoldingContext::default());
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }
}
