//! In-memory style sheet documents.
//!
//! A [`StyleSheetDocument`] pairs the raw source text with its dialect and a
//! precomputed line-start table, so byte offsets produced by the scanner can
//! be mapped to `(line, column)` positions in constant-ish time.

/// The style sheet dialect a document is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Css,
    Scss,
    Less,
}

impl Dialect {
    /// Maps an LSP language identifier to a dialect.
    /// Unknown identifiers fall back to plain CSS.
    pub fn from_language_id(id: &str) -> Dialect {
        match id {
            "scss" => Dialect::Scss,
            "less" => Dialect::Less,
            _ => Dialect::Css,
        }
    }

    /// Whether the dialect supports `//` line comments.
    pub fn has_line_comments(self) -> bool {
        matches!(self, Dialect::Scss | Dialect::Less)
    }
}

/// A zero-based line/column position. Columns are counted in UTF-16 code
/// units, matching the LSP wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

/// A style sheet held in memory, with offset-to-position lookup.
#[derive(Debug, Clone)]
pub struct StyleSheetDocument {
    text: String,
    dialect: Dialect,
    line_starts: Vec<usize>,
}

impl StyleSheetDocument {
    pub fn new(text: String, dialect: Dialect) -> StyleSheetDocument {
        let line_starts = compute_line_starts(&text);
        StyleSheetDocument { text, dialect, line_starts }
    }

    pub fn get_text(&self) -> &str {
        &self.text
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Replaces the document content, keeping the dialect. Used for full-text
    /// synchronization.
    pub fn update(&mut self, text: String) {
        self.line_starts = compute_line_starts(&text);
        self.text = text;
    }

    /// Maps a byte offset to a position. Offsets past the end of the text
    /// clamp to the final position; offsets inside a multi-byte character
    /// clamp to that character's start.
    pub fn position_at(&self, offset: usize) -> Position {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let character = self.text[self.line_starts[line]..offset]
            .chars()
            .map(|c| c.len_utf16() as u32)
            .sum();
        Position { line: line as u32, character }
    }

    /// Maps a byte offset to its zero-based line number.
    pub fn line_at(&self, offset: usize) -> u32 {
        let offset = offset.min(self.text.len());
        (self.line_starts.partition_point(|&start| start <= offset) - 1) as u32
    }
}

fn compute_line_starts(text: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, b) in text.bytes().enumerate() {
        if b == b'\n' {
            starts.push(i + 1);
        }
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_lookup() {
        let doc = StyleSheetDocument::new(".a {\n  color: red;\n}\n".to_string(), Dialect::Css);

        let cases = vec![
            (0, 0, 0),  // start of document
            (3, 0, 3),  // the opening brace
            (5, 1, 0),  // first char of second line
            (14, 1, 9), // inside "red"
            (19, 2, 0), // the closing brace
        ];
        for (offset, line, character) in cases {
            let pos = doc.position_at(offset);
            assert_eq!(pos, Position { line, character }, "offset {}", offset);
        }

        // Past-the-end offsets clamp instead of panicking.
        assert_eq!(doc.position_at(1000).line, 3);
    }

    #[test]
    fn test_utf16_columns() {
        let doc = StyleSheetDocument::new("/* 🔔 */ .a {}".to_string(), Dialect::Css);
        // The bell emoji is 4 bytes but 2 UTF-16 units.
        let brace_offset = doc.get_text().find('{').unwrap();
        assert_eq!(doc.position_at(brace_offset).character, 12);
    }

    #[test]
    fn test_offset_inside_multibyte_char() {
        let doc = StyleSheetDocument::new("a🔔b".to_string(), Dialect::Css);
        // Offsets 2..5 land inside the emoji and clamp to its start.
        for offset in 2..5 {
            assert_eq!(doc.position_at(offset), doc.position_at(1), "offset {}", offset);
        }
        assert_eq!(doc.position_at(5).character, 3);
    }

    #[test]
    fn test_dialect_fallback() {
        assert_eq!(Dialect::from_language_id("scss"), Dialect::Scss);
        assert_eq!(Dialect::from_language_id("less"), Dialect::Less);
        assert_eq!(Dialect::from_language_id("css"), Dialect::Css);
        assert_eq!(Dialect::from_language_id("sass"), Dialect::Css);
    }
}
