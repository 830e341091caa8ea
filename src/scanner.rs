//! Style sheet tokenizers.
//!
//! The folding engine does not need a full CSS grammar, only a stream of
//! positioned tokens in which braces, comments, strings and the SCSS
//! interpolation opener are distinguished from everything else. Strings are
//! scanned as units so a `{` inside a quoted value never reaches the
//! delimiter matcher. Each dialect gets its own scanner type behind the
//! [`TokenSource`] trait; the matcher is written once against the trait.

use crate::document::Dialect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `{`
    CurlyL,
    /// `}`
    CurlyR,
    /// `#{` (SCSS interpolation opener, closed by an ordinary `}`)
    InterpolationStart,
    /// `/* ... */`, or `// ...` in SCSS/LESS
    Comment,
    /// A single- or double-quoted string
    Str,
    /// A run of uninteresting non-whitespace characters
    Word,
    /// A single punctuation character not starting any construct above
    Delim,
    /// End of input
    Eof,
}

/// A scanned token. Offsets and lengths are in bytes into the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
    pub len: usize,
    pub text: String,
}

impl Token {
    /// Byte offset one past the last character of the token.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// The capability the folding engine consumes: produce the next token, or an
/// [`TokenKind::Eof`] sentinel once the input is exhausted.
pub trait TokenSource {
    fn scan(&mut self) -> Token;

    /// When `true` (the default), comments are skipped as trivia. The folding
    /// engine turns this off because comment tokens carry region markers.
    fn set_ignore_comment(&mut self, ignore: bool);
}

/// Returns the scanner for a dialect. SCSS adds `//` comments and the `#{`
/// interpolation opener; LESS adds `//` comments only.
pub fn scanner_for(dialect: Dialect, source: &str) -> Box<dyn TokenSource + '_> {
    match dialect {
        Dialect::Scss => Box::new(ScssScanner::new(source)),
        Dialect::Less => Box::new(LessScanner::new(source)),
        Dialect::Css => Box::new(CssScanner::new(source)),
    }
}

pub struct CssScanner<'a>(Scanner<'a>);

impl<'a> CssScanner<'a> {
    pub fn new(source: &'a str) -> CssScanner<'a> {
        CssScanner(Scanner::new(source, false, false))
    }
}

impl TokenSource for CssScanner<'_> {
    fn scan(&mut self) -> Token {
        self.0.scan()
    }

    fn set_ignore_comment(&mut self, ignore: bool) {
        self.0.ignore_comment = ignore;
    }
}

pub struct ScssScanner<'a>(Scanner<'a>);

impl<'a> ScssScanner<'a> {
    pub fn new(source: &'a str) -> ScssScanner<'a> {
        ScssScanner(Scanner::new(source, true, true))
    }
}

impl TokenSource for ScssScanner<'_> {
    fn scan(&mut self) -> Token {
        self.0.scan()
    }

    fn set_ignore_comment(&mut self, ignore: bool) {
        self.0.ignore_comment = ignore;
    }
}

pub struct LessScanner<'a>(Scanner<'a>);

impl<'a> LessScanner<'a> {
    pub fn new(source: &'a str) -> LessScanner<'a> {
        LessScanner(Scanner::new(source, true, false))
    }
}

impl TokenSource for LessScanner<'_> {
    fn scan(&mut self) -> Token {
        self.0.scan()
    }

    fn set_ignore_comment(&mut self, ignore: bool) {
        self.0.ignore_comment = ignore;
    }
}

/// Shared scanning state. The dialect-specific wrappers only differ in the
/// two feature flags.
struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    line_comments: bool,
    interpolation: bool,
    ignore_comment: bool,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str, line_comments: bool, interpolation: bool) -> Scanner<'a> {
        Scanner { source, pos: 0, line_comments, interpolation, ignore_comment: true }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn looking_at(&self, s: &str) -> bool {
        self.source[self.pos..].starts_with(s)
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            offset: start,
            len: self.pos - start,
            text: self.source[start..self.pos].to_string(),
        }
    }

    fn scan(&mut self) -> Token {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.bump();
            }

            let start = self.pos;
            let Some(ch) = self.peek() else {
                return Token {
                    kind: TokenKind::Eof,
                    offset: self.pos,
                    len: 0,
                    text: String::new(),
                };
            };

            match ch {
                '{' => {
                    self.bump();
                    return self.token(TokenKind::CurlyL, start);
                }
                '}' => {
                    self.bump();
                    return self.token(TokenKind::CurlyR, start);
                }
                '"' | '\'' => {
                    self.scan_string(ch);
                    return self.token(TokenKind::Str, start);
                }
                '/' if self.looking_at("/*") => {
                    self.scan_block_comment();
                    if self.ignore_comment {
                        continue;
                    }
                    return self.token(TokenKind::Comment, start);
                }
                '/' if self.line_comments && self.looking_at("//") => {
                    self.scan_line_comment();
                    if self.ignore_comment {
                        continue;
                    }
                    return self.token(TokenKind::Comment, start);
                }
                '#' if self.interpolation && self.looking_at("#{") => {
                    self.bump();
                    self.bump();
                    return self.token(TokenKind::InterpolationStart, start);
                }
                _ => {
                    self.bump();
                    if ch.is_alphanumeric() || !ch.is_ascii() || "-_@#$.".contains(ch) {
                        while self.peek().is_some_and(|c| !self.is_boundary(c)) {
                            self.bump();
                        }
                        return self.token(TokenKind::Word, start);
                    }
                    return self.token(TokenKind::Delim, start);
                }
            }
        }
    }

    fn is_boundary(&self, c: char) -> bool {
        c.is_whitespace()
            || matches!(c, '{' | '}' | '"' | '\'' | '/' | ';' | ':' | ',' | '(' | ')')
            || (self.interpolation && c == '#')
    }

    /// Consumes a quoted string. Backslash escapes the next character.
    /// An unescaped newline or end of input terminates the scan without
    /// consuming the newline; malformed strings are not an error here.
    fn scan_string(&mut self, quote: char) {
        self.bump();
        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.bump();
                    self.bump();
                }
                '\n' => break,
                _ => {
                    self.bump();
                    if c == quote {
                        break;
                    }
                }
            }
        }
    }

    /// Consumes `/* ... */`, running to end of input if unterminated.
    fn scan_block_comment(&mut self) {
        self.bump();
        self.bump();
        while self.peek().is_some() {
            if self.looking_at("*/") {
                self.bump();
                self.bump();
                break;
            }
            self.bump();
        }
    }

    /// Consumes `// ...` up to (not including) the line break.
    fn scan_line_comment(&mut self) {
        while self.peek().is_some_and(|c| c != '\n') {
            self.bump();
        }
    }
}
