//! Token model and the token-source contract.

use std::fmt;

use crate::ScanError;

/// Token kinds produced by the tokenizer.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    /// Literal template text.
    Text,
    /// Directive name (`func`, `for`, `s`, `=`, ...).
    TagName,
    /// Directive body, possibly empty.
    TagContents,
}

impl TokenKind {
    /// Human-readable name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Text => "text",
            TokenKind::TagName => "tagName",
            TokenKind::TagContents => "tagContents",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 1-based line and column of a token start.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    /// Start of a document.
    pub const START: Position = Position { line: 1, column: 1 };

    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A single token. Immutable once produced.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub pos: Position,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, pos: Position) -> Self {
        Token {
            kind,
            value: value.into(),
            pos,
        }
    }
}

/// Longest token value shown in diagnostics before truncation.
const DISPLAY_LIMIT: usize = 40;

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.chars().count() > DISPLAY_LIMIT {
            let head: String = self.value.chars().take(DISPLAY_LIMIT).collect();
            write!(f, "{} {:?}...", self.kind, head)
        } else {
            write!(f, "{} {:?}", self.kind, self.value)
        }
    }
}

/// Stream of template tokens consumed by the code generator.
///
/// Exactly one level of push-back is supported: after [`rewind`], the next
/// call to [`next`] yields the current token again.
///
/// [`rewind`]: TokenSource::rewind
/// [`next`]: TokenSource::next
pub trait TokenSource {
    /// Advance to the next token. Returns `false` at end of input or on error;
    /// use [`TokenSource::last_error`] to tell the two apart.
    fn next(&mut self) -> bool;

    /// The token produced by the last successful [`TokenSource::next`].
    fn token(&self) -> &Token;

    /// Push the current token back so the next `next()` returns it again.
    fn rewind(&mut self);

    /// Describe the current location for diagnostics.
    fn context(&self) -> String;

    /// The tokenization error that stopped the stream, if any.
    fn last_error(&self) -> Option<&ScanError>;

    /// Path of the document being tokenized.
    fn file_path(&self) -> &str;
}
