//! Reference tokenizer for `{% name contents %}` templates.
//!
//! The scanner works over an in-memory document. Tag delimiters are located
//! with `memchr::memmem`; line starts are indexed once up front so token
//! positions are a binary search away.
//!
//! Tokenizer-level tags are resolved here:
//! - `plain ... endplain` yields its body as one verbatim text token
//! - `comment ... endcomment` is dropped
//! - `stripspace`/`collapsespace` blocks rewrite the text they enclose
//! - `space`/`newline` yield a single-character text token

use std::collections::VecDeque;

use memchr::memmem;
use tracing::trace;

use crate::whitespace::{collapse_space, strip_space};
use crate::{Position, ScanError, Token, TokenKind, TokenSource};

const TAG_OPEN: &[u8] = b"{%";
const TAG_CLOSE: &[u8] = b"%}";

/// A tag split into its name and trimmed contents.
struct RawTag<'a> {
    name: &'a str,
    contents: &'a str,
    /// Byte offset right after the closing `%}`.
    end: usize,
}

/// Why a tag could not be read.
enum TagFault {
    Unclosed,
    EmptyName,
}

/// Tokenizer over a single template document.
pub struct Scanner<'a> {
    src: &'a str,
    file_path: String,
    offset: usize,
    /// Byte offset of the first byte of every line.
    line_starts: Vec<usize>,
    queue: VecDeque<Token>,
    current: Token,
    rewound: bool,
    error: Option<ScanError>,
    strip_depth: u32,
    collapse_depth: u32,
}

impl<'a> Scanner<'a> {
    /// Create a scanner over `src`. `file_path` is used in diagnostics and
    /// line directives only.
    pub fn new(src: &'a str, file_path: impl Into<String>) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(memchr::memchr_iter(b'\n', src.as_bytes()).map(|i| i + 1));
        Scanner {
            src,
            file_path: file_path.into(),
            offset: 0,
            line_starts,
            queue: VecDeque::new(),
            current: Token::new(TokenKind::Text, "", Position::START),
            rewound: false,
            error: None,
            strip_depth: 0,
            collapse_depth: 0,
        }
    }

    /// Line and column of a byte offset.
    fn position(&self, offset: usize) -> Position {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let line_start = self.line_starts[line_idx];
        let column = self.src[line_start..offset].chars().count() + 1;
        Position::new(
            u32::try_from(line_idx + 1).unwrap_or(u32::MAX),
            u32::try_from(column).unwrap_or(u32::MAX),
        )
    }

    /// Read the tag starting at `start` (which must point at `{%`).
    fn parse_tag(src: &'a str, start: usize) -> Result<RawTag<'a>, TagFault> {
        let body_start = start + TAG_OPEN.len();
        let close = memmem::find(&src.as_bytes()[body_start..], TAG_CLOSE).ok_or(TagFault::Unclosed)?;
        let body = src[body_start..body_start + close].trim_start();
        let name_len = body.find(char::is_whitespace).unwrap_or(body.len());
        let (name, contents) = body.split_at(name_len);
        if name.is_empty() {
            return Err(TagFault::EmptyName);
        }
        Ok(RawTag {
            name,
            contents: contents.trim(),
            end: body_start + close + TAG_CLOSE.len(),
        })
    }

    /// Find the next `{% end_name %}` tag at or after `from`.
    ///
    /// Returns the offsets of the tag start and of the byte after it.
    fn find_end_tag(&self, from: usize, end_name: &str) -> Option<(usize, usize)> {
        let src = self.src;
        let mut at = from;
        while let Some(n) = memmem::find(&src.as_bytes()[at..], TAG_OPEN) {
            let start = at + n;
            match Self::parse_tag(src, start) {
                Ok(tag) if tag.name == end_name => return Some((start, tag.end)),
                Ok(_) | Err(TagFault::EmptyName) => at = start + TAG_OPEN.len(),
                Err(TagFault::Unclosed) => return None,
            }
        }
        None
    }

    /// Queue at least one token, unless the input is exhausted.
    fn fill(&mut self) -> Result<(), ScanError> {
        while self.queue.is_empty() && self.offset < self.src.len() {
            let rest = &self.src.as_bytes()[self.offset..];
            let rest_len = rest.len();
            match memmem::find(rest, TAG_OPEN) {
                Some(0) => self.scan_tag()?,
                Some(n) => self.scan_text(n),
                None => self.scan_text(rest_len),
            }
        }
        Ok(())
    }

    fn scan_text(&mut self, len: usize) {
        let start = self.offset;
        let raw = &self.src[start..start + len];
        self.offset += len;
        let text = if self.strip_depth > 0 {
            strip_space(raw)
        } else if self.collapse_depth > 0 {
            collapse_space(raw)
        } else {
            raw.to_string()
        };
        if !text.is_empty() {
            let pos = self.position(start);
            self.queue.push_back(Token::new(TokenKind::Text, text, pos));
        }
    }

    fn scan_tag(&mut self) -> Result<(), ScanError> {
        let start = self.offset;
        let pos = self.position(start);
        let tag = Self::parse_tag(self.src, start).map_err(|fault| match fault {
            TagFault::Unclosed => ScanError::UnclosedTag {
                file: self.file_path.clone(),
                pos,
            },
            TagFault::EmptyName => ScanError::EmptyTagName {
                file: self.file_path.clone(),
                pos,
            },
        })?;
        self.offset = tag.end;

        match tag.name {
            "plain" => {
                let (inner_end, after) = self.find_block_end(tag.end, "plain", "endplain", pos)?;
                let body = &self.src[tag.end..inner_end];
                if !body.is_empty() {
                    let body_pos = self.position(tag.end);
                    self.queue.push_back(Token::new(TokenKind::Text, body, body_pos));
                }
                self.offset = after;
            }
            "comment" => {
                let (_, after) = self.find_block_end(tag.end, "comment", "endcomment", pos)?;
                self.offset = after;
            }
            "stripspace" => self.strip_depth += 1,
            "endstripspace" => {
                if self.strip_depth == 0 {
                    return Err(self.unmatched("endstripspace", "stripspace", pos));
                }
                self.strip_depth -= 1;
            }
            "collapsespace" => self.collapse_depth += 1,
            "endcollapsespace" => {
                if self.collapse_depth == 0 {
                    return Err(self.unmatched("endcollapsespace", "collapsespace", pos));
                }
                self.collapse_depth -= 1;
            }
            "space" => self.queue.push_back(Token::new(TokenKind::Text, " ", pos)),
            "newline" => self.queue.push_back(Token::new(TokenKind::Text, "\n", pos)),
            name => {
                self.queue.push_back(Token::new(TokenKind::TagName, name, pos));
                self.queue
                    .push_back(Token::new(TokenKind::TagContents, tag.contents, pos));
            }
        }
        Ok(())
    }

    fn find_block_end(
        &self,
        from: usize,
        start: &'static str,
        end: &'static str,
        pos: Position,
    ) -> Result<(usize, usize), ScanError> {
        self.find_end_tag(from, end)
            .ok_or_else(|| ScanError::UnterminatedBlock {
                start,
                end,
                file: self.file_path.clone(),
                pos,
            })
    }

    fn unmatched(&self, tag: &'static str, open: &'static str, pos: Position) -> ScanError {
        ScanError::UnmatchedEnd {
            tag,
            open,
            file: self.file_path.clone(),
            pos,
        }
    }
}

impl TokenSource for Scanner<'_> {
    fn next(&mut self) -> bool {
        if self.rewound {
            self.rewound = false;
            return true;
        }
        if self.error.is_some() {
            return false;
        }
        if let Err(err) = self.fill() {
            trace!(%err, "tokenization failed");
            self.error = Some(err);
            return false;
        }
        match self.queue.pop_front() {
            Some(token) => {
                trace!(token = %token, pos = %token.pos, "next token");
                self.current = token;
                true
            }
            None => false,
        }
    }

    fn token(&self) -> &Token {
        &self.current
    }

    fn rewind(&mut self) {
        debug_assert!(!self.rewound, "only one token of push-back is supported");
        self.rewound = true;
    }

    fn context(&self) -> String {
        format!(
            "file {:?}, line {}, pos {}, token {}",
            self.file_path, self.current.pos.line, self.current.pos.column, self.current
        )
    }

    fn last_error(&self) -> Option<&ScanError> {
        self.error.as_ref()
    }

    fn file_path(&self) -> &str {
        &self.file_path
    }
}

#[cfg(test)]
mod tests;
