//! Recursive descent syntax checker for Go.
//!
//! The parser builds no tree. It only keeps the few facts callers need
//! (expression shape, parameter names, declaration kinds) and reports the
//! first syntax error.
//!
//! # Module Structure
//!
//! - `mod.rs`: token cursor and the two entry points
//! - `expr.rs`: operands, primary and binary expressions, composite literals
//! - `types.rs`: type expressions, parameter lists, struct and interface bodies
//! - `stmt.rs`: statements, blocks and control clauses
//! - `decl.rs`: source files and top-level declarations

mod decl;
mod expr;
mod stmt;
mod types;

pub(crate) use decl::DeclKind;
pub(crate) use expr::{Expr, ExprKind};
pub(crate) use types::FieldList;

use crate::error::SyntaxError;
use crate::lexer::lex;
use crate::stack::ensure_sufficient_stack;
use crate::token::{Span, Token, TokenKind};

pub(crate) type PResult<T> = Result<T, SyntaxError>;

/// Deepest nesting Go's own parser accepts.
const MAX_NEST_LEV: u32 = 100_000;

/// Parser state over one lexed source text.
pub(crate) struct Parser<'a> {
    src: &'a str,
    toks: Vec<Token>,
    pos: usize,
    /// Negative inside control clauses, where `T {` opens a block and not a
    /// composite literal.
    expr_lev: i32,
    /// Set while parsing a switch header; `.(type)` is rejected elsewhere.
    guard_ok: bool,
    /// Number of `.(type)` guards parsed so far.
    guards: u32,
    nest_lev: u32,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(src: &'a str) -> PResult<Self> {
        Ok(Parser {
            src,
            toks: lex(src)?,
            pos: 0,
            expr_lev: 0,
            guard_ok: false,
            guards: 0,
            nest_lev: 0,
        })
    }

    // === Cursor ===

    #[inline]
    fn cur(&self) -> Token {
        self.toks[self.pos]
    }

    #[inline]
    fn kind(&self) -> TokenKind {
        self.toks[self.pos].kind
    }

    /// Kind of the token `n` positions ahead; saturates at `Eof`.
    #[inline]
    fn peek(&self, n: usize) -> TokenKind {
        self.toks
            .get(self.pos + n)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    #[inline]
    fn check(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    /// Consume the current token. `Eof` is never consumed.
    fn bump(&mut self) -> Token {
        let tok = self.cur();
        if tok.kind != TokenKind::Eof {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> PResult<Token> {
        if self.check(kind) {
            Ok(self.bump())
        } else {
            Err(self.error_expected(kind.describe()))
        }
    }

    /// End of the last consumed token.
    fn prev_end(&self) -> u32 {
        if self.pos == 0 {
            0
        } else {
            self.toks[self.pos - 1].span.end
        }
    }

    /// Span from `start` to the end of the last consumed token.
    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.prev_end().max(start))
    }

    pub(crate) fn text(&self, span: Span) -> &'a str {
        &self.src[span.to_range()]
    }

    /// A statement ends with `;`, which may be omitted before `)` or `}`.
    fn expect_semi(&mut self) -> PResult<()> {
        match self.kind() {
            TokenKind::RParen | TokenKind::RBrace => Ok(()),
            TokenKind::Semi => {
                self.bump();
                Ok(())
            }
            _ => Err(self.error_here(format!(
                "expected ';', found {}",
                self.cur().describe()
            ))),
        }
    }

    // === Nesting ===

    fn inc_nest_lev(&mut self) -> PResult<()> {
        if self.nest_lev >= MAX_NEST_LEV {
            return Err(self.error_here("exceeded max nesting depth"));
        }
        self.nest_lev += 1;
        Ok(())
    }

    /// Run `f` one nesting level deeper, growing the stack if needed.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        self.inc_nest_lev()?;
        let result = ensure_sufficient_stack(|| f(self));
        self.nest_lev -= 1;
        result
    }

    // === Errors ===

    fn error_here(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::at(self.src, self.cur().span.start as usize, message)
    }

    fn error_at(&self, offset: u32, message: impl Into<String>) -> SyntaxError {
        SyntaxError::at(self.src, offset as usize, message)
    }

    fn error_expected(&self, what: &str) -> SyntaxError {
        self.error_here(format!("expected {what}, found {}", self.cur().describe()))
    }

    // === Entry points ===

    /// Parse a single expression followed by end of input.
    pub(crate) fn parse_expr_source(&mut self) -> PResult<Expr> {
        let expr = self.parse_expr()?;
        self.expect_end()?;
        Ok(expr)
    }

    /// End of input, possibly after the semicolon inserted at a newline.
    pub(crate) fn expect_end(&mut self) -> PResult<()> {
        if self.check(TokenKind::Semi) && self.cur().implicit {
            self.bump();
        }
        self.expect(TokenKind::Eof).map(drop)
    }
}

/// Check `src` as a standalone Go expression.
pub(crate) fn parse_expr_source(src: &str) -> PResult<(Expr, Parser<'_>)> {
    let mut parser = Parser::new(src)?;
    let expr = parser.parse_expr_source()?;
    Ok((expr, parser))
}

/// Check `src` as a Go source file and return its top-level declarations.
pub(crate) fn parse_file(src: &str) -> PResult<Vec<DeclKind>> {
    let mut parser = Parser::new(src)?;
    parser.parse_file()
}
