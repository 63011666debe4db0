//! Expression parsing.
//!
//! Types are expressions in Go (`[]int{1}`, `map[K]V(nil)`, `*T`), so the
//! operand parser falls through to the type parser for every token that
//! can start a type.

use super::{PResult, Parser};
use crate::token::{Span, TokenKind};

/// The shape of a parsed expression, kept only as far as callers need it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ExprKind {
    Ident,
    BasicLit,
    Selector {
        base: Span,
        sel: Span,
    },
    Call {
        /// Never a call or parenthesized expression itself.
        fun: Box<Expr>,
        /// Between the parentheses, exclusive.
        args: Span,
    },
    /// Index expression or generic instantiation.
    Index,
    /// Holds the innermost expression; nested parentheses are collapsed.
    Paren(Box<Expr>),
    /// `[N]T`, `[]T`, `map[K]V` or `struct{...}`; may head a composite literal.
    LiteralType,
    /// Any other type literal.
    Type,
    /// `x.(type)`, legal only in a type switch header.
    TypeGuard,
    Other,
}

impl Expr {
    pub(crate) fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    /// Strip any number of enclosing parentheses.
    pub(crate) fn unparen(&self) -> &Expr {
        let mut e = self;
        while let ExprKind::Paren(inner) = &e.kind {
            e = inner;
        }
        e
    }

    /// Wrap in parentheses, collapsing any the expression already has.
    pub(crate) fn into_paren(self, span: Span) -> Expr {
        let mut inner = self;
        loop {
            match inner.kind {
                ExprKind::Paren(e) => inner = *e,
                kind => {
                    inner = Expr::new(kind, inner.span);
                    break;
                }
            }
        }
        Expr::new(ExprKind::Paren(Box::new(inner)), span)
    }

    /// Keep only what a callee's shape needs, so call chains stay flat.
    fn into_callee(self) -> Expr {
        match self.kind {
            ExprKind::Call { .. } | ExprKind::Paren(_) => Expr::new(ExprKind::Other, self.span),
            _ => self,
        }
    }
}

impl Parser<'_> {
    /// Parse an expression (or a type, where Go allows one).
    pub(crate) fn parse_expr(&mut self) -> PResult<Expr> {
        self.nested(|p| p.parse_binary(1))
    }

    pub(crate) fn parse_expr_list(&mut self) -> PResult<Vec<Expr>> {
        let mut list = vec![self.parse_expr()?];
        while self.eat(TokenKind::Comma) {
            list.push(self.parse_expr()?);
        }
        Ok(list)
    }

    /// Precedence climbing over Go's five binary levels.
    fn parse_binary(&mut self, min_prec: u8) -> PResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let prec = self.kind().precedence();
            if prec < min_prec {
                return Ok(left);
            }
            self.bump();
            let right = self.parse_binary(prec + 1)?;
            left = Expr::new(ExprKind::Other, left.span.merge(right.span));
        }
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        match self.kind() {
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Not
            | TokenKind::Caret
            | TokenKind::Amp
            | TokenKind::Star
            | TokenKind::Tilde
            | TokenKind::Arrow => {
                let start = self.bump().span.start;
                let operand = self.nested(Self::parse_unary)?;
                Ok(Expr::new(
                    ExprKind::Other,
                    Span::new(start, operand.span.end),
                ))
            }
            _ => self.parse_primary(),
        }
    }

    /// Every selector, index, call or literal suffix counts as one level
    /// of nesting, as in Go's parser.
    fn parse_primary(&mut self) -> PResult<Expr> {
        let depth = self.nest_lev;
        let result = self.parse_primary_suffixes();
        self.nest_lev = depth;
        result
    }

    fn parse_primary_suffixes(&mut self) -> PResult<Expr> {
        let mut x = self.parse_operand()?;
        loop {
            if matches!(
                self.kind(),
                TokenKind::Dot | TokenKind::LBracket | TokenKind::LParen | TokenKind::LBrace
            ) {
                self.inc_nest_lev()?;
            }
            x = match self.kind() {
                TokenKind::Dot => self.parse_selector_or_assertion(x)?,
                TokenKind::LBracket => self.parse_index_or_slice(x)?,
                TokenKind::LParen => self.parse_call(x)?,
                TokenKind::LBrace if self.is_literal_head(&x) => {
                    self.parse_literal_value()?;
                    Expr::new(ExprKind::Other, self.span_from(x.span.start))
                }
                _ => return Ok(x),
            };
        }
    }

    fn parse_operand(&mut self) -> PResult<Expr> {
        let tok = self.cur();
        match tok.kind {
            TokenKind::Ident => {
                self.bump();
                Ok(Expr::new(ExprKind::Ident, tok.span))
            }
            kind if kind.is_literal() => {
                self.bump();
                Ok(Expr::new(ExprKind::BasicLit, tok.span))
            }
            TokenKind::LParen => {
                self.bump();
                self.expr_lev += 1;
                let inner = self.parse_expr();
                self.expr_lev -= 1;
                let inner = inner?;
                self.expect(TokenKind::RParen)?;
                Ok(inner.into_paren(self.span_from(tok.span.start)))
            }
            TokenKind::Func => self.parse_func_type_or_lit(),
            TokenKind::LBracket
            | TokenKind::Struct
            | TokenKind::Map
            | TokenKind::Chan
            | TokenKind::Interface => self.parse_type(),
            _ => Err(self.error_expected("operand")),
        }
    }

    fn parse_func_type_or_lit(&mut self) -> PResult<Expr> {
        let start = self.expect(TokenKind::Func)?.span.start;
        self.parse_signature()?;
        if !self.check(TokenKind::LBrace) {
            return Ok(Expr::new(ExprKind::Type, self.span_from(start)));
        }
        self.expr_lev += 1;
        let body = self.parse_block();
        self.expr_lev -= 1;
        body?;
        Ok(Expr::new(ExprKind::Other, self.span_from(start)))
    }

    fn parse_selector_or_assertion(&mut self, x: Expr) -> PResult<Expr> {
        self.expect(TokenKind::Dot)?;
        match self.kind() {
            TokenKind::Ident => {
                let sel = self.bump().span;
                let span = Span::new(x.span.start, sel.end);
                Ok(Expr::new(
                    ExprKind::Selector { base: x.span, sel },
                    span,
                ))
            }
            TokenKind::LParen => {
                self.bump();
                if self.check(TokenKind::Type) {
                    let at = self.bump().span.start;
                    self.expect(TokenKind::RParen)?;
                    if !self.guard_ok {
                        return Err(self.error_at(at, "use of .(type) outside type switch"));
                    }
                    self.guards += 1;
                    return Ok(Expr::new(
                        ExprKind::TypeGuard,
                        self.span_from(x.span.start),
                    ));
                }
                self.parse_type()?;
                self.expect(TokenKind::RParen)?;
                Ok(Expr::new(ExprKind::Other, self.span_from(x.span.start)))
            }
            _ => Err(self.error_expected("selector or type assertion")),
        }
    }

    fn parse_index_or_slice(&mut self, x: Expr) -> PResult<Expr> {
        self.expect(TokenKind::LBracket)?;
        self.expr_lev += 1;
        let result = self.parse_index_or_slice_inner();
        self.expr_lev -= 1;
        result?;
        self.expect(TokenKind::RBracket)?;
        Ok(Expr::new(ExprKind::Index, self.span_from(x.span.start)))
    }

    fn parse_index_or_slice_inner(&mut self) -> PResult<()> {
        let mut first = false;
        if !self.check(TokenKind::Colon) {
            self.parse_expr()?;
            first = true;
        }
        if first && self.check(TokenKind::Comma) {
            // Instantiation with several type arguments.
            while self.eat(TokenKind::Comma) {
                if self.check(TokenKind::RBracket) {
                    break;
                }
                self.parse_type()?;
            }
            return Ok(());
        }

        let mut colons = 0;
        let mut present = [first, false, false];
        while self.check(TokenKind::Colon) && colons < 2 {
            self.bump();
            colons += 1;
            if !self.check(TokenKind::Colon) && !self.check(TokenKind::RBracket) {
                self.parse_expr()?;
                present[colons] = true;
            }
        }
        if colons == 2 {
            if !present[1] {
                return Err(self.error_here("middle index required in 3-index slice"));
            }
            if !present[2] {
                return Err(self.error_here("final index required in 3-index slice"));
            }
        }
        Ok(())
    }

    fn parse_call(&mut self, fun: Expr) -> PResult<Expr> {
        let lparen = self.expect(TokenKind::LParen)?;
        self.expr_lev += 1;
        let result = self.parse_call_args();
        self.expr_lev -= 1;
        result?;
        let rparen = self.expect(TokenKind::RParen)?;
        let args = Span::new(lparen.span.end, rparen.span.start);
        let span = Span::new(fun.span.start, rparen.span.end);
        Ok(Expr::new(
            ExprKind::Call {
                fun: Box::new(fun.into_callee()),
                args,
            },
            span,
        ))
    }

    fn parse_call_args(&mut self) -> PResult<()> {
        while !self.check(TokenKind::RParen) && !self.check(TokenKind::Eof) {
            self.parse_expr()?;
            if self.eat(TokenKind::Ellipsis) && !self.check(TokenKind::RParen) {
                self.expect(TokenKind::Comma)?;
                break;
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        Ok(())
    }

    /// Whether `x {` continues `x` as a composite literal. Inside control
    /// clauses a bare type name before `{` belongs to the statement instead.
    fn is_literal_head(&self, x: &Expr) -> bool {
        match x.unparen().kind {
            ExprKind::Ident | ExprKind::Selector { .. } | ExprKind::Index => self.expr_lev >= 0,
            ExprKind::LiteralType => true,
            _ => false,
        }
    }

    /// `{ [key:] value, ... }`, where values may themselves be bare `{...}`.
    pub(crate) fn parse_literal_value(&mut self) -> PResult<()> {
        self.expect(TokenKind::LBrace)?;
        self.expr_lev += 1;
        let result = self.parse_literal_elements();
        self.expr_lev -= 1;
        result?;
        self.expect(TokenKind::RBrace)?;
        Ok(())
    }

    fn parse_literal_elements(&mut self) -> PResult<()> {
        while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
            self.parse_element()?;
            if self.eat(TokenKind::Colon) {
                self.parse_element()?;
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        Ok(())
    }

    fn parse_element(&mut self) -> PResult<()> {
        if self.check(TokenKind::LBrace) {
            self.nested(Self::parse_literal_value)
        } else {
            self.parse_expr().map(drop)
        }
    }
}
