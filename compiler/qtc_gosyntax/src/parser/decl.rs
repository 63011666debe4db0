//! Source files and declarations.

use super::types::{starts_type, Signature};
use super::{FieldList, PResult, Parser};
use crate::token::{Span, TokenKind};

/// Kind of a top-level declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum DeclKind {
    Import,
    Const,
    Var,
    Type,
    Func,
}

/// A function or method declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FuncDecl {
    pub recv: Option<FieldList>,
    pub name: Span,
    pub has_type_params: bool,
    pub sig: Signature,
    pub has_body: bool,
}

impl Parser<'_> {
    pub(crate) fn parse_file(&mut self) -> PResult<Vec<DeclKind>> {
        self.expect(TokenKind::Package)?;
        let name = self.expect(TokenKind::Ident)?;
        if self.text(name.span) == "_" {
            return Err(self.error_at(name.span.start, "invalid package name _"));
        }
        self.expect_semi()?;

        let mut decls = Vec::new();
        while self.check(TokenKind::Import) {
            self.parse_gen_decl()?;
            decls.push(DeclKind::Import);
        }
        loop {
            let kind = match self.kind() {
                TokenKind::Eof => return Ok(decls),
                TokenKind::Const => DeclKind::Const,
                TokenKind::Var => DeclKind::Var,
                TokenKind::Type => DeclKind::Type,
                TokenKind::Func => {
                    self.parse_func_decl()?;
                    self.expect_semi()?;
                    decls.push(DeclKind::Func);
                    continue;
                }
                TokenKind::Import => {
                    return Err(self.error_here("imports must appear before other declarations"));
                }
                _ => return Err(self.error_expected("declaration")),
            };
            self.parse_gen_decl()?;
            decls.push(kind);
        }
    }

    /// `import`, `const`, `var` or `type`, single or parenthesized group.
    pub(crate) fn parse_gen_decl(&mut self) -> PResult<()> {
        let keyword = self.bump().kind;
        if self.eat(TokenKind::LParen) {
            let mut index = 0;
            while !self.check(TokenKind::RParen) && !self.check(TokenKind::Eof) {
                self.parse_spec(keyword, index)?;
                self.expect_semi()?;
                index += 1;
            }
            self.expect(TokenKind::RParen)?;
        } else {
            self.parse_spec(keyword, 0)?;
        }
        self.expect_semi()
    }

    fn parse_spec(&mut self, keyword: TokenKind, index: usize) -> PResult<()> {
        match keyword {
            TokenKind::Import => self.parse_import_spec(),
            TokenKind::Type => self.parse_type_spec(),
            _ => self.parse_value_spec(keyword, index),
        }
    }

    fn parse_import_spec(&mut self) -> PResult<()> {
        if matches!(self.kind(), TokenKind::Ident | TokenKind::Dot) {
            self.bump();
        }
        match self.kind() {
            TokenKind::Str | TokenKind::RawStr => {
                self.bump();
                Ok(())
            }
            TokenKind::Semi | TokenKind::RParen | TokenKind::Eof => {
                Err(self.error_here("missing import path"))
            }
            _ => Err(self.error_here("import path must be a string")),
        }
    }

    fn parse_value_spec(&mut self, keyword: TokenKind, index: usize) -> PResult<()> {
        let start = self.cur().span.start;
        self.expect(TokenKind::Ident)?;
        while self.eat(TokenKind::Comma) {
            self.expect(TokenKind::Ident)?;
        }
        let has_type = if !self.check(TokenKind::Assign) && starts_type(self.kind()) {
            self.parse_type()?;
            true
        } else {
            false
        };
        let has_values = self.eat(TokenKind::Assign);
        if has_values {
            self.parse_expr_list()?;
        }
        match keyword {
            TokenKind::Const if !has_values && (index == 0 || has_type) => {
                Err(self.error_at(start, "missing init expr for const declaration"))
            }
            TokenKind::Var if !has_values && !has_type => {
                Err(self.error_at(start, "missing variable type or initialization"))
            }
            _ => Ok(()),
        }
    }

    fn parse_type_spec(&mut self) -> PResult<()> {
        self.expect(TokenKind::Ident)?;
        if self.check(TokenKind::LBracket) && self.is_type_param_list() {
            self.parse_type_params()?;
        }
        self.eat(TokenKind::Assign);
        self.parse_type()?;
        Ok(())
    }

    /// After `type Name`, tell `[T any]` from an array length `[N]`.
    fn is_type_param_list(&self) -> bool {
        self.peek(1) == TokenKind::Ident
            && (self.peek(2) == TokenKind::Comma
                || self.peek(2) == TokenKind::Tilde
                || (self.peek(2) == TokenKind::Star && self.peek(3) == TokenKind::Ident)
                || (self.peek(2) != TokenKind::Star && starts_type(self.peek(2))))
    }

    /// `func [(recv)] Name[TypeParams](params) [results] [body]`
    pub(crate) fn parse_func_decl(&mut self) -> PResult<FuncDecl> {
        self.expect(TokenKind::Func)?;
        let recv = if self.check(TokenKind::LParen) {
            Some(self.parse_params()?)
        } else {
            None
        };
        let name = self.expect(TokenKind::Ident)?.span;
        let has_type_params = self.check(TokenKind::LBracket);
        if has_type_params {
            if recv.is_some() {
                return Err(self.error_here("method must have no type parameters"));
            }
            self.parse_type_params()?;
        }
        let sig = self.parse_signature()?;
        let has_body = self.check(TokenKind::LBrace);
        if has_body {
            self.parse_block()?;
        }
        Ok(FuncDecl {
            recv,
            name,
            has_type_params,
            sig,
            has_body,
        })
    }
}
