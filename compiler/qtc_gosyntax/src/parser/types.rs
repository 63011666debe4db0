//! Type parsing: named and literal types, signatures, parameter lists,
//! struct and interface bodies, type parameters.

use super::{Expr, ExprKind, PResult, Parser};
use crate::token::{Span, TokenKind};

/// One parameter group: `a, b int` has two names and one type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Field {
    pub names: Vec<Span>,
    pub ty: Span,
    pub variadic: bool,
}

/// A parenthesized parameter or result list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FieldList {
    pub fields: Vec<Field>,
    /// Between the parentheses, exclusive.
    pub inner: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Signature {
    pub params: FieldList,
    pub has_results: bool,
}

/// Element of an interface body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct InterfaceElem {
    pub span: Span,
    pub is_method: bool,
}

/// A parameter entry before grouping is resolved.
enum ParamItem {
    /// A lone identifier: a name in a named list, a type otherwise.
    Bare(Span),
    Named { name: Span, ty: Span, variadic: bool },
    Type { ty: Span, variadic: bool },
}

pub(crate) fn starts_type(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident
            | TokenKind::LBracket
            | TokenKind::Struct
            | TokenKind::Map
            | TokenKind::Star
            | TokenKind::Func
            | TokenKind::Interface
            | TokenKind::Chan
            | TokenKind::Arrow
            | TokenKind::LParen
    )
}

impl Parser<'_> {
    pub(crate) fn parse_type(&mut self) -> PResult<Expr> {
        self.nested(Self::parse_type_inner)
    }

    fn parse_type_inner(&mut self) -> PResult<Expr> {
        let start = self.cur().span.start;
        let kind = match self.kind() {
            TokenKind::Ident => return self.parse_type_name(),
            TokenKind::LBracket => {
                self.bump();
                if self.check(TokenKind::Ellipsis) && self.peek(1) == TokenKind::RBracket {
                    self.bump();
                } else if !self.check(TokenKind::RBracket) {
                    self.expr_lev += 1;
                    let len = self.parse_expr();
                    self.expr_lev -= 1;
                    len?;
                }
                self.expect(TokenKind::RBracket)?;
                self.parse_type()?;
                ExprKind::LiteralType
            }
            TokenKind::Struct => {
                self.parse_struct_type()?;
                ExprKind::LiteralType
            }
            TokenKind::Map => {
                self.bump();
                self.expect(TokenKind::LBracket)?;
                self.parse_type()?;
                self.expect(TokenKind::RBracket)?;
                self.parse_type()?;
                ExprKind::LiteralType
            }
            TokenKind::Star => {
                self.bump();
                self.parse_type()?;
                ExprKind::Type
            }
            TokenKind::Func => {
                self.bump();
                self.parse_signature()?;
                ExprKind::Type
            }
            TokenKind::Interface => {
                self.parse_interface_type()?;
                ExprKind::Type
            }
            TokenKind::Chan => {
                self.bump();
                self.eat(TokenKind::Arrow);
                self.parse_type()?;
                ExprKind::Type
            }
            TokenKind::Arrow => {
                self.bump();
                self.expect(TokenKind::Chan)?;
                self.parse_type()?;
                ExprKind::Type
            }
            TokenKind::LParen => {
                self.bump();
                let inner = self.parse_type()?;
                self.expect(TokenKind::RParen)?;
                return Ok(inner.into_paren(self.span_from(start)));
            }
            _ => return Err(self.error_expected("type")),
        };
        Ok(Expr::new(kind, self.span_from(start)))
    }

    /// `T`, `pkg.T`, optionally instantiated: `T[int]`.
    fn parse_type_name(&mut self) -> PResult<Expr> {
        let ident = self.expect(TokenKind::Ident)?.span;
        let mut x = Expr::new(ExprKind::Ident, ident);
        if self.check(TokenKind::Dot) {
            self.bump();
            let sel = self.expect(TokenKind::Ident)?.span;
            x = Expr::new(
                ExprKind::Selector {
                    base: x.span,
                    sel,
                },
                Span::new(ident.start, sel.end),
            );
        }
        if self.check(TokenKind::LBracket) {
            self.parse_type_args()?;
            x = Expr::new(ExprKind::Index, self.span_from(ident.start));
        }
        Ok(x)
    }

    fn parse_type_args(&mut self) -> PResult<()> {
        self.expect(TokenKind::LBracket)?;
        loop {
            self.parse_type()?;
            if !self.eat(TokenKind::Comma) || self.check(TokenKind::RBracket) {
                break;
            }
        }
        self.expect(TokenKind::RBracket)?;
        Ok(())
    }

    /// Parameters and an optional result list or single result type.
    pub(crate) fn parse_signature(&mut self) -> PResult<Signature> {
        let params = self.parse_params()?;
        let has_results = if self.check(TokenKind::LParen) {
            !self.parse_params()?.fields.is_empty()
        } else if starts_type(self.kind()) {
            self.parse_type()?;
            true
        } else {
            false
        };
        Ok(Signature {
            params,
            has_results,
        })
    }

    pub(crate) fn parse_params(&mut self) -> PResult<FieldList> {
        let open = self.expect(TokenKind::LParen)?;
        let mut items = Vec::new();
        while !self.check(TokenKind::RParen) && !self.check(TokenKind::Eof) {
            items.push(self.parse_param_item()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        let close = self.expect(TokenKind::RParen)?;
        let fields = self.group_params(items)?;
        Ok(FieldList {
            fields,
            inner: Span::new(open.span.end, close.span.start),
        })
    }

    fn parse_param_item(&mut self) -> PResult<ParamItem> {
        match self.kind() {
            TokenKind::Ellipsis => {
                let start = self.bump().span.start;
                self.parse_type()?;
                Ok(ParamItem::Type {
                    ty: self.span_from(start),
                    variadic: true,
                })
            }
            TokenKind::Ident => match self.peek(1) {
                TokenKind::Dot => {
                    let ty = self.parse_type()?.span;
                    Ok(ParamItem::Type {
                        ty,
                        variadic: false,
                    })
                }
                TokenKind::LBracket => self.parse_array_param_or_instance(),
                TokenKind::Ellipsis => {
                    let name = self.bump().span;
                    let start = self.bump().span.start;
                    self.parse_type()?;
                    Ok(ParamItem::Named {
                        name,
                        ty: self.span_from(start),
                        variadic: true,
                    })
                }
                next if starts_type(next) => {
                    let name = self.bump().span;
                    let ty = self.parse_type()?.span;
                    Ok(ParamItem::Named {
                        name,
                        ty,
                        variadic: false,
                    })
                }
                _ => Ok(ParamItem::Bare(self.bump().span)),
            },
            _ => {
                let ty = self.parse_type()?.span;
                Ok(ParamItem::Type {
                    ty,
                    variadic: false,
                })
            }
        }
    }

    /// `a []T` and `a [N]T` name a parameter; `T[int]` is an instantiated type.
    fn parse_array_param_or_instance(&mut self) -> PResult<ParamItem> {
        let name = self.bump().span;
        if matches!(self.peek(1), TokenKind::RBracket | TokenKind::Ellipsis) {
            let ty = self.parse_type()?.span;
            return Ok(ParamItem::Named {
                name,
                ty,
                variadic: false,
            });
        }
        let bracket = self.expect(TokenKind::LBracket)?.span.start;
        self.expr_lev += 1;
        let inner = self.parse_expr_list();
        self.expr_lev -= 1;
        let count = inner?.len();
        self.eat(TokenKind::Comma);
        self.expect(TokenKind::RBracket)?;
        if count == 1 && starts_type(self.kind()) {
            self.parse_type()?;
            return Ok(ParamItem::Named {
                name,
                ty: self.span_from(bracket),
                variadic: false,
            });
        }
        Ok(ParamItem::Type {
            ty: self.span_from(name.start),
            variadic: false,
        })
    }

    /// Resolve `a, b int, c string` into groups. Either every entry is
    /// named or none is.
    fn group_params(&self, items: Vec<ParamItem>) -> PResult<Vec<Field>> {
        let named = items
            .iter()
            .any(|item| matches!(item, ParamItem::Named { .. }));
        let mut fields = Vec::new();
        if named {
            let mut pending = Vec::new();
            for item in items {
                match item {
                    ParamItem::Bare(name) => pending.push(name),
                    ParamItem::Named { name, ty, variadic } => {
                        pending.push(name);
                        fields.push(Field {
                            names: std::mem::take(&mut pending),
                            ty,
                            variadic,
                        });
                    }
                    ParamItem::Type { ty, .. } => {
                        return Err(self.error_at(ty.start, "mixed named and unnamed parameters"));
                    }
                }
            }
            if let Some(name) = pending.first() {
                return Err(self.error_at(name.start, "mixed named and unnamed parameters"));
            }
        } else {
            for item in items {
                let (ty, variadic) = match item {
                    ParamItem::Bare(ty) => (ty, false),
                    ParamItem::Type { ty, variadic } | ParamItem::Named { ty, variadic, .. } => {
                        (ty, variadic)
                    }
                };
                fields.push(Field {
                    names: Vec::new(),
                    ty,
                    variadic,
                });
            }
        }

        let last = fields.len().saturating_sub(1);
        for (i, field) in fields.iter().enumerate() {
            if field.variadic && (i != last || field.names.len() > 1) {
                return Err(self.error_at(
                    field.ty.start,
                    "can only use ... with final parameter in list",
                ));
            }
        }
        Ok(fields)
    }

    fn parse_struct_type(&mut self) -> PResult<()> {
        self.expect(TokenKind::Struct)?;
        self.expect(TokenKind::LBrace)?;
        while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
            self.parse_field_decl()?;
            self.expect_semi()?;
        }
        self.expect(TokenKind::RBrace)?;
        Ok(())
    }

    fn parse_field_decl(&mut self) -> PResult<()> {
        match self.kind() {
            TokenKind::Star => {
                self.bump();
                self.parse_type_name()?;
            }
            TokenKind::Ident => match self.peek(1) {
                TokenKind::Dot
                | TokenKind::Semi
                | TokenKind::RBrace
                | TokenKind::Str
                | TokenKind::RawStr => {
                    self.parse_type_name()?;
                }
                _ => {
                    self.expect(TokenKind::Ident)?;
                    while self.eat(TokenKind::Comma) {
                        self.expect(TokenKind::Ident)?;
                    }
                    self.parse_type()?;
                }
            },
            _ => return Err(self.error_expected("field name or embedded type")),
        }
        if matches!(self.kind(), TokenKind::Str | TokenKind::RawStr) {
            self.bump();
        }
        Ok(())
    }

    pub(crate) fn parse_interface_type(&mut self) -> PResult<Vec<InterfaceElem>> {
        self.expect(TokenKind::Interface)?;
        self.expect(TokenKind::LBrace)?;
        let mut elems = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
            let start = self.cur().span.start;
            let is_method = self.check(TokenKind::Ident) && self.peek(1) == TokenKind::LParen;
            if is_method {
                self.bump();
                self.parse_signature()?;
            } else {
                self.parse_constraint()?;
            }
            elems.push(InterfaceElem {
                span: self.span_from(start),
                is_method,
            });
            self.expect_semi()?;
        }
        self.expect(TokenKind::RBrace)?;
        Ok(elems)
    }

    /// `~int | string | fmt.Stringer`
    fn parse_constraint(&mut self) -> PResult<()> {
        loop {
            self.eat(TokenKind::Tilde);
            self.parse_type()?;
            if !self.eat(TokenKind::Pipe) {
                return Ok(());
            }
        }
    }

    /// `[K comparable, V any]` or `[T, U ~int | ~string]`.
    pub(crate) fn parse_type_params(&mut self) -> PResult<()> {
        self.expect(TokenKind::LBracket)?;
        loop {
            self.expect(TokenKind::Ident)?;
            while self.eat(TokenKind::Comma) {
                self.expect(TokenKind::Ident)?;
            }
            self.parse_constraint()?;
            if !self.eat(TokenKind::Comma) || self.check(TokenKind::RBracket) {
                break;
            }
        }
        self.expect(TokenKind::RBracket)?;
        Ok(())
    }
}
