//! Statement parsing.

use super::{Expr, ExprKind, PResult, Parser};
use crate::token::TokenKind;

/// Where a simple statement appears.
#[derive(Copy, Clone, PartialEq, Eq)]
enum Mode {
    Basic,
    LabelOk,
    RangeOk,
}

/// What a simple statement turned out to be.
enum Simple {
    Expr(Expr),
    Assign {
        define: bool,
        lhs: Vec<Expr>,
        rhs: Vec<Expr>,
    },
    Range,
    /// A labeled statement; the inner statement consumed its own `;`.
    Labeled,
    Other,
}

impl Simple {
    fn is_type_switch_guard(&self) -> bool {
        match self {
            Simple::Expr(x) => x.kind == ExprKind::TypeGuard,
            Simple::Assign {
                define: true,
                lhs,
                rhs,
            } => lhs.len() == 1 && rhs.len() == 1 && rhs[0].kind == ExprKind::TypeGuard,
            _ => false,
        }
    }
}

impl Parser<'_> {
    /// `{ stmt; ... }`
    pub(crate) fn parse_block(&mut self) -> PResult<()> {
        self.expect(TokenKind::LBrace)?;
        let guard_ok = std::mem::replace(&mut self.guard_ok, false);
        let body = self.nested(Self::parse_stmt_list);
        self.guard_ok = guard_ok;
        body?;
        self.expect(TokenKind::RBrace)?;
        Ok(())
    }

    pub(crate) fn parse_stmt_list(&mut self) -> PResult<()> {
        while !matches!(
            self.kind(),
            TokenKind::Case | TokenKind::Default | TokenKind::RBrace | TokenKind::Eof
        ) {
            self.parse_stmt()?;
        }
        Ok(())
    }

    fn parse_stmt(&mut self) -> PResult<()> {
        match self.kind() {
            TokenKind::Const | TokenKind::Var | TokenKind::Type => self.parse_gen_decl(),
            TokenKind::Ident
            | TokenKind::Number
            | TokenKind::Rune
            | TokenKind::Str
            | TokenKind::RawStr
            | TokenKind::Func
            | TokenKind::LParen
            | TokenKind::LBracket
            | TokenKind::Struct
            | TokenKind::Map
            | TokenKind::Chan
            | TokenKind::Interface
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Amp
            | TokenKind::Caret
            | TokenKind::Not
            | TokenKind::Arrow
            | TokenKind::Tilde => {
                if matches!(self.parse_simple_stmt(Mode::LabelOk)?, Simple::Labeled) {
                    return Ok(());
                }
                self.expect_semi()
            }
            TokenKind::Go | TokenKind::Defer => {
                let keyword = self.bump();
                let call = self.parse_expr()?;
                if !matches!(call.unparen().kind, ExprKind::Call { .. }) {
                    return Err(self.error_at(
                        call.span.start,
                        format!(
                            "expression in {} must be function call",
                            self.text(keyword.span)
                        ),
                    ));
                }
                self.expect_semi()
            }
            TokenKind::Return => {
                self.bump();
                if !self.check(TokenKind::Semi) && !self.check(TokenKind::RBrace) {
                    self.parse_expr_list()?;
                }
                self.expect_semi()
            }
            TokenKind::Break | TokenKind::Continue => {
                self.bump();
                self.eat(TokenKind::Ident);
                self.expect_semi()
            }
            TokenKind::Goto => {
                self.bump();
                self.expect(TokenKind::Ident)?;
                self.expect_semi()
            }
            TokenKind::Fallthrough => {
                self.bump();
                self.expect_semi()
            }
            TokenKind::LBrace => {
                self.parse_block()?;
                self.expect_semi()
            }
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::Switch => self.parse_switch_stmt(),
            TokenKind::Select => self.parse_select_stmt(),
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::Semi => {
                self.bump();
                Ok(())
            }
            _ => Err(self.error_expected("statement")),
        }
    }

    fn parse_simple_stmt(&mut self, mode: Mode) -> PResult<Simple> {
        if mode == Mode::RangeOk && self.eat(TokenKind::Range) {
            self.parse_expr()?;
            return Ok(Simple::Range);
        }

        let lhs = self.parse_expr_list()?;
        let kind = self.kind();
        match kind {
            TokenKind::Define => {
                self.bump();
                if let Some(bad) = lhs.iter().find(|x| x.kind != ExprKind::Ident) {
                    return Err(self.error_at(bad.span.start, "non-name on left side of :="));
                }
                self.finish_assign(mode, true, lhs)
            }
            _ if kind.is_assign_op() => {
                self.bump();
                if kind == TokenKind::Assign {
                    self.finish_assign(mode, false, lhs)
                } else {
                    let rhs = self.parse_expr_list()?;
                    Ok(Simple::Assign {
                        define: false,
                        lhs,
                        rhs,
                    })
                }
            }
            TokenKind::Colon
                if mode == Mode::LabelOk && lhs.len() == 1 && lhs[0].kind == ExprKind::Ident =>
            {
                self.bump();
                if !self.check(TokenKind::RBrace) {
                    self.nested(Self::parse_stmt)?;
                }
                Ok(Simple::Labeled)
            }
            TokenKind::Arrow => {
                self.single(&lhs)?;
                self.bump();
                self.parse_expr()?;
                Ok(Simple::Other)
            }
            TokenKind::Inc | TokenKind::Dec => {
                self.single(&lhs)?;
                self.bump();
                Ok(Simple::Other)
            }
            _ => {
                self.single(&lhs)?;
                let mut lhs = lhs;
                Ok(lhs.pop().map_or(Simple::Other, Simple::Expr))
            }
        }
    }

    fn finish_assign(&mut self, mode: Mode, define: bool, lhs: Vec<Expr>) -> PResult<Simple> {
        if mode == Mode::RangeOk && self.eat(TokenKind::Range) {
            self.parse_expr()?;
            return Ok(Simple::Range);
        }
        let rhs = self.parse_expr_list()?;
        Ok(Simple::Assign { define, lhs, rhs })
    }

    fn single(&self, list: &[Expr]) -> PResult<()> {
        match list {
            [_] => Ok(()),
            [_, second, ..] => Err(self.error_at(second.span.start, "expected 1 expression")),
            [] => Err(self.error_expected("expression")),
        }
    }

    fn parse_if_stmt(&mut self) -> PResult<()> {
        self.expect(TokenKind::If)?;
        self.parse_if_header()?;
        self.parse_block()?;
        if !self.eat(TokenKind::Else) {
            return self.expect_semi();
        }
        match self.kind() {
            TokenKind::If => self.nested(Self::parse_if_stmt),
            TokenKind::LBrace => {
                self.parse_block()?;
                self.expect_semi()
            }
            _ => Err(self.error_expected("if statement or block")),
        }
    }

    fn parse_if_header(&mut self) -> PResult<()> {
        if self.check(TokenKind::LBrace) {
            return Err(self.error_here("missing condition in if statement"));
        }
        let prev = std::mem::replace(&mut self.expr_lev, -1);
        let header = self.parse_if_header_inner();
        self.expr_lev = prev;
        header
    }

    fn parse_if_header_inner(&mut self) -> PResult<()> {
        let mut init = None;
        if !self.check(TokenKind::Semi) {
            init = Some(self.parse_simple_stmt(Mode::Basic)?);
        }
        let cond = if self.check(TokenKind::Semi) {
            let semi = self.bump();
            if self.check(TokenKind::LBrace) {
                let message = if semi.implicit {
                    "unexpected newline, expected { after if clause"
                } else {
                    "missing condition in if statement"
                };
                return Err(self.error_at(semi.span.start, message));
            }
            self.parse_simple_stmt(Mode::Basic)?
        } else {
            match init {
                Some(init) => init,
                None => return Err(self.error_here("missing condition in if statement")),
            }
        };
        if !matches!(cond, Simple::Expr(_)) {
            return Err(self.error_here("cannot use assignment as condition"));
        }
        Ok(())
    }

    fn parse_switch_stmt(&mut self) -> PResult<()> {
        self.expect(TokenKind::Switch)?;
        let guards_before = self.guards;
        let prev_lev = std::mem::replace(&mut self.expr_lev, -1);
        let prev_guard = std::mem::replace(&mut self.guard_ok, true);
        let header = self.parse_switch_header();
        self.expr_lev = prev_lev;
        self.guard_ok = prev_guard;
        let tag = header?;

        let type_switch = tag.as_ref().is_some_and(Simple::is_type_switch_guard);
        let guards = self.guards - guards_before;
        if guards > 1 || (guards == 1 && !type_switch) {
            return Err(self.error_here("use of .(type) outside type switch"));
        }
        if matches!(tag, Some(Simple::Assign { .. })) && !type_switch {
            return Err(self.error_here("expected switch expression, found assignment"));
        }

        self.expect(TokenKind::LBrace)?;
        while matches!(self.kind(), TokenKind::Case | TokenKind::Default) {
            self.parse_case_clause(type_switch)?;
        }
        self.expect(TokenKind::RBrace)?;
        self.expect_semi()
    }

    /// Returns the tag statement, if any. A leading init statement is
    /// parsed and dropped.
    fn parse_switch_header(&mut self) -> PResult<Option<Simple>> {
        if self.check(TokenKind::LBrace) {
            return Ok(None);
        }
        let mut tag = None;
        if !self.check(TokenKind::Semi) {
            tag = Some(self.parse_simple_stmt(Mode::Basic)?);
        }
        if self.eat(TokenKind::Semi) {
            tag = None;
            if !self.check(TokenKind::LBrace) {
                tag = Some(self.parse_simple_stmt(Mode::Basic)?);
            }
        }
        Ok(tag)
    }

    fn parse_case_clause(&mut self, type_switch: bool) -> PResult<()> {
        if self.eat(TokenKind::Case) {
            if type_switch {
                self.parse_type()?;
                while self.eat(TokenKind::Comma) {
                    self.parse_type()?;
                }
            } else {
                self.parse_expr_list()?;
            }
        } else {
            self.expect(TokenKind::Default)?;
        }
        self.expect(TokenKind::Colon)?;
        let guard_ok = std::mem::replace(&mut self.guard_ok, false);
        let body = self.parse_stmt_list();
        self.guard_ok = guard_ok;
        body
    }

    fn parse_select_stmt(&mut self) -> PResult<()> {
        self.expect(TokenKind::Select)?;
        self.expect(TokenKind::LBrace)?;
        while matches!(self.kind(), TokenKind::Case | TokenKind::Default) {
            if self.eat(TokenKind::Case) {
                self.parse_simple_stmt(Mode::Basic)?;
            } else {
                self.bump();
            }
            self.expect(TokenKind::Colon)?;
            self.parse_stmt_list()?;
        }
        self.expect(TokenKind::RBrace)?;
        self.expect_semi()
    }

    fn parse_for_stmt(&mut self) -> PResult<()> {
        self.expect(TokenKind::For)?;
        let prev = std::mem::replace(&mut self.expr_lev, -1);
        let header = self.parse_for_header();
        self.expr_lev = prev;
        header?;
        self.parse_block()?;
        self.expect_semi()
    }

    fn parse_for_header(&mut self) -> PResult<()> {
        if self.check(TokenKind::LBrace) {
            return Ok(());
        }
        let mut cond = None;
        if !self.check(TokenKind::Semi) {
            let first = self.parse_simple_stmt(Mode::RangeOk)?;
            if matches!(first, Simple::Range) {
                return Ok(());
            }
            cond = Some(first);
        }
        if self.eat(TokenKind::Semi) {
            // Three-clause loop: the first statement was the init.
            cond = None;
            if !self.check(TokenKind::Semi) {
                if self.check(TokenKind::LBrace) {
                    return Err(self.error_expected("for loop condition"));
                }
                cond = Some(self.parse_simple_stmt(Mode::Basic)?);
            }
            self.expect(TokenKind::Semi)?;
            if !self.check(TokenKind::LBrace) {
                if let Simple::Assign { define: true, .. } = self.parse_simple_stmt(Mode::Basic)? {
                    return Err(self.error_here("cannot declare in post statement of for loop"));
                }
            }
        }
        match cond {
            None | Some(Simple::Expr(_)) => Ok(()),
            Some(_) => Err(self.error_here("expected for loop condition")),
        }
    }
}
