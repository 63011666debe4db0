//! Block directives: `func`, `for`, `if` and `switch`.

use std::io::Write;

use qtc_gosyntax::FragmentValidator;
use qtc_scan::{TokenKind, TokenSource};
use tracing::debug;

use super::scope::Frame;
use super::{Parser, Result};
use crate::error::CodegenError;
use crate::signature::FuncSignature;

impl<S: TokenSource, V: FragmentValidator, W: Write> Parser<S, V, W> {
    /// `{% func Name(args) %} ... {% endfunc %}`
    pub(super) fn parse_func(&mut self) -> Result<()> {
        let header = self.expect_contents()?.value;
        let construct = format!("func {header}");
        let sig = FuncSignature::parse(&header)
            .map_err(|err| err.within_at(&construct, self.tokens.context()))?;
        debug!(name = sig.name(), "template function");

        let line = self.line();
        self.emitter.func_start(line, &sig)?;
        self.enter(Frame::Function);
        match self.parse_body(&construct)? {
            Some(tag) if tag.value == "endfunc" => {
                self.skip_contents()?;
                self.leave(Frame::Function);
                let line = self.line();
                self.emitter.func_end(line, &sig)?;
                Ok(())
            }
            Some(tag) => Err(self.unexpected_tag(&construct, &tag)),
            None => Err(self.unterminated(
                &construct,
                format!(
                    "cannot find endfunc tag for {construct:?} at {}",
                    self.tokens.context()
                ),
            )),
        }
    }

    /// `{% for clause %} ... {% endfor %}`
    pub(super) fn parse_for(&mut self) -> Result<()> {
        let clause = self.expect_contents()?.value;
        let construct = format!("for {clause}");
        self.validator.for_clause(&clause).map_err(|err| {
            CodegenError::syntax(
                format!("invalid statement {construct:?} at {}", self.tokens.context()),
                err,
            )
        })?;

        self.print(&format!("for {clause} {{"))?;
        self.enter(Frame::Loop);
        match self.parse_body(&construct)? {
            Some(tag) if tag.value == "endfor" => {
                self.skip_contents()?;
                self.leave(Frame::Loop);
                self.print("}")
            }
            Some(tag) => Err(self.unexpected_tag(&construct, &tag)),
            None => Err(self.unterminated(
                &construct,
                format!(
                    "cannot find endfor tag for {construct:?} at {}",
                    self.tokens.context()
                ),
            )),
        }
    }

    /// `{% if cond %} ... {% elseif cond %} ... {% else %} ... {% endif %}`
    pub(super) fn parse_if(&mut self) -> Result<()> {
        let cond = self.expect_contents()?.value;
        if cond.is_empty() {
            return Err(CodegenError::grammar(format!(
                "empty if condition at {}",
                self.tokens.context()
            )));
        }
        let construct = format!("if {cond}");
        self.check_condition(&construct, &cond)?;

        self.print(&format!("if {cond} {{"))?;
        self.enter(Frame::Conditional);
        let mut else_seen = false;
        loop {
            let Some(tag) = self.parse_body(&construct)? else {
                return Err(self.unterminated(
                    &construct,
                    format!(
                        "cannot find endif tag for {construct:?} at {}",
                        self.tokens.context()
                    ),
                ));
            };
            match tag.value.as_str() {
                "endif" => {
                    self.skip_contents()?;
                    self.leave(Frame::Conditional);
                    return self.print("}");
                }
                "else" => {
                    if else_seen {
                        return Err(CodegenError::grammar(format!(
                            "duplicate else branch found for {construct:?} at {}",
                            self.tokens.context()
                        )));
                    }
                    self.skip_contents()?;
                    self.next_branch("} else {")?;
                    else_seen = true;
                }
                "elseif" => {
                    if else_seen {
                        return Err(CodegenError::grammar(format!(
                            "unexpected elseif branch found after else branch for {construct:?} at {}",
                            self.tokens.context()
                        )));
                    }
                    let cond = self.expect_contents()?.value;
                    if cond.is_empty() {
                        return Err(CodegenError::grammar(format!(
                            "empty elseif condition at {}",
                            self.tokens.context()
                        )));
                    }
                    self.check_condition(&format!("elseif {cond}"), &cond)?;
                    self.next_branch(&format!("}} else if {cond} {{"))?;
                }
                _ => return Err(self.unexpected_tag(&construct, &tag)),
            }
        }
    }

    fn check_condition(&self, construct: &str, cond: &str) -> Result<()> {
        self.validator.if_condition(cond).map_err(|err| {
            CodegenError::syntax(
                format!("invalid statement {construct:?} at {}", self.tokens.context()),
                err,
            )
        })
    }

    /// Close the current branch and open the next one at the same level.
    fn next_branch(&mut self, opener: &str) -> Result<()> {
        self.leave(Frame::Conditional);
        self.print(opener)?;
        self.enter(Frame::Conditional);
        Ok(())
    }

    /// `{% switch selector %} {% case ... %} ... {% default %} ... {% endswitch %}`
    pub(super) fn parse_switch(&mut self) -> Result<()> {
        let selector = self.expect_contents()?.value;
        let construct = format!("switch {selector}");
        self.validator.switch_selector(&selector).map_err(|err| {
            CodegenError::syntax(
                format!("invalid statement {construct:?} at {}", self.tokens.context()),
                err,
            )
        })?;

        self.print(&format!("switch {selector} {{"))?;
        self.enter(Frame::Switch);
        let mut cases = 0usize;
        let mut default_seen = false;
        while let Some(tok) = self.advance() {
            match tok.kind {
                TokenKind::Text if cases == 0 => {
                    let comment = tok.value.trim_start();
                    if !comment.is_empty() {
                        self.emitter.comment(comment)?;
                    }
                }
                TokenKind::Text => {
                    let line = self.line();
                    self.emitter.text(line, &tok.value)?;
                }
                TokenKind::TagName => match tok.value.as_str() {
                    "endswitch" => {
                        if cases == 0 {
                            return Err(CodegenError::grammar(format!(
                                "empty statement {construct:?} found at {}",
                                self.tokens.context()
                            )));
                        }
                        self.skip_contents()?;
                        self.leave(Frame::Switch);
                        return self.print("}");
                    }
                    "case" => {
                        cases += 1;
                        self.parse_case().map_err(|err| err.within(&construct))?;
                    }
                    "default" => {
                        if default_seen {
                            return Err(CodegenError::grammar(format!(
                                "duplicate default tag found in {construct:?} at {}",
                                self.tokens.context()
                            )));
                        }
                        default_seen = true;
                        cases += 1;
                        self.parse_default().map_err(|err| err.within(&construct))?;
                    }
                    _ => return Err(self.unexpected_tag(&construct, &tok)),
                },
                TokenKind::TagContents => {
                    return Err(CodegenError::grammar(format!(
                        "unexpected token found when parsing {construct:?}: {tok} at {}",
                        self.tokens.context()
                    )))
                }
            }
        }
        Err(self.unterminated(
            &construct,
            format!(
                "cannot find endswitch tag for {construct:?} at {}",
                self.tokens.context()
            ),
        ))
    }

    /// `{% case list %}`. The body has no end tag of its own: it ends at
    /// the first tag the shared set does not handle, which is pushed back
    /// for the enclosing switch.
    fn parse_case(&mut self) -> Result<()> {
        let list = self.expect_contents()?.value;
        let construct = format!("case {list}");
        self.validator.case_list(&list).map_err(|err| {
            CodegenError::syntax(
                format!("invalid statement {construct:?} at {}", self.tokens.context()),
                err,
            )
        })?;
        self.print(&format!("case {list}:"))?;
        self.parse_case_body(&construct)
    }

    /// `{% default %}`, ending like a case.
    fn parse_default(&mut self) -> Result<()> {
        self.skip_contents()?;
        self.print("default:")?;
        self.parse_case_body("default")
    }

    fn parse_case_body(&mut self, construct: &str) -> Result<()> {
        self.enter(Frame::SwitchCase);
        if self.parse_body(construct)?.is_none() {
            return Err(self.unterminated(
                construct,
                format!(
                    "cannot find end of {construct:?} at {}",
                    self.tokens.context()
                ),
            ));
        }
        self.tokens.rewind();
        self.leave(Frame::SwitchCase);
        Ok(())
    }
}
