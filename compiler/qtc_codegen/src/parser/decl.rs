//! Document-level directives other than `func`.

use std::io::Write;

use qtc_gosyntax::{is_identifier, parse_interface_body, FragmentValidator};
use qtc_scan::TokenSource;
use tracing::debug;

use super::scope::Frame;
use super::{Parser, Result};
use crate::error::CodegenError;
use crate::signature::FuncSignature;

impl<S: TokenSource, V: FragmentValidator, W: Write> Parser<S, V, W> {
    /// `{% import "pkg" %}`, only allowed before anything else.
    pub(super) fn parse_import(&mut self) -> Result<()> {
        let imports = self.expect_contents()?.value;
        if imports.is_empty() {
            return Err(CodegenError::grammar(format!(
                "empty import found at {}",
                self.tokens.context()
            )));
        }
        self.validator.import_list(&imports).map_err(|err| {
            CodegenError::syntax(format!("invalid import found at {}", self.tokens.context()), err)
        })?;
        self.print(&format!("import {imports}\n"))
    }

    /// `{% code %}` at document level: Go declarations emitted verbatim.
    pub(super) fn parse_template_code(&mut self) -> Result<()> {
        let code = self.expect_contents()?.value;
        self.validator.template_code(&code).map_err(|err| {
            CodegenError::syntax(format!("invalid code at {}", self.tokens.context()), err)
        })?;
        self.print(&format!("{code}\n"))
    }

    /// `{% interface Page { Title() Body(n int) } %}`
    ///
    /// Each method is declared in its string, streaming and buffered forms
    /// so a value of the interface can be rendered through any of them.
    pub(super) fn parse_interface(&mut self) -> Result<()> {
        let decl = self.expect_contents()?.value;
        let Some(brace) = decl.find('{') else {
            return Err(CodegenError::grammar(format!(
                "missing '{{' in interface at {}",
                self.tokens.context()
            )));
        };
        let name = decl[..brace].trim_end();
        if name.is_empty() {
            return Err(CodegenError::grammar(format!(
                "missing interface name at {}",
                self.tokens.context()
            )));
        }
        if !is_identifier(name) {
            return Err(CodegenError::grammar(format!(
                "invalid interface name {name:?} at {}",
                self.tokens.context()
            )));
        }
        let construct = format!("interface {decl}");
        let elements = parse_interface_body(&decl[brace..]).map_err(|err| {
            CodegenError::syntax(
                format!("error when parsing interface at {}", self.tokens.context()),
                err,
            )
        })?;
        if elements.is_empty() {
            return Err(CodegenError::grammar(format!(
                "interface must contain at least one method at {}",
                self.tokens.context()
            )));
        }
        debug!(name, methods = elements.len(), "template interface");

        let mut methods = Vec::with_capacity(elements.len());
        for elem in elements {
            if !elem.is_method {
                return Err(CodegenError::grammar(format!(
                    "interface {name:?} cannot embed {:?} at {}",
                    elem.text,
                    self.tokens.context()
                )));
            }
            let sig = FuncSignature::parse(&elem.text)
                .map_err(|err| err.within_at(&construct, self.tokens.context()))?;
            methods.push((elem.text, sig));
        }

        self.print(&format!("type {name} interface {{"))?;
        self.enter(Frame::Interface);
        let line = self.line();
        for (text, sig) in &methods {
            self.emitter.interface_method(line, text, sig)?;
        }
        self.leave(Frame::Interface);
        self.print("}")
    }
}
