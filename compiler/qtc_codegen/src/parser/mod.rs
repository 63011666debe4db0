//! Directive parser.
//!
//! A recursive descent over the template token stream. Each block
//! directive has a handler that validates its Go fragment, emits the
//! opening statement, parses the body through the shared directive set and
//! emits the close when it sees its end tag.
//!
//! # Module Structure
//!
//! - `mod.rs`: parser state, token helpers and the document level
//! - `blocks.rs`: `func`, `for`, `if`, `switch`, `case`, `default`
//! - `tags.rs`: directives allowed in every block body
//! - `decl.rs`: document-level `interface`, `import` and `code`
//! - `scope.rs`: the stack of open blocks

mod blocks;
mod decl;
mod scope;
mod tags;

use std::io::Write;

use qtc_gosyntax::FragmentValidator;
use qtc_scan::{Token, TokenKind, TokenSource};
use tracing::{debug, trace};

use crate::emitter::Emitter;
use crate::error::CodegenError;
use crate::options::CompileOptions;
use scope::{Frame, ScopeStack};

pub(crate) type Result<T> = std::result::Result<T, CodegenError>;

/// Compiles one template document.
///
/// Generic over where tokens come from, how Go fragments are checked and
/// where the output goes. One parser handles exactly one document.
pub struct Parser<S, V, W: Write> {
    tokens: S,
    validator: V,
    emitter: Emitter<W>,
    scopes: ScopeStack,
    package_name: String,
}

impl<S: TokenSource, V: FragmentValidator, W: Write> Parser<S, V, W> {
    pub fn new(tokens: S, validator: V, out: W, options: &CompileOptions) -> Self {
        let line_file = options
            .line_comments
            .then(|| tokens.file_path().to_string());
        Parser {
            tokens,
            validator,
            emitter: Emitter::new(out, line_file),
            scopes: ScopeStack::default(),
            package_name: options.package_name.clone(),
        }
    }

    /// The output sink. Only complete when [`Parser::parse_template`]
    /// succeeded.
    pub fn into_inner(self) -> W {
        self.emitter.into_inner()
    }

    /// Parse the whole document and emit the generated Go file.
    pub fn parse_template(&mut self) -> Result<()> {
        debug!(file = self.tokens.file_path(), "compiling template");
        let file_path = self.tokens.file_path().to_string();
        let package = self.package_name.clone();
        self.emitter.banner(self.line(), &file_path, &package)?;

        while let Some(tok) = self.advance() {
            match tok.kind {
                TokenKind::Text => self.emitter.comment(&tok.value)?,
                TokenKind::TagName if tok.value == "import" => {
                    if self.emitter.prologue_emitted() {
                        return Err(CodegenError::grammar(format!(
                            "imports must be at the top of the template. Found at {}",
                            self.tokens.context()
                        )));
                    }
                    self.parse_import()?;
                }
                TokenKind::TagName => {
                    self.emitter.prologue(self.line())?;
                    match tok.value.as_str() {
                        "interface" | "iface" => self.parse_interface()?,
                        "code" => self.parse_template_code()?,
                        "func" => self.parse_func()?,
                        name => {
                            return Err(CodegenError::grammar(format!(
                                "unexpected tag found outside func: {name:?} at {}",
                                self.tokens.context()
                            )))
                        }
                    }
                }
                TokenKind::TagContents => {
                    return Err(CodegenError::grammar(format!(
                        "unexpected token found {tok} outside func at {}",
                        self.tokens.context()
                    )))
                }
            }
        }
        if let Some(err) = self.tokens.last_error() {
            return Err(CodegenError::Scan(err.clone()));
        }
        self.emitter.prologue(self.line())?;
        debug_assert_eq!(self.scopes.depth(), 0);
        Ok(())
    }

    // === Tokens ===

    /// Move to the next token and return a copy of it.
    fn advance(&mut self) -> Option<Token> {
        if self.tokens.next() {
            Some(self.tokens.token().clone())
        } else {
            None
        }
    }

    /// Template line of the current token.
    fn line(&self) -> u32 {
        self.tokens.token().pos.line
    }

    /// Read the contents token that follows every tag name.
    fn expect_contents(&mut self) -> Result<Token> {
        let Some(tok) = self.advance() else {
            return Err(match self.tokens.last_error() {
                Some(err) => CodegenError::Scan(err.clone()),
                None => CodegenError::grammar(format!(
                    "cannot find token {}: unexpected end of input",
                    TokenKind::TagContents
                )),
            });
        };
        if tok.kind != TokenKind::TagContents {
            return Err(CodegenError::grammar(format!(
                "unexpected token found {tok}. Expecting {} at {}",
                TokenKind::TagContents,
                self.tokens.context()
            )));
        }
        Ok(tok)
    }

    fn skip_contents(&mut self) -> Result<()> {
        self.expect_contents().map(drop)
    }

    /// Error for input that ended inside `construct`. A tokenizer failure
    /// takes precedence over the missing end tag.
    fn unterminated(&self, construct: &str, message: String) -> CodegenError {
        match self.tokens.last_error() {
            Some(err) => CodegenError::Scan(err.clone()).within(construct),
            None => CodegenError::grammar(message),
        }
    }

    fn unexpected_tag(&self, construct: &str, tag: &Token) -> CodegenError {
        CodegenError::grammar(format!(
            "unexpected tag found in {construct:?}: {:?} at {}",
            tag.value,
            self.tokens.context()
        ))
    }

    // === Emission ===

    fn print(&mut self, text: &str) -> Result<()> {
        let line = self.line();
        self.emitter.line(line, text)?;
        Ok(())
    }

    fn enter(&mut self, frame: Frame) {
        trace!(?frame, depth = self.scopes.depth(), "enter scope");
        self.scopes.push(frame);
        self.emitter.set_indent(self.scopes.indent());
    }

    fn leave(&mut self, frame: Frame) {
        self.scopes.pop(frame);
        self.emitter.set_indent(self.scopes.indent());
        trace!(?frame, depth = self.scopes.depth(), "leave scope");
    }

    // === Block bodies ===

    /// Parse a block body up to the first tag the shared directive set does
    /// not handle, and return that tag with its contents still unread.
    /// Returns `None` at end of input.
    fn parse_body(&mut self, construct: &str) -> Result<Option<Token>> {
        while let Some(tok) = self.advance() {
            match tok.kind {
                TokenKind::Text => {
                    let line = self.line();
                    self.emitter.text(line, &tok.value)?;
                }
                TokenKind::TagName => {
                    trace!(tag = %tok.value, construct, "directive");
                    if !self
                        .try_parse_common_tags(&tok)
                        .map_err(|err| err.within(construct))?
                    {
                        return Ok(Some(tok));
                    }
                }
                TokenKind::TagContents => {
                    return Err(CodegenError::grammar(format!(
                        "unexpected token found when parsing {construct:?}: {tok} at {}",
                        self.tokens.context()
                    )))
                }
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests;
