//! Directives shared by every block body.

use std::io::Write;

use qtc_gosyntax::FragmentValidator;
use qtc_scan::{Token, TokenSource};
use tracing::trace;

use super::{Parser, Result};
use crate::error::CodegenError;
use crate::signature::{FuncSignature, STREAM_WRITER};
use crate::stack::ensure_sufficient_stack;

/// Tags that end a dead region. They belong to an enclosing block and are
/// pushed back for it.
const REGION_TERMINATORS: &[&str] = &[
    "endfunc",
    "endfor",
    "endif",
    "else",
    "elseif",
    "case",
    "default",
    "endswitch",
];

/// Output filter selected by an output tag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Filter {
    /// HTML-escaped output.
    Escaped,
    /// Output written as is.
    Unescaped,
}

impl Filter {
    fn accessor(self) -> &'static str {
        match self {
            Filter::Escaped => "E()",
            Filter::Unescaped => "N()",
        }
    }
}

/// Filter for an output tag with any `=` suffix removed, or `None` if the
/// name is not an output tag.
pub(crate) fn output_filter(tag: &str) -> Option<Filter> {
    match tag {
        "s" | "v" | "q" | "z" | "j" | "sz" | "qz" | "jz" => Some(Filter::Escaped),
        "d" | "f" | "u" | "uz" => Some(Filter::Unescaped),
        _ => None,
    }
}

/// Split the precision off an `f.N` tag name.
///
/// `f.2` and `f.2=` give `("f", Some(2))`; `f.` gives precision 0. Any
/// other name is returned unchanged with no precision.
pub(crate) fn split_tag_name_prec(tag: &str) -> (&str, Option<usize>) {
    if let Some(prec) = tag.strip_prefix("f.") {
        let prec = prec.strip_suffix('=').unwrap_or(prec);
        if prec.is_empty() {
            return ("f", Some(0));
        }
        if let Ok(prec) = prec.parse::<usize>() {
            return ("f", Some(prec));
        }
    }
    (tag, None)
}

impl<S: TokenSource, V: FragmentValidator, W: Write> Parser<S, V, W> {
    /// Handle `tag` if it belongs to the shared directive set.
    ///
    /// Returns `false`, leaving the tag contents unread, for tags that
    /// belong to an enclosing block.
    pub(super) fn try_parse_common_tags(&mut self, tag: &Token) -> Result<bool> {
        let (name, prec) = split_tag_name_prec(&tag.value);
        let base = name.strip_suffix('=').unwrap_or(name);
        if let Some(filter) = output_filter(base) {
            self.parse_output(base, filter, prec)?;
            return Ok(true);
        }
        match name {
            "=" => self.parse_call()?,
            "return" => self.skip_after_terminal("return")?,
            "break" => {
                if self.scopes.loop_depth() == 0 && self.scopes.switch_depth() == 0 {
                    return Err(CodegenError::grammar(format!(
                        "found break tag outside for loop and switch block at {}",
                        self.tokens.context()
                    )));
                }
                self.skip_after_terminal("break")?;
            }
            "continue" => {
                if self.scopes.loop_depth() == 0 {
                    return Err(CodegenError::grammar(format!(
                        "found continue tag outside for loop at {}",
                        self.tokens.context()
                    )));
                }
                self.skip_after_terminal("continue")?;
            }
            "code" => self.parse_func_code()?,
            "for" => ensure_sufficient_stack(|| self.parse_for())?,
            "if" => ensure_sufficient_stack(|| self.parse_if())?,
            "switch" => ensure_sufficient_stack(|| self.parse_switch())?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// `{% s expr %}` and the other output tags.
    fn parse_output(&mut self, tag: &str, filter: Filter, prec: Option<usize>) -> Result<()> {
        let expr = self.expect_contents()?.value;
        self.validator.output_expr(&expr).map_err(|err| {
            CodegenError::syntax(
                format!("invalid output tag value at {}", self.tokens.context()),
                err,
            )
        })?;
        let stmt = match prec {
            Some(prec) if tag == "f" => format!("{STREAM_WRITER}.N().FPrec({expr}, {prec})"),
            _ => format!(
                "{STREAM_WRITER}.{}.{}({expr})",
                filter.accessor(),
                tag.to_uppercase()
            ),
        };
        self.print(&stmt)
    }

    /// `{% = Func(args) %}` streams another template function inline.
    fn parse_call(&mut self) -> Result<()> {
        let call = self.expect_contents()?.value;
        let sig = FuncSignature::parse_call(&call)
            .map_err(|err| err.within_at(&format!("= {call}"), self.tokens.context()))?;
        self.print(&sig.call_stream(STREAM_WRITER))
    }

    /// `{% code %}` inside a function: Go statements emitted verbatim.
    fn parse_func_code(&mut self) -> Result<()> {
        let code = self.expect_contents()?.value;
        self.validator.func_code(&code).map_err(|err| {
            CodegenError::syntax(format!("invalid code at {}", self.tokens.context()), err)
        })?;
        self.print(&format!("{code}\n"))
    }

    /// Emit a terminal statement, then parse and validate everything up to
    /// the end of the enclosing block without emitting it.
    fn skip_after_terminal(&mut self, keyword: &str) -> Result<()> {
        self.skip_contents()?;
        self.print(keyword)?;

        self.emitter.suppress();
        trace!(keyword, "dead region start");
        let end = self.parse_body(keyword);
        self.emitter.resume();
        trace!(keyword, "dead region end");

        match end? {
            Some(tag) if REGION_TERMINATORS.contains(&tag.value.as_str()) => {
                self.tokens.rewind();
                Ok(())
            }
            Some(tag) => Err(CodegenError::grammar(format!(
                "unexpected tag found after {keyword:?}: {:?} at {}",
                tag.value,
                self.tokens.context()
            ))),
            None => Err(self.unterminated(
                keyword,
                format!(
                    "cannot find closing tag after {keyword:?} at {}",
                    self.tokens.context()
                ),
            )),
        }
    }
}
