//! Template tokenizer for the quicktemplate compiler.
//!
//! Splits a template document into three kinds of tokens:
//! - `Text`: literal bytes between tags
//! - `TagName`: the directive name right after `{%`
//! - `TagContents`: everything after the name up to `%}`, trimmed
//!
//! The [`TokenSource`] trait is the contract the code generator consumes.
//! [`Scanner`] is the reference implementation; it also resolves the
//! tokenizer-level tags (`plain`, `comment`, `stripspace`, `collapsespace`,
//! `space`, `newline`) so they never reach the parser.

mod error;
mod scanner;
mod token;
mod whitespace;

pub use error::ScanError;
pub use scanner::Scanner;
pub use token::{Position, Token, TokenKind, TokenSource};
pub use whitespace::{collapse_space, strip_space};
