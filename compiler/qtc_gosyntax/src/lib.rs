//! Go syntax checking for template fragments.
//!
//! Templates embed Go code in many positions: loop clauses, conditions,
//! output expressions, raw statement blocks, top-level declarations. Each is
//! checked here against Go's grammar before the code generator accepts it,
//! so that syntax mistakes are reported against the template instead of the
//! generated file.
//!
//! The checker is a `logos` lexer with Go's semicolon insertion feeding a
//! recursive descent parser that builds no tree. Only syntax is checked;
//! names and types are not resolved.

mod error;
mod lexer;
mod parser;
mod stack;
mod structure;
mod token;
mod validate;

pub use error::SyntaxError;
pub use structure::{
    is_identifier, parse_call, parse_func_header, parse_interface_body, Call, FuncHeader,
    InterfaceElement, Param, Receiver,
};
pub use validate::{FragmentValidator, GoSyntax};
