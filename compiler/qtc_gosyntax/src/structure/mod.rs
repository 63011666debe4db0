//! Structural views of Go fragments.
//!
//! These entry points check a fragment and hand back the pieces the code
//! generator rewrites: function headers, call expressions and interface
//! bodies.

use crate::error::SyntaxError;
use crate::lexer::lex;
use crate::parser::{parse_expr_source, ExprKind, Parser};
use crate::token::TokenKind;

/// Method receiver of a function header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receiver {
    /// Text between the receiver parentheses, e.g. `p *Page`.
    pub text: String,
    /// Receiver names, in order. Empty for an anonymous receiver.
    pub names: Vec<String>,
    /// Number of receiver groups.
    pub groups: usize,
}

/// One declared parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    /// `None` for a type-only parameter such as the `int` in `func(int)`.
    pub name: Option<String>,
    pub variadic: bool,
}

/// A function header such as `(p *Page) Body(w int, xs ...string)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FuncHeader {
    pub receiver: Option<Receiver>,
    pub name: String,
    pub params: Vec<Param>,
    /// Text between the parameter parentheses, verbatim.
    pub params_text: String,
    pub has_results: bool,
    pub has_type_params: bool,
}

/// A call expression split around its callee name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Call {
    /// Everything before the callee name, including the trailing dot
    /// (`p.` in `p.Body(1)`); empty for a plain identifier.
    pub prefix: String,
    pub name: String,
    /// Text between the call parentheses, trimmed.
    pub args: String,
}

/// An element of an interface body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceElement {
    pub text: String,
    pub is_method: bool,
}

/// Parse a function header, the text after `func` in a declaration.
///
/// A body is not allowed. Results, type parameters and unnamed
/// parameters are reported in the returned header; callers decide which
/// of them they accept.
pub fn parse_func_header(header: &str) -> Result<FuncHeader, SyntaxError> {
    let src = format!("func {header}");
    let mut parser = Parser::new(&src)?;
    let decl = parser.parse_func_decl()?;
    if decl.has_body {
        return Err(SyntaxError::general("unexpected function body"));
    }
    parser.expect_end()?;

    let receiver = decl.recv.as_ref().map(|recv| Receiver {
        text: parser.text(recv.inner).trim().to_string(),
        names: recv
            .fields
            .iter()
            .flat_map(|f| f.names.iter().map(|&n| parser.text(n).to_string()))
            .collect(),
        groups: recv.fields.len(),
    });

    let params = decl
        .sig
        .params
        .fields
        .iter()
        .flat_map(|field| {
            let names: Vec<Option<String>> = if field.names.is_empty() {
                vec![None]
            } else {
                field
                    .names
                    .iter()
                    .map(|&n| Some(parser.text(n).to_string()))
                    .collect()
            };
            names.into_iter().map(move |name| Param {
                name,
                variadic: field.variadic,
            })
        })
        .collect();

    Ok(FuncHeader {
        receiver,
        name: parser.text(decl.name).to_string(),
        params,
        params_text: parser.text(decl.sig.params.inner).to_string(),
        has_results: decl.sig.has_results,
        has_type_params: decl.has_type_params,
    })
}

/// Parse a call expression `f(args)` or `x.y.F(args)`.
pub fn parse_call(src: &str) -> Result<Call, SyntaxError> {
    let (expr, parser) = parse_expr_source(src)?;
    let ExprKind::Call { fun, args } = &expr.unparen().kind else {
        return Err(SyntaxError::general("missing function call"));
    };
    let (prefix, name) = match &fun.kind {
        ExprKind::Ident => (String::new(), parser.text(fun.span)),
        ExprKind::Selector { base, sel } => {
            (format!("{}.", parser.text(*base)), parser.text(*sel))
        }
        _ => return Err(SyntaxError::general("unsupported function call")),
    };
    Ok(Call {
        prefix,
        name: name.to_string(),
        args: parser.text(*args).trim().to_string(),
    })
}

/// Parse an interface body `{ ... }` and return its elements in order.
pub fn parse_interface_body(body: &str) -> Result<Vec<InterfaceElement>, SyntaxError> {
    let src = format!("interface {body}");
    let mut parser = Parser::new(&src)?;
    let elems = parser.parse_interface_type()?;
    parser.expect_end()?;
    Ok(elems
        .into_iter()
        .map(|e| InterfaceElement {
            text: parser.text(e.span).to_string(),
            is_method: e.is_method,
        })
        .collect())
}

/// Whether `s` is a single Go identifier (not a keyword).
pub fn is_identifier(s: &str) -> bool {
    match lex(s).as_deref() {
        Ok([tok, rest @ ..]) => {
            tok.kind == TokenKind::Ident
                && tok.span.to_range() == (0..s.len())
                && rest.iter().all(|t| t.implicit || t.kind == TokenKind::Eof)
        }
        _ => false,
    }
}
