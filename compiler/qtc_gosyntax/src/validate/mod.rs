//! Fragment validation.
//!
//! Each fragment kind is checked by wrapping it in the smallest Go program
//! that gives it its grammatical context, then parsing that program.

use crate::error::SyntaxError;
use crate::parser::{parse_expr_source, parse_file, DeclKind};

/// One check per kind of Go fragment a template can carry.
///
/// Implementations must accept exactly the text the Go compiler accepts in
/// the corresponding position.
pub trait FragmentValidator {
    /// Header of a `for` statement: `i := 0; i < n; i++`, `_, x := range xs`, ...
    fn for_clause(&self, clause: &str) -> Result<(), SyntaxError>;

    /// Header of an `if` statement, optionally with an init statement.
    fn if_condition(&self, cond: &str) -> Result<(), SyntaxError>;

    /// Header of a `switch` statement, including type switch guards.
    fn switch_selector(&self, selector: &str) -> Result<(), SyntaxError>;

    /// Expression list of a `case` clause.
    fn case_list(&self, list: &str) -> Result<(), SyntaxError>;

    /// What follows the `import` keyword: one spec or a parenthesized group.
    fn import_list(&self, imports: &str) -> Result<(), SyntaxError>;

    /// A single expression.
    fn output_expr(&self, expr: &str) -> Result<(), SyntaxError>;

    /// Statements inside a function body.
    fn func_code(&self, code: &str) -> Result<(), SyntaxError>;

    /// Top-level declarations other than imports.
    fn template_code(&self, code: &str) -> Result<(), SyntaxError>;
}

/// Validator backed by this crate's Go syntax checker.
#[derive(Copy, Clone, Debug, Default)]
pub struct GoSyntax;

impl GoSyntax {
    fn check_expr(src: &str) -> Result<(), SyntaxError> {
        parse_expr_source(src).map(drop)
    }
}

impl FragmentValidator for GoSyntax {
    fn for_clause(&self, clause: &str) -> Result<(), SyntaxError> {
        Self::check_expr(&format!("func () {{ for {clause} {{}} }}"))
    }

    fn if_condition(&self, cond: &str) -> Result<(), SyntaxError> {
        Self::check_expr(&format!("func () {{ if {cond} {{}} }}"))
    }

    fn switch_selector(&self, selector: &str) -> Result<(), SyntaxError> {
        Self::check_expr(&format!("func () {{ switch {selector} {{}} }}"))
    }

    fn case_list(&self, list: &str) -> Result<(), SyntaxError> {
        Self::check_expr(&format!("func () {{ switch {{case {list}:}} }}"))
    }

    fn import_list(&self, imports: &str) -> Result<(), SyntaxError> {
        let decls = parse_file(&format!("package foo\nimport {imports}"))?;
        if decls.iter().any(|&d| d != DeclKind::Import) {
            return Err(SyntaxError::general(
                "unexpected code found, expecting import spec",
            ));
        }
        Ok(())
    }

    fn output_expr(&self, expr: &str) -> Result<(), SyntaxError> {
        Self::check_expr(expr)
    }

    fn func_code(&self, code: &str) -> Result<(), SyntaxError> {
        Self::check_expr(&format!("func () {{ for {{ {code}\n }} }}"))
    }

    fn template_code(&self, code: &str) -> Result<(), SyntaxError> {
        parse_file(&format!("package foo\nvar _ = a\n{code}")).map(drop)
    }
}

#[cfg(test)]
mod tests;
