//! Code generation for quicktemplate documents.
//!
//! Turns a template into Go source. Every `{% func %}` becomes three Go
//! functions: a streaming one holding the body, a buffered one writing to
//! an `io.Writer`, and one returning a string. Go fragments embedded in
//! directives are syntax-checked before they are accepted.
//!
//! ```text
//! {% func Greet(name string) %}Hello, {%s name %}!{% endfunc %}
//! ```
//!
//! compiles to `StreamGreet`, `WriteGreet` and `Greet`.

mod emitter;
mod error;
mod options;
mod parser;
mod signature;
mod stack;

use std::io::{self, Write};

use qtc_gosyntax::GoSyntax;
use qtc_scan::Scanner;

pub use emitter::Emitter;
pub use error::{CodegenError, ErrorKind};
pub use options::{CompileOptions, DEFAULT_PACKAGE};
pub use parser::Parser;
pub use signature::{FuncSignature, MANGLE_SUFFIX};

/// Compile the template `src`, read from `file_path`, writing Go code to
/// `out`.
///
/// On error `out` may hold a partial file and should be discarded.
pub fn compile<W: Write>(
    src: &str,
    file_path: &str,
    options: &CompileOptions,
    out: W,
) -> Result<W, CodegenError> {
    let scanner = Scanner::new(src, file_path);
    let mut parser = Parser::new(scanner, GoSyntax, out, options);
    parser.parse_template()?;
    Ok(parser.into_inner())
}

/// Compile the template `src` into a string of Go code.
pub fn compile_to_string(
    src: &str,
    file_path: &str,
    options: &CompileOptions,
) -> Result<String, CodegenError> {
    let out = compile(src, file_path, options, Vec::with_capacity(src.len() * 2))?;
    String::from_utf8(out).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err).into())
}
