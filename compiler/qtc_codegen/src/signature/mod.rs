//! Template function signatures.
//!
//! A `{% func %}` header declares one template function; the generator
//! emits three Go functions for it. [`FuncSignature`] renders the headers
//! of all three and the calls between them:
//!
//! ```text
//! StreamGreet(qw422016 *qt422016.Writer, name string)   body
//! WriteGreet(qq422016 qtio422016.Writer, name string)   -> StreamGreet
//! Greet(name string) string                              -> WriteGreet
//! ```

use qtc_gosyntax::{parse_call, parse_func_header};

use crate::error::CodegenError;

/// Suffix appended to every identifier the generator introduces, so that
/// generated names never collide with names in template code.
pub const MANGLE_SUFFIX: &str = "422016";

/// Writer handed to streaming functions.
pub const STREAM_WRITER: &str = "qw422016";
/// `io.Writer` handed to buffered functions.
pub const BUFFER_WRITER: &str = "qq422016";
/// Byte buffer used by string functions.
pub const BYTE_BUFFER: &str = "qb422016";
/// Result string of string functions.
pub const RESULT_STRING: &str = "qs422016";

/// Signature of a template function, or the callee of a `{% = %}` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FuncSignature {
    name: String,
    /// `(recv) ` for methods, empty otherwise.
    def_prefix: String,
    /// `recv.` for methods, the qualifier for calls, empty otherwise.
    call_prefix: String,
    /// Parameter list as written.
    args: String,
    /// Parameter names forwarded between the three variants.
    arg_names: String,
}

impl FuncSignature {
    /// Parse a function header such as `Greet(name string)` or
    /// `(p *Page) Body()`.
    pub fn parse(header: &str) -> Result<Self, CodegenError> {
        if !header.contains('(') {
            return Err(CodegenError::grammar(
                "cannot find '(' in function definition",
            ));
        }
        let parsed = parse_func_header(header)
            .map_err(|err| CodegenError::syntax("invalid function definition", err))?;
        if parsed.has_type_params {
            return Err(CodegenError::grammar("function cannot have type parameters"));
        }
        if parsed.has_results {
            return Err(CodegenError::grammar("function cannot return values"));
        }

        let (def_prefix, call_prefix) = match &parsed.receiver {
            None => (String::new(), String::new()),
            Some(recv) => match recv.names.as_slice() {
                [name] if recv.groups == 1 => (format!("({}) ", recv.text), format!("{name}.")),
                _ => {
                    return Err(CodegenError::grammar(
                        "method receiver must contain a single parameter",
                    ))
                }
            },
        };

        let mut names = Vec::with_capacity(parsed.params.len());
        for param in &parsed.params {
            let Some(name) = &param.name else {
                return Err(CodegenError::grammar(
                    "func cannot contain untyped arguments",
                ));
            };
            if param.variadic {
                names.push(format!("{name}..."));
            } else {
                names.push(name.clone());
            }
        }

        Ok(FuncSignature {
            name: parsed.name,
            def_prefix,
            call_prefix,
            args: parsed.params_text.trim().to_string(),
            arg_names: names.join(", "),
        })
    }

    /// Parse the body of a `{% = %}` tag, a call such as `Greet(name)` or
    /// `p.Body()`.
    pub fn parse_call(call: &str) -> Result<Self, CodegenError> {
        let call =
            parse_call(call).map_err(|err| CodegenError::syntax("invalid function call", err))?;
        Ok(FuncSignature {
            name: call.name,
            def_prefix: String::new(),
            call_prefix: call.prefix,
            args: String::new(),
            arg_names: call.args,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn is_exported(&self) -> bool {
        self.name.starts_with(|c: char| c.is_uppercase())
    }

    fn stream_name(&self) -> String {
        let prefix = if self.is_exported() { "Stream" } else { "stream" };
        format!("{prefix}{}", self.name)
    }

    fn write_name(&self) -> String {
        let prefix = if self.is_exported() { "Write" } else { "write" };
        format!("{prefix}{}", self.name)
    }

    /// Header of the streaming variant, writing to `dst`.
    pub fn def_stream(&self, dst: &str) -> String {
        format!(
            "{}{}({dst} *qt{MANGLE_SUFFIX}.Writer{})",
            self.def_prefix,
            self.stream_name(),
            with_leading_comma(&self.args)
        )
    }

    /// Header of the buffered variant, writing to the `io.Writer` `dst`.
    pub fn def_write(&self, dst: &str) -> String {
        format!(
            "{}{}({dst} qtio{MANGLE_SUFFIX}.Writer{})",
            self.def_prefix,
            self.write_name(),
            with_leading_comma(&self.args)
        )
    }

    /// Header of the string-returning variant.
    pub fn def_string(&self) -> String {
        format!("{}{}({}) string", self.def_prefix, self.name, self.args)
    }

    /// Call of the streaming variant with `dst` as the writer.
    pub fn call_stream(&self, dst: &str) -> String {
        format!(
            "{}{}({dst}{})",
            self.call_prefix,
            self.stream_name(),
            with_leading_comma(&self.arg_names)
        )
    }

    /// Call of the buffered variant with `dst` as the writer.
    pub fn call_write(&self, dst: &str) -> String {
        format!(
            "{}{}({dst}{})",
            self.call_prefix,
            self.write_name(),
            with_leading_comma(&self.arg_names)
        )
    }
}

fn with_leading_comma(list: &str) -> String {
    if list.is_empty() {
        String::new()
    } else {
        format!(", {list}")
    }
}
