//! Go source emission.
//!
//! The emitter owns everything about the shape of the generated file:
//! tab indentation, `//line` directives, the file banner and import
//! prologue, comment reflow, literal text statements and the wrapper
//! functions emitted around each template function.
//!
//! While suppressed (inside a dead region after `return`, `break` or
//! `continue`) every write is dropped. Suppression nests.

use std::io::{self, Write};
use std::path::Path;

use crate::signature::{
    FuncSignature, BUFFER_WRITER, BYTE_BUFFER, MANGLE_SUFFIX, RESULT_STRING, STREAM_WRITER,
};

/// Writes generated Go code to `out`.
pub struct Emitter<W: Write> {
    out: W,
    indent: usize,
    suppressed: u32,
    prologue_emitted: bool,
    /// Template path for `//line` directives; `None` disables them.
    line_file: Option<String>,
}

impl<W: Write> Emitter<W> {
    pub fn new(out: W, line_file: Option<String>) -> Self {
        Emitter {
            out,
            indent: 0,
            suppressed: 0,
            prologue_emitted: false,
            line_file,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn set_indent(&mut self, indent: usize) {
        self.indent = indent;
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed > 0
    }

    /// Start dropping output.
    pub fn suppress(&mut self) {
        self.suppressed += 1;
    }

    /// Undo one [`Emitter::suppress`].
    pub fn resume(&mut self) {
        debug_assert!(self.suppressed > 0, "resume without suppress");
        self.suppressed = self.suppressed.saturating_sub(1);
    }

    pub fn prologue_emitted(&self) -> bool {
        self.prologue_emitted
    }

    fn write_indent(&mut self) -> io::Result<()> {
        for _ in 0..self.indent {
            self.out.write_all(b"\t")?;
        }
        Ok(())
    }

    /// Emit one statement, attributed to template line `line`.
    pub fn line(&mut self, line: u32, text: &str) -> io::Result<()> {
        if self.is_suppressed() {
            return Ok(());
        }
        if let Some(file) = &self.line_file {
            let directive = format!("//line {file}:{line}\n");
            self.write_indent()?;
            self.out.write_all(directive.as_bytes())?;
        }
        self.write_indent()?;
        self.out.write_all(text.as_bytes())?;
        self.out.write_all(b"\n")
    }

    /// File banner, package clause and import block.
    pub fn banner(&mut self, line: u32, file_path: &str, package: &str) -> io::Result<()> {
        let base = Path::new(file_path)
            .file_name()
            .map_or_else(|| file_path.to_string(), |n| n.to_string_lossy().into_owned());
        writeln!(
            self.out,
            "// This file is automatically generated by qtc from {base:?}."
        )?;
        writeln!(
            self.out,
            "// See https://github.com/valyala/quicktemplate for details.\n"
        )?;
        self.line(line, &format!("package {package}\n"))?;
        self.line(
            line,
            &format!(
                "import (\n\tqtio{MANGLE_SUFFIX} \"io\"\n\n\tqt{MANGLE_SUFFIX} \"github.com/valyala/quicktemplate\"\n)\n"
            ),
        )
    }

    /// Sentinel uses of the helper imports. Emitted once; later calls do
    /// nothing.
    pub fn prologue(&mut self, line: u32) -> io::Result<()> {
        if self.prologue_emitted {
            return Ok(());
        }
        self.line(
            line,
            &format!(
                "var (\n\t_ = qtio{MANGLE_SUFFIX}.Copy\n\t_ = qt{MANGLE_SUFFIX}.AcquireByteBuffer\n)\n"
            ),
        )?;
        self.prologue_emitted = true;
        Ok(())
    }

    /// Reflow template text into a Go comment.
    ///
    /// Existing `//` markers and the space after them are dropped, trailing
    /// spaces are trimmed and blank lines are dropped, except that a run of
    /// blank lines between two paragraphs becomes a single bare `//`.
    pub fn comment(&mut self, text: &str) -> io::Result<()> {
        if self.is_suppressed() {
            return Ok(());
        }
        let mut seen_text = false;
        let mut pending_blank = false;
        for raw in text.lines() {
            let mut line = raw.trim_end();
            if let Some(rest) = line.strip_prefix("//") {
                line = rest
                    .strip_prefix(|c: char| c.is_ascii_whitespace())
                    .unwrap_or(rest);
            }
            if line.is_empty() {
                pending_blank = seen_text;
                continue;
            }
            if pending_blank {
                self.write_indent()?;
                self.out.write_all(b"//\n")?;
                pending_blank = false;
            }
            self.write_indent()?;
            writeln!(self.out, "// {line}")?;
            seen_text = true;
        }
        self.out.write_all(b"\n")
    }

    /// Write literal template text. Go raw strings cannot hold a backtick,
    /// so the text is split around them.
    pub fn text(&mut self, line: u32, text: &str) -> io::Result<()> {
        let mut pieces = text.split('`').peekable();
        while let Some(piece) = pieces.next() {
            if !piece.is_empty() {
                self.line(line, &format!("{STREAM_WRITER}.N().S(`{piece}`)"))?;
            }
            if pieces.peek().is_some() {
                self.line(line, &format!("{STREAM_WRITER}.N().S(\"`\")"))?;
            }
        }
        Ok(())
    }

    /// Open the streaming variant of `sig`.
    pub fn func_start(&mut self, line: u32, sig: &FuncSignature) -> io::Result<()> {
        self.line(line, &format!("func {} {{", sig.def_stream(STREAM_WRITER)))
    }

    /// Close the streaming variant and emit the buffered and string
    /// variants that forward to it. Expects indentation at the top level.
    pub fn func_end(&mut self, line: u32, sig: &FuncSignature) -> io::Result<()> {
        let base = self.indent;
        self.line(line, "}\n")?;

        self.line(line, &format!("func {} {{", sig.def_write(BUFFER_WRITER)))?;
        self.indent = base + 1;
        self.line(
            line,
            &format!("{STREAM_WRITER} := qt{MANGLE_SUFFIX}.AcquireWriter({BUFFER_WRITER})"),
        )?;
        self.line(line, &sig.call_stream(STREAM_WRITER))?;
        self.line(line, &format!("qt{MANGLE_SUFFIX}.ReleaseWriter({STREAM_WRITER})"))?;
        self.indent = base;
        self.line(line, "}\n")?;

        self.line(line, &format!("func {} {{", sig.def_string()))?;
        self.indent = base + 1;
        self.line(
            line,
            &format!("{BYTE_BUFFER} := qt{MANGLE_SUFFIX}.AcquireByteBuffer()"),
        )?;
        self.line(line, &sig.call_write(BYTE_BUFFER))?;
        self.line(line, &format!("{RESULT_STRING} := string({BYTE_BUFFER}.B)"))?;
        self.line(line, &format!("qt{MANGLE_SUFFIX}.ReleaseByteBuffer({BYTE_BUFFER})"))?;
        self.line(line, &format!("return {RESULT_STRING}"))?;
        self.indent = base;
        self.line(line, "}\n")
    }

    /// Declare the three method forms of one interface method.
    pub fn interface_method(
        &mut self,
        line: u32,
        method: &str,
        sig: &FuncSignature,
    ) -> io::Result<()> {
        self.line(line, &format!("{method} string"))?;
        self.line(line, &sig.def_stream(STREAM_WRITER))?;
        self.line(line, &sig.def_write(BUFFER_WRITER))
    }
}
