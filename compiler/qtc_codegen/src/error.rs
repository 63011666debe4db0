//! Code generation errors.
//!
//! Every error is fatal to the compilation of a document. Handlers add the
//! directive they were processing as the error propagates outward, so the
//! final message reads from the outermost construct to the failing one.

use std::io;

use qtc_gosyntax::SyntaxError;
use qtc_scan::ScanError;

/// Broad category of a [`CodegenError`], ignoring context wrappers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The tokenizer could not read the document.
    Scan,
    /// Directives are nested or placed illegally.
    Grammar,
    /// An embedded Go fragment is not valid Go.
    Syntax,
    /// Writing the generated code failed.
    Io,
}

#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error("cannot parse template: {0}")]
    Scan(#[from] ScanError),

    #[error("{message}")]
    Grammar { message: String },

    #[error("{message}: {source}")]
    Syntax {
        message: String,
        #[source]
        source: SyntaxError,
    },

    #[error("cannot write generated code: {0}")]
    Io(#[from] io::Error),

    #[error(
        "error in {construct:?}{}: {source}",
        .context.as_deref().map(|c| format!(" at {c}")).unwrap_or_default()
    )]
    Within {
        construct: String,
        context: Option<String>,
        #[source]
        source: Box<CodegenError>,
    },
}

impl CodegenError {
    pub(crate) fn grammar(message: impl Into<String>) -> Self {
        CodegenError::Grammar {
            message: message.into(),
        }
    }

    pub(crate) fn syntax(message: impl Into<String>, source: SyntaxError) -> Self {
        CodegenError::Syntax {
            message: message.into(),
            source,
        }
    }

    /// Wrap with the text of the directive being processed.
    #[must_use]
    pub(crate) fn within(self, construct: &str) -> Self {
        CodegenError::Within {
            construct: construct.to_string(),
            context: None,
            source: Box::new(self),
        }
    }

    /// Wrap with the directive text and the location it was found at.
    #[must_use]
    pub(crate) fn within_at(self, construct: &str, context: String) -> Self {
        CodegenError::Within {
            construct: construct.to_string(),
            context: Some(context),
            source: Box::new(self),
        }
    }

    /// Category of the innermost error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodegenError::Scan(_) => ErrorKind::Scan,
            CodegenError::Grammar { .. } => ErrorKind::Grammar,
            CodegenError::Syntax { .. } => ErrorKind::Syntax,
            CodegenError::Io(_) => ErrorKind::Io,
            CodegenError::Within { source, .. } => source.kind(),
        }
    }

    /// The innermost error, with all context wrappers removed.
    pub fn root(&self) -> &CodegenError {
        match self {
            CodegenError::Within { source, .. } => source.root(),
            other => other,
        }
    }
}
