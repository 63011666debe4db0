//! Syntax errors reported by the checker.

/// The first syntax error found in a fragment.
///
/// `line` and `column` are 1-based and refer to the text that was actually
/// parsed, which for most fragment kinds includes a short wrapper around
/// the fragment (for example `func () { for <clause> {} }`).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{line}:{column}: {message}")]
pub struct SyntaxError {
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl SyntaxError {
    /// Build an error located at byte `offset` of `src`.
    pub(crate) fn at(src: &str, offset: usize, message: impl Into<String>) -> Self {
        let offset = offset.min(src.len());
        let before = &src[..offset];
        let line = before.bytes().filter(|&b| b == b'\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        SyntaxError {
            line: u32::try_from(line).unwrap_or(u32::MAX),
            column: u32::try_from(column).unwrap_or(u32::MAX),
            message: message.into(),
        }
    }

    /// An error that is not tied to a source position.
    pub(crate) fn general(message: impl Into<String>) -> Self {
        SyntaxError {
            line: 1,
            column: 1,
            message: message.into(),
        }
    }
}
