//! Tokenization errors.

use crate::Position;

/// A fatal tokenization error. Carries the file and the position of the
/// construct that could not be completed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("cannot find closing \"%}}\" for tag started at {file}:{pos}")]
    UnclosedTag { file: String, pos: Position },

    #[error("empty tag name at {file}:{pos}")]
    EmptyTagName { file: String, pos: Position },

    #[error("cannot find \"{{% {end} %}}\" for \"{{% {start} %}}\" started at {file}:{pos}")]
    UnterminatedBlock {
        start: &'static str,
        end: &'static str,
        file: String,
        pos: Position,
    },

    #[error("unexpected \"{{% {tag} %}}\" without matching \"{{% {open} %}}\" at {file}:{pos}")]
    UnmatchedEnd {
        tag: &'static str,
        open: &'static str,
        file: String,
        pos: Position,
    },
}

impl ScanError {
    /// Position the error points at.
    pub fn pos(&self) -> Position {
        match self {
            ScanError::UnclosedTag { pos, .. }
            | ScanError::EmptyTagName { pos, .. }
            | ScanError::UnterminatedBlock { pos, .. }
            | ScanError::UnmatchedEnd { pos, .. } => *pos,
        }
    }
}
