//! Open blocks of a template document.

/// One open block.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Frame {
    Function,
    Loop,
    Conditional,
    Switch,
    SwitchCase,
    Interface,
}

impl Frame {
    /// Indentation the frame adds to the lines inside it. `case` labels
    /// sit at the level of their `switch`.
    fn indent(self) -> usize {
        match self {
            Frame::Switch => 0,
            Frame::Function
            | Frame::Loop
            | Frame::Conditional
            | Frame::SwitchCase
            | Frame::Interface => 1,
        }
    }
}

/// Stack of open blocks. Indentation and `break`/`continue` legality are
/// derived from it.
#[derive(Debug, Default)]
pub(crate) struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    pub(crate) fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub(crate) fn pop(&mut self, frame: Frame) {
        let popped = self.frames.pop();
        debug_assert_eq!(popped, Some(frame), "unbalanced scope");
    }

    pub(crate) fn indent(&self) -> usize {
        self.frames.iter().map(|f| f.indent()).sum()
    }

    pub(crate) fn loop_depth(&self) -> usize {
        self.count(Frame::Loop)
    }

    pub(crate) fn switch_depth(&self) -> usize {
        self.count(Frame::Switch)
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    fn count(&self, frame: Frame) -> usize {
        self.frames.iter().filter(|&&f| f == frame).count()
    }
}
