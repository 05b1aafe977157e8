use crate::navigation::{ActionCode, Level, NodeKind};

/// One pending way back up the hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnFrame {
    /// Level of the node this frame leaves
    pub level: Level,

    /// Action that leaves the node
    pub action: ActionCode,

    /// Kind the parent page should classify as once the action is replayed
    pub expect: NodeKind,
}

/// Stack of return actions accumulated while descending
///
/// The depth always equals the current nesting depth below the letter
/// listing.
#[derive(Debug, Clone, Default)]
pub struct TraversalPath {
    frames: Vec<ReturnFrame>,
}

impl TraversalPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: ReturnFrame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<ReturnFrame> {
        self.frames.pop()
    }

    pub fn peek(&self) -> Option<&ReturnFrame> {
        self.frames.last()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Levels from the outermost pending frame to the innermost
    pub fn levels(&self) -> Vec<Level> {
        self.frames.iter().map(|f| f.level).collect()
    }
}
