use crate::state::{Cursor, TraversalPath};
use crate::transport::SessionToken;

/// Everything one worker owns while it walks one partition
///
/// A session is created after authentication, threaded by `&mut` through
/// every navigator call, and dropped when its partition is finished.
#[derive(Debug)]
pub struct Session {
    label: String,
    token: SessionToken,
    cursor: Cursor,
    path: TraversalPath,
    sections_expanded: bool,
    requests: u64,
}

impl Session {
    pub fn new(label: impl Into<String>, token: SessionToken) -> Self {
        Self {
            label: label.into(),
            token,
            cursor: Cursor::new(),
            path: TraversalPath::new(),
            sections_expanded: false,
            requests: 0,
        }
    }

    /// Name used in log lines (the partition key)
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    pub fn path(&self) -> &TraversalPath {
        &self.path
    }

    pub fn path_mut(&mut self) -> &mut TraversalPath {
        &mut self.path
    }

    /// Whether the collapsed section list has been expanded in this session
    ///
    /// The server remembers the expansion for the rest of the session and
    /// toggling again would collapse it.
    pub fn sections_expanded(&self) -> bool {
        self.sections_expanded
    }

    pub fn mark_sections_expanded(&mut self) {
        self.sections_expanded = true;
    }

    /// Number of requests sent on this session
    pub fn requests(&self) -> u64 {
        self.requests
    }

    pub(crate) fn record_request(&mut self) {
        self.requests += 1;
    }
}
