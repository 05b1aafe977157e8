//! Navigation state machine over the catalog UI
//!
//! # Components
//!
//! - `actions`: the `(Level, Event)` transition table
//! - `hidden`: hidden-field extraction
//! - `classify`: node classification and child discovery
//! - `listing`: parsers for department, offering, term and section listings
//! - `machine`: the `Navigator` sending requests on behalf of a session
//! - `walker`: depth-first traversal of one letter with per-node error boundaries

pub mod actions;
mod classify;
mod hidden;
pub mod listing;
mod machine;
mod walker;

pub use actions::{ActionCode, Event, Level, Transition};
pub use classify::{classify, ChildAction, NavigationResult, NodeKind};
pub use hidden::extract_hidden_fields;
pub use machine::{ensure_kind, Ascent, Navigator};
pub use walker::{is_placeholder_title, CatalogWalker};

use crate::auth::AuthError;
use crate::transport::TransportError;
use thiserror::Error;

/// Errors raised while navigating
#[derive(Debug, Error)]
pub enum NavError {
    #[error("action {action} failed: {source}")]
    Transport {
        action: String,
        #[source]
        source: TransportError,
    },

    #[error("action {action} returned an unusable page: {reason}")]
    Classification { action: String, reason: String },

    #[error("could not establish a session: {0}")]
    Authentication(#[from] AuthError),

    #[error("return action {action} reached a {actual} page, expected {expected}")]
    ReturnState {
        action: String,
        expected: NodeKind,
        actual: NodeKind,
    },

    #[error("no {event:?} transition for level {level}")]
    MissingTransition { level: Level, event: Event },
}

impl NavError {
    /// Short name of the error kind, used as a statistics bucket
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Classification { .. } => "classification",
            Self::Authentication(_) => "authentication",
            Self::ReturnState { .. } => "return_state",
            Self::MissingTransition { .. } => "transition",
        }
    }
}

/// Resolves a fixed action code or reports the missing table entry
pub(crate) fn require_action(level: Level, event: Event) -> Result<ActionCode, NavError> {
    actions::fixed_action(level, event).ok_or(NavError::MissingTransition { level, event })
}
