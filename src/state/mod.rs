//! State module for per-session navigation state
//!
//! # Components
//!
//! - `Cursor`: the last page and the hidden fields it carried
//! - `TraversalPath`: the stack of return actions taken while descending
//! - `Session`: one worker's token, cursor and path for one partition

mod cursor;
mod path;
mod session;

// Re-export main types
pub use cursor::Cursor;
pub use path::{ReturnFrame, TraversalPath};
pub use session::Session;
