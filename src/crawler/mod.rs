//! Crawler module for running a catalog walk
//!
//! This module contains the run-level logic, including:
//! - Partition keys (one letter of the catalog index each)
//! - The partition scheduler and its worker pool
//! - Overall run coordination

mod coordinator;
mod partition;
pub mod scheduler;

pub use coordinator::{run_catalog, Coordinator};
pub use partition::PartitionKey;

pub use crate::output::RunSummary;
