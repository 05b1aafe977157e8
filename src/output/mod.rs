//! Output module for run statistics and reports
//!
//! This module handles:
//! - Per-partition counters collected by the walker
//! - The run summary aggregated by the scheduler
//! - Printing the summary and writing it as markdown

mod markdown;
pub mod stats;
mod summary;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{print_summary, PartitionStats};
pub use summary::{PartitionOutcome, PartitionReport, RunSummary};
