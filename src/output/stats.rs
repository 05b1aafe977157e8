//! Per-partition counters and their console report

use crate::navigation::{Level, NavError};
use crate::output::summary::{PartitionOutcome, RunSummary};
use std::ops::AddAssign;

/// Counters collected while walking one partition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionStats {
    /// Requests sent on the partition's session
    pub requests: u64,

    pub departments: u64,
    pub courses_visited: u64,

    /// Courses with a placeholder title, never entered
    pub courses_skipped: u64,

    pub branches: u64,
    pub offerings: u64,
    pub terms: u64,
    pub sections_visited: u64,

    pub department_records: u64,
    pub course_records: u64,
    pub section_records: u64,

    // Return actions issued, by the level they leave
    pub course_returns: u64,
    pub detail_returns: u64,
    pub section_returns: u64,

    pub extraction_failures: u64,
    pub transport_errors: u64,
    pub classification_errors: u64,
    pub return_state_errors: u64,
    pub sink_errors: u64,
    pub other_errors: u64,
}

impl PartitionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a caught navigation error under its kind
    pub fn record_error(&mut self, error: &NavError) {
        match error {
            NavError::Transport { .. } => self.transport_errors += 1,
            NavError::Classification { .. } => self.classification_errors += 1,
            NavError::ReturnState { .. } => self.return_state_errors += 1,
            NavError::Authentication(_) | NavError::MissingTransition { .. } => {
                self.other_errors += 1
            }
        }
    }

    /// Counts a return action issued to leave a node of `level`
    pub fn record_return(&mut self, level: Level) {
        match level {
            Level::Course => self.course_returns += 1,
            Level::Offering => self.detail_returns += 1,
            Level::Section => self.section_returns += 1,
            Level::Letter | Level::Department | Level::Term => {}
        }
    }

    pub fn records_written(&self) -> u64 {
        self.department_records + self.course_records + self.section_records
    }

    pub fn total_errors(&self) -> u64 {
        self.extraction_failures
            + self.transport_errors
            + self.classification_errors
            + self.return_state_errors
            + self.sink_errors
            + self.other_errors
    }
}

impl AddAssign<&PartitionStats> for PartitionStats {
    fn add_assign(&mut self, other: &PartitionStats) {
        self.requests += other.requests;
        self.departments += other.departments;
        self.courses_visited += other.courses_visited;
        self.courses_skipped += other.courses_skipped;
        self.branches += other.branches;
        self.offerings += other.offerings;
        self.terms += other.terms;
        self.sections_visited += other.sections_visited;
        self.department_records += other.department_records;
        self.course_records += other.course_records;
        self.section_records += other.section_records;
        self.course_returns += other.course_returns;
        self.detail_returns += other.detail_returns;
        self.section_returns += other.section_returns;
        self.extraction_failures += other.extraction_failures;
        self.transport_errors += other.transport_errors;
        self.classification_errors += other.classification_errors;
        self.return_state_errors += other.return_state_errors;
        self.sink_errors += other.sink_errors;
        self.other_errors += other.other_errors;
    }
}

/// Prints a run summary to stdout
///
/// # Arguments
///
/// * `summary` - The summary returned by the scheduler
pub fn print_summary(summary: &RunSummary) {
    let totals = summary.totals();

    println!("=== Catalog Walk Summary ===\n");

    println!("Partitions:");
    println!("  Attempted: {}", summary.attempted());
    println!("  Completed: {}", summary.completed());
    println!("  Failed: {}", summary.failed().len());
    println!();

    println!("Traversal:");
    println!("  Requests: {}", totals.requests);
    println!("  Departments: {}", totals.departments);
    println!(
        "  Courses: {} visited, {} skipped",
        totals.courses_visited, totals.courses_skipped
    );
    println!(
        "  Branches: {} ({} offerings)",
        totals.branches, totals.offerings
    );
    println!("  Terms: {}", totals.terms);
    println!("  Sections: {}", totals.sections_visited);
    println!();

    println!("Records:");
    println!("  Departments: {}", totals.department_records);
    println!("  Courses: {}", totals.course_records);
    println!("  Sections: {}", totals.section_records);
    println!();

    if totals.total_errors() > 0 {
        println!("Errors:");
        for (name, count) in [
            ("Extraction", totals.extraction_failures),
            ("Transport", totals.transport_errors),
            ("Classification", totals.classification_errors),
            ("Return state", totals.return_state_errors),
            ("Sink", totals.sink_errors),
            ("Other", totals.other_errors),
        ] {
            if count > 0 {
                println!("  {}: {}", name, count);
            }
        }
        println!();
    }

    let failed = summary.failed();
    if !failed.is_empty() {
        println!("Failed Partitions ({}):", failed.len());
        for report in failed {
            if let PartitionOutcome::Failed { reason } = &report.outcome {
                println!("  - {}: {}", report.key, reason);
            }
        }
        println!();
    }
}
