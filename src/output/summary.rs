//! Run summary types
//!
//! The scheduler records one report per partition; the coordinator adds the
//! run metadata once every partition has been attempted.

use crate::crawler::PartitionKey;
use crate::output::stats::PartitionStats;

/// How one partition ended
#[derive(Debug, Clone, PartialEq)]
pub enum PartitionOutcome {
    Completed(PartitionStats),
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartitionReport {
    pub key: PartitionKey,
    pub outcome: PartitionOutcome,
}

/// Summary of a whole run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    // Run metadata
    pub started_at: String,
    pub finished_at: Option<String>,
    pub duration_seconds: Option<u64>,
    pub config_hash: String,

    /// One report per attempted partition, in completion order
    pub partitions: Vec<PartitionReport>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: PartitionKey, outcome: PartitionOutcome) {
        self.partitions.push(PartitionReport { key, outcome });
    }

    pub fn attempted(&self) -> usize {
        self.partitions.len()
    }

    pub fn completed(&self) -> usize {
        self.partitions
            .iter()
            .filter(|r| matches!(r.outcome, PartitionOutcome::Completed(_)))
            .count()
    }

    pub fn failed(&self) -> Vec<&PartitionReport> {
        self.partitions
            .iter()
            .filter(|r| matches!(r.outcome, PartitionOutcome::Failed { .. }))
            .collect()
    }

    /// Statistics of a completed partition
    pub fn stats_for(&self, key: &PartitionKey) -> Option<&PartitionStats> {
        self.partitions.iter().find_map(|r| match &r.outcome {
            PartitionOutcome::Completed(stats) if r.key == *key => Some(stats),
            _ => None,
        })
    }

    /// Sum of the statistics of every completed partition
    pub fn totals(&self) -> PartitionStats {
        let mut totals = PartitionStats::default();
        for report in &self.partitions {
            if let PartitionOutcome::Completed(stats) = &report.outcome {
                totals += stats;
            }
        }
        totals
    }

    /// Percentage of attempted partitions that completed
    pub fn success_rate(&self) -> f64 {
        if self.partitions.is_empty() {
            return 0.0;
        }
        (self.completed() as f64 / self.attempted() as f64) * 100.0
    }
}
