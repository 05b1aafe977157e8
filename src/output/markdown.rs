//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a catalog
//! walk: run metadata, totals, one row per partition and the failures.

use crate::output::summary::{PartitionOutcome, RunSummary};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown summary of a run
///
/// # Arguments
///
/// * `summary` - The run summary
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(std::io::Error)` - Failed to write summary
pub fn generate_markdown_summary(summary: &RunSummary, output_path: &Path) -> std::io::Result<()> {
    let markdown = format_markdown_summary(summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a run summary as markdown
pub fn format_markdown_summary(summary: &RunSummary) -> String {
    let totals = summary.totals();
    let mut md = String::new();

    md.push_str("# Catalog Walk Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", summary.started_at));
    if let Some(finished) = &summary.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished));
    }
    if let Some(duration) = summary.duration_seconds {
        md.push_str(&format!(
            "- **Duration**: {} seconds ({:.2} minutes)\n",
            duration,
            duration as f64 / 60.0
        ));
    }
    md.push_str(&format!("- **Config Hash**: {}\n\n", summary.config_hash));

    // Totals
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!(
        "- **Partitions**: {} attempted, {} completed ({:.2}%)\n",
        summary.attempted(),
        summary.completed(),
        summary.success_rate()
    ));
    md.push_str(&format!("- **Requests**: {}\n", totals.requests));
    md.push_str(&format!("- **Departments**: {}\n", totals.departments));
    md.push_str(&format!(
        "- **Courses**: {} visited, {} skipped\n",
        totals.courses_visited, totals.courses_skipped
    ));
    md.push_str(&format!(
        "- **Records**: {} departments, {} courses, {} sections\n",
        totals.department_records, totals.course_records, totals.section_records
    ));
    md.push_str(&format!("- **Errors**: {}\n\n", totals.total_errors()));

    // Per partition
    if !summary.partitions.is_empty() {
        md.push_str("## Partitions\n\n");
        md.push_str("| Letter | Requests | Courses | Skipped | Sections | Errors |\n");
        md.push_str("|--------|----------|---------|---------|----------|--------|\n");

        let mut reports: Vec<_> = summary.partitions.iter().collect();
        reports.sort_by_key(|r| r.key);

        for report in reports {
            match &report.outcome {
                PartitionOutcome::Completed(stats) => md.push_str(&format!(
                    "| {} | {} | {} | {} | {} | {} |\n",
                    report.key,
                    stats.requests,
                    stats.courses_visited,
                    stats.courses_skipped,
                    stats.section_records,
                    stats.total_errors()
                )),
                PartitionOutcome::Failed { .. } => md.push_str(&format!(
                    "| {} | - | - | - | - | failed |\n",
                    report.key
                )),
            }
        }
        md.push('\n');
    }

    // Error breakdown
    if totals.total_errors() > 0 {
        md.push_str("## Error Summary\n\n");
        md.push_str("| Error Type | Count |\n");
        md.push_str("|------------|-------|\n");
        for (name, count) in [
            ("Extraction", totals.extraction_failures),
            ("Transport", totals.transport_errors),
            ("Classification", totals.classification_errors),
            ("Return state", totals.return_state_errors),
            ("Sink", totals.sink_errors),
            ("Other", totals.other_errors),
        ] {
            if count > 0 {
                md.push_str(&format!("| {} | {} |\n", name, count));
            }
        }
        md.push('\n');
    }

    // Failed partitions
    let failed = summary.failed();
    if !failed.is_empty() {
        md.push_str("## Failed Partitions\n\n");
        for report in failed {
            if let PartitionOutcome::Failed { reason } = &report.outcome {
                md.push_str(&format!("- **{}**: {}\n", report.key, reason));
            }
        }
        md.push('\n');
    }

    md
}
