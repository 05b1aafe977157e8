//! Whole runs across several partitions

use crate::support::*;
use catalog_walker::crawler::Coordinator;
use catalog_walker::extract::CatalogExtractor;
use catalog_walker::output::PartitionOutcome;
use catalog_walker::storage::{Collection, JsonFileSink, MemorySink, Sink};
use std::sync::Arc;
use tempfile::TempDir;

fn create_coordinator(
    letters: &str,
    workers: u32,
    catalog: &Arc<FakeCatalog>,
    authenticator: LetterAuthenticator,
    sink: Arc<dyn Sink>,
) -> Coordinator {
    Coordinator::with_parts(
        test_config(letters, workers, "./unused"),
        "test-hash",
        catalog.clone(),
        Arc::new(authenticator),
        Arc::new(CatalogExtractor),
        sink,
    )
}

#[tokio::test]
async fn test_partitions_run_on_separate_sessions() {
    let catalog = Arc::new(FakeCatalog::new());
    let sink = Arc::new(MemorySink::new());

    let summary = create_coordinator("AB", 2, &catalog, LetterAuthenticator::default(), sink.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(summary.attempted(), 2);
    assert_eq!(summary.completed(), 2);
    assert_eq!(summary.config_hash, "test-hash");
    assert_eq!(summary.stats_for(&key('A')).unwrap().section_records, 3);
    assert_eq!(summary.stats_for(&key('B')).unwrap().course_records, 1);
    assert_eq!(catalog.stale_requests(), 0);
    assert_eq!(sink.count(Collection::Departments), 2);
}

#[tokio::test]
async fn test_failed_partition_does_not_stop_others() {
    let catalog = Arc::new(FakeCatalog::new());
    catalog.fail(Some("B"), EXPAND_ALL, 1, Fault::Status(503));
    let sink = Arc::new(MemorySink::new());

    let summary = create_coordinator("ABZ", 1, &catalog, LetterAuthenticator::default(), sink.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(summary.attempted(), 3);
    assert_eq!(summary.completed(), 2);
    let failed = summary.failed();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].key, key('B'));
    assert_eq!(summary.totals().section_records, 3);
}

#[tokio::test]
async fn test_panicking_partition_is_isolated() {
    let catalog = Arc::new(FakeCatalog::new());
    catalog.fail(Some("B"), EXPAND_ALL, 1, Fault::Panic);
    let sink = Arc::new(MemorySink::new());

    // A single worker must survive the panic to reach the letters after B
    let summary = create_coordinator("BAZ", 1, &catalog, LetterAuthenticator::default(), sink.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(summary.attempted(), 3);
    assert_eq!(summary.completed(), 2);
    let report = summary
        .partitions
        .iter()
        .find(|r| r.key == key('B'))
        .unwrap();
    assert!(matches!(
        &report.outcome,
        PartitionOutcome::Failed { reason } if reason.contains("panicked")
    ));
    assert_eq!(summary.stats_for(&key('A')).unwrap().section_records, 3);
}

#[tokio::test]
async fn test_rejected_session_fails_only_its_partition() {
    let catalog = Arc::new(FakeCatalog::new());
    let sink = Arc::new(MemorySink::new());

    let summary = create_coordinator("AB", 2, &catalog, LetterAuthenticator::rejecting(&['A']), sink.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(summary.completed(), 1);
    assert_eq!(summary.failed()[0].key, key('A'));
    // No request was ever sent for the rejected partition
    assert!(catalog.requests_for("A").is_empty());
}

#[tokio::test]
async fn test_run_writes_json_tree() {
    let dir = TempDir::new().unwrap();
    let catalog = Arc::new(FakeCatalog::new());
    let sink = Arc::new(JsonFileSink::new(dir.path()).unwrap());

    let summary = create_coordinator("A", 1, &catalog, LetterAuthenticator::default(), sink.clone())
        .run()
        .await
        .unwrap();
    assert_eq!(summary.completed(), 1);

    assert!(dir.path().join("departments").join("ANAT.json").exists());
    assert!(dir
        .path()
        .join("courses")
        .join("ANAT_300_Graduate_Main.json")
        .exists());

    let sections = std::fs::read_dir(dir.path().join("sections")).unwrap().count();
    assert_eq!(sections, 2);
}
