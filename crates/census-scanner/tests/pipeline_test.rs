//! Indexing pipeline tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use census_core::config::CensusConfig;
use census_core::errors::{PipelineError, ScanError, StorageError};
use census_core::events::*;
use census_core::traits::{Cancellable, CancellationToken};
use census_core::types::HashAlgorithm;
use census_scanner::{Comparator, Indexer, Walker};
use census_storage::IndexStore;
use tempfile::TempDir;

// ---- Helpers ----

fn test_config() -> CensusConfig {
    let mut config = CensusConfig::default();
    config.scan.threads = Some(4);
    config
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", "alpha");
    write(dir.path(), "docs/readme.md", "# readme");
    write(dir.path(), "docs/deep/notes.log", "log line");
    write(dir.path(), ".hidden", "secret");
    write(dir.path(), "empty", "");
    dir
}

fn triples(index: &Path) -> Vec<(PathBuf, String, u64)> {
    IndexStore::open(index)
        .unwrap()
        .records()
        .unwrap()
        .into_iter()
        .map(|r| (r.path, r.content_hash, r.size))
        .collect()
}

#[derive(Default)]
struct RecordingHandler {
    started: Mutex<Vec<ScanStartedEvent>>,
    progress: Mutex<Vec<ScanProgressEvent>>,
    skipped: Mutex<Vec<FileSkippedEvent>>,
    complete: Mutex<Vec<ScanCompleteEvent>>,
    errors: Mutex<Vec<ScanErrorEvent>>,
}

impl CensusEventHandler for RecordingHandler {
    fn on_scan_started(&self, event: &ScanStartedEvent) {
        self.started.lock().unwrap().push(event.clone());
    }
    fn on_scan_progress(&self, event: &ScanProgressEvent) {
        self.progress.lock().unwrap().push(event.clone());
    }
    fn on_file_skipped(&self, event: &FileSkippedEvent) {
        self.skipped.lock().unwrap().push(event.clone());
    }
    fn on_scan_complete(&self, event: &ScanCompleteEvent) {
        self.complete.lock().unwrap().push(event.clone());
    }
    fn on_scan_error(&self, event: &ScanErrorEvent) {
        self.errors.lock().unwrap().push(event.clone());
    }
}

/// Deletes `victim` once discovery is over, so fingerprinting it fails.
struct RemoveAfterDiscovery {
    victim: PathBuf,
    inner: RecordingHandler,
}

impl CensusEventHandler for RemoveAfterDiscovery {
    fn on_files_discovered(&self, _event: &FilesDiscoveredEvent) {
        fs::remove_file(&self.victim).unwrap();
    }
    fn on_file_skipped(&self, event: &FileSkippedEvent) {
        self.inner.on_file_skipped(event);
    }
    fn on_scan_complete(&self, event: &ScanCompleteEvent) {
        self.inner.on_scan_complete(event);
    }
    fn on_scan_error(&self, event: &ScanErrorEvent) {
        self.inner.on_scan_error(event);
    }
}

// ---- Baseline ----

#[test]
fn records_every_regular_file_except_the_artifact() {
    let dir = fixture();
    let root = fs::canonicalize(dir.path()).unwrap();

    let summary = Indexer::new(test_config()).run(dir.path(), &NoOpHandler).unwrap();

    assert_eq!(summary.scan_root, root);
    assert_eq!(summary.index_path, root.join("file_index.db"));
    assert_eq!(summary.files_found, 5);
    assert_eq!(summary.files_recorded, 5);
    assert_eq!(summary.files_skipped, 0);
    assert!(!summary.has_discrepancy());
    assert_eq!(summary.bytes_processed, (5 + 8 + 8 + 6) as u64);

    let paths: Vec<_> = triples(&summary.index_path).into_iter().map(|t| t.0).collect();
    assert!(!paths.contains(&summary.index_path));
    assert_eq!(paths.len(), 5);
}

#[test]
fn insertion_order_equals_enumeration_order() {
    let dir = TempDir::new().unwrap();
    for i in 0..50 {
        write(dir.path(), &format!("d{}/f{i:03}.txt", i % 4), &format!("content {i}"));
    }
    let mut config = test_config();
    config.storage.batch_size = Some(7);

    let summary = Indexer::new(config).run(dir.path(), &NoOpHandler).unwrap();

    let walked = Walker::new()
        .skip_paths([summary.index_path.clone()])
        .walk(&summary.scan_root)
        .unwrap();
    let stored: Vec<_> = triples(&summary.index_path).into_iter().map(|t| t.0).collect();
    assert_eq!(stored, walked);
}

#[test]
fn reindexing_unchanged_tree_is_stable() {
    let dir = fixture();
    let indexer = Indexer::new(test_config());

    let first = indexer.run(dir.path(), &NoOpHandler).unwrap();
    let first_triples = triples(&first.index_path);
    let second = indexer.run(dir.path(), &NoOpHandler).unwrap();

    assert_eq!(first.files_recorded, second.files_recorded);
    assert_eq!(first_triples, triples(&second.index_path));
    assert_eq!(second.files_found, 5);
}

#[test]
fn rerun_overwrites_previous_artifact() {
    let dir = fixture();
    let indexer = Indexer::new(test_config());
    indexer.run(dir.path(), &NoOpHandler).unwrap();

    fs::remove_file(dir.path().join("a.txt")).unwrap();
    let summary = indexer.run(dir.path(), &NoOpHandler).unwrap();

    assert_eq!(summary.files_recorded, 4);
    assert_eq!(IndexStore::open(&summary.index_path).unwrap().count().unwrap(), 4);
}

#[test]
fn empty_directory_gives_sealed_empty_index() {
    let dir = TempDir::new().unwrap();
    let summary = Indexer::new(test_config()).run(dir.path(), &NoOpHandler).unwrap();

    assert_eq!(summary.files_found, 0);
    assert_eq!(summary.files_recorded, 0);
    let store = IndexStore::open(&summary.index_path).unwrap();
    assert!(store.metadata().unwrap().unwrap().is_sealed());

    let result = Comparator::open(&summary.index_path, &summary.index_path)
        .unwrap()
        .compare()
        .unwrap();
    assert_eq!((result.total_a, result.total_b, result.difference), (0, 0, 0));
    assert!(result.content_only_in_a.is_empty());
    assert!(result.path_only_in_a.is_empty());
}

#[test]
fn metadata_records_scan_boundaries() {
    let dir = fixture();
    let mut config = test_config();
    config.scan.hash_algorithm = Some(HashAlgorithm::Blake3);

    let summary = Indexer::new(config).run(dir.path(), &NoOpHandler).unwrap();

    let store = IndexStore::open(&summary.index_path).unwrap();
    let meta = store.metadata().unwrap().unwrap();
    assert_eq!(meta.scan_root, summary.scan_root);
    assert_eq!(meta.hash_algorithm, HashAlgorithm::Blake3);
    assert!(meta.completed_at.unwrap() >= meta.started_at);
    assert!(store.records().unwrap().iter().all(|r| r.content_hash.len() == 64));
}

// ---- Configuration ----

#[test]
fn configured_excludes_are_skipped() {
    let dir = fixture();
    let mut config = test_config();
    config.scan.exclude = vec!["*.log".to_string(), ".hidden".to_string()];

    let summary = Indexer::new(config).run(dir.path(), &NoOpHandler).unwrap();
    assert_eq!(summary.files_recorded, 3);
}

#[test]
fn configured_index_file_name_is_used() {
    let dir = fixture();
    let mut config = test_config();
    config.storage.index_file_name = Some("inventory.sqlite".to_string());

    let summary = Indexer::new(config).run(dir.path(), &NoOpHandler).unwrap();
    assert!(summary.index_path.ends_with("inventory.sqlite"));
    assert!(!dir.path().join("file_index.db").exists());
    assert_eq!(summary.files_recorded, 5);
}

#[test]
fn explicit_output_outside_tree() {
    let dir = fixture();
    let out = TempDir::new().unwrap();
    let target = out.path().join("snapshot.db");

    let summary = Indexer::new(test_config())
        .with_output(&target)
        .run(dir.path(), &NoOpHandler)
        .unwrap();

    assert_eq!(summary.index_path, fs::canonicalize(out.path()).unwrap().join("snapshot.db"));
    assert!(!dir.path().join("file_index.db").exists());
    assert_eq!(summary.files_recorded, 5);
}

#[test]
fn output_in_missing_directory_fails() {
    let dir = fixture();
    let err = Indexer::new(test_config())
        .with_output(dir.path().join("no/such/dir/x.db"))
        .run(dir.path(), &NoOpHandler)
        .unwrap_err();
    assert!(matches!(err, PipelineError::Scan(ScanError::NotADirectory { .. })));
}

// ---- Errors and cancellation ----

#[test]
fn file_root_is_not_a_directory() {
    let dir = fixture();
    let handler = RecordingHandler::default();
    let err = Indexer::new(test_config())
        .run(&dir.path().join("a.txt"), &handler)
        .unwrap_err();

    assert!(matches!(err, PipelineError::Scan(ScanError::NotADirectory { .. })));
    assert!(!dir.path().join("file_index.db").exists());
    assert_eq!(handler.errors.lock().unwrap().len(), 1);
    assert!(handler.started.lock().unwrap().is_empty());
}

#[test]
fn cancelled_scan_leaves_unsealed_artifact() {
    let dir = fixture();
    let token = CancellationToken::new();
    token.cancel();

    let handler = RecordingHandler::default();
    let err = Indexer::new(test_config())
        .with_cancellation(token)
        .run(dir.path(), &handler)
        .unwrap_err();

    assert!(matches!(err, PipelineError::Cancelled));
    assert!(handler.complete.lock().unwrap().is_empty());
    assert!(handler.errors.lock().unwrap().is_empty());
    let open = IndexStore::open(&dir.path().join("file_index.db"));
    assert!(matches!(open, Err(StorageError::NotAnIndex { .. })));
}

#[cfg(unix)]
#[test]
fn symlinks_are_not_recorded() {
    let dir = fixture();
    std::os::unix::fs::symlink(dir.path().join("a.txt"), dir.path().join("link")).unwrap();
    std::os::unix::fs::symlink(dir.path().join("docs"), dir.path().join("docs_link")).unwrap();

    let summary = Indexer::new(test_config()).run(dir.path(), &NoOpHandler).unwrap();
    assert_eq!(summary.files_found, 5);
    assert_eq!(summary.files_recorded, 5);
}

#[test]
fn vanished_file_is_skipped_counted_and_flagged() {
    let dir = TempDir::new().unwrap();
    let root = fs::canonicalize(dir.path()).unwrap();
    write(&root, "ok", "aaa");
    write(&root, "gone", "bbbb");

    let handler = RemoveAfterDiscovery {
        victim: root.join("gone"),
        inner: RecordingHandler::default(),
    };
    let summary = Indexer::new(test_config()).run(&root, &handler).unwrap();

    assert_eq!(summary.files_found, 2);
    assert_eq!(summary.files_recorded, 1);
    assert_eq!(summary.files_skipped, 1);
    assert!(summary.has_discrepancy());
    assert_eq!(summary.bytes_processed, 3);

    let skipped = handler.inner.skipped.lock().unwrap();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].path, root.join("gone"));
    assert!(handler.inner.errors.lock().unwrap().is_empty());
    let complete = handler.inner.complete.lock().unwrap();
    assert_eq!(complete[0].files_skipped, 1);

    let store = IndexStore::open(&summary.index_path).unwrap();
    assert!(store.is_sealed());
    let paths: Vec<_> = triples(&summary.index_path).into_iter().map(|t| t.0).collect();
    assert_eq!(paths, vec![root.join("ok")]);
}

#[cfg(unix)]
#[test]
fn non_utf8_names_are_recorded_exactly() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = TempDir::new().unwrap();
    let root = fs::canonicalize(dir.path()).unwrap();
    write(&root, "ok", "aaa");
    let odd = root.join(OsStr::from_bytes(b"bad\xff"));
    fs::write(&odd, "bbb").unwrap();

    let summary = Indexer::new(test_config()).run(&root, &NoOpHandler).unwrap();
    assert_eq!(summary.files_found, 2);
    assert_eq!(summary.files_recorded, 2);
    assert_eq!(summary.files_skipped, 0);
    assert!(!summary.has_discrepancy());

    let store = IndexStore::open(&summary.index_path).unwrap();
    let rec = store.get(&odd).unwrap().unwrap();
    assert_eq!(rec.path, odd);
    assert_eq!(rec.size, 3);

    let result = Comparator::open(&summary.index_path, &summary.index_path)
        .unwrap()
        .compare()
        .unwrap();
    assert!(result.is_identical());
}

// ---- Events ----

#[test]
fn progress_events_cover_every_chunk() {
    let dir = fixture();
    let mut config = test_config();
    config.storage.batch_size = Some(2);
    let handler = RecordingHandler::default();

    let summary = Indexer::new(config).run(dir.path(), &handler).unwrap();

    assert_eq!(handler.started.lock().unwrap().len(), 1);
    let progress = handler.progress.lock().unwrap();
    assert_eq!(progress.len(), 3);
    assert!(progress.windows(2).all(|w| w[0].processed < w[1].processed));
    let last = progress.last().unwrap();
    assert_eq!(last.processed, 5);
    assert_eq!(last.total, 5);
    assert_eq!(last.bytes_processed, summary.bytes_processed);

    let complete = handler.complete.lock().unwrap();
    assert_eq!(complete.len(), 1);
    assert_eq!(complete[0].files_recorded, 5);
}

#[test]
fn cancellation_token_is_shared_with_indexer() {
    let token = CancellationToken::new();
    let indexer = Indexer::new(test_config()).with_cancellation(token.clone());
    token.cancel();
    assert!(indexer.cancellation().is_cancelled());
}
