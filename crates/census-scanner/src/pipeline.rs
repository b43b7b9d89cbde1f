//! Indexing pipeline: walk, fingerprint on a worker pool, write through a
//! single writer thread, seal, verify.
//!
//! Paths are fingerprinted in chunks of the configured batch size. Each
//! chunk's results are collected in enumeration order before they are sent
//! to the writer, so insertion order equals enumeration order no matter how
//! the pool schedules the work.

use std::path::{Path, PathBuf};
use std::time::Instant;

use census_core::config::CensusConfig;
use census_core::errors::{PipelineError, ScanError};
use census_core::events::{
    CensusEventHandler, FileSkippedEvent, FilesDiscoveredEvent, ScanCompleteEvent,
    ScanErrorEvent, ScanProgressEvent, ScanStartedEvent,
};
use census_core::traits::{Cancellable, CancellationToken};
use census_core::types::timestamp::now_secs;
use census_core::types::FileRecord;
use census_storage::connection::sidecar_paths;
use census_storage::{BatchWriter, IndexStore};
use rayon::prelude::*;

use crate::fingerprint::Fingerprinter;
use crate::types::IndexSummary;
use crate::walker::Walker;

/// Builds one index for one directory tree.
#[derive(Debug, Clone)]
pub struct Indexer {
    config: CensusConfig,
    output: Option<PathBuf>,
    cancellation: CancellationToken,
}

impl Indexer {
    pub fn new(config: CensusConfig) -> Self {
        Self {
            config,
            output: None,
            cancellation: CancellationToken::new(),
        }
    }

    /// Write the index to `path` instead of `<root>/<index_file_name>`.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Index `root`. Per-file failures are counted, never fatal.
    pub fn run(
        &self,
        root: &Path,
        handler: &dyn CensusEventHandler,
    ) -> Result<IndexSummary, PipelineError> {
        let result = self.run_inner(root, handler);
        if let Err(ref e) = result {
            if !matches!(e, PipelineError::Cancelled) {
                handler.on_scan_error(&ScanErrorEvent {
                    message: e.to_string(),
                });
            }
        }
        result
    }

    fn run_inner(
        &self,
        root: &Path,
        handler: &dyn CensusEventHandler,
    ) -> Result<IndexSummary, PipelineError> {
        let start = Instant::now();
        let root = resolve_root(root)?;
        let index_path = self.resolve_index_path(&root)?;
        let algorithm = self.config.scan.effective_hash_algorithm();
        let threads = self.config.scan.effective_threads();
        let batch_size = self.config.storage.effective_batch_size().max(1);

        let mut store = IndexStore::create(&index_path)?;
        store.write_metadata_start(&root, now_secs(), algorithm)?;
        tracing::info!(
            root = %root.display(),
            index = %index_path.display(),
            algorithm = algorithm.as_str(),
            threads,
            "scan started"
        );
        handler.on_scan_started(&ScanStartedEvent {
            root: root.clone(),
            index_path: index_path.clone(),
        });

        // Phase 1: discovery
        let discovery_start = Instant::now();
        let skip = std::iter::once(index_path.clone()).chain(sidecar_paths(&index_path));
        let paths = Walker::new()
            .with_excludes(self.config.scan.exclude.clone())
            .skip_paths(skip)
            .with_cancellation(self.cancellation.clone())
            .walk(&root)
            .map_err(|e| match e {
                ScanError::Cancelled => PipelineError::Cancelled,
                other => PipelineError::Scan(other),
            })?;
        let total = paths.len();
        let discovery_ms = discovery_start.elapsed().as_millis() as u64;
        tracing::info!(files = total, discovery_ms, "discovery complete");
        handler.on_files_discovered(&FilesDiscoveredEvent {
            total,
            discovery_ms,
        });

        // Phase 2: fingerprint + write
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("census-hash-{i}"))
            .build()
            .map_err(|e| PipelineError::ThreadPool {
                message: e.to_string(),
            })?;
        let fingerprinter = Fingerprinter::new(algorithm);
        let writer = BatchWriter::spawn(store, batch_size);

        let mut processed = 0usize;
        let mut skipped = 0usize;
        let mut bytes_processed = 0u64;

        for chunk in paths.chunks(batch_size) {
            if self.cancellation.is_cancelled() {
                return Err(cancel(writer));
            }

            let results: Vec<Result<FileRecord, ScanError>> = pool.install(|| {
                chunk
                    .par_iter()
                    .map(|path| fingerprinter.fingerprint(path))
                    .collect()
            });

            let mut records = Vec::with_capacity(results.len());
            for (path, result) in chunk.iter().zip(results) {
                match result {
                    Ok(record) => {
                        bytes_processed += record.size;
                        records.push(record);
                    }
                    Err(e) if e.is_per_file() => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping file");
                        skipped += 1;
                        handler.on_file_skipped(&FileSkippedEvent {
                            path: path.clone(),
                            reason: e.to_string(),
                        });
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            processed += chunk.len();

            if let Err(send_err) = writer.send(records) {
                // The writer thread stopped; its own error is the real cause.
                return Err(match writer.finish() {
                    Err(cause) => cause.into(),
                    Ok(_) => send_err.into(),
                });
            }

            handler.on_scan_progress(&ScanProgressEvent {
                processed,
                total,
                bytes_processed,
            });
        }

        if self.cancellation.is_cancelled() {
            return Err(cancel(writer));
        }

        // Phase 3: seal + verify
        let (store, stats) = writer.finish()?;
        tracing::debug!(
            records = stats.records_written,
            batches = stats.batches_committed,
            "writer drained"
        );
        let sealed = store.seal(now_secs())?;
        let files_recorded = sealed.count()?;
        let elapsed = start.elapsed();

        let summary = IndexSummary {
            scan_root: root,
            index_path,
            files_found: total,
            files_recorded,
            files_skipped: skipped,
            bytes_processed,
            elapsed,
        };

        if summary.has_discrepancy() {
            tracing::warn!(
                found = total,
                recorded = files_recorded,
                "index count does not match files found"
            );
        }
        tracing::info!(
            files = files_recorded,
            skipped,
            bytes = bytes_processed,
            elapsed_ms = elapsed.as_millis() as u64,
            "scan complete"
        );
        handler.on_scan_complete(&ScanCompleteEvent {
            files_found: total,
            files_recorded: files_recorded as usize,
            files_skipped: skipped,
            bytes_processed,
            duration_ms: elapsed.as_millis() as u64,
        });

        Ok(summary)
    }

    /// Where the index for `root` (already canonical) is written.
    fn resolve_index_path(&self, root: &Path) -> Result<PathBuf, PipelineError> {
        let Some(output) = &self.output else {
            return Ok(root.join(self.config.storage.effective_index_file_name()));
        };

        let Some(file_name) = output.file_name() else {
            return Err(ScanError::NotAFile {
                path: output.clone(),
            }
            .into());
        };
        let parent = match output.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let parent = std::fs::canonicalize(parent)
            .ok()
            .filter(|p| p.is_dir())
            .ok_or_else(|| ScanError::NotADirectory {
                path: parent.to_path_buf(),
            })?;
        Ok(parent.join(file_name))
    }
}

fn resolve_root(root: &Path) -> Result<PathBuf, ScanError> {
    std::fs::canonicalize(root)
        .ok()
        .filter(|p| p.is_dir())
        .ok_or_else(|| ScanError::NotADirectory {
            path: root.to_path_buf(),
        })
}

/// Drain the writer and leave the artifact unsealed.
fn cancel(writer: BatchWriter) -> PipelineError {
    match writer.finish() {
        Ok((_store, stats)) => {
            tracing::info!(
                records = stats.records_written,
                "scan cancelled, index left unsealed"
            );
            PipelineError::Cancelled
        }
        Err(e) => e.into(),
    }
}
