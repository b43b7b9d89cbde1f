//! Deterministic tree walker using `ignore`.
//!
//! Every regular file is a candidate: hidden files and VCS ignore files are
//! not honoured, symlinks are never followed, and entries are visited
//! depth-first sorted by file name.

use std::path::{Path, PathBuf};

use census_core::errors::ScanError;
use census_core::traits::{Cancellable, CancellationToken};
use census_core::types::collections::FxHashSet;
use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;

/// Enumerates the regular files under a root.
#[derive(Debug, Clone, Default)]
pub struct Walker {
    excludes: Vec<String>,
    skip: FxHashSet<PathBuf>,
    cancellation: Option<CancellationToken>,
}

impl Walker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Glob patterns, matched relative to the root, whose matches are skipped.
    pub fn with_excludes(mut self, patterns: Vec<String>) -> Self {
        self.excludes = patterns;
        self
    }

    /// Exact absolute paths to leave out (the index artifact and its sidecars).
    pub fn skip_paths(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.skip.extend(paths);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Ordered absolute paths of every regular file under `root`.
    pub fn walk(&self, root: &Path) -> Result<Vec<PathBuf>, ScanError> {
        let is_dir = std::fs::metadata(root).map(|m| m.is_dir()).unwrap_or(false);
        if !is_dir {
            return Err(ScanError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b));

        if !self.excludes.is_empty() {
            let mut overrides = OverrideBuilder::new(root);
            for pattern in &self.excludes {
                overrides
                    .add(&format!("!{pattern}"))
                    .map_err(|e| ScanError::InvalidPattern {
                        pattern: pattern.clone(),
                        message: e.to_string(),
                    })?;
            }
            let overrides = overrides.build().map_err(|e| ScanError::InvalidPattern {
                pattern: self.excludes.join(", "),
                message: e.to_string(),
            })?;
            builder.overrides(overrides);
        }

        let mut files = Vec::new();
        for result in builder.build() {
            if self.is_cancelled() {
                return Err(ScanError::Cancelled);
            }
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            if self.skip.contains(entry.path()) {
                continue;
            }
            files.push(entry.into_path());
        }

        tracing::debug!(root = %root.display(), files = files.len(), "walk complete");
        Ok(files)
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}
