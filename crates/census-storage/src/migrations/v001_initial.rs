//! V001: initial schema with scan_meta and file_index.

pub const MIGRATION_SQL: &str = r#"
-- Scan metadata: key/value pairs written at scan start and seal time.
-- Keys: scan_root (BLOB, raw path bytes), started_at, hash_algorithm,
-- completed_at (TEXT).
CREATE TABLE IF NOT EXISTS scan_meta (
    key TEXT PRIMARY KEY,
    value ANY NOT NULL
) STRICT;

-- One row per fingerprinted file. `seq` preserves insertion order,
-- `path` and `rel_path` are raw path bytes; `rel_path` is relative to
-- scan_root with '/' separators. `file_name` is a lossy display form.
CREATE TABLE IF NOT EXISTS file_index (
    seq INTEGER PRIMARY KEY,
    path BLOB NOT NULL UNIQUE,
    rel_path BLOB NOT NULL,
    file_name TEXT NOT NULL,
    content_hash TEXT NOT NULL,
    size INTEGER NOT NULL CHECK (size >= 0),
    created_at REAL NOT NULL,
    modified_at REAL NOT NULL,
    accessed_at REAL NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_file_index_content
    ON file_index(content_hash, size);
CREATE INDEX IF NOT EXISTS idx_file_index_rel_path
    ON file_index(rel_path);
"#;
