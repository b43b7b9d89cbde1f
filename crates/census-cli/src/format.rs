//! Plain-text reports printed on stdout.

use std::fmt::Write;
use std::path::PathBuf;

use census_scanner::{ComparisonResult, IndexSummary};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const RULE_WIDTH: usize = 80;

/// Summary printed after `census index`.
pub fn format_index_summary(summary: &IndexSummary) -> String {
    let mut out = String::new();
    let secs = summary.elapsed.as_secs_f64();
    let gib = summary.bytes_processed as f64 / GIB;
    let gib_per_sec = if secs > 0.0 { gib / secs } else { 0.0 };

    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(out, "Finished scanning {}", summary.scan_root.display());
    let _ = writeln!(out, "Created database file - {}", summary.index_path.display());
    let _ = writeln!(out, "Found {} files", summary.files_found);
    let _ = writeln!(out, "Database has {} files", summary.files_recorded);
    if summary.has_discrepancy() {
        let _ = writeln!(out, " !! [ERROR] Database count does not match found file");
    }
    if summary.files_skipped > 0 {
        let _ = writeln!(out, "Skipped {} files", summary.files_skipped);
    }
    let _ = writeln!(
        out,
        "Processed {} bytes ({:.2}GiB) in {:.2}s",
        summary.bytes_processed, gib, secs
    );
    let _ = writeln!(
        out,
        "Processing speed: {:.2} bytes/s ({:.2} GiB/s)",
        summary.bytes_per_second(),
        gib_per_sec
    );
    out
}

/// Report printed by `census compare`.
pub fn format_comparison(result: &ComparisonResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Index A: {}", result.index_a.display());
    let _ = writeln!(out, "Index B: {}", result.index_b.display());
    let _ = writeln!(out);
    let _ = writeln!(out, "Entries in A and B:");
    let _ = writeln!(out);
    let _ = writeln!(out, "A: {}", result.total_a);
    let _ = writeln!(out, "B: {}", result.total_b);
    let _ = writeln!(out, "Diff: {}", result.difference);
    let _ = writeln!(out);
    let _ = writeln!(out, "Files in A, not in B:");
    let _ = writeln!(out);
    write_paths(&mut out, &result.content_only_in_a);
    let _ = writeln!(out);
    let _ = writeln!(out, "Filepaths in A, not in B:");
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", result.root_a.display());
    let _ = writeln!(out, "{}", result.root_b.display());
    write_paths(&mut out, &result.path_only_in_a);
    out
}

fn write_paths(out: &mut String, paths: &[PathBuf]) {
    for path in paths {
        let _ = writeln!(out, "{}", path.display());
    }
    let _ = writeln!(out, "Count: {}", paths.len());
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn summary(found: usize, recorded: u64) -> IndexSummary {
        IndexSummary {
            scan_root: PathBuf::from("/data"),
            index_path: PathBuf::from("/data/file_index.db"),
            files_found: found,
            files_recorded: recorded,
            files_skipped: 0,
            bytes_processed: 1024 * 1024 * 1024,
            elapsed: Duration::from_secs(2),
        }
    }

    #[test]
    fn summary_reports_counts_and_throughput() {
        let text = format_index_summary(&summary(3, 3));
        assert!(text.contains("Found 3 files\n"));
        assert!(text.contains("Database has 3 files\n"));
        assert!(text.contains("Processed 1073741824 bytes (1.00GiB) in 2.00s"));
        assert!(text.contains("Processing speed: 536870912.00 bytes/s (0.50 GiB/s)"));
        assert!(!text.contains("[ERROR]"));
    }

    #[test]
    fn summary_flags_discrepancy() {
        let text = format_index_summary(&summary(3, 2));
        assert!(text.contains(" !! [ERROR] Database count does not match found file"));
    }

    #[test]
    fn comparison_lists_paths_with_counts() {
        let result = ComparisonResult {
            index_a: PathBuf::from("a.db"),
            index_b: PathBuf::from("b.db"),
            root_a: PathBuf::from("/ra"),
            root_b: PathBuf::from("/rb"),
            total_a: 2,
            total_b: 3,
            difference: -1,
            content_only_in_a: vec![PathBuf::from("/ra/x")],
            path_only_in_a: vec![],
        };
        let text = format_comparison(&result);
        assert!(text.contains("A: 2\nB: 3\nDiff: -1\n"));
        assert!(text.contains("Files in A, not in B:\n\n/ra/x\nCount: 1\n"));
        assert!(text.ends_with("Filepaths in A, not in B:\n\n/ra\n/rb\nCount: 0\n"));
    }
}
