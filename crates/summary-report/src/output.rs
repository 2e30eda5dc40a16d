//! Timestamped output file naming.
//!
//! Every run writes into the results directory with the run timestamp in the
//! file name. Existing files are never overwritten: a numeric suffix is added
//! when the plain name is taken.

use std::path::{Path, PathBuf};

use summary_core::{Result, SummaryError};
use tracing::debug;

pub const COUNT_STATS_PREFIX: &str = "person_wise_email_count_stats";
pub const SENT_PLOT_PREFIX: &str = "senders_monthly_email_count_dist_plot";
pub const CONTACT_PLOT_PREFIX: &str = "recipient_monthly_unique_contact_count_relative_dist_plot";

/// The three files produced by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub count_stats: PathBuf,
    pub sent_plot: PathBuf,
    pub contact_plot: PathBuf,
}

impl OutputPaths {
    /// Resolve the output names for `run_timestamp` inside `results_dir`.
    pub fn new(results_dir: &Path, run_timestamp: &str) -> Self {
        Self {
            count_stats: timestamped_path(results_dir, COUNT_STATS_PREFIX, run_timestamp, "csv"),
            sent_plot: timestamped_path(results_dir, SENT_PLOT_PREFIX, run_timestamp, "png"),
            contact_plot: timestamped_path(results_dir, CONTACT_PLOT_PREFIX, run_timestamp, "png"),
        }
    }
}

/// `<dir>/<prefix>_<timestamp>.<ext>`, or `<prefix>_<timestamp>_<n>.<ext>`
/// with the smallest `n` that does not exist yet.
pub fn timestamped_path(dir: &Path, prefix: &str, timestamp: &str, ext: &str) -> PathBuf {
    let plain = dir.join(format!("{prefix}_{timestamp}.{ext}"));
    if !plain.exists() {
        return plain;
    }

    let mut n = 1u32;
    loop {
        let candidate = dir.join(format!("{prefix}_{timestamp}_{n}.{ext}"));
        if !candidate.exists() {
            debug!("{} exists; writing {} instead", plain.display(), candidate.display());
            return candidate;
        }
        n += 1;
    }
}

/// Create the results directory (and parents) when absent.
pub fn ensure_results_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|source| SummaryError::FileWrite {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_paths_names() {
        let paths = OutputPaths::new(Path::new("results"), "20181121_151127");
        assert_eq!(
            paths.count_stats,
            PathBuf::from("results/person_wise_email_count_stats_20181121_151127.csv")
        );
        assert_eq!(
            paths.sent_plot,
            PathBuf::from("results/senders_monthly_email_count_dist_plot_20181121_151127.png")
        );
        assert_eq!(
            paths.contact_plot,
            PathBuf::from(
                "results/recipient_monthly_unique_contact_count_relative_dist_plot_20181121_151127.png"
            )
        );
    }

    #[test]
    fn test_timestamped_path_avoids_existing_files() {
        let tmp = TempDir::new().unwrap();
        let first = timestamped_path(tmp.path(), "stats", "20010101_000000", "csv");
        std::fs::write(&first, "x").unwrap();

        let second = timestamped_path(tmp.path(), "stats", "20010101_000000", "csv");
        assert_eq!(second, tmp.path().join("stats_20010101_000000_1.csv"));
        std::fs::write(&second, "x").unwrap();

        let third = timestamped_path(tmp.path(), "stats", "20010101_000000", "csv");
        assert_eq!(third, tmp.path().join("stats_20010101_000000_2.csv"));
    }

    #[test]
    fn test_ensure_results_dir_creates_nested() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("a").join("b");
        ensure_results_dir(&dir).unwrap();
        assert!(dir.is_dir());
        // Idempotent.
        ensure_results_dir(&dir).unwrap();
    }

    #[test]
    fn test_ensure_results_dir_under_file_is_write_error() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("results");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = ensure_results_dir(&blocker.join("nested")).unwrap_err();
        assert!(matches!(err, SummaryError::FileWrite { .. }));
        assert!(err.to_string().starts_with("Failed to write"));
    }
}
