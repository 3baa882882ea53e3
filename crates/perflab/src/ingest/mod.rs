//! Folder ingestion
//!
//! Walks an activity folder, runs extraction and normalization over every
//! `.fit` file and collects the results. A bad file never stops the run:
//! its failure is written to the error log and ingestion moves on. Only a
//! missing activity folder, or an error log that cannot be written, aborts.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{PerfLabError, Result};
use crate::fit;
use crate::models::WorkoutRecord;

/// File extension of activity files, compared case-insensitively
pub const ACTIVITY_EXTENSION: &str = "fit";

/// Append-only plain-text log of per-file ingestion failures
#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one `<path>: <message>` line
    pub fn append(&self, source: &Path, message: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}: {}", source.display(), message)?;
        Ok(())
    }
}

/// A file that could not be ingested
#[derive(Debug, Clone, PartialEq)]
pub struct IngestFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Result of processing a single file
#[derive(Debug)]
pub enum FileOutcome {
    Parsed(WorkoutRecord),
    Failed(IngestFailure),
}

/// Everything an ingestion run produced
#[derive(Debug, Default)]
pub struct IngestReport {
    pub records: Vec<WorkoutRecord>,
    pub failures: Vec<IngestFailure>,
}

impl IngestReport {
    pub fn parsed(&self) -> usize {
        self.records.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Whether a path has the activity file extension
pub fn is_activity_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(ACTIVITY_EXTENSION))
}

/// Recursively list activity files under `dir`, sorted by path
pub fn discover_activity_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();

    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };
        if entry.file_type().is_file() && is_activity_file(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    files
}

/// Extract, normalize and attach file identity for one activity file
pub fn ingest_file(path: &Path) -> Result<WorkoutRecord> {
    // The path is the upsert key, so it must round-trip exactly
    let source_file = path
        .to_str()
        .ok_or_else(|| PerfLabError::UnreadableFile("path is not valid UTF-8".to_string()))?;
    let session = fit::read_session(path)?;
    let source_mtime = modified_secs(path)?;
    Ok(WorkoutRecord::new(source_file, source_mtime, session))
}

/// Process one file into an explicit outcome.
///
/// File-level errors become [`FileOutcome::Failed`]; any other error is
/// returned so the caller can stop.
pub fn process_file(path: &Path) -> Result<FileOutcome> {
    match ingest_file(path) {
        Ok(record) => Ok(FileOutcome::Parsed(record)),
        Err(e) if e.is_file_level() => Ok(FileOutcome::Failed(IngestFailure {
            path: path.to_path_buf(),
            message: e.to_string(),
        })),
        Err(e) => Err(e),
    }
}

/// Ingest every activity file below `activity_dir`.
///
/// Failures are appended to `error_log` as they happen and are also returned
/// in the report. An empty report is a valid result.
pub fn ingest_activity_folder(activity_dir: &Path, error_log: &ErrorLog) -> Result<IngestReport> {
    if !activity_dir.is_dir() {
        return Err(PerfLabError::DirectoryNotFound(activity_dir.to_path_buf()));
    }
    let root = activity_dir.canonicalize()?;

    let files = discover_activity_files(&root);
    debug!(dir = %root.display(), files = files.len(), "Discovered activity files");

    let mut report = IngestReport::default();
    for path in files {
        match process_file(&path)? {
            FileOutcome::Parsed(record) => {
                debug!(path = %path.display(), date = ?record.session.workout_date, "Parsed session");
                report.records.push(record);
            }
            FileOutcome::Failed(failure) => {
                warn!(path = %failure.path.display(), error = %failure.message, "Skipping activity file");
                error_log.append(&failure.path, &failure.message)?;
                report.failures.push(failure);
            }
        }
    }

    info!(
        parsed = report.parsed(),
        failed = report.failed(),
        "Ingestion finished"
    );
    Ok(report)
}

fn modified_secs(path: &Path) -> Result<f64> {
    let modified = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|e| PerfLabError::UnreadableFile(e.to_string()))?;

    Ok(modified
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_activity_file_ignores_case() {
        assert!(is_activity_file(Path::new("a/b/run.fit")));
        assert!(is_activity_file(Path::new("a/b/RUN.FIT")));
        assert!(is_activity_file(Path::new("ride.Fit")));
        assert!(!is_activity_file(Path::new("notes.txt")));
        assert!(!is_activity_file(Path::new("fit")));
    }

    #[test]
    fn test_discover_is_recursive_and_sorted() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("2024/12")).unwrap();
        fs::write(root.join("b.fit"), b"").unwrap();
        fs::write(root.join("a.FIT"), b"").unwrap();
        fs::write(root.join("2024/12/c.fit"), b"").unwrap();
        fs::write(root.join("readme.txt"), b"").unwrap();

        let files = discover_activity_files(root);
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["2024/12/c.fit", "a.FIT", "b.fit"]);
    }

    #[test]
    fn test_missing_directory_fails_fast() {
        let temp = TempDir::new().unwrap();
        let log = ErrorLog::new(temp.path().join("errors.log"));

        let err = ingest_activity_folder(&temp.path().join("Activity"), &log).unwrap_err();
        assert!(matches!(err, PerfLabError::DirectoryNotFound(_)));
        assert!(!log.path().exists());
    }

    #[test]
    fn test_file_instead_of_directory_fails_fast() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("Activity");
        fs::write(&file, b"").unwrap();
        let log = ErrorLog::new(temp.path().join("errors.log"));

        let err = ingest_activity_folder(&file, &log).unwrap_err();
        assert!(matches!(err, PerfLabError::DirectoryNotFound(_)));
    }

    #[test]
    fn test_empty_directory_is_empty_report() {
        let temp = TempDir::new().unwrap();
        let log = ErrorLog::new(temp.path().join("errors.log"));

        let report = ingest_activity_folder(temp.path(), &log).unwrap();
        assert_eq!(report.parsed(), 0);
        assert_eq!(report.failed(), 0);
    }

    #[test]
    fn test_corrupt_file_is_logged_and_skipped() {
        let temp = TempDir::new().unwrap();
        let activity = temp.path().join("Activity");
        fs::create_dir_all(&activity).unwrap();
        fs::write(activity.join("broken.fit"), b"garbage").unwrap();
        let log = ErrorLog::new(temp.path().join("logs/errors.log"));

        let report = ingest_activity_folder(&activity, &log).unwrap();
        assert_eq!(report.parsed(), 0);
        assert_eq!(report.failed(), 1);

        let contents = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("broken.fit: "));
        assert!(Path::new(lines[0].split(": ").next().unwrap()).is_absolute());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_is_skipped_not_mangled() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"/activities/run\xff.fit"));

        let err = ingest_file(path).unwrap_err();
        assert!(matches!(err, PerfLabError::UnreadableFile(_)));

        match process_file(path).unwrap() {
            FileOutcome::Failed(failure) => assert!(failure.message.contains("UTF-8")),
            FileOutcome::Parsed(_) => panic!("non UTF-8 path must not be ingested"),
        }
    }

    #[test]
    fn test_error_log_appends() {
        let temp = TempDir::new().unwrap();
        let log = ErrorLog::new(temp.path().join("errors.log"));

        log.append(Path::new("/a.fit"), "first").unwrap();
        log.append(Path::new("/b.fit"), "second").unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents, "/a.fit: first\n/b.fit: second\n");
    }
}
