//! Lists bible files in a single directory and extracts each one,
//! containing per-file failures.

use crate::config::Settings;
use crate::error::{IndexError, ParseCause};
use crate::extractor;
use crate::models::BibleRecord;
use globset::GlobMatcher;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Debug)]
pub struct ScanReport {
    pub directory: PathBuf,
    pub missing: bool,
    pub matched: usize,
    pub records: Vec<BibleRecord>,
    /// Contained errors: a missing or unreadable directory, or files that
    /// failed to read or parse.
    pub failures: Vec<IndexError>,
}

impl ScanReport {
    fn new(directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
            missing: false,
            matched: 0,
            records: Vec::new(),
            failures: Vec::new(),
        }
    }
}

/// Regular files directly inside `dir` whose name matches `pattern`, in
/// ascending file-name order. Entries that could not be read are yielded as
/// errors when their name matches, as is a failure to list `dir` itself.
pub fn candidate_files<'a>(
    dir: &Path,
    pattern: &'a GlobMatcher,
) -> impl Iterator<Item = Result<PathBuf, walkdir::Error>> + 'a {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(move |entry| match entry {
            Ok(e) if e.file_type().is_file() && pattern.is_match(e.file_name()) => {
                Some(Ok(e.into_path()))
            }
            Ok(_) => None,
            Err(err) if err.depth() == 0 || err_matches(&err, pattern) => Some(Err(err)),
            Err(err) => {
                debug!("skipping unreadable entry: {}", err);
                None
            }
        })
}

fn err_matches(err: &walkdir::Error, pattern: &GlobMatcher) -> bool {
    err.path()
        .and_then(|p| p.file_name())
        .map(|name| pattern.is_match(name))
        .unwrap_or(false)
}

pub fn scan_directory(dir: &Path, settings: &Settings) -> ScanReport {
    let mut report = ScanReport::new(dir);

    if !dir.exists() {
        let err = IndexError::DirectoryMissing {
            path: dir.to_path_buf(),
        };
        warn!("{}", err);
        report.missing = true;
        report.failures.push(err);
        return report;
    }

    for candidate in candidate_files(dir, &settings.matcher) {
        let path = match candidate {
            Ok(path) => path,
            Err(err) if err.depth() == 0 => {
                let err = IndexError::DirectoryUnreadable {
                    path: dir.to_path_buf(),
                    source: err.into(),
                };
                warn!("{}", err);
                report.failures.push(err);
                continue;
            }
            Err(err) => {
                report.matched += 1;
                let file = err
                    .path()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let err = IndexError::ParseFailure {
                    file,
                    source: ParseCause::Io(err.into()),
                };
                warn!("  {}", err);
                report.failures.push(err);
                continue;
            }
        };

        report.matched += 1;
        match extractor::extract(&path, settings) {
            Ok(record) => {
                let marker = if record.default { " [DEFAULT]" } else { "" };
                info!(
                    "  Found: {} ({}) -> {}{}",
                    record.name,
                    record.bible_type.as_deref().unwrap_or(&record.id),
                    record.path,
                    marker
                );
                report.records.push(record);
            }
            Err(err) => {
                warn!("  {}", err);
                report.failures.push(err);
            }
        }
    }

    report
}
