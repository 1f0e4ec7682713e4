use crate::config::Settings;
use crate::error::{IndexError, Result};
use crate::indexer::{self, BuildReport};
use crate::writer;
use serde::Serialize;
use std::fs;
use std::io;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Written,
    DryRun,
    NothingFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    UpToDate,
    Stale,
    Missing,
    NothingFound,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub directories: usize,
    pub missing_directories: Vec<String>,
    pub matched_files: usize,
    pub records: usize,
    pub duplicates: usize,
    pub failures: Vec<String>,
    pub output: String,
    pub digest: Option<String>,
}

#[derive(Debug)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub summary: RunSummary,
    /// Rendered manifest, kept only for dry runs.
    pub manifest: Option<Vec<u8>>,
}

#[derive(Debug)]
pub struct CheckOutcome {
    pub status: CheckStatus,
    pub summary: RunSummary,
}

fn summarize(report: &BuildReport, settings: &Settings) -> RunSummary {
    RunSummary {
        directories: report.scans.len(),
        missing_directories: report
            .scans
            .iter()
            .filter(|s| s.missing)
            .map(|s| s.directory.display().to_string())
            .collect(),
        matched_files: report.matched_files(),
        records: report.records.len(),
        duplicates: report.duplicates,
        failures: report
            .failures()
            .filter(|e| !matches!(e, IndexError::DirectoryMissing { .. }))
            .map(|e| e.to_string())
            .collect(),
        output: settings.output_path.display().to_string(),
        digest: None,
    }
}

/// Builds the index and writes it unless it came out empty or this is a dry
/// run. Only write failures are returned as errors.
pub fn run(settings: &Settings, options: RunOptions) -> Result<RunOutcome> {
    let report = indexer::build_index(settings);
    let mut summary = summarize(&report, settings);

    let records = match report.into_index() {
        Ok(records) => records,
        Err(IndexError::EmptyResult) => {
            return Ok(RunOutcome {
                status: RunStatus::NothingFound,
                summary,
                manifest: None,
            });
        }
        Err(e) => return Err(e),
    };

    if options.dry_run {
        let bytes = writer::render_index(&records, settings.schema).map_err(|source| {
            IndexError::WriteFailure {
                path: settings.output_path.clone(),
                source,
            }
        })?;
        summary.digest = Some(writer::digest(&bytes));
        info!("Dry run: {} bible(s), nothing written", records.len());
        return Ok(RunOutcome {
            status: RunStatus::DryRun,
            summary,
            manifest: Some(bytes),
        });
    }

    let digest = writer::write_index(&records, settings.schema, &settings.output_path)?;
    info!("Index saved to: {}", settings.output_path.display());
    info!("Total bibles: {}", records.len());
    summary.digest = Some(digest);
    Ok(RunOutcome {
        status: RunStatus::Written,
        summary,
        manifest: None,
    })
}

/// Rebuilds in memory and compares against the manifest on disk. Never writes.
pub fn check(settings: &Settings) -> Result<CheckOutcome> {
    let report = indexer::build_index(settings);
    let mut summary = summarize(&report, settings);

    let records = match report.into_index() {
        Ok(records) => records,
        Err(IndexError::EmptyResult) => {
            return Ok(CheckOutcome {
                status: CheckStatus::NothingFound,
                summary,
            })
        }
        Err(e) => return Err(e),
    };

    let expected = writer::render_index(&records, settings.schema).map_err(|source| {
        IndexError::WriteFailure {
            path: settings.output_path.clone(),
            source,
        }
    })?;
    let expected_digest = writer::digest(&expected);
    summary.digest = Some(expected_digest.clone());

    let status = match fs::read(&settings.output_path) {
        Ok(current) if writer::digest(&current) == expected_digest => CheckStatus::UpToDate,
        Ok(_) => CheckStatus::Stale,
        Err(e) if e.kind() == io::ErrorKind::NotFound => CheckStatus::Missing,
        Err(e) => {
            warn!(
                "could not read {}: {}",
                settings.output_path.display(),
                e
            );
            CheckStatus::Stale
        }
    };
    Ok(CheckOutcome { status, summary })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use tempfile::tempdir;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn nothing_found_is_left_to_the_caller_to_report() {
        let temp = tempdir().unwrap();
        let cfg = AppConfig {
            base_dir: temp.path().to_string_lossy().into_owned(),
            ..AppConfig::default()
        };
        let settings = Settings::from_config(&cfg).unwrap();

        let outcome = run(&settings, RunOptions::default()).unwrap();
        assert_eq!(outcome.status, RunStatus::NothingFound);
        assert!(!logs_contain("No bibles found"));
        assert!(!settings.output_path.exists());
    }
}
