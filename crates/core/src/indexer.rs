use crate::config::Settings;
use crate::error::{IndexError, Result};
use crate::models::{BibleRecord, IndexSchema};
use crate::scanner::{self, ScanReport};
use std::collections::HashSet;
use tracing::{debug, info};

#[derive(Debug)]
pub struct BuildReport {
    pub scans: Vec<ScanReport>,
    pub records: Vec<BibleRecord>,
    pub duplicates: usize,
}

impl BuildReport {
    pub fn matched_files(&self) -> usize {
        self.scans.iter().map(|s| s.matched).sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &IndexError> {
        self.scans.iter().flat_map(|s| s.failures.iter())
    }

    /// Final index, or [`IndexError::EmptyResult`] when nothing was found.
    pub fn into_index(self) -> Result<Vec<BibleRecord>> {
        if self.records.is_empty() {
            return Err(IndexError::EmptyResult);
        }
        Ok(self.records)
    }
}

pub fn build_index(settings: &Settings) -> BuildReport {
    let mut scans = Vec::with_capacity(settings.directories.len());
    let mut all = Vec::new();

    for rel_dir in &settings.directories {
        info!("Scanning: {}", rel_dir);
        let mut report = scanner::scan_directory(&settings.directory_path(rel_dir), settings);
        all.append(&mut report.records);
        scans.push(report);
    }

    let found = all.len();
    let records = dedup(all, settings.schema);
    let duplicates = found - records.len();
    if duplicates > 0 {
        debug!("dropped {} duplicate record(s)", duplicates);
    }

    BuildReport {
        scans,
        records,
        duplicates,
    }
}

/// Keeps the first record for each dedup key, preserving order.
pub fn dedup(records: Vec<BibleRecord>, schema: IndexSchema) -> Vec<BibleRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert(schema.dedup_key(r).to_string()))
        .collect()
}
