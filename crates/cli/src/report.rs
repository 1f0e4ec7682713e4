use bible_index_core::pipeline::{CheckOutcome, CheckStatus, RunOutcome, RunStatus, RunSummary};
use serde::Serialize;
use serde_json::{json, Value};

fn status_label(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Written => "written",
        RunStatus::DryRun => "dry_run",
        RunStatus::NothingFound => "nothing_found",
    }
}

fn summary_json<S: Serialize>(
    mode: &str,
    status: S,
    summary: &RunSummary,
) -> serde_json::Result<Value> {
    let mut value = serde_json::to_value(summary)?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert("mode".into(), json!(mode));
        obj.insert("status".into(), serde_json::to_value(status)?);
    }
    Ok(value)
}

pub fn build_json(outcome: &RunOutcome) -> serde_json::Result<Value> {
    summary_json("build", outcome.status, &outcome.summary)
}

pub fn check_json(outcome: &CheckOutcome) -> serde_json::Result<Value> {
    summary_json("check", outcome.status, &outcome.summary)
}

pub fn build_text(outcome: &RunOutcome) -> String {
    let s = &outcome.summary;
    match outcome.status {
        RunStatus::NothingFound => "No bibles found!".to_string(),
        RunStatus::Written | RunStatus::DryRun => format!(
            "{}: {} bible(s) from {} file(s), {} duplicate(s), {} error(s) -> {}",
            status_label(outcome.status),
            s.records,
            s.matched_files,
            s.duplicates,
            s.failures.len(),
            s.output
        ),
    }
}

pub fn check_text(outcome: &CheckOutcome) -> String {
    let s = &outcome.summary;
    match outcome.status {
        CheckStatus::UpToDate => format!("{} is up to date ({} bible(s))", s.output, s.records),
        CheckStatus::Stale => format!("{} is out of date; run `bible-index build`", s.output),
        CheckStatus::Missing => format!("{} does not exist; run `bible-index build`", s.output),
        CheckStatus::NothingFound => "No bibles found!".to_string(),
    }
}

/// Whether a check result should fail the process.
pub fn check_failed(outcome: &CheckOutcome) -> bool {
    matches!(outcome.status, CheckStatus::Stale | CheckStatus::Missing)
}
