use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use attachment_engine::{EngineEvent, JobOutcome, OutputDir};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionStatus {
    NoAttachments,
    Direct,
    Archive,
    Failed,
    /// Activated, but no completion was reported.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFile {
    pub filename: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionReport {
    pub region: usize,
    pub status: RegionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub failed_files: Vec<FailedFile>,
}

impl RegionReport {
    fn pending(region: usize) -> Self {
        Self {
            region,
            status: RegionStatus::Unknown,
            filename: None,
            archived: None,
            requested: None,
            error: None,
            failed_files: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub page: String,
    pub output_dir: String,
    pub regions: Vec<RegionReport>,
}

/// Fold engine events into one entry per activated region.
pub fn build_report(
    page: &str,
    output_dir: &Path,
    activated: &[usize],
    events: impl IntoIterator<Item = EngineEvent>,
) -> RunReport {
    let mut regions: BTreeMap<usize, RegionReport> = activated
        .iter()
        .map(|&region| (region, RegionReport::pending(region)))
        .collect();

    for event in events {
        match event {
            EngineEvent::FileFailed {
                region,
                filename,
                kind,
            } => {
                if let Some(entry) = regions.get_mut(&region) {
                    entry.failed_files.push(FailedFile {
                        filename,
                        reason: kind.to_string(),
                    });
                }
            }
            EngineEvent::JobCompleted { region, result } => {
                if let Some(entry) = regions.get_mut(&region) {
                    record_result(entry, result);
                }
            }
            _ => {}
        }
    }

    RunReport {
        page: page.to_string(),
        output_dir: output_dir.display().to_string(),
        regions: regions.into_values().collect(),
    }
}

fn record_result(entry: &mut RegionReport, result: Result<JobOutcome, attachment_engine::JobError>) {
    match result {
        Ok(JobOutcome::NoAttachments) => entry.status = RegionStatus::NoAttachments,
        Ok(JobOutcome::Direct { filename, .. }) => {
            entry.status = RegionStatus::Direct;
            entry.filename = Some(filename);
        }
        Ok(JobOutcome::Archive {
            filename,
            archived,
            requested,
        }) => {
            entry.status = RegionStatus::Archive;
            entry.filename = Some(filename);
            entry.archived = Some(archived);
            entry.requested = Some(requested);
        }
        Err(err) => {
            entry.status = RegionStatus::Failed;
            entry.error = Some(err.to_string());
        }
    }
}

pub fn write_report(path: &Path, report: &RunReport) -> anyhow::Result<()> {
    let content = serde_json::to_string_pretty(report).context("failed to serialize report")?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("invalid report path {:?}", path))?;
    OutputDir::new(dir)
        .save(filename, content.as_bytes())
        .with_context(|| format!("failed to write report {:?}", path))?;
    Ok(())
}
