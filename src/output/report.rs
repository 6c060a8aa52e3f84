use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::probe::ProbeHit;

/// Backend hints found in one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HintFinding {
    pub source: String,
    pub hints: Vec<String>,
}

/// Per-stage counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanStats {
    pub landing_page_fetched: bool,
    pub scripts_fetched: usize,
    pub scripts_failed: usize,
    pub swagger_targets: usize,
    pub config_targets: usize,
    pub api_targets: usize,
    pub duration_ms: u64,
}

/// Everything one scan found. Built after the probe pools have joined and
/// handed to the report writer as-is.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub target: String,
    pub timestamp: DateTime<Utc>,
    pub html_candidates: Vec<String>,
    pub script_urls: Vec<String>,
    pub script_candidates: Vec<String>,
    pub swagger_files: Vec<String>,
    pub swagger_probes: Vec<ProbeHit>,
    pub config_hints: Vec<HintFinding>,
    pub api_probes: Vec<ProbeHit>,
    pub suggested_bases: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_urls: Option<Vec<String>>,
    pub stats: ScanStats,
}

impl ScanReport {
    /// Swagger probes with strong evidence.
    pub fn swagger_found(&self) -> impl Iterator<Item = &ProbeHit> {
        self.swagger_probes.iter().filter(|h| h.classification.is_swagger_likely())
    }
}

/// Write the report as pretty-printed JSON.
pub fn write_json(path: &Path, report: &ScanReport) -> anyhow::Result<()> {
    let data = serde_json::to_string_pretty(report).context("serializing scan report")?;
    std::fs::write(path, data).with_context(|| format!("writing report to {}", path.display()))?;
    Ok(())
}
