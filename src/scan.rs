//! End-to-end scan pipeline.
//!
//! Landing page → static extraction (+ optional dynamic observation) →
//! script mining → swagger, config and API probe pools → aggregation.

use std::time::Instant;

use chrono::Utc;
use reqwest::Client;
use url::Url;

use crate::aggregate::aggregate;
use crate::classify::{classify_config, classify_reachable, classify_swagger, extract_hints, Classification};
use crate::config::{ScanConfig, Wordlists};
use crate::discover::DynamicObserver;
use crate::gather::candidates::{extract, is_interesting_file};
use crate::gather::{fetch_text, scan_scripts};
use crate::http_client::build_client;
use crate::output::{HintFinding, ScanReport, ScanStats};
use crate::probe::{fuzz, BodyPolicy, ProbeHit, ProbeScheduler};
use crate::target;
use crate::utils::UniqueList;

pub struct Scanner {
    config: ScanConfig,
    wordlists: Wordlists,
    client: Client,
    scheduler: ProbeScheduler,
    observer: Option<Box<dyn DynamicObserver>>,
}

impl Scanner {
    pub fn new(config: ScanConfig, wordlists: Wordlists) -> anyhow::Result<Self> {
        let client = build_client(&config)?;
        let scheduler = ProbeScheduler::new(client.clone(), &config);
        Ok(Self {
            config,
            wordlists,
            client,
            scheduler,
            observer: None,
        })
    }

    pub fn with_observer(mut self, observer: Box<dyn DynamicObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Swagger probe set: fixed paths, extracted filenames, then fuzz
    /// expansion when enabled.
    pub fn swagger_targets(&self, swagger_files: &UniqueList) -> Vec<String> {
        let mut paths: Vec<String> = self.wordlists.swagger_paths.clone();
        paths.extend(swagger_files.iter().cloned());
        if self.config.fuzz {
            paths.extend(fuzz::expand(&self.wordlists.fuzz_prefixes, &self.wordlists.fuzz_basenames));
        }
        paths
    }

    /// Config probe set: fixed config paths plus config-like references.
    pub fn config_targets(&self, swagger_files: &UniqueList) -> Vec<String> {
        let mut paths: Vec<String> = self.wordlists.config_paths.clone();
        paths.extend(swagger_files.iter().filter(|f| is_interesting_file(f)).cloned());
        paths
    }

    /// Run one scan. Only an unusable target is an error; every later stage
    /// degrades to empty results instead of failing.
    pub async fn run(&self, target_input: &str) -> anyhow::Result<ScanReport> {
        let started = Instant::now();
        let base = target::normalize_base(target_input)?;
        let mut stats = ScanStats::default();
        tracing::info!(target = %base, concurrency = self.scheduler.concurrency(), fuzz = self.config.fuzz, "starting scan");

        let landing = match fetch_text(&self.client, &base, self.config.timeout(), self.config.max_script_bytes, false).await {
            Ok(body) => {
                stats.landing_page_fetched = true;
                body
            }
            Err(e) => {
                tracing::warn!(error = %e, "landing page fetch failed, continuing with empty markup");
                String::new()
            }
        };

        let mut html = extract(&landing, &base);
        let mut hint_findings = Vec::new();
        let landing_hints = extract_hints(&landing);
        if !landing_hints.is_empty() {
            hint_findings.push(HintFinding { source: base.to_string(), hints: landing_hints });
        }

        let mut dynamic_urls = None;
        if let Some(observer) = &self.observer {
            match observer.observe(&base).await {
                Ok(obs) => {
                    html.merge(extract(&obs.rendered_markup, &base));
                    let rendered_hints: Vec<String> = extract_hints(&obs.rendered_markup)
                        .into_iter()
                        .filter(|h| !hint_findings.iter().any(|f| f.hints.contains(h)))
                        .collect();
                    if !rendered_hints.is_empty() {
                        hint_findings.push(HintFinding { source: format!("{} (rendered)", base), hints: rendered_hints });
                    }
                    dynamic_urls = Some(obs.observed_urls);
                }
                Err(e) => tracing::warn!(error = %e, "dynamic observer unavailable, skipping"),
            }
        }
        tracing::info!(
            api_like = html.api_like.len(),
            scripts = html.script_urls.len(),
            files = html.swagger_files.len(),
            "landing page extraction done"
        );

        let scripts = scan_scripts(&self.client, html.script_urls.as_slice(), &self.config).await;
        stats.scripts_fetched = scripts.fetched;
        stats.scripts_failed = scripts.failed;
        hint_findings.extend(scripts.hints);
        let script_extraction = scripts.extraction;

        let mut swagger_files = html.swagger_files.clone();
        swagger_files.extend(script_extraction.swagger_files.iter().cloned());

        // Swagger/OpenAPI probes
        let swagger_paths = self.swagger_targets(&swagger_files);
        stats.swagger_targets = swagger_paths.len();
        let swagger_probes = sort_hits(self.scheduler.probe(&base, swagger_paths, BodyPolicy::Required, classify_swagger).await);
        tracing::info!(
            hits = swagger_probes.len(),
            likely = swagger_probes.iter().filter(|h| h.classification.is_swagger_likely()).count(),
            "swagger probes done"
        );

        // Config file probes
        let config_paths = self.config_targets(&swagger_files);
        stats.config_targets = config_paths.len();
        let config_probes = sort_hits(self.scheduler.probe(&base, config_paths, BodyPolicy::Required, classify_config).await);
        for hit in config_probes {
            if let Classification::ConfigHint { hints } = hit.classification {
                hint_findings.push(HintFinding { source: hit.url, hints });
            }
        }
        tracing::info!(documents = hint_findings.len(), "config hints collected");

        // API-like candidates, runtime-observed ones first
        let mut api_candidates = UniqueList::new();
        if let Some(urls) = &dynamic_urls {
            api_candidates.extend(urls.iter().cloned());
        }
        api_candidates.extend(html.api_like.iter().cloned());
        api_candidates.extend(script_extraction.api_like.iter().cloned());
        if api_candidates.len() > self.config.max_api_probes {
            tracing::info!(found = api_candidates.len(), limit = self.config.max_api_probes, "api candidate list truncated");
        }
        let api_paths: Vec<String> = api_candidates.into_iter().take(self.config.max_api_probes).collect();
        stats.api_targets = api_paths.len();
        let api_probes = sort_hits(self.scheduler.probe(&base, api_paths, BodyPolicy::Existence, classify_reachable).await);
        tracing::info!(reachable = api_probes.len(), "api probes done");

        let suggested_bases = aggregate(
            hint_findings.iter().flat_map(|f| f.hints.iter()),
            api_probes.iter().map(|h| h.url.as_str()),
            swagger_probes.iter().filter(|h| h.classification.is_swagger_likely()).map(|h| h.url.as_str()),
            &base,
        );

        stats.duration_ms = started.elapsed().as_millis() as u64;
        tracing::info!(suggestions = suggested_bases.len(), ms = stats.duration_ms, "scan finished");

        Ok(ScanReport {
            target: base.to_string(),
            timestamp: Utc::now(),
            html_candidates: html.api_like.into_vec(),
            script_urls: html.script_urls.into_vec(),
            script_candidates: script_extraction.api_like.into_vec(),
            swagger_files: swagger_files.into_vec(),
            swagger_probes,
            config_hints: hint_findings,
            api_probes,
            suggested_bases,
            dynamic_urls,
            stats,
        })
    }
}

/// Probe pools finish in arbitrary order; downstream stages see hits by URL.
fn sort_hits(mut hits: Vec<ProbeHit>) -> Vec<ProbeHit> {
    hits.sort_by(|a, b| a.url.cmp(&b.url));
    hits
}
