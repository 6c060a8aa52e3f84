use std::time::Duration;

use anyhow::{anyhow, bail};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use url::Url;

use super::candidates::{extract_strings, Extraction};
use crate::classify::config_hints::extract_hints;
use crate::config::ScanConfig;
use crate::output::report::HintFinding;
use crate::probe::http_probe::read_body_prefix;

/// GET `url` and decode at most `max_bytes` of the body.
///
/// With `require_success` a status of 400 or above is an error; otherwise
/// error pages are returned like any other markup.
pub async fn fetch_text(client: &Client, url: &Url, timeout: Duration, max_bytes: usize, require_success: bool) -> anyhow::Result<String> {
    let fut = async {
        let mut resp = client.get(url.clone()).send().await?;
        let status = resp.status();
        if require_success && !status.is_success() {
            bail!("{} returned {}", url, status);
        }
        let bytes = read_body_prefix(&mut resp, max_bytes).await?;
        Ok::<String, anyhow::Error>(String::from_utf8_lossy(&bytes).into_owned())
    };
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| anyhow!("fetching {} timed out", url))?
}

/// Cumulative findings across every fetched external script.
#[derive(Debug, Default)]
pub struct ScriptScan {
    pub extraction: Extraction,
    pub hints: Vec<HintFinding>,
    pub fetched: usize,
    pub failed: usize,
}

/// Fetch scripts with bounded concurrency and mine each one for API-like
/// strings, swagger filenames and backend hints. Unreachable scripts are
/// skipped.
pub async fn scan_scripts(client: &Client, script_urls: &[String], config: &ScanConfig) -> ScriptScan {
    let urls: Vec<Url> = script_urls
        .iter()
        .filter_map(|s| Url::parse(s).ok())
        .take(config.max_scripts)
        .collect();
    if script_urls.len() > config.max_scripts {
        tracing::info!(found = script_urls.len(), limit = config.max_scripts, "script list truncated");
    }

    let timeout = config.timeout();
    let max_bytes = config.max_script_bytes;
    let bodies: Vec<(Url, anyhow::Result<String>)> = stream::iter(urls)
        .map(|url| async move {
            let res = fetch_text(client, &url, timeout, max_bytes, true).await;
            (url, res)
        })
        .buffered(config.concurrency.max(1))
        .collect()
        .await;

    let mut scan = ScriptScan::default();
    for (url, res) in bodies {
        match res {
            Ok(text) => {
                scan.fetched += 1;
                extract_strings(&text, &mut scan.extraction);
                let hints = extract_hints(&text);
                if !hints.is_empty() {
                    tracing::debug!(script = %url, hints = hints.len(), "backend hints in script");
                    scan.hints.push(HintFinding { source: url.to_string(), hints });
                }
            }
            Err(e) => {
                scan.failed += 1;
                tracing::debug!(script = %url, error = %e, "script fetch failed");
            }
        }
    }
    scan
}
