//! Dynamic page observation through a headless browser.
//!
//! The scan only depends on [`DynamicObserver`]; the Chrome DevTools backed
//! [`ChromiumObserver`] is one optional implementation of it.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use url::Url;

use crate::filter::api_patterns::is_api_like_url;
use crate::target;
use crate::utils::UniqueList;

/// What a full page load revealed.
#[derive(Debug, Clone, Default)]
pub struct Observation {
    pub rendered_markup: String,
    /// Absolute request URLs that look like API traffic.
    pub observed_urls: Vec<String>,
}

#[async_trait]
pub trait DynamicObserver: Send + Sync {
    async fn observe(&self, url: &Url) -> Result<Observation>;
}

const BROWSER_CANDIDATES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
    "chrome",
];

/// Locate a Chrome/Chromium executable on `PATH`.
pub fn find_browser() -> Option<PathBuf> {
    BROWSER_CANDIDATES.iter().find_map(|name| which::which(name).ok())
}

/// Every resource the page requested, plus quoted URLs in inline scripts.
const COLLECT_URLS_JS: &str = r#"
    (function() {
        const urls = new Set();
        try {
            performance.getEntriesByType('resource').forEach(e => urls.add(e.name));
        } catch (e) {}
        Array.from(document.scripts).forEach(script => {
            try {
                const content = script.textContent || '';
                const matches = content.match(/["'`]((?:https?:)?\/\/[^"'`\s]+|\/[^"'`\s]+)["'`]/g);
                if (matches) {
                    matches.forEach(m => urls.add(m.slice(1, -1)));
                }
            } catch (e) {}
        });
        return Array.from(urls);
    })()
"#;

pub struct ChromiumObserver {
    executable: PathBuf,
    wait: Duration,
}

impl ChromiumObserver {
    /// Fails when no browser binary is installed.
    pub fn new(wait: Duration) -> Result<Self> {
        let executable = find_browser().ok_or_else(|| anyhow!("no Chrome/Chromium executable found on PATH"))?;
        Ok(Self { executable, wait })
    }

    fn filter_urls(base: &Url, raw: Vec<String>) -> Vec<String> {
        let mut out = UniqueList::new();
        for candidate in raw {
            if let Some(u) = target::resolve_str(base, &candidate) {
                if is_api_like_url(&u) {
                    out.insert(u);
                }
            }
        }
        out.into_vec()
    }
}

#[async_trait]
impl DynamicObserver for ChromiumObserver {
    async fn observe(&self, url: &Url) -> Result<Observation> {
        tracing::info!(target = %url, browser = %self.executable.display(), "starting dynamic observation");

        let config = BrowserConfig::builder()
            .chrome_executable(&self.executable)
            .no_sandbox()
            .args(vec!["--disable-gpu", "--disable-dev-shm-usage", "--window-size=1920,1080"])
            .build()
            .map_err(|e| anyhow!("browser config error: {}", e))?;

        let (mut browser, mut handler) = Browser::launch(config).await.context("failed to launch browser")?;
        let handler_task = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let outcome = async {
            let page = browser.new_page("about:blank").await?;
            if let Err(e) = page.goto(url.as_str()).await {
                tracing::warn!(error = %e, "page navigation reported an error");
            }
            tokio::time::sleep(self.wait).await;
            let _ = page.evaluate("window.scrollTo(0, document.body.scrollHeight);").await;
            tokio::time::sleep(Duration::from_millis(300)).await;

            let raw: Vec<String> = match page.evaluate(COLLECT_URLS_JS).await {
                Ok(v) => v.into_value().unwrap_or_default(),
                Err(e) => {
                    tracing::debug!(error = %e, "url collection script failed");
                    Vec::new()
                }
            };
            let rendered_markup = page.content().await.unwrap_or_default();
            Ok::<Observation, anyhow::Error>(Observation {
                rendered_markup,
                observed_urls: Self::filter_urls(url, raw),
            })
        }
        .await;

        let _ = browser.close().await;
        handler_task.abort();

        let observation = outcome?;
        tracing::info!(urls = observation.observed_urls.len(), "dynamic observation finished");
        Ok(observation)
    }
}
