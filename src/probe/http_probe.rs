use std::future::Future;
use std::time::Duration;

use anyhow::anyhow;
use reqwest::{Client, Response};
use url::Url;

use super::{BodyPolicy, ProbeMethod, ProbeResult};

/// Per-request limits shared by every worker.
#[derive(Debug, Clone, Copy)]
pub struct RequestSettings {
    pub timeout: Duration,
    pub max_body_bytes: usize,
}

async fn with_timeout<T>(limit: Duration, fut: impl Future<Output = anyhow::Result<T>>) -> anyhow::Result<T> {
    match tokio::time::timeout(limit, fut).await {
        Ok(res) => res,
        Err(_) => Err(anyhow!("timed out after {}ms", limit.as_millis())),
    }
}

/// Read at most `max` bytes of the body, stopping early once the cap is hit.
pub async fn read_body_prefix(resp: &mut Response, max: usize) -> anyhow::Result<Vec<u8>> {
    let mut buf = Vec::new();
    while buf.len() < max {
        let Some(chunk) = resp.chunk().await? else { break };
        let room = max - buf.len();
        buf.extend_from_slice(&chunk[..chunk.len().min(room)]);
    }
    Ok(buf)
}

async fn attempt(client: &Client, url: &Url, method: ProbeMethod, max_body: usize) -> anyhow::Result<ProbeResult> {
    let req = match method {
        ProbeMethod::Head => client.head(url.clone()),
        ProbeMethod::Get => client.get(url.clone()),
    };
    let mut resp = req.send().await?;
    let status = resp.status().as_u16();
    let content_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let body_prefix = match method {
        ProbeMethod::Head => String::new(),
        ProbeMethod::Get => String::from_utf8_lossy(&read_body_prefix(&mut resp, max_body).await?).into_owned(),
    };
    Ok(ProbeResult {
        requested_url: url.to_string(),
        status,
        content_type,
        body_prefix,
        method,
    })
}

/// Run the request protocol for one target.
///
/// HEAD first. A HEAD at or above 400, or one that errors, is retried once as
/// GET. With [`BodyPolicy::Required`] a successful HEAD is followed by a GET
/// for the body; if that GET fails the HEAD result stands. Every attempt is
/// bounded by `settings.timeout`. Errors never escape: the target just
/// yields `None`.
pub async fn probe_target(client: &Client, url: &Url, settings: RequestSettings, policy: BodyPolicy) -> Option<ProbeResult> {
    let head = with_timeout(settings.timeout, attempt(client, url, ProbeMethod::Head, 0)).await;
    let head_ok = match head {
        Ok(r) if r.status < 400 => match policy {
            BodyPolicy::Existence => return Some(r),
            BodyPolicy::Required => Some(r),
        },
        Ok(r) => {
            tracing::debug!(url = %url, status = r.status, "HEAD rejected, retrying with GET");
            None
        }
        Err(e) => {
            tracing::debug!(url = %url, error = %e, "HEAD failed, retrying with GET");
            None
        }
    };

    match with_timeout(settings.timeout, attempt(client, url, ProbeMethod::Get, settings.max_body_bytes)).await {
        Ok(r) => Some(r),
        Err(e) => {
            tracing::debug!(url = %url, error = %e, "GET failed");
            head_ok
        }
    }
}
