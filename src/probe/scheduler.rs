//! Bounded-concurrency probe pool.
//!
//! A fixed number of workers pull resolved targets from one shared FIFO
//! queue. Each worker runs the request protocol, classifies the result, pushes
//! accepted hits into an explicit sink, then sleeps the politeness delay
//! before pulling again. `probe` returns once every worker has drained the
//! queue and exited.
//!
//! Outcomes are cached per scheduler, so a URL shared by several probe sets
//! is requested once and only re-classified.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use ahash::AHashSet;
use parking_lot::Mutex;
use reqwest::Client;
use tokio::task::JoinSet;
use url::Url;

use super::cache::ResultCache;
use super::http_probe::{probe_target, RequestSettings};
use super::{BodyPolicy, ProbeHit, ProbeResult};
use crate::classify::Classification;
use crate::config::ScanConfig;
use crate::target;

struct Job {
    path: String,
    url: Url,
}

type Queue = Arc<Mutex<VecDeque<Job>>>;
type Sink = Arc<Mutex<Vec<ProbeHit>>>;

#[derive(Debug, Clone)]
pub struct ProbeScheduler {
    client: Client,
    concurrency: usize,
    delay: Duration,
    settings: RequestSettings,
    cache: ResultCache,
}

impl ProbeScheduler {
    pub fn new(client: Client, config: &ScanConfig) -> Self {
        Self {
            client,
            concurrency: config.concurrency.max(1),
            delay: config.delay(),
            settings: RequestSettings {
                timeout: config.timeout(),
                max_body_bytes: config.max_body_bytes,
            },
            cache: ResultCache::new(),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Resolve and dedup `paths` against `base`. Invalid paths are dropped,
    /// and paths resolving to the same absolute URL collapse to the first one.
    fn build_queue<I, S>(base: &Url, paths: I) -> VecDeque<Job>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = AHashSet::new();
        let mut queue = VecDeque::new();
        for raw in paths {
            let raw = raw.as_ref();
            let Some(url) = target::resolve(base, raw) else {
                tracing::debug!(path = raw, "skipping unresolvable path");
                continue;
            };
            if seen.insert(url.as_str().to_string()) {
                queue.push_back(Job { path: raw.to_string(), url });
            }
        }
        queue
    }

    /// Probe every unique target and return the ones `classify` accepted.
    ///
    /// Result order is unspecified. `classify` must be total: it sees every
    /// completed response, malformed or not.
    pub async fn probe<I, S, F>(&self, base: &Url, paths: I, policy: BodyPolicy, classify: F) -> Vec<ProbeHit>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&ProbeResult) -> Classification + Send + Sync + 'static,
    {
        let queue = Self::build_queue(base, paths);
        let total = queue.len();
        if total == 0 {
            return Vec::new();
        }
        tracing::debug!(targets = total, workers = self.concurrency, "starting probe pool");

        let queue: Queue = Arc::new(Mutex::new(queue));
        let sink: Sink = Arc::new(Mutex::new(Vec::new()));
        let classify = Arc::new(classify);

        let mut workers = JoinSet::new();
        for worker_id in 0..self.concurrency.min(total) {
            let queue = Arc::clone(&queue);
            let sink = Arc::clone(&sink);
            let classify = Arc::clone(&classify);
            let ctx = WorkerContext {
                id: worker_id,
                client: self.client.clone(),
                settings: self.settings,
                delay: self.delay,
                policy,
                cache: self.cache.clone(),
            };
            workers.spawn(async move {
                run_worker(ctx, queue, sink, classify).await;
            });
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "probe worker terminated abnormally");
            }
        }

        let hits = std::mem::take(&mut *sink.lock());
        tracing::debug!(targets = total, hits = hits.len(), "probe pool finished");
        hits
    }
}

struct WorkerContext {
    id: usize,
    client: Client,
    settings: RequestSettings,
    delay: Duration,
    policy: BodyPolicy,
    cache: ResultCache,
}

async fn run_worker<F>(ctx: WorkerContext, queue: Queue, sink: Sink, classify: Arc<F>)
where
    F: Fn(&ProbeResult) -> Classification + Send + Sync + 'static,
{
    loop {
        // Lock is released before any await
        let next = queue.lock().pop_front();
        let Some(job) = next else { break };

        let (outcome, fetched) = match ctx.cache.lookup(job.url.as_str(), ctx.policy) {
            Some(cached) => (cached, false),
            None => {
                let res = probe_target(&ctx.client, &job.url, ctx.settings, ctx.policy).await;
                ctx.cache.insert(job.url.to_string(), res.clone());
                (res, true)
            }
        };

        if let Some(result) = outcome {
            let classification = classify(&result);
            tracing::debug!(worker = ctx.id, url = %job.url, status = result.status, cached = !fetched, matched = classification.is_match(), "probed");
            if classification.is_match() {
                sink.lock().push(ProbeHit {
                    path: job.path,
                    url: result.requested_url,
                    status: result.status,
                    content_type: result.content_type,
                    method: result.method,
                    classification,
                });
            }
        }

        if fetched && !ctx.delay.is_zero() {
            tokio::time::sleep(ctx.delay).await;
        }
    }
}
