use std::time::Duration;

use anyhow::Context;
use reqwest::{Client, ClientBuilder};

use crate::config::ScanConfig;

/// Build the shared scan client with connection pooling enabled.
pub fn build_client(config: &ScanConfig) -> anyhow::Result<Client> {
    ClientBuilder::new()
        // Connection pooling - reuse connections across workers
        .pool_max_idle_per_host(config.concurrency.max(1) * 2)
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .tcp_nodelay(true)
        .timeout(config.timeout())
        .connect_timeout(config.timeout().min(Duration::from_secs(5)))
        .gzip(true)
        .brotli(true)
        .use_rustls_tls()
        .redirect(reqwest::redirect::Policy::limited(5))
        .user_agent(config.user_agent.as_str())
        // Assessment targets frequently run self-signed certificates
        .danger_accept_invalid_certs(true)
        .build()
        .context("failed to build HTTP client")
}
