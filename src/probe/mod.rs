pub mod cache;
pub mod fuzz;
pub mod http_probe;
pub mod scheduler;

use serde::Serialize;

use crate::classify::Classification;

pub use cache::ResultCache;
pub use scheduler::ProbeScheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProbeMethod {
    Head,
    Get,
}

/// Whether a probe's classifier needs the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyPolicy {
    /// A successful HEAD is enough.
    Existence,
    /// A successful HEAD is followed by a GET to read the body prefix.
    Required,
}

/// One completed HTTP exchange. Built once per resolved URL per scan and
/// never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub requested_url: String,
    pub status: u16,
    pub content_type: Option<String>,
    /// Lossy UTF-8 decoding of at most `max_body_bytes` of the body.
    pub body_prefix: String,
    pub method: ProbeMethod,
}

impl ProbeResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A probe whose classification was accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeHit {
    pub path: String,
    pub url: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub method: ProbeMethod,
    pub classification: Classification,
}
