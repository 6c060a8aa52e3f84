pub mod config_hints;
pub mod swagger;

use serde::Serialize;

pub use config_hints::{classify_config, extract_hints};
pub use swagger::classify_swagger;

/// Verdict a classifier reaches about one probe response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classification {
    /// Strong evidence of a Swagger/OpenAPI document or UI.
    SwaggerLikely {
        reason: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        snippet: Option<String>,
    },
    /// Plain successful JSON object without any marker.
    SwaggerMaybe { reason: String },
    /// Backend URL hints pulled from a config-like response.
    ConfigHint { hints: Vec<String> },
    /// API-like URL answered below 400.
    Reachable { status: u16 },
    NoMatch,
}

impl Classification {
    pub fn is_match(&self) -> bool {
        !matches!(self, Classification::NoMatch)
    }

    pub fn is_swagger_likely(&self) -> bool {
        matches!(self, Classification::SwaggerLikely { .. })
    }
}

/// Accept any API-like URL that answered below 400.
pub fn classify_reachable(result: &crate::probe::ProbeResult) -> Classification {
    if result.status > 0 && result.status < 400 {
        Classification::Reachable { status: result.status }
    } else {
        Classification::NoMatch
    }
}
