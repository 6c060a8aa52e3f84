//! Swagger/OpenAPI likelihood for a single probe response.

use once_cell::sync::Lazy;
use regex::Regex;

use super::Classification;
use crate::probe::ProbeResult;
use crate::utils::truncate_chars;

pub const SNIPPET_CHARS: usize = 600;

pub const REASON_MARKER: &str = "marker in body";
pub const REASON_UI: &str = "swagger-ui html";
pub const REASON_PLAIN_JSON: &str = "200 json (no markers)";

/// Literal key markers of a JSON description.
const KEY_MARKERS: &[&str] = &["\"swagger\"", "\"openapi\""];

/// Version lines of a YAML description.
static VERSION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)swagger:\s*2\.0|openapi:\s*3\.").expect("valid version marker regex"));

/// Markers of bundled interactive doc UIs, matched against the lowercased body.
const UI_MARKERS: &[&str] = &[
    "swagger-ui",
    "swaggeruibundle",
    "swagger-ui-bundle.js",
    "swagger-ui-standalone-preset",
    "redoc",
    "rapi-doc",
];

fn is_document_type(ct: &str) -> bool {
    ct.contains("json") || ct.contains("yaml") || ct.contains("yml") || ct.contains("octet-stream")
}

fn has_body_marker(body: &str) -> bool {
    KEY_MARKERS.iter().any(|m| body.contains(m)) || VERSION_MARKER.is_match(body)
}

/// Decide whether a response looks like Swagger/OpenAPI.
///
/// Total over any input. Strong body markers are checked before the plain
/// JSON fallback so they are never downgraded to `SwaggerMaybe`.
pub fn classify_swagger(result: &ProbeResult) -> Classification {
    let ct = result
        .content_type
        .as_deref()
        .unwrap_or("")
        .to_ascii_lowercase();
    let body = result.body_prefix.as_str();

    if is_document_type(&ct) && has_body_marker(body) {
        return Classification::SwaggerLikely {
            reason: REASON_MARKER.to_string(),
            snippet: Some(truncate_chars(body, SNIPPET_CHARS).to_string()),
        };
    }

    if ct.contains("html") {
        let lower = body.to_lowercase();
        if UI_MARKERS.iter().any(|m| lower.contains(m)) {
            return Classification::SwaggerLikely {
                reason: REASON_UI.to_string(),
                snippet: None,
            };
        }
    }

    if result.is_success() && ct.contains("json") && body.trim().starts_with('{') {
        return Classification::SwaggerMaybe {
            reason: REASON_PLAIN_JSON.to_string(),
        };
    }

    Classification::NoMatch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbeMethod;

    fn result(status: u16, ct: Option<&str>, body: &str) -> ProbeResult {
        ProbeResult {
            requested_url: "https://example.com/x".into(),
            status,
            content_type: ct.map(str::to_string),
            body_prefix: body.to_string(),
            method: ProbeMethod::Get,
        }
    }

    #[test]
    fn yaml_version_line_is_a_marker() {
        let r = result(200, Some("application/x-yaml"), "OpenAPI: 3.0.1\ninfo:\n  title: x\n");
        assert!(classify_swagger(&r).is_swagger_likely());
    }

    #[test]
    fn octet_stream_with_marker_counts() {
        let r = result(200, Some("application/octet-stream"), "swagger: 2.0");
        assert!(classify_swagger(&r).is_swagger_likely());
    }

    #[test]
    fn content_type_is_case_insensitive() {
        let r = result(200, Some("Application/JSON; charset=UTF-8"), r#"{"openapi":"3.1.0"}"#);
        assert!(classify_swagger(&r).is_swagger_likely());
    }

    #[test]
    fn snippet_is_capped() {
        let body = format!(r#"{{"swagger":"2.0","x":"{}"}}"#, "a".repeat(2000));
        match classify_swagger(&result(200, Some("application/json"), &body)) {
            Classification::SwaggerLikely { snippet: Some(s), .. } => assert_eq!(s.chars().count(), SNIPPET_CHARS),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn html_without_ui_markers_is_no_match() {
        let r = result(200, Some("text/html"), "<html><body>hello</body></html>");
        assert_eq!(classify_swagger(&r), Classification::NoMatch);
    }

    #[test]
    fn failed_plain_json_is_no_match() {
        let r = result(404, Some("application/json"), r#"{"error":"not found"}"#);
        assert_eq!(classify_swagger(&r), Classification::NoMatch);
    }

    #[test]
    fn missing_content_type_is_no_match() {
        let r = result(200, None, r#"{"swagger":"2.0"}"#);
        assert_eq!(classify_swagger(&r), Classification::NoMatch);
    }
}
