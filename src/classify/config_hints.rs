//! Backend URL hints leaked by config files and scripts.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::Classification;
use crate::probe::ProbeResult;
use crate::utils::UniqueList;

/// Keyword scan stops after this many lines.
pub const MAX_KEYWORD_LINES: usize = 2000;

const MAX_JSON_DEPTH: usize = 16;

pub static URL_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"https?://[A-Za-z0-9.\-]+(?::\d+)?(?:/[^\s"'`<>()\[\]{}\\,;]*)?"#).expect("valid url literal regex")
});

pub static BACKEND_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:API_URL|BASE_URL|API_BASE|BACKEND_URL|SERVER_URL|apiUrl|baseUrl|apiBase|apiEndpoint|axios\.create|proxy)")
        .expect("valid backend keyword regex")
});

static QUOTED_API_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"["'`]((?:/[^"'`\s]*)?/api[^"'`\s]*)["'`]"#).expect("valid quoted api path regex"));

static QUOTED_API_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)["'`](https?://[^"'`\s]*api[^"'`\s]*)["'`]"#).expect("valid quoted api url regex"));

pub static BASE_URL_ASSIGNMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)baseURL\s*[:=]\s*["'`]([^"'`\s]+)["'`]"#).expect("valid baseURL regex"));

/// Collect backend hints from free text, in order of first discovery.
pub fn extract_hints(text: &str) -> Vec<String> {
    let mut hints = UniqueList::new();

    for m in URL_LITERAL.find_iter(text) {
        hints.insert(m.as_str());
    }

    for line in text.lines().take(MAX_KEYWORD_LINES) {
        if !BACKEND_KEYWORD.is_match(line) {
            continue;
        }
        if let Some(m) = URL_LITERAL.find(line) {
            hints.insert(m.as_str());
        } else if let Some(c) = QUOTED_API_PATH.captures(line) {
            hints.insert(&c[1]);
        } else if let Some(c) = QUOTED_API_URL.captures(line) {
            hints.insert(&c[1]);
        }
    }

    for c in BASE_URL_ASSIGNMENT.captures_iter(text) {
        hints.insert(&c[1]);
    }

    hints.into_vec()
}

fn is_hint_key(key: &str) -> bool {
    let k = key.to_lowercase();
    ["api", "url", "endpoint", "host", "base"].iter().any(|t| k.contains(t))
}

fn is_hint_value(v: &str) -> bool {
    v.starts_with("http://") || v.starts_with("https://") || (v.starts_with('/') && !v.starts_with("//"))
}

/// Walk a parsed JSON config and collect URL-ish values under API-ish keys.
pub fn json_hints(value: &Value, out: &mut UniqueList) {
    walk_json(value, out, 0);
}

fn walk_json(value: &Value, out: &mut UniqueList, depth: usize) {
    if depth > MAX_JSON_DEPTH {
        return;
    }
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                match v {
                    Value::String(s) if is_hint_key(k) && is_hint_value(s) => {
                        out.insert(s.as_str());
                    }
                    _ => walk_json(v, out, depth + 1),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                walk_json(item, out, depth + 1);
            }
        }
        _ => {}
    }
}

/// Classifier for config probes: a successful response with at least one hint.
pub fn classify_config(result: &ProbeResult) -> Classification {
    if !result.is_success() {
        return Classification::NoMatch;
    }
    let body = result.body_prefix.as_str();
    let mut hints: UniqueList = extract_hints(body).into_iter().collect();

    let trimmed = body.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        // Truncated or malformed JSON simply contributes nothing
        if let Ok(v) = serde_json::from_str::<Value>(body) {
            json_hints(&v, &mut hints);
        }
    }

    if hints.is_empty() {
        Classification::NoMatch
    } else {
        Classification::ConfigHint { hints: hints.into_vec() }
    }
}
