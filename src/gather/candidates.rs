//! Static candidate extraction from markup and script text.

use scraper::{Html, Selector};
use serde::Serialize;
use url::Url;

use super::patterns::{API_LIKE_STRING, INTERESTING_FILE, SWAGGER_FILENAME};
use crate::target;
use crate::utils::UniqueList;

/// Candidates mined from one or more documents.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Extraction {
    /// Quoted API-like paths and URLs, delimiters stripped.
    pub api_like: UniqueList,
    /// Raw quoted swagger/openapi filenames, plus absolute URLs of
    /// manifest/config style references found in tag attributes.
    pub swagger_files: UniqueList,
    /// Absolute `script[src]` URLs.
    pub script_urls: UniqueList,
}

impl Extraction {
    pub fn merge(&mut self, other: Extraction) {
        self.api_like.extend(other.api_like);
        self.swagger_files.extend(other.swagger_files);
        self.script_urls.extend(other.script_urls);
    }

    pub fn is_empty(&self) -> bool {
        self.api_like.is_empty() && self.swagger_files.is_empty() && self.script_urls.is_empty()
    }
}

/// Pattern pass shared by markup and scripts: API-like strings and swagger
/// filenames.
pub fn extract_strings(text: &str, out: &mut Extraction) {
    for cap in API_LIKE_STRING.captures_iter(text) {
        out.api_like.insert(&cap[1]);
    }
    for cap in SWAGGER_FILENAME.captures_iter(text) {
        out.swagger_files.insert(&cap[1]);
    }
}

/// True if `value` names a manifest/config/appsettings/package style file.
pub fn is_interesting_file(value: &str) -> bool {
    INTERESTING_FILE.is_match(value.trim())
}

fn attr_values<'a>(doc: &'a Html, selector: &str, attr: &'a str) -> Vec<&'a str> {
    match Selector::parse(selector) {
        Ok(sel) => doc.select(&sel).filter_map(|el| el.value().attr(attr)).collect(),
        Err(_) => Vec::new(),
    }
}

/// Extract candidates from a landing page (or rendered page) markup.
///
/// Script sources and interesting file references are resolved against
/// `base`; unresolvable ones are dropped.
pub fn extract(markup: &str, base: &Url) -> Extraction {
    let mut out = Extraction::default();
    extract_strings(markup, &mut out);

    let doc = Html::parse_document(markup);

    for src in attr_values(&doc, "script[src]", "src") {
        if let Some(u) = target::resolve_str(base, src) {
            out.script_urls.insert(u);
        }
    }

    let references = attr_values(&doc, "link[href]", "href")
        .into_iter()
        .chain(attr_values(&doc, "script[src]", "src"))
        .chain(attr_values(&doc, "meta[content]", "content"));
    for value in references {
        if !is_interesting_file(value) {
            continue;
        }
        if let Some(u) = target::resolve_str(base, value.trim()) {
            out.swagger_files.insert(u);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://shop.example.com/").unwrap()
    }

    #[test]
    fn script_sources_are_resolved() {
        let html = r#"<html><head>
            <script src="/static/js/main.3f2a.js"></script>
            <script src="https://cdn.example.net/lib.js"></script>
            <script src="javascript:void(0)"></script>
            <script>var inline = 1;</script>
        </head></html>"#;
        let out = extract(html, &base());
        assert_eq!(
            out.script_urls.as_slice(),
            &[
                "https://shop.example.com/static/js/main.3f2a.js".to_string(),
                "https://cdn.example.net/lib.js".to_string(),
            ]
        );
    }

    #[test]
    fn interesting_references_are_stored_absolute() {
        let html = r#"<head>
            <link rel="manifest" href="/manifest.json">
            <link rel="stylesheet" href="/app.css">
            <meta name="app-config" content="config/appsettings.json">
            <meta name="viewport" content="width=device-width">
        </head>"#;
        let out = extract(html, &base());
        assert_eq!(
            out.swagger_files.as_slice(),
            &[
                "https://shop.example.com/manifest.json".to_string(),
                "https://shop.example.com/config/appsettings.json".to_string(),
            ]
        );
    }

    #[test]
    fn inline_script_strings_are_mined() {
        let html = r#"<script>
            const SPEC = "/docs/openapi.yaml";
            fetch('/api/v1/cart').then(r => r.json());
            const img = "/img/logo.png";
        </script>"#;
        let out = extract(html, &base());
        assert_eq!(out.api_like.as_slice(), &["/api/v1/cart".to_string()]);
        assert_eq!(out.swagger_files.as_slice(), &["/docs/openapi.yaml".to_string()]);
    }

    #[test]
    fn malformed_markup_does_not_panic() {
        let out = extract("<script src=\"/a.js\"><div <<<>>> \"/api/x/\u{0}", &base());
        assert!(out.script_urls.contains("https://shop.example.com/a.js"));
    }

    #[test]
    fn merge_is_cumulative_and_deduped() {
        let mut a = Extraction::default();
        extract_strings(r#""/api/a/""#, &mut a);
        let mut b = Extraction::default();
        extract_strings(r#""/api/a/" "/api/b/""#, &mut b);
        a.merge(b);
        assert_eq!(a.api_like.len(), 2);
    }
}
