//! Extraction patterns. Kept as data so each rule can be tested on its own.

use once_cell::sync::Lazy;
use regex::Regex;

/// Straight quotes, backtick, and their percent-encoded forms.
const DELIM: &str = r#"(?:"|'|`|%22|%27|%60)"#;

/// Quoted API-like fragment: a path containing `/api/` or `/v<digits>/`, or an
/// absolute URL with a path token api, v<digits>, openapi or swagger. Tokens
/// are bounded by `/ . _ -` (or `?`/`#` after), so `dev2` or `rapid` never count.
/// Group 1 is the fragment without its delimiters.
pub static API_LIKE_STRING: Lazy<Regex> = Lazy::new(|| {
    let inner = r#"(?:/[^"'`\s<>%]*)?/(?:api|v\d+)/[^"'`\s<>%]*|https?://[^"'`\s<>%/]+/(?:[^"'`\s<>%]*[/._-])?(?:api|v\d+|openapi|swagger)(?:[/._?#-][^"'`\s<>%]*)?"#;
    Regex::new(&format!("(?i){d}({inner}){d}", d = DELIM, inner = inner)).expect("valid api-like string regex")
});

/// Quoted path ending in `.json`/`.yaml`/`.yml` whose filename mentions
/// swagger or openapi.
pub static SWAGGER_FILENAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)["'`]((?:[^"'`\s<>]*/)?[^"'`\s<>/]*(?:swagger|openapi)[^"'`\s<>/]*\.(?:json|ya?ml))["'`]"#)
        .expect("valid swagger filename regex")
});

/// Manifest/config/appsettings/package style file references in tag attributes.
pub static INTERESTING_FILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:^|/)(?:[^/?#\s]*(?:manifest|config|appsettings|package)[^/?#\s]*\.(?:json|js|ya?ml)|[^/?#\s]*\.webmanifest)(?:[?#]\S*)?$",
    )
        .expect("valid interesting file regex")
});
