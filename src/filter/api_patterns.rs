use once_cell::sync::Lazy;
use regex::Regex;

static VERSION_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"/v\d+(/|$|\?)").expect("valid version segment regex"));

const STATIC_EXTENSIONS: &[&str] = &[
    ".css", ".woff", ".woff2", ".ttf", ".png", ".jpg", ".jpeg", ".gif", ".svg", ".ico", ".map", ".mp4", ".webp",
];

/// Basic heuristic: true if a runtime-observed URL looks like API traffic
/// (api/version/swagger-like path).
pub fn is_api_like_url(u: &str) -> bool {
    let lower = u.to_lowercase();
    if lower.starts_with("data:") || lower.starts_with("blob:") {
        return false;
    }

    let path = lower.split(['?', '#']).next().unwrap_or("");
    if STATIC_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return false;
    }

    if lower.contains("/api/")
        || lower.contains("/api?")
        || path.ends_with("/api")
        || lower.contains("/graphql")
        || lower.contains("/rest/")
        || lower.contains("swagger")
        || lower.contains("openapi")
        || lower.contains("api-docs")
    {
        return true;
    }

    VERSION_SEGMENT.is_match(&lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_patterns() {
        assert!(is_api_like_url("https://example.com/api/v1/users"));
        assert!(is_api_like_url("https://example.com/v2/items"));
        assert!(is_api_like_url("https://example.com/graphql"));
        assert!(is_api_like_url("https://example.com/swagger/v1/swagger.json"));
        assert!(!is_api_like_url("https://example.com/style.css"));
        assert!(!is_api_like_url("https://example.com/api/logo.png?v=2"));
        assert!(!is_api_like_url("data:application/json,{}"));
        assert!(!is_api_like_url("https://example.com/about"));
    }
}
