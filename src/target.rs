//! Target resolution: base normalization and relative path joining.

use anyhow::{bail, Context};
use url::Url;

fn is_web_scheme(u: &Url) -> bool {
    matches!(u.scheme(), "http" | "https")
}

/// Normalize the scan target into a base URL. Bare hosts get `https://`.
pub fn normalize_base(target: &str) -> anyhow::Result<Url> {
    let target = target.trim();
    let with_scheme = if target.contains("://") {
        target.to_string()
    } else {
        format!("https://{}", target)
    };
    let mut url = Url::parse(&with_scheme).with_context(|| format!("invalid target URL: {}", target))?;
    if !is_web_scheme(&url) {
        bail!("unsupported scheme in target: {}", url.scheme());
    }
    if url.host_str().map_or(true, str::is_empty) {
        bail!("target has no host: {}", target);
    }
    url.set_fragment(None);
    Ok(url)
}

/// Resolve `candidate` against `base`.
///
/// Absolute http(s) URLs are returned as parsed; anything else is joined with
/// standard URL rules (dot segments collapse, query strings survive). Returns
/// `None` for malformed input and for non-web schemes such as `data:`.
pub fn resolve(base: &Url, candidate: &str) -> Option<Url> {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return None;
    }
    let resolved = match Url::parse(candidate) {
        Ok(abs) => abs,
        Err(url::ParseError::RelativeUrlWithoutBase) => base.join(candidate).ok()?,
        Err(_) => return None,
    };
    if !is_web_scheme(&resolved) || resolved.host_str().is_none() {
        return None;
    }
    Some(resolved)
}

/// Same as [`resolve`], returned as a string.
pub fn resolve_str(base: &Url, candidate: &str) -> Option<String> {
    resolve(base, candidate).map(String::from)
}
