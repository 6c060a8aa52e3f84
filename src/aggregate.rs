//! Folds every hint source into a ranked list of suggested API bases.

use url::Url;

use crate::target;
use crate::utils::UniqueList;

/// Upper bound on suggestions returned by [`aggregate`].
pub const MAX_SUGGESTIONS: usize = 40;

fn origin_root(u: &Url) -> Option<String> {
    let origin = u.origin();
    if !origin.is_tuple() {
        return None;
    }
    Some(format!("{}/", origin.ascii_serialization()))
}

fn with_trailing_slash(mut s: String) -> String {
    if !s.ends_with('/') {
        s.push('/');
    }
    s
}

/// Suggestion from one config hint: origin of an absolute URL, or the whole
/// resolved path of a root-relative one. Anything else is ignored.
pub fn hint_base(hint: &str, base: &Url) -> Option<String> {
    let hint = hint.trim();
    if hint.starts_with("http://") || hint.starts_with("https://") {
        return Url::parse(hint).ok().as_ref().and_then(origin_root);
    }
    if hint.starts_with('/') && !hint.starts_with("//") {
        let mut resolved = target::resolve(base, hint)?;
        resolved.set_query(None);
        resolved.set_fragment(None);
        return Some(with_trailing_slash(resolved.into()));
    }
    None
}

/// Suggestion from a reachable API-like URL: its origin.
pub fn api_base(url: &str) -> Option<String> {
    Url::parse(url).ok().as_ref().and_then(origin_root)
}

/// Suggestion from a swagger finding: origin plus the directory holding the
/// document.
pub fn swagger_base(url: &str) -> Option<String> {
    let u = Url::parse(url).ok()?;
    let root = origin_root(&u)?;
    let dir = match u.path().rsplit_once('/') {
        Some((dir, _)) => dir.trim_start_matches('/'),
        None => "",
    };
    if dir.is_empty() {
        Some(root)
    } else {
        Some(with_trailing_slash(format!("{}{}", root, dir)))
    }
}

/// Merge config hints, reachable API URLs and swagger findings, in that
/// order, into at most [`MAX_SUGGESTIONS`] distinct bases.
pub fn aggregate<H, A, S>(config_hints: H, api_urls: A, swagger_urls: S, base: &Url) -> Vec<String>
where
    H: IntoIterator,
    H::Item: AsRef<str>,
    A: IntoIterator,
    A::Item: AsRef<str>,
    S: IntoIterator,
    S::Item: AsRef<str>,
{
    let mut out = UniqueList::new();

    let suggestions = config_hints
        .into_iter()
        .filter_map(|h| hint_base(h.as_ref(), base))
        .chain(api_urls.into_iter().filter_map(|u| api_base(u.as_ref())))
        .chain(swagger_urls.into_iter().filter_map(|u| swagger_base(u.as_ref())));

    for s in suggestions {
        if out.len() >= MAX_SUGGESTIONS {
            break;
        }
        out.insert(s);
    }
    out.into_vec()
}
