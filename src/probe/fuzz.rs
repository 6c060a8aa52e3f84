//! Deterministic expansion of the swagger probe set.

/// Suffixed variants emitted for every generated entry.
pub const FUZZ_SUFFIXES: &[&str] = &[".json", ".yaml", ".yml"];

fn join(prefix: &str, name: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let name = name.trim_start_matches('/');
    format!("{}/{}", prefix, name)
}

/// Cross-product of `prefixes` and `basenames`, each entry followed by its
/// suffixed variants. Yields exactly `prefixes * basenames * 4` paths, before
/// any dedup.
pub fn expand(prefixes: &[String], basenames: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(prefixes.len() * basenames.len() * (FUZZ_SUFFIXES.len() + 1));
    for prefix in prefixes {
        for name in basenames {
            let entry = join(prefix, name);
            out.extend(FUZZ_SUFFIXES.iter().map(|suffix| format!("{}{}", entry, suffix)));
            out.push(entry);
        }
    }
    out
}
