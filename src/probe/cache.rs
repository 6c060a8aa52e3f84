use std::sync::Arc;

use parking_lot::RwLock;

use super::{BodyPolicy, ProbeMethod, ProbeResult};

/// Outcomes of every URL probed during one scan, shared by all pools.
/// `None` records a target that produced no result.
#[derive(Debug, Clone, Default)]
pub struct ResultCache {
    cache: Arc<RwLock<ahash::AHashMap<String, Option<ProbeResult>>>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached outcome usable under `policy`. A HEAD-only result cannot serve
    /// a probe that needs the body.
    pub fn lookup(&self, url: &str, policy: BodyPolicy) -> Option<Option<ProbeResult>> {
        let guard = self.cache.read();
        let entry = guard.get(url)?;
        match (entry, policy) {
            (Some(r), BodyPolicy::Required) if r.method == ProbeMethod::Head => None,
            _ => Some(entry.clone()),
        }
    }

    pub fn insert(&self, url: String, outcome: Option<ProbeResult>) {
        self.cache.write().insert(url, outcome);
    }

    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
