//! Ordered view over the registered sources
//!
//! Order is ordinal descending, then registration sequence ascending. It is
//! computed when the source set changes and published as an immutable
//! snapshot, so lookups never see a half-built order.

use crate::source::ConfigSource;
use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::{debug, info};

/// Sources sorted by precedence, highest first.
pub type OrderedSources = Arc<[Arc<dyn ConfigSource>]>;

struct SourceSnapshot {
    /// Registration order.
    registered: Vec<Arc<dyn ConfigSource>>,
    ordered: OrderedSources,
}

impl SourceSnapshot {
    fn build(registered: Vec<Arc<dyn ConfigSource>>) -> Self {
        // Ordinals are read once per rebuild.
        let mut ranked: Vec<(i32, usize, &Arc<dyn ConfigSource>)> = registered
            .iter()
            .enumerate()
            .map(|(seq, source)| (source.ordinal(), seq, source))
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        for (ordinal, seq, source) in &ranked {
            debug!("  source #{} '{}' ordinal {}", seq, source.name(), ordinal);
        }

        let ordered: OrderedSources = ranked
            .into_iter()
            .map(|(_, _, source)| Arc::clone(source))
            .collect();

        Self { registered, ordered }
    }
}

pub struct SourceIndex {
    snap: ArcSwap<SourceSnapshot>,
}

impl SourceIndex {
    pub fn new(sources: Vec<Arc<dyn ConfigSource>>) -> Self {
        info!("Indexing {} configuration sources", sources.len());
        Self {
            snap: ArcSwap::from_pointee(SourceSnapshot::build(sources)),
        }
    }

    /// Current order. The returned list stays valid even if the index is
    /// rebuilt while the caller iterates it.
    pub fn ordered(&self) -> OrderedSources {
        Arc::clone(&self.snap.load().ordered)
    }

    /// Sources in registration order.
    pub fn registered(&self) -> Vec<Arc<dyn ConfigSource>> {
        self.snap.load().registered.clone()
    }

    pub fn len(&self) -> usize {
        self.snap.load().registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the whole source set.
    pub fn rebuild(&self, sources: Vec<Arc<dyn ConfigSource>>) {
        info!("Rebuilding source order for {} sources", sources.len());
        self.snap.store(Arc::new(SourceSnapshot::build(sources)));
    }

    /// Re-read every ordinal and re-sort the current set.
    pub fn refresh(&self) {
        self.update(|_| ());
    }

    /// Register one more source after the existing ones.
    pub fn push(&self, source: Arc<dyn ConfigSource>) {
        info!("Adding configuration source '{}'", source.name());
        self.update(|registered| registered.push(Arc::clone(&source)));
    }

    /// Drop every source named `name`. Returns how many were removed.
    pub fn remove(&self, name: &str) -> usize {
        let removed = self.update(|registered| {
            let before = registered.len();
            registered.retain(|s| s.name() != name);
            before - registered.len()
        });
        if removed > 0 {
            info!("Removed {} configuration source(s) named '{}'", removed, name);
        }
        removed
    }

    fn update<F, R>(&self, mut edit: F) -> R
    where
        F: FnMut(&mut Vec<Arc<dyn ConfigSource>>) -> R,
    {
        loop {
            let cur = self.snap.load_full();
            let mut registered = cur.registered.clone();
            let out = edit(&mut registered);

            let next = Arc::new(SourceSnapshot::build(registered));
            let prev = self.snap.compare_and_swap(&cur, next);
            if Arc::ptr_eq(&prev, &cur) {
                return out;
            }
        }
    }
}
