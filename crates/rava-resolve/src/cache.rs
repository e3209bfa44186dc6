//! Weak interning cache for resolved-type nodes.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use rava_model::{DeclarationSite, TypeHandle};

use crate::resolved_type::{Node, ResolvedType};
use crate::variables::VariableResolver;
use crate::ResolutionCtx;

#[derive(PartialEq, Eq, Hash)]
struct CacheKey {
    handle: TypeHandle,
    site: Option<DeclarationSite>,
    resolver: Option<VariableResolver>,
    component: Option<ResolvedType>,
}

/// Deduplicates structurally equal nodes so repeated resolution of the same
/// declared type shares one node and its lazy results.
///
/// Values are held weakly: a node lives only as long as some
/// [`ResolvedType`] outside the cache still references it. Dead entries are
/// swept opportunistically on insert; [`ResolutionCache::clear`] drops
/// everything at once. Entries embed ids from the env they were built
/// against, so one cache serves one env.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    inner: RwLock<HashMap<CacheKey, Weak<Node>>>,
}

impl ResolutionCache {
    pub fn new() -> ResolutionCache {
        ResolutionCache::default()
    }

    /// Live entry count. Dead weak entries awaiting a sweep are not counted.
    pub fn len(&self) -> usize {
        self.read_inner()
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry. Outstanding [`ResolvedType`] values stay valid;
    /// only future structural sharing with them is lost.
    pub fn clear(&self) {
        let mut map = self.write_inner();
        let dropped = map.len();
        map.clear();
        tracing::debug!(target: "rava.cache", dropped, "cleared resolution cache");
    }

    pub(crate) fn intern(
        &self,
        ctx: ResolutionCtx<'_>,
        handle: TypeHandle,
        site: Option<DeclarationSite>,
        resolver: Option<VariableResolver>,
        component: Option<ResolvedType>,
    ) -> ResolvedType {
        let key = CacheKey {
            handle: handle.clone(),
            site: site.clone(),
            resolver: resolver.clone(),
            component: component.clone(),
        };
        if let Some(existing) = self
            .read_inner()
            .get(&key)
            .and_then(Weak::upgrade)
        {
            return ResolvedType { node: existing };
        }

        // Build outside the lock; construction may recurse into the cache.
        let node = Arc::new(Node::build(ctx, handle, site, resolver, component));

        let mut map = self.write_inner();
        purge_dead(&mut map);
        match map.entry(key) {
            Entry::Occupied(mut entry) => {
                // Someone else interned the same key while we were building.
                if let Some(existing) = entry.get().upgrade() {
                    return ResolvedType { node: existing };
                }
                entry.insert(Arc::downgrade(&node));
            }
            Entry::Vacant(entry) => {
                entry.insert(Arc::downgrade(&node));
            }
        }
        ResolvedType { node }
    }

    fn read_inner(&self) -> RwLockReadGuard<'_, HashMap<CacheKey, Weak<Node>>> {
        self.inner.read().unwrap_or_else(|poisoned| {
            tracing::error!(target: "rava.cache", "resolution cache lock poisoned; recovering");
            poisoned.into_inner()
        })
    }

    fn write_inner(&self) -> RwLockWriteGuard<'_, HashMap<CacheKey, Weak<Node>>> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn purge_dead(map: &mut HashMap<CacheKey, Weak<Node>>) {
    let before = map.len();
    map.retain(|_, weak| weak.strong_count() > 0);
    let purged = before - map.len();
    if purged > 0 {
        tracing::trace!(target: "rava.cache", purged, "swept dead cache entries");
    }
}

impl std::fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheKey")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}
