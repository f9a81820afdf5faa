//! Second-level read cache.
//!
//! A process-local cache in front of the storage backend, keyed by
//! `(entity, id)` for rows and `(entity.collection, id)` for cached
//! collections. Every region shares one `{max_entries, time_to_live}`
//! configuration, entries are evicted in insertion order when a region is
//! full, and every write path invalidates the affected keys. The cache is a
//! read optimization only: a cold cache must produce identical results to a
//! warm one.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::config::CacheConfig;

/// Cache regions, one per entity plus one per cached collection.
const REGION_NAMES: &[&str] = &[
    "user",
    "authority",
    "region",
    "country",
    "location",
    "department",
    "department.employees",
    "task",
    "employee",
    "employee.jobs",
    "job",
    "job.tasks",
    "jobHistory",
];

struct Entry {
    value: Value,
    inserted_at: Instant,
}

/// One bounded, TTL-limited region.
pub struct CacheRegion {
    ttl: Duration,
    max_entries: usize,
    inner: Mutex<RegionInner>,
}

#[derive(Default)]
struct RegionInner {
    map: HashMap<i64, Entry>,
    order: VecDeque<i64>,
}

impl CacheRegion {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries,
            inner: Mutex::new(RegionInner::default()),
        }
    }

    pub fn get(&self, id: i64) -> Option<Value> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let stale = match inner.map.get(&id) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };
        if stale {
            // drop it now rather than waiting for eviction
            inner.map.remove(&id);
            inner.order.retain(|k| *k != id);
        }
        None
    }

    pub fn put(&self, id: i64, value: Value) {
        if self.max_entries == 0 {
            return;
        }
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.map.contains_key(&id) {
            inner.order.retain(|k| *k != id);
        }
        inner.order.push_back(id);
        inner.map.insert(
            id,
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
        while inner.map.len() > self.max_entries {
            if let Some(oldest) = inner.order.pop_front() {
                inner.map.remove(&oldest);
            } else {
                break;
            }
        }
    }

    pub fn invalidate(&self, id: i64) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.map.remove(&id);
        inner.order.retain(|k| *k != id);
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.map.clear();
        inner.order.clear();
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .map
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// All cache regions, looked up by name. Unknown regions are misses and
/// no-ops so correctness never depends on region wiring.
pub struct CacheManager {
    regions: HashMap<&'static str, CacheRegion>,
}

impl CacheManager {
    pub fn new(config: &CacheConfig) -> Self {
        let ttl = Duration::from_secs(config.time_to_live_secs);
        let regions = REGION_NAMES
            .iter()
            .map(|name| (*name, CacheRegion::new(ttl, config.max_entries)))
            .collect();
        Self { regions }
    }

    pub fn get(&self, region: &str, id: i64) -> Option<Value> {
        self.regions.get(region)?.get(id)
    }

    pub fn put(&self, region: &str, id: i64, value: Value) {
        if let Some(r) = self.regions.get(region) {
            r.put(id, value);
        }
    }

    /// Drop every entry in one region. Used when a write touches rows cached
    /// inside another entity's collections and the affected keys are unknown.
    pub fn clear(&self, region: &str) {
        if let Some(r) = self.regions.get(region) {
            r.clear();
        }
    }

    /// Invalidate the entity entry and every collection region belonging to
    /// the entity, e.g. writing job 3 clears "job" and "job.tasks" for id 3.
    pub fn invalidate(&self, entity: &str, id: i64) {
        let collection_prefix = format!("{}.", entity);
        for (name, region) in &self.regions {
            if *name == entity || name.starts_with(&collection_prefix) {
                region.invalidate(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manager() -> CacheManager {
        CacheManager::new(&CacheConfig {
            time_to_live_secs: 3600,
            max_entries: 2,
        })
    }

    #[test]
    fn hit_after_put() {
        let cache = manager();
        cache.put("country", 1, json!({"id": 1}));
        assert_eq!(cache.get("country", 1), Some(json!({"id": 1})));
    }

    #[test]
    fn expired_entries_are_misses() {
        let region = CacheRegion::new(Duration::from_secs(0), 10);
        region.put(1, json!(1));
        assert_eq!(region.get(1), None);
        assert!(region.is_empty());
    }

    #[test]
    fn bounded_regions_evict_oldest_first() {
        let cache = manager();
        cache.put("country", 1, json!(1));
        cache.put("country", 2, json!(2));
        cache.put("country", 3, json!(3));

        assert_eq!(cache.get("country", 1), None);
        assert_eq!(cache.get("country", 2), Some(json!(2)));
        assert_eq!(cache.get("country", 3), Some(json!(3)));
    }

    #[test]
    fn invalidate_clears_entity_and_collection_regions() {
        let cache = manager();
        cache.put("job", 3, json!({"id": 3}));
        cache.put("job.tasks", 3, json!([1, 2]));
        cache.put("job", 4, json!({"id": 4}));

        cache.invalidate("job", 3);

        assert_eq!(cache.get("job", 3), None);
        assert_eq!(cache.get("job.tasks", 3), None);
        assert_eq!(cache.get("job", 4), Some(json!({"id": 4})));
    }

    #[test]
    fn clear_drops_every_entry_in_a_region() {
        let cache = manager();
        cache.put("job.tasks", 1, json!([1]));
        cache.put("job.tasks", 2, json!([2]));
        cache.put("job", 1, json!({"id": 1}));

        cache.clear("job.tasks");

        assert_eq!(cache.get("job.tasks", 1), None);
        assert_eq!(cache.get("job.tasks", 2), None);
        assert_eq!(cache.get("job", 1), Some(json!({"id": 1})));
        // unknown regions are a no-op
        cache.clear("nope");
    }

    #[test]
    fn unknown_region_is_a_silent_miss() {
        let cache = manager();
        cache.put("nope", 1, json!(1));
        assert_eq!(cache.get("nope", 1), None);
    }
}
