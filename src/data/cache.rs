use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::loader::{LoadError, load_directory};
use super::model::BusTable;

/// How long a loaded directory stays fresh.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

struct CachedTable {
    table: Arc<BusTable>,
    loaded_at: Instant,
}

/// Unified tables keyed by data directory, each valid for `ttl`.
///
/// Loads run outside the lock, so two callers racing on an expired entry may
/// both load; whichever finishes last wins the slot.
pub struct TableCache {
    ttl: Duration,
    entries: Mutex<HashMap<PathBuf, CachedTable>>,
}

impl Default for TableCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl TableCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached table for `dir`, loading it if absent or expired.
    /// Failed loads are not cached.
    pub fn get_or_load(&self, dir: &Path) -> Result<Arc<BusTable>, LoadError> {
        self.get_or_load_at(dir, Instant::now())
    }

    /// Same as [`get_or_load`](Self::get_or_load) with an explicit clock reading.
    pub fn get_or_load_at(&self, dir: &Path, now: Instant) -> Result<Arc<BusTable>, LoadError> {
        if let Some(table) = self.fresh(dir, now) {
            log::debug!("Cache hit for {}", dir.display());
            return Ok(table);
        }

        log::debug!("Cache miss for {}", dir.display());
        let table = Arc::new(load_directory(dir)?);
        self.lock().insert(
            dir.to_path_buf(),
            CachedTable {
                table: Arc::clone(&table),
                loaded_at: now,
            },
        );
        Ok(table)
    }

    /// Drop every cached table; the next access reloads from disk.
    pub fn refresh(&self) {
        let mut entries = self.lock();
        log::info!("Refreshing data cache ({} entries)", entries.len());
        entries.clear();
    }

    /// Drop the cached table for a single directory.
    pub fn invalidate(&self, dir: &Path) {
        self.lock().remove(dir);
    }

    fn fresh(&self, dir: &Path, now: Instant) -> Option<Arc<BusTable>> {
        let entries = self.lock();
        let cached = entries.get(dir)?;
        let age = now.saturating_duration_since(cached.loaded_at);
        (age < self.ttl).then(|| Arc::clone(&cached.table))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, CachedTable>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn serves_cached_table_until_expiry() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.csv", "Route Name\nX\n");

        let cache = TableCache::new(Duration::from_secs(60));
        let start = Instant::now();
        let first = cache.get_or_load_at(dir.path(), start).unwrap();
        assert_eq!(first.len(), 1);

        write(dir.path(), "b.csv", "Route Name\nY\n");
        let cached = cache
            .get_or_load_at(dir.path(), start + Duration::from_secs(30))
            .unwrap();
        assert!(Arc::ptr_eq(&first, &cached));

        let reloaded = cache
            .get_or_load_at(dir.path(), start + Duration::from_secs(60))
            .unwrap();
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn refresh_forces_reload() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.csv", "Route Name\nX\n");

        let cache = TableCache::default();
        assert_eq!(cache.get_or_load(dir.path()).unwrap().len(), 1);

        write(dir.path(), "b.csv", "Route Name\nY\n");
        assert_eq!(cache.get_or_load(dir.path()).unwrap().len(), 1);

        cache.refresh();
        assert_eq!(cache.get_or_load(dir.path()).unwrap().len(), 2);
    }

    #[test]
    fn invalidate_only_touches_one_directory() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        write(a.path(), "a.csv", "Price\n1\n");
        write(b.path(), "b.csv", "Price\n2\n");

        let cache = TableCache::default();
        let a1 = cache.get_or_load(a.path()).unwrap();
        let b1 = cache.get_or_load(b.path()).unwrap();

        cache.invalidate(a.path());
        assert!(!Arc::ptr_eq(&a1, &cache.get_or_load(a.path()).unwrap()));
        assert!(Arc::ptr_eq(&b1, &cache.get_or_load(b.path()).unwrap()));
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "bad.csv", "");

        let cache = TableCache::default();
        assert!(cache.get_or_load(dir.path()).is_err());

        write(dir.path(), "bad.csv", "Price\n5\n");
        assert_eq!(cache.get_or_load(dir.path()).unwrap().len(), 1);
    }
}
