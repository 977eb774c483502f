use crate::error::{CacheError, Result};
use indexmap::IndexMap;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const FORMAT_VERSION: u32 = 1;

/// On-disk layout. `entries` keeps insertion order (oldest first) so FIFO
/// order survives a restart.
#[derive(Deserialize)]
struct PersistedCache<V> {
    version: u32,
    entries: IndexMap<String, V>,
}

#[derive(Serialize)]
struct PersistedCacheRef<'a, V> {
    version: u32,
    entries: &'a IndexMap<String, V>,
}

/// Bounded cache evicting the oldest-inserted entry first.
///
/// Lookups do not affect eviction order. Entries are never replaced: a
/// `put` for a key that is already present is a no-op.
pub struct PersistentFifoCache<V> {
    entries: IndexMap<String, V>,
    capacity: usize,
    path: PathBuf,
    tmp_path: PathBuf,
}

impl<V> PersistentFifoCache<V>
where
    V: Serialize + DeserializeOwned,
{
    /// Open the cache persisted at `path`.
    ///
    /// A missing, unreadable or corrupt file yields an empty cache. When the
    /// file holds more than `capacity` entries the oldest are dropped.
    pub fn open(path: impl Into<PathBuf>, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity);
        }

        let path = path.into();
        let tmp_path = tmp_path_for(&path);

        let mut entries = match load_entries(&path) {
            Ok(Some(entries)) => entries,
            Ok(None) => {
                debug!("No cache file at {}, starting empty", path.display());
                IndexMap::new()
            }
            Err(err) => {
                warn!("{err}; starting with an empty cache");
                IndexMap::new()
            }
        };

        if entries.len() > capacity {
            let overflow = entries.len() - capacity;
            entries.drain(0..overflow);
            debug!("Dropped {overflow} persisted entries above capacity {capacity}");
        }

        debug!(
            "Opened cache at {} with {} entries (capacity {capacity})",
            path.display(),
            entries.len()
        );

        Ok(Self {
            entries,
            capacity,
            path,
            tmp_path,
        })
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert `value`, evicting the oldest entry when full, then rewrite the
    /// persisted cache.
    ///
    /// On a persistence error the in-memory insertion is kept; the next
    /// successful write brings the file back in sync.
    pub fn put(&mut self, key: impl Into<String>, value: V) -> Result<()> {
        let key = key.into();
        if self.entries.contains_key(&key) {
            debug!("Cache already holds {key}, keeping the existing entry");
            return Ok(());
        }

        while self.entries.len() >= self.capacity {
            match self.entries.shift_remove_index(0) {
                Some((evicted, _)) => debug!("Evicted oldest cache entry {evicted}"),
                None => break,
            }
        }

        self.entries.insert(key, value);
        self.persist()
    }

    /// Drop every entry and remove the persisted file.
    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CacheError::Persist {
                path: self.path.display().to_string(),
                source,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys from oldest to newest
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        let data = serde_json::to_vec(&PersistedCacheRef {
            version: FORMAT_VERSION,
            entries: &self.entries,
        })?;
        write_atomically(&self.path, &self.tmp_path, &data).map_err(|source| {
            CacheError::Persist {
                path: self.path.display().to_string(),
                source,
            }
        })
    }
}

fn load_entries<V: DeserializeOwned>(path: &Path) -> Result<Option<IndexMap<String, V>>> {
    let load_error = |reason: String| CacheError::Load {
        path: path.display().to_string(),
        reason,
    };

    let data = match fs::read(path) {
        Ok(data) => data,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(load_error(err.to_string())),
    };

    let persisted: PersistedCache<V> =
        serde_json::from_slice(&data).map_err(|err| load_error(err.to_string()))?;
    if persisted.version != FORMAT_VERSION {
        return Err(load_error(format!(
            "unsupported format version {}",
            persisted.version
        )));
    }

    Ok(Some(persisted.entries))
}

fn write_atomically(path: &Path, tmp_path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    {
        let mut file = fs::File::create(tmp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
    }
    fs::rename(tmp_path, path)
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("cache"), OsString::from);
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn open(dir: &TempDir, capacity: usize) -> PersistentFifoCache<Vec<u32>> {
        PersistentFifoCache::open(dir.path().join("query_cache.json"), capacity).unwrap()
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let result = PersistentFifoCache::<String>::open(temp_dir.path().join("c.json"), 0);
        assert!(matches!(result, Err(CacheError::InvalidCapacity)));
    }

    #[test]
    fn test_put_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = open(&temp_dir, 4);
        assert!(cache.is_empty());

        cache.put("a", vec![1, 2]).unwrap();
        assert_eq!(cache.get("a"), Some(&vec![1, 2]));
        assert_eq!(cache.get("b"), None);
        assert!(cache.path().exists());
    }

    #[test]
    fn test_fifo_eviction_ignores_access_order() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = open(&temp_dir, 2);

        cache.put("first", vec![1]).unwrap();
        cache.put("second", vec![2]).unwrap();
        // Reading "first" must not protect it from eviction.
        assert!(cache.get("first").is_some());
        cache.put("third", vec![3]).unwrap();

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains_key("first"));
        assert_eq!(cache.keys().collect::<Vec<_>>(), vec!["second", "third"]);
    }

    #[test]
    fn test_len_never_exceeds_capacity() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = open(&temp_dir, 3);
        for i in 0..10u32 {
            cache.put(format!("key-{i}"), vec![i]).unwrap();
            assert!(cache.len() <= 3);
        }
        assert_eq!(
            cache.keys().collect::<Vec<_>>(),
            vec!["key-7", "key-8", "key-9"]
        );
    }

    #[test]
    fn test_existing_key_is_not_replaced() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = open(&temp_dir, 2);
        cache.put("a", vec![1]).unwrap();
        cache.put("b", vec![2]).unwrap();
        cache.put("a", vec![9]).unwrap();

        assert_eq!(cache.get("a"), Some(&vec![1]));
        assert_eq!(cache.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_round_trip_preserves_entries_and_order() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut cache = open(&temp_dir, 3);
            cache.put("z", vec![26]).unwrap();
            cache.put("a", vec![1]).unwrap();
            cache.put("m", vec![13]).unwrap();
        }

        let mut reloaded = open(&temp_dir, 3);
        assert_eq!(reloaded.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
        assert_eq!(reloaded.get("m"), Some(&vec![13]));

        // Oldest entry from before the restart is evicted first.
        reloaded.put("n", vec![14]).unwrap();
        assert!(!reloaded.contains_key("z"));
    }

    #[test]
    fn test_reload_with_smaller_capacity_drops_oldest() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut cache = open(&temp_dir, 4);
            for key in ["a", "b", "c", "d"] {
                cache.put(key, vec![]).unwrap();
            }
        }
        let reloaded = open(&temp_dir, 2);
        assert_eq!(reloaded.keys().collect::<Vec<_>>(), vec!["c", "d"]);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("query_cache.json");
        fs::write(&path, b"{ not json").unwrap();

        let mut cache = open(&temp_dir, 2);
        assert!(cache.is_empty());

        // The next write replaces the corrupt file.
        cache.put("a", vec![1]).unwrap();
        let reloaded = open(&temp_dir, 2);
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn test_unknown_version_starts_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("query_cache.json");
        fs::write(&path, br#"{"version": 99, "entries": {"a": [1]}}"#).unwrap();

        let cache = open(&temp_dir, 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear_removes_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = open(&temp_dir, 2);
        cache.put("a", vec![1]).unwrap();
        assert!(cache.path().exists());

        cache.clear().unwrap();
        assert!(cache.is_empty());
        assert!(!cache.path().exists());

        // Clearing twice is fine.
        cache.clear().unwrap();
    }

    #[test]
    fn test_persist_failure_keeps_memory_state() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        fs::write(&blocker, b"file").unwrap();

        let mut cache: PersistentFifoCache<Vec<u32>> =
            PersistentFifoCache::open(blocker.join("cache.json"), 2).unwrap();
        let err = cache.put("a", vec![1]).unwrap_err();

        assert!(matches!(err, CacheError::Persist { .. }));
        assert_eq!(cache.get("a"), Some(&vec![1]));
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = open(&temp_dir, 2);
        cache.put("a", vec![1]).unwrap();
        assert!(!temp_dir.path().join("query_cache.json.tmp").exists());
    }
}
