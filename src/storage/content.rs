use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::mime;
use crate::scanner::{self, tree};
use crate::types::{CacheError, FileTreeNode, TreeOptions};

/// Tuning knobs for the content and file-tree caches.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Upper bound on cached content bytes.
    pub max_cache_size: u64,
    /// Upper bound on cached content entries.
    pub max_cache_entries: usize,
    /// Content entries older than this are treated as absent.
    pub content_ttl: Duration,
    /// File trees older than this are rebuilt.
    pub file_tree_ttl: Duration,
    /// File-tree cache capacity; the oldest-inserted key is dropped
    /// past this, first-in first-out.
    pub file_tree_capacity: usize,
    /// Files larger than this are served but never cached.
    pub max_cacheable_file_size: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_cache_size: 100 * 1024 * 1024,
            max_cache_entries: 1000,
            content_ttl: Duration::from_secs(30 * 60),
            file_tree_ttl: Duration::from_secs(5 * 60),
            file_tree_capacity: 50,
            max_cacheable_file_size: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    content: String,
    mime_type: String,
}

#[derive(Debug, Clone)]
struct EntryMetadata {
    size: u64,
    created: Instant,
    last_accessed: Instant,
    access_count: u64,
    #[allow(dead_code)]
    source_path: PathBuf,
}

struct TreeCacheEntry {
    tree: Vec<FileTreeNode>,
    created: Instant,
}

#[derive(Default)]
struct CacheInner {
    content: HashMap<String, CacheEntry>,
    metadata: HashMap<String, EntryMetadata>,
    trees: HashMap<String, TreeCacheEntry>,
    tree_order: VecDeque<String>,
    current_size: u64,
}

impl CacheInner {
    /// Idempotent removal keeping `current_size` in lockstep with the
    /// metadata map.
    fn remove(&mut self, key: &str) {
        if let Some(metadata) = self.metadata.remove(key) {
            self.current_size = self.current_size.saturating_sub(metadata.size);
            self.content.remove(key);
        }
    }

    fn remove_tree(&mut self, key: &str) {
        if self.trees.remove(key).is_some() {
            self.tree_order.retain(|k| k != key);
        }
    }
}

/// File content plus the resolved content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub content: String,
    pub mime_type: String,
    pub from_cache: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileTree {
    pub tree: Vec<FileTreeNode>,
    pub from_cache: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub content_entries: usize,
    pub file_tree_entries: usize,
    pub total_size: u64,
    pub max_size: u64,
    pub utilization_percent: u32,
}

/// Bounded in-memory cache of file content and documentation file
/// trees. Construct one per process and share it behind an `Arc`;
/// interior state is mutex-guarded so the size bookkeeping stays
/// consistent across threads.
pub struct ContentCache {
    config: CacheConfig,
    inner: Mutex<CacheInner>,
}

impl Default for ContentCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentCache {
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    /// Deterministic cache key for a file path: hex SHA-256 digest.
    pub fn generate_cache_key(path: &Path) -> String {
        let mut hasher = Sha256::new();
        hasher.update(path.to_string_lossy().as_bytes());
        let digest = hasher.finalize();
        let mut key = String::with_capacity(digest.len() * 2);
        for byte in digest {
            key.push_str(&format!("{byte:02x}"));
        }
        key
    }

    /// Fetch file content, serving from cache when a fresh entry
    /// exists. Read errors propagate so callers can distinguish a
    /// missing file from other failures.
    pub async fn get_file_content(&self, path: &Path) -> Result<FileContent, CacheError> {
        let key = Self::generate_cache_key(path);

        {
            let mut inner = self.inner.lock();
            let fresh = inner
                .metadata
                .get(&key)
                .map(|m| m.created.elapsed() < self.config.content_ttl);
            match fresh {
                Some(true) => {
                    if let Some(metadata) = inner.metadata.get_mut(&key) {
                        metadata.last_accessed = Instant::now();
                        metadata.access_count += 1;
                    }
                    if let Some(entry) = inner.content.get(&key) {
                        return Ok(FileContent {
                            content: entry.content.clone(),
                            mime_type: entry.mime_type.clone(),
                            from_cache: true,
                        });
                    }
                }
                Some(false) => {
                    debug!(path = %path.display(), "cache entry expired");
                    inner.remove(&key);
                }
                None => {}
            }
        }

        // Disk I/O happens outside the lock.
        let stats = tokio::fs::metadata(path)
            .await
            .map_err(|e| CacheError::io(path, e))?;
        let content = scanner::read_lossy(path)
            .await
            .map_err(|e| CacheError::io(path, e))?;
        let mime_type = mime::resolve(path).to_string();

        if stats.len() > self.config.max_cacheable_file_size {
            debug!(path = %path.display(), size = stats.len(), "file too large to cache");
            return Ok(FileContent {
                content,
                mime_type,
                from_cache: false,
            });
        }

        self.add_to_cache(&key, content.clone(), mime_type.clone(), stats.len(), path);

        Ok(FileContent {
            content,
            mime_type,
            from_cache: false,
        })
    }

    /// Insert an entry, evicting first whenever either bound would be
    /// exceeded.
    pub fn add_to_cache(
        &self,
        key: &str,
        content: String,
        mime_type: String,
        size: u64,
        source_path: &Path,
    ) {
        let mut inner = self.inner.lock();

        if inner.content.len() >= self.config.max_cache_entries
            || inner.current_size + size > self.config.max_cache_size
        {
            Self::evict_locked(&mut inner);
        }

        // Re-inserting a key replaces its previous accounting.
        inner.remove(key);

        let now = Instant::now();
        inner.content.insert(
            key.to_string(),
            CacheEntry {
                content,
                mime_type,
            },
        );
        inner.metadata.insert(
            key.to_string(),
            EntryMetadata {
                size,
                created: now,
                last_accessed: now,
                access_count: 1,
                source_path: source_path.to_path_buf(),
            },
        );
        inner.current_size += size;
    }

    /// Drop an entry. No-op when the key is absent.
    pub fn remove_from_cache(&self, key: &str) {
        self.inner.lock().remove(key);
    }

    /// Batch-evict the least recently used entries.
    pub fn evict_least_recently_used(&self) {
        Self::evict_locked(&mut self.inner.lock());
    }

    fn evict_locked(inner: &mut CacheInner) {
        let entries: Vec<(String, Instant)> = inner
            .metadata
            .iter()
            .map(|(key, metadata)| (key.clone(), metadata.last_accessed))
            .collect();
        for key in select_eviction_victims(entries, 0.2) {
            inner.remove(&key);
        }
    }

    /// Fetch the documentation tree for a directory, rebuilding on miss
    /// or expiry. Distinct options produce distinct cache keys.
    pub async fn get_file_tree(&self, dir: &Path, options: &TreeOptions) -> FileTree {
        let options_key = serde_json::to_string(options).unwrap_or_default();
        let key = format!("tree:{}:{}", dir.display(), options_key);

        {
            let mut inner = self.inner.lock();
            let fresh = inner
                .trees
                .get(&key)
                .map(|e| e.created.elapsed() < self.config.file_tree_ttl);
            match fresh {
                Some(true) => {
                    if let Some(entry) = inner.trees.get(&key) {
                        return FileTree {
                            tree: entry.tree.clone(),
                            from_cache: true,
                        };
                    }
                }
                Some(false) => inner.remove_tree(&key),
                None => {}
            }
        }

        let built = tree::build_file_tree(dir, options).await;

        let mut inner = self.inner.lock();
        let previous = inner.trees.insert(
            key.clone(),
            TreeCacheEntry {
                tree: built.clone(),
                created: Instant::now(),
            },
        );
        if previous.is_none() {
            inner.tree_order.push_back(key);
        }
        while inner.trees.len() > self.config.file_tree_capacity {
            match inner.tree_order.pop_front() {
                Some(oldest) => {
                    inner.trees.remove(&oldest);
                }
                None => break,
            }
        }

        FileTree {
            tree: built,
            from_cache: false,
        }
    }

    /// Drop everything. Administrative use; nothing calls this on a
    /// schedule.
    pub fn clear_cache(&self) {
        let mut inner = self.inner.lock();
        inner.content.clear();
        inner.metadata.clear();
        inner.trees.clear();
        inner.tree_order.clear();
        inner.current_size = 0;
    }

    pub fn get_cache_stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let utilization =
            (inner.current_size as f64 / self.config.max_cache_size as f64 * 100.0).round() as u32;
        CacheStats {
            content_entries: inner.content.len(),
            file_tree_entries: inner.trees.len(),
            total_size: inner.current_size,
            max_size: self.config.max_cache_size,
            utilization_percent: utilization,
        }
    }

    #[cfg(test)]
    fn size_accounting(&self) -> (u64, u64, usize) {
        let inner = self.inner.lock();
        let metadata_sum = inner.metadata.values().map(|m| m.size).sum();
        (inner.current_size, metadata_sum, inner.content.len())
    }

    #[cfg(test)]
    fn access_count(&self, key: &str) -> Option<u64> {
        self.inner.lock().metadata.get(key).map(|m| m.access_count)
    }
}

/// Pick the entries to drop in one eviction pass: the oldest-accessed
/// `fraction` of the set, at least one.
pub fn select_eviction_victims(entries: Vec<(String, Instant)>, fraction: f64) -> Vec<String> {
    if entries.is_empty() {
        return Vec::new();
    }
    let count = ((entries.len() as f64 * fraction).floor() as usize).max(1);
    let mut sorted = entries;
    sorted.sort_by_key(|(_, last_accessed)| *last_accessed);
    sorted.into_iter().take(count).map(|(key, _)| key).collect()
}
