//! 进程内共享缓存
//!
//! `MemoryCache` 是可克隆的句柄，克隆体共享同一份底层映射，
//! 因此可以在资源缓存和其他使用方之间共享。
//! 没有容量上限：条目只在 `remove` / `remove_by_prefix` 时离开缓存。

use super::{CacheEntry, CacheStore};
use crate::data::{DataError, Result};
use linked_hash_map::LinkedHashMap;
use std::sync::{Arc, RwLock};

/// 进程内缓存（键按插入顺序枚举）
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    inner: Arc<RwLock<LinkedHashMap<String, CacheEntry>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前条目数量
    pub fn len(&self) -> usize {
        self.inner.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner
            .read()
            .map(|c| c.contains_key(key))
            .unwrap_or(false)
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> DataError {
    DataError::Concurrency(e.to_string())
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        let cache = self.inner.read().map_err(poisoned)?;
        Ok(cache.get(key).cloned())
    }

    fn insert(&self, key: &str, entry: CacheEntry) -> Result<()> {
        let mut cache = self.inner.write().map_err(poisoned)?;
        cache.insert(key.to_string(), entry);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut cache = self.inner.write().map_err(poisoned)?;
        cache.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let cache = self.inner.read().map_err(poisoned)?;
        Ok(cache.keys().cloned().collect())
    }

    // 在一次写锁内完成匹配和删除
    fn remove_by_prefix(&self, prefix: &str) -> Result<usize> {
        let mut cache = self.inner.write().map_err(poisoned)?;
        let matching: Vec<String> = cache
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect();

        for key in &matching {
            cache.remove(key);
        }

        Ok(matching.len())
    }
}
