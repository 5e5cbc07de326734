//! 作用域缓存
//!
//! 宿主在进入服务作用域时挂载一个 `MemoryCache`，离开时卸载。
//! 未挂载期间所有操作返回 `DataError::CacheUnavailable`。

use super::{CacheEntry, CacheStore, MemoryCache};
use crate::data::{DataError, Result};
use std::sync::RwLock;

/// 只在服务作用域挂载期间可用的缓存
#[derive(Debug, Default)]
pub struct ScopedCache {
    current: RwLock<Option<MemoryCache>>,
}

impl ScopedCache {
    /// 创建未挂载的作用域缓存
    pub fn detached() -> Self {
        Self::default()
    }

    /// 创建已挂载的作用域缓存
    pub fn attached(cache: MemoryCache) -> Self {
        Self {
            current: RwLock::new(Some(cache)),
        }
    }

    /// 挂载底层缓存，替换之前挂载的实例
    pub fn attach(&self, cache: MemoryCache) -> Result<()> {
        let mut current = self
            .current
            .write()
            .map_err(|e| DataError::Concurrency(e.to_string()))?;
        *current = Some(cache);
        tracing::debug!("作用域缓存已挂载");
        Ok(())
    }

    /// 卸载底层缓存，返回被卸载的实例
    pub fn detach(&self) -> Result<Option<MemoryCache>> {
        let mut current = self
            .current
            .write()
            .map_err(|e| DataError::Concurrency(e.to_string()))?;
        tracing::debug!("作用域缓存已卸载");
        Ok(current.take())
    }

    pub fn is_attached(&self) -> bool {
        self.current.read().map(|c| c.is_some()).unwrap_or(false)
    }

    fn current(&self) -> Result<MemoryCache> {
        let current = self
            .current
            .read()
            .map_err(|e| DataError::Concurrency(e.to_string()))?;
        current
            .clone()
            .ok_or_else(|| DataError::CacheUnavailable("当前不在服务作用域内".to_string()))
    }
}

impl CacheStore for ScopedCache {
    fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        self.current()?.get(key)
    }

    fn insert(&self, key: &str, entry: CacheEntry) -> Result<()> {
        self.current()?.insert(key, entry)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.current()?.remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.current()?.keys()
    }

    fn remove_by_prefix(&self, prefix: &str) -> Result<usize> {
        self.current()?.remove_by_prefix(prefix)
    }
}
