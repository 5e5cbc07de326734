//! 缓存层实现
//!
//! - `memory`: 进程内共享缓存 `MemoryCache`
//! - `scoped`: 只在服务作用域挂载期间可用的缓存 `ScopedCache`
//!
//! 资源缓存通过 [`CacheStore`] 访问底层缓存设施，多个使用方可以共享同一实例，
//! 各自用键前缀隔离命名空间。条目只会被显式删除，底层设施不做容量淘汰。

pub mod memory;
pub mod scoped;

pub use memory::MemoryCache;
pub use scoped::ScopedCache;

use crate::data::Result;
use crate::models::{LanguageTag, Resource};
use std::sync::Arc;

/// 缓存条目
#[derive(Debug, Clone, PartialEq)]
pub enum CacheEntry {
    /// 资源（包括"资源不存在"哨兵）
    Resource(Arc<Resource>),
    /// 可用语言列表
    Languages(Arc<Vec<LanguageTag>>),
}

/// 缓存基础设施接口
///
/// 每个方法对单个键是原子的；任何方法都可能返回
/// [`DataError::CacheUnavailable`](crate::data::DataError::CacheUnavailable)。
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<CacheEntry>>;

    fn insert(&self, key: &str, entry: CacheEntry) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// 枚举当前持有的所有键
    fn keys(&self) -> Result<Vec<String>>;

    /// 删除所有以 `prefix` 开头的键（区分大小写），返回删除数量
    fn remove_by_prefix(&self, prefix: &str) -> Result<usize> {
        let matching: Vec<String> = self
            .keys()?
            .into_iter()
            .filter(|key| key.starts_with(prefix))
            .collect();

        for key in &matching {
            self.remove(key)?;
        }

        Ok(matching.len())
    }
}
