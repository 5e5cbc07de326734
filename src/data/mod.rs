//! 数据层
//!
//! 为本地化资源仓库提供存储与缓存基础设施。
//!
//! # 模块组织
//!
//! - `error`: 统一错误类型定义
//! - `cache`: 缓存基础设施（`CacheStore` 接口 + 进程内/作用域实现）
//! - `store`: 资源存储（`ResourceStore` 接口 + SQLite 实现）

pub mod cache;
pub mod error;
pub mod store;

pub use cache::{CacheEntry, CacheStore, MemoryCache, ScopedCache};
pub use error::{DataError, Result};
pub use store::{ResourceStore, SqliteResourceStore};
