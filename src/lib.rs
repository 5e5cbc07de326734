// lib.rs - 本地化资源仓库：资源存储、读穿缓存与模型扫描

pub mod core;
pub mod data;
pub mod models;
pub mod services;
pub mod utils;

pub use models::*;

pub use data::{CacheStore, DataError, MemoryCache, ResourceStore, ScopedCache, SqliteResourceStore};
pub use services::{
    CacheStats, LocalizedModelScanner, ModelDescriptor, ResourceCache, ResourceCacheBuilder,
    ResourceSynchronizer, SyncReport, TypeScanner,
};

pub use core::{init_logger, update_log_level};
