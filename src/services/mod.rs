// 服务层模块
//
// - resource_cache: 带读穿缓存的资源仓库
// - scanner: 本地化模型扫描与模型目录加载
// - sync: 扫描结果同步到资源存储

pub mod resource_cache;
pub mod scanner;
pub mod sync;

pub use resource_cache::{CacheStats, ResourceCache, ResourceCacheBuilder};
pub use scanner::{
    DiscoveredResource, LocalizedModel, LocalizedModelScanner, MemberDescriptor, ModelDescriptor,
    TypeScanner,
};
pub use sync::{ResourceSynchronizer, SyncReport};
