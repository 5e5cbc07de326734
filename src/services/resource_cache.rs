//! 带读穿缓存的资源仓库
//!
//! `ResourceCache` 位于 [`ResourceStore`] 之前，按 cache-aside 模式服务译文查询：
//! - 缓存键形如 `{namespace}_{key}`，与共享缓存的其他使用方隔离
//! - "资源不存在"同样被缓存（`Resource::non_existing` 哨兵），避免反复访问存储
//! - 写操作只失效单个资源键；`clear_cache` / `populate_cache` 才清空整个命名空间
//!
//! # 使用示例
//!
//! ```rust
//! use std::sync::Arc;
//! use dblocale::data::SqliteResourceStore;
//! use dblocale::services::ResourceCache;
//!
//! let store = Arc::new(SqliteResourceStore::open_in_memory()?);
//! let cache = ResourceCache::builder().store(store).build()?;
//!
//! cache.populate_cache()?;
//! let title = cache.get_translation("Home.Title", &"en".parse()?)?;
//! ```

use crate::data::{CacheEntry, CacheStore, DataError, MemoryCache, ResourceStore, Result};
use crate::models::{CacheConfig, LanguageTag, Resource, ResourceItem};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// 可用语言列表的缓存键后缀（用 `:` 分隔，不会与 `{namespace}_{key}` 冲突）
const AVAILABLE_LANGUAGES_KEY: &str = "AvailableLanguages";

/// 缓存统计快照
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub store_reads: u64,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    store_reads: AtomicU64,
}

impl Counters {
    fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    fn store_read(&self) {
        self.store_reads.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            store_reads: self.store_reads.load(Ordering::Relaxed),
        }
    }
}

/// 带读穿缓存的资源仓库
pub struct ResourceCache {
    store: Arc<dyn ResourceStore>,
    cache: Arc<dyn CacheStore>,
    namespace: String,
    counters: Counters,
    /// 预热互斥锁，保证 clear/insert 不会与另一次预热交错
    warmup: Mutex<()>,
}

/// `ResourceCache` 构造器
#[derive(Default)]
pub struct ResourceCacheBuilder {
    store: Option<Arc<dyn ResourceStore>>,
    cache: Option<Arc<dyn CacheStore>>,
    config: CacheConfig,
}

impl ResourceCacheBuilder {
    /// 设置资源存储（必需）
    pub fn store(mut self, store: Arc<dyn ResourceStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// 设置缓存基础设施（默认按配置创建 `MemoryCache`）
    pub fn cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<ResourceCache> {
        let store = self
            .store
            .ok_or_else(|| DataError::Configuration("未配置资源存储".to_string()))?;

        if self.config.namespace.is_empty() {
            return Err(DataError::Configuration("缓存命名空间不能为空".to_string()));
        }

        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(MemoryCache::new()));

        Ok(ResourceCache {
            store,
            cache,
            namespace: self.config.namespace,
            counters: Counters::default(),
            warmup: Mutex::new(()),
        })
    }
}

impl ResourceCache {
    pub fn builder() -> ResourceCacheBuilder {
        ResourceCacheBuilder::default()
    }

    /// 使用默认配置和进程内缓存创建
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self {
            store,
            cache: Arc::new(MemoryCache::new()),
            namespace: CacheConfig::default().namespace,
            counters: Counters::default(),
            warmup: Mutex::new(()),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot()
    }

    /// 查询译文
    ///
    /// 缓存命中时不访问存储；未命中时从存储读取，并把结果（包括"不存在"哨兵）
    /// 写入缓存后返回。资源存在但没有该语言的译文时返回 `None`。
    pub fn get_translation(&self, key: &str, language: &LanguageTag) -> Result<Option<String>> {
        let cache_key = self.build_cache_key(key);

        if let Some(resource) = self.cached_resource(&cache_key) {
            self.counters.hit();
            if !resource.exists() {
                tracing::trace!(key = %key, "缓存命中：资源不存在");
                return Ok(None);
            }
            tracing::trace!(key = %key, language = %language, "缓存命中");
            return Ok(resource.value_for(language).map(str::to_string));
        }

        self.counters.miss();
        self.counters.store_read();
        let resource = match self.store.get_resource(key)? {
            Some(resource) => resource,
            None => {
                tracing::debug!(key = %key, "资源不存在，缓存不存在哨兵");
                Resource::non_existing(key)
            }
        };

        let value = resource.value_for(language).map(str::to_string);
        self.insert_on_read(&cache_key, CacheEntry::Resource(Arc::new(resource)));
        Ok(value)
    }

    /// 可用语言列表（缓存整个列表）
    pub fn get_available_languages(&self) -> Result<Vec<LanguageTag>> {
        let cache_key = self.languages_key();

        match self.cache.get(&cache_key) {
            Ok(Some(CacheEntry::Languages(languages))) => {
                self.counters.hit();
                return Ok(languages.as_ref().clone());
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "读取缓存失败，回退到存储"),
        }

        self.counters.miss();
        self.counters.store_read();
        let languages = self.store.get_available_languages()?;
        self.insert_on_read(&cache_key, CacheEntry::Languages(Arc::new(languages.clone())));
        Ok(languages)
    }

    /// 读取所有资源（不缓存）
    pub fn get_all_resources(&self) -> Result<Vec<Resource>> {
        self.store.get_all_resources()
    }

    /// 按键前缀和语言读取译文（不缓存）
    pub fn get_all_translations(&self, key: &str, language: &LanguageTag) -> Result<Vec<ResourceItem>> {
        self.store.get_all_translations(key, language)
    }

    /// 创建资源（不缓存，总是观察存储的权威状态）
    pub fn create_resource(&self, key: &str, author: &str) -> Result<()> {
        self.store.create_resource(key, author)
    }

    /// 删除资源并失效对应缓存条目
    pub fn delete_resource(&self, key: &str) -> Result<()> {
        self.store.delete_resource(key)?;
        self.cache.remove(&self.build_cache_key(key))?;
        tracing::debug!(key = %key, "资源已删除，缓存条目已失效");
        Ok(())
    }

    /// 写入译文并失效整个资源的缓存条目（所有语言）
    pub fn create_or_update_translation(
        &self,
        key: &str,
        language: &LanguageTag,
        value: Option<&str>,
    ) -> Result<()> {
        self.store.create_or_update_translation(key, language, value)?;
        self.cache.remove(&self.build_cache_key(key))?;
        tracing::debug!(key = %key, language = %language, "译文已更新，缓存条目已失效");
        Ok(())
    }

    /// 清空本命名空间下的所有缓存条目
    ///
    /// 只删除本实例写入的键（`{namespace}_*` 与语言列表键），不影响其他使用方的条目；
    /// 缓存基础设施不可用时视为已清空。
    pub fn clear_cache(&self) -> Result<()> {
        let cleared = self
            .cache
            .remove_by_prefix(&self.build_cache_key(""))
            .and_then(|removed| self.cache.remove(&self.languages_key()).map(|_| removed));

        match cleared {
            Ok(removed) => {
                tracing::info!(namespace = %self.namespace, removed, "资源缓存已清空");
                Ok(())
            }
            Err(e) if e.is_cache_unavailable() => {
                tracing::debug!(error = %e, "缓存不可用，跳过清空");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// 预热缓存
    ///
    /// 先读取全部资源（失败时旧缓存保持不变），再清空命名空间，最后逐个写入。
    pub fn populate_cache(&self) -> Result<()> {
        let _guard = self
            .warmup
            .lock()
            .map_err(|e| DataError::Concurrency(e.to_string()))?;

        self.counters.store_read();
        let resources = self.store.get_all_resources()?;

        self.clear_cache()?;

        let count = resources.len();
        for resource in resources {
            let cache_key = self.build_cache_key(resource.key());
            self.cache
                .insert(&cache_key, CacheEntry::Resource(Arc::new(resource)))?;
        }

        tracing::info!(namespace = %self.namespace, count, "资源缓存预热完成");
        Ok(())
    }

    fn build_cache_key(&self, key: &str) -> String {
        format!("{}_{}", self.namespace, key)
    }

    fn languages_key(&self) -> String {
        format!("{}:{}", self.namespace, AVAILABLE_LANGUAGES_KEY)
    }

    fn cached_resource(&self, cache_key: &str) -> Option<Arc<Resource>> {
        match self.cache.get(cache_key) {
            Ok(Some(CacheEntry::Resource(resource))) => Some(resource),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(cache_key = %cache_key, error = %e, "读取缓存失败，回退到存储");
                None
            }
        }
    }

    /// 读路径上的缓存写入：失败只记录日志，不影响已从存储取得的结果
    fn insert_on_read(&self, cache_key: &str, entry: CacheEntry) {
        if let Err(e) = self.cache.insert(cache_key, entry) {
            tracing::warn!(cache_key = %cache_key, error = %e, "写入缓存失败");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ScopedCache, SqliteResourceStore};
    use std::sync::atomic::AtomicUsize;
    use std::thread;
    use std::time::Duration;

    /// 统计存储调用次数的包装
    struct CountingStore {
        inner: SqliteResourceStore,
        get_resource_calls: AtomicUsize,
        get_languages_calls: AtomicUsize,
        fail_get_all: std::sync::atomic::AtomicBool,
        /// 同时进行中的 get_all_resources 调用数及其峰值
        get_all_in_flight: AtomicUsize,
        get_all_max_in_flight: AtomicUsize,
    }

    impl CountingStore {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                inner: SqliteResourceStore::open_in_memory().unwrap(),
                get_resource_calls: AtomicUsize::new(0),
                get_languages_calls: AtomicUsize::new(0),
                fail_get_all: Default::default(),
                get_all_in_flight: AtomicUsize::new(0),
                get_all_max_in_flight: AtomicUsize::new(0),
            })
        }

        fn get_resource_calls(&self) -> usize {
            self.get_resource_calls.load(Ordering::SeqCst)
        }
    }

    impl ResourceStore for CountingStore {
        fn get_resource(&self, key: &str) -> Result<Option<Resource>> {
            self.get_resource_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.get_resource(key)
        }

        fn get_available_languages(&self) -> Result<Vec<LanguageTag>> {
            self.get_languages_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.get_available_languages()
        }

        fn get_all_resources(&self) -> Result<Vec<Resource>> {
            if self.fail_get_all.load(Ordering::SeqCst) {
                return Err(DataError::Database(rusqlite::Error::InvalidQuery));
            }
            let in_flight = self.get_all_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.get_all_max_in_flight.fetch_max(in_flight, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(2));
            let result = self.inner.get_all_resources();
            self.get_all_in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }

        fn get_all_translations(&self, key: &str, language: &LanguageTag) -> Result<Vec<ResourceItem>> {
            self.inner.get_all_translations(key, language)
        }

        fn create_resource(&self, key: &str, author: &str) -> Result<()> {
            self.inner.create_resource(key, author)
        }

        fn delete_resource(&self, key: &str) -> Result<()> {
            self.inner.delete_resource(key)
        }

        fn create_or_update_translation(
            &self,
            key: &str,
            language: &LanguageTag,
            value: Option<&str>,
        ) -> Result<()> {
            self.inner.create_or_update_translation(key, language, value)
        }
    }

    fn tag(raw: &str) -> LanguageTag {
        LanguageTag::parse(raw).unwrap()
    }

    fn setup() -> (Arc<CountingStore>, MemoryCache, ResourceCache) {
        let store = CountingStore::new();
        let memory = MemoryCache::new();
        let cache = ResourceCache::builder()
            .store(store.clone())
            .cache(Arc::new(memory.clone()))
            .build()
            .unwrap();
        (store, memory, cache)
    }

    #[test]
    fn test_builder_requires_store() {
        let err = ResourceCache::builder().build().err().unwrap();
        assert!(matches!(err, DataError::Configuration(_)));
    }

    #[test]
    fn test_builder_rejects_empty_namespace() {
        let store = CountingStore::new();
        let err = ResourceCache::builder()
            .store(store)
            .config(CacheConfig {
                namespace: String::new(),
            })
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, DataError::Configuration(_)));
    }

    #[test]
    fn test_missing_key_is_negatively_cached() {
        let (store, memory, cache) = setup();

        assert_eq!(cache.get_translation("Never.Written", &tag("en")).unwrap(), None);
        assert_eq!(cache.get_translation("Never.Written", &tag("sv")).unwrap(), None);
        assert_eq!(cache.get_translation("Never.Written", &tag("en")).unwrap(), None);

        assert_eq!(store.get_resource_calls(), 1);
        assert!(memory.contains_key("DbLocalizationProviderCache_Never.Written"));
        match memory.get("DbLocalizationProviderCache_Never.Written").unwrap() {
            Some(CacheEntry::Resource(resource)) => assert!(!resource.exists()),
            other => panic!("unexpected cache entry: {:?}", other),
        }
    }

    #[test]
    fn test_existing_key_served_from_cache_for_any_language() {
        let (store, _memory, cache) = setup();
        store
            .inner
            .create_or_update_translation("Home.Title", &tag("en"), Some("Hello"))
            .unwrap();

        assert_eq!(
            cache.get_translation("Home.Title", &tag("en")).unwrap().as_deref(),
            Some("Hello")
        );
        assert_eq!(cache.get_translation("Home.Title", &tag("sv")).unwrap(), None);
        assert_eq!(store.get_resource_calls(), 1);

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn test_update_invalidates_negative_entry() {
        let (_store, _memory, cache) = setup();
        assert_eq!(cache.get_translation("Home.Title", &tag("en")).unwrap(), None);

        cache
            .create_or_update_translation("Home.Title", &tag("en"), Some("Hello"))
            .unwrap();

        assert_eq!(
            cache.get_translation("Home.Title", &tag("en")).unwrap().as_deref(),
            Some("Hello")
        );
    }

    #[test]
    fn test_update_invalidates_all_languages() {
        let (store, _memory, cache) = setup();
        cache
            .create_or_update_translation("Home.Title", &tag("en"), Some("Hello"))
            .unwrap();
        cache
            .create_or_update_translation("Home.Title", &tag("sv"), Some("Hej"))
            .unwrap();
        assert_eq!(
            cache.get_translation("Home.Title", &tag("sv")).unwrap().as_deref(),
            Some("Hej")
        );

        cache
            .create_or_update_translation("Home.Title", &tag("en"), Some("Hi"))
            .unwrap();
        let before = store.get_resource_calls();
        assert_eq!(
            cache.get_translation("Home.Title", &tag("sv")).unwrap().as_deref(),
            Some("Hej")
        );
        assert_eq!(
            cache.get_translation("Home.Title", &tag("en")).unwrap().as_deref(),
            Some("Hi")
        );
        assert_eq!(store.get_resource_calls(), before + 1);
    }

    #[test]
    fn test_delete_forces_refetch() {
        let (store, _memory, cache) = setup();
        cache
            .create_or_update_translation("Home.Title", &tag("en"), Some("Hello"))
            .unwrap();
        cache.get_translation("Home.Title", &tag("en")).unwrap();
        assert_eq!(store.get_resource_calls(), 1);

        cache.delete_resource("Home.Title").unwrap();

        assert_eq!(cache.get_translation("Home.Title", &tag("en")).unwrap(), None);
        assert_eq!(store.get_resource_calls(), 2);
    }

    #[test]
    fn test_populate_cache_serves_without_store_access() {
        let (store, _memory, cache) = setup();
        store.inner.create_or_update_translation("a", &tag("en"), Some("A")).unwrap();
        store.inner.create_or_update_translation("b", &tag("sv"), Some("B")).unwrap();
        store.inner.create_resource("c", "admin").unwrap();

        cache.populate_cache().unwrap();

        assert_eq!(cache.get_translation("a", &tag("en")).unwrap().as_deref(), Some("A"));
        assert_eq!(cache.get_translation("b", &tag("sv")).unwrap().as_deref(), Some("B"));
        assert_eq!(cache.get_translation("c", &tag("en")).unwrap(), None);
        assert_eq!(store.get_resource_calls(), 0);
    }

    #[test]
    fn test_populated_cache_never_evicts() {
        let (store, memory, cache) = setup();
        for i in 0..300 {
            store
                .inner
                .create_or_update_translation(&format!("k{}", i), &tag("en"), Some("v"))
                .unwrap();
        }

        cache.populate_cache().unwrap();
        assert_eq!(memory.len(), 300);

        for i in 0..300 {
            assert_eq!(
                cache.get_translation(&format!("k{}", i), &tag("en")).unwrap().as_deref(),
                Some("v")
            );
        }
        assert_eq!(store.get_resource_calls(), 0);
    }

    #[test]
    fn test_populate_cache_failure_keeps_previous_entries() {
        let (store, memory, cache) = setup();
        cache.get_translation("Missing", &tag("en")).unwrap();
        assert_eq!(memory.len(), 1);

        store.fail_get_all.store(true, Ordering::SeqCst);
        assert!(matches!(cache.populate_cache(), Err(DataError::Database(_))));

        assert_eq!(memory.len(), 1);
        cache.get_translation("Missing", &tag("en")).unwrap();
        assert_eq!(store.get_resource_calls(), 1);
    }

    #[test]
    fn test_populate_cache_drops_stale_namespace_entries() {
        let (store, memory, cache) = setup();
        cache.get_translation("Gone", &tag("en")).unwrap();
        store.inner.create_or_update_translation("Gone", &tag("en"), Some("Back")).unwrap();

        cache.populate_cache().unwrap();

        assert_eq!(memory.len(), 1);
        assert_eq!(cache.get_translation("Gone", &tag("en")).unwrap().as_deref(), Some("Back"));
    }

    #[test]
    fn test_clear_cache_keeps_foreign_entries() {
        let (_store, memory, cache) = setup();
        memory
            .insert("SomeoneElse_key", CacheEntry::Languages(Arc::new(vec![tag("en")])))
            .unwrap();
        cache.get_translation("Home.Title", &tag("en")).unwrap();
        cache.get_available_languages().unwrap();
        assert_eq!(memory.len(), 3);

        cache.clear_cache().unwrap();

        assert_eq!(memory.keys().unwrap(), vec!["SomeoneElse_key".to_string()]);
    }

    #[test]
    fn test_clear_cache_keeps_keys_sharing_namespace_letters() {
        let store = CountingStore::new();
        let memory = MemoryCache::new();
        let cache = ResourceCache::builder()
            .store(store)
            .cache(Arc::new(memory.clone()))
            .config(CacheConfig {
                namespace: "Locale".to_string(),
            })
            .build()
            .unwrap();

        let foreign = ["LocaleSettings_theme", "locale_other_consumer", "Locale:Other"];
        for key in foreign {
            memory
                .insert(key, CacheEntry::Languages(Arc::new(Vec::new())))
                .unwrap();
        }
        cache.get_translation("Home.Title", &tag("en")).unwrap();
        cache.get_available_languages().unwrap();
        assert!(memory.contains_key("Locale_Home.Title"));
        assert!(memory.contains_key("Locale:AvailableLanguages"));

        cache.clear_cache().unwrap();

        let remaining = memory.keys().unwrap();
        assert_eq!(remaining, foreign.iter().map(|k| k.to_string()).collect::<Vec<_>>());
    }

    #[test]
    fn test_clear_cache_without_scope_is_noop() {
        let store = CountingStore::new();
        let cache = ResourceCache::builder()
            .store(store)
            .cache(Arc::new(ScopedCache::detached()))
            .build()
            .unwrap();

        assert!(cache.clear_cache().is_ok());
    }

    #[test]
    fn test_read_without_scope_still_hits_store() {
        let store = CountingStore::new();
        store
            .inner
            .create_or_update_translation("Home.Title", &tag("en"), Some("Hello"))
            .unwrap();
        let cache = ResourceCache::builder()
            .store(store.clone())
            .cache(Arc::new(ScopedCache::detached()))
            .build()
            .unwrap();

        assert_eq!(
            cache.get_translation("Home.Title", &tag("en")).unwrap().as_deref(),
            Some("Hello")
        );
        assert_eq!(
            cache.get_translation("Home.Title", &tag("en")).unwrap().as_deref(),
            Some("Hello")
        );
        assert_eq!(store.get_resource_calls(), 2);
    }

    #[test]
    fn test_write_without_scope_surfaces_unavailable() {
        let store = CountingStore::new();
        let cache = ResourceCache::builder()
            .store(store.clone())
            .cache(Arc::new(ScopedCache::detached()))
            .build()
            .unwrap();

        let err = cache
            .create_or_update_translation("Home.Title", &tag("en"), Some("Hello"))
            .unwrap_err();
        assert!(err.is_cache_unavailable());
        // 存储写入已完成
        assert!(store.inner.get_resource("Home.Title").unwrap().is_some());
    }

    #[test]
    fn test_available_languages_cached() {
        let (store, _memory, cache) = setup();
        store.inner.create_or_update_translation("a", &tag("sv"), Some("A")).unwrap();
        store.inner.create_or_update_translation("a", &tag("en"), Some("A")).unwrap();

        assert_eq!(cache.get_available_languages().unwrap(), vec![tag("en"), tag("sv")]);
        store.inner.create_or_update_translation("a", &tag("fi"), Some("A")).unwrap();
        assert_eq!(cache.get_available_languages().unwrap(), vec![tag("en"), tag("sv")]);
        assert_eq!(store.get_languages_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_languages_key_never_collides_with_resource_key() {
        let (_store, _memory, cache) = setup();
        assert_eq!(cache.get_translation("AvailableLanguages", &tag("en")).unwrap(), None);
        assert!(cache.get_available_languages().unwrap().is_empty());
        assert_eq!(cache.get_translation("AvailableLanguages", &tag("en")).unwrap(), None);
    }

    #[test]
    fn test_pass_through_operations_are_not_cached() {
        let (_store, memory, cache) = setup();
        cache.create_resource("Home.Title", "admin").unwrap();
        cache
            .create_or_update_translation("Home.Title", &tag("en"), Some("Hello"))
            .unwrap();

        assert_eq!(cache.get_all_resources().unwrap().len(), 1);
        assert_eq!(cache.get_all_translations("Home", &tag("en")).unwrap().len(), 1);
        assert!(memory.is_empty());

        let err = cache.create_resource("Home.Title", "admin").unwrap_err();
        assert!(matches!(err, DataError::DuplicateKey(_)));
    }

    #[test]
    fn test_custom_namespace() {
        let store = CountingStore::new();
        let memory = MemoryCache::new();
        let cache = ResourceCache::builder()
            .store(store)
            .cache(Arc::new(memory.clone()))
            .config(CacheConfig {
                namespace: "Admin".to_string(),
            })
            .build()
            .unwrap();

        cache.get_translation("x", &tag("en")).unwrap();
        assert!(memory.contains_key("Admin_x"));
        assert_eq!(cache.namespace(), "Admin");
    }

    #[test]
    fn test_concurrent_populate_is_serialized() {
        let (store, memory, cache) = setup();
        for key in ["a", "b", "c"] {
            store.inner.create_or_update_translation(key, &tag("en"), Some(key)).unwrap();
        }
        let cache = Arc::new(cache);

        let handles: Vec<_> = (0..6)
            .map(|_| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for _ in 0..5 {
                        cache.populate_cache().unwrap();
                        assert_eq!(
                            cache.get_translation("b", &tag("en")).unwrap().as_deref(),
                            Some("b")
                        );
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.get_all_max_in_flight.load(Ordering::SeqCst), 1);
        let mut keys = memory.keys().unwrap();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "DbLocalizationProviderCache_a".to_string(),
                "DbLocalizationProviderCache_b".to_string(),
                "DbLocalizationProviderCache_c".to_string(),
            ]
        );
    }

    #[test]
    fn test_concurrent_reads_observe_own_writes() {
        let (store, _memory, cache) = setup();
        store.inner.create_or_update_translation("Shared", &tag("en"), Some("S")).unwrap();
        let cache = Arc::new(cache);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                thread::spawn(move || {
                    let key = format!("Thread{}.Title", i);
                    for j in 0..20 {
                        let value = format!("v{}", j);
                        cache
                            .create_or_update_translation(&key, &tag("en"), Some(&value))
                            .unwrap();
                        assert_eq!(
                            cache.get_translation(&key, &tag("en")).unwrap(),
                            Some(value)
                        );
                        assert_eq!(
                            cache.get_translation("Shared", &tag("en")).unwrap().as_deref(),
                            Some("S")
                        );
                        assert_eq!(cache.get_available_languages().unwrap(), vec![tag("en")]);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        for resource in store.inner.get_all_resources().unwrap() {
            assert_eq!(
                cache.get_translation(resource.key(), &tag("en")).unwrap().as_deref(),
                resource.value_for(&tag("en"))
            );
        }
        assert_eq!(store.inner.get_all_resources().unwrap().len(), 9);
    }
}
