//! 资源同步
//!
//! 扫描候选模型，把存储中尚不存在的资源注册进去并写入默认译文，
//! 最后预热资源缓存。已存在的资源保持不变（译者的修改优先）。

use crate::data::{ResourceStore, Result};
use crate::models::{LanguageTag, SyncConfig};
use crate::services::resource_cache::ResourceCache;
use crate::services::scanner::{DiscoveredResource, ModelDescriptor, TypeScanner};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// 同步结果统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub discovered: usize,
    pub created: usize,
    pub unchanged: usize,
}

/// 资源同步器
pub struct ResourceSynchronizer<S: TypeScanner> {
    store: Arc<dyn ResourceStore>,
    cache: Arc<ResourceCache>,
    scanner: S,
    author: String,
    default_language: LanguageTag,
}

impl<S: TypeScanner> ResourceSynchronizer<S> {
    pub fn new(
        store: Arc<dyn ResourceStore>,
        cache: Arc<ResourceCache>,
        scanner: S,
        config: &SyncConfig,
    ) -> Result<Self> {
        Ok(Self {
            store,
            cache,
            scanner,
            author: config.author.clone(),
            default_language: LanguageTag::parse(&config.default_language)?,
        })
    }

    /// 扫描并同步一组候选模型
    pub fn sync(&self, models: &[ModelDescriptor]) -> Result<SyncReport> {
        let discovered = self.scanner.discover(models);
        let mut known: HashSet<String> = self
            .store
            .get_all_resources()?
            .into_iter()
            .map(|r| r.key().to_string())
            .collect();

        let mut report = SyncReport {
            discovered: discovered.len(),
            ..SyncReport::default()
        };

        for resource in &discovered {
            if !known.insert(resource.key.clone()) {
                report.unchanged += 1;
                continue;
            }

            self.register(resource)?;
            report.created += 1;
        }

        self.cache.populate_cache()?;

        tracing::info!(
            discovered = report.discovered,
            created = report.created,
            unchanged = report.unchanged,
            "资源同步完成"
        );
        Ok(report)
    }

    fn register(&self, resource: &DiscoveredResource) -> Result<()> {
        self.store.create_resource_from_code(&resource.key, &self.author)?;

        let value = default_translation(resource);
        let invariant = LanguageTag::invariant();
        self.store
            .create_or_update_translation(&resource.key, &invariant, Some(value))?;
        if self.default_language != invariant {
            self.store
                .create_or_update_translation(&resource.key, &self.default_language, Some(value))?;
        }

        tracing::debug!(key = %resource.key, "已注册扫描发现的资源");
        Ok(())
    }
}

/// 默认译文：声明的默认值，否则成员名，类级资源退化为键本身
fn default_translation(resource: &DiscoveredResource) -> &str {
    resource
        .default_value
        .as_deref()
        .or_else(|| resource.member.as_ref().map(|m| m.name.as_str()))
        .unwrap_or(resource.key.as_str())
}
