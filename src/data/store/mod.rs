//! 资源存储
//!
//! [`ResourceStore`] 是资源缓存背后的权威数据源接口；
//! `sqlite` 子模块提供基于 SQLite 的默认实现。

pub mod sqlite;

pub use sqlite::SqliteResourceStore;

use crate::data::Result;
use crate::models::{LanguageTag, Resource, ResourceItem};

/// 资源存储接口
///
/// 实现方负责自身的超时与取消；调用方（资源缓存）不做重试，错误原样传播。
pub trait ResourceStore: Send + Sync {
    /// 按键读取资源及其全部译文，不存在时返回 `None`
    fn get_resource(&self, key: &str) -> Result<Option<Resource>>;

    /// 所有出现过译文的语言（有序，不含不变语言）
    fn get_available_languages(&self) -> Result<Vec<LanguageTag>>;

    fn get_all_resources(&self) -> Result<Vec<Resource>>;

    /// 键以 `key` 开头、且在 `language` 下有译文的所有条目
    fn get_all_translations(&self, key: &str, language: &LanguageTag) -> Result<Vec<ResourceItem>>;

    /// 创建空资源；键已存在时返回 `DataError::DuplicateKey`
    fn create_resource(&self, key: &str, author: &str) -> Result<()>;

    /// 创建由模型扫描注册的资源
    fn create_resource_from_code(&self, key: &str, author: &str) -> Result<()> {
        self.create_resource(key, author)
    }

    /// 删除资源及其译文；键不存在时为空操作
    fn delete_resource(&self, key: &str) -> Result<()>;

    /// 新增或更新译文；资源不存在时一并创建
    fn create_or_update_translation(
        &self,
        key: &str,
        language: &LanguageTag,
        value: Option<&str>,
    ) -> Result<()>;
}
