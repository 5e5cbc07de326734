//! 本地化模型扫描模块
//!
//! 按职责拆分为多个子模块：
//! - `model`: 模型元数据描述（代替运行时反射的声明表）
//! - `key_builder`: 资源键拼接
//! - `localized_model`: "本地化模型"扫描器
//! - `catalog`: 从 JSON/TOML 目录文件加载模型描述

pub mod catalog;
pub mod key_builder;
pub mod localized_model;
pub mod model;

pub use key_builder::build_resource_key;
pub use localized_model::LocalizedModelScanner;
pub use model::{
    ClassResource, LocalizedModel, MemberDescriptor, MemberKind, MemberScope,
    ModelDescriptor, Visibility,
};

use serde::Serialize;

/// 被发现资源所对应的成员
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberRef {
    pub name: String,
    pub kind: MemberKind,
    pub scope: MemberScope,
}

/// 扫描结果：一条待注册的资源声明
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredResource {
    pub key: String,
    /// 类级资源为 `None`
    pub member: Option<MemberRef>,
    pub default_value: Option<String>,
    /// 声明该资源的模型全名
    pub declaring_type: String,
    pub value_type: String,
    pub is_class_level: bool,
}

/// 类型扫描器接口
///
/// 实现必须无状态、无副作用，可在多线程中并发调用。
pub trait TypeScanner: Send + Sync {
    /// 模型是否需要扫描
    fn should_scan(&self, model: &ModelDescriptor) -> bool;

    /// 模型的资源键前缀
    fn resource_key_prefix(&self, model: &ModelDescriptor, explicit_prefix: Option<&str>) -> String;

    /// 类级资源
    ///
    /// 前置条件：`should_scan(model)` 为真。
    fn class_level_resources(&self, model: &ModelDescriptor, prefix: &str) -> Vec<DiscoveredResource>;

    /// 成员级资源
    ///
    /// 前置条件：`should_scan(model)` 为真。
    fn resources(&self, model: &ModelDescriptor, prefix: &str) -> Vec<DiscoveredResource>;

    /// 扫描一组候选模型：跳过不需要扫描的模型，按输入顺序输出类级资源和成员级资源
    fn discover(&self, models: &[ModelDescriptor]) -> Vec<DiscoveredResource> {
        let mut discovered = Vec::new();
        for model in models.iter().filter(|m| self.should_scan(m)) {
            let prefix = self.resource_key_prefix(model, None);
            discovered.extend(self.class_level_resources(model, &prefix));
            discovered.extend(self.resources(model, &prefix));
        }
        discovered
    }
}
