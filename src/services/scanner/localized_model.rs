//! "本地化模型"扫描器
//!
//! 扫描带 `LocalizedModel` 标记的模型：
//! - 类级资源：键 = 前缀 + 子键（空分隔符）
//! - 成员级资源：公有的实例/静态字段和属性，键 = 前缀 + 分隔符 + 成员名
//! - 包含/忽略/继承策略由标记和成员描述决定
//!
//! 输出顺序是确定的：先属性后字段；同类成员按派生类到基类、声明顺序排列。

use super::key_builder::{build_resource_key, DEFAULT_SEPARATOR};
use super::model::{MemberDescriptor, MemberKind, MemberScope, ModelDescriptor, Visibility};
use super::{DiscoveredResource, MemberRef, TypeScanner};
use crate::models::ScannerConfig;
use std::collections::HashSet;

/// 类级资源的值类型
const CLASS_RESOURCE_TYPE: &str = "string";

/// "本地化模型"扫描器
#[derive(Debug, Clone)]
pub struct LocalizedModelScanner {
    separator: String,
}

impl Default for LocalizedModelScanner {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl LocalizedModelScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &ScannerConfig) -> Self {
        Self {
            separator: config.key_separator.clone(),
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// 可参与扫描的成员（含声明它的模型），已去除被派生类同名成员隐藏的基类成员
    ///
    /// 基类只贡献实例成员，静态成员不继承。
    fn eligible_members<'a>(
        model: &'a ModelDescriptor,
        inherited: bool,
    ) -> Vec<(&'a ModelDescriptor, &'a MemberDescriptor)> {
        let chain = if inherited {
            model.ancestry()
        } else {
            vec![model]
        };

        let mut seen = HashSet::new();
        let mut eligible = Vec::new();
        for kind in [MemberKind::Property, MemberKind::Field] {
            for (depth, declaring) in chain.iter().copied().enumerate() {
                for member in declaring.members.iter().filter(|m| {
                    m.kind == kind
                        && m.visibility == Visibility::Public
                        && (depth == 0 || m.scope == MemberScope::Instance)
                }) {
                    if seen.insert(member.name.as_str()) {
                        eligible.push((declaring, member));
                    }
                }
            }
        }
        eligible
    }
}

impl TypeScanner for LocalizedModelScanner {
    fn should_scan(&self, model: &ModelDescriptor) -> bool {
        model.localized_model.is_some()
    }

    fn resource_key_prefix(&self, model: &ModelDescriptor, explicit_prefix: Option<&str>) -> String {
        if let Some(prefix) = explicit_prefix.filter(|p| !p.is_empty()) {
            return prefix.to_string();
        }

        model
            .localized_model
            .as_ref()
            .and_then(|marker| marker.explicit_prefix())
            .unwrap_or(model.full_name.as_str())
            .to_string()
    }

    fn class_level_resources(&self, model: &ModelDescriptor, prefix: &str) -> Vec<DiscoveredResource> {
        debug_assert!(self.should_scan(model), "模型未标记为本地化模型: {}", model.full_name);

        model
            .class_resources
            .iter()
            .map(|declared| DiscoveredResource {
                key: build_resource_key(prefix, &declared.key, ""),
                member: None,
                default_value: Some(declared.value.clone()),
                declaring_type: model.full_name.clone(),
                value_type: CLASS_RESOURCE_TYPE.to_string(),
                is_class_level: true,
            })
            .collect()
    }

    fn resources(&self, model: &ModelDescriptor, prefix: &str) -> Vec<DiscoveredResource> {
        debug_assert!(self.should_scan(model), "模型未标记为本地化模型: {}", model.full_name);
        let Some(marker) = model.localized_model.as_ref() else {
            return Vec::new();
        };
        let has_explicit_prefix = marker.explicit_prefix().is_some();

        let discovered: Vec<DiscoveredResource> = Self::eligible_members(model, marker.inherited)
            .into_iter()
            .filter(|(_, member)| !member.ignore)
            .filter(|(_, member)| !marker.only_included || member.include)
            .map(|(declaring, member)| {
                let key = match member.key_override.as_deref() {
                    Some(key) if has_explicit_prefix => build_resource_key(prefix, key, ""),
                    Some(key) => key.to_string(),
                    None => build_resource_key(prefix, &member.name, &self.separator),
                };

                DiscoveredResource {
                    key,
                    member: Some(MemberRef {
                        name: member.name.clone(),
                        kind: member.kind,
                        scope: member.scope,
                    }),
                    default_value: member.default_value.clone(),
                    declaring_type: declaring.full_name.clone(),
                    value_type: member.value_type.clone(),
                    is_class_level: false,
                }
            })
            .collect();

        tracing::trace!(model = %model.full_name, count = discovered.len(), "模型成员扫描完成");
        discovered
    }
}
