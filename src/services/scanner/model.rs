//! 模型元数据描述
//!
//! 用显式的声明表代替运行时反射：宿主为每个模型类型提供一份 `ModelDescriptor`，
//! 列出本地化标记、类级资源和成员（名称、类型、默认值、键覆盖、包含/忽略标记）。
//! 描述可以在代码中用构造器声明，也可以从 JSON/TOML 目录文件加载。

use serde::{Deserialize, Serialize};

/// "本地化模型"标记
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedModel {
    /// 显式的资源键前缀，为空时使用类型全名
    #[serde(default)]
    pub key_prefix: Option<String>,
    /// 是否包含基类成员
    #[serde(default = "default_inherited")]
    pub inherited: bool,
    /// 仅包含显式标记 `include` 的成员
    #[serde(default)]
    pub only_included: bool,
}

fn default_inherited() -> bool {
    true
}

impl Default for LocalizedModel {
    fn default() -> Self {
        Self {
            key_prefix: None,
            inherited: default_inherited(),
            only_included: false,
        }
    }
}

impl LocalizedModel {
    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    pub fn inherited(mut self, inherited: bool) -> Self {
        self.inherited = inherited;
        self
    }

    pub fn only_included(mut self) -> Self {
        self.only_included = true;
        self
    }

    /// 非空的显式前缀
    pub fn explicit_prefix(&self) -> Option<&str> {
        self.key_prefix.as_deref().filter(|p| !p.is_empty())
    }
}

/// 直接声明在类型上的资源（子键 + 默认值）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassResource {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    #[default]
    Property,
    Field,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberScope {
    #[default]
    Instance,
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    NonPublic,
}

/// 成员（字段或属性）描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDescriptor {
    pub name: String,
    #[serde(default)]
    pub kind: MemberKind,
    #[serde(default)]
    pub scope: MemberScope,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default = "default_value_type")]
    pub value_type: String,
    #[serde(default)]
    pub default_value: Option<String>,
    /// 成员级资源键覆盖
    #[serde(default)]
    pub key_override: Option<String>,
    #[serde(default)]
    pub ignore: bool,
    #[serde(default)]
    pub include: bool,
}

fn default_value_type() -> String {
    "string".to_string()
}

impl MemberDescriptor {
    fn new(name: impl Into<String>, kind: MemberKind) -> Self {
        Self {
            name: name.into(),
            kind,
            scope: MemberScope::Instance,
            visibility: Visibility::Public,
            value_type: default_value_type(),
            default_value: None,
            key_override: None,
            ignore: false,
            include: false,
        }
    }

    pub fn property(name: impl Into<String>) -> Self {
        Self::new(name, MemberKind::Property)
    }

    pub fn field(name: impl Into<String>) -> Self {
        Self::new(name, MemberKind::Field)
    }

    pub fn of_type(mut self, value_type: impl Into<String>) -> Self {
        self.value_type = value_type.into();
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key_override = Some(key.into());
        self
    }

    pub fn static_scope(mut self) -> Self {
        self.scope = MemberScope::Static;
        self
    }

    pub fn non_public(mut self) -> Self {
        self.visibility = Visibility::NonPublic;
        self
    }

    pub fn ignored(mut self) -> Self {
        self.ignore = true;
        self
    }

    pub fn included(mut self) -> Self {
        self.include = true;
        self
    }
}

/// 模型类型描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// 类型全名（如 "App.Models.UserViewModel"）
    pub full_name: String,
    #[serde(default)]
    pub localized_model: Option<LocalizedModel>,
    #[serde(default)]
    pub class_resources: Vec<ClassResource>,
    #[serde(default)]
    pub members: Vec<MemberDescriptor>,
    #[serde(default)]
    pub base: Option<Box<ModelDescriptor>>,
}

impl ModelDescriptor {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            localized_model: None,
            class_resources: Vec::new(),
            members: Vec::new(),
            base: None,
        }
    }

    /// 添加"本地化模型"标记
    pub fn localized(mut self, marker: LocalizedModel) -> Self {
        self.localized_model = Some(marker);
        self
    }

    pub fn class_resource(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.class_resources.push(ClassResource {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn member(mut self, member: MemberDescriptor) -> Self {
        self.members.push(member);
        self
    }

    /// 添加一个无默认值的公有实例属性
    pub fn property(self, name: impl Into<String>) -> Self {
        self.member(MemberDescriptor::property(name))
    }

    pub fn extends(mut self, base: ModelDescriptor) -> Self {
        self.base = Some(Box::new(base));
        self
    }

    /// 自身及所有基类，从派生到基
    pub fn ancestry(&self) -> Vec<&ModelDescriptor> {
        let mut chain = vec![self];
        let mut current = self.base.as_deref();
        while let Some(base) = current {
            chain.push(base);
            current = base.base.as_deref();
        }
        chain
    }
}
