//! 本地化资源数据模型
//!
//! - `LanguageTag`: 规范化的语言标识（"en"、"en-US"、"zh-Hant-TW"）
//! - `Translation`: 某个资源在某种语言下的译文
//! - `Resource`: 资源键 + 译文集合；`exists = false` 表示"资源不存在"哨兵
//! - `ResourceItem`: 批量查询返回的 (key, language, value) 三元组

use crate::data::{DataError, Result};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]{1,8}(?:-[A-Za-z0-9]{1,8})*$").expect("invalid language tag regex")
});

/// 规范化的语言标识
///
/// 相等性按规范化后的字符串比较。空字符串表示不变语言（invariant）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageTag(String);

impl LanguageTag {
    /// 解析并规范化语言标识
    pub fn parse(raw: &str) -> Result<Self> {
        let candidate = raw.trim().replace('_', "-");
        if candidate.is_empty() {
            return Ok(Self::invariant());
        }
        if !TAG_PATTERN.is_match(&candidate) {
            return Err(DataError::InvalidLanguage(raw.to_string()));
        }

        let normalized = candidate
            .split('-')
            .enumerate()
            .map(|(idx, part)| normalize_subtag(idx, part))
            .collect::<Vec<_>>()
            .join("-");

        Ok(Self(normalized))
    }

    /// 不变语言（用于保存代码中声明的默认值）
    pub fn invariant() -> Self {
        Self(String::new())
    }

    pub fn is_invariant(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn normalize_subtag(idx: usize, part: &str) -> String {
    if idx == 0 {
        return part.to_ascii_lowercase();
    }
    match part.len() {
        // 书写系统：Hant、Latn
        4 if part.chars().all(|c| c.is_ascii_alphabetic()) => {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
                None => String::new(),
            }
        }
        // 地区：US、TW、419
        2 => part.to_ascii_uppercase(),
        3 if part.chars().all(|c| c.is_ascii_digit()) => part.to_string(),
        _ => part.to_ascii_lowercase(),
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LanguageTag {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LanguageTag {
    type Error = DataError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<LanguageTag> for String {
    fn from(tag: LanguageTag) -> Self {
        tag.0
    }
}

/// 单条译文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub language: LanguageTag,
    pub value: Option<String>,
}

/// 本地化资源
///
/// `exists = false` 的实例是"资源不存在"哨兵，只能通过
/// [`Resource::non_existing`] 构造，且永远不携带译文。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    key: String,
    translations: Vec<Translation>,
    exists: bool,
    pub author: Option<String>,
    pub modification_date: Option<DateTime<Utc>>,
    /// 是否由模型扫描注册
    pub from_code: bool,
}

impl Resource {
    /// 创建存在的资源（尚无译文）
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            translations: Vec::new(),
            exists: true,
            author: None,
            modification_date: None,
            from_code: false,
        }
    }

    /// 创建"资源不存在"哨兵
    pub fn non_existing(key: impl Into<String>) -> Self {
        Self {
            exists: false,
            ..Self::new(key)
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    pub fn translations(&self) -> &[Translation] {
        &self.translations
    }

    /// 查找指定语言的译文
    pub fn translation(&self, language: &LanguageTag) -> Option<&Translation> {
        self.translations.iter().find(|t| &t.language == language)
    }

    /// 指定语言的译文值
    pub fn value_for(&self, language: &LanguageTag) -> Option<&str> {
        self.translation(language).and_then(|t| t.value.as_deref())
    }

    /// 新增或替换某种语言的译文
    ///
    /// 对不存在哨兵调用时不做任何修改并返回 `false`。
    pub fn set_translation(&mut self, language: LanguageTag, value: Option<String>) -> bool {
        if !self.exists {
            return false;
        }
        match self.translations.iter_mut().find(|t| t.language == language) {
            Some(existing) => existing.value = value,
            None => self.translations.push(Translation { language, value }),
        }
        true
    }

    /// 链式添加译文（主要用于存储层组装结果）
    pub fn with_translation(mut self, language: LanguageTag, value: Option<String>) -> Self {
        self.set_translation(language, value);
        self
    }
}

/// 批量查询结果条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceItem {
    pub key: String,
    pub language: LanguageTag,
    pub value: Option<String>,
}
