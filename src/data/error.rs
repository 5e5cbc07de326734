//! 统一错误类型定义
//!
//! 使用 `thiserror` 定义数据层（资源存储 + 缓存）的所有错误类型。
//! 应用层（CLI、配置加载）通过 `anyhow` 自动转换。

use std::path::PathBuf;
use thiserror::Error;

/// 数据层的统一错误类型
#[derive(Error, Debug)]
pub enum DataError {
    /// 必需的协作组件缺失（构造期快速失败，不可恢复）
    #[error("配置错误: {0}")]
    Configuration(String),

    /// 文件 I/O 错误
    #[error("文件 I/O 错误: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON 序列化/反序列化错误
    #[error("JSON 序列化错误: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// TOML 反序列化错误
    #[error("TOML 反序列化错误: {0}")]
    TomlDeserialization(#[from] toml::de::Error),

    /// 数据库错误
    #[error("数据库错误: {0}")]
    Database(#[from] rusqlite::Error),

    /// 资源键已存在
    #[error("资源键已存在: {0}")]
    DuplicateKey(String),

    /// 无效的语言标识
    #[error("无效的语言标识: {0}")]
    InvalidLanguage(String),

    /// 缓存基础设施不可用（例如不在服务作用域内）
    #[error("缓存不可用: {0}")]
    CacheUnavailable(String),

    /// 并发错误（锁中毒）
    #[error("并发错误: {0}")]
    Concurrency(String),
}

/// 数据层结果类型别名
pub type Result<T> = std::result::Result<T, DataError>;

impl DataError {
    /// 从 `std::io::Error` 和路径创建 I/O 错误
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// 是否为缓存不可用错误
    pub fn is_cache_unavailable(&self) -> bool {
        matches!(self, Self::CacheUnavailable(_))
    }
}
