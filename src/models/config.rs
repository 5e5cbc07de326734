// 全局配置结构，放在 models 以便在库和二进制之间共享
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// 解析字符串为日志级别
    pub fn parse(level_str: &str) -> Result<Self, String> {
        match level_str.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("无效的日志级别: {}", level_str)),
        }
    }
}

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// 日志输出目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Console,
    File,
    Both,
}

/// 日志配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub output: LogOutput,
    /// 日志目录（文件输出时使用，默认 ~/.dblocale/logs）
    #[serde(default)]
    pub file_path: Option<String>,
}

/// 资源缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// 缓存键命名空间前缀，所有缓存键形如 `{namespace}_{key}`
    #[serde(default = "default_cache_namespace")]
    pub namespace: String,
}

fn default_cache_namespace() -> String {
    "DbLocalizationProviderCache".to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            namespace: default_cache_namespace(),
        }
    }
}

/// 模型扫描配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// 成员级资源键的分隔符（允许为空）
    #[serde(default = "default_key_separator")]
    pub key_separator: String,
}

fn default_key_separator() -> String {
    ".".to_string()
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            key_separator: default_key_separator(),
        }
    }
}

/// 资源存储配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite 数据库路径（默认 ~/.dblocale/resources.db）
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

/// 同步配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// 扫描注册资源时记录的作者
    #[serde(default = "default_sync_author")]
    pub author: String,
    /// 除不变语言外，默认值同时写入的语言
    #[serde(default = "default_sync_language")]
    pub default_language: String,
}

fn default_sync_author() -> String {
    "type-scanner".to_string()
}

fn default_sync_language() -> String {
    "en".to_string()
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            author: default_sync_author(),
            default_language: default_sync_language(),
        }
    }
}

/// 应用全局配置（~/.dblocale/config.json）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}
