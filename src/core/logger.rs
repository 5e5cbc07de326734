use crate::models::config::{LogConfig, LogFormat, LogLevel, LogOutput};
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    fmt,
    layer::{Layered, SubscriberExt},
    reload::{self, Handle},
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// 过滤层之上的订阅者类型，输出层都挂在它上面
type Filtered = Layered<reload::Layer<EnvFilter, Registry>, Registry>;

type BoxedLayer = Box<dyn Layer<Filtered> + Send + Sync + 'static>;

/// 日志文件名前缀（按天滚动：`dblocale.YYYY-MM-DD`）
const LOG_FILE_PREFIX: &str = "dblocale";

static LOG_LEVEL_HANDLE: OnceLock<Handle<EnvFilter, Registry>> = OnceLock::new();

/// 初始化日志系统
///
/// 级别可通过 [`update_log_level`] 热更新；格式、输出目标和文件路径需要重启进程。
/// 设置了 `RUST_LOG` 时以环境变量为准。
///
/// ```no_run
/// use dblocale::core::init_logger;
/// use dblocale::models::config::LogConfig;
///
/// init_logger(&LogConfig::default()).expect("初始化日志系统失败");
/// ```
pub fn init_logger(config: &LogConfig) -> anyhow::Result<()> {
    let (filter_layer, reload_handle) = reload::Layer::new(create_env_filter(&config.level));

    if LOG_LEVEL_HANDLE.set(reload_handle).is_err() {
        anyhow::bail!("日志系统已初始化，不能重复初始化");
    }

    let mut layers: Vec<BoxedLayer> = Vec::new();
    if matches!(config.output, LogOutput::Console | LogOutput::Both) {
        layers.push(console_layer(&config.format));
    }
    if matches!(config.output, LogOutput::File | LogOutput::Both) {
        layers.push(file_layer(&config.format, config.file_path.as_deref())?);
    }

    Registry::default().with(filter_layer).with(layers).try_init()?;

    tracing::info!(
        level = config.level.as_str(),
        format = ?config.format,
        output = ?config.output,
        file_path = ?config.file_path,
        "日志系统初始化完成"
    );
    Ok(())
}

/// 动态更新日志级别
pub fn update_log_level(new_level: LogLevel) -> anyhow::Result<()> {
    let handle = LOG_LEVEL_HANDLE
        .get()
        .ok_or_else(|| anyhow::anyhow!("日志系统未初始化"))?;

    handle
        .reload(create_env_filter(&new_level))
        .map_err(|e| anyhow::anyhow!("重载日志级别失败: {}", e))?;

    tracing::info!(new_level = new_level.as_str(), "日志级别已动态更新");
    Ok(())
}

/// 默认只放行本 crate 的日志，rusqlite 等依赖只保留警告
fn create_env_filter(level: &LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

fn default_directives(level: &LogLevel) -> String {
    format!("dblocale={},rusqlite=warn", level.as_str())
}

// CLI 的标准输出留给命令结果，控制台日志写 stderr
fn console_layer(format: &LogFormat) -> BoxedLayer {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(cfg!(debug_assertions));

    match format {
        LogFormat::Text => layer.with_ansi(true).boxed(),
        LogFormat::Json => layer.json().with_ansi(false).boxed(),
    }
}

fn file_layer(format: &LogFormat, file_path: Option<&str>) -> anyhow::Result<BoxedLayer> {
    let log_dir = resolve_log_dir(file_path)?;
    let (writer, guard) = non_blocking(rolling::daily(log_dir, LOG_FILE_PREFIX));

    // 进程生命周期内保持写线程存活
    Box::leak(Box::new(guard));

    let layer = fmt::layer().with_writer(writer).with_ansi(false);
    Ok(match format {
        LogFormat::Text => layer.with_target(cfg!(debug_assertions)).boxed(),
        LogFormat::Json => layer.json().with_target(true).with_thread_ids(true).boxed(),
    })
}

fn resolve_log_dir(file_path: Option<&str>) -> anyhow::Result<PathBuf> {
    let dir = match file_path {
        Some(path) => PathBuf::from(path),
        None => dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("无法获取用户主目录"))?
            .join(".dblocale")
            .join("logs"),
    };
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
