use crate::data::{DataError, Result};
use crate::models::AppConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// 配置目录 (~/.dblocale)，若不存在则创建
pub fn config_dir() -> Result<PathBuf> {
    let home_dir =
        dirs::home_dir().ok_or_else(|| DataError::Configuration("无法获取用户主目录".to_string()))?;
    let config_dir = home_dir.join(".dblocale");
    if !config_dir.exists() {
        fs::create_dir_all(&config_dir).map_err(|e| DataError::io(&config_dir, e))?;
    }
    Ok(config_dir)
}

/// 全局配置文件路径
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// 默认资源数据库路径
pub fn default_db_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("resources.db"))
}

/// 读取全局配置（文件不存在时返回默认配置）
pub fn read_config() -> Result<AppConfig> {
    read_config_from(&config_path()?)
}

pub fn read_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "配置文件不存在，使用默认配置");
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
    Ok(serde_json::from_str(&content)?)
}

/// 写入全局配置
pub fn write_config(config: &AppConfig) -> Result<()> {
    write_config_to(&config_path()?, config)
}

pub fn write_config_to(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| DataError::io(parent, e))?;
    }

    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json).map_err(|e| DataError::io(path, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .map_err(|e| DataError::io(path, e))?;
    }

    tracing::debug!(path = %path.display(), "配置已保存");
    Ok(())
}

/// 实际使用的数据库路径：配置优先，否则落在配置目录下
pub fn resolve_db_path(config: &AppConfig) -> Result<PathBuf> {
    match &config.store.db_path {
        Some(path) => Ok(path.clone()),
        None => default_db_path(),
    }
}
