//! 模型目录文件
//!
//! 宿主可以不写代码，直接在 JSON 或 TOML 文件中声明模型：
//!
//! ```toml
//! [[models]]
//! full_name = "App.Models.User"
//! localized_model = { key_prefix = "User" }
//!
//! [[models.members]]
//! name = "Name"
//! default_value = "Name"
//! ```
//!
//! JSON 文件可以是模型数组，也可以是 `{ "models": [...] }`。

use super::model::ModelDescriptor;
use crate::data::{DataError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    models: Vec<ModelDescriptor>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonCatalog {
    List(Vec<ModelDescriptor>),
    File(CatalogFile),
}

/// 从文件加载模型目录（按扩展名选择 JSON 或 TOML，默认 JSON）
pub fn load(path: &Path) -> Result<Vec<ModelDescriptor>> {
    let content = fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;

    let models = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("toml") => parse_toml(&content)?,
        _ => parse_json(&content)?,
    };

    tracing::debug!(path = %path.display(), count = models.len(), "模型目录已加载");
    Ok(models)
}

pub fn parse_json(content: &str) -> Result<Vec<ModelDescriptor>> {
    Ok(match serde_json::from_str::<JsonCatalog>(content)? {
        JsonCatalog::List(models) => models,
        JsonCatalog::File(file) => file.models,
    })
}

pub fn parse_toml(content: &str) -> Result<Vec<ModelDescriptor>> {
    let file: CatalogFile = toml::from_str(content)?;
    Ok(file.models)
}
