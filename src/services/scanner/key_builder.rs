//! 资源键拼接

/// 成员级资源键的默认分隔符
pub const DEFAULT_SEPARATOR: &str = ".";

/// 拼接资源键：`{prefix}{separator}{name}`
///
/// 前缀为空时直接返回 `name`。
pub fn build_resource_key(prefix: &str, name: &str, separator: &str) -> String {
    if prefix.is_empty() {
        return name.to_string();
    }
    format!("{}{}{}", prefix, separator, name)
}
