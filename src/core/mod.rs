// 核心基础设施层
//
// - logger: 基于 tracing 的日志初始化与级别热更新

pub mod logger;

pub use logger::{init_logger, update_log_level};
