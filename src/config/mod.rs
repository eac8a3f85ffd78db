// ==========================================
// 采购全流程跟踪系统 - 配置层
// ==========================================
// 职责: 系统配置管理（容差、位置表、阶段表、快照参数）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod engine_config_trait;
pub mod error;
pub mod settings;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use engine_config_trait::EngineConfigReader;
pub use error::{ConfigError, ConfigResult};
pub use settings::EngineSettings;

/// 默认配置库路径
///
/// 优先读取环境变量 PROCUREMENT_TRACKER_DB_PATH,否则使用用户数据目录
pub fn default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("PROCUREMENT_TRACKER_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./procurement_tracker.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("procurement-tracker");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("procurement_tracker.db");
        }
    }

    path.to_string_lossy().to_string()
}
