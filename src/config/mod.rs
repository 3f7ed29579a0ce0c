// ==========================================
// 代课覆盖表系统 - 配置层
// ==========================================
// 职责: 系统配置管理，支持多级覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod coverage_config;

pub use config_manager::{config_keys, ConfigManager};
pub use coverage_config::{env_keys, get_default_db_path, CoverageConfig};
