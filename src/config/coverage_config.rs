// ==========================================
// 代课覆盖表系统 - 运行配置
// ==========================================
// 解析顺序: 环境变量 > config_kv 表 > 内置默认值
// ==========================================

use crate::config::config_manager::{config_keys, ConfigManager};
use crate::domain::FillColor;
use crate::engine::ScheduleMatcher;
use crate::repository::error::{RepositoryError, RepositoryResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// 环境变量名
pub mod env_keys {
    pub const DAILY_REPORT_ID: &str = "DAILY_REPORT_ID";
    pub const DAILY_COVERAGE_ID: &str = "DAILY_COVERAGE_ID";
    pub const MASTER_SCHEDULE_ID: &str = "MASTER_SCHEDULE_ID";
    pub const TEACHER_LIST_ID: &str = "TEACHER_LIST_ID";
    pub const COVERAGE_MATCH_THRESHOLD: &str = "COVERAGE_MATCH_THRESHOLD";
    pub const DB_PATH: &str = "DAILY_COVERAGE_DB_PATH";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageConfig {
    pub daily_report_sheet: String,
    pub daily_coverage_sheet: String,
    pub master_schedule_sheet: String,
    pub teacher_list_sheet: String,
    /// 模糊匹配阈值（严格大于才算匹配）
    pub match_threshold: u32,
    pub highlight_fill: FillColor,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            daily_report_sheet: "daily_report".to_string(),
            daily_coverage_sheet: "daily_coverage".to_string(),
            master_schedule_sheet: "master_schedule".to_string(),
            teacher_list_sheet: "teacher_list".to_string(),
            match_threshold: ScheduleMatcher::DEFAULT_THRESHOLD,
            highlight_fill: FillColor::DARK_GRAY,
        }
    }
}

impl CoverageConfig {
    /// 从进程环境与 config_kv 表加载
    pub fn load(manager: Option<&ConfigManager>) -> RepositoryResult<Self> {
        Self::resolve(|key| std::env::var(key).ok(), manager)
    }

    /// 按给定的环境查找函数加载
    pub fn resolve<F>(env: F, manager: Option<&ConfigManager>) -> RepositoryResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |env_key: Option<&str>, kv_key: &str| -> RepositoryResult<Option<String>> {
            if let Some(value) = env_key.and_then(&env).map(|v| v.trim().to_string()) {
                if !value.is_empty() {
                    return Ok(Some(value));
                }
            }
            match manager {
                Some(m) => m.get_global_config_value(kv_key),
                None => Ok(None),
            }
        };

        let defaults = Self::default();
        let mut config = Self {
            daily_report_sheet: lookup(Some(env_keys::DAILY_REPORT_ID), config_keys::DAILY_REPORT_SHEET)?
                .unwrap_or(defaults.daily_report_sheet),
            daily_coverage_sheet: lookup(Some(env_keys::DAILY_COVERAGE_ID), config_keys::DAILY_COVERAGE_SHEET)?
                .unwrap_or(defaults.daily_coverage_sheet),
            master_schedule_sheet: lookup(Some(env_keys::MASTER_SCHEDULE_ID), config_keys::MASTER_SCHEDULE_SHEET)?
                .unwrap_or(defaults.master_schedule_sheet),
            teacher_list_sheet: lookup(Some(env_keys::TEACHER_LIST_ID), config_keys::TEACHER_LIST_SHEET)?
                .unwrap_or(defaults.teacher_list_sheet),
            ..defaults
        };

        if let Some(raw) = lookup(Some(env_keys::COVERAGE_MATCH_THRESHOLD), config_keys::MATCH_THRESHOLD)? {
            config.match_threshold = parse_threshold(&raw)?;
        }
        if let Some(raw) = lookup(None, config_keys::HIGHLIGHT_FILL)? {
            config.highlight_fill =
                FillColor::from_str(&raw).map_err(|message| RepositoryError::ConfigValueError {
                    key: config_keys::HIGHLIGHT_FILL.to_string(),
                    value: raw.clone(),
                    message,
                })?;
        }

        Ok(config)
    }

    pub fn matcher(&self) -> ScheduleMatcher {
        ScheduleMatcher::with_threshold(self.match_threshold)
    }
}

fn parse_threshold(raw: &str) -> RepositoryResult<u32> {
    let err = |message: String| RepositoryError::ConfigValueError {
        key: config_keys::MATCH_THRESHOLD.to_string(),
        value: raw.to_string(),
        message,
    };
    let value: u32 = raw.trim().parse().map_err(|e| err(format!("{}", e)))?;
    if value > 100 {
        return Err(err("阈值范围为 0–100".to_string()));
    }
    Ok(value)
}

/// 获取默认数据库路径
///
/// 顺序: DAILY_COVERAGE_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(env_keys::DB_PATH) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./daily_coverage.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("daily-coverage");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("daily_coverage.db");
        }
    }

    path.to_string_lossy().to_string()
}
