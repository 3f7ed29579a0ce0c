// ==========================================
// 代课覆盖表系统 - 配置管理器
// ==========================================
// 职责: config_kv 表的读写（scope_id = 'global'）
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::db::{configure_sqlite_connection, ensure_schema};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    ///
    /// 说明: 会对传入连接再次应用统一 PRAGMA 并建表（幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            ensure_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET
               value = excluded.value,
               updated_at = excluded.updated_at",
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有 global 配置的快照
    pub fn get_config_snapshot(&self) -> RepositoryResult<BTreeMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Ok(rows)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 工作表名
    pub const DAILY_REPORT_SHEET: &str = "daily_report_sheet";
    pub const DAILY_COVERAGE_SHEET: &str = "daily_coverage_sheet";
    pub const MASTER_SCHEDULE_SHEET: &str = "master_schedule_sheet";
    pub const TEACHER_LIST_SHEET: &str = "teacher_list_sheet";

    // 匹配
    pub const MATCH_THRESHOLD: &str = "match_threshold";

    // 格式
    pub const HIGHLIGHT_FILL: &str = "highlight_fill";
}
