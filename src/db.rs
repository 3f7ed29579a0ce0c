// ==========================================
// 代课覆盖表系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 建表幂等（CREATE TABLE IF NOT EXISTS）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;
use tracing::debug;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 表格存储 schema
///
/// - sheet_cell: 每个单元格一行，(sheet_name, row_idx, col_idx) 唯一
/// - sheet_fill: 单元格背景色（RGB 0–1）
/// - config_kv:  全局配置
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS sheet_cell (
    sheet_name TEXT NOT NULL,
    row_idx INTEGER NOT NULL,
    col_idx INTEGER NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (sheet_name, row_idx, col_idx)
);

CREATE TABLE IF NOT EXISTS sheet_fill (
    sheet_name TEXT NOT NULL,
    row_idx INTEGER NOT NULL,
    col_idx INTEGER NOT NULL,
    red REAL NOT NULL,
    green REAL NOT NULL,
    blue REAL NOT NULL,
    PRIMARY KEY (sheet_name, row_idx, col_idx)
);

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id TEXT NOT NULL DEFAULT 'global',
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (scope_id, key)
);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明: foreign_keys / busy_timeout 都需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表并登记 schema_version（幂等）
///
/// 已登记当前或更高版本时不再执行建表脚本
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    if let Some(version) = read_schema_version(conn)? {
        if version >= CURRENT_SCHEMA_VERSION {
            debug!(version, "schema 已是最新");
            return Ok(());
        }
    }

    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
