// ==========================================
// 代课覆盖表系统 - SQLite 表格存储实现
// ==========================================
// 表: sheet_cell（单元格值）/ sheet_fill（单元格背景色）
// 约束: 整表覆盖在单事务内完成
// ==========================================

use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::{CellCoord, FillColor};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sheet_store::SheetStore;
use rusqlite::{params, Connection};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// SQLite 表格存储
pub struct SqliteSheetStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSheetStore {
    /// 打开（或创建）数据库文件并建表
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// 复用已有连接（与配置管理器共享同一数据库）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            ensure_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    /// 共享连接句柄
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl SheetStore for SqliteSheetStore {
    fn read_all(&self, sheet: &str) -> RepositoryResult<Vec<Vec<String>>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT row_idx, col_idx, value FROM sheet_cell
             WHERE sheet_name = ?1
             ORDER BY row_idx, col_idx",
        )?;
        let cells = stmt
            .query_map(params![sheet], |row| {
                Ok((
                    row.get::<_, i64>(0)? as usize,
                    row.get::<_, i64>(1)? as usize,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut rows: Vec<Vec<String>> = Vec::new();
        for (r, c, value) in cells {
            if rows.len() <= r {
                rows.resize_with(r + 1, Vec::new);
            }
            let row = &mut rows[r];
            if row.len() <= c {
                row.resize(c + 1, String::new());
            }
            row[c] = value;
        }
        Ok(rows)
    }

    fn overwrite(&self, sheet: &str, rows: &[Vec<String>]) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        replace_cells(&tx, sheet, rows)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        debug!(sheet, rows = rows.len(), "整表覆盖写入完成");
        Ok(())
    }

    fn replace_with_fills(
        &self,
        sheet: &str,
        rows: &[Vec<String>],
        cells: &BTreeSet<CellCoord>,
        color: FillColor,
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        replace_cells(&tx, sheet, rows)?;
        tx.execute("DELETE FROM sheet_fill WHERE sheet_name = ?1", params![sheet])?;
        insert_fills(&tx, sheet, cells, color)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        debug!(sheet, rows = rows.len(), fills = cells.len(), "整表与着色替换完成");
        Ok(cells.len())
    }

    fn append_row(&self, sheet: &str, row: &[String]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let next: i64 = tx.query_row(
            "SELECT COALESCE(MAX(row_idx) + 1, 0) FROM sheet_cell WHERE sheet_name = ?1",
            params![sheet],
            |r| r.get(0),
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO sheet_cell (sheet_name, row_idx, col_idx, value)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (c, value) in row.iter().enumerate() {
                stmt.execute(params![sheet, next, c as i64, value])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(next as usize)
    }

    fn apply_fill(
        &self,
        sheet: &str,
        cells: &BTreeSet<CellCoord>,
        color: FillColor,
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        insert_fills(&tx, sheet, cells, color)?;
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(cells.len())
    }

    fn clear_fill(&self, sheet: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM sheet_fill WHERE sheet_name = ?1", params![sheet])?;
        Ok(())
    }

    fn read_fills(&self, sheet: &str) -> RepositoryResult<Vec<(CellCoord, FillColor)>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT row_idx, col_idx, red, green, blue FROM sheet_fill
             WHERE sheet_name = ?1
             ORDER BY row_idx, col_idx",
        )?;
        let fills = stmt
            .query_map(params![sheet], |row| {
                Ok((
                    CellCoord::new(row.get::<_, i64>(0)? as usize, row.get::<_, i64>(1)? as usize),
                    FillColor {
                        red: row.get(2)?,
                        green: row.get(3)?,
                        blue: row.get(4)?,
                    },
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(fills)
    }
}

// ==========================================
// 事务内写入辅助（调用方负责提交）
// ==========================================

fn replace_cells(conn: &Connection, sheet: &str, rows: &[Vec<String>]) -> RepositoryResult<()> {
    conn.execute("DELETE FROM sheet_cell WHERE sheet_name = ?1", params![sheet])?;
    let mut stmt = conn.prepare(
        "INSERT INTO sheet_cell (sheet_name, row_idx, col_idx, value)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            stmt.execute(params![sheet, r as i64, c as i64, value])?;
        }
    }
    Ok(())
}

fn insert_fills(
    conn: &Connection,
    sheet: &str,
    cells: &BTreeSet<CellCoord>,
    color: FillColor,
) -> RepositoryResult<()> {
    let mut stmt = conn.prepare(
        "INSERT OR REPLACE INTO sheet_fill (sheet_name, row_idx, col_idx, red, green, blue)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    for cell in cells {
        stmt.execute(params![
            sheet,
            cell.row as i64,
            cell.col as i64,
            color.red,
            color.green,
            color.blue
        ])?;
    }
    Ok(())
}
