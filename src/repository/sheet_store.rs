// ==========================================
// 代课覆盖表系统 - 表格存储接口
// ==========================================
// 职责: 以"行 × 列"字符串二维表读写命名工作表，并记录单元格填充色
// 说明: 引擎层不依赖此接口，仅 API 层使用; 不存在的表视为空表
// ==========================================

use crate::domain::{CellCoord, FillColor};
use crate::repository::error::RepositoryResult;
use std::collections::BTreeSet;

/// 表格存储 Trait
///
/// 行号、列号均从 0 开始; 行可以不等长
pub trait SheetStore: Send + Sync {
    /// 读取整张表（含表头行）
    fn read_all(&self, sheet: &str) -> RepositoryResult<Vec<Vec<String>>>;

    /// 整表覆盖写入（单事务，失败时原表不变）
    fn overwrite(&self, sheet: &str, rows: &[Vec<String>]) -> RepositoryResult<()>;

    /// 整表覆盖并以给定单元格集合替换全部背景色（单事务）
    ///
    /// 返回着色的单元格数; cells 为空时等价于覆盖写入加清除着色
    fn replace_with_fills(
        &self,
        sheet: &str,
        rows: &[Vec<String>],
        cells: &BTreeSet<CellCoord>,
        color: FillColor,
    ) -> RepositoryResult<usize>;

    /// 在表尾追加一行，返回新行的行号
    fn append_row(&self, sheet: &str, row: &[String]) -> RepositoryResult<usize>;

    /// 为指定单元格设置背景色，返回设置的单元格数
    fn apply_fill(
        &self,
        sheet: &str,
        cells: &BTreeSet<CellCoord>,
        color: FillColor,
    ) -> RepositoryResult<usize>;

    /// 清除整表的背景色
    fn clear_fill(&self, sheet: &str) -> RepositoryResult<()>;

    /// 读取整表的背景色（按坐标升序）
    fn read_fills(&self, sheet: &str) -> RepositoryResult<Vec<(CellCoord, FillColor)>>;

    /// 读取某一列的全部值（短行以空字符串补齐）
    fn column_values(&self, sheet: &str, col: usize) -> RepositoryResult<Vec<String>> {
        Ok(self
            .read_all(sheet)?
            .into_iter()
            .map(|row| row.get(col).cloned().unwrap_or_default())
            .collect())
    }
}
