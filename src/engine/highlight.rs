// ==========================================
// 代课覆盖表系统 - 高亮单元格选择
// ==========================================
// 职责: 扫描整表（含表头行），返回值属于保护标签集合的单元格坐标
// 说明: 只产出坐标，着色由外部存储完成
// ==========================================

use crate::domain::types::is_protected_label;
use crate::domain::{CellCoord, CoverageTable};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Default)]
pub struct HighlightSelector;

impl HighlightSelector {
    pub fn new() -> Self {
        Self
    }

    /// 选择需高亮的单元格
    ///
    /// 坐标系: 第 0 行为表头，数据行 i 位于第 i + 1 行
    pub fn select(&self, table: &CoverageTable) -> BTreeSet<CellCoord> {
        table
            .to_raw()
            .iter()
            .enumerate()
            .flat_map(|(r, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .filter(|(_, value)| is_protected_label(value))
                    .map(move |(c, _)| CellCoord::new(r, c))
            })
            .collect()
    }
}
