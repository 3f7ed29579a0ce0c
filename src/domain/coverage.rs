// ==========================================
// 代课覆盖表系统 - 表格实体
// ==========================================
// 依据: 固定列宽契约（无命名 schema，按位置取值）
// - 课表行:   [教师, HR, 1..9, ...]           (>= 11 列)
// - 报表行:   教师信息@2, 时长@5, 代课信息@8   (>= 9 列)
// - 覆盖行:   [教师, HR..9, 代课人, 时长]      (恰好 13 列)
// ==========================================

use crate::domain::types::{
    COVERAGE_HEADER, COVERAGE_WIDTH, DURATION_COL, FIRST_PERIOD_COL, PERIOD_COUNT,
    REPORT_MIN_WIDTH, SCHEDULE_MIN_WIDTH, SUB_COL,
};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// RowWarning - 软错误（不中断批处理）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowWarning {
    /// 教师未出现在总课表中
    TeacherNotFound { row_index: usize, teacher: String },
    /// 行宽不足，无法按固定偏移取值
    MalformedRow {
        row_index: usize,
        width: usize,
        expected: usize,
    },
}

impl fmt::Display for RowWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowWarning::TeacherNotFound { row_index, teacher } => {
                write!(f, "行 {}: 总课表中未找到教师 {}", row_index, teacher)
            }
            RowWarning::MalformedRow {
                row_index,
                width,
                expected,
            } => write!(f, "行 {}: 列数 {} 少于 {}", row_index, width, expected),
        }
    }
}

// ==========================================
// ScheduleRow - 总课表行（只读）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub teacher: String,
    pub periods: [String; PERIOD_COUNT],
}

impl ScheduleRow {
    /// 由原始单元格构造，超出 11 列的部分丢弃
    ///
    /// # 返回
    /// - Err(width): 行宽不足 11 列
    pub fn from_cells(cells: &[String]) -> Result<ScheduleRow, usize> {
        if cells.len() < SCHEDULE_MIN_WIDTH {
            return Err(cells.len());
        }
        Ok(ScheduleRow {
            teacher: cells[0].clone(),
            periods: std::array::from_fn(|i| cells[FIRST_PERIOD_COL + i].clone()),
        })
    }
}

// ==========================================
// ScheduleTable - 总课表（第 0 行为表头）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleTable {
    pub header: Vec<String>,
    pub rows: Vec<ScheduleRow>,
    /// 行宽不足被跳过的行
    pub warnings: Vec<RowWarning>,
}

impl ScheduleTable {
    /// 从存储读出的原始表格构造
    ///
    /// 说明: 行号为原始表格中的下标（表头为 0）
    pub fn from_raw(raw: Vec<Vec<String>>) -> ScheduleTable {
        let mut iter = raw.into_iter();
        let header = iter.next().unwrap_or_default();

        let mut rows = Vec::new();
        let mut warnings = Vec::new();
        for (offset, cells) in iter.enumerate() {
            // 空白分隔行不算数据
            if cells.iter().all(|c| c.trim().is_empty()) {
                continue;
            }
            match ScheduleRow::from_cells(&cells) {
                Ok(row) => rows.push(row),
                Err(width) => warnings.push(RowWarning::MalformedRow {
                    row_index: offset + 1,
                    width,
                    expected: SCHEDULE_MIN_WIDTH,
                }),
            }
        }

        ScheduleTable {
            header,
            rows,
            warnings,
        }
    }
}

// ==========================================
// AbsenceReportRow - 缺勤报表行（只读）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceReportRow {
    pub teacher_info: String,
    pub duration: String,
    pub sub_info: String,
}

impl AbsenceReportRow {
    pub const TEACHER_COL: usize = 2;
    pub const DURATION_COL: usize = 5;
    pub const SUB_COL: usize = 8;

    /// 按固定偏移取值
    ///
    /// # 返回
    /// - Err(width): 行宽不足 9 列
    pub fn from_cells(cells: &[String]) -> Result<AbsenceReportRow, usize> {
        if cells.len() < REPORT_MIN_WIDTH {
            return Err(cells.len());
        }
        Ok(AbsenceReportRow {
            teacher_info: cells[Self::TEACHER_COL].clone(),
            duration: cells[Self::DURATION_COL].clone(),
            sub_info: cells[Self::SUB_COL].clone(),
        })
    }
}

// ==========================================
// CoverageRow - 覆盖行（恰好 13 列）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageRow {
    cells: [String; COVERAGE_WIDTH],
}

impl CoverageRow {
    /// 全空行
    pub fn blank() -> CoverageRow {
        CoverageRow::default()
    }

    /// 从存储读出的行构造: 不足 13 列补空，超出部分丢弃
    pub fn from_cells(cells: &[String]) -> CoverageRow {
        CoverageRow {
            cells: std::array::from_fn(|i| cells.get(i).cloned().unwrap_or_default()),
        }
    }

    pub fn teacher(&self) -> &str {
        &self.cells[0]
    }

    pub fn set_teacher(&mut self, teacher: impl Into<String>) {
        self.cells[0] = teacher.into();
    }

    /// 10 个课节单元格（HR..9）
    pub fn periods(&self) -> &[String] {
        &self.cells[FIRST_PERIOD_COL..SUB_COL]
    }

    pub fn periods_mut(&mut self) -> &mut [String] {
        &mut self.cells[FIRST_PERIOD_COL..SUB_COL]
    }

    pub fn sub(&self) -> &str {
        &self.cells[SUB_COL]
    }

    pub fn set_sub(&mut self, sub: impl Into<String>) {
        self.cells[SUB_COL] = sub.into();
    }

    pub fn duration(&self) -> &str {
        &self.cells[DURATION_COL]
    }

    pub fn set_duration(&mut self, duration: impl Into<String>) {
        self.cells[DURATION_COL] = duration.into();
    }

    pub fn cells(&self) -> &[String; COVERAGE_WIDTH] {
        &self.cells
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.cells.to_vec()
    }
}

// ==========================================
// CoverageTable - 覆盖表（表头 + 覆盖行）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageTable {
    pub header: Vec<String>,
    pub rows: Vec<CoverageRow>,
}

impl Default for CoverageTable {
    fn default() -> Self {
        CoverageTable::new()
    }
}

impl CoverageTable {
    /// 标准表头的空表
    pub fn new() -> CoverageTable {
        CoverageTable {
            header: COVERAGE_HEADER.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// 从存储读出的原始表格构造（第 0 行为表头）
    ///
    /// # 返回
    /// - None: 表格为空（连表头都没有）
    pub fn from_raw(raw: Vec<Vec<String>>) -> Option<CoverageTable> {
        let mut iter = raw.into_iter();
        let header = iter.next()?;
        let rows = iter.map(|cells| CoverageRow::from_cells(&cells)).collect();
        Some(CoverageTable { header, rows })
    }

    /// 转为整表覆写所需的二维数组（含表头）
    pub fn to_raw(&self) -> Vec<Vec<String>> {
        std::iter::once(self.header.clone())
            .chain(self.rows.iter().map(CoverageRow::to_vec))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ==========================================
// CellCoord - 单元格坐标（0 起，含表头行）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: usize,
    pub col: usize,
}

impl CellCoord {
    pub fn new(row: usize, col: usize) -> CellCoord {
        CellCoord { row, col }
    }
}
