// ==========================================
// 代课覆盖表系统 - 覆盖表清洗
// ==========================================
// 职责:
// 1) 教师姓名标准化 / 代课人姓名去电话
// 2) 课节单元格泛化为 "sub"（保护标签与 "w/ 某人" 委托写法除外）
// 3) 稳定分区排序: 有内容的行保持原序在前; 无内容的行按教师名升序在后
// 约束: 纯函数，不修改输入; 表头与 13 列宽度不变
// ==========================================

use crate::domain::types::{is_protected_label, SUB_MARKER};
use crate::domain::{CoverageRow, CoverageTable};
use crate::engine::name_normalizer::NameNormalizer;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// 委托写法: "w/ Smith"、"w/Smith"
static DELEGATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^w/\s*\w+").expect("delegation pattern"));

#[derive(Debug, Clone, Copy, Default)]
pub struct CoverageCleaner {
    normalizer: NameNormalizer,
}

impl CoverageCleaner {
    pub fn new() -> Self {
        Self::default()
    }

    /// 课节单元格是否应替换为 "sub"
    ///
    /// 不替换:
    /// - 空单元格（该节无课，保持为空）
    /// - 保护标签: Prep / Plan/Duty / Duty/Plan / Lunch / NSN
    /// - 委托写法: 以 "w/" 开头后接单词
    ///
    /// 说明: "sub" 本身会被"替换"为 "sub"，结果不变，因此清洗幂等
    pub fn should_generalize(cell: &str) -> bool {
        !(cell.is_empty() || is_protected_label(cell) || DELEGATION_RE.is_match(cell))
    }

    /// 行是否有排课内容（10 个课节 + 代课人 + 时长任一非空）
    pub fn has_schedule(row: &CoverageRow) -> bool {
        row.cells()[1..].iter().any(|c| !c.is_empty())
    }

    /// 清洗单行
    pub fn clean_row(&self, row: &CoverageRow) -> CoverageRow {
        let mut cleaned = row.clone();
        cleaned.set_teacher(self.normalizer.normalize_teacher(row.teacher()));
        cleaned.set_sub(self.normalizer.normalize_sub(row.sub()));
        for cell in cleaned.periods_mut() {
            if Self::should_generalize(cell) {
                *cell = SUB_MARKER.to_string();
            }
        }
        cleaned
    }

    /// 清洗整表并排序，返回新表
    pub fn clean(&self, table: &CoverageTable) -> CoverageTable {
        let (with_schedule, mut without_schedule): (Vec<CoverageRow>, Vec<CoverageRow>) = table
            .rows
            .iter()
            .map(|row| self.clean_row(row))
            .partition(Self::has_schedule);

        // sort_by 为稳定排序，同名行保持原序
        without_schedule.sort_by(|a, b| a.teacher().cmp(b.teacher()));

        debug!(
            with_schedule = with_schedule.len(),
            without_schedule = without_schedule.len(),
            "覆盖表分区完成"
        );

        CoverageTable {
            header: table.header.clone(),
            rows: with_schedule.into_iter().chain(without_schedule).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> CoverageRow {
        let cells: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        CoverageRow::from_cells(&cells)
    }

    fn table(rows: Vec<CoverageRow>) -> CoverageTable {
        CoverageTable {
            rows,
            ..CoverageTable::new()
        }
    }

    #[test]
    fn test_should_generalize() {
        for keep in ["Prep", "Plan/Duty", "Duty/Plan", "Lunch", "NSN", "w/ Smith", "w/Smith", ""] {
            assert!(!CoverageCleaner::should_generalize(keep), "{:?}", keep);
        }
        for replace in ["Algebra 1", "lunch", "sub", "Room 204 w/ Smith", "w/ "] {
            assert!(CoverageCleaner::should_generalize(replace), "{:?}", replace);
        }
    }

    #[test]
    fn test_clean_row_generalizes_periods_and_names() {
        let cleaner = CoverageCleaner::new();
        let cleaned = cleaner.clean_row(&row(&[
            "Smith, John\nRoom 204", "HR 12", "Algebra", "Prep", "w/ Lee", "Lunch", "", "NSN",
            "Bio", "Bio", "Bio", "Jane Sub (555) 123-4567", "Full Day",
        ]));
        assert_eq!(
            cleaned.to_vec(),
            [
                "Smith, John", "sub", "sub", "Prep", "w/ Lee", "Lunch", "", "NSN", "sub", "sub",
                "sub", "Jane Sub", "Full Day",
            ]
        );
    }

    #[test]
    fn test_clean_partitions_and_sorts() {
        let a = row(&["Adams, Al", "P1"]);
        let b = row(&["Zed"]);
        let c = row(&["Amy"]);

        let cleaned = CoverageCleaner::new().clean(&table(vec![a, b, c]));
        let names: Vec<_> = cleaned.rows.iter().map(|r| r.teacher()).collect();
        assert_eq!(names, ["Adams, Al", "Amy", "Zed"]);
    }

    #[test]
    fn test_clean_keeps_scheduled_rows_in_original_order() {
        let rows = vec![
            row(&["Young, Y", "", "", "", "", "", "", "", "", "", "", "", "Full Day"]),
            row(&["Baker, B"]),
            row(&["Adams, A", "P1"]),
            row(&["Abel, A"]),
        ];
        let cleaned = CoverageCleaner::new().clean(&table(rows));
        let names: Vec<_> = cleaned.rows.iter().map(|r| r.teacher()).collect();
        assert_eq!(names, ["Young, Y", "Adams, A", "Abel, A", "Baker, B"]);
    }

    #[test]
    fn test_clean_does_not_mutate_input_and_keeps_header() {
        let original = table(vec![row(&["Smith, John (Rm 5)", "Algebra"])]);
        let snapshot = original.clone();
        let cleaned = CoverageCleaner::new().clean(&original);
        assert_eq!(original, snapshot);
        assert_eq!(cleaned.header, original.header);
        assert_eq!(cleaned.rows[0].periods()[0], "sub");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let t = table(vec![
            row(&["Smith, John\nx", "HR", "Prep", "w/ Lee", "", "Lunch", "NSN", "Bio", "", "", "", "S (555) 123-4567", "Full Day"]),
            row(&["Zed"]),
            row(&["Amy", "", "", "", "", "", "", "", "", "", "", "Sub"]),
        ]);
        let cleaner = CoverageCleaner::new();
        let once = cleaner.clean(&t);
        assert_eq!(cleaner.clean(&once), once);
    }
}
