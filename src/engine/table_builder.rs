// ==========================================
// 代课覆盖表系统 - 覆盖表构建
// ==========================================
// 流程: 过滤报表行 → 姓名标准化 → 模糊匹配 → 整日投影 → 追加
// 约束:
// - 输出行序 = 输入行序（构建阶段不排序）
// - 时长列照抄报表文本（报表自身的时长描述被信任）
// - 软错误（未匹配/行宽不足）只记录警告，不中断
// ==========================================

use crate::domain::types::{DurationPolicy, REPORT_MIN_WIDTH};
use crate::domain::{AbsenceReportRow, CoverageRow, CoverageTable, RowWarning, ScheduleTable};
use crate::engine::name_normalizer::NameNormalizer;
use crate::engine::row_projector::RowProjector;
use crate::engine::schedule_matcher::ScheduleMatcher;
use serde::Serialize;
use tracing::{debug, info, warn};

/// 构建结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageBuild {
    pub table: CoverageTable,
    /// 匹配成功的行数
    pub matched: usize,
    pub warnings: Vec<RowWarning>,
}

// ==========================================
// CoverageTableBuilder
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct CoverageTableBuilder {
    normalizer: NameNormalizer,
    matcher: ScheduleMatcher,
    projector: RowProjector,
}

impl CoverageTableBuilder {
    pub fn new(matcher: ScheduleMatcher) -> Self {
        Self {
            normalizer: NameNormalizer::new(),
            matcher,
            projector: RowProjector::new(),
        }
    }

    /// 构建覆盖表
    ///
    /// # 参数
    /// - report_rows: 缺勤报表原始行（无表头，全部为数据行）
    /// - schedule: 总课表（表头已分离）
    ///
    /// # 返回
    /// 覆盖表（零条有效行时只有表头）+ 行级警告
    pub fn build(&self, report_rows: &[Vec<String>], schedule: &ScheduleTable) -> CoverageBuild {
        let mut table = CoverageTable::new();
        let mut warnings = Vec::new();
        let mut matched = 0;

        for (row_index, cells) in report_rows.iter().enumerate() {
            // 教师信息列为空: 分隔行/非缺勤行，静默丢弃
            let has_teacher = cells
                .get(AbsenceReportRow::TEACHER_COL)
                .is_some_and(|c| !c.trim().is_empty());
            if !has_teacher {
                continue;
            }

            let report = match AbsenceReportRow::from_cells(cells) {
                Ok(report) => report,
                Err(width) => {
                    warn!(row_index, width, "报表行列数不足，跳过");
                    warnings.push(RowWarning::MalformedRow {
                        row_index,
                        width,
                        expected: REPORT_MIN_WIDTH,
                    });
                    continue;
                }
            };

            let teacher = self.normalizer.normalize_teacher(&report.teacher_info);
            let sub = self.normalizer.normalize_sub(&report.sub_info);

            let mut row = match self.matcher.find_fuzzy(&teacher, &schedule.rows) {
                Some(schedule_row) => {
                    matched += 1;
                    self.projector.project(Some(schedule_row), &DurationPolicy::FullDay)
                }
                None => {
                    // 保留姓名，课节留空，供人工核对
                    warn!(row_index, teacher = %teacher, "总课表中未找到教师");
                    warnings.push(RowWarning::TeacherNotFound {
                        row_index,
                        teacher: teacher.clone(),
                    });
                    CoverageRow::blank()
                }
            };

            row.set_teacher(teacher);
            row.set_sub(sub);
            row.set_duration(report.duration.trim());
            debug!(row_index, teacher = %row.teacher(), "覆盖行已生成");
            table.rows.push(row);
        }

        info!(
            rows = table.len(),
            matched,
            warnings = warnings.len(),
            "覆盖表构建完成"
        );

        CoverageBuild {
            table,
            matched,
            warnings,
        }
    }
}
