// ==========================================
// 代课覆盖表系统 - 行投影
// ==========================================
// 职责: 课表行 × 时长策略 → 覆盖行的 10 个课节单元格
// ==========================================
// | 策略        | HR..5       | 6..9        |
// |-------------|-------------|-------------|
// | FullDay     | 复制课表    | 复制课表    |
// | HalfDayAm   | 复制课表    | NSN         |
// | HalfDayPm   | NSN         | 复制课表    |
// | Periods(S)  | 属于 S 复制，否则 NSN      |
// 课表行缺失时全部 NSN（不报错）
// ==========================================

use crate::domain::types::{PeriodLabel, NSN};
use crate::domain::{CoverageRow, DurationPolicy, ScheduleRow};

#[derive(Debug, Clone, Copy, Default)]
pub struct RowProjector;

impl RowProjector {
    pub fn new() -> Self {
        Self
    }

    /// 投影课节单元格
    ///
    /// # 返回
    /// 课节已填充的覆盖行; 教师/代课人/时长三列留空，由调用方填写
    pub fn project(&self, schedule_row: Option<&ScheduleRow>, policy: &DurationPolicy) -> CoverageRow {
        let mut row = CoverageRow::blank();

        let Some(schedule) = schedule_row else {
            row.periods_mut().fill_with(|| NSN.to_string());
            return row;
        };

        for (period, cell) in PeriodLabel::ALL.into_iter().zip(row.periods_mut()) {
            *cell = if Self::is_active(period, policy) {
                schedule.periods[period.slot()].clone()
            } else {
                NSN.to_string()
            };
        }
        row
    }

    /// 该课节在策略下是否需要代课
    pub fn is_active(period: PeriodLabel, policy: &DurationPolicy) -> bool {
        match policy {
            DurationPolicy::FullDay => true,
            DurationPolicy::HalfDayAm => period.is_morning(),
            DurationPolicy::HalfDayPm => !period.is_morning(),
            DurationPolicy::Periods(selected) => selected.contains(&period),
        }
    }
}
