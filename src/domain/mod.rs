// ==========================================
// 代课覆盖表系统 - 领域层
// ==========================================
// 职责: 表格实体与领域类型，不含 I/O
// ==========================================

pub mod coverage;
pub mod types;

// 重导出核心实体
pub use coverage::{
    AbsenceReportRow, CellCoord, CoverageRow, CoverageTable, RowWarning, ScheduleRow,
    ScheduleTable,
};
pub use types::{DurationPolicy, FillColor, PeriodLabel, UnknownDurationError};
