// ==========================================
// 代课覆盖表系统 - 引擎层
// ==========================================
// 职责: 对账核心逻辑（纯函数，无 I/O）
// 流程: 报表 + 课表 → 构建 → 清洗 → 高亮坐标
// 人工录入: 课表行 + 时长策略 → 投影 → 单行追加
// ==========================================

pub mod cleaner;
pub mod highlight;
pub mod name_normalizer;
pub mod row_projector;
pub mod schedule_matcher;
pub mod table_builder;

// 重导出引擎
pub use cleaner::CoverageCleaner;
pub use highlight::HighlightSelector;
pub use name_normalizer::NameNormalizer;
pub use row_projector::RowProjector;
pub use schedule_matcher::{ScheduleMatch, ScheduleMatcher};
pub use table_builder::{CoverageBuild, CoverageTableBuilder};
