// ==========================================
// 代课覆盖表系统 - 核心库
// ==========================================
// 输入: 缺勤报表 + 总课表
// 输出: 当日代课覆盖表（清洗、排序、高亮）
// 技术栈: Rust + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 表格行与类型
pub mod domain;

// 表格存储层
pub mod repository;

// 引擎层 - 对账规则（纯函数）
pub mod engine;

// 导入导出层 - 外部文件
pub mod importer;

// 配置层
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    CellCoord, CoverageRow, CoverageTable, DurationPolicy, FillColor, PeriodLabel, RowWarning,
    ScheduleRow, ScheduleTable,
};

pub use engine::{
    CoverageCleaner, CoverageTableBuilder, HighlightSelector, NameNormalizer, RowProjector,
    ScheduleMatcher,
};

pub use api::{ApiError, CoverageApi};
pub use config::CoverageConfig;
pub use repository::{SheetStore, SqliteSheetStore};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "代课覆盖表系统";
