// ==========================================
// 代课覆盖表系统 - 表格存储层
// ==========================================
// 红线: 存储层不含对账逻辑
// 职责: 提供命名工作表的读写与着色，屏蔽数据库细节
// 约束: 所有查询使用参数化
// ==========================================

pub mod error;
pub mod sheet_store;
pub mod sqlite_sheet_store;

pub use error::{RepositoryError, RepositoryResult};
pub use sheet_store::SheetStore;
pub use sqlite_sheet_store::SqliteSheetStore;
