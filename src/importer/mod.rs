// ==========================================
// 代课覆盖表系统 - 文件导入导出
// ==========================================
// 职责: 外部文件（CSV / Excel）与工作表二维数据之间的转换
// ==========================================

pub mod csv_exporter;
pub mod error;
pub mod file_parser;

pub use csv_exporter::CsvExporter;
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, FileParser, UniversalFileParser};
