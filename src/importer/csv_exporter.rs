// ==========================================
// 代课覆盖表系统 - CSV 导出
// ==========================================
// 说明: 行可以不等长，按原样写出
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use csv::WriterBuilder;
use std::path::Path;

pub struct CsvExporter;

impl CsvExporter {
    /// 将二维表写入 CSV 文件，返回写出的行数
    pub fn write_rows<P: AsRef<Path>>(&self, file_path: P, rows: &[Vec<String>]) -> ImportResult<usize> {
        let path = file_path.as_ref();
        let mut writer = WriterBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| ImportError::FileWriteError(format!("{}: {}", path.display(), e)))?;

        for row in rows {
            writer.write_record(row)?;
        }
        writer
            .flush()
            .map_err(|e| ImportError::FileWriteError(e.to_string()))?;
        Ok(rows.len())
    }
}
