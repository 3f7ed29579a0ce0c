// ==========================================
// 代课覆盖表系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 输出: 按位置的二维字符串表（第 0 行为表头，原样保留）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

/// 文件解析 Trait
pub trait FileParser {
    /// 解析为按行、按列的原始单元格（不去除首尾空白，不跳过空行）
    fn parse_rows(&self, file_path: &Path) -> ImportResult<Vec<Vec<String>>>;
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_rows(&self, file_path: &Path) -> ImportResult<Vec<Vec<String>>> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if !ext.is_empty() && ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false) // 表头按普通行读取
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(rows)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser {
    /// 指定工作表名; None 表示第一个工作表
    pub sheet_name: Option<String>,
}

impl ExcelParser {
    pub fn new() -> Self {
        Self { sheet_name: None }
    }

    pub fn with_sheet(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: Some(sheet_name.into()),
        }
    }
}

impl Default for ExcelParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FileParser for ExcelParser {
    fn parse_rows(&self, file_path: &Path) -> ImportResult<Vec<Vec<String>>> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        let sheet_name = match &self.sheet_name {
            Some(name) => name.clone(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?,
        };

        let range = workbook.worksheet_range(&sheet_name)?;

        Ok(range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect())
    }
}

/// Excel 数值统一存为浮点: 整数值去掉小数部分（101.0 → "101"）
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<Vec<String>>> {
        let path = file_path.as_ref();
        match extension_of(path).as_str() {
            "csv" => CsvParser.parse_rows(path),
            "xlsx" | "xls" => ExcelParser::new().parse_rows(path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}
