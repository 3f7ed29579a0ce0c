// ==========================================
// 代课覆盖表系统 - 覆盖表 API
// ==========================================
// 职责: 编排 存储读取 → 引擎计算 → 存储写回
// 入口:
// - update_from_report: 由缺勤报表生成当日覆盖表
// - clean_daily_coverage: 清洗、排序、着色
// - add_manual_absence: 人工录入单条缺勤
// 辅助: teacher_names / import_sheet / export_sheet
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, CoverageConfig};
use crate::domain::types::COVERAGE_HEADER;
use crate::domain::{CoverageRow, CoverageTable, DurationPolicy, PeriodLabel, RowWarning, ScheduleTable};
use crate::engine::{
    CoverageCleaner, CoverageTableBuilder, HighlightSelector, RowProjector, ScheduleMatcher,
};
use crate::importer::{CsvExporter, UniversalFileParser};
use crate::repository::{SheetStore, SqliteSheetStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};
use uuid::Uuid;

// ==========================================
// 响应类型
// ==========================================

/// 报表更新响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateReportResponse {
    pub run_id: String,
    /// 写入覆盖表的数据行数（不含表头）
    pub rows_written: usize,
    /// 匹配到课表的行数
    pub matched: usize,
    /// 报表行警告（row_index 为报表行号）
    pub report_warnings: Vec<RowWarning>,
    /// 课表行警告（row_index 为课表行号）
    pub schedule_warnings: Vec<RowWarning>,
    pub generated_at: DateTime<Utc>,
    pub elapsed_ms: i64,
}

/// 清洗响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanCoverageResponse {
    pub run_id: String,
    /// 覆盖表为空时为 false，且未写入任何内容
    pub cleaned: bool,
    pub rows: usize,
    pub highlighted_cells: usize,
    pub elapsed_ms: i64,
}

/// 人工录入响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualAbsenceResponse {
    /// 追加行在覆盖表中的行号（表头为第 0 行）
    pub row_index: usize,
    pub row: Vec<String>,
    pub matched: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<RowWarning>,
}

/// 导入导出响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetTransferResponse {
    pub sheet: String,
    pub file: String,
    pub rows: usize,
}

// ==========================================
// CoverageApi
// ==========================================

/// 覆盖表 API（持有显式的存储会话）
pub struct CoverageApi {
    store: Arc<dyn SheetStore>,
    config: CoverageConfig,
    builder: CoverageTableBuilder,
    matcher: ScheduleMatcher,
    cleaner: CoverageCleaner,
    highlighter: HighlightSelector,
    projector: RowProjector,
}

impl CoverageApi {
    pub fn new(store: Arc<dyn SheetStore>, config: CoverageConfig) -> Self {
        Self {
            builder: CoverageTableBuilder::new(config.matcher()),
            matcher: config.matcher(),
            store,
            config,
            cleaner: CoverageCleaner::new(),
            highlighter: HighlightSelector::new(),
            projector: RowProjector::new(),
        }
    }

    /// 打开 SQLite 存储并按 环境变量 > config_kv > 默认值 加载配置
    pub fn open(db_path: &str) -> ApiResult<Self> {
        let store = SqliteSheetStore::new(db_path)?;
        let manager = ConfigManager::from_connection(store.connection())?;
        let config = CoverageConfig::load(Some(&manager))?;
        Ok(Self::new(Arc::new(store), config))
    }

    pub fn config(&self) -> &CoverageConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn SheetStore {
        self.store.as_ref()
    }

    fn load_schedule(&self) -> ApiResult<ScheduleTable> {
        let raw = self.store.read_all(&self.config.master_schedule_sheet)?;
        let schedule = ScheduleTable::from_raw(raw);
        for warning in &schedule.warnings {
            warn!(%warning, "课表行跳过");
        }
        Ok(schedule)
    }

    /// 由缺勤报表生成当日覆盖表（整表覆盖）
    ///
    /// 说明: 旧的单元格着色与新内容不再对应，与写入同一事务清除
    #[instrument(skip(self), fields(
        report = %self.config.daily_report_sheet,
        coverage = %self.config.daily_coverage_sheet
    ))]
    pub fn update_from_report(&self) -> ApiResult<UpdateReportResponse> {
        let started = Instant::now();
        let run_id = Uuid::new_v4().to_string();

        let report_rows = self.store.read_all(&self.config.daily_report_sheet)?;
        let schedule = self.load_schedule()?;

        let build = self.builder.build(&report_rows, &schedule);

        self.store.replace_with_fills(
            &self.config.daily_coverage_sheet,
            &build.table.to_raw(),
            &BTreeSet::new(),
            self.config.highlight_fill,
        )?;

        let elapsed_ms = started.elapsed().as_millis() as i64;
        info!(
            run_id = %run_id,
            rows = build.table.len(),
            matched = build.matched,
            warnings = build.warnings.len(),
            elapsed_ms,
            "覆盖表已更新"
        );

        Ok(UpdateReportResponse {
            run_id,
            rows_written: build.table.len(),
            matched: build.matched,
            report_warnings: build.warnings,
            schedule_warnings: schedule.warnings,
            generated_at: Utc::now(),
            elapsed_ms,
        })
    }

    /// 清洗覆盖表: 泛化课节、去除电话、分区排序，然后重新着色
    #[instrument(skip(self), fields(coverage = %self.config.daily_coverage_sheet))]
    pub fn clean_daily_coverage(&self) -> ApiResult<CleanCoverageResponse> {
        let started = Instant::now();
        let run_id = Uuid::new_v4().to_string();
        let sheet = &self.config.daily_coverage_sheet;

        let table = match CoverageTable::from_raw(self.store.read_all(sheet)?) {
            Some(table) => table,
            None => {
                info!(run_id = %run_id, "覆盖表为空，跳过清洗");
                return Ok(CleanCoverageResponse {
                    run_id,
                    cleaned: false,
                    rows: 0,
                    highlighted_cells: 0,
                    elapsed_ms: started.elapsed().as_millis() as i64,
                });
            }
        };

        let cleaned = self.cleaner.clean(&table);
        let highlights = self.highlighter.select(&cleaned);

        let highlighted_cells = self.store.replace_with_fills(
            sheet,
            &cleaned.to_raw(),
            &highlights,
            self.config.highlight_fill,
        )?;

        let elapsed_ms = started.elapsed().as_millis() as i64;
        info!(
            run_id = %run_id,
            rows = cleaned.len(),
            highlighted_cells,
            elapsed_ms,
            "覆盖表清洗完成"
        );

        Ok(CleanCoverageResponse {
            run_id,
            cleaned: true,
            rows: cleaned.len(),
            highlighted_cells,
            elapsed_ms,
        })
    }

    /// 人工录入单条缺勤并追加到覆盖表末尾
    ///
    /// # 参数
    /// - teacher: 教师姓名（与总课表精确匹配）
    /// - duration_label: "Full Day" / "Half Day AM" / "Half Day PM" / "Period"
    /// - periods: 仅 "Period" 时使用，取值 HR,1..9
    /// - sub: 代课人（可为空）
    #[instrument(skip(self, periods), fields(periods = ?periods))]
    pub fn add_manual_absence(
        &self,
        teacher: &str,
        duration_label: &str,
        periods: &[String],
        sub: &str,
    ) -> ApiResult<ManualAbsenceResponse> {
        let teacher = teacher.trim();
        if teacher.is_empty() {
            return Err(ApiError::InvalidInput("教师姓名不能为空".to_string()));
        }
        if let Some(bad) = periods.iter().find(|p| PeriodLabel::parse(p).is_none()) {
            return Err(ApiError::InvalidInput(format!("未知的课节: {}", bad)));
        }
        let policy = DurationPolicy::from_form(duration_label, periods)?;

        let schedule = self.load_schedule()?;
        let schedule_row = self.matcher.find_exact(teacher, &schedule.rows);

        let mut row: CoverageRow = self.projector.project(schedule_row, &policy);
        row.set_teacher(teacher);
        row.set_sub(sub.trim());
        row.set_duration(policy.label());

        let sheet = &self.config.daily_coverage_sheet;
        if self.store.read_all(sheet)?.is_empty() {
            let header: Vec<String> = COVERAGE_HEADER.iter().map(|h| h.to_string()).collect();
            self.store.append_row(sheet, &header)?;
        }
        let row_index = self.store.append_row(sheet, &row.to_vec())?;

        let mut warnings = Vec::new();
        if schedule_row.is_none() {
            warn!(teacher, row_index, "总课表中未找到教师，已追加占位行");
            warnings.push(RowWarning::TeacherNotFound {
                row_index,
                teacher: teacher.to_string(),
            });
        } else {
            info!(teacher, row_index, duration = %policy, "已追加人工缺勤");
        }

        Ok(ManualAbsenceResponse {
            row_index,
            row: row.to_vec(),
            matched: schedule_row.is_some(),
            warnings,
        })
    }

    /// 教师名单（第 0 列，表头为 teacher/name 时跳过，空值忽略）
    pub fn teacher_names(&self) -> ApiResult<Vec<String>> {
        let column = self.store.column_values(&self.config.teacher_list_sheet, 0)?;
        let skip_header = column.first().is_some_and(|first| {
            let first = first.trim();
            first.eq_ignore_ascii_case("teacher") || first.eq_ignore_ascii_case("name")
        });

        Ok(column
            .into_iter()
            .skip(usize::from(skip_header))
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect())
    }

    /// 将 CSV / Excel 文件按位置导入为工作表（整表覆盖）
    #[instrument(skip(self, file_path), fields(file = %file_path.as_ref().display()))]
    pub fn import_sheet<P: AsRef<Path>>(&self, sheet: &str, file_path: P) -> ApiResult<SheetTransferResponse> {
        let path = file_path.as_ref();
        let rows = UniversalFileParser.parse(path)?;
        self.store.overwrite(sheet, &rows)?;
        info!(sheet, rows = rows.len(), "工作表导入完成");

        Ok(SheetTransferResponse {
            sheet: sheet.to_string(),
            file: path.display().to_string(),
            rows: rows.len(),
        })
    }

    /// 将工作表导出为 CSV
    #[instrument(skip(self, file_path), fields(file = %file_path.as_ref().display()))]
    pub fn export_sheet<P: AsRef<Path>>(&self, sheet: &str, file_path: P) -> ApiResult<SheetTransferResponse> {
        let path = file_path.as_ref();
        let rows = self.store.read_all(sheet)?;
        let written = CsvExporter.write_rows(path, &rows)?;

        Ok(SheetTransferResponse {
            sheet: sheet.to_string(),
            file: path.display().to_string(),
            rows: written,
        })
    }
}
