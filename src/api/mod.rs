// ==========================================
// 代课覆盖表系统 - API 层
// ==========================================
// 职责: 对外业务接口，编排存储与引擎
// ==========================================

pub mod coverage_api;
pub mod error;

pub use coverage_api::{
    CleanCoverageResponse, CoverageApi, ManualAbsenceResponse, SheetTransferResponse,
    UpdateReportResponse,
};
pub use error::{ApiError, ApiResult};
