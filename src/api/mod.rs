// ==========================================
// 餐饮成本核算引擎 - API 层
// ==========================================
// 职责: 提供报表页消费的业务接口 (依赖注入, 不做 I/O)
// ==========================================

pub mod analysis_api;
pub mod error;

// 重导出核心类型
pub use analysis_api::AnalysisApi;
pub use error::{ApiError, ApiResult};
