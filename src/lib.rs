// ==========================================
// 餐饮成本核算引擎 - 核心库
// ==========================================
// 依据: Coste_Engine_Specs_v0.2.md - 系统宪法
// 系统定位: 时点成本滚算与分析引擎 (只读决策支持, 不落库)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 引擎参数
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ComponentKind, NodeKind};

// 领域实体
pub use domain::{
    Component, ComponentUsage, Elaboration, Ingredient, PriceObservation, ProductionRun,
    RawArticle, Recipe, RecipeLine,
};

// 引擎
pub use engine::{
    BomGraph, CostBreakdown, CostPass, CostResolver, Diagnostic, DiagnosticKind, EngineError,
    EngineResult, GraphValidationError, PriceTimeline, TrendSnapshot, VariationAnalyzer,
    VariationReport, VariationSummary, YieldAdjustment, YieldAdjustmentAdvisor,
};

// API
pub use api::{AnalysisApi, ApiError, ApiResult};

// 配置
pub use config::AdvisorConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "餐饮成本核算引擎";
