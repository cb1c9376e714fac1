// ==========================================
// 餐饮成本核算引擎 - 引擎层
// ==========================================
// 依据: Coste_Engine_Specs_v0.2.md - 4. 组件设计
// ==========================================
// 职责: 实现成本滚算与分析的业务规则
// 红线: 无状态纯计算, 引擎内不做 I/O;
//       所有降级行为必须输出诊断 (可解释性)
// ==========================================

pub mod bom_graph;
pub mod cost_resolver;
pub mod error;
pub mod price_timeline;
pub mod variation;
pub mod yield_advisor;

// 重导出核心引擎
pub use bom_graph::{BomGraph, GraphStats, GraphWarning};
pub use cost_resolver::{ComponentCostLine, CostBreakdown, CostPass, CostResolver};
pub use error::{Diagnostic, DiagnosticKind, EngineError, EngineResult, GraphValidationError};
pub use price_timeline::PriceTimeline;
pub use variation::{
    ComponentVariation, ComponentVariationReport, SortField, TrendSnapshot, VariationAnalyzer,
    VariationItem, VariationReport, VariationSummary,
};
pub use yield_advisor::{ProductionStats, YieldAdjustment, YieldAdjustmentAdvisor};
