// ==========================================
// 餐饮成本核算引擎 - 分析会话 API
// ==========================================
// 职责: 持有一份不可变快照 (组成图 + 价格时间线 + 生产记录),
//       封装成本/变动/建议查询, 供报表页调用
// 架构: API 层 → Engine 层 (CostResolver / VariationAnalyzer / Advisor)
// ==========================================
// 红线: 快照装载一次, 会话期内只读 (load once, query many);
//       多个时点查询摊销装载与校验成本
// ==========================================

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::config::AdvisorConfig;
use crate::domain::article::{PriceObservation, RawArticle};
use crate::domain::elaboration::Elaboration;
use crate::domain::ingredient::Ingredient;
use crate::domain::production::ProductionRun;
use crate::domain::recipe::Recipe;
use crate::domain::types::NodeKind;
use crate::engine::bom_graph::{BomGraph, GraphStats, GraphWarning};
use crate::engine::cost_resolver::{CostBreakdown, CostResolver};
use crate::engine::error::Diagnostic;
use crate::engine::price_timeline::PriceTimeline;
use crate::engine::variation::{
    ComponentVariationReport, TrendSnapshot, VariationAnalyzer, VariationReport, VariationSummary,
};
use crate::engine::yield_advisor::{ProductionStats, YieldAdjustment, YieldAdjustmentAdvisor};
use crate::importer::snapshot::SnapshotBundle;

// ==========================================
// AnalysisApi - 分析会话 API
// ==========================================
pub struct AnalysisApi {
    session_id: Uuid,
    graph: BomGraph,
    timeline: PriceTimeline,
    production_runs: Vec<ProductionRun>,
    advisor: YieldAdjustmentAdvisor,
}

impl AnalysisApi {
    /// 装载分析会话快照
    ///
    /// # 参数
    /// - 领域记录全量 (由上游应用或导入层提供)
    /// - `advisor_config`: 建议引擎参数
    ///
    /// # 错误
    /// - `GraphValidation`: 结构错误 (重复/缺引用/环/重复观测), 会话级致命
    pub fn load(
        articles: Vec<RawArticle>,
        price_observations: Vec<PriceObservation>,
        ingredients: Vec<Ingredient>,
        elaborations: Vec<Elaboration>,
        recipes: Vec<Recipe>,
        production_runs: Vec<ProductionRun>,
        advisor_config: AdvisorConfig,
    ) -> ApiResult<Self> {
        let timeline = PriceTimeline::load(&articles, price_observations)?;
        let graph = BomGraph::load(articles, ingredients, elaborations, recipes)?;

        let session_id = Uuid::new_v4();
        let stats = graph.stats();
        info!(
            %session_id,
            elaborations = stats.elaboration_count,
            recipes = stats.recipe_count,
            warnings = stats.warning_count,
            "分析会话装载完成"
        );

        Ok(Self {
            session_id,
            graph,
            timeline,
            production_runs,
            advisor: YieldAdjustmentAdvisor::with_config(advisor_config),
        })
    }

    /// 从快照包装载 (默认建议参数)
    pub fn from_bundle(bundle: SnapshotBundle) -> ApiResult<Self> {
        Self::load(
            bundle.articles,
            bundle.price_observations,
            bundle.ingredients,
            bundle.elaborations,
            bundle.recipes,
            bundle.production_runs,
            AdvisorConfig::default(),
        )
    }

    /// 会话标识
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// 装载统计
    pub fn graph_stats(&self) -> GraphStats {
        self.graph.stats()
    }

    /// 装载期警告 (提示横幅数据源)
    pub fn graph_warnings(&self) -> &[GraphWarning] {
        self.graph.warnings()
    }

    // ==========================================
    // 成本查询接口
    // ==========================================

    /// 单节点 T 时点成本
    pub fn unit_cost(
        &self,
        kind: NodeKind,
        node_id: &str,
        as_of: DateTime<Utc>,
    ) -> ApiResult<(f64, Vec<Diagnostic>)> {
        if node_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("节点 ID 不能为空".to_string()));
        }
        let resolver = CostResolver::new(&self.graph, &self.timeline);
        Ok(resolver.unit_cost_of(kind, node_id, as_of)?)
    }

    /// 半成品 T 时点成本明细 (escandallo desglose)
    pub fn cost_breakdown(
        &self,
        elaboration_id: &str,
        as_of: DateTime<Utc>,
    ) -> ApiResult<CostBreakdown> {
        if elaboration_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("半成品 ID 不能为空".to_string()));
        }
        let resolver = CostResolver::new(&self.graph, &self.timeline);
        let mut pass = resolver.pass(as_of);
        Ok(pass.breakdown(elaboration_id)?)
    }

    // ==========================================
    // 变动分析接口
    // ==========================================

    /// 指定类型全部节点的窗口成本变动报表
    pub fn variation_report(
        &self,
        kind: NodeKind,
        date_from: DateTime<Utc>,
        date_to: DateTime<Utc>,
    ) -> ApiResult<VariationReport> {
        Self::validate_window(date_from, date_to)?;
        let analyzer = VariationAnalyzer::new(&self.graph, &self.timeline);
        Ok(analyzer.compute_variation(kind, date_from, date_to)?)
    }

    /// 报表 KPI 汇总
    pub fn variation_summary(&self, report: &VariationReport) -> VariationSummary {
        VariationAnalyzer::summarize(&report.items)
    }

    /// 窗口逐日趋势序列
    pub fn trend_snapshots(&self, report: &VariationReport) -> Vec<TrendSnapshot> {
        VariationAnalyzer::trend_snapshots(report)
    }

    /// 单个半成品的组成项级变动明细
    pub fn component_breakdown(
        &self,
        elaboration_id: &str,
        date_from: DateTime<Utc>,
        date_to: DateTime<Utc>,
    ) -> ApiResult<ComponentVariationReport> {
        if elaboration_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("半成品 ID 不能为空".to_string()));
        }
        Self::validate_window(date_from, date_to)?;
        let analyzer = VariationAnalyzer::new(&self.graph, &self.timeline);
        Ok(analyzer.component_breakdown(elaboration_id, date_from, date_to)?)
    }

    // ==========================================
    // 用量修订建议接口
    // ==========================================

    /// 半成品组成项用量修订建议
    ///
    /// 只读建议; 采纳建议是调用方对持久层的独立写操作
    pub fn yield_suggestions(&self, elaboration_id: &str) -> ApiResult<Vec<YieldAdjustment>> {
        if elaboration_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("半成品 ID 不能为空".to_string()));
        }
        Ok(self
            .advisor
            .suggest_adjustments(&self.graph, &self.production_runs, elaboration_id)?)
    }

    /// 半成品生产统计
    pub fn production_stats(&self, elaboration_id: &str) -> ApiResult<ProductionStats> {
        if elaboration_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("半成品 ID 不能为空".to_string()));
        }
        Ok(self.advisor.production_stats(&self.production_runs, elaboration_id))
    }

    // 窗口校验: 起点不得晚于终点 (允许单日窗口)
    fn validate_window(date_from: DateTime<Utc>, date_to: DateTime<Utc>) -> ApiResult<()> {
        if date_from > date_to {
            return Err(ApiError::InvalidInput(format!(
                "无效日期窗口: {} > {}",
                date_from, date_to
            )));
        }
        Ok(())
    }
}
