// ==========================================
// 餐饮成本核算引擎 - 用量修订建议引擎
// ==========================================
// 依据: Coste_Engine_Specs_v0.2.md - 4.5 Yield Adjustment Advisor
// ==========================================
// 职责: 基于历史生产记录 (计划用量 vs 实际用量)
//       为半成品组成项建议修订后的净用量
// 输入: 只读组成图 + 生产记录 + 目标半成品
// 输出: 建议清单 (按 |变化百分比| 降序)
// ==========================================
// 红线: 只读建议, 不修改组成图;
//       采纳建议是调用方对持久层的显式独立写操作
// 口径: usage_factor = 实际用量 / 计划用量 (仅计划 > 0 的记录);
//       简单算术平均, 不加权;
//       |percent_change| 严格大于阈值 (默认 0.5%) 才输出
// ==========================================

use crate::config::AdvisorConfig;
use crate::domain::production::ProductionRun;
use crate::domain::types::NodeKind;
use crate::engine::bom_graph::BomGraph;
use crate::engine::error::{EngineError, EngineResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

// ==========================================
// 输出结构
// ==========================================

/// 单组成项用量修订建议
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldAdjustment {
    pub component_id: String,
    pub component_name: String,
    pub current_quantity: f64,       // 当前净用量 (escandallo actual)
    pub average_usage_factor: f64,   // 采样平均用量比
    pub suggested_quantity: f64,     // current * factor
    pub change_absolute: f64,
    pub percent_change: f64,
    pub runs_analyzed: usize,        // 该组成项实际参与平均的记录数
}

/// 半成品生产统计 (建议弹窗的上下文数据)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionStats {
    pub run_count: usize,
    pub mean_production_ratio: f64,        // 实际产出 / 计划批量 的均值 (4 位小数)
    pub mean_waste_fraction: f64,          // 记录损耗率均值 (3 位小数)
    pub last_produced_at: Option<DateTime<Utc>>,
}

// ==========================================
// YieldAdjustmentAdvisor - 用量修订建议引擎
// ==========================================
// 无状态引擎, 参数通过配置注入
pub struct YieldAdjustmentAdvisor {
    config: AdvisorConfig,
}

impl YieldAdjustmentAdvisor {
    /// 创建默认参数的建议引擎 (N=5, 阈值 0.5%)
    pub fn new() -> Self {
        Self {
            config: AdvisorConfig::default(),
        }
    }

    /// 创建指定参数的建议引擎
    pub fn with_config(config: AdvisorConfig) -> Self {
        Self { config }
    }

    /// 为半成品的组成项计算用量修订建议
    ///
    /// # 参数
    /// - `graph`: 只读组成图 (提供当前净用量)
    /// - `runs`: 全量生产记录 (内部筛选 + 按时间降序取最近 N 条)
    /// - `elaboration_id`: 目标半成品
    ///
    /// # 返回
    /// 超过抑制阈值的建议, 按 |percent_change| 降序;
    /// 无可分析记录时返回空清单
    #[instrument(skip(self, graph, runs))]
    pub fn suggest_adjustments(
        &self,
        graph: &BomGraph,
        runs: &[ProductionRun],
        elaboration_id: &str,
    ) -> EngineResult<Vec<YieldAdjustment>> {
        let elaboration = graph.elaboration(elaboration_id).ok_or_else(|| {
            EngineError::NodeNotFound {
                kind: NodeKind::Elaboration,
                id: elaboration_id.to_string(),
            }
        })?;

        // 最近 N 条该半成品的生产记录
        let mut sampled: Vec<&ProductionRun> = runs
            .iter()
            .filter(|r| r.elaboration_id == elaboration_id)
            .collect();
        sampled.sort_by(|a, b| b.produced_at.cmp(&a.produced_at));
        sampled.truncate(self.config.last_n_runs);

        if sampled.is_empty() {
            debug!(elaboration_id = %elaboration_id, "无生产记录可分析");
            return Ok(Vec::new());
        }

        // 逐记录累计用量比 (仅计划用量 > 0)
        let mut factors: HashMap<&str, Vec<f64>> = HashMap::new();
        let mut names: HashMap<&str, &str> = HashMap::new();
        for run in &sampled {
            for usage in &run.component_usages {
                if usage.planned_quantity > 0.0 {
                    factors
                        .entry(usage.component_id.as_str())
                        .or_default()
                        .push(usage.used_quantity / usage.planned_quantity);
                    names.insert(usage.component_id.as_str(), usage.component_name.as_str());
                }
            }
        }

        // 按组成清单顺序遍历, 保证输出确定性
        let mut adjustments = Vec::new();
        for component in &elaboration.components {
            let Some(series) = factors.get(component.component_id.as_str()) else {
                continue;
            };
            if series.is_empty() || component.quantity <= 0.0 {
                continue;
            }

            let average = series.iter().sum::<f64>() / series.len() as f64;
            let suggested = component.quantity * average;
            let percent_change = (suggested - component.quantity) / component.quantity * 100.0;

            // 抑制噪声: 严格大于阈值才建议
            if percent_change.abs() > self.config.min_change_percent {
                adjustments.push(YieldAdjustment {
                    component_id: component.component_id.clone(),
                    component_name: names
                        .get(component.component_id.as_str())
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| component.component_id.clone()),
                    current_quantity: component.quantity,
                    average_usage_factor: average,
                    suggested_quantity: suggested,
                    change_absolute: suggested - component.quantity,
                    percent_change,
                    runs_analyzed: series.len(),
                });
            }
        }

        adjustments.sort_by(|a, b| b.percent_change.abs().total_cmp(&a.percent_change.abs()));

        info!(
            elaboration_id = %elaboration_id,
            sampled_runs = sampled.len(),
            suggestions = adjustments.len(),
            "用量修订建议计算完成"
        );

        Ok(adjustments)
    }

    /// 半成品生产统计 (全量记录, 不截断 N)
    pub fn production_stats(&self, runs: &[ProductionRun], elaboration_id: &str) -> ProductionStats {
        let own: Vec<&ProductionRun> = runs
            .iter()
            .filter(|r| r.elaboration_id == elaboration_id)
            .collect();

        if own.is_empty() {
            return ProductionStats {
                run_count: 0,
                mean_production_ratio: 0.0,
                mean_waste_fraction: 0.0,
                last_produced_at: None,
            };
        }

        let ratios: Vec<f64> = own
            .iter()
            .filter_map(|r| r.production_ratio())
            .filter(|r| *r > 0.0)
            .collect();
        let mean_ratio = if ratios.is_empty() {
            0.0
        } else {
            ratios.iter().sum::<f64>() / ratios.len() as f64
        };

        let wastes: Vec<f64> = own
            .iter()
            .flat_map(|r| r.component_usages.iter().map(|u| u.waste_fraction))
            .collect();
        let mean_waste = if wastes.is_empty() {
            0.0
        } else {
            wastes.iter().sum::<f64>() / wastes.len() as f64
        };

        ProductionStats {
            run_count: own.len(),
            mean_production_ratio: (mean_ratio * 10_000.0).round() / 10_000.0,
            mean_waste_fraction: (mean_waste * 1_000.0).round() / 1_000.0,
            last_produced_at: own.iter().map(|r| r.produced_at).max(),
        }
    }
}

impl Default for YieldAdjustmentAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::elaboration::{Component, Elaboration};
    use crate::domain::production::ComponentUsage;
    use crate::domain::types::ComponentKind;
    use chrono::TimeZone;

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn graph_with_elaboration(components: Vec<(&str, f64)>) -> BomGraph {
        use crate::domain::ingredient::Ingredient;
        let ingredients: Vec<Ingredient> = components
            .iter()
            .map(|(id, _)| Ingredient {
                ingredient_id: id.to_string(),
                name: format!("Ingrediente {}", id),
                article_link_id: None,
            })
            .collect();
        BomGraph::load(
            vec![],
            ingredients,
            vec![Elaboration {
                elaboration_id: "E1".to_string(),
                name: "Elaboración E1".to_string(),
                yield_quantity: 1.0,
                production_unit: None,
                components: components
                    .into_iter()
                    .map(|(id, quantity)| Component {
                        kind: ComponentKind::Ingredient,
                        component_id: id.to_string(),
                        quantity,
                        waste_fraction: 0.0,
                    })
                    .collect(),
            }],
            vec![],
        )
        .unwrap()
    }

    fn run(
        elaboration_id: &str,
        at: DateTime<Utc>,
        usages: Vec<(&str, f64, f64)>,
    ) -> ProductionRun {
        ProductionRun {
            elaboration_id: elaboration_id.to_string(),
            produced_at: at,
            planned_batch_quantity: 10.0,
            produced_quantity: Some(9.5),
            component_usages: usages
                .into_iter()
                .map(|(id, planned, used)| ComponentUsage {
                    component_id: id.to_string(),
                    component_name: format!("Ingrediente {}", id),
                    planned_quantity: planned,
                    used_quantity: used,
                    waste_fraction: 0.05,
                })
                .collect(),
        }
    }

    // ==========================================
    // 测试 1: 阈值抑制与排序
    // ==========================================

    #[test]
    fn test_suppresses_below_threshold_and_sorts_by_abs_change() {
        // I_A: +1.2% (输出, 排第一), I_B: +0.6% (输出, 排第二), I_C: +0.3% (抑制)
        let graph = graph_with_elaboration(vec![("I_A", 10.0), ("I_B", 10.0), ("I_C", 10.0)]);
        let runs = vec![run(
            "E1",
            ts(2025, 5, 1),
            vec![
                ("I_A", 10.0, 10.12),
                ("I_B", 10.0, 10.06),
                ("I_C", 10.0, 10.03),
            ],
        )];

        let advisor = YieldAdjustmentAdvisor::new();
        let adjustments = advisor.suggest_adjustments(&graph, &runs, "E1").unwrap();

        assert_eq!(adjustments.len(), 2);
        assert_eq!(adjustments[0].component_id, "I_A");
        assert!((adjustments[0].percent_change - 1.2).abs() < 1e-9);
        assert_eq!(adjustments[1].component_id, "I_B");
        assert!((adjustments[1].percent_change - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_negative_change_sorted_by_magnitude() {
        // -2% 的降量建议要排在 +1% 之前
        let graph = graph_with_elaboration(vec![("I_A", 10.0), ("I_B", 10.0)]);
        let runs = vec![run(
            "E1",
            ts(2025, 5, 1),
            vec![("I_A", 10.0, 10.1), ("I_B", 10.0, 9.8)],
        )];

        let advisor = YieldAdjustmentAdvisor::new();
        let adjustments = advisor.suggest_adjustments(&graph, &runs, "E1").unwrap();

        assert_eq!(adjustments[0].component_id, "I_B");
        assert!(adjustments[0].percent_change < 0.0);
    }

    // ==========================================
    // 测试 2: 采样与平均口径
    // ==========================================

    #[test]
    fn test_unweighted_mean_across_runs() {
        // 两次记录用量比 1.10 和 0.90 → 平均 1.0 → 无建议
        let graph = graph_with_elaboration(vec![("I_A", 10.0)]);
        let runs = vec![
            run("E1", ts(2025, 5, 1), vec![("I_A", 10.0, 11.0)]),
            run("E1", ts(2025, 5, 2), vec![("I_A", 10.0, 9.0)]),
        ];

        let advisor = YieldAdjustmentAdvisor::new();
        let adjustments = advisor.suggest_adjustments(&graph, &runs, "E1").unwrap();
        assert!(adjustments.is_empty());
    }

    #[test]
    fn test_only_last_n_runs_sampled() {
        // N=1: 只采样最近一条 (5/10 的 1.20), 更早的 1.00 不参与
        let graph = graph_with_elaboration(vec![("I_A", 10.0)]);
        let runs = vec![
            run("E1", ts(2025, 5, 1), vec![("I_A", 10.0, 10.0)]),
            run("E1", ts(2025, 5, 10), vec![("I_A", 10.0, 12.0)]),
        ];

        let advisor = YieldAdjustmentAdvisor::with_config(AdvisorConfig {
            last_n_runs: 1,
            min_change_percent: 0.5,
        });
        let adjustments = advisor.suggest_adjustments(&graph, &runs, "E1").unwrap();

        assert_eq!(adjustments.len(), 1);
        assert!((adjustments[0].average_usage_factor - 1.2).abs() < 1e-9);
        assert_eq!(adjustments[0].runs_analyzed, 1);
        assert!((adjustments[0].suggested_quantity - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_planned_quantity_ignored() {
        let graph = graph_with_elaboration(vec![("I_A", 10.0)]);
        let runs = vec![run("E1", ts(2025, 5, 1), vec![("I_A", 0.0, 5.0)])];

        let advisor = YieldAdjustmentAdvisor::new();
        let adjustments = advisor.suggest_adjustments(&graph, &runs, "E1").unwrap();
        assert!(adjustments.is_empty());
    }

    #[test]
    fn test_other_elaboration_runs_excluded() {
        let graph = graph_with_elaboration(vec![("I_A", 10.0)]);
        let runs = vec![run("E_OTRA", ts(2025, 5, 1), vec![("I_A", 10.0, 15.0)])];

        let advisor = YieldAdjustmentAdvisor::new();
        let adjustments = advisor.suggest_adjustments(&graph, &runs, "E1").unwrap();
        assert!(adjustments.is_empty());
    }

    #[test]
    fn test_unknown_elaboration_is_error() {
        let graph = graph_with_elaboration(vec![("I_A", 10.0)]);
        let advisor = YieldAdjustmentAdvisor::new();

        let err = advisor
            .suggest_adjustments(&graph, &[], "E_MISSING")
            .unwrap_err();
        assert!(matches!(err, EngineError::NodeNotFound { .. }));
    }

    // ==========================================
    // 测试 3: 生产统计
    // ==========================================

    #[test]
    fn test_production_stats() {
        let runs = vec![
            run("E1", ts(2025, 5, 1), vec![("I_A", 10.0, 10.0)]),
            run("E1", ts(2025, 5, 3), vec![("I_A", 10.0, 10.0)]),
            run("E_OTRA", ts(2025, 5, 9), vec![("I_A", 10.0, 10.0)]),
        ];

        let advisor = YieldAdjustmentAdvisor::new();
        let stats = advisor.production_stats(&runs, "E1");

        assert_eq!(stats.run_count, 2);
        assert!((stats.mean_production_ratio - 0.95).abs() < 1e-9);
        assert!((stats.mean_waste_fraction - 0.05).abs() < 1e-9);
        assert_eq!(stats.last_produced_at, Some(ts(2025, 5, 3)));
    }

    #[test]
    fn test_production_stats_no_runs() {
        let advisor = YieldAdjustmentAdvisor::new();
        let stats = advisor.production_stats(&[], "E1");

        assert_eq!(stats.run_count, 0);
        assert_eq!(stats.mean_production_ratio, 0.0);
        assert!(stats.last_produced_at.is_none());
    }
}
