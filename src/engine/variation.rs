// ==========================================
// 餐饮成本核算引擎 - 成本变动分析器
// ==========================================
// 依据: Coste_Engine_Specs_v0.2.md - 4.4 Variation Analyzer
// ==========================================
// 职责: 对指定类型的全部节点计算窗口两端成本, 派生差额/百分比,
//       汇总 KPI 与趋势序列
// 输入: 只读组成图 + 价格时间线 + 窗口 [date_from, date_to]
// 输出: 变动报表 (含诊断清单) + KPI + 逐日趋势
// ==========================================
// 红线: cost_from = 0 时 percent 按 0 报告 (不得出现 ±∞/NaN)
// 红线: 报表项保持快照插入顺序, 排序是调用方显式操作 (稳定排序)
// ==========================================

use crate::domain::types::NodeKind;
use crate::engine::bom_graph::BomGraph;
use crate::engine::cost_resolver::CostResolver;
use crate::engine::error::{Diagnostic, EngineError, EngineResult};
use crate::engine::price_timeline::PriceTimeline;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{info, instrument};
use uuid::Uuid;

// ==========================================
// 输出结构
// ==========================================

/// 单节点成本变动
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariationItem {
    pub node_id: String,
    pub name: String,
    pub kind: NodeKind,
    pub category: Option<String>,           // 配方分类 (仅配方)
    pub supplier_name: Option<String>,      // 供应商 (仅已绑定 ERP 的原料)
    pub supplier_reference: Option<String>, // 供应商参考编号
    pub cost_from: f64,
    pub cost_to: f64,
    pub delta: f64,
    pub percent: f64, // cost_from > 0 时 = delta / cost_from * 100, 否则 0
}

/// 变动报表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariationReport {
    pub report_id: Uuid, // 会话内报表标识
    pub kind: NodeKind,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub items: Vec<VariationItem>,
    pub diagnostics: Vec<Diagnostic>, // "N 项存在数据问题" 横幅数据源
}

/// 报表 KPI 汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariationSummary {
    pub item_count: usize,
    pub increase_count: usize,          // percent > 0
    pub decrease_count: usize,          // percent < 0
    pub mean_percent: f64,              // 算术平均 (不按成本加权)
    pub max_increase: Option<VariationItem>, // percent 最大项 (并列取先出现者)
}

/// 逐日趋势点 (窗口内均值线性插值)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSnapshot {
    pub date: chrono::NaiveDate,
    pub mean_cost: f64,   // 两位小数
    pub item_count: usize,
}

/// 半成品组成项级变动 (窗口两端的 desglose 对照)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentVariation {
    pub component_id: String,
    pub name: String,
    pub kind: crate::domain::types::ComponentKind,
    pub quantity: f64,
    pub cost_from: f64,            // 组成项单位成本 (窗口起点)
    pub cost_to: f64,              // 组成项单位成本 (窗口终点)
    pub delta: f64,
    pub percent: f64,              // 与顶层同口径零保护
    pub contribution_percent: f64, // 占窗口终点合计的比例
}

/// 半成品组成项级变动报表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentVariationReport {
    pub elaboration_id: String,
    pub name: String,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub unit_cost_from: f64,
    pub unit_cost_to: f64,
    pub components: Vec<ComponentVariation>,
    pub diagnostics: Vec<Diagnostic>,
}

/// 排序字段 (调用方显式选择)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortField {
    Name,
    CostFrom,
    CostTo,
    Delta,
    Percent,
}

// ==========================================
// VariationAnalyzer - 成本变动分析器
// ==========================================
// 无状态只读消费者: 不修改组成图
pub struct VariationAnalyzer<'a> {
    graph: &'a BomGraph,
    timeline: &'a PriceTimeline,
}

impl<'a> VariationAnalyzer<'a> {
    /// 创建新的变动分析器
    pub fn new(graph: &'a BomGraph, timeline: &'a PriceTimeline) -> Self {
        Self { graph, timeline }
    }

    /// 计算指定类型全部节点的窗口成本变动
    ///
    /// # 口径
    /// - 单节点价格不可知 (UnknownPrice): 该节点从报表项剔除,
    ///   记诊断, 不中止整批
    /// - percent 零保护: cost_from = 0 → percent = 0
    #[instrument(skip(self), fields(kind = %kind))]
    pub fn compute_variation(
        &self,
        kind: NodeKind,
        date_from: DateTime<Utc>,
        date_to: DateTime<Utc>,
    ) -> EngineResult<VariationReport> {
        let resolver = CostResolver::new(self.graph, self.timeline);
        let mut pass_from = resolver.pass(date_from);
        let mut pass_to = resolver.pass(date_to);

        let mut items = Vec::new();

        for node_id in self.graph.ids_of_kind(kind) {
            let cost_from = match pass_from.unit_cost_of(kind, node_id) {
                Ok(c) => c,
                Err(EngineError::UnknownPrice { .. }) => continue, // 诊断已入 pass
                Err(err) => return Err(err),
            };
            let cost_to = match pass_to.unit_cost_of(kind, node_id) {
                Ok(c) => c,
                Err(EngineError::UnknownPrice { .. }) => continue,
                Err(err) => return Err(err),
            };

            let delta = cost_to - cost_from;
            let percent = if cost_from > 0.0 {
                delta / cost_from * 100.0
            } else {
                0.0
            };

            items.push(VariationItem {
                node_id: node_id.clone(),
                name: self
                    .graph
                    .node_name(kind, node_id)
                    .unwrap_or_default()
                    .to_string(),
                kind,
                category: self.recipe_category(kind, node_id),
                supplier_name: self.supplier_field(kind, node_id, |a| a.supplier_name.clone()),
                supplier_reference: self
                    .supplier_field(kind, node_id, |a| a.supplier_reference.clone()),
                cost_from,
                cost_to,
                delta,
                percent,
            });
        }

        let mut diagnostics = pass_from.take_diagnostics();
        diagnostics.extend(pass_to.take_diagnostics());
        dedup_diagnostics(&mut diagnostics);

        info!(
            kind = %kind,
            items = items.len(),
            diagnostics = diagnostics.len(),
            "变动报表计算完成"
        );

        Ok(VariationReport {
            report_id: Uuid::new_v4(),
            kind,
            date_from,
            date_to,
            items,
            diagnostics,
        })
    }

    /// 单个半成品的组成项级变动明细
    ///
    /// 两端各开一趟 desglose, 逐组成项对照;
    /// 占比取窗口终点口径
    pub fn component_breakdown(
        &self,
        elaboration_id: &str,
        date_from: DateTime<Utc>,
        date_to: DateTime<Utc>,
    ) -> EngineResult<ComponentVariationReport> {
        let resolver = CostResolver::new(self.graph, self.timeline);
        let mut pass_from = resolver.pass(date_from);
        let mut pass_to = resolver.pass(date_to);

        let from = pass_from.breakdown(elaboration_id)?;
        let to = pass_to.breakdown(elaboration_id)?;

        // 组成清单有序且两趟同源, 按位对照
        let components = from
            .lines
            .iter()
            .zip(to.lines.iter())
            .map(|(f, t)| {
                let delta = t.unit_cost - f.unit_cost;
                let percent = if f.unit_cost > 0.0 {
                    delta / f.unit_cost * 100.0
                } else {
                    0.0
                };
                ComponentVariation {
                    component_id: f.component_id.clone(),
                    name: f.name.clone(),
                    kind: f.kind,
                    quantity: f.quantity,
                    cost_from: f.unit_cost,
                    cost_to: t.unit_cost,
                    delta,
                    percent,
                    contribution_percent: t.contribution_percent,
                }
            })
            .collect();

        let mut diagnostics = pass_from.take_diagnostics();
        diagnostics.extend(pass_to.take_diagnostics());
        dedup_diagnostics(&mut diagnostics);

        Ok(ComponentVariationReport {
            elaboration_id: elaboration_id.to_string(),
            name: to.name,
            date_from,
            date_to,
            unit_cost_from: from.unit_cost,
            unit_cost_to: to.unit_cost,
            components,
            diagnostics,
        })
    }

    fn recipe_category(&self, kind: NodeKind, node_id: &str) -> Option<String> {
        if kind != NodeKind::Recipe {
            return None;
        }
        self.graph.recipe(node_id).and_then(|r| r.category.clone())
    }

    fn supplier_field<F>(&self, kind: NodeKind, node_id: &str, pick: F) -> Option<String>
    where
        F: Fn(&crate::domain::article::RawArticle) -> Option<String>,
    {
        if kind != NodeKind::Ingredient {
            return None;
        }
        let link = self.graph.ingredient(node_id)?.article_link_id.as_deref()?;
        self.graph.article(link).and_then(pick)
    }

    // ==========================================
    // KPI 汇总
    // ==========================================

    /// 报表 KPI: 涨价数 / 降价数 / 平均百分比 / 最大涨幅项
    pub fn summarize(items: &[VariationItem]) -> VariationSummary {
        let increase_count = items.iter().filter(|i| i.percent > 0.0).count();
        let decrease_count = items.iter().filter(|i| i.percent < 0.0).count();
        let mean_percent = if items.is_empty() {
            0.0
        } else {
            items.iter().map(|i| i.percent).sum::<f64>() / items.len() as f64
        };
        // 并列时取先出现者 (稳定顺序口径)
        let max_increase = items
            .iter()
            .fold(None::<&VariationItem>, |best, item| match best {
                Some(b) if b.percent >= item.percent => Some(b),
                _ => Some(item),
            })
            .cloned();

        VariationSummary {
            item_count: items.len(),
            increase_count,
            decrease_count,
            mean_percent,
            max_increase,
        }
    }

    /// 按字段稳定排序 (不改变并列项的相对顺序)
    pub fn sort_items(items: &mut [VariationItem], field: SortField, descending: bool) {
        items.sort_by(|a, b| {
            let ord = match field {
                SortField::Name => a.name.cmp(&b.name),
                SortField::CostFrom => a.cost_from.total_cmp(&b.cost_from),
                SortField::CostTo => a.cost_to.total_cmp(&b.cost_to),
                SortField::Delta => a.delta.total_cmp(&b.delta),
                SortField::Percent => a.percent.total_cmp(&b.percent),
            };
            if descending {
                ord.reverse()
            } else {
                ord
            }
        });
    }

    // ==========================================
    // 趋势序列
    // ==========================================

    /// 窗口逐日趋势: 报表项 cost_from / cost_to 均值之间线性插值
    ///
    /// 空报表返回空序列; 单日窗口返回一个 progress = 1 的点
    pub fn trend_snapshots(report: &VariationReport) -> Vec<TrendSnapshot> {
        if report.items.is_empty() {
            return Vec::new();
        }

        let n = report.items.len() as f64;
        let mean_from = report.items.iter().map(|i| i.cost_from).sum::<f64>() / n;
        let mean_to = report.items.iter().map(|i| i.cost_to).sum::<f64>() / n;

        let start = report.date_from.date_naive();
        let end = report.date_to.date_naive();
        let total_days = (end - start).num_days();

        let mut snapshots = Vec::new();
        let mut day = start;
        while day <= end {
            let progress = if total_days == 0 {
                1.0
            } else {
                (day - start).num_days() as f64 / total_days as f64
            };
            let interpolated = mean_from + (mean_to - mean_from) * progress;
            snapshots.push(TrendSnapshot {
                date: day,
                mean_cost: (interpolated * 100.0).round() / 100.0,
                item_count: report.items.len(),
            });
            day += Duration::days(1);
        }
        snapshots
    }
}

// 两端 pass 可能对同一节点各记一次诊断, 合并去重
fn dedup_diagnostics(diagnostics: &mut Vec<Diagnostic>) {
    let mut seen = HashSet::new();
    diagnostics.retain(|d| seen.insert((d.node_kind, d.node_id.clone(), d.kind)));
}
