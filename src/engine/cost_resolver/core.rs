// ==========================================
// 餐饮成本核算引擎 - 成本解析器核心
// ==========================================
// 依据: Coste_Engine_Specs_v0.2.md - 4.3 Cost Resolver
// 红线: 同一时点解析趟 (pass) 内每个节点最多计算一次
//       (共享子半成品不得重复滚算)
// 红线: 解析期不做任何 I/O, 数据全部预装载
// ==========================================

use crate::domain::elaboration::Component;
use crate::domain::types::NodeKind;
use crate::engine::bom_graph::BomGraph;
use crate::engine::error::{Diagnostic, DiagnosticKind, EngineError, EngineResult};
use crate::engine::price_timeline::PriceTimeline;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

use super::report::{ComponentCostLine, CostBreakdown};

// ==========================================
// CostResolver - 成本解析器
// ==========================================
// 无状态入口: 持有不可变快照引用, 每个时点开一趟 CostPass
pub struct CostResolver<'a> {
    graph: &'a BomGraph,
    timeline: &'a PriceTimeline,
}

impl<'a> CostResolver<'a> {
    /// 创建新的成本解析器
    pub fn new(graph: &'a BomGraph, timeline: &'a PriceTimeline) -> Self {
        Self { graph, timeline }
    }

    /// 开一趟 T 时点解析 (带备忘缓存与诊断收集)
    pub fn pass(&self, as_of: DateTime<Utc>) -> CostPass<'a> {
        CostPass {
            graph: self.graph,
            timeline: self.timeline,
            as_of,
            memo: HashMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// 单节点一次性查询 (内部自建一趟 pass)
    ///
    /// # 返回
    /// - `Ok((cost, diagnostics))`: 成本与该次解析收集的诊断
    /// - `Err(UnknownPrice)`: 叶子价格不可知, 不得静默按 0
    /// - `Err(NodeNotFound)`: 顶层查询的节点不在图中
    pub fn unit_cost_of(
        &self,
        kind: NodeKind,
        id: &str,
        as_of: DateTime<Utc>,
    ) -> EngineResult<(f64, Vec<Diagnostic>)> {
        let mut pass = self.pass(as_of);
        let cost = pass.unit_cost_of(kind, id)?;
        Ok((cost, pass.take_diagnostics()))
    }
}

// ==========================================
// CostPass - 单时点解析趟
// ==========================================
// 备忘缓存按 (kind, id) 键控; as_of 对整趟固定
pub struct CostPass<'a> {
    graph: &'a BomGraph,
    timeline: &'a PriceTimeline,
    as_of: DateTime<Utc>,
    memo: HashMap<(NodeKind, String), f64>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> CostPass<'a> {
    /// 本趟的评估时点
    pub fn as_of(&self) -> DateTime<Utc> {
        self.as_of
    }

    /// 解析节点在本趟时点的成本
    ///
    /// 原料/半成品为单位成本, 配方为整盘总成本
    #[instrument(skip(self), fields(as_of = %self.as_of))]
    pub fn unit_cost_of(&mut self, kind: NodeKind, id: &str) -> EngineResult<f64> {
        if !self.graph.contains(kind, id) {
            return Err(EngineError::NodeNotFound {
                kind,
                id: id.to_string(),
            });
        }
        self.resolve(kind, id)
    }

    /// 本趟累计的解析诊断
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// 取走诊断 (随报表结果返回)
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    // ==========================================
    // 递归解析
    // ==========================================

    fn resolve(&mut self, kind: NodeKind, id: &str) -> EngineResult<f64> {
        let key = (kind, id.to_string());
        if let Some(cached) = self.memo.get(&key) {
            return Ok(*cached);
        }

        let cost = match kind {
            NodeKind::Ingredient => self.ingredient_cost(id)?,
            NodeKind::Elaboration => self.elaboration_cost(id)?,
            NodeKind::Recipe => self.recipe_cost(id)?,
        };

        self.memo.insert(key, cost);
        Ok(cost)
    }

    // 原料: 未绑定 ERP 按 0; 已绑定走价格时间线
    fn ingredient_cost(&mut self, id: &str) -> EngineResult<f64> {
        let graph = self.graph;
        let ingredient = match graph.ingredient(id) {
            Some(i) => i,
            None => return Ok(self.missing_node(NodeKind::Ingredient, id)),
        };

        let link = match ingredient.article_link_id.as_deref() {
            Some(l) if !l.trim().is_empty() => l,
            _ => {
                debug!(ingredient_id = %id, "原料未绑定 ERP 物料, 成本按 0");
                return Ok(0.0);
            }
        };

        match self.timeline.price_at(link, self.as_of) {
            Ok(price) => Ok(price),
            Err(err @ EngineError::UnknownPrice { .. }) => {
                // 价格不可知必须上抛, 0 会污染百分比计算
                self.diagnostics.push(Diagnostic {
                    node_kind: NodeKind::Ingredient,
                    node_id: id.to_string(),
                    kind: DiagnosticKind::UnknownPrice,
                    message: format!("原料 {} 绑定物料 {} 无任何可用价格", ingredient.name, link),
                });
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    // 半成品: sum(组成项单位成本 * qty * (1 + waste)) / 产出批量
    fn elaboration_cost(&mut self, id: &str) -> EngineResult<f64> {
        let graph = self.graph;
        let elaboration = match graph.elaboration(id) {
            Some(e) => e,
            None => return Ok(self.missing_node(NodeKind::Elaboration, id)),
        };

        if graph.has_invalid_yield(id) {
            self.diagnostics.push(Diagnostic {
                node_kind: NodeKind::Elaboration,
                node_id: id.to_string(),
                kind: DiagnosticKind::InvalidYield,
                message: format!(
                    "半成品 {} 产出批量非正 ({}), 成本按 0",
                    elaboration.name, elaboration.yield_quantity
                ),
            });
            return Ok(0.0);
        }

        let mut total = 0.0;
        for component in &elaboration.components {
            total += self.component_cost(id, component)?;
        }

        // 装载校验保证此处 yield > 0, 不会除零
        Ok(total / elaboration.yield_quantity)
    }

    // 配方: sum(半成品单位成本 * 用量), 整盘口径不再除产量
    fn recipe_cost(&mut self, id: &str) -> EngineResult<f64> {
        let graph = self.graph;
        let recipe = match graph.recipe(id) {
            Some(r) => r,
            None => return Ok(self.missing_node(NodeKind::Recipe, id)),
        };

        let mut total = 0.0;
        for line in &recipe.lines {
            if !graph.contains(NodeKind::Elaboration, &line.elaboration_id) {
                total += self.missing_node(NodeKind::Elaboration, &line.elaboration_id);
                continue;
            }
            let unit = self.resolve(NodeKind::Elaboration, &line.elaboration_id)?;
            total += unit * line.quantity;
        }
        Ok(total)
    }

    // 组成项计损耗成本
    fn component_cost(&mut self, owner_id: &str, component: &Component) -> EngineResult<f64> {
        let kind = component.kind.as_node_kind();
        if !self.graph.contains(kind, &component.component_id) {
            // 装载校验后仍缺引用属于陈旧数据, 本地恢复不中止批量
            warn!(
                owner_id = %owner_id,
                component_id = %component.component_id,
                "组成项引用的节点不在图中, 成本按 0"
            );
            return Ok(self.missing_node(kind, &component.component_id));
        }

        let unit = self.resolve(kind, &component.component_id)?;
        Ok(unit * component.quantity * (1.0 + component.waste_fraction))
    }

    fn missing_node(&mut self, kind: NodeKind, id: &str) -> f64 {
        self.diagnostics.push(Diagnostic {
            node_kind: kind,
            node_id: id.to_string(),
            kind: DiagnosticKind::MissingNode,
            message: format!("引用的节点不在图中: {} ({})", id, kind),
        });
        0.0
    }

    // ==========================================
    // 成本明细 (escandallo desglose)
    // ==========================================

    /// 半成品逐组成项成本明细
    ///
    /// # 返回
    /// 每个组成项的单位成本 / 计损耗成本 / 占比;
    /// 合计为 0 时占比全部为 0
    pub fn breakdown(&mut self, elaboration_id: &str) -> EngineResult<CostBreakdown> {
        let graph = self.graph;
        let elaboration = graph.elaboration(elaboration_id).ok_or_else(|| {
            EngineError::NodeNotFound {
                kind: NodeKind::Elaboration,
                id: elaboration_id.to_string(),
            }
        })?;

        let mut lines = Vec::with_capacity(elaboration.components.len());
        let mut total = 0.0;

        for component in &elaboration.components {
            let kind = component.kind.as_node_kind();
            let unit_cost = if graph.contains(kind, &component.component_id) {
                self.resolve(kind, &component.component_id)?
            } else {
                self.missing_node(kind, &component.component_id)
            };
            let extended = unit_cost * component.quantity * (1.0 + component.waste_fraction);
            total += extended;

            lines.push(ComponentCostLine {
                component_id: component.component_id.clone(),
                name: graph
                    .node_name(kind, &component.component_id)
                    .unwrap_or("(desconocido)")
                    .to_string(),
                kind: component.kind,
                quantity: component.quantity,
                waste_fraction: component.waste_fraction,
                unit_cost,
                extended_cost: extended,
                contribution_percent: 0.0, // 合计后回填
            });
        }

        if total > 0.0 {
            for line in &mut lines {
                line.contribution_percent = line.extended_cost / total * 100.0;
            }
        }

        let unit_cost = if graph.has_invalid_yield(elaboration_id) {
            0.0
        } else {
            total / elaboration.yield_quantity
        };

        Ok(CostBreakdown {
            elaboration_id: elaboration_id.to_string(),
            name: elaboration.name.clone(),
            as_of: self.as_of,
            total_cost: total,
            unit_cost,
            yield_quantity: elaboration.yield_quantity,
            lines,
        })
    }
}
