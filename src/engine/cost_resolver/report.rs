// ==========================================
// 餐饮成本核算引擎 - 成本明细输出结构
// ==========================================
// 职责: 半成品逐组成项成本明细 (escandallo desglose)
// ==========================================

use crate::domain::types::ComponentKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// ComponentCostLine - 单组成项成本行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentCostLine {
    pub component_id: String,         // 组成项节点 ID
    pub name: String,                 // 组成项名称
    pub kind: ComponentKind,          // 原料 / 半成品
    pub quantity: f64,                // 净用量
    pub waste_fraction: f64,          // 损耗率
    pub unit_cost: f64,               // 组成项单位成本 (T 时点)
    pub extended_cost: f64,           // 计损耗成本 = qty * unit * (1 + waste)
    pub contribution_percent: f64,    // 占合计比例 (%), 合计为 0 时全部为 0
}

// ==========================================
// CostBreakdown - 半成品成本明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub elaboration_id: String,
    pub name: String,
    pub as_of: DateTime<Utc>,         // 评估时点
    pub total_cost: f64,              // 组成项成本合计 (除批量前)
    pub unit_cost: f64,               // 单位成本 = total / yield (无效批量时为 0)
    pub yield_quantity: f64,
    pub lines: Vec<ComponentCostLine>,
}
