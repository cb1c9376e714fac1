// ==========================================
// 餐饮成本核算引擎 - 生产记录领域模型
// ==========================================
// 依据: Escandallo_Data_Dictionary_v0.1.md - elaboracion_producciones
// ==========================================
// 红线: 历史事实, 只追加不修改
// 用途: YieldAdjustmentAdvisor 输入 (计划用量 vs 实际用量)
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// ComponentUsage - 单次生产的组成项用量
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentUsage {
    pub component_id: String,   // 组成项引用的节点 ID
    pub component_name: String, // 组成项名称 (记录时快照)
    pub planned_quantity: f64,  // 计划用量 (cantidad_planificada)
    pub used_quantity: f64,     // 实际用量 (cantidad_utilizada)
    pub waste_fraction: f64,    // 记录时的损耗率快照
}

// ==========================================
// ProductionRun - 半成品生产记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionRun {
    pub elaboration_id: String,           // 所属半成品
    pub produced_at: DateTime<Utc>,       // 生产时间 (fecha_produccion)
    pub planned_batch_quantity: f64,      // 计划批量
    pub produced_quantity: Option<f64>,   // 实际产出量 (cantidad_real_producida)
    pub component_usages: Vec<ComponentUsage>,
}

impl ProductionRun {
    /// 生产比率: 实际产出 / 计划批量
    ///
    /// 计划批量非正或实际产出缺失时返回 None
    pub fn production_ratio(&self) -> Option<f64> {
        let produced = self.produced_quantity?;
        if self.planned_batch_quantity > 0.0 {
            Some(produced / self.planned_batch_quantity)
        } else {
            None
        }
    }
}
