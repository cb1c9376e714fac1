// ==========================================
// 餐饮成本核算引擎 - 半成品领域模型
// ==========================================
// 依据: Escandallo_Data_Dictionary_v0.1.md - elaboraciones / elaboracion_componentes
// 依据: Coste_Engine_Specs_v0.2.md - 2. 半成品成本口径
// ==========================================
// 红线: 组成图必须无环 (半成品不得直接或间接包含自身)
// 红线: 损耗按加价口径计入 (qty * cost * (1 + waste)),
//       不是产出折损口径 (qty * cost / (1 - waste))
// 口径: 半成品单位成本 = 组成项成本合计 / 产出批量
// ==========================================

use crate::domain::types::ComponentKind;
use serde::{Deserialize, Serialize};

// ==========================================
// Component - 半成品组成项
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub kind: ComponentKind,  // 组成项类型 (原料/半成品)
    pub component_id: String, // 被引用节点 ID
    pub quantity: f64,        // 净用量 (cantidad_neta, 每批)
    pub waste_fraction: f64,  // 损耗率 (merma, 0.10 = 10%, 加价口径)
}

// ==========================================
// Elaboration - 半成品
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Elaboration {
    // ===== 主键 =====
    pub elaboration_id: String, // 半成品唯一标识

    // ===== 基础信息 =====
    pub name: String,                        // 半成品名称
    pub yield_quantity: f64,                 // 产出批量 (produccion_total, 必须 > 0)
    pub production_unit: Option<String>,     // 产出单位 (unidad_produccion, 元数据)

    // ===== 组成清单 (有序) =====
    pub components: Vec<Component>,
}
