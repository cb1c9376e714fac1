// ==========================================
// 餐饮成本核算引擎 - 成品配方领域模型
// ==========================================
// 依据: Escandallo_Data_Dictionary_v0.1.md - recetas
// ==========================================
// 红线: 配方只能作为图的根节点, 不参与任何组成清单
// 口径: 配方成本为"整盘总成本", 不再除以任何产量
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// RecipeLine - 配方用量行
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeLine {
    pub elaboration_id: String, // 引用的半成品
    pub quantity: f64,          // 用量 (源数据缺失时按 0 计)
}

// ==========================================
// Recipe - 成品配方
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    // ===== 主键 =====
    pub recipe_id: String, // 配方唯一标识

    // ===== 基础信息 =====
    pub name: String,             // 配方名称
    pub category: Option<String>, // 分类 (报表分组用, 元数据)

    // ===== 用量清单 (有序) =====
    pub lines: Vec<RecipeLine>,
}
