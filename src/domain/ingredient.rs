// ==========================================
// 餐饮成本核算引擎 - 内部原料领域模型
// ==========================================
// 依据: Escandallo_Data_Dictionary_v0.1.md - ingredientes_internos
// ==========================================
// 原料是"概念层"包装: 绑定厨房命名与 ERP 物料 (0..1)
// 未绑定 ERP 物料的原料成本按 0 解析
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Ingredient - 内部原料
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    // ===== 主键 =====
    pub ingredient_id: String, // 原料唯一标识

    // ===== 基础信息 =====
    pub name: String, // 原料名称 (nombre_ingrediente)

    // ===== ERP 绑定 =====
    // 指向 RawArticle.article_id (ERP 编码, 非内部 UUID)
    // None = 未绑定, 成本解析为 0
    pub article_link_id: Option<String>,
}

impl Ingredient {
    /// 是否已绑定 ERP 物料
    pub fn is_linked(&self) -> bool {
        self.article_link_id
            .as_deref()
            .map(|id| !id.trim().is_empty())
            .unwrap_or(false)
    }
}
