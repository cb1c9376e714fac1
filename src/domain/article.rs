// ==========================================
// 餐饮成本核算引擎 - ERP 物料领域模型
// ==========================================
// 依据: Escandallo_Data_Dictionary_v0.1.md - articulos_erp / historico_precios_erp
// ==========================================
// 红线: 价格历史为只追加 (append-only), 观测不可修改
// 用途: 导入层写入, 引擎层只读
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// RawArticle - ERP 物料主数据
// ==========================================
// 采购目录条目, current_price 是价格时间线最新观测的缓存
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawArticle {
    // ===== 主键 =====
    pub article_id: String, // ERP 物料编码 (erp_id, 原料 link 指向此字段)

    // ===== 基础信息 =====
    pub name: String,                       // 物料名称
    pub unit: Option<String>,               // 计量单位 (kg/L/ud)
    pub current_price: Option<f64>,         // 当前单价 (最新观测的缓存, 可能缺失)

    // ===== 供应商影子字段 (报表展示用) =====
    pub supplier_name: Option<String>,      // 供应商名称
    pub supplier_reference: Option<String>, // 供应商参考编号

    // ===== 元数据 =====
    pub default_waste_fraction: Option<f64>, // 默认损耗率 (仅元数据, 成本计算以组成项损耗为准)
}

// ==========================================
// PriceObservation - 价格观测
// ==========================================
// 红线: 同一物料的观测按时间全序, 时间戳不可重复
// precio_calculado: 已折算净价 (已含折扣与单位换算)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceObservation {
    pub article_id: String,             // 所属 ERP 物料
    pub effective_at: DateTime<Utc>,    // 生效时间
    pub unit_price: f64,                // 折算后单价
}
