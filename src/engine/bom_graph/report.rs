// ==========================================
// 餐饮成本核算引擎 - 组成图装载报告
// ==========================================
// 职责: 装载期警告与统计的输出结构
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// GraphWarning - 装载期警告
// ==========================================
// 警告不致命: 对应节点被标记为无效, 成本按 0 解析,
// 但必须对调用方可见 (分析页渲染提示横幅)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GraphWarning {
    /// 半成品产出批量非正, 单位成本无法定义, 按 0 计
    InvalidYield {
        elaboration_id: String,
        name: String,
        yield_quantity: f64,
    },
}

impl fmt::Display for GraphWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphWarning::InvalidYield {
                elaboration_id,
                name,
                yield_quantity,
            } => write!(
                f,
                "半成品产出批量非正: {} ({}) yield={}",
                name, elaboration_id, yield_quantity
            ),
        }
    }
}

// ==========================================
// GraphStats - 装载统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub article_count: usize,     // ERP 物料数
    pub ingredient_count: usize,  // 原料数
    pub elaboration_count: usize, // 半成品数
    pub recipe_count: usize,      // 配方数
    pub warning_count: usize,     // 装载警告数
}
