// ==========================================
// 餐饮成本核算引擎 - 时点成本解析器
// ==========================================
// 依据: Coste_Engine_Specs_v0.2.md - 4.3 Cost Resolver
// ==========================================
// 职责: 递归滚算节点 (原料/半成品/配方) 在 T 时点的成本
// 输入: 只读组成图 + 价格时间线 + 目标时点
// 输出: 非负成本 + 解析诊断
// ==========================================
// 红线: 纯函数 (同图同时点重复调用结果一致)
// 红线: 损耗加价口径 qty * cost * (1 + waste)
// 口径: 半成品为单位成本 (除以产出批量),
//       配方为整盘总成本 (不再除产量)
// ==========================================

mod core;
mod report;


pub use self::core::{CostPass, CostResolver};
pub use report::{ComponentCostLine, CostBreakdown};
