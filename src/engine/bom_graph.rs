// ==========================================
// 餐饮成本核算引擎 - 组成图 (BOM)
// ==========================================
// 依据: Coste_Engine_Specs_v0.2.md - 4.2 BOM Graph
// ==========================================
// 职责: 组成图装载 + 结构校验 + 环检测
// 输入: 物料/原料/半成品/配方快照
// 输出: 只读内存图 (分析会话期内不可变)
// ==========================================
// 红线: 先校验后遍历 (validate-then-traverse),
//       任何成本查询前必须通过装载校验
// ==========================================

mod core;
mod report;


pub use self::core::BomGraph;
pub use report::{GraphStats, GraphWarning};
