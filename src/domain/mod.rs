// ==========================================
// 餐饮成本核算引擎 - 领域模型层
// ==========================================
// 依据: Escandallo_Data_Dictionary_v0.1.md
// 依据: Coste_Engine_Specs_v0.2.md - 1. 数据模型
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含数据访问逻辑, 不含引擎逻辑
// ==========================================

pub mod article;
pub mod elaboration;
pub mod ingredient;
pub mod production;
pub mod recipe;
pub mod types;

// 重导出核心类型
pub use article::{PriceObservation, RawArticle};
pub use elaboration::{Component, Elaboration};
pub use ingredient::Ingredient;
pub use production::{ComponentUsage, ProductionRun};
pub use recipe::{Recipe, RecipeLine};
pub use types::{ComponentKind, NodeKind};
