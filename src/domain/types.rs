// ==========================================
// 餐饮成本核算引擎 - 领域类型定义
// ==========================================
// 依据: Coste_Engine_Specs_v0.2.md - 0.1 节点体系
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 节点类型 (Node Kind)
// ==========================================
// 红线: 配方 (receta) 只能作为图的根节点,
//       不能作为任何组成项出现
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Ingredient,  // 内部原料 (ingrediente interno)
    Elaboration, // 半成品 (elaboración)
    Recipe,      // 成品配方 (receta)
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Ingredient => write!(f, "INGREDIENT"),
            NodeKind::Elaboration => write!(f, "ELABORATION"),
            NodeKind::Recipe => write!(f, "RECIPE"),
        }
    }
}

// ==========================================
// 组成项类型 (Component Kind)
// ==========================================
// 半成品的组成项只允许两类: 原料或嵌套半成品
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentKind {
    Ingredient,  // 原料组成项 (源数据 tipo_componente = 'ARTICULO')
    Elaboration, // 半成品组成项
}

impl ComponentKind {
    /// 转换为对应的节点类型
    pub fn as_node_kind(&self) -> NodeKind {
        match self {
            ComponentKind::Ingredient => NodeKind::Ingredient,
            ComponentKind::Elaboration => NodeKind::Elaboration,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentKind::Ingredient => write!(f, "INGREDIENT"),
            ComponentKind::Elaboration => write!(f, "ELABORATION"),
        }
    }
}
