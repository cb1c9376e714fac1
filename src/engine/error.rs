// ==========================================
// 餐饮成本核算引擎 - 引擎层错误类型
// ==========================================
// 依据: Coste_Engine_Specs_v0.2.md - 7. 错误处理
// 工具: thiserror 派生宏
// ==========================================
// 口径: 装载期结构错误 = 致命 (整个分析会话不可信)
//       解析期单节点问题 = 本地恢复为 0 + 诊断记录
// ==========================================

use crate::domain::types::NodeKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==========================================
// GraphValidationError - 图装载期结构错误
// ==========================================
// 红线: 装载期错误必须上报操作员, 不得吞掉
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphValidationError {
    #[error("组成项引用不存在: owner={owner_id}, component={component_id} ({kind})")]
    MissingReference {
        owner_id: String,
        component_id: String,
        kind: NodeKind,
    },

    #[error("原料绑定的 ERP 物料不存在: ingredient={ingredient_id}, article={article_id}")]
    MissingArticleLink {
        ingredient_id: String,
        article_id: String,
    },

    #[error("组成图存在环: {}", path.join(" -> "))]
    CyclicComposition { path: Vec<String> },

    #[error("节点 ID 重复: kind={kind}, id={id}")]
    DuplicateNode { kind: NodeKind, id: String },

    #[error("ERP 物料编码重复: article={article_id}")]
    DuplicateArticle { article_id: String },

    #[error("价格观测时间戳重复: article={article_id}, effective_at={effective_at}")]
    DuplicateObservation {
        article_id: String,
        effective_at: DateTime<Utc>,
    },
}

// ==========================================
// EngineError - 引擎层错误类型
// ==========================================
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== 价格解析错误 =====
    // 红线: 不得静默回退为 0 (会污染下游百分比计算)
    #[error("物料价格不可知: article={article_id} (无观测且无缓存现价)")]
    UnknownPrice { article_id: String },

    // ===== 图结构错误 =====
    #[error(transparent)]
    Graph(#[from] GraphValidationError),

    // ===== 查询输入错误 =====
    #[error("节点未找到: kind={kind}, id={id}")]
    NodeNotFound { kind: NodeKind, id: String },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;

// ==========================================
// Diagnostic - 解析期诊断记录
// ==========================================
// 单节点数据问题不中止批量报表, 汇总为诊断清单随结果返回,
// 供前端渲染 "N 项存在数据问题" 横幅
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub node_kind: NodeKind,  // 出问题的节点类型
    pub node_id: String,      // 出问题的节点 ID
    pub kind: DiagnosticKind, // 问题分类
    pub message: String,      // 可解释原因
}

/// 诊断分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticKind {
    UnknownPrice, // 价格不可知 (批量口径下该节点整体剔除)
    InvalidYield, // 产出批量非正, 成本按 0 计
    MissingNode,  // 组成项指向图中不存在的节点, 成本按 0 计
}
