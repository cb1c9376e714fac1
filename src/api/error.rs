// ==========================================
// 餐饮成本核算引擎 - API 层错误类型
// ==========================================
// 职责: 定义 API 层错误, 把引擎错误转换为面向操作员的消息
// 红线: 所有错误必须含显式原因 (可解释性)
// ==========================================

use crate::engine::error::{EngineError, GraphValidationError};
use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 输入校验错误 =====
    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ===== 业务错误 =====
    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("价格数据缺失: article={article_id} (需先补齐价格历史或现价)")]
    MissingPriceData { article_id: String },

    // ===== 结构错误 (会话级致命) =====
    #[error("组成图校验失败: {0}")]
    GraphValidation(#[from] GraphValidationError),

    // ===== 通用错误 =====
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::UnknownPrice { article_id } => ApiError::MissingPriceData { article_id },
            EngineError::NodeNotFound { kind, id } => {
                ApiError::NotFound(format!("{} {}", kind, id))
            }
            EngineError::Graph(e) => ApiError::GraphValidation(e),
            EngineError::Other(e) => ApiError::Internal(e),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
