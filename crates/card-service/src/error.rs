//! 卡密服务错误类型
//!
//! 定义生命周期引擎的业务错误和系统错误

use thiserror::Error;

/// 卡密服务错误类型
#[derive(Debug, Error)]
pub enum CardError {
    // === 业务错误 ===
    #[error("卡密不存在: {0}")]
    CardNotFound(String),

    #[error("卡密已被激活: code={code}, 当前状态={current_status}")]
    AlreadyActivated {
        code: String,
        current_status: String,
    },

    #[error("卡密码已存在: {0}")]
    CodeCollision(String),

    #[error("卡密生成失败: 重试 {attempts} 次后卡密码仍然冲突")]
    IssuanceFailed { attempts: u32 },

    #[error("参数校验失败: {0}")]
    Validation(String),

    // === 系统错误 ===
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JSON 序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 卡密服务 Result 类型别名
pub type Result<T> = std::result::Result<T, CardError>;

impl CardError {
    /// 检查是否为可重试的错误
    ///
    /// 数据库瞬时故障后重试激活是安全的：重试要么发现卡密已被原请求激活，
    /// 要么可以继续完成激活。
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }

    /// 检查是否为业务错误（非系统错误）
    pub fn is_business_error(&self) -> bool {
        !matches!(
            self,
            Self::Database(_) | Self::Serialization(_) | Self::Internal(_)
        )
    }

    /// 获取错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::CardNotFound(_) => "CARD_NOT_FOUND",
            Self::AlreadyActivated { .. } => "ALREADY_ACTIVATED",
            Self::CodeCollision(_) => "CODE_COLLISION",
            Self::IssuanceFailed { .. } => "ISSUANCE_FAILED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
