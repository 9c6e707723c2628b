//! 管理服务错误类型定义
//!
//! 引擎错误到 HTTP 响应的映射出口

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use card_service::CardError;

/// 管理服务错误类型
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    // 业务错误
    #[error("卡密不存在: {0}")]
    CardNotFound(String),

    #[error("卡密已被激活: {0}")]
    AlreadyActivated(String),

    #[error("禁止操作: {0}")]
    Forbidden(String),

    #[error("参数验证失败: {0}")]
    Validation(String),

    #[error("卡密生成失败，请稍后重试")]
    IssuanceFailed,

    // 系统错误
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("内部错误: {0}")]
    Internal(String),
}

impl AdminError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::CardNotFound(_) => StatusCode::NOT_FOUND,
            Self::AlreadyActivated(_) => StatusCode::CONFLICT,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::IssuanceFailed | Self::Database(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::CardNotFound(_) => "CARD_NOT_FOUND",
            Self::AlreadyActivated(_) => "ALREADY_ACTIVATED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::IssuanceFailed => "ISSUANCE_FAILED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志，防止信息泄露
        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "数据库操作失败");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

/// 从 validator 错误转换
impl From<validator::ValidationErrors> for AdminError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// 从生命周期引擎的错误转换
impl From<CardError> for AdminError {
    fn from(err: CardError) -> Self {
        match err {
            CardError::CardNotFound(code) => Self::CardNotFound(code),
            CardError::AlreadyActivated { code, .. } => Self::AlreadyActivated(code),
            CardError::Validation(msg) => Self::Validation(msg),
            CardError::IssuanceFailed { .. } => Self::IssuanceFailed,
            CardError::Database(e) => Self::Database(e),
            other => Self::Internal(other.to_string()),
        }
    }
}

/// 服务层 Result 类型别名
pub type Result<T> = std::result::Result<T, AdminError>;
