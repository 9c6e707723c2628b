//! 卡密校验 API 处理器
//!
//! 面向内容网关和机器人的公开接口：验证、激活、状态查询。
//! 有效性查询永不直接透出存储层错误；"不存在"与"存在但无效"
//! 是两种不同的响应。

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;
use validator::Validate;

use crate::{
    dto::{ActivateCardRequest, ApiResponse, CardDto, CardValidityDto, VerifyCardRequest},
    error::AdminError,
    state::AppState,
};

/// 验证卡密
///
/// POST /api/cards/verify
pub async fn verify_card(
    State(state): State<AppState>,
    Json(req): Json<VerifyCardRequest>,
) -> Result<Json<ApiResponse<CardValidityDto>>, AdminError> {
    req.validate()?;

    let validity = state.validity_service.check(&req.code).await?;
    Ok(Json(ApiResponse::success(validity.into())))
}

/// 激活卡密
///
/// POST /api/cards/activate
///
/// 并发激活同一卡密时只有一个请求成功，其余收到 409 ALREADY_ACTIVATED。
pub async fn activate_card(
    State(state): State<AppState>,
    Json(req): Json<ActivateCardRequest>,
) -> Result<Json<ApiResponse<CardDto>>, AdminError> {
    req.validate()?;

    let metadata = req.metadata.unwrap_or_else(|| json!({}));
    let card = state.activation_service.activate(&req.code, metadata).await?;

    Ok(Json(ApiResponse::success(card.into())))
}

/// 查询卡密状态
///
/// GET /api/cards/status/{code}
pub async fn card_status(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<CardValidityDto>>, AdminError> {
    if code.is_empty() || code.len() > 32 {
        return Err(AdminError::Validation(
            "卡密码长度必须在 1-32 之间".to_string(),
        ));
    }

    let validity = state.validity_service.check(&code).await?;
    Ok(Json(ApiResponse::success(validity.into())))
}
