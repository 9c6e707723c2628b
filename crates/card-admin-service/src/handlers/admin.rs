//! 管理端 API 处理器
//!
//! 批量生成、列表查询、删除卡密。删除策略归管理层所有：
//! 仅发放人本人或配置中的管理员可以删卡，引擎只负责删除后不可达。

use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::info;
use validator::Validate;

use card_service::{CardListFilter, IssueBatchRequest};

use crate::{
    dto::{
        ApiResponse, CardDto, CardListQuery, GenerateCardsRequest, GenerateCardsResponse,
        PageResponse, RevokeCardRequest,
    },
    error::AdminError,
    state::AppState,
};

/// 批量生成卡密
///
/// POST /api/admin/cards/generate
pub async fn generate_cards(
    State(state): State<AppState>,
    Json(req): Json<GenerateCardsRequest>,
) -> Result<Json<ApiResponse<GenerateCardsResponse>>, AdminError> {
    req.validate()?;

    let card_type = req.card_type.parse().map_err(AdminError::Validation)?;

    let outcome = state
        .issue_service
        .issue_batch(IssueBatchRequest {
            card_type,
            count: req.count,
            duration_days: req.duration_days,
            issued_by: req.issuer.clone(),
            remark: req.remark,
        })
        .await?;

    info!(
        issuer = %req.issuer,
        card_type = %card_type,
        issued = outcome.cards.len(),
        failed = outcome.failed,
        "管理端批量生成卡密"
    );

    Ok(Json(ApiResponse::success(outcome.into())))
}

/// 分页查询卡密列表
///
/// GET /api/admin/cards?page=&pageSize=&status=&cardType=
pub async fn list_cards(
    State(state): State<AppState>,
    Query(query): Query<CardListQuery>,
) -> Result<Json<ApiResponse<PageResponse<CardDto>>>, AdminError> {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(20).clamp(1, 200);

    let status = query
        .status
        .as_deref()
        .map(parse_status)
        .transpose()
        .map_err(AdminError::Validation)?;
    let card_type = query
        .card_type
        .as_deref()
        .map(|s| s.parse())
        .transpose()
        .map_err(AdminError::Validation)?;

    let filter = CardListFilter {
        status,
        card_type,
        page,
        page_size,
    };

    let cards = state.card_repo.list(&filter).await?;
    let total = state.card_repo.count(&filter).await?;

    let items = cards.into_iter().map(CardDto::from).collect();
    Ok(Json(ApiResponse::success(PageResponse::new(
        items, total, page, page_size,
    ))))
}

/// 删除卡密
///
/// DELETE /api/admin/cards/{code}
pub async fn revoke_card(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(req): Json<RevokeCardRequest>,
) -> Result<Json<ApiResponse<()>>, AdminError> {
    req.validate()?;

    let card = state
        .card_repo
        .find_by_code(&code)
        .await?
        .ok_or_else(|| AdminError::CardNotFound(code.clone()))?;

    let is_issuer = req.requester == card.issued_by;
    let is_admin = state.policy.admins.iter().any(|a| a == &req.requester);
    if !is_issuer && !is_admin {
        return Err(AdminError::Forbidden(format!(
            "{} 无权删除该卡密",
            req.requester
        )));
    }

    // 查删之间存在窗口，以删除结果为准
    if !state.card_repo.delete(&code).await? {
        return Err(AdminError::CardNotFound(code));
    }

    info!(code = %code, requester = %req.requester, "卡密已删除");
    Ok(Json(ApiResponse::<()>::success_empty()))
}

/// 解析状态过滤参数
fn parse_status(s: &str) -> Result<card_service::CardStatus, String> {
    match s.to_ascii_lowercase().as_str() {
        "unused" => Ok(card_service::CardStatus::Unused),
        "used" => Ok(card_service::CardStatus::Used),
        "expired" => Ok(card_service::CardStatus::Expired),
        other => Err(format!(
            "无效的卡密状态: {other}，可选值: unused, used, expired"
        )),
    }
}
