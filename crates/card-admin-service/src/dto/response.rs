//! 响应 DTO 定义
//!
//! 所有 REST API 的响应体结构

use card_service::{Card, CardStatus, CardType, CardValidity, IssueBatchOutcome};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// API 统一响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: "操作成功".to_string(),
            data: Some(data),
        }
    }

    /// 创建成功响应（无数据）
    pub fn success_empty() -> ApiResponse<()> {
        ApiResponse {
            success: true,
            code: "SUCCESS".to_string(),
            message: "操作成功".to_string(),
            data: None,
        }
    }
}

/// 分页响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl<T> PageResponse<T> {
    /// 创建分页响应
    pub fn new(items: Vec<T>, total: i64, page: i64, page_size: i64) -> Self {
        let total_pages = if page_size > 0 {
            (total + page_size - 1) / page_size
        } else {
            0
        };

        Self {
            items,
            total,
            page,
            page_size,
            total_pages,
        }
    }
}

/// 卡密响应 DTO（管理端视图）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDto {
    pub id: i64,
    pub code: String,
    pub card_type: CardType,
    pub duration_days: i32,
    pub status: CardStatus,
    pub activated_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub bound_user_info: Option<serde_json::Value>,
    pub issued_by: String,
    pub assigned_to: Option<String>,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Card> for CardDto {
    fn from(card: Card) -> Self {
        Self {
            id: card.id,
            code: card.code,
            card_type: card.card_type,
            duration_days: card.duration_days,
            status: card.status,
            activated_at: card.activated_at,
            expires_at: card.expires_at,
            bound_user_info: card.bound_user_info,
            issued_by: card.issued_by,
            assigned_to: card.assigned_to,
            remark: card.remark,
            created_at: card.created_at,
        }
    }
}

/// 有效性查询响应 DTO（只读投影）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardValidityDto {
    pub valid: bool,
    pub status: CardStatus,
    pub card_type: CardType,
    pub activated_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<CardValidity> for CardValidityDto {
    fn from(validity: CardValidity) -> Self {
        Self {
            valid: validity.valid,
            status: validity.status,
            card_type: validity.card_type,
            activated_at: validity.activated_at,
            expires_at: validity.expires_at,
        }
    }
}

/// 批量生成响应 DTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCardsResponse {
    pub requested: u32,
    pub issued: usize,
    pub failed: u32,
    pub cards: Vec<CardDto>,
}

impl From<IssueBatchOutcome> for GenerateCardsResponse {
    fn from(outcome: IssueBatchOutcome) -> Self {
        Self {
            requested: outcome.requested,
            issued: outcome.cards.len(),
            failed: outcome.failed,
            cards: outcome.cards.into_iter().map(CardDto::from).collect(),
        }
    }
}
