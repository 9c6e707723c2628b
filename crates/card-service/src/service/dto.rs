//! 服务层 DTO 定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Card, CardStatus, CardType};

/// 批量发放请求
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueBatchRequest {
    /// 卡密类型
    pub card_type: CardType,
    /// 生成数量
    pub count: u32,
    /// 有效期天数覆盖（为空时按类型取默认值）
    pub duration_days: Option<i32>,
    /// 发放人
    pub issued_by: String,
    /// 备注
    pub remark: Option<String>,
}

/// 批量发放结果
///
/// 允许部分成功：`cards` 是实际入库的卡密清单，
/// `failed` 是冲突重试耗尽后被跳过的数量。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueBatchOutcome {
    /// 请求数量
    pub requested: u32,
    /// 重试耗尽被跳过的数量
    pub failed: u32,
    /// 实际入库的卡密
    pub cards: Vec<Card>,
}

/// 有效性查询结果投影
///
/// 面向内容网关和机器人状态查询的只读视图。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardValidity {
    /// 是否有效（已激活且在有效期内）
    pub valid: bool,
    /// 推导后的状态
    pub status: CardStatus,
    /// 卡密类型
    pub card_type: CardType,
    /// 激活时间
    pub activated_at: Option<DateTime<Utc>>,
    /// 过期时间
    pub expires_at: Option<DateTime<Utc>>,
}

impl CardValidity {
    /// 从卡密和推导状态构造投影
    pub fn project(card: &Card, derived: CardStatus) -> Self {
        Self {
            valid: derived == CardStatus::Used,
            status: derived,
            card_type: card.card_type,
            activated_at: card.activated_at,
            expires_at: card.expires_at,
        }
    }
}
