//! 卡密实体定义
//!
//! 卡密是引擎唯一的核心实体：一行记录对应一个访问卡密。
//! 有效性判断是纯函数，过期状态的落库由服务层单独执行，
//! 保证推导逻辑可以脱离数据库独立测试。

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{CardStatus, CardType};
use crate::error::{CardError, Result};

/// 卡密
///
/// `activated_at` 与 `expires_at` 要么同时为空（未激活），要么同时非空。
/// `bound_user_info` 在激活时一次性写入，此后不再变更。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: i64,
    /// 卡密码，全局唯一且创建后不可变
    pub code: String,
    /// 卡密类型
    pub card_type: CardType,
    /// 激活后的有效期天数
    pub duration_days: i32,
    /// 卡密状态
    pub status: CardStatus,
    /// 激活时间（激活时一次性写入）
    #[sqlx(default)]
    pub activated_at: Option<DateTime<Utc>>,
    /// 过期时间 = 激活时间 + 有效期天数
    #[sqlx(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// 激活者信息（激活时一次性写入的不透明元数据）
    #[sqlx(default)]
    pub bound_user_info: Option<serde_json::Value>,
    /// 发放人
    pub issued_by: String,
    /// 归属人（仅关系引用，不由引擎管理）
    #[sqlx(default)]
    pub assigned_to: Option<String>,
    /// 备注
    #[sqlx(default)]
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    /// 检查卡密在给定时刻是否已过有效期
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|t| now > t)
    }

    /// 推导给定时刻的实际状态（纯函数，不落库）
    ///
    /// 已激活且过了有效期的卡密推导为 expired，其余保持存储状态不变。
    /// 推导结果与存储状态不一致时，由读取路径负责把 expired 持久化。
    pub fn evaluate(&self, now: DateTime<Utc>) -> CardStatus {
        if self.status == CardStatus::Used && self.is_expired(now) {
            CardStatus::Expired
        } else {
            self.status
        }
    }

    /// 检查卡密在给定时刻是否有效
    ///
    /// 只有已激活且仍在有效期内的卡密有效；未激活和已过期都无效。
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.evaluate(now) == CardStatus::Used
    }

    /// 计算从激活时刻起的过期时间
    pub fn expiry_from(activated_at: DateTime<Utc>, duration_days: i32) -> DateTime<Utc> {
        activated_at + Duration::days(i64::from(duration_days))
    }
}

/// 待入库的新卡密
///
/// 工厂函数在构造时完成派生字段（有效期天数）的计算和校验，
/// 构造与持久化解耦，业务规则不依赖 ORM 钩子。
#[derive(Debug, Clone)]
pub struct NewCard {
    pub code: String,
    pub card_type: CardType,
    pub duration_days: i32,
    pub issued_by: String,
    pub remark: Option<String>,
}

impl NewCard {
    /// 创建新卡密
    ///
    /// `duration_override` 为空时按类型取默认天数；显式指定时必须为正数。
    pub fn new(
        code: String,
        card_type: CardType,
        duration_override: Option<i32>,
        issued_by: impl Into<String>,
        remark: Option<String>,
    ) -> Result<Self> {
        if code.is_empty() {
            return Err(CardError::Validation("卡密码不能为空".to_string()));
        }
        if let Some(days) = duration_override
            && days <= 0
        {
            return Err(CardError::Validation(format!(
                "有效期天数必须为正数: {days}"
            )));
        }

        Ok(Self {
            code,
            card_type,
            duration_days: card_type.duration_days(duration_override),
            issued_by: issued_by.into(),
            remark,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_card() -> Card {
        let now = Utc::now();
        Card {
            id: 1,
            code: "a".repeat(32),
            card_type: CardType::Day,
            duration_days: 1,
            status: CardStatus::Unused,
            activated_at: None,
            expires_at: None,
            bound_user_info: None,
            issued_by: "admin".to_string(),
            assigned_to: None,
            remark: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_unused_card_is_never_valid() {
        let card = create_test_card();
        let now = Utc::now();
        assert!(!card.is_valid(now));
        assert_eq!(card.evaluate(now), CardStatus::Unused);
    }

    #[test]
    fn test_day_card_activation_timeline() {
        // T0 发卡，T0+1h 激活，过期时间应为 T0+1h+24h
        let t0 = Utc::now();
        let activated_at = t0 + Duration::hours(1);
        let expires_at = Card::expiry_from(activated_at, 1);
        assert_eq!(expires_at, activated_at + Duration::hours(24));

        let mut card = create_test_card();
        card.status = CardStatus::Used;
        card.activated_at = Some(activated_at);
        card.expires_at = Some(expires_at);

        // T0+1h+23h：仍然有效
        let probe = activated_at + Duration::hours(23);
        assert!(card.is_valid(probe));
        assert_eq!(card.evaluate(probe), CardStatus::Used);

        // T0+1h+25h：已过期
        let probe = activated_at + Duration::hours(25);
        assert!(!card.is_valid(probe));
        assert_eq!(card.evaluate(probe), CardStatus::Expired);
    }

    #[test]
    fn test_evaluate_is_pure_and_stable() {
        let mut card = create_test_card();
        let activated_at = Utc::now() - Duration::days(2);
        card.status = CardStatus::Used;
        card.activated_at = Some(activated_at);
        card.expires_at = Some(Card::expiry_from(activated_at, 1));

        let now = Utc::now();
        // 重复推导结果一致，且不改变存储状态
        assert_eq!(card.evaluate(now), CardStatus::Expired);
        assert_eq!(card.evaluate(now), CardStatus::Expired);
        assert_eq!(card.status, CardStatus::Used);
    }

    #[test]
    fn test_expired_status_never_reverts() {
        let mut card = create_test_card();
        let activated_at = Utc::now() - Duration::days(10);
        card.status = CardStatus::Expired;
        card.activated_at = Some(activated_at);
        card.expires_at = Some(Card::expiry_from(activated_at, 1));

        // 已落库为 expired 的卡密无论何时推导都不会回到 used
        assert_eq!(card.evaluate(Utc::now()), CardStatus::Expired);
        assert!(!card.is_valid(Utc::now()));
    }

    #[test]
    fn test_new_card_derives_duration_by_type() {
        let card = NewCard::new("c".repeat(32), CardType::Year, None, "admin", None).unwrap();
        assert_eq!(card.duration_days, 365);

        let card = NewCard::new("c".repeat(32), CardType::Custom, Some(7), "admin", None).unwrap();
        assert_eq!(card.duration_days, 7);

        let card = NewCard::new("c".repeat(32), CardType::Custom, None, "admin", None).unwrap();
        assert_eq!(card.duration_days, 30);
    }

    #[test]
    fn test_new_card_rejects_invalid_input() {
        assert!(matches!(
            NewCard::new(String::new(), CardType::Day, None, "admin", None),
            Err(CardError::Validation(_))
        ));
        assert!(matches!(
            NewCard::new("c".repeat(32), CardType::Custom, Some(0), "admin", None),
            Err(CardError::Validation(_))
        ));
        assert!(matches!(
            NewCard::new("c".repeat(32), CardType::Custom, Some(-5), "admin", None),
            Err(CardError::Validation(_))
        ));
    }
}
