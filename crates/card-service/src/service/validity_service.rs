//! 有效性查询服务
//!
//! 内容网关和机器人状态查询共用的读路径。每次查询基于当前时刻
//! 重新推导状态：推导（纯函数）与落库（幂等条件更新）分成两步，
//! 推导出 expired 时先持久化再返回，保证后续读取一定看到 expired。

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, instrument};

use crate::error::{CardError, Result};
use crate::models::CardStatus;
use crate::repository::CardRepositoryTrait;
use crate::service::dto::CardValidity;

/// 有效性查询服务
pub struct ValidityService<CR>
where
    CR: CardRepositoryTrait,
{
    repo: Arc<CR>,
}

impl<CR> ValidityService<CR>
where
    CR: CardRepositoryTrait,
{
    pub fn new(repo: Arc<CR>) -> Self {
        Self { repo }
    }

    /// 查询卡密有效性
    ///
    /// 卡密不存在返回 `CardNotFound`，与"存在但无效"是两种不同的结果。
    /// 推导状态与存储状态不一致时，先把 expired 落库再返回响应；
    /// 落库是幂等的条件更新，已被其他请求落库时是无害的空操作。
    #[instrument(skip(self))]
    pub async fn check(&self, code: &str) -> Result<CardValidity> {
        let card = self
            .repo
            .find_by_code(code)
            .await?
            .ok_or_else(|| CardError::CardNotFound(code.to_string()))?;

        let now = Utc::now();
        let derived = card.evaluate(now);

        if derived == CardStatus::Expired && card.status == CardStatus::Used {
            let flipped = self.repo.mark_expired(code, now).await?;
            debug!(code = %card.code, flipped, "卡密已过有效期，状态落库为 expired");
        }

        Ok(CardValidity::project(&card, derived))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Card, CardType};
    use crate::repository::MockCardRepositoryTrait;
    use chrono::{DateTime, Duration, Utc};
    use serde_json::json;

    fn card_with(
        status: CardStatus,
        activated_at: Option<DateTime<Utc>>,
        duration_days: i32,
    ) -> Card {
        let now = Utc::now();
        Card {
            id: 1,
            code: "c".repeat(32),
            card_type: CardType::Day,
            duration_days,
            status,
            activated_at,
            expires_at: activated_at.map(|at| Card::expiry_from(at, duration_days)),
            bound_user_info: activated_at.map(|_| json!({})),
            issued_by: "admin".to_string(),
            assigned_to: None,
            remark: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_unused_card_is_invalid_without_write() {
        let mut repo = MockCardRepositoryTrait::new();
        repo.expect_find_by_code()
            .returning(|_| Ok(Some(card_with(CardStatus::Unused, None, 1))));
        repo.expect_mark_expired().never();

        let service = ValidityService::new(Arc::new(repo));
        let validity = service.check("abc").await.unwrap();

        assert!(!validity.valid);
        assert_eq!(validity.status, CardStatus::Unused);
        assert!(validity.activated_at.is_none());
        assert!(validity.expires_at.is_none());
    }

    #[tokio::test]
    async fn test_active_card_is_valid_without_write() {
        let activated_at = Utc::now() - Duration::hours(1);

        let mut repo = MockCardRepositoryTrait::new();
        repo.expect_find_by_code()
            .returning(move |_| Ok(Some(card_with(CardStatus::Used, Some(activated_at), 30))));
        repo.expect_mark_expired().never();

        let service = ValidityService::new(Arc::new(repo));
        let validity = service.check("abc").await.unwrap();

        assert!(validity.valid);
        assert_eq!(validity.status, CardStatus::Used);
        assert_eq!(validity.card_type, CardType::Day);
        assert_eq!(validity.activated_at, Some(activated_at));
    }

    #[tokio::test]
    async fn test_expired_card_flips_status_before_responding() {
        let activated_at = Utc::now() - Duration::days(3);

        let mut repo = MockCardRepositoryTrait::new();
        repo.expect_find_by_code()
            .returning(move |_| Ok(Some(card_with(CardStatus::Used, Some(activated_at), 1))));
        // 推导出 expired 必须在响应前触发一次落库
        repo.expect_mark_expired()
            .times(1)
            .returning(|_, _| Ok(true));

        let service = ValidityService::new(Arc::new(repo));
        let validity = service.check("abc").await.unwrap();

        assert!(!validity.valid);
        assert_eq!(validity.status, CardStatus::Expired);
    }

    #[tokio::test]
    async fn test_check_is_idempotent_after_expiry() {
        let activated_at = Utc::now() - Duration::days(3);

        let mut repo = MockCardRepositoryTrait::new();
        // 第一次读到 used（待落库），之后读到已落库的 expired
        let mut first = true;
        repo.expect_find_by_code().returning(move |_| {
            let status = if first {
                first = false;
                CardStatus::Used
            } else {
                CardStatus::Expired
            };
            Ok(Some(card_with(status, Some(activated_at), 1)))
        });
        // 只有第一次需要落库；再次触发是仓储层的空操作
        repo.expect_mark_expired()
            .times(1)
            .returning(|_, _| Ok(true));

        let service = ValidityService::new(Arc::new(repo));

        let first_check = service.check("abc").await.unwrap();
        let second_check = service.check("abc").await.unwrap();

        assert!(!first_check.valid);
        assert!(!second_check.valid);
        assert_eq!(second_check.status, CardStatus::Expired);
    }

    #[tokio::test]
    async fn test_missing_card_is_distinct_outcome() {
        let mut repo = MockCardRepositoryTrait::new();
        repo.expect_find_by_code().returning(|_| Ok(None));

        let service = ValidityService::new(Arc::new(repo));
        let err = service.check("missing").await.unwrap_err();

        assert!(matches!(err, CardError::CardNotFound(_)));
    }
}
