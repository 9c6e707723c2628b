//! 卡密激活服务
//!
//! unused -> used 的一次性状态迁移。迁移通过持久层条件更新完成，
//! 并发激活同一卡密时有且仅有一个调用方成功，其余得到 `AlreadyActivated`。

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use crate::error::{CardError, Result};
use crate::models::{Card, CardStatus};
use crate::repository::CardRepositoryTrait;

/// 卡密激活服务
pub struct ActivationService<CR>
where
    CR: CardRepositoryTrait,
{
    repo: Arc<CR>,
}

impl<CR> ActivationService<CR>
where
    CR: CardRepositoryTrait,
{
    pub fn new(repo: Arc<CR>) -> Self {
        Self { repo }
    }

    /// 激活卡密
    ///
    /// 读取卡密以取得有效期天数，计算过期时间后执行条件更新。
    /// 条件更新未命中说明输掉了并发竞争（或卡密已被删除），
    /// 此时回读一次以区分 `AlreadyActivated` 和 `CardNotFound`。
    #[instrument(skip(self, metadata))]
    pub async fn activate(&self, code: &str, metadata: serde_json::Value) -> Result<Card> {
        let card = self
            .repo
            .find_by_code(code)
            .await?
            .ok_or_else(|| CardError::CardNotFound(code.to_string()))?;

        // 快速失败：已经不是 unused 的卡密不必再走条件更新
        if card.status != CardStatus::Unused {
            return Err(CardError::AlreadyActivated {
                code: code.to_string(),
                current_status: card.status.to_string(),
            });
        }

        let now = Utc::now();
        let expires_at = Card::expiry_from(now, card.duration_days);

        match self.repo.activate(code, now, expires_at, &metadata).await? {
            Some(activated) => {
                info!(
                    code = %activated.code,
                    card_type = %activated.card_type,
                    expires_at = %expires_at,
                    "卡密激活成功"
                );
                Ok(activated)
            }
            None => {
                // 条件更新未命中：竞争失败或已删除
                match self.repo.find_by_code(code).await? {
                    Some(current) => Err(CardError::AlreadyActivated {
                        code: code.to_string(),
                        current_status: current.status.to_string(),
                    }),
                    None => Err(CardError::CardNotFound(code.to_string())),
                }
            }
        }
    }
}
