//! 卡密发放服务
//!
//! 处理卡密发放的核心业务逻辑：
//! - 批量数量上限检查（上限来自显式传入的策略配置）
//! - 逐张生成卡密码并入库，唯一约束兜底
//! - 卡密码冲突时有界重试，重试耗尽的卡密计入失败数
//!
//! 批内各卡密之间相互独立，允许部分成功；调用方拿到的是
//! 实际入库的卡密清单。

use std::sync::Arc;

use tracing::{info, instrument, warn};

use card_shared::CardPolicyConfig;

use crate::codegen::CodeGenerator;
use crate::error::{CardError, Result};
use crate::models::{Card, NewCard};
use crate::repository::CardRepositoryTrait;
use crate::service::dto::{IssueBatchOutcome, IssueBatchRequest};

/// 卡密发放服务
pub struct IssueService<CR>
where
    CR: CardRepositoryTrait,
{
    repo: Arc<CR>,
    generator: CodeGenerator,
    policy: CardPolicyConfig,
}

impl<CR> IssueService<CR>
where
    CR: CardRepositoryTrait,
{
    pub fn new(repo: Arc<CR>, generator: CodeGenerator, policy: CardPolicyConfig) -> Self {
        Self {
            repo,
            generator,
            policy,
        }
    }

    /// 批量发放卡密
    ///
    /// 全部卡密重试耗尽时返回 `IssuanceFailed`；部分成功时正常返回，
    /// 失败数量记录在结果中。
    #[instrument(skip(self, request), fields(card_type = %request.card_type, count = request.count))]
    pub async fn issue_batch(&self, request: IssueBatchRequest) -> Result<IssueBatchOutcome> {
        if request.count == 0 {
            return Err(CardError::Validation("生成数量必须大于 0".to_string()));
        }
        if request.count > self.policy.batch_cap {
            return Err(CardError::Validation(format!(
                "生成数量超过上限: {} > {}",
                request.count, self.policy.batch_cap
            )));
        }
        if request.issued_by.is_empty() {
            return Err(CardError::Validation("发放人不能为空".to_string()));
        }

        let mut cards = Vec::with_capacity(request.count as usize);
        let mut failed = 0u32;

        for _ in 0..request.count {
            match self.issue_one(&request).await {
                Ok(card) => cards.push(card),
                Err(CardError::IssuanceFailed { attempts }) => {
                    warn!(attempts, "单张卡密生成重试耗尽，跳过");
                    failed += 1;
                }
                Err(e) => return Err(e),
            }
        }

        if cards.is_empty() {
            return Err(CardError::IssuanceFailed {
                attempts: self.policy.code_retries,
            });
        }

        info!(
            issued = cards.len(),
            failed,
            card_type = %request.card_type,
            issued_by = %request.issued_by,
            "批量发放完成"
        );

        Ok(IssueBatchOutcome {
            requested: request.count,
            failed,
            cards,
        })
    }

    /// 发放单张卡密
    ///
    /// 生成卡密码并入库；数据库唯一约束报冲突时重新生成，
    /// 最多重试 `policy.code_retries` 次。
    async fn issue_one(&self, request: &IssueBatchRequest) -> Result<Card> {
        let retries = self.policy.code_retries.max(1);

        for attempt in 1..=retries {
            let code = self.generator.generate();
            let new_card = NewCard::new(
                code,
                request.card_type,
                request.duration_days,
                request.issued_by.clone(),
                request.remark.clone(),
            )?;

            match self.repo.insert(&new_card).await {
                Ok(card) => return Ok(card),
                Err(CardError::CodeCollision(code)) => {
                    warn!(attempt, code = %code, "卡密码冲突，重新生成");
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Err(CardError::IssuanceFailed { attempts: retries })
    }
}
