//! 仓储 Trait 定义
//!
//! 定义仓储接口，便于服务层依赖抽象而非具体实现，支持 mock 测试

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{Card, CardStatus, CardType, NewCard};

/// 卡密列表查询条件
#[derive(Debug, Clone, Default)]
pub struct CardListFilter {
    pub status: Option<CardStatus>,
    pub card_type: Option<CardType>,
    pub page: i64,
    pub page_size: i64,
}

/// 卡密仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardRepositoryTrait: Send + Sync {
    /// 插入新卡密，卡密码已存在时返回 `CardError::CodeCollision`
    async fn insert(&self, card: &NewCard) -> Result<Card>;

    /// 按卡密码查询
    async fn find_by_code(&self, code: &str) -> Result<Option<Card>>;

    /// 条件激活：仅当状态仍为 unused 时写入激活字段并迁移到 used
    ///
    /// 返回 `None` 表示条件更新未命中（卡密不存在或已不是 unused），
    /// 并发激活同一卡密时至多一个调用方得到 `Some`。
    async fn activate(
        &self,
        code: &str,
        activated_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        bound_user_info: &serde_json::Value,
    ) -> Result<Option<Card>>;

    /// 把已过有效期的 used 卡密落库为 expired（幂等）
    ///
    /// 返回是否实际发生了状态迁移；重复触发是无害的空操作。
    async fn mark_expired(&self, code: &str, now: DateTime<Utc>) -> Result<bool>;

    /// 删除卡密，返回是否存在并被删除
    async fn delete(&self, code: &str) -> Result<bool>;

    /// 分页查询卡密列表
    async fn list(&self, filter: &CardListFilter) -> Result<Vec<Card>>;

    /// 按条件统计卡密数量
    async fn count(&self, filter: &CardListFilter) -> Result<i64>;
}
