//! 卡密仓储
//!
//! 卡密表的数据访问。激活与过期落库都采用带状态条件的原子更新，
//! 不做先查后写的进程内判断，保证并发下的状态迁移正确性。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::traits::{CardListFilter, CardRepositoryTrait};
use crate::error::{CardError, Result};
use crate::models::{Card, NewCard};

/// 卡密行的完整字段列表，所有返回实体的查询共用
const CARD_COLUMNS: &str = "id, code, card_type, duration_days, status, activated_at, \
     expires_at, bound_user_info, issued_by, assigned_to, remark, created_at, updated_at";

/// 卡密仓储
pub struct CardRepository {
    pool: PgPool,
}

impl CardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 插入新卡密
    ///
    /// 卡密码带唯一约束，违反唯一性时映射为 `CodeCollision`，
    /// 由发放层重新生成卡密码后重试。
    pub async fn insert(&self, card: &NewCard) -> Result<Card> {
        let sql = format!(
            r#"
            INSERT INTO cards (code, card_type, duration_days, status, issued_by, remark, created_at, updated_at)
            VALUES ($1, $2, $3, 'unused', $4, $5, NOW(), NOW())
            RETURNING {CARD_COLUMNS}
            "#
        );

        let inserted = sqlx::query_as::<_, Card>(&sql)
            .bind(&card.code)
            .bind(card.card_type)
            .bind(card.duration_days)
            .bind(&card.issued_by)
            .bind(&card.remark)
            .fetch_one(&self.pool)
            .await;

        match inserted {
            Ok(card) => Ok(card),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(CardError::CodeCollision(card.code.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 按卡密码查询
    pub async fn find_by_code(&self, code: &str) -> Result<Option<Card>> {
        let sql = format!("SELECT {CARD_COLUMNS} FROM cards WHERE code = $1");

        let card = sqlx::query_as::<_, Card>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(card)
    }

    /// 条件激活（unused -> used 的唯一写入口）
    ///
    /// 激活字段与状态在同一条语句内写入：要么整体提交，要么整体未发生，
    /// 不会出现 activated_at 已写入而状态仍为 unused 的中间态。
    pub async fn activate(
        &self,
        code: &str,
        activated_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        bound_user_info: &serde_json::Value,
    ) -> Result<Option<Card>> {
        let sql = format!(
            r#"
            UPDATE cards
            SET status = 'used', activated_at = $2, expires_at = $3,
                bound_user_info = $4, updated_at = NOW()
            WHERE code = $1 AND status = 'unused'
            RETURNING {CARD_COLUMNS}
            "#
        );

        let card = sqlx::query_as::<_, Card>(&sql)
            .bind(code)
            .bind(activated_at)
            .bind(expires_at)
            .bind(bound_user_info)
            .fetch_optional(&self.pool)
            .await?;

        Ok(card)
    }

    /// 过期落库（used -> expired，幂等）
    ///
    /// 状态与过期时间同时作为更新条件，已落库为 expired 的卡密
    /// 和尚未到期的卡密都不会被触碰。
    pub async fn mark_expired(&self, code: &str, now: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE cards
            SET status = 'expired', updated_at = NOW()
            WHERE code = $1 AND status = 'used'
              AND expires_at IS NOT NULL AND expires_at <= $2
            "#,
        )
        .bind(code)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 删除卡密
    pub async fn delete(&self, code: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cards WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 分页查询卡密列表
    pub async fn list(&self, filter: &CardListFilter) -> Result<Vec<Card>> {
        let page = filter.page.max(1);
        let page_size = filter.page_size.clamp(1, 200);
        let sql = format!(
            r#"
            SELECT {CARD_COLUMNS}
            FROM cards
            WHERE ($1::varchar IS NULL OR status = $1)
              AND ($2::varchar IS NULL OR card_type = $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#
        );

        let cards = sqlx::query_as::<_, Card>(&sql)
            .bind(filter.status)
            .bind(filter.card_type)
            .bind(page_size)
            .bind((page - 1) * page_size)
            .fetch_all(&self.pool)
            .await?;

        Ok(cards)
    }

    /// 按条件统计卡密数量
    pub async fn count(&self, filter: &CardListFilter) -> Result<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM cards
            WHERE ($1::varchar IS NULL OR status = $1)
              AND ($2::varchar IS NULL OR card_type = $2)
            "#,
        )
        .bind(filter.status)
        .bind(filter.card_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}

#[async_trait]
impl CardRepositoryTrait for CardRepository {
    async fn insert(&self, card: &NewCard) -> Result<Card> {
        self.insert(card).await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Card>> {
        self.find_by_code(code).await
    }

    async fn activate(
        &self,
        code: &str,
        activated_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        bound_user_info: &serde_json::Value,
    ) -> Result<Option<Card>> {
        self.activate(code, activated_at, expires_at, bound_user_info)
            .await
    }

    async fn mark_expired(&self, code: &str, now: DateTime<Utc>) -> Result<bool> {
        self.mark_expired(code, now).await
    }

    async fn delete(&self, code: &str) -> Result<bool> {
        self.delete(code).await
    }

    async fn list(&self, filter: &CardListFilter) -> Result<Vec<Card>> {
        self.list(filter).await
    }

    async fn count(&self, filter: &CardListFilter) -> Result<i64> {
        self.count(filter).await
    }
}
