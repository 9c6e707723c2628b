//! 卡密过期处理 Worker
//!
//! 定期扫描已过有效期但状态仍为 used 的卡密，批量落库为 expired。
//! 这是读路径惰性过期之外的主动清理，属于优化而非正确性依赖：
//! 即使 Worker 不运行，有效性查询也会在下次读取时自我修正。
//!
//! 使用 `FOR UPDATE SKIP LOCKED` 保证多实例部署时不会重复处理

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{error, info};

/// 过期处理 Worker
///
/// 以固定间隔轮询数据库，把已到期的 used 卡密批量迁移为 expired。
/// 设计为可在多实例环境中安全运行。
pub struct ExpireWorker {
    pool: PgPool,
    /// 轮询间隔（建议 300 秒）
    poll_interval: Duration,
    /// 每批处理的最大记录数
    batch_size: i64,
}

/// 已到期的卡密记录
#[derive(sqlx::FromRow)]
struct ExpiredCard {
    id: i64,
    code: String,
    expires_at: DateTime<Utc>,
}

impl ExpireWorker {
    /// 创建 ExpireWorker 实例
    pub fn new(pool: PgPool, poll_interval_secs: u64, batch_size: i64) -> Self {
        Self {
            pool,
            poll_interval: Duration::from_secs(poll_interval_secs),
            batch_size,
        }
    }

    /// 使用默认配置创建 ExpireWorker
    pub fn with_defaults(pool: PgPool) -> Self {
        Self::new(pool, 300, 500)
    }

    /// 主循环：持续处理过期卡密直到进程退出
    pub async fn run(&self) {
        info!(
            poll_interval = ?self.poll_interval,
            batch_size = self.batch_size,
            "ExpireWorker 已启动"
        );

        loop {
            if let Err(e) = self.process_expired_cards().await {
                error!(error = %e, "处理过期卡密出错");
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// 处理一批已到期的卡密
    ///
    /// 与读路径的惰性落库复用同一条状态条件，两边并发触碰同一张卡密时
    /// 后到的一方是空操作。
    async fn process_expired_cards(&self) -> Result<(), sqlx::Error> {
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        let cards = sqlx::query_as::<_, ExpiredCard>(
            r#"
            SELECT id, code, expires_at
            FROM cards
            WHERE status = 'used'
              AND expires_at IS NOT NULL
              AND expires_at <= $1
            ORDER BY expires_at ASC
            FOR UPDATE SKIP LOCKED
            LIMIT $2
            "#,
        )
        .bind(now)
        .bind(self.batch_size)
        .fetch_all(&mut *tx)
        .await?;

        if cards.is_empty() {
            tx.rollback().await?;
            return Ok(());
        }

        let ids: Vec<i64> = cards.iter().map(|c| c.id).collect();
        let count = ids.len();

        sqlx::query(
            r#"
            UPDATE cards
            SET status = 'expired', updated_at = NOW()
            WHERE id = ANY($1)
            "#,
        )
        .bind(&ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        for card in &cards {
            info!(
                card_id = card.id,
                code = %card.code,
                expires_at = %card.expires_at,
                "卡密到期，状态已落库为 expired"
            );
        }

        info!(count, "过期卡密处理完成");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_expire_worker_defaults() {
        let pool = sqlx::PgPool::connect_lazy("postgres://localhost/test").unwrap();
        let worker = ExpireWorker::with_defaults(pool);

        assert_eq!(worker.poll_interval.as_secs(), 300);
        assert_eq!(worker.batch_size, 500);
    }

    #[tokio::test]
    async fn test_expire_worker_custom_config() {
        let pool = sqlx::PgPool::connect_lazy("postgres://localhost/test").unwrap();
        let worker = ExpireWorker::new(pool, 60, 100);

        assert_eq!(worker.poll_interval.as_secs(), 60);
        assert_eq!(worker.batch_size, 100);
    }
}
