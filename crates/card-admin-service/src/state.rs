//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use std::sync::Arc;

use sqlx::PgPool;

use card_service::{
    ActivationService, CardRepository, CodeGenerator, IssueService, ValidityService,
};
use card_shared::CardPolicyConfig;

/// Axum 应用共享状态
///
/// 持有数据库连接池、卡密策略和生命周期引擎的各服务实例，
/// 通过 Arc 在 handler 间共享。
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL 连接池
    pub pool: PgPool,
    /// 卡密策略配置
    pub policy: CardPolicyConfig,
    /// 卡密仓储（列表/删除等管理端直连操作）
    pub card_repo: Arc<CardRepository>,
    /// 发放服务
    pub issue_service: Arc<IssueService<CardRepository>>,
    /// 激活服务
    pub activation_service: Arc<ActivationService<CardRepository>>,
    /// 有效性查询服务
    pub validity_service: Arc<ValidityService<CardRepository>>,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(pool: PgPool, policy: CardPolicyConfig) -> Self {
        let card_repo = Arc::new(CardRepository::new(pool.clone()));
        let generator = CodeGenerator::from_policy(&policy);

        Self {
            pool,
            policy: policy.clone(),
            card_repo: card_repo.clone(),
            issue_service: Arc::new(IssueService::new(card_repo.clone(), generator, policy)),
            activation_service: Arc::new(ActivationService::new(card_repo.clone())),
            validity_service: Arc::new(ValidityService::new(card_repo)),
        }
    }
}
