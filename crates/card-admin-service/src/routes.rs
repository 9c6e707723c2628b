//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::{handlers, state::AppState};

/// 公开的卡密接口路由（内容网关、机器人等调用方）
pub fn card_routes() -> Router<AppState> {
    Router::new()
        .route("/verify", post(handlers::card::verify_card))
        .route("/activate", post(handlers::card::activate_card))
        .route("/status/{code}", get(handlers::card::card_status))
}

/// 管理端路由
///
/// 批量生成、列表查询、删除卡密
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/generate", post(handlers::admin::generate_cards))
        .route("/", get(handlers::admin::list_cards))
        .route("/{code}", delete(handlers::admin::revoke_card))
}
