//! 卡密管理服务
//!
//! 对外暴露卡密生命周期引擎的 REST 接口：
//! 验证/激活/状态查询（内容网关、机器人等调用方），
//! 以及批量生成、列表、删除等管理端操作。
//! 同时托管可选的过期清理后台 Worker。

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod worker;

pub use error::{AdminError, Result};
pub use state::AppState;
