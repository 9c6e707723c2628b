//! 共享库
//!
//! 包含各服务共用的配置加载、数据库连接、日志初始化等基础设施代码。

pub mod config;
pub mod database;
pub mod error;
pub mod observability;

pub use config::{AppConfig, CardPolicyConfig, DatabaseConfig, ObservabilityConfig, ServerConfig};
pub use database::Database;
pub use error::{Result, SharedError};
