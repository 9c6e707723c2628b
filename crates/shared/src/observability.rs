//! 日志初始化模块
//!
//! 统一初始化 tracing 订阅器，支持 pretty（本地开发）与 json（生产）两种输出格式。
//! 日志级别优先读取 RUST_LOG，其次使用配置中的 log_level。

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ObservabilityConfig;

/// 初始化全局日志订阅器
///
/// 进程内只能调用一次，重复初始化会返回错误。
pub fn init(service_name: &str, config: &ObservabilityConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if config.log_format == "json" {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_current_span(true))
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer())
            .try_init()?;
    }

    tracing::info!(service = service_name, "日志初始化完成");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent_guarded() {
        let config = ObservabilityConfig::default();
        // 第一次初始化成功，第二次因全局订阅器已设置而失败
        let first = init("test-service", &config);
        let second = init("test-service", &config);
        assert!(first.is_ok() || second.is_err());
    }
}
