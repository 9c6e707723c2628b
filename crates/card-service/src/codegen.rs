//! 卡密码生成器
//!
//! 生成定长 32 位的不透明卡密码，随机部分来自 UUIDv4（128 位熵），
//! 支持可配置前缀，前缀加随机后缀超长时截断到定长。
//! 生成器自身无副作用；唯一性由数据库唯一约束兜底，
//! 冲突时由发放层负责重新生成。

use card_shared::CardPolicyConfig;
use uuid::Uuid;

/// 卡密码固定长度
pub const CODE_LENGTH: usize = 32;

/// 卡密码生成器
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    prefix: String,
}

impl CodeGenerator {
    /// 创建生成器，前缀超过卡密码长度时截断
    pub fn new(prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        prefix.truncate(CODE_LENGTH);
        Self { prefix }
    }

    /// 从卡密策略配置创建生成器
    pub fn from_policy(policy: &CardPolicyConfig) -> Self {
        Self::new(policy.code_prefix.clone())
    }

    /// 生成一个卡密码
    ///
    /// 前缀 + 32 位十六进制随机串，截断到固定长度。
    pub fn generate(&self) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        let mut code = format!("{}{}", self.prefix, suffix);
        code.truncate(CODE_LENGTH);
        code
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_code_has_fixed_length() {
        let generator = CodeGenerator::default();
        assert_eq!(generator.generate().len(), CODE_LENGTH);

        let generator = CodeGenerator::new("vip-");
        assert_eq!(generator.generate().len(), CODE_LENGTH);
    }

    #[test]
    fn test_prefix_is_preserved() {
        let generator = CodeGenerator::new("gift");
        let code = generator.generate();
        assert!(code.starts_with("gift"));
        assert_eq!(code.len(), CODE_LENGTH);
    }

    #[test]
    fn test_overlong_prefix_is_truncated() {
        let generator = CodeGenerator::new("x".repeat(40));
        let code = generator.generate();
        assert_eq!(code.len(), CODE_LENGTH);
        assert_eq!(code, "x".repeat(32));
    }

    #[test]
    fn test_codes_are_unique_across_many_generations() {
        let generator = CodeGenerator::default();
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(generator.generate()), "卡密码出现重复");
        }
    }

    #[test]
    fn test_from_policy_uses_configured_prefix() {
        let policy = CardPolicyConfig {
            code_prefix: "cg".to_string(),
            ..Default::default()
        };
        let generator = CodeGenerator::from_policy(&policy);
        assert!(generator.generate().starts_with("cg"));
    }
}
