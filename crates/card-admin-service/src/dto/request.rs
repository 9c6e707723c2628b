//! 请求 DTO 定义
//!
//! 卡密类型在请求中以字符串出现，由处理器解析并校验，
//! 无法识别的类型统一返回 VALIDATION_ERROR。

use serde::Deserialize;
use validator::Validate;

/// 卡密验证请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCardRequest {
    #[validate(length(min = 1, max = 32, message = "卡密码长度必须在 1-32 之间"))]
    pub code: String,
}

/// 卡密激活请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ActivateCardRequest {
    #[validate(length(min = 1, max = 32, message = "卡密码长度必须在 1-32 之间"))]
    pub code: String,
    /// 激活者信息（不透明元数据，激活时一次性绑定）
    pub metadata: Option<serde_json::Value>,
}

/// 批量生成卡密请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCardsRequest {
    /// 卡密类型：day / month / year / custom
    pub card_type: String,
    #[validate(range(min = 1, message = "生成数量必须大于 0"))]
    pub count: u32,
    /// 有效期天数覆盖（custom 类型常用，其他类型也允许）
    #[validate(range(min = 1, max = 36500, message = "有效期天数必须在 1-36500 之间"))]
    pub duration_days: Option<i32>,
    #[validate(length(min = 1, max = 64, message = "发放人不能为空"))]
    pub issuer: String,
    #[validate(length(max = 255, message = "备注不能超过 255 字符"))]
    pub remark: Option<String>,
}

/// 删除卡密请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RevokeCardRequest {
    #[validate(length(min = 1, max = 64, message = "请求人不能为空"))]
    pub requester: String,
}

/// 卡密列表查询参数
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CardListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    /// 按状态过滤：unused / used / expired
    pub status: Option<String>,
    /// 按类型过滤：day / month / year / custom
    pub card_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_validation() {
        let req = GenerateCardsRequest {
            card_type: "month".to_string(),
            count: 10,
            duration_days: None,
            issuer: "admin".to_string(),
            remark: None,
        };
        assert!(req.validate().is_ok());

        let req = GenerateCardsRequest {
            card_type: "month".to_string(),
            count: 0,
            duration_days: None,
            issuer: "admin".to_string(),
            remark: None,
        };
        assert!(req.validate().is_err());

        let req = GenerateCardsRequest {
            card_type: "custom".to_string(),
            count: 1,
            duration_days: Some(0),
            issuer: "admin".to_string(),
            remark: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_verify_request_rejects_overlong_code() {
        let req = VerifyCardRequest {
            code: "x".repeat(33),
        };
        assert!(req.validate().is_err());

        let req = VerifyCardRequest { code: String::new() };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_request_deserializes_camel_case() {
        let req: GenerateCardsRequest = serde_json::from_str(
            r#"{"cardType": "day", "count": 3, "issuer": "bot-1", "durationDays": 7}"#,
        )
        .unwrap();
        assert_eq!(req.card_type, "day");
        assert_eq!(req.count, 3);
        assert_eq!(req.duration_days, Some(7));
    }
}
