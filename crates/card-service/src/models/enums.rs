//! 卡密枚举类型定义
//!
//! 所有枚举都支持数据库（sqlx）和 JSON（serde）序列化

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 卡密类型
///
/// 决定激活后的默认有效期天数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum CardType {
    /// 天卡 - 1 天
    Day,
    /// 月卡 - 30 天
    #[default]
    Month,
    /// 年卡 - 365 天
    Year,
    /// 自定义 - 发放时指定天数，未指定时回退为 30 天
    Custom,
}

impl CardType {
    /// 按类型查表得到默认有效期天数
    ///
    /// day=1, month=30, year=365；custom 没有固定天数，回退为 30
    pub fn default_duration_days(&self) -> i32 {
        match self {
            Self::Day => 1,
            Self::Month => 30,
            Self::Year => 365,
            Self::Custom => 30,
        }
    }

    /// 实际有效期天数：调用方显式覆盖优先，否则按类型取默认值
    pub fn duration_days(&self, duration_override: Option<i32>) -> i32 {
        duration_override.unwrap_or_else(|| self.default_duration_days())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            "custom" => Ok(Self::Custom),
            other => Err(format!(
                "无效的卡密类型: {other}，可选值: day, month, year, custom"
            )),
        }
    }
}

/// 卡密状态
///
/// 状态迁移单向：unused -> used -> expired，没有回退路径
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum CardStatus {
    /// 未使用 - 已发放但尚未激活
    #[default]
    Unused,
    /// 已使用 - 已激活且在有效期内
    Used,
    /// 已过期 - 有效期结束
    Expired,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unused => "unused",
            Self::Used => "used",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
