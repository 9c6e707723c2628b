//! 卡密生命周期引擎
//!
//! 管理访问卡密从生成、激活到过期的完整生命周期。
//!
//! ## 核心功能
//!
//! - **卡密生成**：32 位不可猜测的卡密码，支持可配置前缀
//! - **批量发放**：按类型批量生成卡密，冲突时有界重试
//! - **一次性激活**：unused -> used 的状态迁移借助持久层条件更新，
//!   并发激活同一卡密时有且仅有一个调用方成功
//! - **有效性查询**：每次读取重新推导有效性，过期状态惰性落库
//!
//! ## 模块结构
//!
//! - `models`: 领域模型定义（卡密实体、类型与状态枚举）
//! - `codegen`: 卡密码生成器
//! - `error`: 错误类型定义
//! - `repository`: 数据库仓储层
//! - `service`: 业务服务层

pub mod codegen;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use codegen::{CODE_LENGTH, CodeGenerator};
pub use error::{CardError, Result};
pub use models::{Card, CardStatus, CardType, NewCard};
pub use repository::{CardListFilter, CardRepository, CardRepositoryTrait};
pub use service::{
    ActivationService, CardValidity, IssueBatchOutcome, IssueBatchRequest, IssueService,
    ValidityService, dto,
};
