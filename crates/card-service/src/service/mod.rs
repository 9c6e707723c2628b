//! 业务服务层

pub mod dto;

mod activation_service;
mod issue_service;
mod validity_service;

pub use activation_service::ActivationService;
pub use dto::{CardValidity, IssueBatchOutcome, IssueBatchRequest};
pub use issue_service::IssueService;
pub use validity_service::ValidityService;
