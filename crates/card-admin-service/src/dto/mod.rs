//! REST API 请求/响应 DTO

mod request;
mod response;

pub use request::{
    ActivateCardRequest, CardListQuery, GenerateCardsRequest, RevokeCardRequest, VerifyCardRequest,
};
pub use response::{ApiResponse, CardDto, CardValidityDto, GenerateCardsResponse, PageResponse};
