//! Delivery - decisioning サービスとの payload 形状
//!
//! - **request**: 送信 payload と DecisionRequestBuilder
//! - **response**: 受信レスポンスと DecisionResponseMapper

pub mod request;
pub mod response;

pub use self::request::{DecisionRequestBuilder, DeliveryRequest, MboxRequest};
pub use self::response::{DecisionResponseMapper, DeliveryResponse, MboxResponse};
