//! Decision - 1 つの配置に対して返されたパーソナライズ結果
//!
//! content と tracking token は decisioning サービスのまま不透明な JSON として保持する。

use serde::{Deserialize, Serialize};

use super::errors::DeliveryError;

/// One placement the decisioning service returned content for.
///
/// Placements without eligible content are omitted rather than represented
/// as null, so every `Decision` carries content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub placement: String,
    pub content: serde_json::Value,
    pub tracking_token: serde_json::Value,
}

impl Decision {
    pub fn new(
        placement: impl Into<String>,
        content: serde_json::Value,
        tracking_token: serde_json::Value,
    ) -> Self {
        Self {
            placement: placement.into(),
            content,
            tracking_token,
        }
    }
}

/// Result of one remote decisioning round-trip.
///
/// The orchestrator collapses `RemoteError` into an empty decision list, so
/// a failure never reaches the response path as an error.
#[derive(Debug)]
pub enum DecisionOutcome {
    Delivered {
        decisions: Vec<Decision>,
        /// Authoritative long-term id echoed by the service, if any.
        tnt_id: Option<String>,
    },
    RemoteError(DeliveryError),
}
