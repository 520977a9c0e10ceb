//! DecisioningClient port - リモート decisioning サービスへの呼び出し
//!
//! タイムアウトは実装側（HTTP クライアント）が持つ。

use async_trait::async_trait;

use crate::delivery::{DeliveryRequest, DeliveryResponse};
use crate::domain::DeliveryError;

/// DecisioningClient は payload を送って生のレスポンスを返す
///
/// # 設計原則
/// - `session_id` は URL クエリにも載せる（body にも session 継続性が入る）
/// - 非 2xx・タイムアウト・デコード失敗はすべて `DeliveryError` で返す（panic しない）
#[async_trait]
pub trait DecisioningClient: Send + Sync {
    async fn deliver(
        &self,
        session_id: &str,
        request: &DeliveryRequest,
    ) -> Result<DeliveryResponse, DeliveryError>;
}
