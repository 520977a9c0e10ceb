//! StubDecisioningClient - 固定レスポンスを返す decisioning クライアント
//!
//! # 用途
//! - テスト: 呼び出し回数・送信内容を検証する
//! - CLI の `--offline` 実行

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::delivery::{DeliveryRequest, DeliveryResponse};
use crate::domain::DeliveryError;
use crate::ports::DecisioningClient;

/// One call seen by the stub.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub session_id: String,
    pub request: DeliveryRequest,
}

enum StubReply {
    Respond(DeliveryResponse),
    Fail(DeliveryError),
}

pub struct StubDecisioningClient {
    reply: StubReply,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StubDecisioningClient {
    pub fn responding(response: DeliveryResponse) -> Self {
        Self {
            reply: StubReply::Respond(response),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: DeliveryError) -> Self {
        Self {
            reply: StubReply::Fail(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

#[async_trait]
impl DecisioningClient for StubDecisioningClient {
    async fn deliver(
        &self,
        session_id: &str,
        request: &DeliveryRequest,
    ) -> Result<DeliveryResponse, DeliveryError> {
        self.calls.lock().await.push(RecordedCall {
            session_id: session_id.to_string(),
            request: request.clone(),
        });

        match &self.reply {
            StubReply::Respond(response) => Ok(response.clone()),
            StubReply::Fail(error) => Err(error.clone()),
        }
    }
}
