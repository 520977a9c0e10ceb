//! DecisionOrchestrator - identity + 配置キー → decisions + 更新後の identity
//!
//! # フロー
//! 1. payload 構築（配置が空ならリモートを呼ばない）
//! 2. リモート呼び出し → DecisionOutcome
//! 3. settle: 成功なら decisions を採用し、リモートの tntId で上書き
//!
//! personalization は best-effort。リモート失敗は空の decisions に畳み、
//! identity はそのまま。ここからエラーは返さない。

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::delivery::{DecisionRequestBuilder, DecisionResponseMapper, DeliveryRequest};
use crate::domain::{Decision, DecisionOutcome, PlacementRequest, VisitorIdentity};
use crate::ports::DecisioningClient;

pub struct DecisionOrchestrator {
    client: Arc<dyn DecisioningClient>,
    builder: DecisionRequestBuilder,
}

impl DecisionOrchestrator {
    pub fn new(client: Arc<dyn DecisioningClient>, builder: DecisionRequestBuilder) -> Self {
        Self { client, builder }
    }

    pub async fn orchestrate(
        &self,
        identity: VisitorIdentity,
        placements: &PlacementRequest,
    ) -> (Vec<Decision>, VisitorIdentity) {
        let Some(payload) = self.builder.build(&identity, placements) else {
            debug!(session_id = %identity.session_id, "no placements requested; skipping decisioning call");
            return (Vec::new(), identity);
        };

        let outcome = self.fetch(&identity.session_id, &payload).await;
        Self::settle(outcome, identity)
    }

    /// One remote round-trip as a typed outcome.
    pub async fn fetch(&self, session_id: &str, payload: &DeliveryRequest) -> DecisionOutcome {
        DecisionResponseMapper::outcome(self.client.deliver(session_id, payload).await)
    }

    /// Collapse an outcome into what the response phase needs.
    pub fn settle(
        outcome: DecisionOutcome,
        mut identity: VisitorIdentity,
    ) -> (Vec<Decision>, VisitorIdentity) {
        match outcome {
            DecisionOutcome::Delivered { decisions, tnt_id } => {
                if let Some(remote) = tnt_id {
                    let previous = identity.tnt_id.clone();
                    match identity.adopt_remote_tnt_id(&remote) {
                        Ok(true) => {
                            info!(previous = %previous, tnt_id = %remote, "adopted tnt_id from decisioning service");
                        }
                        Ok(false) => {}
                        Err(err) => {
                            warn!(error = %err, tnt_id = %previous, "refusing remote tnt_id; keeping local one");
                        }
                    }
                }
                debug!(
                    session_id = %identity.session_id,
                    decisions = decisions.len(),
                    "decisioning call succeeded"
                );
                (decisions, identity)
            }
            DecisionOutcome::RemoteError(err) => {
                warn!(
                    session_id = %identity.session_id,
                    error = %err,
                    "decisioning call failed; continuing without personalization"
                );
                (Vec::new(), identity)
            }
        }
    }
}
