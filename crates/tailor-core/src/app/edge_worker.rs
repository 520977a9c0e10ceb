//! EdgeWorker - 1 HTTP トランザクションの 2 つのエントリポイント
//!
//! - `on_request`: Cookie → VisitorIdentity → decisioning → TransactionState
//! - `on_response`: TransactionState → Set-Cookie（＋任意で decisions ヘッダー）
//!
//! `on_request` が返した TransactionState を `on_response` が所有権ごと受け取る。
//! トランザクション間で共有される可変状態はない。

use std::sync::Arc;

use tracing::{debug, warn};

use crate::app::{CookieWriter, DecisionOrchestrator};
use crate::config::EdgeConfig;
use crate::domain::{Decision, EdgeRequest, HeaderField, TransactionState};
use crate::identity::IdentityResolver;
use crate::ports::{Clock, IdGenerator, PlacementResolver};

/// What the request phase hands back to the edge runtime.
#[derive(Debug, Clone)]
pub struct RequestPhase {
    /// Headers to add to the request forwarded to origin.
    pub forward_headers: Vec<HeaderField>,

    /// Carried into [`EdgeWorker::on_response`] for the same transaction.
    pub state: TransactionState,
}

pub struct EdgeWorker {
    clock: Arc<dyn Clock>,
    resolver: IdentityResolver<Arc<dyn IdGenerator>>,
    placements: Arc<dyn PlacementResolver>,
    orchestrator: DecisionOrchestrator,
    cookie_writer: CookieWriter,
    identity_cookie_name: String,
    decisions_header: String,
    emit_decisions_on_response: bool,
}

impl EdgeWorker {
    pub fn new(
        config: &EdgeConfig,
        clock: Arc<dyn Clock>,
        id_gen: Arc<dyn IdGenerator>,
        placements: Arc<dyn PlacementResolver>,
        orchestrator: DecisionOrchestrator,
    ) -> Self {
        Self {
            clock,
            resolver: IdentityResolver::new(id_gen, config),
            placements,
            orchestrator,
            cookie_writer: CookieWriter::new(config),
            identity_cookie_name: config.identity_cookie_name.clone(),
            decisions_header: config.decisions_header.clone(),
            emit_decisions_on_response: config.emit_decisions_on_response,
        }
    }

    pub async fn on_request(&self, request: &EdgeRequest) -> RequestPhase {
        let now = self.clock.epoch_secs();
        let identity = self
            .resolver
            .resolve(request.cookie(&self.identity_cookie_name), now);
        let placements = self.placements.resolve(request);
        debug!(
            path = %request.path,
            session_id = %identity.session_id,
            tnt_id = %identity.tnt_id,
            placements = placements.len(),
            "request phase"
        );

        let (decisions, identity) = self.orchestrator.orchestrate(identity, &placements).await;

        let forward_headers = self.decisions_header_field(&decisions).into_iter().collect();
        RequestPhase {
            forward_headers,
            state: TransactionState::new(identity, placements).with_decisions(decisions),
        }
    }

    /// Always yields the identity cookie, even when the decisioning call failed.
    pub fn on_response(&self, state: TransactionState) -> Vec<HeaderField> {
        let now = self.clock.epoch_secs();
        let mut headers = self.cookie_writer.write(&state.identity, now);
        if self.emit_decisions_on_response
            && let Some(field) = self.decisions_header_field(&state.decisions)
        {
            headers.push(field);
        }
        headers
    }

    fn decisions_header_field(&self, decisions: &[Decision]) -> Option<HeaderField> {
        match serde_json::to_string(decisions) {
            Ok(json) => Some(HeaderField::new(self.decisions_header.clone(), json)),
            Err(err) => {
                warn!(error = %err, "failed to serialize decisions header");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::delivery::{DecisionRequestBuilder, DeliveryResponse};
    use crate::domain::DeliveryError;
    use crate::impls::{StaticPlacementMap, StubDecisioningClient};
    use crate::ports::{FixedClock, SequentialIdGenerator};

    const NOW: i64 = 1_700_000_000;

    fn config() -> EdgeConfig {
        let mut config = EdgeConfig::default();
        config
            .placements
            .insert("/".to_string(), vec!["hero".to_string(), "footer".to_string()]);
        config
    }

    fn worker(config: &EdgeConfig, stub: Arc<StubDecisioningClient>) -> EdgeWorker {
        EdgeWorker::new(
            config,
            Arc::new(FixedClock::at_epoch_secs(NOW)),
            Arc::new(SequentialIdGenerator::new()),
            Arc::new(StaticPlacementMap::new(config)),
            DecisionOrchestrator::new(stub, DecisionRequestBuilder::new(&config.delivery)),
        )
    }

    fn remote_response() -> DeliveryResponse {
        serde_json::from_value(json!({
            "id": { "tntId": "remote.35_0" },
            "execute": {
                "mboxes": [{
                    "name": "hero",
                    "options": [{ "content": "<h1>hi</h1>" }],
                    "metrics": [{ "analytics": { "payload": { "tnta": "T1" } } }]
                }]
            }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn first_visit_full_transaction() {
        let config = config();
        let stub = Arc::new(StubDecisioningClient::responding(remote_response()));
        let w = worker(&config, stub.clone());

        let phase = w.on_request(&EdgeRequest::new("/")).await;
        assert_eq!(phase.state.identity.tnt_id, "remote.35_0");
        assert_eq!(phase.state.identity.session_id, "00000000000000000000000000000001");
        assert_eq!(phase.state.placements.keys(), ["hero", "footer"]);

        let calls = stub.calls().await;
        assert_eq!(calls[0].session_id, "00000000000000000000000000000001");
        assert_eq!(calls[0].request.id.tnt_id, "00000000000000000000000000000001");

        assert_eq!(phase.forward_headers.len(), 1);
        assert_eq!(phase.forward_headers[0].name, "x-tailor-decisions");
        let decisions: serde_json::Value =
            serde_json::from_str(&phase.forward_headers[0].value).unwrap();
        assert_eq!(
            decisions,
            json!([{ "placement": "hero", "content": "<h1>hi</h1>", "trackingToken": "T1" }])
        );

        let headers = w.on_response(phase.state);
        assert_eq!(
            headers,
            vec![
                HeaderField::new(
                    "Set-Cookie",
                    format!(
                        "mbox=session#00000000000000000000000000000001#{}|PC#remote.35_0#{}; Max-Age=63244801",
                        NOW + 1860,
                        NOW + 63_244_801
                    )
                ),
                HeaderField::new("Set-Cookie", "mboxEdgeCluster=35; Max-Age=1860"),
            ]
        );
    }

    #[tokio::test]
    async fn returning_visitor_keeps_ids() {
        let config = config();
        let stub = Arc::new(StubDecisioningClient::responding(DeliveryResponse::default()));
        let w = worker(&config, stub.clone());

        let cookie = format!("mbox=session#S1#{}|PC#V1.12_0#{}", NOW + 60, NOW + 1000);
        let req = EdgeRequest::new("/").with_header("Cookie", cookie);
        let phase = w.on_request(&req).await;

        assert_eq!(phase.state.identity.session_id, "S1");
        assert_eq!(phase.state.identity.tnt_id, "V1.12_0");
        assert_eq!(stub.calls().await[0].session_id, "S1");
    }

    #[tokio::test]
    async fn identity_cookie_in_second_quoted_cookie_field() {
        let config = config();
        let stub = Arc::new(StubDecisioningClient::responding(DeliveryResponse::default()));
        let w = worker(&config, stub.clone());

        let cookie = format!("mbox=\"session#S1#{}|PC#V1.12_0#{}\"", NOW + 60, NOW + 1000);
        let req = EdgeRequest::new("/")
            .with_header("Cookie", "theme=dark; lang=ja")
            .with_header("Cookie", cookie);
        let phase = w.on_request(&req).await;

        assert_eq!(phase.state.identity.session_id, "S1");
        assert_eq!(phase.state.identity.tnt_id, "V1.12_0");
        assert_eq!(stub.calls().await[0].request.id.tnt_id, "V1.12_0");
    }

    #[tokio::test]
    async fn failed_decisioning_still_writes_cookies() {
        let config = config();
        let stub = Arc::new(StubDecisioningClient::failing(DeliveryError::Timeout));
        let w = worker(&config, stub);

        let cookie = format!("mbox=session#S1#{}|PC#V1.12_0#{}", NOW - 5, NOW + 1000);
        let phase = w
            .on_request(&EdgeRequest::new("/").with_header("cookie", cookie))
            .await;
        assert!(phase.state.decisions.is_empty());
        assert_eq!(phase.forward_headers[0].value, "[]");
        assert_eq!(phase.state.identity.tnt_id, "V1.12_0");
        assert_ne!(phase.state.identity.session_id, "S1");

        let headers = w.on_response(phase.state);
        assert_eq!(headers.len(), 2);
        assert!(headers[0].value.contains("|PC#V1.12_0#"));
        assert_eq!(headers[1].value, "mboxEdgeCluster=12; Max-Age=1860");
    }

    #[tokio::test]
    async fn unknown_path_makes_no_call_but_sets_cookie() {
        let config = config();
        let stub = Arc::new(StubDecisioningClient::responding(remote_response()));
        let w = worker(&config, stub.clone());

        let phase = w.on_request(&EdgeRequest::new("/cart")).await;
        assert_eq!(stub.call_count().await, 0);
        assert!(phase.state.placements.is_empty());

        // locally generated id has no cluster shape
        let headers = w.on_response(phase.state);
        assert_eq!(headers.len(), 1);
        assert!(headers[0].value.starts_with("mbox=session#"));
    }

    #[tokio::test]
    async fn query_placements_override_path_table() {
        let config = config();
        let stub = Arc::new(StubDecisioningClient::responding(DeliveryResponse::default()));
        let w = worker(&config, stub.clone());

        w.on_request(&EdgeRequest::new("/cart").with_query("mboxes=promo, upsell"))
            .await;
        let calls = stub.calls().await;
        let names: Vec<&str> = calls[0]
            .request
            .execute
            .mboxes
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["promo", "upsell"]);
    }

    #[tokio::test]
    async fn decisions_can_be_echoed_on_response() {
        let config = EdgeConfig {
            emit_decisions_on_response: true,
            ..config()
        };
        let stub = Arc::new(StubDecisioningClient::responding(remote_response()));
        let w = worker(&config, stub);

        let phase = w.on_request(&EdgeRequest::new("/")).await;
        let headers = w.on_response(phase.state);
        assert_eq!(headers.len(), 3);
        assert_eq!(headers[2].name, "x-tailor-decisions");
    }
}
