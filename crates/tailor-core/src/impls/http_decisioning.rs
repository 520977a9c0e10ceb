//! HttpDecisioningClient - reqwest によるリモート decisioning 呼び出し
//!
//! `POST {host}/rest/v1/delivery?client={client}&sessionId={sessionId}`
//!
//! タイムアウト・非 2xx・デコード失敗はそれぞれ `DeliveryError` の別バリアントになる。

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::{ConfigError, DeliveryConfig};
use crate::delivery::{DeliveryRequest, DeliveryResponse};
use crate::domain::DeliveryError;
use crate::ports::DecisioningClient;

#[derive(Clone)]
pub struct HttpDecisioningClient {
    base_url: String,
    client_code: String,
    http: reqwest::Client,
}

impl HttpDecisioningClient {
    pub fn new(config: &DeliveryConfig) -> Result<Self, ConfigError> {
        if config.host.trim().is_empty() {
            return Err(ConfigError::Invalid("delivery.host must not be empty".to_string()));
        }
        if config.client.trim().is_empty() {
            return Err(ConfigError::Invalid("delivery.client must not be empty".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ConfigError::Invalid(format!("failed to build http client: {e}")))?;

        Ok(Self {
            base_url: config.host.trim_end_matches('/').to_string(),
            client_code: config.client.clone(),
            http,
        })
    }

    fn delivery_url(&self) -> String {
        format!("{}/rest/v1/delivery", self.base_url)
    }
}

fn transport_error(e: reqwest::Error) -> DeliveryError {
    if e.is_timeout() {
        DeliveryError::Timeout
    } else {
        DeliveryError::Transport(e.to_string())
    }
}

#[async_trait]
impl DecisioningClient for HttpDecisioningClient {
    async fn deliver(
        &self,
        session_id: &str,
        request: &DeliveryRequest,
    ) -> Result<DeliveryResponse, DeliveryError> {
        debug!(
            url = %self.delivery_url(),
            session_id,
            mboxes = request.execute.mboxes.len(),
            "calling decisioning service"
        );

        let response = self
            .http
            .post(self.delivery_url())
            .query(&[("client", self.client_code.as_str()), ("sessionId", session_id)])
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(DeliveryError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).to_string(),
            });
        }

        serde_json::from_slice::<DeliveryResponse>(&body)
            .map_err(|e| DeliveryError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use axum::Router;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::post;
    use serde_json::json;

    use crate::delivery::DecisionRequestBuilder;
    use crate::domain::{PlacementRequest, VisitorIdentity};

    async fn spawn_server(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}")
    }

    fn client_for(host: String, timeout_ms: u64) -> HttpDecisioningClient {
        HttpDecisioningClient::new(&DeliveryConfig {
            host,
            client: "acme".to_string(),
            timeout_ms,
            ..DeliveryConfig::default()
        })
        .expect("client")
    }

    fn sample_request() -> DeliveryRequest {
        let identity = VisitorIdentity::first_visit("V1".to_string(), 0, 0);
        DecisionRequestBuilder::new(&DeliveryConfig::default())
            .build(&identity, &PlacementRequest::from(&["hero"][..]))
            .expect("non-empty")
    }

    #[tokio::test]
    async fn success_echoes_query_and_body() {
        let app = Router::new().route(
            "/rest/v1/delivery",
            post(
                |Query(q): Query<HashMap<String, String>>,
                 axum::Json(body): axum::Json<serde_json::Value>| async move {
                    axum::Json(json!({
                        "id": { "tntId": format!("{}.35_0", body["id"]["tntId"].as_str().unwrap_or("")) },
                        "execute": {
                            "mboxes": [{
                                "name": body["execute"]["mboxes"][0]["name"],
                                "options": [{ "content": format!("{}/{}", q["client"], q["sessionId"]) }]
                            }]
                        }
                    }))
                },
            ),
        );
        let host = spawn_server(app).await;
        let client = client_for(format!("{host}/"), 2000);

        let resp = client.deliver("S1", &sample_request()).await.expect("ok");
        assert_eq!(resp.tnt_id(), Some("V1.35_0"));
        let mbox = &resp.execute.as_ref().expect("execute").mboxes[0];
        assert_eq!(mbox.name, "hero");
        assert_eq!(mbox.options[0].content, Some(json!("acme/S1")));
    }

    #[tokio::test]
    async fn non_success_status_keeps_body() {
        let app = Router::new().route(
            "/rest/v1/delivery",
            post(|| async { (StatusCode::BAD_REQUEST, "invalid client") }),
        );
        let client = client_for(spawn_server(app).await, 2000);

        let err = client.deliver("S1", &sample_request()).await.unwrap_err();
        assert_eq!(
            err,
            DeliveryError::Status {
                status: 400,
                body: "invalid client".to_string()
            }
        );
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let app = Router::new().route("/rest/v1/delivery", post(|| async { "not json" }));
        let client = client_for(spawn_server(app).await, 2000);

        let err = client.deliver("S1", &sample_request()).await.unwrap_err();
        assert!(matches!(err, DeliveryError::Decode(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn slow_service_times_out() {
        let app = Router::new().route(
            "/rest/v1/delivery",
            post(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                axum::Json(json!({}))
            }),
        );
        let client = client_for(spawn_server(app).await, 50);

        let err = client.deliver("S1", &sample_request()).await.unwrap_err();
        assert_eq!(err, DeliveryError::Timeout);
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        // bind then drop so nothing listens on the port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{addr}"), 2000);
        let err = client.deliver("S1", &sample_request()).await.unwrap_err();
        assert!(matches!(err, DeliveryError::Transport(_)), "got {err:?}");
    }

    #[test]
    fn missing_host_or_client_is_rejected() {
        assert!(HttpDecisioningClient::new(&DeliveryConfig::default()).is_err());
        let no_client = DeliveryConfig {
            host: "http://localhost".to_string(),
            ..DeliveryConfig::default()
        };
        assert!(HttpDecisioningClient::new(&no_client).is_err());
    }
}
