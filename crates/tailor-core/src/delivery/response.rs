//! DeliveryResponse - decisioning サービスからのレスポンスと [`Decision`] への変換
//!
//! ワイヤ上の全フィールドは省略可能。欠けた項目はデコード失敗ではなく
//! そのエントリを対象外にするだけ。
//!
//! # マッピング規則
//! - name が空のエントリは捨てる（Decision は必ず配置名を持つ）
//! - content を持つ最初の option を採用、無ければ捨てる
//! - tracking token は最初の metric の tnta、無ければ null

use serde::{Deserialize, Serialize};

use crate::domain::{Decision, DecisionOutcome, DeliveryError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResponseIds>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execute: Option<ExecuteResponse>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseIds {
    #[serde(rename = "tntId", default, skip_serializing_if = "Option::is_none")]
    pub tnt_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecuteResponse {
    #[serde(default)]
    pub mboxes: Vec<MboxResponse>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MboxResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub options: Vec<MboxOption>,

    #[serde(default)]
    pub metrics: Vec<Metric>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MboxOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics: Option<MetricAnalytics>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricAnalytics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<AnalyticsPayload>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tnta: Option<serde_json::Value>,
}

impl DeliveryResponse {
    /// Authoritative long-term id, if the service sent a non-empty one.
    pub fn tnt_id(&self) -> Option<&str> {
        self.id
            .as_ref()
            .and_then(|ids| ids.tnt_id.as_deref())
            .filter(|t| !t.is_empty())
    }
}

impl MboxResponse {
    fn first_content(&self) -> Option<&serde_json::Value> {
        self.options
            .iter()
            .find_map(|o| o.content.as_ref().filter(|c| !c.is_null()))
    }

    fn tracking_token(&self) -> serde_json::Value {
        self.metrics
            .first()
            .and_then(|m| m.analytics.as_ref())
            .and_then(|a| a.payload.as_ref())
            .and_then(|p| p.tnta.clone())
            .unwrap_or(serde_json::Value::Null)
    }
}

/// Pure mapping from the wire response to decisions.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionResponseMapper;

impl DecisionResponseMapper {
    /// Decisions in response order; entries without a name or content are dropped.
    pub fn map(response: &DeliveryResponse) -> Vec<Decision> {
        let Some(execute) = &response.execute else {
            return Vec::new();
        };

        execute
            .mboxes
            .iter()
            .filter(|m| !m.name.is_empty())
            .filter_map(|m| {
                let content = m.first_content()?.clone();
                Some(Decision::new(m.name.clone(), content, m.tracking_token()))
            })
            .collect()
    }

    pub fn outcome(result: Result<DeliveryResponse, DeliveryError>) -> DecisionOutcome {
        match result {
            Ok(response) => DecisionOutcome::Delivered {
                decisions: Self::map(&response),
                tnt_id: response.tnt_id().map(str::to_string),
            },
            Err(err) => DecisionOutcome::RemoteError(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(v: serde_json::Value) -> DeliveryResponse {
        serde_json::from_value(v).expect("decode")
    }

    #[test]
    fn mboxes_without_content_are_dropped() {
        let resp = parse(json!({
            "execute": {
                "mboxes": [
                    { "name": "a", "options": [] },
                    {
                        "name": "b",
                        "options": [{ "content": "X" }],
                        "metrics": [{ "analytics": { "payload": { "tnta": "T" } } }]
                    }
                ]
            }
        }));

        assert_eq!(
            DecisionResponseMapper::map(&resp),
            vec![Decision::new("b", json!("X"), json!("T"))]
        );
    }

    #[test]
    fn unnamed_mbox_is_dropped() {
        let resp = parse(json!({
            "execute": {
                "mboxes": [
                    { "index": 0, "options": [{ "content": "orphan" }] },
                    { "index": 1, "name": "", "options": [{ "content": "blank" }] },
                    { "index": 2, "name": "hero", "options": [{ "content": "X" }] }
                ]
            }
        }));

        assert_eq!(
            DecisionResponseMapper::map(&resp),
            vec![Decision::new("hero", json!("X"), serde_json::Value::Null)]
        );
    }

    #[test]
    fn order_follows_response_not_request() {
        let resp = parse(json!({
            "execute": {
                "mboxes": [
                    { "index": 1, "name": "footer", "options": [{ "content": "F" }] },
                    { "index": 0, "name": "hero", "options": [{ "content": { "html": "<h1/>" } }] }
                ]
            }
        }));

        let names: Vec<String> = DecisionResponseMapper::map(&resp)
            .into_iter()
            .map(|d| d.placement)
            .collect();
        assert_eq!(names, vec!["footer", "hero"]);
    }

    #[test]
    fn first_option_with_content_wins() {
        let resp = parse(json!({
            "execute": {
                "mboxes": [{
                    "name": "hero",
                    "options": [{ "type": "html" }, { "content": "one" }, { "content": "two" }]
                }]
            }
        }));
        let d = DecisionResponseMapper::map(&resp);
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].content, json!("one"));
    }

    #[test]
    fn missing_metrics_give_null_tracking_token() {
        let resp = parse(json!({
            "execute": { "mboxes": [{ "name": "hero", "options": [{ "content": "X" }] }] }
        }));
        let d = DecisionResponseMapper::map(&resp);
        assert_eq!(d[0].tracking_token, serde_json::Value::Null);
    }

    #[test]
    fn null_content_is_not_content() {
        let resp = parse(json!({
            "execute": { "mboxes": [{ "name": "hero", "options": [{ "content": null }] }] }
        }));
        assert!(DecisionResponseMapper::map(&resp).is_empty());
    }

    #[test]
    fn response_without_execute_maps_to_nothing() {
        let resp = parse(json!({ "id": { "tntId": "remote1" } }));
        assert!(DecisionResponseMapper::map(&resp).is_empty());
        assert_eq!(resp.tnt_id(), Some("remote1"));
    }

    #[test]
    fn empty_tnt_id_is_ignored() {
        let resp = parse(json!({ "id": { "tntId": "" } }));
        assert_eq!(resp.tnt_id(), None);
    }

    #[test]
    fn outcome_keeps_remote_error() {
        let outcome = DecisionResponseMapper::outcome(Err(DeliveryError::Timeout));
        assert!(matches!(outcome, DecisionOutcome::RemoteError(DeliveryError::Timeout)));
    }

    #[test]
    fn outcome_carries_tnt_id_and_decisions() {
        let resp = parse(json!({
            "id": { "tntId": "remote1" },
            "execute": { "mboxes": [{ "name": "hero", "options": [{ "content": "X" }] }] }
        }));
        match DecisionResponseMapper::outcome(Ok(resp)) {
            DecisionOutcome::Delivered { decisions, tnt_id } => {
                assert_eq!(decisions.len(), 1);
                assert_eq!(tnt_id.as_deref(), Some("remote1"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
