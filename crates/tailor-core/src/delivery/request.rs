//! DeliveryRequest - `POST /rest/v1/delivery` への送信 payload
//!
//! - 配置キーは要求順のまま `execute.mboxes[].index` に載せる
//! - 配置が空なら payload を作らない（呼び出し自体をスキップ）

use serde::{Deserialize, Serialize};

use crate::config::DeliveryConfig;
use crate::domain::{PlacementRequest, VisitorIdentity};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRequest {
    pub context: RequestContext,
    pub experience_cloud: ExperienceCloud,
    pub id: VisitorIds,
    pub execute: ExecuteRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub channel: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceCloud {
    pub analytics: AnalyticsSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSettings {
    pub logging: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorIds {
    #[serde(rename = "tntId")]
    pub tnt_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteRequest {
    pub mboxes: Vec<MboxRequest>,
}

/// `index` is the zero-based position in the requested placement list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MboxRequest {
    pub index: usize,
    pub name: String,
}

/// Builds [`DeliveryRequest`]s with the deployment's fixed channel and
/// analytics-logging mode.
#[derive(Debug, Clone)]
pub struct DecisionRequestBuilder {
    channel: String,
    analytics_logging: String,
}

impl DecisionRequestBuilder {
    pub fn new(config: &DeliveryConfig) -> Self {
        Self {
            channel: config.channel.clone(),
            analytics_logging: config.analytics_logging.clone(),
        }
    }

    /// `None` for an empty placement list: there is nothing to ask for.
    pub fn build(
        &self,
        identity: &VisitorIdentity,
        placements: &PlacementRequest,
    ) -> Option<DeliveryRequest> {
        if placements.is_empty() {
            return None;
        }

        let mboxes = placements
            .iter()
            .enumerate()
            .map(|(index, name)| MboxRequest {
                index,
                name: name.to_string(),
            })
            .collect();

        Some(DeliveryRequest {
            context: RequestContext {
                channel: self.channel.clone(),
            },
            experience_cloud: ExperienceCloud {
                analytics: AnalyticsSettings {
                    logging: self.analytics_logging.clone(),
                },
            },
            id: VisitorIds {
                tnt_id: identity.tnt_id.clone(),
            },
            execute: ExecuteRequest { mboxes },
        })
    }
}
