//! Config - デプロイごとに変わる設定値
//!
//! Cookie 名、max-age、ヘッダー名、パス → 配置キーの表、decisioning の接続先を持ち、
//! 各コンポーネントには構築時に渡す。
//! 全フィールドに既定値があるので、JSON は一部だけ書けばよい。

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Session cookie lifetime: 30 minutes plus one minute of slack.
pub const DEFAULT_SESSION_MAX_AGE_SECS: u64 = 1860;

/// Long-term visitor cookie lifetime: roughly two years.
pub const DEFAULT_TNT_MAX_AGE_SECS: u64 = 63_244_801;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration for one edge deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    /// Name of the cookie carrying `session#..|PC#..`.
    pub identity_cookie_name: String,

    /// Name of the cookie pinning the visitor to a decisioning cluster.
    pub cluster_cookie_name: String,

    pub session_max_age_secs: u64,
    pub tnt_max_age_secs: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookie_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookie_domain: Option<String>,

    /// Header carrying the JSON-encoded decisions.
    pub decisions_header: String,

    /// Also append the decisions header to the client response.
    pub emit_decisions_on_response: bool,

    /// Query parameter that overrides the path table (e.g. `?mboxes=a,b`).
    pub placements_query_param: String,
    pub placement_delimiter: String,

    /// Static mapping from URL path to the ordered placement keys for it.
    pub placements: BTreeMap<String, Vec<String>>,

    pub delivery: DeliveryConfig,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            identity_cookie_name: "mbox".to_string(),
            cluster_cookie_name: "mboxEdgeCluster".to_string(),
            session_max_age_secs: DEFAULT_SESSION_MAX_AGE_SECS,
            tnt_max_age_secs: DEFAULT_TNT_MAX_AGE_SECS,
            cookie_path: None,
            cookie_domain: None,
            decisions_header: "x-tailor-decisions".to_string(),
            emit_decisions_on_response: false,
            placements_query_param: "mboxes".to_string(),
            placement_delimiter: ",".to_string(),
            placements: BTreeMap::new(),
            delivery: DeliveryConfig::default(),
        }
    }
}

/// Remote decisioning endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Base URL, e.g. `https://acme.tt.omtrdc.net`.
    pub host: String,

    /// Tenant identifier passed as `client=`.
    pub client: String,

    pub channel: String,
    pub analytics_logging: String,
    pub timeout_ms: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            client: String::new(),
            channel: "web".to_string(),
            analytics_logging: "client_side".to_string(),
            timeout_ms: 2000,
        }
    }
}

impl EdgeConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Fail-fast checks run once at startup, never per request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.identity_cookie_name.is_empty() || self.cluster_cookie_name.is_empty() {
            return Err(ConfigError::Invalid("cookie names must not be empty".to_string()));
        }
        if self.decisions_header.is_empty() {
            return Err(ConfigError::Invalid("decisions_header must not be empty".to_string()));
        }
        if self.session_max_age_secs == 0 || self.tnt_max_age_secs == 0 {
            return Err(ConfigError::Invalid("max-age values must be positive".to_string()));
        }
        if self.session_max_age_secs > self.tnt_max_age_secs {
            return Err(ConfigError::Invalid(format!(
                "session_max_age_secs ({}) exceeds tnt_max_age_secs ({})",
                self.session_max_age_secs, self.tnt_max_age_secs
            )));
        }
        if self.placement_delimiter.is_empty() {
            return Err(ConfigError::Invalid("placement_delimiter must not be empty".to_string()));
        }
        if self.delivery.timeout_ms == 0 {
            return Err(ConfigError::Invalid("delivery.timeout_ms must be positive".to_string()));
        }
        Ok(())
    }
}
