//! CookieWriter - VisitorIdentity を Set-Cookie ヘッダーに書き戻す
//!
//! - identity Cookie: `session#..|PC#..`、max-age は長期側（約 2 年）
//! - cluster Cookie: tnt_id `<prefix>.<cluster>_<suffix>` の `<cluster>`、max-age はセッション側
//!
//! cluster の導出に失敗しても identity Cookie は必ず出す。

use tracing::warn;

use crate::config::EdgeConfig;
use crate::domain::{ClusterDerivationError, HeaderField, VisitorIdentity};
use crate::identity::IdentityCodec;

pub const SET_COOKIE: &str = "Set-Cookie";

#[derive(Debug, Clone)]
pub struct CookieWriter {
    identity_cookie_name: String,
    cluster_cookie_name: String,
    session_max_age_secs: i64,
    tnt_max_age_secs: i64,
    path: Option<String>,
    domain: Option<String>,
}

impl CookieWriter {
    pub fn new(config: &EdgeConfig) -> Self {
        Self {
            identity_cookie_name: config.identity_cookie_name.clone(),
            cluster_cookie_name: config.cluster_cookie_name.clone(),
            session_max_age_secs: i64::try_from(config.session_max_age_secs).unwrap_or(i64::MAX),
            tnt_max_age_secs: i64::try_from(config.tnt_max_age_secs).unwrap_or(i64::MAX),
            path: config.cookie_path.clone(),
            domain: config.cookie_domain.clone(),
        }
    }

    pub fn write(&self, identity: &VisitorIdentity, now: i64) -> Vec<HeaderField> {
        let session_expires_at = now.saturating_add(self.session_max_age_secs);
        let tnt_expires_at = now.saturating_add(self.tnt_max_age_secs);

        let mut headers = Vec::with_capacity(2);
        let value = IdentityCodec::serialize(identity, session_expires_at, tnt_expires_at);
        headers.push(HeaderField::new(
            SET_COOKIE,
            self.render(&self.identity_cookie_name, &value, self.tnt_max_age_secs),
        ));

        match derive_cluster(&identity.tnt_id) {
            Ok(cluster) => headers.push(HeaderField::new(
                SET_COOKIE,
                self.render(&self.cluster_cookie_name, cluster, self.session_max_age_secs),
            )),
            Err(err) => warn!(error = %err, "skipping cluster cookie"),
        }

        headers
    }

    fn render(&self, name: &str, value: &str, max_age: i64) -> String {
        let mut cookie = format!("{name}={value}; Max-Age={max_age}");
        if let Some(path) = &self.path {
            cookie.push_str("; Path=");
            cookie.push_str(path);
        }
        if let Some(domain) = &self.domain {
            cookie.push_str("; Domain=");
            cookie.push_str(domain);
        }
        cookie
    }
}

/// `<prefix>.<cluster>_<suffix>` → `<cluster>`.
///
/// The shape is owned by the decisioning service; anything else is an error.
pub fn derive_cluster(tnt_id: &str) -> Result<&str, ClusterDerivationError> {
    let fail = |reason| ClusterDerivationError {
        tnt_id: tnt_id.to_string(),
        reason,
    };

    let (_, rest) = tnt_id.split_once('.').ok_or_else(|| fail("missing '.'"))?;
    let segment = rest.split('.').next().unwrap_or_default();
    let (cluster, _) = segment.split_once('_').ok_or_else(|| fail("missing '_'"))?;
    if cluster.is_empty() {
        return Err(fail("empty cluster"));
    }
    Ok(cluster)
}
