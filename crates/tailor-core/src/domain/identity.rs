//! VisitorIdentity - 訪問者の長期 ID とセッション ID
//!
//! # 不変条件
//! - `tnt_id` は解決後に空になることはない
//! - `session_id` はトランザクションの間ずっと空ではない
//! - `tnt_id` はセッション期限切れだけでは変わらない（リモートの値でのみ上書き）
//! - どちらの ID も cookie-octet（RFC 6265）から `|` と `#` を除いた文字だけで構成される

use serde::{Deserialize, Serialize};

use super::errors::InvalidIdentifier;

/// `true` when `id` is non-empty and every byte is a cookie-octet other than
/// the codec delimiters `|` and `#`.
pub fn is_cookie_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id.bytes().all(|b| {
            matches!(b, 0x21 | 0x24..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7B | 0x7D..=0x7E)
        })
}

/// Long-term (`tnt_id`) and session-scoped (`session_id`) correlation ids.
///
/// Expiry fields are epoch seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorIdentity {
    pub session_id: String,
    pub tnt_id: String,
    pub session_expires_at: i64,
    pub tnt_expires_at: i64,
}

impl VisitorIdentity {
    /// First visit: session and long-term id coincide until the decisioning
    /// service assigns a distinct long-term id.
    pub fn first_visit(id: String, session_expires_at: i64, tnt_expires_at: i64) -> Self {
        Self {
            session_id: id.clone(),
            tnt_id: id,
            session_expires_at,
            tnt_expires_at,
        }
    }

    /// Replace the session id, keeping `tnt_id` untouched.
    pub fn rotate_session(&mut self, session_id: String, session_expires_at: i64) {
        self.session_id = session_id;
        self.session_expires_at = session_expires_at;
    }

    /// Adopt the long-term id echoed by the decisioning service.
    ///
    /// Returns `Ok(true)` when the id changed. Ids that are empty or not
    /// cookie-safe are refused and the current id is kept.
    pub fn adopt_remote_tnt_id(&mut self, tnt_id: &str) -> Result<bool, InvalidIdentifier> {
        if !is_cookie_safe_id(tnt_id) {
            let reason = if tnt_id.is_empty() {
                "empty"
            } else {
                "contains a delimiter or a non cookie-octet character"
            };
            return Err(InvalidIdentifier {
                id: tnt_id.to_string(),
                reason,
            });
        }
        if tnt_id == self.tnt_id {
            return Ok(false);
        }
        self.tnt_id = tnt_id.to_string();
        Ok(true)
    }

    pub fn is_session_expired(&self, now: i64) -> bool {
        self.session_expires_at < now
    }
}
