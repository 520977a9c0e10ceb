//! IdentityResolver - 生の Cookie 値から VisitorIdentity を解決する
//!
//! # アルゴリズム
//! 1. Cookie なし → 新規 ID を生成し session_id = tnt_id（初回訪問）
//! 2. Cookie あり → `PC` から tnt_id を取り出す（ローカルで再生成しない）
//! 3. session の期限が now より前 → session_id だけ新規生成、tnt_id は維持
//!
//! パース異常はすべて「Cookie なし」扱いにフォールバックし、エラーにしない。

use tracing::debug;

use crate::config::EdgeConfig;
use crate::domain::{VisitorIdentity, is_cookie_safe_id};
use crate::identity::IdentityCodec;
use crate::ports::IdGenerator;

pub struct IdentityResolver<G> {
    id_gen: G,
    session_max_age_secs: i64,
    tnt_max_age_secs: i64,
}

impl<G: IdGenerator> IdentityResolver<G> {
    pub fn new(id_gen: G, config: &EdgeConfig) -> Self {
        Self {
            id_gen,
            session_max_age_secs: i64::try_from(config.session_max_age_secs).unwrap_or(i64::MAX),
            tnt_max_age_secs: i64::try_from(config.tnt_max_age_secs).unwrap_or(i64::MAX),
        }
    }

    pub fn resolve(&self, raw_cookie: Option<&str>, now: i64) -> VisitorIdentity {
        let Some(raw) = raw_cookie.filter(|r| !r.trim().is_empty()) else {
            return self.first_visit(now);
        };

        let parsed = IdentityCodec::parse(raw);
        let Some(persistent) = parsed.persistent.filter(|p| is_cookie_safe_id(&p.value)) else {
            debug!(cookie = raw, "identity cookie has no usable PC segment; starting fresh");
            return self.first_visit(now);
        };

        let tnt_expires_at = persistent
            .expiry
            .unwrap_or_else(|| now.saturating_add(self.tnt_max_age_secs));

        // a session without a usable id or expiry counts as already expired
        let (session_id, session_expires_at) = parsed
            .session
            .filter(|s| is_cookie_safe_id(&s.value))
            .map(|s| (s.value, s.expiry.unwrap_or(i64::MIN)))
            .unwrap_or((String::new(), i64::MIN));

        let mut identity = VisitorIdentity {
            session_id,
            tnt_id: persistent.value,
            session_expires_at,
            tnt_expires_at,
        };

        if identity.is_session_expired(now) {
            let fresh = self.id_gen.generate();
            debug!(
                tnt_id = %identity.tnt_id,
                previous_session = %identity.session_id,
                new_session = %fresh,
                "session expired or missing; rotating session id"
            );
            identity.rotate_session(fresh, now.saturating_add(self.session_max_age_secs));
        }
        identity
    }

    fn first_visit(&self, now: i64) -> VisitorIdentity {
        let id = self.id_gen.generate();
        debug!(tnt_id = %id, "no identity cookie; new visitor");
        VisitorIdentity::first_visit(
            id,
            now.saturating_add(self.session_max_age_secs),
            now.saturating_add(self.tnt_max_age_secs),
        )
    }
}
