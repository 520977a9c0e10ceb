//! IdentityCodec - 訪問者 ID Cookie のワイヤフォーマット
//!
//! `session#<sessionId>#<unixSeconds>|PC#<tntId>#<unixSeconds>`
//!
//! # パース規則
//! - 失敗しない: 未知のセグメントは無視、壊れたセグメントは捨てる
//! - 空入力は空の [`ParsedSegments`]
//! - 同じタグが重複した場合は後勝ち
//!
//! ID に `|` と `#` が入らないことは [`crate::domain::is_cookie_safe_id`] 側で保証する。

use crate::domain::VisitorIdentity;

const SEGMENT_DELIMITER: char = '|';
const FIELD_DELIMITER: char = '#';
const SESSION_TAG: &str = "session";
const PERSISTENT_TAG: &str = "PC";

/// One `tag#value[#expiry]` segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub value: String,
    /// `None` when the expiry is missing or not an integer.
    pub expiry: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSegments {
    pub session: Option<Segment>,
    /// The `PC` (persistent / long-term id) segment.
    pub persistent: Option<Segment>,
}

impl ParsedSegments {
    pub fn is_empty(&self) -> bool {
        self.session.is_none() && self.persistent.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityCodec;

impl IdentityCodec {
    pub fn parse(raw: &str) -> ParsedSegments {
        let mut parsed = ParsedSegments::default();
        let raw = raw.trim();
        if raw.is_empty() {
            return parsed;
        }

        for element in raw.split(SEGMENT_DELIMITER) {
            let mut fields = element.split(FIELD_DELIMITER);
            let tag = fields.next().unwrap_or_default();
            let Some(value) = fields.next().filter(|v| !v.is_empty()) else {
                continue;
            };
            let expiry = fields.next().and_then(|e| e.trim().parse::<i64>().ok());
            let segment = Segment {
                value: value.to_string(),
                expiry,
            };

            // later duplicates win
            match tag {
                SESSION_TAG => parsed.session = Some(segment),
                PERSISTENT_TAG => parsed.persistent = Some(segment),
                _ => {}
            }
        }
        parsed
    }

    /// Field order is fixed so older cookies keep round-tripping.
    pub fn serialize(
        identity: &VisitorIdentity,
        session_expires_at: i64,
        tnt_expires_at: i64,
    ) -> String {
        format!(
            "{SESSION_TAG}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{session_expires_at}\
             {SEGMENT_DELIMITER}\
             {PERSISTENT_TAG}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{tnt_expires_at}",
            identity.session_id, identity.tnt_id
        )
    }
}
