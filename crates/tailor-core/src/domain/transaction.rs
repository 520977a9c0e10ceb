//! TransactionState - リクエストフェーズからレスポンスフェーズへの受け渡し
//!
//! 同一 HTTP トランザクション内でだけ有効な状態。
//! `EdgeWorker::on_request` が返し、`EdgeWorker::on_response` が所有権ごと受け取る
//! （一度だけ読まれ、トランザクション間では共有されない）。

use serde::{Deserialize, Serialize};

use super::{Decision, PlacementRequest, VisitorIdentity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionState {
    /// Identity after resolution and any remote `tnt_id` override.
    pub identity: VisitorIdentity,

    pub placements: PlacementRequest,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decisions: Vec<Decision>,
}

impl TransactionState {
    pub fn new(identity: VisitorIdentity, placements: PlacementRequest) -> Self {
        Self {
            identity,
            placements,
            decisions: Vec::new(),
        }
    }

    pub fn with_decisions(mut self, decisions: Vec<Decision>) -> Self {
        self.decisions = decisions;
        self
    }
}
