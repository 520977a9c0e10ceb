//! Errors - エラー型と分類
//!
//! どのエラーも HTTP レスポンスを失敗させない（personalization は best-effort）。
//! - Cookie パース異常: resolver 内で新規 ID 生成にフォールバック（型としては表に出ない）
//! - リモート呼び出し失敗: `DeliveryError` → orchestrator で空の decisions に畳む
//! - cluster Cookie 導出失敗: `ClusterDerivationError` → その Cookie だけスキップ
//! - Cookie に載せられない ID: `InvalidIdentifier` → 採用せず既存の ID を維持

use thiserror::Error;

/// Failure of the remote decisioning call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("decisioning request failed: {0}")]
    Transport(String),

    #[error("decisioning request timed out")]
    Timeout,

    #[error("decisioning service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid decisioning response: {0}")]
    Decode(String),
}

/// The `tnt_id` does not have the `<prefix>.<cluster>_<suffix>` shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot derive cluster from tnt_id '{tnt_id}': {reason}")]
pub struct ClusterDerivationError {
    pub tnt_id: String,
    pub reason: &'static str,
}

/// An id that cannot be written into the identity cookie as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("identifier '{id}' is not cookie-safe: {reason}")]
pub struct InvalidIdentifier {
    pub id: String,
    pub reason: &'static str,
}
