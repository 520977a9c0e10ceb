//! PlacementResolver port - リクエストから要求する配置キーを決める
//!
//! デプロイが提供する読み取り専用の設定（パス → 配置キー）を引く。

use crate::domain::{EdgeRequest, PlacementRequest};

pub trait PlacementResolver: Send + Sync {
    /// Unknown paths resolve to an empty request.
    fn resolve(&self, request: &EdgeRequest) -> PlacementRequest;
}
