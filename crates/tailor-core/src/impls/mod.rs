//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **HttpDecisioningClient**: reqwest による本番用の decisioning 呼び出し
//! - **StubDecisioningClient**: 固定レスポンスを返し、呼び出しを記録する（テスト・オフライン用）
//! - **StaticPlacementMap**: 設定のパス表 + クエリパラメータ上書き

pub mod http_decisioning;
pub mod stub_decisioning;
pub mod static_placements;

// 主要な型を再エクスポート
pub use self::http_decisioning::HttpDecisioningClient;
pub use self::stub_decisioning::{RecordedCall, StubDecisioningClient};
pub use self::static_placements::StaticPlacementMap;
