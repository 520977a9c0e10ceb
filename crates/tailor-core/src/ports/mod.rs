//! Ports - 抽象化レイヤー
//!
//! 外部の協力者（時刻、ID 生成、decisioning サービス、配置テーブル）への
//! インターフェースを trait として定義し、実装の詳細を隠蔽します。
//! テストでは FixedClock / SequentialIdGenerator / StubDecisioningClient に差し替えます。

pub mod clock;
pub mod id_generator;
pub mod decisioning;
pub mod placements;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, SequentialIdGenerator, UuidGenerator};
pub use self::decisioning::DecisioningClient;
pub use self::placements::PlacementResolver;
