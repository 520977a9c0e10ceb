//! tailor-core
//!
//! CDN エッジで訪問者 ID を解決し、リモートの decisioning サービスを呼び出して
//! その結果を Cookie とヘッダーに反映するためのコア部品。
//!
//! # モジュール構成
//! - **config**: デプロイごとに変わる値（Cookie 名、max-age、ヘッダー名、配置テーブル）
//! - **domain**: ドメインモデル（VisitorIdentity, PlacementRequest, Decision, TransactionState, errors）
//! - **identity**: Cookie のパース/シリアライズと ID 解決（IdentityCodec, IdentityResolver）
//! - **delivery**: decisioning 呼び出しの payload 構築とレスポンスのマッピング
//! - **ports**: 抽象化レイヤー（Clock, IdGenerator, DecisioningClient, PlacementResolver）
//! - **impls**: ports の実装（reqwest クライアント、スタブ、静的配置テーブル）
//! - **app**: アプリケーションロジック（orchestrator, cookie writer, edge worker, builder）

pub mod config;
pub mod domain;
pub mod identity;
pub mod delivery;
pub mod ports;
pub mod impls;
pub mod app;

pub use config::{ConfigError, DeliveryConfig, EdgeConfig};
