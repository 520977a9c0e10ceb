//! App - アプリケーション層
//!
//! ports を組み合わせて 1 HTTP トランザクション分の処理を実装します。
//!
//! # 主要コンポーネント
//! - **DecisionOrchestrator**: payload 構築 → リモート呼び出し → マッピング（fail-open）
//! - **CookieWriter**: VisitorIdentity を Set-Cookie に書き戻す
//! - **EdgeWorker**: `on_request` / `on_response` の 2 つのエントリポイント
//! - **AppBuilder**: 起動時のワイヤリングと検証（Fail-fast）

pub mod orchestrator;
pub mod cookie_writer;
pub mod edge_worker;
pub mod builder;

// 主要な型を再エクスポート
pub use self::orchestrator::DecisionOrchestrator;
pub use self::cookie_writer::CookieWriter;
pub use self::edge_worker::{EdgeWorker, RequestPhase};
pub use self::builder::{AppBuilder, BuildError};
