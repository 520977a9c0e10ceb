//! Domain - ドメインモデル（identity, 配置, decisions, トランザクション状態, errors）

pub mod identity;
pub mod placement;
pub mod decision;
pub mod transaction;
pub mod edge;
pub mod errors;

pub use identity::{VisitorIdentity, is_cookie_safe_id};
pub use placement::PlacementRequest;
pub use decision::{Decision, DecisionOutcome};
pub use transaction::TransactionState;
pub use edge::{EdgeRequest, HeaderField};
pub use errors::{ClusterDerivationError, DeliveryError, InvalidIdentifier};
