//! Identity - 訪問者 ID Cookie の読み書きと解決
//!
//! - **codec**: `session#<id>#<exp>|PC#<id>#<exp>` のパース/シリアライズ（純粋関数、I/O なし）
//! - **resolver**: 生の Cookie 値から有効な VisitorIdentity を作る

pub mod codec;
pub mod resolver;

pub use self::codec::{IdentityCodec, ParsedSegments, Segment};
pub use self::resolver::IdentityResolver;
