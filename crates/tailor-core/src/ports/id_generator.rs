//! IdGenerator port - 訪問者 ID / セッション ID 生成の抽象化
//!
//! # 実装
//! - **UuidGenerator**: UUIDv4（暗号学的に安全な乱数、本番用）
//! - **SequentialIdGenerator**: 連番（テスト用、決定的）
//!
//! どちらも 32 文字の小文字 16 進数を返します（ハイフンなし）。
//! 生成した ID は相関キーであってセキュリティトークンではありません。

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// IdGenerator は 32 桁 16 進の ID を生成
///
/// # Thread Safety
/// - `Send + Sync` を要求（複数トランザクションから共有される）
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Yields `00000000000000000000000000000001`, `...02`, ...
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{n:032x}")
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for std::sync::Arc<G> {
    fn generate(&self) -> String {
        (**self).generate()
    }
}
