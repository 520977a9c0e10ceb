//! AppBuilder - EdgeWorker の構築とワイヤリング
//!
//! # Fail-fast 設計
//! - build() 時に EdgeConfig::validate() を実行
//! - expect_paths() で期待されるパスを登録し、配置テーブルに無ければ BuildError
//! - decisioning クライアント未指定なら設定から HttpDecisioningClient を作る（host/client 必須）
//!
//! リクエスト処理中には失敗させず、設定ミスは起動時にすべて表に出す。

use std::sync::Arc;

use crate::app::{DecisionOrchestrator, EdgeWorker};
use crate::config::{ConfigError, EdgeConfig};
use crate::delivery::DecisionRequestBuilder;
use crate::impls::{HttpDecisioningClient, StaticPlacementMap};
use crate::ports::{
    Clock, DecisioningClient, IdGenerator, PlacementResolver, SystemClock, UuidGenerator,
};

/// # 使用例
/// ```ignore
/// let worker = AppBuilder::new(config)
///     .expect_paths(&["/", "/products"])
///     .build()?;
/// ```
pub struct AppBuilder {
    config: EdgeConfig,
    clock: Option<Arc<dyn Clock>>,
    id_gen: Option<Arc<dyn IdGenerator>>,
    decisioning: Option<Arc<dyn DecisioningClient>>,
    placements: Option<Arc<dyn PlacementResolver>>,
    expected_paths: Option<Vec<String>>,
}

/// BuildError は EdgeWorker 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Missing placement paths: {0:?}. These paths were expected but have no placements configured.")]
    MissingPlacementPaths(Vec<String>),
}

impl AppBuilder {
    pub fn new(config: EdgeConfig) -> Self {
        Self {
            config,
            clock: None,
            id_gen: None,
            decisioning: None,
            placements: None,
            expected_paths: None,
        }
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn id_generator(mut self, id_gen: Arc<dyn IdGenerator>) -> Self {
        self.id_gen = Some(id_gen);
        self
    }

    pub fn decisioning_client(mut self, client: Arc<dyn DecisioningClient>) -> Self {
        self.decisioning = Some(client);
        self
    }

    /// Replaces the static path table from the config.
    pub fn placement_resolver(mut self, resolver: Arc<dyn PlacementResolver>) -> Self {
        self.placements = Some(resolver);
        self
    }

    /// Paths that must have placements in the config table.
    ///
    /// Ignored when a custom placement resolver is set.
    pub fn expect_paths(mut self, paths: &[&str]) -> Self {
        self.expected_paths = Some(paths.iter().map(|p| p.to_string()).collect());
        self
    }

    pub fn build(self) -> Result<EdgeWorker, BuildError> {
        self.config.validate()?;

        let placements: Arc<dyn PlacementResolver> = match self.placements {
            Some(resolver) => resolver,
            None => {
                if let Some(expected) = &self.expected_paths {
                    let missing: Vec<String> = expected
                        .iter()
                        .filter(|p| !self.config.placements.contains_key(p.as_str()))
                        .cloned()
                        .collect();
                    if !missing.is_empty() {
                        return Err(BuildError::MissingPlacementPaths(missing));
                    }
                }
                Arc::new(StaticPlacementMap::new(&self.config))
            }
        };

        let decisioning: Arc<dyn DecisioningClient> = match self.decisioning {
            Some(client) => client,
            None => Arc::new(HttpDecisioningClient::new(&self.config.delivery)?),
        };

        let orchestrator = DecisionOrchestrator::new(
            decisioning,
            DecisionRequestBuilder::new(&self.config.delivery),
        );

        Ok(EdgeWorker::new(
            &self.config,
            self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            self.id_gen.unwrap_or_else(|| Arc::new(UuidGenerator)),
            placements,
            orchestrator,
        ))
    }
}
