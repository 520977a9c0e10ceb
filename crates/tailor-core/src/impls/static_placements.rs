//! StaticPlacementMap - パス → 配置キーの静的テーブル
//!
//! クエリパラメータ（既定 `mboxes=a,b`）があればそれを優先し、
//! なければ設定のパス表を引く。どちらにもなければ空（呼び出しはスキップされる）。

use std::collections::BTreeMap;

use crate::config::EdgeConfig;
use crate::domain::{EdgeRequest, PlacementRequest};
use crate::ports::PlacementResolver;

#[derive(Debug, Clone)]
pub struct StaticPlacementMap {
    by_path: BTreeMap<String, Vec<String>>,
    query_param: String,
    delimiter: String,
}

impl StaticPlacementMap {
    pub fn new(config: &EdgeConfig) -> Self {
        Self {
            by_path: config.placements.clone(),
            query_param: config.placements_query_param.clone(),
            delimiter: config.placement_delimiter.clone(),
        }
    }

    fn lookup_path(&self, path: &str) -> Option<&Vec<String>> {
        self.by_path.get(path).or_else(|| {
            let trimmed = path.trim_end_matches('/');
            if trimmed.is_empty() || trimmed == path {
                None
            } else {
                self.by_path.get(trimmed)
            }
        })
    }
}

impl PlacementResolver for StaticPlacementMap {
    fn resolve(&self, request: &EdgeRequest) -> PlacementRequest {
        if !self.query_param.is_empty()
            && let Some(value) = request.query_param(&self.query_param)
        {
            return PlacementRequest::from_delimited(&value, &self.delimiter);
        }

        self.lookup_path(&request.path)
            .map(|keys| PlacementRequest::new(keys.clone()))
            .unwrap_or_default()
    }
}
