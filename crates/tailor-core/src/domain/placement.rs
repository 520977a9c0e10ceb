//! PlacementRequest - 1 ページで要求する配置キー（順序付き）

use serde::{Deserialize, Serialize};

/// Ordered list of placement keys. Order matters: the decisioning service
/// correlates results by position as well as by name. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlacementRequest {
    keys: Vec<String>,
}

impl PlacementRequest {
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a delimited list such as `"hero, footer ,promo"`.
    ///
    /// Keys are trimmed; blank entries are dropped.
    pub fn from_delimited(value: &str, delimiter: &str) -> Self {
        let keys = value
            .split(delimiter)
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();
        Self { keys }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for PlacementRequest {
    fn from(keys: Vec<String>) -> Self {
        Self::new(keys)
    }
}

impl From<&[&str]> for PlacementRequest {
    fn from(keys: &[&str]) -> Self {
        Self::new(keys.iter().map(|k| k.to_string()).collect())
    }
}
