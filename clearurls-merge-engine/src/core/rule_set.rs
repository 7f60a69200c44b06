use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::provider::Provider;
use crate::error::EngineResult;

/// ClearURLs 规则库（`{"providers": {...}}`）
/// BTreeMap 保证输出按 Provider 名称有序，同一输入总是得到同一字节序列
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub providers: BTreeMap<String, Provider>,
}

impl RuleSet {
    pub fn from_json_slice(bytes: &[u8]) -> EngineResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn from_json_str(content: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Provider> {
        self.providers.get(name)
    }
}
