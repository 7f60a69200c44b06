//! 产物处理器：完整版 JSON、精简版 JSON 与完整性哈希
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::core::{Provider, RuleSet};
use crate::error::EngineResult;

/// 一次构建的全部产物
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleArtifacts {
    /// 完整版（4 空格缩进，人类可读）
    pub pretty: String,
    /// 精简版（无空白，插件使用）
    pub minified: String,
    /// 精简版字节的 SHA-256（小写 hex）
    pub minified_hash: String,
}

/// 精简版 Provider：仅保留非默认值
/// 字段顺序：urlPattern → 布尔标记 → 规则列表 → exceptions
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MinifiedProvider<'a> {
    url_pattern: &'a str,
    #[serde(skip_serializing_if = "is_false")]
    complete_provider: bool,
    #[serde(skip_serializing_if = "is_false")]
    force_redirection: bool,
    #[serde(skip_serializing_if = "is_empty_list")]
    rules: &'a [String],
    #[serde(skip_serializing_if = "is_empty_list")]
    referral_marketing: &'a [String],
    #[serde(skip_serializing_if = "is_empty_list")]
    raw_rules: &'a [String],
    #[serde(skip_serializing_if = "is_empty_list")]
    redirections: &'a [String],
    #[serde(skip_serializing_if = "is_empty_list")]
    exceptions: &'a [String],
}

impl<'a> From<&'a Provider> for MinifiedProvider<'a> {
    fn from(provider: &'a Provider) -> Self {
        Self {
            url_pattern: &provider.url_pattern,
            complete_provider: provider.complete_provider,
            force_redirection: provider.force_redirection,
            rules: &provider.rules,
            referral_marketing: &provider.referral_marketing,
            raw_rules: &provider.raw_rules,
            redirections: &provider.redirections,
            exceptions: &provider.exceptions,
        }
    }
}

#[derive(Debug, Serialize)]
struct MinifiedRuleSet<'a> {
    providers: BTreeMap<&'a str, MinifiedProvider<'a>>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_empty_list(list: &&[String]) -> bool {
    list.is_empty()
}

/// 产物处理器
#[derive(Debug, Default)]
pub struct ArtifactProcessor;

impl ArtifactProcessor {
    /// 一次性生成完整版、精简版与哈希
    pub fn build(&self, rule_set: &RuleSet) -> EngineResult<RuleArtifacts> {
        let pretty = self.to_pretty_json(rule_set)?;
        let minified = self.to_minified_json(rule_set)?;
        let minified_hash = sha256_hex(minified.as_bytes());

        log::debug!(
            "Artifacts built | providers: {} | pretty: {} bytes | minified: {} bytes | sha256: {}",
            rule_set.len(),
            pretty.len(),
            minified.len(),
            minified_hash
        );

        Ok(RuleArtifacts {
            pretty,
            minified,
            minified_hash,
        })
    }

    /// 4 空格缩进的完整 JSON（非 ASCII 字符不转义）
    pub fn to_pretty_json<T: Serialize>(&self, value: &T) -> EngineResult<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut serializer)?;
        // serde_json 只输出合法 UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// 精简版：剔除默认值、空数组与未建模字段，紧凑分隔符
    pub fn to_minified_json(&self, rule_set: &RuleSet) -> EngineResult<String> {
        let minified = MinifiedRuleSet {
            providers: rule_set
                .providers
                .iter()
                .map(|(name, provider)| (name.as_str(), MinifiedProvider::from(provider)))
                .collect(),
        };
        Ok(serde_json::to_string(&minified)?)
    }
}

/// 计算 SHA-256 并输出小写 hex
pub fn sha256_hex(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn sample() -> RuleSet {
        RuleSet::from_json_str(
            r#"{"providers":{
                "google":{"urlPattern":"google\\.com","rules":["utm_source"],"exceptions":[],"forceRedirection":false,"trackingSince":2019},
                "blocked":{"urlPattern":"ads\\.example","completeProvider":true},
                "redirect":{"urlPattern":"r\\.example","redirections":["r\\.example/\\?u=([^&]+)"],"forceRedirection":true}
            }}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_minified_strips_defaults() {
        let minified = ArtifactProcessor.to_minified_json(&sample()).unwrap();
        let value: Value = serde_json::from_str(&minified).unwrap();

        assert_eq!(
            value["providers"]["google"],
            serde_json::json!({"urlPattern": "google\\.com", "rules": ["utm_source"]})
        );
        assert_eq!(
            value["providers"]["blocked"],
            serde_json::json!({"urlPattern": "ads\\.example", "completeProvider": true})
        );
        assert_eq!(value["providers"]["redirect"]["forceRedirection"], true);
        assert!(!minified.contains(' '));
        assert!(!minified.contains("trackingSince"));
    }

    #[test]
    fn test_minified_field_order() {
        let minified = ArtifactProcessor.to_minified_json(&sample()).unwrap();
        let redirect = minified.find(r#""redirect":{"urlPattern""#).unwrap();
        let force = minified[redirect..].find("forceRedirection").unwrap();
        let redirections = minified[redirect..].find("redirections").unwrap();
        assert!(force < redirections);
    }

    #[test]
    fn test_pretty_uses_four_spaces_and_keeps_unicode() {
        let mut rule_set = sample();
        rule_set
            .providers
            .get_mut("google")
            .unwrap()
            .rules
            .push("来源".to_string());
        let pretty = ArtifactProcessor.to_pretty_json(&rule_set).unwrap();

        assert!(pretty.starts_with("{\n    \"providers\": {\n        \""));
        assert!(pretty.contains("来源"));
        assert!(pretty.contains("\"trackingSince\": 2019"));
    }

    #[test]
    fn test_hash_matches_minified_bytes() {
        let artifacts = ArtifactProcessor.build(&sample()).unwrap();
        assert_eq!(artifacts.minified_hash, sha256_hex(artifacts.minified.as_bytes()));
        assert_eq!(artifacts.minified_hash.len(), 64);
    }

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
