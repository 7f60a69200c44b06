use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::enums::ListField;

/// ClearURLs 单个 Provider 规则定义
/// 字段顺序即完整版输出顺序；未建模的字段原样保存在 extra 中
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    #[serde(default)]
    pub url_pattern: String,
    #[serde(default)]
    pub complete_provider: bool,
    #[serde(default)]
    pub rules: Vec<String>,
    #[serde(default)]
    pub referral_marketing: Vec<String>,
    #[serde(default)]
    pub raw_rules: Vec<String>,
    #[serde(default)]
    pub exceptions: Vec<String>,
    #[serde(default)]
    pub redirections: Vec<String>,
    #[serde(default)]
    pub force_redirection: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Provider {
    /// 指令新建 Provider 时使用的模板（无任何规则时视为 completeProvider）
    pub fn template() -> Self {
        Self {
            complete_provider: true,
            ..Self::default()
        }
    }

    pub fn list(&self, field: ListField) -> &Vec<String> {
        match field {
            ListField::Rules => &self.rules,
            ListField::ReferralMarketing => &self.referral_marketing,
            ListField::RawRules => &self.raw_rules,
            ListField::Exceptions => &self.exceptions,
            ListField::Redirections => &self.redirections,
        }
    }

    pub fn list_mut(&mut self, field: ListField) -> &mut Vec<String> {
        match field {
            ListField::Rules => &mut self.rules,
            ListField::ReferralMarketing => &mut self.referral_marketing,
            ListField::RawRules => &mut self.raw_rules,
            ListField::Exceptions => &mut self.exceptions,
            ListField::Redirections => &mut self.redirections,
        }
    }

    /// 是否存在任意过滤规则（exceptions 不计入）
    pub fn has_filter_rules(&self) -> bool {
        ListField::ALL
            .into_iter()
            .filter(ListField::is_rule_field)
            .any(|field| !self.list(field).is_empty())
    }

    /// 根据当前规则推导 completeProvider：没有任何过滤规则即整体拦截
    pub fn derive_complete_provider(&mut self) {
        self.complete_provider = !self.has_filter_rules();
    }

    /// 所有需要按正则校验的模式（urlPattern + 全部列表项）
    pub fn patterns(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        std::iter::once(("urlPattern", self.url_pattern.as_str()))
            .filter(|(_, pattern)| !pattern.is_empty())
            .chain(ListField::ALL.into_iter().flat_map(move |field| {
                self.list(field)
                    .iter()
                    .map(move |pattern| (field.key(), pattern.as_str()))
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_partial_provider() {
        let json = r#"{
            "urlPattern": "^https?://(?:[a-z0-9-]+\\.)*?google\\.com",
            "rules": ["utm_source", "utm_medium"],
            "trackingSince": 2019
        }"#;
        let provider: Provider = serde_json::from_str(json).unwrap();

        assert_eq!(provider.url_pattern, r"^https?://(?:[a-z0-9-]+\.)*?google\.com");
        assert_eq!(provider.rules, vec!["utm_source", "utm_medium"]);
        assert!(provider.exceptions.is_empty());
        assert!(!provider.complete_provider);
        assert!(!provider.force_redirection);
        assert_eq!(provider.extra.get("trackingSince"), Some(&Value::from(2019)));
    }

    #[test]
    fn test_serialize_uses_camel_case_and_keeps_extra() {
        let mut provider = Provider::template();
        provider.url_pattern = "^https?://example\\.com".to_string();
        provider.extra.insert("note".to_string(), Value::from("kept"));

        let value = serde_json::to_value(&provider).unwrap();
        assert_eq!(value["urlPattern"], "^https?://example\\.com");
        assert_eq!(value["completeProvider"], true);
        assert_eq!(value["referralMarketing"], Value::Array(vec![]));
        assert_eq!(value["forceRedirection"], false);
        assert_eq!(value["note"], "kept");
    }

    #[test]
    fn test_derive_complete_provider_ignores_exceptions() {
        let mut provider = Provider::template();
        provider.exceptions.push("^https?://example\\.com/keep".to_string());
        provider.derive_complete_provider();
        assert!(provider.complete_provider);

        provider.redirections.push("^https?://example\\.com/r\\?u=([^&]+)".to_string());
        provider.derive_complete_provider();
        assert!(!provider.complete_provider);
    }

    #[test]
    fn test_patterns_skip_empty_url_pattern() {
        let mut provider = Provider::default();
        provider.rules.push("gclid".to_string());
        let patterns: Vec<_> = provider.patterns().collect();
        assert_eq!(patterns, vec![("rules", "gclid")]);
    }
}
