use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// 特殊标记：`del-<field>` 的值仅为该标记时清空整个列表
pub const KEYWORD_DELETE_ALL: &str = "DELETE_ENTIRE_ARRAY";

/// Provider 中所有列表型字段
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListField {
    Rules,
    ReferralMarketing,
    RawRules,
    Exceptions,
    Redirections,
}

impl ListField {
    /// 全部列表字段（输出顺序）
    pub const ALL: [ListField; 5] = [
        ListField::Rules,
        ListField::ReferralMarketing,
        ListField::RawRules,
        ListField::Exceptions,
        ListField::Redirections,
    ];

    /// JSON / YAML 中使用的字段名
    pub fn key(&self) -> &'static str {
        match self {
            ListField::Rules => "rules",
            ListField::ReferralMarketing => "referralMarketing",
            ListField::RawRules => "rawRules",
            ListField::Exceptions => "exceptions",
            ListField::Redirections => "redirections",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    /// 过滤规则字段：参与 completeProvider 推导，exceptions 不算
    pub fn is_rule_field(&self) -> bool {
        !matches!(self, ListField::Exceptions)
    }
}

impl Display for ListField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trip() {
        for field in ListField::ALL {
            assert_eq!(ListField::from_key(field.key()), Some(field));
        }
        assert_eq!(ListField::from_key("urlPattern"), None);
        assert_eq!(ListField::from_key("Rules"), None);
    }

    #[test]
    fn test_rule_fields_exclude_exceptions() {
        let rule_fields: Vec<_> = ListField::ALL
            .into_iter()
            .filter(ListField::is_rule_field)
            .collect();
        assert_eq!(
            rule_fields,
            vec![
                ListField::Rules,
                ListField::ReferralMarketing,
                ListField::RawRules,
                ListField::Redirections
            ]
        );
    }
}
