//! Shields.io endpoint 徽章

use serde::Serialize;

use crate::utils::cst_date;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub schema_version: u8,
    pub label: String,
    pub message: String,
    pub color: String,
    pub cache_seconds: u32,
}

impl Badge {
    /// 以当天日期（CST）为内容的更新徽章
    pub fn rules_updated() -> Self {
        Self::with_date(cst_date())
    }

    pub fn with_date(date: impl Into<String>) -> Self {
        Self {
            schema_version: 1,
            label: "Rules Updated".to_string(),
            message: date.into(),
            color: "brightgreen".to_string(),
            cache_seconds: 3600,
        }
    }
}
