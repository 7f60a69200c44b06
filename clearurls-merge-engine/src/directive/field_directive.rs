//! 字段级指令：`<field>` 追加 / `rst-<field>` 重置 / `del-<field>` 删除
use serde_yaml::{Mapping, Value};
use std::fmt::{Display, Formatter};

use crate::cleaner::PatternNormalizer;
use crate::core::{ListField, KEYWORD_DELETE_ALL};
use crate::error::{EngineError, EngineResult};

const RESET_PREFIX: &str = "rst-";
const DELETE_PREFIX: &str = "del-";

/// 列表字段操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOp {
    /// 追加（已存在的条目跳过）
    Append,
    /// 整体替换
    Reset,
    /// 删除指定条目
    Remove,
}

impl Display for ListOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ListOp::Append => write!(f, "append"),
            ListOp::Reset => write!(f, "reset"),
            ListOp::Remove => write!(f, "remove"),
        }
    }
}

/// 单个字段指令
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDirective {
    List {
        field: ListField,
        op: ListOp,
        items: Vec<String>,
    },
    /// `del-<field>: DELETE_ENTIRE_ARRAY`
    ClearList(ListField),
    UrlPattern(String),
    CompleteProvider(bool),
    ForceRedirection(bool),
    /// 未建模的标量字段，原样写入 Provider.extra
    Extra { key: String, value: serde_json::Value },
}

/// 单个 Provider 的全部字段指令（保持 YAML 中的书写顺序）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderPatch {
    pub directives: Vec<FieldDirective>,
}

impl ProviderPatch {
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// 是否显式设置了 completeProvider（显式设置时不再自动推导）
    pub fn sets_complete_provider(&self) -> bool {
        self.directives
            .iter()
            .any(|d| matches!(d, FieldDirective::CompleteProvider(_)))
    }

    /// 从 YAML 映射解析字段指令
    pub fn from_mapping(
        provider: &str,
        mapping: &Mapping,
        normalizer: &PatternNormalizer,
    ) -> EngineResult<Self> {
        let mut directives = Vec::with_capacity(mapping.len());

        for (key, value) in mapping {
            let key = key.as_str().ok_or_else(|| invalid(provider, format!(
                "field name must be a string, got {:?}",
                key
            )))?;
            directives.push(parse_field(provider, key, value, normalizer)?);
        }

        Ok(Self { directives })
    }
}

fn parse_field(
    provider: &str,
    key: &str,
    value: &Value,
    normalizer: &PatternNormalizer,
) -> EngineResult<FieldDirective> {
    if let Some(target) = key.strip_prefix(RESET_PREFIX) {
        return match ListField::from_key(target) {
            Some(field) => Ok(FieldDirective::List {
                field,
                op: ListOp::Reset,
                items: dedup_keep_order(list_items(provider, key, value, normalizer)?),
            }),
            None => parse_scalar(provider, target, value),
        };
    }

    if let Some(target) = key.strip_prefix(DELETE_PREFIX) {
        let field = ListField::from_key(target).ok_or_else(|| {
            invalid(provider, format!("'{}' only applies to list fields", key))
        })?;
        let items = list_items(provider, key, value, normalizer)?;
        if items.len() == 1 && items[0] == KEYWORD_DELETE_ALL {
            return Ok(FieldDirective::ClearList(field));
        }
        return Ok(FieldDirective::List {
            field,
            op: ListOp::Remove,
            items,
        });
    }

    match ListField::from_key(key) {
        Some(field) => Ok(FieldDirective::List {
            field,
            op: ListOp::Append,
            items: list_items(provider, key, value, normalizer)?,
        }),
        None => parse_scalar(provider, key, value),
    }
}

fn parse_scalar(provider: &str, key: &str, value: &Value) -> EngineResult<FieldDirective> {
    match key {
        "urlPattern" => value
            .as_str()
            .map(|s| FieldDirective::UrlPattern(s.to_string()))
            .ok_or_else(|| invalid(provider, "urlPattern must be a string".to_string())),
        "completeProvider" => value
            .as_bool()
            .map(FieldDirective::CompleteProvider)
            .ok_or_else(|| invalid(provider, "completeProvider must be a boolean".to_string())),
        "forceRedirection" => value
            .as_bool()
            .map(FieldDirective::ForceRedirection)
            .ok_or_else(|| invalid(provider, "forceRedirection must be a boolean".to_string())),
        _ => Ok(FieldDirective::Extra {
            key: key.to_string(),
            value: serde_json::to_value(value)?,
        }),
    }
}

/// 列表字段的值；写成映射时报错而不是静默得到空列表
fn list_items(
    provider: &str,
    key: &str,
    value: &Value,
    normalizer: &PatternNormalizer,
) -> EngineResult<Vec<String>> {
    normalizer.normalize_value(value).map_err(|e| match e {
        EngineError::DirectiveParse(reason) => invalid(provider, format!("'{}': {}", key, reason)),
        other => other,
    })
}

fn dedup_keep_order(items: Vec<String>) -> Vec<String> {
    let mut seen = rustc_hash::FxHashSet::default();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

fn invalid(provider: &str, reason: String) -> EngineError {
    EngineError::InvalidDirective {
        provider: provider.to_string(),
        reason,
    }
}
