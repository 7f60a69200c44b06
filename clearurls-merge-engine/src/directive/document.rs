//! 指令文档（custom_rules.yaml）解析
use serde_yaml::Value;

use super::field_directive::ProviderPatch;
use crate::cleaner::PatternNormalizer;
use crate::error::{EngineError, EngineResult};

pub const SECTION_DELETE: &str = "del-providers";
pub const SECTION_ADD: &str = "add-providers";
pub const SECTION_MODIFY: &str = "modify-providers";

/// 解析后的完整指令文档
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectiveDocument {
    /// 需整体删除的 Provider
    pub del_providers: Vec<String>,
    /// 新增的 Provider（书写顺序）
    pub add_providers: Vec<(String, ProviderPatch)>,
    /// 修改的 Provider（书写顺序）
    pub modify_providers: Vec<(String, ProviderPatch)>,
    /// 无法识别的顶层键，由调用方记录告警
    pub unknown_sections: Vec<String>,
}

impl DirectiveDocument {
    /// 从 YAML 文本解析；空文档 / `~` 视为空指令
    pub fn from_yaml_str(content: &str) -> EngineResult<Self> {
        let root: Value = serde_yaml::from_str(content)
            .map_err(|e| EngineError::DirectiveParse(e.to_string()))?;
        Self::from_yaml_value(&root)
    }

    pub fn from_yaml_value(root: &Value) -> EngineResult<Self> {
        let root = match root {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(mapping) => mapping,
            other => {
                return Err(EngineError::DirectiveParse(format!(
                    "top level must be a mapping, got {}",
                    kind_of(other)
                )))
            }
        };

        let normalizer = PatternNormalizer;
        let mut document = Self::default();

        for (key, value) in root {
            match key.as_str() {
                Some(SECTION_DELETE) => {
                    document.del_providers =
                        normalizer.normalize_value(value).map_err(|e| match e {
                            EngineError::DirectiveParse(reason) => EngineError::DirectiveParse(
                                format!("'{}': {}", SECTION_DELETE, reason),
                            ),
                            other => other,
                        })?;
                }
                Some(SECTION_ADD) => {
                    document.add_providers = parse_section(SECTION_ADD, value, &normalizer)?;
                }
                Some(SECTION_MODIFY) => {
                    document.modify_providers =
                        parse_section(SECTION_MODIFY, value, &normalizer)?;
                }
                Some(other) => document.unknown_sections.push(other.to_string()),
                None => document.unknown_sections.push(format!("{:?}", key)),
            }
        }

        Ok(document)
    }

    /// 是否不含任何指令（合并结果应与上游完全一致）
    pub fn is_empty(&self) -> bool {
        self.del_providers.is_empty()
            && self.add_providers.is_empty()
            && self.modify_providers.is_empty()
    }
}

fn parse_section(
    section: &str,
    value: &Value,
    normalizer: &PatternNormalizer,
) -> EngineResult<Vec<(String, ProviderPatch)>> {
    let mapping = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Mapping(mapping) => mapping,
        other => {
            return Err(EngineError::DirectiveParse(format!(
                "'{}' must be a mapping of provider name to fields, got {}",
                section,
                kind_of(other)
            )))
        }
    };

    let mut entries = Vec::with_capacity(mapping.len());
    for (name, fields) in mapping {
        let name = provider_name(section, name)?;
        let patch = match fields {
            Value::Null => ProviderPatch::default(),
            Value::Mapping(fields) => ProviderPatch::from_mapping(&name, fields, normalizer)?,
            other => {
                return Err(EngineError::InvalidDirective {
                    provider: name,
                    reason: format!("fields must be a mapping, got {}", kind_of(other)),
                })
            }
        };
        entries.push((name, patch));
    }

    Ok(entries)
}

// Provider 名称允许写成数字等标量，统一转为字符串
fn provider_name(section: &str, key: &Value) -> EngineResult<String> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(EngineError::DirectiveParse(format!(
            "provider name in '{}' must be a scalar, got {}",
            section,
            kind_of(other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::{FieldDirective, ListOp};
    use crate::ListField;

    const SAMPLE: &str = r#"
del-providers: "doubleclick, 'adservice'"
add-providers:
  example:
    urlPattern: '^https?://(?:[a-z0-9-]+\.)*?example\.com'
    rules: >
      utm_x, "ref\\d+"
modify-providers:
  google:
    rules: gclid
  bing:
unknown-section: 1
"#;

    #[test]
    fn test_parse_full_document() {
        let doc = DirectiveDocument::from_yaml_str(SAMPLE).unwrap();

        assert_eq!(doc.del_providers, vec!["doubleclick", "adservice"]);
        assert_eq!(doc.add_providers.len(), 1);
        let (name, patch) = &doc.add_providers[0];
        assert_eq!(name, "example");
        assert_eq!(
            patch.directives[1],
            FieldDirective::List {
                field: ListField::Rules,
                op: ListOp::Append,
                items: vec!["utm_x".into(), r"ref\d+".into()]
            }
        );

        let names: Vec<_> = doc.modify_providers.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["google", "bing"]);
        assert!(doc.modify_providers[1].1.is_empty());
        assert_eq!(doc.unknown_sections, vec!["unknown-section"]);
    }

    #[test]
    fn test_empty_documents() {
        assert!(DirectiveDocument::from_yaml_str("").unwrap().is_empty());
        assert!(DirectiveDocument::from_yaml_str("~").unwrap().is_empty());
        assert!(DirectiveDocument::from_yaml_str("add-providers:\n").unwrap().is_empty());
    }

    #[test]
    fn test_syntax_error_is_parse_error() {
        let err = DirectiveDocument::from_yaml_str("add-providers: [unclosed").unwrap_err();
        assert!(matches!(err, EngineError::DirectiveParse(_)));
    }

    #[test]
    fn test_delete_section_as_mapping_is_rejected() {
        let err = DirectiveDocument::from_yaml_str("del-providers:\n  google:\n").unwrap_err();
        match err {
            EngineError::DirectiveParse(reason) => assert!(reason.contains("del-providers")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_wrong_top_level_shape() {
        assert!(matches!(
            DirectiveDocument::from_yaml_str("- a\n- b\n"),
            Err(EngineError::DirectiveParse(_))
        ));
        assert!(matches!(
            DirectiveDocument::from_yaml_str("modify-providers: [a]\n"),
            Err(EngineError::DirectiveParse(_))
        ));
        assert!(matches!(
            DirectiveDocument::from_yaml_str("modify-providers:\n  google: gclid\n"),
            Err(EngineError::InvalidDirective { .. })
        ));
    }
}
