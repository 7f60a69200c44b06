//! 负责 YAML 列表值的切分与转义归一化
//!
//! 人工书写的正则通常是单转义（`\.`），而从上游 JSON 直接复制过来的是双转义（`\\.`）。
//! 约定：
//! - 单引号包裹：原样保留（单转义写法）
//! - 双引号包裹：按 JSON 风格反转义，`\\` → `\`，`\"` → `"`
//! - 无引号：原样保留
//!
//! 幂等性只对序列项成立：归一化结果作为 YAML 序列项再次输入时不变。
//! 作为字符串块再次输入时，含空白/逗号或首尾带引号的模式会被重新切分或去引号。
use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::Value;

use crate::error::{EngineError, EngineResult};

// 字符串块中的单个条目：由引号段与普通字符拼接而成，直到遇到引号外的逗号/空白
// 引号段内允许逗号和空白；找不到闭合引号时，引号按普通字符处理
static ITEM_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:'[^']*'|"(?:[^"\\]|\\.)*"|[^\s,'"]|['"])+"#).unwrap()
});

/// 模式归一化器
#[derive(Debug, Default)]
pub struct PatternNormalizer;

impl PatternNormalizer {
    /// 把任意 YAML 值展开为模式列表
    /// - 字符串：按逗号/空白切分（引号内的逗号和空白不切分）
    /// - 序列：每一项视为单个模式（原样保留，不去引号），嵌套序列递归展开
    /// - 数字/布尔：转为字符串
    /// - null：空列表
    /// - 映射：报错，列表字段写成映射通常是缩进错误
    pub fn normalize_value(&self, value: &Value) -> EngineResult<Vec<String>> {
        let mut items = Vec::new();
        self.collect_value(value, true, &mut items)?;
        Ok(items)
    }

    fn collect_value(
        &self,
        value: &Value,
        split: bool,
        items: &mut Vec<String>,
    ) -> EngineResult<()> {
        match value {
            Value::String(s) if split => items.extend(self.split_block(s)),
            Value::String(s) => {
                if !s.trim().is_empty() {
                    items.push(s.clone());
                }
            }
            Value::Sequence(seq) => {
                for item in seq {
                    self.collect_value(item, false, items)?;
                }
            }
            Value::Number(n) => items.push(n.to_string()),
            Value::Bool(b) => items.push(b.to_string()),
            Value::Tagged(tagged) => self.collect_value(&tagged.value, split, items)?,
            Value::Null => {}
            Value::Mapping(_) => {
                return Err(EngineError::DirectiveParse(
                    "expected a string or a list of patterns, got a mapping".to_string(),
                ))
            }
        }
        Ok(())
    }

    /// 切分字符串块（支持 comma-separated 与多行折叠块）
    pub fn split_block(&self, block: &str) -> Vec<String> {
        ITEM_TOKEN_REGEX
            .find_iter(block)
            .map(|m| self.normalize_token(m.as_str()))
            .filter(|item| !item.is_empty())
            .collect()
    }

    /// 归一化单个条目（去引号 + 按引号类型处理转义）
    pub fn normalize_token(&self, token: &str) -> String {
        if token.len() >= 2 && token.starts_with('\'') && token.ends_with('\'') {
            return token[1..token.len() - 1].to_string();
        }
        if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
            return self.unescape_json_style(&token[1..token.len() - 1]);
        }
        token.to_string()
    }

    /// JSON 风格反转义（单次从左到右扫描，避免 `\\"` 被连续替换两次）
    /// 只处理 `\\` 与 `\"`，其余转义（`\.`、`\d` 等）保持原样
    pub fn unescape_json_style(&self, content: &str) -> String {
        let mut unescaped = String::with_capacity(content.len());
        let mut chars = content.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '\\' {
                match chars.peek() {
                    Some('\\') | Some('"') => {
                        if let Some(next) = chars.next() {
                            unescaped.push(next);
                        }
                    }
                    _ => unescaped.push(c),
                }
            } else {
                unescaped.push(c);
            }
        }

        unescaped
    }
}
