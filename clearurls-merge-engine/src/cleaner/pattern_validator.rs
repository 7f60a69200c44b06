//! 模式可用性检查
//! ClearURLs 规则面向浏览器 JS 正则引擎，部分写法（环视、反向引用）regex crate 不支持，
//! 因此这里只产出告警信息，从不拒绝规则。
use regex::RegexBuilder;
use rustc_hash::FxHashSet;

// 单条模式编译后的体积上限
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// 正则校验器（记录已校验通过的模式，重复模式只编译一次）
#[derive(Debug, Default)]
pub struct PatternValidator {
    accepted: FxHashSet<String>,
}

impl PatternValidator {
    /// 校验单个模式，返回不可编译时的错误描述
    pub fn check(&mut self, pattern: &str) -> Option<String> {
        if self.accepted.contains(pattern) {
            return None;
        }

        match RegexBuilder::new(pattern)
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()
        {
            Ok(_) => {
                self.accepted.insert(pattern.to_string());
                None
            }
            Err(e) => Some(error_summary(&e.to_string())),
        }
    }
}

// regex 的错误信息是多行 ASCII 图示，日志里只保留 error: 开头的那一行
fn error_summary(message: &str) -> String {
    message
        .lines()
        .rev()
        .find(|line| line.starts_with("error:"))
        .unwrap_or_else(|| message.lines().next().unwrap_or_default())
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_pattern() {
        let mut validator = PatternValidator::default();
        assert_eq!(validator.check(r"^https?://(?:[a-z0-9-]+\.)*?google\.com"), None);
        // 第二次命中缓存
        assert_eq!(validator.check(r"^https?://(?:[a-z0-9-]+\.)*?google\.com"), None);
        assert_eq!(validator.accepted.len(), 1);
    }

    #[test]
    fn test_unsupported_look_around_is_reported() {
        let mut validator = PatternValidator::default();
        let err = validator.check(r"^https?://example\.com(?!/keep)").unwrap();
        assert!(err.starts_with("error:"), "{}", err);
    }

    #[test]
    fn test_unbalanced_group_is_reported() {
        let mut validator = PatternValidator::default();
        assert!(validator.check("(utm_").is_some());
    }
}
