mod enums;
mod provider;
mod rule_set;

// 导出常用项
pub use enums::{ListField, KEYWORD_DELETE_ALL};
pub use provider::Provider;
pub use rule_set::RuleSet;
