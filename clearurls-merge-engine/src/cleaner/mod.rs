//! 规则值清理模块
//! 负责把 YAML 指令中的列表值切分为独立模式、统一转义风格，并对模式做正则可用性检查

pub mod pattern_normalizer;
pub mod pattern_validator;

pub use pattern_normalizer::PatternNormalizer;
pub use pattern_validator::PatternValidator;
