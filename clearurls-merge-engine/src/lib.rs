// 核心公共结构体+枚举
pub mod core;
// 自定义指令文档解析
pub mod directive;
// 列表值切分 + 正则转义归一化
pub mod cleaner;
// 三方合并核心逻辑
pub mod merger;
// 精简输出 + 完整性哈希
pub mod processor;
pub mod error;
pub mod utils;

// 顶层导出常用类型
pub use core::{ListField, Provider, RuleSet, KEYWORD_DELETE_ALL};
pub use directive::{DirectiveDocument, FieldDirective, ListOp, ProviderPatch};
pub use cleaner::{PatternNormalizer, PatternValidator};
pub use merger::{
    DuplicateAddPolicy, MergeOptions, MergeOutcome, MergeReport, MergeStats, RuleMerger,
};
pub use processor::{sha256_hex, ArtifactProcessor, RuleArtifacts};
pub use error::{EngineError, EngineResult};
