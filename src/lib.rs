//! clearurls-merge - ClearURLs 规则合并构建工具
//! 拉取上游规则并校验完整性，叠加本地 YAML 指令，输出合并版、精简版与哈希文件

// 导出全局错误类型
pub use self::error::{MergeError, MergeResult};

// 导出配置模块
pub use self::config::{
    CustomConfigBuilder, MergeConfig, OutputOptions, RemoteOptions, RetryPolicy, UpstreamOrigin,
};

// 导出加载模块核心接口
pub use self::loader::{
    verify_integrity, CustomDirectives, CustomRuleLoader, UpstreamLoader, UpstreamSnapshot,
};

// 导出写出模块核心接口
pub use self::writer::{ArtifactWriter, Badge, MergeLog, OutputPaths};

// 导出构建流水线
pub use self::builder::{BuildSummary, RuleBuilder};

// 内核常用类型
pub use clearurls_merge_engine::{
    DirectiveDocument, DuplicateAddPolicy, MergeOptions, MergeReport, MergeStats, Provider, RuleSet,
};

// 声明所有子模块
pub mod config;
pub mod error;
pub mod loader;
pub mod writer;
pub mod utils;
pub mod builder;
