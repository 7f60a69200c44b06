//! 规则合并模块
//! 上游规则 + add / modify / del 指令 → 合并后的规则库
pub mod merge_report;
pub mod merge_stats;
pub mod rule_merger;

pub use merge_report::MergeReport;
pub use merge_stats::MergeStats;
pub use rule_merger::{DuplicateAddPolicy, MergeOptions, MergeOutcome, RuleMerger};
