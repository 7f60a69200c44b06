//! 合并过程统计

/// 合并统计信息
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergeStats {
    // ========== Provider 统计 ==========
    /// 上游 Provider 总数
    pub upstream_providers: u32,
    /// 新建的 Provider 数（add 新增 + modify 缺失时新建）
    pub created_providers: u32,
    /// 被修改的已有 Provider 数
    pub modified_providers: u32,
    /// 被删除的 Provider 数
    pub deleted_providers: u32,
    /// 合并后 Provider 总数
    pub merged_providers: u32,

    // ========== 条目统计 ==========
    /// 追加时因已存在而跳过的条目数
    pub skipped_duplicates: u32,
    /// 删除时不存在的条目数
    pub missing_removals: u32,
    /// regex 引擎无法编译的模式数（仅告警）
    pub invalid_patterns: u32,
    /// 告警总数
    pub warnings: u32,
}

impl MergeStats {
    /// 结构化输出统计信息
    pub fn print_stats(&self, total_time: std::time::Duration) {
        log::debug!(
            "Rule merging completed | Time: {:?} | Upstream: {} | Created: {} | Modified: {} | Deleted: {} | Merged: {}",
            total_time,
            self.upstream_providers,
            self.created_providers,
            self.modified_providers,
            self.deleted_providers,
            self.merged_providers
        );
        log::debug!(
            "Entry stats: skipped duplicates {} | missing removals {} | invalid patterns {} | warnings {}",
            self.skipped_duplicates,
            self.missing_removals,
            self.invalid_patterns,
            self.warnings
        );
    }

    /// 合并日志中的单行汇总
    pub fn summary_line(&self) -> String {
        format!(
            "Providers: upstream {} -> merged {} (created {}, modified {}, deleted {})",
            self.upstream_providers,
            self.merged_providers,
            self.created_providers,
            self.modified_providers,
            self.deleted_providers
        )
    }
}
