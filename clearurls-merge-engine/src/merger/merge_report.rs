//! 合并日志收集
//! 每条记录同时写入 log 门面与内存，告警另行汇总，供 IO 层写入 merge_log.txt

use super::merge_stats::MergeStats;

#[derive(Debug, Default, Clone)]
pub struct MergeReport {
    lines: Vec<String>,
    warnings: Vec<String>,
    pub stats: MergeStats,
}

impl MergeReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 普通信息
    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{}", message);
        self.lines.push(message);
    }

    /// 告警：计入行日志与告警汇总
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.stats.warnings += 1;
        self.warnings.push(message.clone());
        self.lines.push(message);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// 合并另一份报告（IO 层自身的进度行与内核报告拼接）
    pub fn extend(&mut self, other: MergeReport) {
        self.stats.warnings += other.warnings.len() as u32;
        self.lines.extend(other.lines);
        self.warnings.extend(other.warnings);
    }
}
