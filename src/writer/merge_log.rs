//! merge_log.txt 渲染
//! 结构：头部（执行时间 / 上游时间 / 指令文件时间）→ 全部日志行 → 告警汇总（有告警时）

use clearurls_merge_engine::MergeReport;

use crate::utils::cst_now;

const RULE_WIDTH: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeLog {
    pub executed_at: String,
    pub upstream_modified: String,
    pub custom_modified: String,
}

impl MergeLog {
    pub fn new(upstream_modified: impl Into<String>, custom_modified: impl Into<String>) -> Self {
        Self {
            executed_at: cst_now(),
            upstream_modified: upstream_modified.into(),
            custom_modified: custom_modified.into(),
        }
    }

    pub fn render(&self, report: &MergeReport) -> String {
        let heavy = "=".repeat(RULE_WIDTH);
        let light = "-".repeat(RULE_WIDTH);

        let mut lines: Vec<String> = vec![
            heavy.clone(),
            "         ClearURLs Merge Log".to_string(),
            heavy.clone(),
            format!("Execution Time   : {} (CST)", self.executed_at),
            format!("Upstream Modified: {}", self.upstream_modified),
            format!("Custom Modified  : {}", self.custom_modified),
            light,
            String::new(),
        ];
        lines.extend(report.lines().iter().cloned());

        let mut out = lines.join("\n");
        if report.has_warnings() {
            out.push_str(&format!(
                "\n\n{heavy}\nWARNING SUMMARY ({})\n{heavy}\n",
                report.warnings().len()
            ));
            out.push_str(&report.warnings().join("\n"));
        }
        out
    }
}
