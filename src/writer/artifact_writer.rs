//! 产物写盘
//! 每个文件先写入同目录的 `.tmp` 再 rename，避免读者看到写了一半的文件

use clearurls_merge_engine::{ArtifactProcessor, MergeReport, RuleArtifacts};
use std::fs;
use std::path::Path;

use super::badge::Badge;
use super::merge_log::MergeLog;
use super::path_manager::OutputPaths;
use crate::error::MergeResult;

pub struct ArtifactWriter {
    paths: OutputPaths,
    processor: ArtifactProcessor,
}

impl ArtifactWriter {
    pub fn new(paths: OutputPaths) -> Self {
        Self {
            paths,
            processor: ArtifactProcessor,
        }
    }

    pub fn paths(&self) -> &OutputPaths {
        &self.paths
    }

    /// 上游原文的美化备份（保留上游全部字段，不经类型化重排）
    pub fn write_upstream_backup(
        &self,
        upstream_bytes: &[u8],
        report: &mut MergeReport,
    ) -> MergeResult<()> {
        report.info(format!(
            "[-] Saving upstream backup to {}...",
            self.paths.upstream_backup.display()
        ));
        let value: serde_json::Value = serde_json::from_slice(upstream_bytes)?;
        let pretty = self.processor.to_pretty_json(&value)?;
        write_atomic(&self.paths.upstream_backup, pretty.as_bytes())
    }

    /// 完整版、精简版与哈希文件
    pub fn write_artifacts(
        &self,
        artifacts: &RuleArtifacts,
        report: &mut MergeReport,
    ) -> MergeResult<()> {
        report.info(format!("[-] Saving merged rules to {}...", self.paths.merged.display()));
        write_atomic(&self.paths.merged, artifacts.pretty.as_bytes())?;

        report.info(format!(
            "[-] Saving minified rules to {}...",
            self.paths.minified.display()
        ));
        write_atomic(&self.paths.minified, artifacts.minified.as_bytes())?;

        report.info(format!(
            "[-] Saving hash ({}) to {}...",
            artifacts.minified_hash,
            self.paths.minified_hash.display()
        ));
        write_atomic(&self.paths.minified_hash, artifacts.minified_hash.as_bytes())
    }

    pub fn write_badge(&self, badge: &Badge, report: &mut MergeReport) -> MergeResult<()> {
        report.info(format!(
            "[-] Generating badge json to {}...",
            self.paths.badge.display()
        ));
        let json = serde_json::to_string(badge)?;
        write_atomic(&self.paths.badge, json.as_bytes())
    }

    /// 日志最后写，包含之前所有步骤的记录
    pub fn write_merge_log(&self, log: &MergeLog, report: &MergeReport) -> MergeResult<()> {
        write_atomic(&self.paths.merge_log, log.render(report).as_bytes())?;
        log::info!("[ok] Log saved to {}", self.paths.merge_log.display());
        Ok(())
    }
}

fn write_atomic(path: &Path, content: &[u8]) -> MergeResult<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
