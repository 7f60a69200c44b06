//! 输出路径管理

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::MergeResult;

pub const UPSTREAM_BACKUP_FILE: &str = "upstream_rules.json";
pub const MERGED_FILE: &str = "merged_rules.json";
pub const MINIFIED_FILE: &str = "rules.min.json";
pub const MINIFIED_HASH_FILE: &str = "rules.min.hash";
pub const BADGE_FILE: &str = "badge.json";
pub const MERGE_LOG_FILE: &str = "merge_log.txt";

/// 一次构建的全部输出路径
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub dir: PathBuf,
    pub upstream_backup: PathBuf,
    pub merged: PathBuf,
    pub minified: PathBuf,
    pub minified_hash: PathBuf,
    pub badge: PathBuf,
    pub merge_log: PathBuf,
}

impl OutputPaths {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            dir: dir.to_path_buf(),
            upstream_backup: dir.join(UPSTREAM_BACKUP_FILE),
            merged: dir.join(MERGED_FILE),
            minified: dir.join(MINIFIED_FILE),
            minified_hash: dir.join(MINIFIED_HASH_FILE),
            badge: dir.join(BADGE_FILE),
            merge_log: dir.join(MERGE_LOG_FILE),
        }
    }

    /// 确保输出目录存在
    pub fn ensure_dir(&self) -> MergeResult<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
            log::debug!("Created output directory {}", self.dir.display());
        }
        Ok(())
    }
}
