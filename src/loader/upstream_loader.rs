//! 上游规则加载器
//! 负责：远程/本地拉取 → Hash 完整性校验 → 反序列化为 RuleSet
//! 校验失败直接返回错误，不产生任何输出文件

use clearurls_merge_engine::{sha256_hex, MergeReport, RuleSet};
use std::fs;
use std::path::Path;

use crate::config::{MergeConfig, UpstreamOrigin};
use crate::error::{MergeError, MergeResult};
use crate::utils::file_mtime_cst;

#[cfg(feature = "remote-loader")]
use crate::utils::format_http_date;

#[cfg(feature = "remote-loader")]
use super::remote_fetcher::RemoteRuleFetcher;

/// 上游规则快照
#[derive(Debug, Clone)]
pub struct UpstreamSnapshot {
    /// 上游原始字节（已通过校验时即为被校验的内容）
    pub bytes: Vec<u8>,
    pub rule_set: RuleSet,
    /// 上游更新时间（CST），未知时为 "Unknown"
    pub last_modified: String,
    /// 是否完成了 Hash 校验
    pub verified: bool,
}

/// 比对 Hash 文件内容与实际字节的 SHA-256
/// Hash 文件只取第一个空白分隔字段，忽略大小写
pub fn verify_integrity(bytes: &[u8], expected_raw: &str) -> MergeResult<()> {
    let expected = expected_raw
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    let actual = sha256_hex(bytes);

    if expected != actual {
        return Err(MergeError::IntegrityMismatch { expected, actual });
    }
    Ok(())
}

#[derive(Default)]
pub struct UpstreamLoader {
    #[cfg(feature = "remote-loader")]
    remote_fetcher: RemoteRuleFetcher,
}

impl UpstreamLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按配置的来源加载上游规则
    pub async fn load(
        &self,
        config: &MergeConfig,
        report: &mut MergeReport,
    ) -> MergeResult<UpstreamSnapshot> {
        match &config.origin {
            UpstreamOrigin::Remote => self.load_remote(config, report).await,
            UpstreamOrigin::LocalFile { rules, hash } => {
                self.load_local(rules, hash.as_deref(), report)
            }
        }
    }

    #[cfg(feature = "remote-loader")]
    async fn load_remote(
        &self,
        config: &MergeConfig,
        report: &mut MergeReport,
    ) -> MergeResult<UpstreamSnapshot> {
        let options = &config.remote_options;
        let client = self.remote_fetcher.build_client(options)?;

        report.info(format!("[-] Fetching upstream rules from {}...", options.upstream_url));
        let rules = self
            .remote_fetcher
            .fetch(&client, &options.upstream_url, &options.retry)
            .await?;

        report.info(format!("[-] Fetching upstream hash from {}...", options.upstream_hash_url));
        let hash = self
            .remote_fetcher
            .fetch(&client, &options.upstream_hash_url, &options.retry)
            .await?;

        verify_integrity(&rules.bytes, &String::from_utf8_lossy(&hash.bytes))?;
        report.info("    [Check] Upstream hash verified successfully.");

        let rule_set = RuleSet::from_json_slice(&rules.bytes)?;
        report.info(format!("    Upstream contains {} providers.", rule_set.len()));

        Ok(UpstreamSnapshot {
            last_modified: format_http_date(rules.last_modified.as_deref()),
            bytes: rules.bytes,
            rule_set,
            verified: true,
        })
    }

    #[cfg(not(feature = "remote-loader"))]
    async fn load_remote(
        &self,
        _config: &MergeConfig,
        _report: &mut MergeReport,
    ) -> MergeResult<UpstreamSnapshot> {
        Err(MergeError::Config(
            "remote-loader feature is not enabled, use a local upstream file".to_string(),
        ))
    }

    /// 离线加载：读取本地规则文件，提供 hash 文件时同样校验
    fn load_local(
        &self,
        rules_path: &Path,
        hash_path: Option<&Path>,
        report: &mut MergeReport,
    ) -> MergeResult<UpstreamSnapshot> {
        report.info(format!("[-] Loading upstream rules from {}...", rules_path.display()));
        let bytes = fs::read(rules_path)?;

        let verified = match hash_path {
            Some(hash_path) => {
                let expected = fs::read_to_string(hash_path)?;
                verify_integrity(&bytes, &expected)?;
                report.info("    [Check] Upstream hash verified successfully.");
                true
            }
            None => {
                report.warn("    [WARN] No upstream hash file given, integrity check skipped.");
                false
            }
        };

        let rule_set = RuleSet::from_json_slice(&bytes)?;
        report.info(format!("    Upstream contains {} providers.", rule_set.len()));

        Ok(UpstreamSnapshot {
            last_modified: file_mtime_cst(rules_path),
            bytes,
            rule_set,
            verified,
        })
    }
}
