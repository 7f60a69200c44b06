//! 全局合并配置管理

use clearurls_merge_engine::{DuplicateAddPolicy, MergeOptions};
use std::{path::PathBuf, time::Duration};
use url::Url;

use crate::error::{MergeError, MergeResult};

/// 上游规则源地址
pub const DEFAULT_UPSTREAM_URL: &str = "https://rules2.clearurls.xyz/data.minify.json";
/// 上游规则的 Hash 校验文件地址
pub const DEFAULT_UPSTREAM_HASH_URL: &str = "https://rules2.clearurls.xyz/rules.minify.hash";
/// 输出目录
pub const DEFAULT_OUTPUT_DIR: &str = "rules";
/// 自定义规则配置文件
pub const DEFAULT_CUSTOM_FILE: &str = "custom_rules.yaml";

/// 上游规则来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamOrigin {
    /// 远程拉取，并用远程 Hash 文件校验
    Remote,
    /// 本地文件（离线构建）；提供 hash 文件时同样校验
    LocalFile {
        rules: PathBuf,
        hash: Option<PathBuf>,
    },
}

/// 重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    Never,     // 不重试
    Times(u8), // 固定次数重试（不含第一次）
}

impl RetryPolicy {
    pub fn max_retries(&self) -> usize {
        match self {
            RetryPolicy::Never => 0,
            RetryPolicy::Times(n) => *n as usize,
        }
    }
}

/// 网络加载相关选项
#[derive(Debug, Clone)]
pub struct RemoteOptions {
    pub upstream_url: String,
    pub upstream_hash_url: String,
    pub timeout: Duration,  // HTTP 超时
    pub retry: RetryPolicy, // 重试策略
}

impl Default for RemoteOptions {
    fn default() -> Self {
        Self {
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            upstream_hash_url: DEFAULT_UPSTREAM_HASH_URL.to_string(),
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::Times(2),
        }
    }
}

/// 输出选项
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub output_dir: PathBuf,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

/// 完整合并配置
#[derive(Debug, Clone)]
pub struct MergeConfig {
    pub origin: UpstreamOrigin,
    pub remote_options: RemoteOptions,
    pub custom_file: PathBuf,
    pub output: OutputOptions,
    pub merge_options: MergeOptions,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            origin: UpstreamOrigin::Remote,
            remote_options: RemoteOptions::default(),
            custom_file: PathBuf::from(DEFAULT_CUSTOM_FILE),
            output: OutputOptions::default(),
            merge_options: MergeOptions::default(),
        }
    }
}

impl MergeConfig {
    /// 本地上游文件
    pub fn local_file(rules: impl Into<PathBuf>, hash: Option<PathBuf>) -> Self {
        Self {
            origin: UpstreamOrigin::LocalFile {
                rules: rules.into(),
                hash,
            },
            ..Self::default()
        }
    }

    /// 启动前校验配置
    pub fn validate(&self) -> MergeResult<()> {
        if self.origin == UpstreamOrigin::Remote {
            for raw in [
                &self.remote_options.upstream_url,
                &self.remote_options.upstream_hash_url,
            ] {
                let url = Url::parse(raw)?;
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(MergeError::Config(format!(
                        "unsupported URL scheme '{}' in {}",
                        url.scheme(),
                        raw
                    )));
                }
            }
            if self.remote_options.timeout.is_zero() {
                return Err(MergeError::Config("HTTP timeout must be positive".to_string()));
            }
        }

        if self.output.output_dir.as_os_str().is_empty() {
            return Err(MergeError::Config("output directory must not be empty".to_string()));
        }

        Ok(())
    }
}

/// 自定义构建器（链式 API）
#[derive(Debug, Clone, Default)]
pub struct CustomConfigBuilder {
    config: MergeConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn origin(mut self, origin: UpstreamOrigin) -> Self {
        self.config.origin = origin;
        self
    }

    pub fn upstream_url(mut self, url: impl Into<String>) -> Self {
        self.config.remote_options.upstream_url = url.into();
        self
    }

    pub fn upstream_hash_url(mut self, url: impl Into<String>) -> Self {
        self.config.remote_options.upstream_hash_url = url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.remote_options.timeout = timeout;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.config.remote_options.retry = retry;
        self
    }

    pub fn custom_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.custom_file = path.into();
        self
    }

    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output.output_dir = path.into();
        self
    }

    pub fn duplicate_add(mut self, policy: DuplicateAddPolicy) -> Self {
        self.config.merge_options.duplicate_add = policy;
        self
    }

    pub fn validate_patterns(mut self, enabled: bool) -> Self {
        self.config.merge_options.validate_patterns = enabled;
        self
    }

    pub fn build(self) -> MergeResult<MergeConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = MergeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.origin, UpstreamOrigin::Remote);
        assert_eq!(config.remote_options.retry.max_retries(), 2);
        assert_eq!(config.merge_options.duplicate_add, DuplicateAddPolicy::Fail);
    }

    #[test]
    fn test_builder_chain() {
        let config = CustomConfigBuilder::new()
            .upstream_url("https://mirror.example/data.min.json")
            .upstream_hash_url("https://mirror.example/rules.min.hash")
            .retry(RetryPolicy::Never)
            .output_dir("public/rules")
            .duplicate_add(DuplicateAddPolicy::Merge)
            .build()
            .unwrap();

        assert_eq!(config.remote_options.upstream_url, "https://mirror.example/data.min.json");
        assert_eq!(config.remote_options.retry.max_retries(), 0);
        assert_eq!(config.output.output_dir, PathBuf::from("public/rules"));
        assert_eq!(config.merge_options.duplicate_add, DuplicateAddPolicy::Merge);
    }

    #[test]
    fn test_invalid_remote_url_is_rejected() {
        let err = CustomConfigBuilder::new().upstream_url("not a url").build().unwrap_err();
        assert!(matches!(err, MergeError::Url(_)));

        let err = CustomConfigBuilder::new()
            .upstream_hash_url("ftp://example.com/hash")
            .build()
            .unwrap_err();
        assert!(matches!(err, MergeError::Config(_)));
    }

    #[test]
    fn test_local_origin_skips_url_checks() {
        let config = CustomConfigBuilder::new()
            .origin(UpstreamOrigin::LocalFile {
                rules: PathBuf::from("upstream.json"),
                hash: None,
            })
            .upstream_url("not a url")
            .build();
        assert!(config.is_ok());
    }
}
