//! 构建流水线
//! 上游加载与校验 → 指令加载 → 合并 → 产物生成 → 写盘 → 合并日志
//! 致命错误发生在任何写盘之前，失败时不会留下半套产物

use clearurls_merge_engine::{ArtifactProcessor, MergeReport, MergeStats, RuleMerger};

use crate::config::MergeConfig;
use crate::error::MergeResult;
use crate::loader::{CustomRuleLoader, UpstreamLoader};
use crate::writer::{ArtifactWriter, Badge, MergeLog, OutputPaths};

/// 一次构建的结果摘要
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub providers: usize,
    pub minified_hash: String,
    pub stats: MergeStats,
    pub warnings: usize,
    pub paths: OutputPaths,
}

pub struct RuleBuilder {
    config: MergeConfig,
    upstream_loader: UpstreamLoader,
    custom_loader: CustomRuleLoader,
}

impl RuleBuilder {
    pub fn new(config: MergeConfig) -> Self {
        Self {
            config,
            upstream_loader: UpstreamLoader::new(),
            custom_loader: CustomRuleLoader,
        }
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    pub async fn run(&self) -> MergeResult<BuildSummary> {
        self.config.validate()?;
        let mut report = MergeReport::new();

        let upstream = self.upstream_loader.load(&self.config, &mut report).await?;
        let custom = self.custom_loader.load(&self.config.custom_file, &mut report)?;

        let outcome = RuleMerger::new(self.config.merge_options.clone())
            .merge(upstream.rule_set, &custom.document)?;
        let stats = outcome.report.stats.clone();
        report.extend(outcome.report);

        report.info("[-] Generating minified rules...");
        let artifacts = ArtifactProcessor.build(&outcome.rule_set)?;

        let paths = OutputPaths::new(&self.config.output.output_dir);
        paths.ensure_dir()?;
        let writer = ArtifactWriter::new(paths);

        writer.write_upstream_backup(&upstream.bytes, &mut report)?;
        writer.write_artifacts(&artifacts, &mut report)?;
        writer.write_badge(&Badge::rules_updated(), &mut report)?;
        report.info(stats.summary_line());

        let merge_log = MergeLog::new(upstream.last_modified, custom.modified);
        writer.write_merge_log(&merge_log, &report)?;

        Ok(BuildSummary {
            providers: outcome.rule_set.len(),
            minified_hash: artifacts.minified_hash,
            stats,
            warnings: report.warnings().len(),
            paths: writer.paths().clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CustomConfigBuilder;
    use crate::config::UpstreamOrigin;
    use crate::error::MergeError;
    use clearurls_merge_engine::{sha256_hex, DuplicateAddPolicy};
    use serde_json::Value;
    use std::fs;
    use std::path::Path;

    const UPSTREAM: &str = r#"{"providers":{"google":{"urlPattern":"^https?://(?:[a-z0-9-]+\\.)*?google\\.com","completeProvider":false,"rules":["utm_source"],"referralMarketing":[],"rawRules":[],"exceptions":[],"redirections":[],"forceRedirection":false},"legacy":{"urlPattern":"^https?://legacy\\.com","rules":["ref"]}}}"#;

    fn setup(dir: &Path, custom: Option<&str>, hash: Option<String>) -> MergeConfig {
        let rules = dir.join("data.minify.json");
        fs::write(&rules, UPSTREAM).unwrap();
        let hash_path = dir.join("rules.minify.hash");
        fs::write(&hash_path, hash.unwrap_or_else(|| sha256_hex(UPSTREAM.as_bytes()))).unwrap();

        let custom_file = dir.join("custom_rules.yaml");
        if let Some(content) = custom {
            fs::write(&custom_file, content).unwrap();
        }

        CustomConfigBuilder::new()
            .origin(UpstreamOrigin::LocalFile {
                rules,
                hash: Some(hash_path),
            })
            .custom_file(custom_file)
            .output_dir(dir.join("rules"))
            .build()
            .unwrap()
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_full_pipeline() {
        let tmp = tempfile::tempdir().unwrap();
        let config = setup(
            tmp.path(),
            Some(
                "modify-providers:\n  google:\n    rules: |\n      gclid\ndel-providers:\n  - legacy\nadd-providers:\n  example:\n    urlPattern: '^https?://example\\.com'\n    rules:\n      - track\n",
            ),
            None,
        );

        let summary = RuleBuilder::new(config).run().await.unwrap();
        assert_eq!(summary.providers, 2);
        assert_eq!(summary.stats.deleted_providers, 1);

        let merged = read_json(&summary.paths.merged);
        assert_eq!(
            merged["providers"]["google"]["rules"],
            serde_json::json!(["utm_source", "gclid"])
        );
        assert!(merged["providers"].get("legacy").is_none());
        assert_eq!(merged["providers"]["example"]["completeProvider"], Value::Bool(false));

        let minified = fs::read(&summary.paths.minified).unwrap();
        let hash = fs::read_to_string(&summary.paths.minified_hash).unwrap();
        assert_eq!(hash, sha256_hex(&minified));
        assert_eq!(hash, summary.minified_hash);

        assert!(summary.paths.upstream_backup.exists());
        assert!(summary.paths.badge.exists());
        let log = fs::read_to_string(&summary.paths.merge_log).unwrap();
        assert!(log.contains("[Modify] google"));
        assert!(log.contains("[Delete] legacy"));
    }

    #[tokio::test]
    async fn test_missing_custom_file_publishes_upstream() {
        let tmp = tempfile::tempdir().unwrap();
        let config = setup(tmp.path(), None, None);

        let summary = RuleBuilder::new(config).run().await.unwrap();
        assert_eq!(summary.providers, 2);
        assert_eq!(summary.warnings, 1);

        let merged = read_json(&summary.paths.merged);
        let upstream: Value = serde_json::from_str(UPSTREAM).unwrap();
        assert_eq!(
            merged["providers"]["google"]["rules"],
            upstream["providers"]["google"]["rules"]
        );

        let log = fs::read_to_string(&summary.paths.merge_log).unwrap();
        assert!(log.contains("WARNING SUMMARY (1)"));
        assert!(log.contains("Custom Modified  : N/A (File not found)"));
    }

    #[tokio::test]
    async fn test_integrity_failure_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let config = setup(tmp.path(), None, Some("f".repeat(64)));
        let output_dir = config.output.output_dir.clone();

        let err = RuleBuilder::new(config).run().await.unwrap_err();
        assert!(matches!(err, MergeError::IntegrityMismatch { .. }));
        assert!(!output_dir.exists());
    }

    #[tokio::test]
    async fn test_duplicate_add_is_fatal_by_default() {
        let tmp = tempfile::tempdir().unwrap();
        let custom = "add-providers:\n  google:\n    rules: |\n      gclid\n";
        let config = setup(tmp.path(), Some(custom), None);
        let output_dir = config.output.output_dir.clone();

        let err = RuleBuilder::new(config).run().await.unwrap_err();
        assert!(matches!(err, MergeError::Engine(_)));
        assert!(!output_dir.join("rules.min.json").exists());
    }

    #[tokio::test]
    async fn test_duplicate_add_merge_policy() {
        let tmp = tempfile::tempdir().unwrap();
        let custom = "add-providers:\n  google:\n    rules: |\n      gclid\n";
        let mut config = setup(tmp.path(), Some(custom), None);
        config.merge_options.duplicate_add = DuplicateAddPolicy::Merge;

        let summary = RuleBuilder::new(config).run().await.unwrap();
        let merged = read_json(&summary.paths.merged);
        assert_eq!(
            merged["providers"]["google"]["rules"],
            serde_json::json!(["utm_source", "gclid"])
        );
    }

    #[tokio::test]
    async fn test_builds_are_reproducible() {
        let tmp = tempfile::tempdir().unwrap();
        let custom = "modify-providers:\n  google:\n    rawRules:\n      - '\\/ref=[^/?]*'\n";
        let config = setup(tmp.path(), Some(custom), None);

        let first = RuleBuilder::new(config.clone()).run().await.unwrap();
        let second = RuleBuilder::new(config).run().await.unwrap();
        assert_eq!(first.minified_hash, second.minified_hash);
    }

    #[cfg(feature = "remote-loader")]
    #[tokio::test]
    async fn test_remote_integrity_failure_writes_nothing() {
        use crate::config::RetryPolicy;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data.minify.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(UPSTREAM))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rules.minify.hash"))
            .respond_with(ResponseTemplate::new(200).set_body_string("0".repeat(64)))
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let output_dir = tmp.path().join("rules");
        let config = CustomConfigBuilder::new()
            .upstream_url(format!("{}/data.minify.json", server.uri()))
            .upstream_hash_url(format!("{}/rules.minify.hash", server.uri()))
            .retry(RetryPolicy::Never)
            .custom_file(tmp.path().join("custom_rules.yaml"))
            .output_dir(&output_dir)
            .build()
            .unwrap();

        let err = RuleBuilder::new(config).run().await.unwrap_err();
        assert!(matches!(err, MergeError::IntegrityMismatch { .. }));
        assert!(!output_dir.exists());
    }
}
