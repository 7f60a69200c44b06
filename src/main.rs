//! clearurls-merge 命令行入口
//! 退出码：0 成功；1 任意致命错误（拉取失败、哈希不匹配、指令非法、写盘失败）

use clap::Parser;
use env_logger::{Builder, Env, Target};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clearurls_merge::config::{
    DEFAULT_CUSTOM_FILE, DEFAULT_OUTPUT_DIR, DEFAULT_UPSTREAM_HASH_URL, DEFAULT_UPSTREAM_URL,
};
use clearurls_merge::{
    CustomConfigBuilder, DuplicateAddPolicy, MergeResult, RetryPolicy, RuleBuilder, UpstreamOrigin,
};

#[derive(Parser, Debug)]
#[command(
    name = "clearurls-merge",
    version,
    about = "Merge ClearURLs upstream rules with local YAML directives"
)]
struct Cli {
    /// Upstream rules URL
    #[arg(long, env = "CLEARURLS_UPSTREAM_URL", default_value = DEFAULT_UPSTREAM_URL)]
    upstream_url: String,

    /// Upstream hash URL
    #[arg(long, env = "CLEARURLS_UPSTREAM_HASH_URL", default_value = DEFAULT_UPSTREAM_HASH_URL)]
    upstream_hash_url: String,

    /// Read upstream rules from a local file instead of fetching them
    #[arg(long)]
    upstream_file: Option<PathBuf>,

    /// Hash file for --upstream-file
    #[arg(long, requires = "upstream_file")]
    upstream_hash_file: Option<PathBuf>,

    /// Custom directive file
    #[arg(long, default_value = DEFAULT_CUSTOM_FILE)]
    custom: PathBuf,

    /// Output directory
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Retries per request (0 disables retrying)
    #[arg(long, default_value_t = 2)]
    retries: u8,

    /// Merge into an existing provider instead of failing when add-providers names one
    #[arg(long)]
    allow_duplicate_add: bool,
}

impl Cli {
    fn into_builder(self) -> CustomConfigBuilder {
        let origin = match self.upstream_file {
            Some(rules) => UpstreamOrigin::LocalFile {
                rules,
                hash: self.upstream_hash_file,
            },
            None => UpstreamOrigin::Remote,
        };
        let retry = match self.retries {
            0 => RetryPolicy::Never,
            n => RetryPolicy::Times(n),
        };
        let duplicate_add = if self.allow_duplicate_add {
            DuplicateAddPolicy::Merge
        } else {
            DuplicateAddPolicy::Fail
        };

        CustomConfigBuilder::new()
            .origin(origin)
            .upstream_url(self.upstream_url)
            .upstream_hash_url(self.upstream_hash_url)
            .timeout(Duration::from_secs(self.timeout))
            .retry(retry)
            .custom_file(self.custom)
            .output_dir(self.output_dir)
            .duplicate_add(duplicate_add)
    }
}

async fn run(cli: Cli) -> MergeResult<()> {
    let config = cli.into_builder().build()?;
    let summary = RuleBuilder::new(config).run().await?;
    log::info!(
        "[ok] {} providers published, sha256 {} ({} warnings)",
        summary.providers,
        summary.minified_hash,
        summary.warnings
    );
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("[!] {}", e);
            ExitCode::from(1)
        }
    }
}
