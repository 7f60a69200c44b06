pub mod merge;

pub use merge::{
    CustomConfigBuilder, MergeConfig, OutputOptions, RemoteOptions, RetryPolicy, UpstreamOrigin,
    DEFAULT_CUSTOM_FILE, DEFAULT_OUTPUT_DIR, DEFAULT_UPSTREAM_HASH_URL, DEFAULT_UPSTREAM_URL,
};
