//! 规则加载模块
//! 统一导出上游规则与自定义指令的加载组件
#[cfg(feature = "remote-loader")]
pub mod remote_fetcher;
pub mod upstream_loader;
pub mod custom_loader;

#[cfg(feature = "remote-loader")]
pub use remote_fetcher::{FetchedResource, RemoteRuleFetcher};
pub use upstream_loader::{verify_integrity, UpstreamLoader, UpstreamSnapshot};
pub use custom_loader::{CustomDirectives, CustomRuleLoader};
