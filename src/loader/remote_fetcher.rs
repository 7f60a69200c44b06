//! Remote rule fetcher module
//! 远程规则拉取工具
//! 核心特性：
//! 1. 可配置重试策略（Never/Times(n)），固定 1 秒间隔
//! 2. 保留最后一次错误信息
//! 3. 附带 Last-Modified 响应头，供构建日志使用

use reqwest::Client;

use crate::config::{RemoteOptions, RetryPolicy};
use crate::error::{MergeError, MergeResult};

const USER_AGENT: &str = concat!("clearurls-merge/", env!("CARGO_PKG_VERSION"));

/// 单次拉取结果
#[derive(Debug, Clone)]
pub struct FetchedResource {
    pub bytes: Vec<u8>,
    /// 原始 Last-Modified 响应头
    pub last_modified: Option<String>,
}

/// 远程规则拉取器
/// 无状态工具类，专注于远程资源的拉取和重试逻辑
#[derive(Default)]
pub struct RemoteRuleFetcher;

impl RemoteRuleFetcher {
    /// 按远程选项构建 HTTP 客户端
    pub fn build_client(&self, options: &RemoteOptions) -> MergeResult<Client> {
        Ok(Client::builder()
            .timeout(options.timeout)
            .user_agent(USER_AGENT)
            .build()?)
    }

    /// 通用异步重试逻辑
    /// - max_retries: 最大重试次数（0表示不重试）
    /// - func: 异步闭包，返回MergeResult<T>
    async fn simple_retry<F, Fut, T>(&self, max_retries: usize, mut func: F) -> MergeResult<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = MergeResult<T>>,
    {
        let mut last_err: Option<MergeError> = None;

        for attempt in 0..=max_retries {
            match func().await {
                Ok(res) => return Ok(res),
                Err(e) => {
                    if attempt < max_retries {
                        log::warn!(
                            "Request failed: {}, retrying (attempt {}/{})",
                            e,
                            attempt + 1,
                            max_retries
                        );
                        tokio::time::sleep(tokio::time::Duration::from_secs(1)).await;
                    }
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| {
            MergeError::Network("All retry attempts exhausted".to_string())
        }))
    }

    /// GET 拉取远程资源（规则 JSON 或 Hash 文本）
    pub async fn fetch(
        &self,
        client: &Client,
        url: &str,
        retry_policy: &RetryPolicy,
    ) -> MergeResult<FetchedResource> {
        let resource = self
            .simple_retry(retry_policy.max_retries(), || {
                let client = client.clone();
                let url = url.to_string();

                Box::pin(async move {
                    let response = client
                        .get(&url)
                        .header(reqwest::header::ACCEPT_ENCODING, "gzip")
                        .send()
                        .await
                        .map_err(|e| {
                            MergeError::Network(format!("Failed to request {}: {}", url, e))
                        })?;

                    if !response.status().is_success() {
                        return Err(MergeError::Network(format!(
                            "URL {} returned status code {}",
                            url,
                            response.status()
                        )));
                    }

                    let last_modified = response
                        .headers()
                        .get(reqwest::header::LAST_MODIFIED)
                        .and_then(|value| value.to_str().ok())
                        .map(str::to_string);

                    let bytes = response.bytes().await.map_err(|e| {
                        MergeError::Network(format!(
                            "Failed to read response bytes from {}: {}",
                            url, e
                        ))
                    })?;

                    Ok(FetchedResource {
                        bytes: bytes.to_vec(),
                        last_modified,
                    })
                })
            })
            .await?;

        log::debug!("Fetched {} ({} bytes)", url, resource.bytes.len());
        Ok(resource)
    }
}
