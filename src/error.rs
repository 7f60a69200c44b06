//! 全局错误类型定义
use clearurls_merge_engine::EngineError;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;
use thiserror::Error;
use url::ParseError as UrlParseError;

#[derive(Error, Debug)]
pub enum MergeError {
    // 合并内核错误（指令解析、重复新增等）
    #[error("{0}")]
    Engine(#[from] EngineError),

    // 上游相关错误
    #[error("上游规则拉取失败：{0}")]
    Network(String),
    #[error("上游规则完整性校验失败：expected {expected}, downloaded {actual}")]
    IntegrityMismatch { expected: String, actual: String },
    #[cfg(feature = "remote-loader")]
    #[error("网络请求失败：{0}")]
    Http(#[from] reqwest::Error),

    // 配置错误
    #[error("配置无效：{0}")]
    Config(String),
    #[error("URL解析失败：{0}")]
    Url(#[from] UrlParseError),

    // 序列化/反序列化错误
    #[error("JSON解析失败：{0}")]
    Json(#[from] SerdeJsonError),

    // 基础错误
    #[error("IO操作失败：{0}")]
    Io(#[from] IoError),
}

// 全局Result类型
pub type MergeResult<T> = Result<T, MergeError>;
