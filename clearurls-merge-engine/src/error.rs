//! clearurls-merge-engine 内核错误定义
//! 封装合并内核的所有错误，与 IO 层错误解耦，基于 thiserror 实现类型安全处理
use thiserror::Error;

/// 内核核心错误枚举
#[derive(Error, Debug)]
pub enum EngineError {
    // ===================== 指令相关错误 =====================
    /// 指令文件解析失败（YAML 语法错误 / 顶层结构不是映射）
    #[error("Directive parse failed: {0}")]
    DirectiveParse(String),

    /// 单条指令非法（字段类型错误、对非列表字段使用 del- 等）
    #[error("Invalid directive for provider '{provider}': {reason}")]
    InvalidDirective { provider: String, reason: String },

    /// 新增的 Provider 在上游已存在（防止静默覆盖上游新增）
    #[error("Provider '{0}' already exists upstream, refusing to add it again")]
    DuplicateProvider(String),

    // ===================== 序列化错误 =====================
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// 内核层全局 Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
