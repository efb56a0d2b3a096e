//! # Error Types Module / 错误类型模块
//!
//! Error types shared by the runner lifecycle and the status services.
//! The CLI layer wraps these in `anyhow::Error` with additional context.
//!
//! 运行器生命周期和状态服务共享的错误类型。
//! CLI 层会用 `anyhow::Error` 包装它们并附加上下文。

use thiserror::Error;

/// Failures raised by a [`StatusService`](crate::core::status::StatusService).
/// 由状态服务产生的错误。
#[derive(Debug, Error)]
pub enum StatusError {
    /// The status sink could not be written.
    /// 无法写入状态接收端。
    #[error("failed to write status update: {0}")]
    Io(#[from] std::io::Error),

    /// The status record could not be serialized.
    /// 无法序列化状态记录。
    #[error("failed to serialize status update: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The service refused the update.
    /// 服务拒绝了此次更新。
    #[error("status update rejected: {0}")]
    Rejected(String),
}

/// Failures raised while preparing or executing a runner.
/// 准备或执行运行器时产生的错误。
#[derive(Debug, Error)]
pub enum RunnerError {
    /// A lifecycle hook that a concrete runner must provide was called on a runner that lacks it.
    /// 在未提供具体实现的运行器上调用了必须实现的生命周期钩子。
    #[error("{0} is not implemented for this runner")]
    NotImplemented(&'static str),

    /// Forwarding progress to the status service failed.
    /// 向状态服务转发进度失败。
    #[error(transparent)]
    Status(#[from] StatusError),

    /// The workflow definition could not be loaded or wrapped.
    /// 无法加载或包装工作流定义。
    #[error("failed to wrap workflow '{path}': {source}")]
    Wrap {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The execution command could not be expanded or parsed.
    /// 无法展开或解析执行命令。
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
