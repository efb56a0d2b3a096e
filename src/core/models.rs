//! # Data Models Module / 数据模型模块
//!
//! This module defines the records exchanged across the runner lifecycle:
//! the merged processing parameters, the execution descriptor returned by
//! `prepare()`, and the outcome of an execution.
//!
//! 此模块定义了运行器生命周期中交换的记录：
//! 合并后的处理参数、`prepare()` 返回的执行描述符以及执行结果。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;

/// A flat mapping of processing parameters.
/// 处理参数的扁平映射。
pub type Params = Map<String, Value>;

/// Merges the runner's own parameters with a handler's additional parameters.
/// Keys from `additional` replace keys from `own` on collision.
///
/// 将运行器自身参数与处理器的附加参数合并。键冲突时以 `additional` 为准。
pub fn merge_parameters(own: Params, additional: Option<Params>) -> Params {
    let mut merged = own;
    if let Some(additional) = additional {
        merged.extend(additional);
    }
    merged
}

/// The record returned by `prepare()`: the wrapped workflow and its parameters.
/// `prepare()` 返回的记录：包装后的工作流及其参数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionDescriptor {
    /// The wrapped workflow definition. Opaque to the lifecycle.
    /// 包装后的工作流定义，对生命周期而言是不透明的。
    pub cwl: Value,
    /// Processing parameters, with handler values taking precedence.
    /// 处理参数，处理器提供的值优先。
    pub params: Params,
}

/// The conventional lifecycle states of a runner. Transitions are logged, not enforced.
/// 运行器的约定生命周期状态。状态转换仅记录日志，不做强制。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunnerState {
    Constructed,
    Prepared,
    Executed,
}

impl fmt::Display for RunnerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunnerState::Constructed => "constructed",
            RunnerState::Prepared => "prepared",
            RunnerState::Executed => "executed",
        };
        f.write_str(name)
    }
}

/// Enumerates the possible reasons an execution did not succeed.
/// 枚举执行未成功的可能原因。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum FailureReason {
    /// The command ran and exited with a non-zero status.
    /// 命令已运行，但以非零状态退出。
    NonZeroExit,
    /// The command exceeded its configured timeout.
    /// 命令超出了配置的超时时间。
    Timeout,
    /// The command could not be started.
    /// 命令无法启动。
    Spawn,
    /// The run was cancelled before the command finished.
    /// 在命令完成之前运行被取消。
    Cancelled,
}

/// The final result of a single `execute()` call.
/// 单次 `execute()` 调用的最终结果。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RunOutcome {
    Succeeded {
        /// Combined stdout and stderr of the command / 命令合并的 stdout 和 stderr
        output: String,
        duration: Duration,
    },
    Failed {
        output: String,
        reason: FailureReason,
        duration: Duration,
    },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Succeeded { .. })
    }

    pub fn output(&self) -> &str {
        match self {
            RunOutcome::Succeeded { output, .. } | RunOutcome::Failed { output, .. } => output,
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            RunOutcome::Succeeded { duration, .. } | RunOutcome::Failed { duration, .. } => {
                *duration
            }
        }
    }

    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            RunOutcome::Succeeded { .. } => None,
            RunOutcome::Failed { reason, .. } => Some(*reason),
        }
    }
}
