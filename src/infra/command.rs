//! # Command Execution Module / 命令执行模块
//!
//! Helpers for turning a command template into a process invocation and for
//! running that process while capturing its output.
//!
//! 将命令模板转换为进程调用、并在运行该进程时捕获其输出的辅助工具。

use std::io;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;

use crate::core::error::RunnerError;

/// Placeholder replaced by the path of the wrapped workflow file.
/// 替换为包装后工作流文件路径的占位符。
pub const WORKFLOW_PLACEHOLDER: &str = "{workflow}";

/// Placeholder replaced by the path of the parameters file.
/// 替换为参数文件路径的占位符。
pub const PARAMS_PLACEHOLDER: &str = "{params}";

/// Expands environment variables and `~` in `template`, substitutes the
/// workflow and parameter file paths, and splits the result into a program
/// and its arguments.
///
/// 展开 `template` 中的环境变量和 `~`，替换工作流和参数文件路径，
/// 并将结果拆分为程序及其参数。
pub fn render_command(
    template: &str,
    workflow: &Path,
    params: &Path,
) -> Result<(String, Vec<String>), RunnerError> {
    let expanded = shellexpand::full(template)
        .map_err(|e| RunnerError::InvalidCommand(format!("failed to expand '{template}': {e}")))?;

    let workflow = quote_path(workflow)?;
    let params = quote_path(params)?;
    let rendered = expanded
        .replace(WORKFLOW_PLACEHOLDER, &workflow)
        .replace(PARAMS_PLACEHOLDER, &params);

    let mut parts = shlex::split(&rendered)
        .ok_or_else(|| RunnerError::InvalidCommand(format!("failed to parse '{rendered}'")))?;

    if parts.is_empty() {
        return Err(RunnerError::InvalidCommand(
            "empty command after parsing".to_string(),
        ));
    }

    let program = parts.remove(0);
    Ok((program, parts))
}

fn quote_path(path: &Path) -> Result<String, RunnerError> {
    let path = path.to_string_lossy();
    shlex::try_quote(&path)
        .map(|quoted| quoted.into_owned())
        .map_err(|e| RunnerError::InvalidCommand(format!("cannot quote path '{path}': {e}")))
}

/// What a finished process wrote, with its exit status.
/// 已结束进程的输出及其退出状态。
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    /// stdout followed by stderr, for logs and failure reports.
    /// 先 stdout 后 stderr，用于日志和失败报告。
    pub fn combined(&self) -> String {
        let mut combined = String::with_capacity(self.stdout.len() + self.stderr.len());
        combined.push_str(&self.stdout);
        if !combined.is_empty() && !combined.ends_with('\n') && !self.stderr.is_empty() {
            combined.push('\n');
        }
        combined.push_str(&self.stderr);
        combined
    }
}

/// Spawns `cmd` with piped stdout and stderr and waits for it to finish.
///
/// The two streams are kept apart so that callers can parse stdout on its own.
/// Invalid UTF-8 is replaced rather than rejected. Dropping the returned future
/// drops the child, which kills it when `kill_on_drop` is set.
///
/// 以管道方式派生 `cmd` 并等待其结束。两个输出流分开保存，调用方可以单独解析 stdout。
/// 无效的 UTF-8 会被替换而不是拒绝。丢弃返回的 future 会丢弃子进程，
/// 若设置了 `kill_on_drop` 则子进程会被终止。
pub async fn spawn_and_capture(mut cmd: Command) -> io::Result<CapturedOutput> {
    let child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    let output = child.wait_with_output().await?;

    Ok(CapturedOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
