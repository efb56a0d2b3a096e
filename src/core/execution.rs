//! # Command Runner Module / 命令运行器模块
//!
//! A concrete [`Runner`] that executes the wrapped workflow locally by running
//! a command template (for example `cwltool {workflow} {params}`).
//! It handles the scratch directory, timeout and cancellation, and reports
//! progress through the shared lifecycle hooks.
//!
//! 一个具体的 [`Runner`]，通过运行命令模板（例如 `cwltool {workflow} {params}`）
//! 在本地执行包装后的工作流。它负责临时目录、超时和取消，并通过共享生命周期钩子上报进度。

use serde_json::Value;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::core::{
    error::RunnerError,
    models::{ExecutionDescriptor, FailureReason, Params, RunOutcome},
    runner::{Runner, RunnerContext},
};
use crate::infra::command::{self, CapturedOutput};
use crate::infra::fs;

/// Progress reported once the command has been launched.
/// 命令启动后上报的进度。
pub const RUN_PROGRESS: u8 = 20;

/// Progress reported when execution ends, successfully or not.
/// 执行结束（无论成功与否）时上报的进度。
pub const FINAL_PROGRESS: u8 = 100;

/// File name of the wrapped workflow inside the scratch directory.
pub const WORKFLOW_FILE: &str = "workflow.cwl";
/// File name of the merged parameters inside the scratch directory.
pub const PARAMS_FILE: &str = "params.json";

/// What to run and how long to let it run.
/// 要运行的内容及允许运行的时长。
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// Path of the workflow document to wrap.
    /// 要包装的工作流文档路径。
    pub workflow: PathBuf,
    /// Command template; `{workflow}` and `{params}` are replaced with file paths.
    /// 命令模板；`{workflow}` 和 `{params}` 会被替换为文件路径。
    pub command: String,
    pub timeout: Option<Duration>,
}

enum Finished {
    Exited(std::io::Result<CapturedOutput>),
    TimedOut(Duration),
    Cancelled,
}

/// Runs a workflow through a local command.
/// 通过本地命令运行工作流。
#[derive(Debug)]
pub struct CommandRunner {
    ctx: RunnerContext,
    spec: CommandSpec,
    cancel: CancellationToken,
}

impl CommandRunner {
    pub fn new(ctx: RunnerContext, spec: CommandSpec) -> Self {
        Self {
            ctx,
            spec,
            cancel: CancellationToken::new(),
        }
    }

    /// Stops the command when `token` is cancelled.
    /// 当 `token` 被取消时停止命令。
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    /// Consumes the runner, returning its context (and so its outputs).
    /// 消耗运行器并返回其上下文（以及其中的输出）。
    pub fn into_context(self) -> RunnerContext {
        self.ctx
    }

    async fn run_command(&self, program: String, args: Vec<String>, cwd: PathBuf) -> Finished {
        let mut cmd = tokio::process::Command::new(program);
        cmd.args(args).kill_on_drop(true).current_dir(cwd);

        let capture = async {
            match self.spec.timeout {
                Some(limit) => {
                    match tokio::time::timeout(limit, command::spawn_and_capture(cmd)).await {
                        Ok(captured) => Finished::Exited(captured),
                        Err(_) => Finished::TimedOut(limit),
                    }
                }
                None => Finished::Exited(command::spawn_and_capture(cmd).await),
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Finished::Cancelled,
            finished = capture => finished,
        }
    }

    /// Merges a JSON object printed on stdout into the outputs.
    /// Anything else on stdout leaves the outputs unchanged.
    ///
    /// 将 stdout 上打印的 JSON 对象合并到输出中。stdout 上的其他内容不会改变输出。
    fn collect_outputs(&mut self, stdout: &str) {
        let stdout = stdout.trim();
        if stdout.is_empty() {
            return;
        }
        match serde_json::from_str::<Value>(stdout) {
            Ok(Value::Object(produced)) => {
                debug!(keys = produced.len(), "collected outputs from stdout");
                self.ctx.outputs_mut().extend(produced);
            }
            Ok(other) => warn!(
                kind = json_kind(&other),
                "stdout is JSON but not an object, outputs unchanged"
            ),
            Err(e) => warn!(error = %e, "stdout is not JSON, outputs unchanged"),
        }
    }

    fn fail(
        &self,
        output: String,
        reason: FailureReason,
        duration: Duration,
    ) -> Result<RunOutcome, RunnerError> {
        warn!(?reason, "workflow execution failed");
        self.update_status(FINAL_PROGRESS, "execution failed")?;
        Ok(RunOutcome::Failed {
            output,
            reason,
            duration,
        })
    }
}

/// `{"value": x}` becomes `x`; anything else is returned unchanged.
/// `{"value": x}` 变为 `x`；其他值原样返回。
fn unwrap_value(value: &Value) -> &Value {
    match value {
        Value::Object(map) => map.get("value").unwrap_or(value),
        _ => value,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// An input is missing when it is `null` or an empty table.
/// 输入为 `null` 或空表时视为缺失。
fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

impl Runner for CommandRunner {
    fn context(&self) -> &RunnerContext {
        &self.ctx
    }

    fn processing_parameters(&self) -> Params {
        self.ctx
            .inputs()
            .iter()
            .map(|(name, value)| (name.clone(), unwrap_value(value).clone()))
            .collect()
    }

    fn wrap(&self) -> Result<Value, RunnerError> {
        fs::read_document(&self.spec.workflow).map_err(|source| RunnerError::Wrap {
            path: self.spec.workflow.display().to_string(),
            source,
        })
    }

    fn validate_inputs(&self) -> bool {
        self.ctx.validate_inputs();
        let missing: Vec<&str> = self
            .ctx
            .inputs()
            .iter()
            .filter(|(_, value)| is_missing(unwrap_value(value)))
            .map(|(name, _)| name.as_str())
            .collect();

        if missing.is_empty() {
            true
        } else {
            warn!(missing = ?missing, "inputs without a value");
            false
        }
    }

    async fn execute(&mut self, descriptor: ExecutionDescriptor) -> Result<RunOutcome, RunnerError> {
        let job_name = self
            .spec
            .workflow
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "job".to_string());
        let work_dir = fs::create_work_dir(&job_name)?;

        let workflow_path = work_dir.path().join(WORKFLOW_FILE);
        let params_path = work_dir.path().join(PARAMS_FILE);
        fs::write_document(&workflow_path, &descriptor.cwl)?;
        fs::write_document(&params_path, &Value::Object(descriptor.params))?;

        let (program, args) = command::render_command(&self.spec.command, &workflow_path, &params_path)?;
        info!(program = %program, args = ?args, "launching workflow command");
        self.update_status(RUN_PROGRESS, "running workflow")?;

        let start_time = Instant::now();
        let finished = self
            .run_command(program, args, work_dir.path().to_path_buf())
            .await;
        let duration = start_time.elapsed();

        match finished {
            Finished::Exited(Ok(captured)) if captured.status.success() => {
                let output = captured.combined();
                if !output.trim().is_empty() {
                    self.log_output(&output.trim());
                }
                self.collect_outputs(&captured.stdout);
                self.update_status(FINAL_PROGRESS, "execution completed")?;
                Ok(RunOutcome::Succeeded { output, duration })
            }
            Finished::Exited(Ok(captured)) => {
                let output = captured.combined();
                self.log_output(&output.trim());
                let output = format!("{output}exit status: {}\n", captured.status);
                self.fail(output, FailureReason::NonZeroExit, duration)
            }
            Finished::Exited(Err(e)) => {
                self.fail(format!("failed to start command: {e}"), FailureReason::Spawn, duration)
            }
            Finished::TimedOut(limit) => self.fail(
                format!("command timed out after {}s", limit.as_secs()),
                FailureReason::Timeout,
                duration,
            ),
            Finished::Cancelled => {
                self.fail("command cancelled".to_string(), FailureReason::Cancelled, duration)
            }
        }
    }
}
