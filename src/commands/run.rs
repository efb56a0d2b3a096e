//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command: it loads a runner config,
//! wires the status service and handler into a [`CommandRunner`], validates
//! the inputs and drives the runner through its lifecycle.
//!
//! 此模块实现 `run` 命令：加载运行器配置，将状态服务和处理器装配到
//! [`CommandRunner`] 中，校验输入，并驱动运行器完成其生命周期。

use anyhow::{Context, Result};
use colored::*;
use std::{path::PathBuf, sync::Arc};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    core::{
        conf::Conf,
        config::{RunnerConfig, StatusSink},
        execution::CommandRunner,
        handler::StaticHandler,
        runner::{drive, Runner, RunnerContext},
        status::{FanOutStatusService, FileStatusService, LogStatusService, MemoryStatusService, StatusService},
    },
    infra::t,
    reporting::{print_failure_details, print_summary},
    resolve_locale,
};

/// Executes the run command with the provided arguments.
///
/// # Arguments
/// * `config` - Path to the runner configuration file
/// * `status_file` - Overrides the config's status sink with a JSON-lines file
/// * `language` - Language given on the command line, if any
///
/// # Returns
/// An error when the config cannot be loaded, the inputs are invalid, the
/// status service fails, or the workflow command does not succeed.
pub async fn execute(
    config: PathBuf,
    status_file: Option<PathBuf>,
    language: Option<String>,
) -> Result<()> {
    let mut runner_config = RunnerConfig::load(&config)?;
    if let Some(path) = status_file {
        runner_config.status = StatusSink::File { path };
    }

    let locale = resolve_locale(Some(language.as_deref().unwrap_or(&runner_config.language)));
    rust_i18n::set_locale(&locale);

    println!(
        "{}",
        t!("loading_config", locale = locale, path = config.display())
    );
    println!(
        "{}",
        t!("workflow_detected", locale = locale, path = runner_config.workflow.display()).cyan()
    );

    let history = Arc::new(MemoryStatusService::new());
    let status = build_status_service(&runner_config.status, Arc::clone(&history))?;

    let conf = Conf::from_map(runner_config.conf.clone());
    let mut ctx = RunnerContext::new(
        runner_config.inputs.clone(),
        conf.clone(),
        runner_config.outputs.clone(),
        status,
    );
    if let Some(params) = &runner_config.handler {
        ctx = ctx.with_handler(Arc::new(StaticHandler::new(params.clone())));
    }

    let stop_token = setup_signal_handler(&locale);
    let mut runner =
        CommandRunner::new(ctx, runner_config.command_spec()).with_cancellation(stop_token);

    if !runner.validate_inputs() {
        anyhow::bail!(t!("inputs_invalid", locale = locale).to_string());
    }

    let outcome = drive(&mut runner)
        .await
        .with_context(|| format!("Failed to run workflow {}", runner_config.workflow.display()))?;
    info!(message = ?conf.lenv_message(), "final status message");

    let ctx = runner.into_context();
    print_summary(&outcome, &history.updates(), ctx.outputs(), &locale);

    if outcome.is_success() {
        println!("\n{}", t!("run_succeeded", locale = locale).green().bold());
        Ok(())
    } else {
        print_failure_details(&outcome, &locale);
        anyhow::bail!(t!("run_failed", locale = locale).to_string())
    }
}

/// Builds the status service for a run: the configured sink plus an
/// in-memory history used for the summary.
///
/// 为一次运行构建状态服务：配置的接收端加上用于摘要的内存历史记录。
pub fn build_status_service(
    sink: &StatusSink,
    history: Arc<MemoryStatusService>,
) -> Result<Arc<dyn StatusService>> {
    let primary: Arc<dyn StatusService> = match sink {
        StatusSink::Log => Arc::new(LogStatusService),
        StatusSink::File { path } => Arc::new(
            FileStatusService::open(path)
                .with_context(|| format!("Failed to open status file: {}", path.display()))?,
        ),
    };
    Ok(Arc::new(FanOutStatusService::new().with(primary).with(history)))
}

fn setup_signal_handler(locale: &str) -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();
    let locale = locale.to_string();

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            println!("\n{}", t!("shutdown_signal", locale = &locale).yellow());
            token_clone.cancel();
        }
    });

    token
}
