//! # Runner Config Initialization Module / 运行器配置初始化模块
//!
//! This module provides an interactive command-line wizard that writes a
//! starter `Runner.toml`.
//!
//! 此模块提供一个交互式命令行向导，用于写入初始的 `Runner.toml`。
//!
//! ## Features / 功能特性
//!
//! - **Interactive Wizard**: Prompts for the workflow, command, timeout and status sink
//! - **Overwrite Protection**: Confirmation prompt before overwriting an existing config
//!
//! - **交互式向导**: 提示输入工作流、命令、超时和状态接收端
//! - **覆盖保护**: 覆盖现有配置前的确认提示

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::config::{RunnerConfig, StatusSink};
use crate::infra::t;

/// Default file name written by the wizard.
/// 向导写入的默认文件名。
pub const CONFIG_FILE: &str = "Runner.toml";

/// Runs the interactive wizard to generate a `Runner.toml` file in the current directory.
///
/// 运行交互式向导，在当前目录生成 `Runner.toml` 文件。
pub fn run_init_wizard(language: &str, non_interactive: bool) -> Result<()> {
    let config_path = Path::new(CONFIG_FILE);
    let theme = ColorfulTheme::default();

    if non_interactive {
        let config = RunnerConfig {
            language: language.to_string(),
            ..RunnerConfig::default()
        };
        return write_config(config_path, &config, language);
    }

    println!("\n{}", t!("init_wizard_welcome", locale = language).cyan().bold());

    if config_path.exists() {
        let confirmation = Confirm::with_theme(&theme)
            .with_prompt(t!("init_overwrite_prompt", locale = language, path = config_path.display()))
            .default(false)
            .interact()
            .context(t!("init_user_confirmation_failed", locale = language).to_string())?;
        if !confirmation {
            println!("{}", t!("init_aborted", locale = language));
            return Ok(());
        }
    }

    let defaults = RunnerConfig::default();

    let workflow: String = Input::with_theme(&theme)
        .with_prompt(t!("init_workflow_prompt", locale = language))
        .default(defaults.workflow.display().to_string())
        .interact_text()
        .context(t!("init_user_confirmation_failed", locale = language).to_string())?;

    let command: String = Input::with_theme(&theme)
        .with_prompt(t!("init_command_prompt", locale = language))
        .default(defaults.command.clone())
        .interact_text()
        .context(t!("init_user_confirmation_failed", locale = language).to_string())?;

    let timeout_secs: u64 = Input::with_theme(&theme)
        .with_prompt(t!("init_timeout_prompt", locale = language))
        .default(defaults.timeout_secs.unwrap_or(0))
        .interact_text()
        .context(t!("init_user_confirmation_failed", locale = language).to_string())?;

    let use_status_file = Confirm::with_theme(&theme)
        .with_prompt(t!("init_status_file_prompt", locale = language))
        .default(false)
        .interact()
        .context(t!("init_user_confirmation_failed", locale = language).to_string())?;

    let status = if use_status_file {
        let path: String = Input::with_theme(&theme)
            .with_prompt(t!("init_status_path_prompt", locale = language))
            .default("status.jsonl".to_string())
            .interact_text()
            .context(t!("init_user_confirmation_failed", locale = language).to_string())?;
        StatusSink::File {
            path: PathBuf::from(path),
        }
    } else {
        StatusSink::Log
    };

    let config = RunnerConfig {
        language: language.to_string(),
        workflow: PathBuf::from(workflow),
        command,
        timeout_secs: (timeout_secs > 0).then_some(timeout_secs),
        status,
        ..defaults
    };

    write_config(config_path, &config, language)
}

/// Serializes `config` to `path`.
/// 将 `config` 序列化写入 `path`。
pub fn write_config(path: &Path, config: &RunnerConfig, language: &str) -> Result<()> {
    let toml_string = toml::to_string_pretty(config)
        .context(t!("init_serialize_failed", locale = language).to_string())?;

    fs::write(path, toml_string)
        .with_context(|| t!("init_write_failed", locale = language, path = path.display()).to_string())?;

    println!(
        "\n{} {}",
        "✔".green(),
        t!("init_success_created", locale = language, path = path.display()).bold()
    );
    println!("{}", t!("init_usage_hint", locale = language));

    Ok(())
}
