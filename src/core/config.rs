//! # Runner Configuration Module / 运行器配置模块
//!
//! The `Runner.toml` file describes one job: the workflow to wrap, the
//! command that executes it, and the configuration, inputs, outputs and
//! handler parameters handed to the runner.
//!
//! `Runner.toml` 文件描述一个作业：要包装的工作流、执行它的命令，
//! 以及传递给运行器的配置、输入、输出和处理器参数。
//!
//! ```toml
//! language = "en"
//! workflow = "workflow.cwl"
//! command = "cwltool {workflow} {params}"
//! timeout_secs = 3600
//!
//! [status]
//! kind = "file"
//! path = "status.jsonl"
//!
//! [conf.lenv]
//! usid = "job-0001"
//!
//! [inputs.aoi]
//! value = "-118.98,37.71,-118.68,38.03"
//!
//! [handler]
//! max_cloud_cover = 20
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::execution::CommandSpec;
use crate::core::models::Params;
use crate::infra::fs::resolve_against;

/// Where status updates are sent.
/// 状态更新的发送目标。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StatusSink {
    /// Report through the log.
    /// 通过日志上报。
    #[default]
    Log,
    /// Append JSON lines to a file.
    /// 向文件追加 JSON 行。
    File { path: PathBuf },
}

/// The contents of a `Runner.toml` file.
/// `Runner.toml` 文件的内容。
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunnerConfig {
    /// The language for the runner's output messages (e.g., "en", "zh-CN").
    /// 运行器输出消息的语言（例如 "en", "zh-CN"）。
    #[serde(default = "default_language")]
    pub language: String,
    /// Path of the workflow document, relative to the config file.
    /// 工作流文档路径，相对于配置文件。
    pub workflow: PathBuf,
    /// Command template used to execute the wrapped workflow.
    /// 用于执行包装后工作流的命令模板。
    pub command: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub status: StatusSink,
    /// The shared configuration mapping. A `lenv` table receives status messages.
    /// 共享配置映射。`lenv` 表会接收状态消息。
    #[serde(default)]
    pub conf: Params,
    #[serde(default)]
    pub inputs: Params,
    #[serde(default)]
    pub outputs: Params,
    /// Additional parameters supplied through a handler, if any.
    /// 通过处理器提供的附加参数（如有）。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<Params>,
}

fn default_language() -> String {
    "en".to_string()
}

impl RunnerConfig {
    /// Loads a config file and resolves its relative paths against the file's directory.
    /// 加载配置文件，并基于该文件所在目录解析其中的相对路径。
    pub fn load(path: &Path) -> Result<Self> {
        let config_path = fs::canonicalize(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
        let mut config: RunnerConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        let base = config_path.parent().unwrap_or_else(|| Path::new("."));
        config.resolve_paths(base);
        Ok(config)
    }

    /// Makes `workflow` and a file status sink absolute relative to `base`.
    /// 将 `workflow` 和文件状态接收端路径基于 `base` 转为绝对路径。
    pub fn resolve_paths(&mut self, base: &Path) {
        self.workflow = resolve_against(base, &self.workflow);
        if let StatusSink::File { path } = &mut self.status {
            *path = resolve_against(base, path);
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn command_spec(&self) -> CommandSpec {
        CommandSpec {
            workflow: self.workflow.clone(),
            command: self.command.clone(),
            timeout: self.timeout(),
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        let mut lenv = Params::new();
        lenv.insert("usid".to_string(), "job-0001".into());
        let mut conf = Params::new();
        conf.insert("lenv".to_string(), lenv.into());

        Self {
            language: default_language(),
            workflow: PathBuf::from("workflow.cwl"),
            command: "cwltool {workflow} {params}".to_string(),
            timeout_secs: Some(3600),
            status: StatusSink::Log,
            conf,
            inputs: Params::new(),
            outputs: Params::new(),
            handler: None,
        }
    }
}
