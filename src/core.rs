//! # Core Module / 核心模块
//!
//! This module contains the core functionality of Workflow Runner:
//! the shared configuration, the runner lifecycle, status services,
//! handlers and the local command runner.
//!
//! 此模块包含 Workflow Runner 的核心功能：
//! 共享配置、运行器生命周期、状态服务、处理器以及本地命令运行器。

pub mod conf;
pub mod config;
pub mod error;
pub mod execution;
pub mod handler;
pub mod models;
pub mod runner;
pub mod status;

// Re-exports
pub use conf::Conf;
pub use config::RunnerConfig;
pub use error::{RunnerError, StatusError};
pub use execution::CommandRunner;
pub use models::{ExecutionDescriptor, Params, RunOutcome};
pub use runner::{BaseRunner, Runner, RunnerContext, RunnerExt};
