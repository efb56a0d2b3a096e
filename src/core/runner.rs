//! # Runner Lifecycle Module / 运行器生命周期模块
//!
//! This module defines the lifecycle shared by every workflow runner.
//! A concrete runner implements [`Runner`], supplying its processing
//! parameters, the wrapped workflow and `execute()`. The shared hooks
//! (status updates, output logging, input validation) live on
//! [`RunnerContext`], which every runner owns.
//!
//! 此模块定义了所有工作流运行器共享的生命周期。
//! 具体运行器实现 [`Runner`]，提供其处理参数、包装后的工作流以及 `execute()`。
//! 共享钩子（状态更新、输出日志、输入校验）位于每个运行器持有的 [`RunnerContext`] 上。
//!
//! ## Lifecycle / 生命周期
//!
//! `Constructed` -> `prepare()` -> `Prepared` -> `execute()` -> `Executed`
//!
//! Progress is reported on a 0-100 scale; `prepare()` always reports `2` first.
//! 进度以 0-100 表示；`prepare()` 总是首先上报 `2`。

use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::{
    conf::{Conf, ConfView},
    error::RunnerError,
    handler::Handler,
    models::{merge_parameters, ExecutionDescriptor, Params, RunOutcome, RunnerState},
    status::StatusService,
};

/// Progress reported when preparation starts.
/// 准备开始时上报的进度。
pub const PREPARE_PROGRESS: u8 = 2;

const PREPARE_MESSAGE: &str = "starting execution";

/// State shared by every runner: inputs, configuration, outputs, the optional
/// handler and the injected status service.
///
/// 每个运行器共享的状态：输入、配置、输出、可选处理器以及注入的状态服务。
pub struct RunnerContext {
    inputs: Params,
    conf: Conf,
    conf_view: ConfView,
    outputs: Params,
    handler: Option<Arc<dyn Handler>>,
    status: Arc<dyn StatusService>,
}

impl RunnerContext {
    /// Creates a context without a handler.
    /// 创建一个不带处理器的上下文。
    pub fn new(
        inputs: Params,
        conf: Conf,
        outputs: Params,
        status: Arc<dyn StatusService>,
    ) -> Self {
        let conf_view = conf.view();
        Self {
            inputs,
            conf,
            conf_view,
            outputs,
            handler: None,
            status,
        }
    }

    pub fn with_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn inputs(&self) -> &Params {
        &self.inputs
    }

    pub fn conf(&self) -> &Conf {
        &self.conf
    }

    /// Read-only view of the configuration for downstream consumers.
    /// 提供给下游使用者的只读配置视图。
    pub fn conf_view(&self) -> &ConfView {
        &self.conf_view
    }

    pub fn outputs(&self) -> &Params {
        &self.outputs
    }

    pub fn outputs_mut(&mut self) -> &mut Params {
        &mut self.outputs
    }

    pub fn handler(&self) -> Option<&Arc<dyn Handler>> {
        self.handler.as_ref()
    }

    /// Records `message` under `lenv.message` (when `lenv` is a mapping) and
    /// forwards the configuration and `progress` to the status service.
    ///
    /// Status service errors are returned to the caller unchanged.
    ///
    /// 在 `lenv.message` 下记录 `message`（当 `lenv` 为映射时），
    /// 并将配置和 `progress` 转发给状态服务。状态服务的错误原样返回给调用方。
    pub fn update_status(&self, progress: u8, message: &str) -> Result<(), RunnerError> {
        if !self.conf.set_lenv_message(message) {
            debug!(progress, "configuration has no lenv mapping, message not recorded");
        }
        self.status.update_status(&self.conf, progress)?;
        Ok(())
    }

    pub fn log_output(&self, output: &dyn fmt::Display) {
        info!("[BaseRunner] Output: {}", output);
    }

    /// Default input validation: logs and accepts.
    /// 默认输入校验：记录日志并通过。
    pub fn validate_inputs(&self) -> bool {
        info!("[BaseRunner] Validating inputs...");
        true
    }

    /// Additional parameters from the handler, if one is attached.
    /// 来自处理器的附加参数（如果已附加处理器）。
    pub fn additional_parameters(&self) -> Option<Params> {
        self.handler.as_ref().map(|h| h.additional_parameters())
    }
}

impl fmt::Debug for RunnerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunnerContext")
            .field("inputs", &self.inputs)
            .field("conf", &self.conf)
            .field("outputs", &self.outputs)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

/// The runner interface. `execute()` is the extension point for concrete
/// runner variants; everything else has a shared default.
///
/// `prepare()` is not part of this trait. It comes from [`RunnerExt`], which
/// every runner gets and none can replace:
///
/// ```compile_fail
/// use serde_json::Value;
/// use workflow_runner::core::error::RunnerError;
/// use workflow_runner::core::models::{ExecutionDescriptor, Params, RunOutcome};
/// use workflow_runner::core::runner::{Runner, RunnerContext};
///
/// struct Skipping {
///     ctx: RunnerContext,
/// }
///
/// impl Runner for Skipping {
///     fn context(&self) -> &RunnerContext {
///         &self.ctx
///     }
///     fn processing_parameters(&self) -> Params {
///         Params::new()
///     }
///     fn wrap(&self) -> Result<Value, RunnerError> {
///         Ok(Value::Null)
///     }
///     async fn execute(&mut self, _: ExecutionDescriptor) -> Result<RunOutcome, RunnerError> {
///         Err(RunnerError::NotImplemented("execute"))
///     }
///     fn prepare(&self) -> Result<ExecutionDescriptor, RunnerError> {
///         Ok(ExecutionDescriptor { cwl: Value::Null, params: Params::new() })
///     }
/// }
/// ```
///
/// 运行器接口。`execute()` 是具体运行器变体的扩展点，其余方法均有共享的默认实现。
/// `prepare()` 不属于此 trait，而是来自 [`RunnerExt`]：每个运行器都具备且无法替换。
pub trait Runner {
    fn context(&self) -> &RunnerContext;

    /// Parameters this runner contributes before the handler's are merged in.
    /// 在合并处理器参数之前，此运行器自身提供的参数。
    fn processing_parameters(&self) -> Params;

    /// The wrapped workflow definition.
    /// 包装后的工作流定义。
    fn wrap(&self) -> Result<Value, RunnerError>;

    /// Runs the prepared workflow.
    /// 运行已准备好的工作流。
    fn execute(
        &mut self,
        descriptor: ExecutionDescriptor,
    ) -> impl Future<Output = Result<RunOutcome, RunnerError>> + Send;

    fn validate_inputs(&self) -> bool {
        self.context().validate_inputs()
    }

    fn update_status(&self, progress: u8, message: &str) -> Result<(), RunnerError> {
        self.context().update_status(progress, message)
    }

    fn log_output(&self, output: &dyn fmt::Display) {
        self.context().log_output(output)
    }
}

mod sealed {
    pub trait Sealed {}

    impl<R: super::Runner + ?Sized> Sealed for R {}
}

/// Lifecycle operations shared by every [`Runner`]. Implemented for all
/// runners here and cannot be implemented elsewhere.
///
/// 所有 [`Runner`] 共享的生命周期操作。在此为所有运行器实现，不能在其他地方实现。
pub trait RunnerExt: Runner + sealed::Sealed {
    /// Builds the [`ExecutionDescriptor`]. See [`prepare`].
    /// 构建 [`ExecutionDescriptor`]。参见 [`prepare`]。
    fn prepare(&self) -> Result<ExecutionDescriptor, RunnerError>;
}

impl<R: Runner + ?Sized> RunnerExt for R {
    fn prepare(&self) -> Result<ExecutionDescriptor, RunnerError> {
        prepare(self)
    }
}

/// Shared pre-execution logic behind [`RunnerExt::prepare`].
///
/// Reports progress `2`, merges the runner's parameters with the handler's
/// (handler wins on collision) and wraps the workflow.
///
/// [`RunnerExt::prepare`] 背后的共享预执行逻辑：上报进度 `2`，
/// 合并运行器参数与处理器参数（冲突时处理器优先），并包装工作流。
pub fn prepare<R: Runner + ?Sized>(runner: &R) -> Result<ExecutionDescriptor, RunnerError> {
    info!("execution started");
    runner.update_status(PREPARE_PROGRESS, PREPARE_MESSAGE)?;
    info!("wrap CWL workflow with stage-in/out steps");

    let params = merge_parameters(
        runner.processing_parameters(),
        runner.context().additional_parameters(),
    );

    Ok(ExecutionDescriptor {
        cwl: runner.wrap()?,
        params,
    })
}

/// Drives a runner through `prepare()` and `execute()`, logging each state.
/// 驱动运行器依次完成 `prepare()` 和 `execute()`，并记录每个状态。
pub async fn drive<R: Runner>(runner: &mut R) -> Result<RunOutcome, RunnerError> {
    debug!(state = %RunnerState::Constructed, "runner lifecycle");
    let descriptor = prepare(&*runner)?;
    debug!(state = %RunnerState::Prepared, params = descriptor.params.len(), "runner lifecycle");
    let outcome = runner.execute(descriptor).await?;
    debug!(state = %RunnerState::Executed, success = outcome.is_success(), "runner lifecycle");
    Ok(outcome)
}

/// The bare runner: no parameters, no workflow, and no `execute()`.
///
/// Calling [`Runner::execute`] on it fails with [`RunnerError::NotImplemented`].
///
/// 最基础的运行器：没有参数、没有工作流，也没有 `execute()` 实现。
/// 对其调用 [`Runner::execute`] 会以 [`RunnerError::NotImplemented`] 失败。
#[derive(Debug)]
pub struct BaseRunner {
    ctx: RunnerContext,
}

impl BaseRunner {
    pub fn new(ctx: RunnerContext) -> Self {
        Self { ctx }
    }
}

impl Runner for BaseRunner {
    fn context(&self) -> &RunnerContext {
        &self.ctx
    }

    fn processing_parameters(&self) -> Params {
        Params::new()
    }

    fn wrap(&self) -> Result<Value, RunnerError> {
        Ok(Value::Null)
    }

    async fn execute(&mut self, _descriptor: ExecutionDescriptor) -> Result<RunOutcome, RunnerError> {
        Err(RunnerError::NotImplemented("execute"))
    }
}
