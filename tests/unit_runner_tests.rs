//! # Runner Lifecycle Unit Tests / 运行器生命周期单元测试
//!
//! Tests for the shared lifecycle hooks: status updates, parameter merging,
//! `prepare()` and the base runner's missing `execute()`.
//!
//! 测试共享生命周期钩子：状态更新、参数合并、`prepare()` 以及基础运行器缺失的 `execute()`。

mod common;

use serde_json::{json, Value};
use std::sync::Arc;

use common::{conf_with_lenv, params, FailingStatus, LogBuffer, RecordingStatus};
use workflow_runner::core::conf::Conf;
use workflow_runner::core::error::RunnerError;
use workflow_runner::core::handler::StaticHandler;
use workflow_runner::core::models::{ExecutionDescriptor, Params, RunOutcome};
use workflow_runner::core::runner::{
    drive, BaseRunner, Runner, RunnerContext, RunnerExt, PREPARE_PROGRESS,
};

/// A runner with fixed parameters and workflow, used to observe `prepare()`.
struct FixedRunner {
    ctx: RunnerContext,
    params: Params,
    executed: bool,
}

impl FixedRunner {
    fn new(ctx: RunnerContext, params: Params) -> Self {
        Self {
            ctx,
            params,
            executed: false,
        }
    }
}

impl Runner for FixedRunner {
    fn context(&self) -> &RunnerContext {
        &self.ctx
    }

    fn processing_parameters(&self) -> Params {
        self.params.clone()
    }

    fn wrap(&self) -> Result<Value, RunnerError> {
        Ok(json!({ "class": "Workflow", "wrapped": true }))
    }

    async fn execute(&mut self, descriptor: ExecutionDescriptor) -> Result<RunOutcome, RunnerError> {
        self.executed = true;
        Ok(RunOutcome::Succeeded {
            output: serde_json::to_string(&descriptor.params)?,
            duration: Default::default(),
        })
    }
}

fn context(conf: Conf, status: Arc<RecordingStatus>) -> RunnerContext {
    RunnerContext::new(Params::new(), conf, Params::new(), status)
}

#[cfg(test)]
mod update_status_tests {
    use super::*;

    #[test]
    fn test_update_status_writes_lenv_message_and_forwards_once() {
        let status = RecordingStatus::new();
        let conf = conf_with_lenv();
        let ctx = context(conf.clone(), status.clone());

        ctx.update_status(42, "halfway there").unwrap();

        assert_eq!(conf.lenv_message().as_deref(), Some("halfway there"));
        let calls = status.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, 42);
        assert!(calls[0].0.ptr_eq(&conf));
        assert_eq!(calls[0].2.as_deref(), Some("halfway there"));
    }

    #[test]
    fn test_update_status_without_lenv_still_forwards() {
        let status = RecordingStatus::new();
        let conf = Conf::from_map(params(json!({ "main": { "tmpPath": "/tmp" } })));
        let ctx = context(conf.clone(), status.clone());

        ctx.update_status(10, "ignored").unwrap();

        assert!(!conf.contains_key("lenv"));
        assert_eq!(status.progress_values(), vec![10]);
    }

    #[test]
    fn test_update_status_default_message_is_empty() {
        let status = RecordingStatus::new();
        let conf = conf_with_lenv();
        let ctx = context(conf.clone(), status);

        ctx.update_status(5, "").unwrap();

        assert_eq!(conf.lenv_message().as_deref(), Some(""));
    }

    #[test]
    fn test_update_status_propagates_service_errors() {
        let ctx = RunnerContext::new(
            Params::new(),
            conf_with_lenv(),
            Params::new(),
            Arc::new(FailingStatus),
        );

        let err = ctx.update_status(2, "starting execution").unwrap_err();
        assert!(matches!(err, RunnerError::Status(_)));
    }
}

#[cfg(test)]
mod prepare_tests {
    use super::*;

    #[test]
    fn test_prepare_reports_progress_two_first() {
        let status = RecordingStatus::new();
        let conf = conf_with_lenv();
        let runner = FixedRunner::new(context(conf.clone(), status.clone()), Params::new());

        runner.prepare().unwrap();

        assert_eq!(status.progress_values(), vec![PREPARE_PROGRESS]);
        assert_eq!(conf.lenv_message().as_deref(), Some("starting execution"));
    }

    #[test]
    fn test_prepare_without_handler_uses_runner_parameters() {
        let own = params(json!({ "aoi": "-118.98,37.71", "epsg": "EPSG:4326" }));
        let runner = FixedRunner::new(context(conf_with_lenv(), RecordingStatus::new()), own.clone());

        let descriptor = runner.prepare().unwrap();

        assert_eq!(descriptor.params, own);
        assert_eq!(descriptor.cwl, json!({ "class": "Workflow", "wrapped": true }));
    }

    #[test]
    fn test_prepare_with_handler_overrides_on_collision() {
        let own = params(json!({ "aoi": "-118.98,37.71", "epsg": "EPSG:4326" }));
        let extra = params(json!({ "epsg": "EPSG:3857", "max_cloud_cover": 20 }));
        let ctx = context(conf_with_lenv(), RecordingStatus::new())
            .with_handler(Arc::new(StaticHandler::new(extra)));
        let runner = FixedRunner::new(ctx, own);

        let descriptor = runner.prepare().unwrap();

        assert_eq!(
            Value::Object(descriptor.params),
            json!({ "aoi": "-118.98,37.71", "epsg": "EPSG:3857", "max_cloud_cover": 20 })
        );
    }

    #[test]
    fn test_prepare_fails_fast_when_status_service_fails() {
        let ctx = RunnerContext::new(
            Params::new(),
            conf_with_lenv(),
            Params::new(),
            Arc::new(FailingStatus),
        );
        let runner = FixedRunner::new(ctx, Params::new());

        assert!(matches!(runner.prepare(), Err(RunnerError::Status(_))));
    }

    #[tokio::test]
    async fn test_drive_prepares_then_executes() {
        let status = RecordingStatus::new();
        let own = params(json!({ "aoi": "x" }));
        let mut runner = FixedRunner::new(context(conf_with_lenv(), status.clone()), own);

        let outcome = drive(&mut runner).await.unwrap();

        assert!(runner.executed);
        assert!(outcome.is_success());
        assert_eq!(outcome.output(), r#"{"aoi":"x"}"#);
        assert_eq!(status.progress_values(), vec![PREPARE_PROGRESS]);
    }

    #[tokio::test]
    async fn test_drive_always_reports_progress_two_and_merges_handler() {
        let status = RecordingStatus::new();
        let conf = conf_with_lenv();
        let ctx = context(conf.clone(), status.clone())
            .with_handler(Arc::new(StaticHandler::new(params(json!({ "aoi": "y" })))));
        let mut runner = FixedRunner::new(ctx, params(json!({ "aoi": "x", "epsg": "EPSG:4326" })));

        let outcome = drive(&mut runner).await.unwrap();

        assert_eq!(status.progress_values(), vec![PREPARE_PROGRESS]);
        assert_eq!(conf.lenv_message().as_deref(), Some("starting execution"));
        let executed_with: Value = serde_json::from_str(outcome.output()).unwrap();
        assert_eq!(executed_with, json!({ "aoi": "y", "epsg": "EPSG:4326" }));
    }
}

#[cfg(test)]
mod log_output_tests {
    use super::*;

    #[test]
    fn test_log_output_emits_base_runner_record() {
        let buffer = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .finish();
        let runner = BaseRunner::new(context(conf_with_lenv(), RecordingStatus::new()));

        tracing::subscriber::with_default(subscriber, || {
            runner.log_output(&"catalog.json written");
            runner.context().log_output(&42);
        });

        let logs = buffer.contents();
        assert!(logs.contains("[BaseRunner] Output: catalog.json written"));
        assert!(logs.contains("[BaseRunner] Output: 42"));
    }
}

#[cfg(test)]
mod base_runner_tests {
    use super::*;

    #[test]
    fn test_base_runner_validate_inputs_always_true() {
        let ctx = RunnerContext::new(
            params(json!({ "aoi": null })),
            Conf::new(),
            Params::new(),
            RecordingStatus::new(),
        );
        let runner = BaseRunner::new(ctx);

        assert!(runner.validate_inputs());
    }

    #[tokio::test]
    async fn test_base_runner_execute_is_not_implemented() {
        let mut runner = BaseRunner::new(context(Conf::new(), RecordingStatus::new()));
        let descriptor = runner.prepare().unwrap();

        let err = runner.execute(descriptor).await.unwrap_err();

        assert!(matches!(err, RunnerError::NotImplemented("execute")));
        assert_eq!(err.to_string(), "execute is not implemented for this runner");
    }

    #[test]
    fn test_base_runner_exposes_read_only_conf_view() {
        let conf = conf_with_lenv();
        let runner = BaseRunner::new(context(conf.clone(), RecordingStatus::new()));

        conf.insert("extra", json!(1));

        assert_eq!(runner.context().conf_view().get("extra"), Some(json!(1)));
        assert!(runner.context().conf().ptr_eq(&conf));
    }
}
