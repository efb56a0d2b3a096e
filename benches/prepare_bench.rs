use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};
use std::sync::Arc;
use workflow_runner::core::conf::Conf;
use workflow_runner::core::error::RunnerError;
use workflow_runner::core::handler::StaticHandler;
use workflow_runner::core::models::{ExecutionDescriptor, Params, RunOutcome};
use workflow_runner::core::runner::{Runner, RunnerContext, RunnerExt};
use workflow_runner::core::status::MemoryStatusService;

struct BenchRunner {
    ctx: RunnerContext,
    params: Params,
}

impl Runner for BenchRunner {
    fn context(&self) -> &RunnerContext {
        &self.ctx
    }

    fn processing_parameters(&self) -> Params {
        self.params.clone()
    }

    fn wrap(&self) -> Result<Value, RunnerError> {
        Ok(json!({ "class": "Workflow" }))
    }

    async fn execute(&mut self, _descriptor: ExecutionDescriptor) -> Result<RunOutcome, RunnerError> {
        Err(RunnerError::NotImplemented("execute"))
    }
}

fn as_params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        _ => Params::new(),
    }
}

fn bench_prepare(c: &mut Criterion) {
    let own = as_params(json!({ "aoi": "-118.98,37.71", "epsg": "EPSG:4326", "bands": ["B04", "B08"] }));
    let extra = as_params(json!({ "epsg": "EPSG:3857", "max_cloud_cover": 20 }));
    let conf = Conf::from_map(as_params(json!({ "lenv": { "usid": "bench" } })));

    let ctx = RunnerContext::new(Params::new(), conf, Params::new(), Arc::new(MemoryStatusService::new()))
        .with_handler(Arc::new(StaticHandler::new(extra)));
    let runner = BenchRunner { ctx, params: own };

    c.bench_function("prepare", |b| {
        b.iter(|| runner.prepare());
    });
}

criterion_group!(benches, bench_prepare);
criterion_main!(benches);
