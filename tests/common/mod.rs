// Shared test helpers for integration tests
#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::{tempdir, TempDir};
use tracing_subscriber::fmt::MakeWriter;

use workflow_runner::core::conf::Conf;
use workflow_runner::core::error::StatusError;
use workflow_runner::core::models::Params;
use workflow_runner::core::status::StatusService;

/// Converts a `json!` object literal into a parameter mapping.
pub fn params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// A configuration mapping with an `lenv` sub-mapping.
pub fn conf_with_lenv() -> Conf {
    Conf::from_map(params(json!({
        "lenv": { "usid": "job-0001" },
        "main": { "tmpPath": "/tmp" }
    })))
}

/// A status service that records each `(conf, progress)` call, including the
/// `lenv.message` seen at call time.
#[derive(Default)]
pub struct RecordingStatus {
    pub calls: Mutex<Vec<(Conf, u8, Option<String>)>>,
}

impl RecordingStatus {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn progress_values(&self) -> Vec<u8> {
        self.calls.lock().unwrap().iter().map(|(_, p, _)| *p).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl StatusService for RecordingStatus {
    fn update_status(&self, conf: &Conf, progress: u8) -> Result<(), StatusError> {
        self.calls
            .lock()
            .unwrap()
            .push((conf.clone(), progress, conf.lenv_message()));
        Ok(())
    }
}

/// A status service that refuses every update.
pub struct FailingStatus;

impl StatusService for FailingStatus {
    fn update_status(&self, _conf: &Conf, _progress: u8) -> Result<(), StatusError> {
        Err(StatusError::Rejected("status endpoint unavailable".to_string()))
    }
}

/// Writes a small JSON workflow into a fresh temporary directory.
pub fn setup_workflow() -> (TempDir, PathBuf) {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    let workflow_path = temp_dir.path().join("workflow.json");
    fs::write(
        &workflow_path,
        r#"{ "cwlVersion": "v1.2", "class": "Workflow", "steps": {} }"#,
    )
    .expect("Failed to write workflow");
    (temp_dir, workflow_path)
}

/// An in-memory sink for `tracing` output, usable as a fmt layer writer.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
