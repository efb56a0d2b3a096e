//! # Status Service Module / 状态服务模块
//!
//! A status service receives progress updates keyed by the runner's
//! configuration mapping. Progress is an integer on a 0-100 scale.
//!
//! 状态服务接收以运行器配置映射为键的进度更新。进度是 0-100 范围内的整数。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

use crate::core::conf::Conf;
use crate::core::error::StatusError;

/// External collaborator that records or reports progress.
/// 记录或上报进度的外部协作者。
pub trait StatusService: Send + Sync {
    /// Reports `progress` for the job described by `conf`.
    /// 为 `conf` 描述的作业上报 `progress`。
    fn update_status(&self, conf: &Conf, progress: u8) -> Result<(), StatusError>;
}

impl<S: StatusService + ?Sized> StatusService for Arc<S> {
    fn update_status(&self, conf: &Conf, progress: u8) -> Result<(), StatusError> {
        (**self).update_status(conf, progress)
    }
}

/// A single recorded status update.
/// 一条已记录的状态更新。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub timestamp: DateTime<Utc>,
    pub progress: u8,
    /// `lenv.message` at the time of the update, when the configuration carries one.
    /// 更新时的 `lenv.message`（若配置中存在）。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusUpdate {
    pub fn capture(conf: &Conf, progress: u8) -> Self {
        Self {
            timestamp: Utc::now(),
            progress,
            message: conf.lenv_message(),
        }
    }
}

/// Reports every update through `tracing`.
/// 通过 `tracing` 上报每一次更新。
#[derive(Debug, Default, Clone, Copy)]
pub struct LogStatusService;

impl StatusService for LogStatusService {
    fn update_status(&self, conf: &Conf, progress: u8) -> Result<(), StatusError> {
        let message = conf.lenv_message().unwrap_or_default();
        info!(progress, message = %message, "status update");
        Ok(())
    }
}

/// Appends one JSON line per update to a file.
/// 每次更新向文件追加一行 JSON。
#[derive(Debug)]
pub struct FileStatusService {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileStatusService {
    /// Opens (or creates) `path` in append mode.
    /// 以追加模式打开（或创建）`path`。
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StatusError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatusService for FileStatusService {
    fn update_status(&self, conf: &Conf, progress: u8) -> Result<(), StatusError> {
        let mut line = serde_json::to_string(&StatusUpdate::capture(conf, progress))?;
        line.push('\n');
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        file.write_all(line.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}

/// Keeps every update in memory, in arrival order.
/// 按到达顺序在内存中保存每一次更新。
#[derive(Debug, Default)]
pub struct MemoryStatusService {
    updates: Mutex<Vec<StatusUpdate>>,
}

impl MemoryStatusService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<StatusUpdate> {
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<StatusUpdate> {
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl StatusService for MemoryStatusService {
    fn update_status(&self, conf: &Conf, progress: u8) -> Result<(), StatusError> {
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(StatusUpdate::capture(conf, progress));
        Ok(())
    }
}

/// Forwards every update to each inner service in order, stopping at the first error.
/// 按顺序将每次更新转发给每个内部服务，遇到第一个错误即停止。
#[derive(Default)]
pub struct FanOutStatusService {
    services: Vec<Arc<dyn StatusService>>,
}

impl FanOutStatusService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, service: Arc<dyn StatusService>) -> Self {
        self.services.push(service);
        self
    }
}

impl StatusService for FanOutStatusService {
    fn update_status(&self, conf: &Conf, progress: u8) -> Result<(), StatusError> {
        for service in &self.services {
            service.update_status(conf, progress)?;
        }
        Ok(())
    }
}
