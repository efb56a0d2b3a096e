//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides utilities for file system operations,
//! such as creating scratch directories and reading or writing
//! workflow documents.
//!
//! 此模块提供文件系统操作的实用功能，
//! 如创建临时工作目录以及读写工作流文档。

use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Creates a scratch directory for one execution.
/// The directory is removed when the returned `TempDir` is dropped.
///
/// 为一次执行创建临时工作目录。返回的 `TempDir` 被丢弃时目录会被删除。
pub fn create_work_dir(job_name: &str) -> io::Result<TempDir> {
    let sanitized_name = job_name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>();

    tempfile::Builder::new()
        .prefix(&format!("workflow_runner_{sanitized_name}_"))
        .tempdir()
}

/// Reads a workflow document. JSON documents are parsed; anything else
/// (for example YAML CWL) is kept as a raw string.
///
/// A JSON document whose top level is a string is also kept as raw text,
/// so that [`write_document`] writes it back byte for byte.
///
/// 读取工作流文档。JSON 文档会被解析；其他格式（例如 YAML 格式的 CWL）保留为原始字符串。
/// 顶层为字符串的 JSON 文档同样保留为原始文本，以便 [`write_document`] 原样写回。
pub fn read_document(path: &Path) -> io::Result<Value> {
    let text = fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&text) {
        Ok(parsed) if !parsed.is_string() => Ok(parsed),
        _ => Ok(Value::String(text)),
    }
}

/// Writes a document produced by [`read_document`]: strings are written
/// verbatim, other values as pretty-printed JSON.
///
/// 写入由 [`read_document`] 生成的文档：字符串原样写入，其他值写为格式化 JSON。
pub fn write_document(path: &Path, document: &Value) -> io::Result<()> {
    match document {
        Value::String(text) => fs::write(path, text),
        other => fs::write(path, serde_json::to_vec_pretty(other)?),
    }
}

/// Resolves `path` against `base` unless it is already absolute.
/// 除非 `path` 已是绝对路径，否则基于 `base` 解析它。
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
