//! # Shared Configuration Module / 共享配置模块
//!
//! The configuration mapping handed to a runner is shared with its caller:
//! both hold a [`Conf`] handle to the same map, so writes made by the runner
//! (for example the status message under `lenv`) are visible to the caller.
//!
//! 传递给运行器的配置映射与调用方共享：双方持有指向同一映射的 [`Conf`] 句柄，
//! 因此运行器写入的内容（例如 `lenv` 下的状态消息）对调用方可见。

use serde_json::{Map, Value};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Key of the sub-mapping that carries the human-readable status message.
/// 携带可读状态消息的子映射的键。
pub const LENV_KEY: &str = "lenv";

/// Key written inside `lenv` by status updates.
/// 状态更新在 `lenv` 内写入的键。
pub const MESSAGE_KEY: &str = "message";

/// A shared, mutable configuration mapping.
///
/// Cloning a `Conf` clones the handle, not the map.
///
/// 共享的可变配置映射。克隆 `Conf` 只克隆句柄，而不是映射本身。
#[derive(Clone, Default)]
pub struct Conf {
    inner: Arc<RwLock<Map<String, Value>>>,
}

impl Conf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(map)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Map<String, Value>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Map<String, Value>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    /// Returns a clone of the value stored under `key`.
    /// 返回 `key` 下存储值的克隆。
    pub fn get(&self, key: &str) -> Option<Value> {
        self.read().get(key).cloned()
    }

    /// Inserts a value, returning the previous one if any.
    /// 插入一个值，若已有旧值则返回旧值。
    pub fn insert(&self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.write().insert(key.into(), value)
    }

    /// Writes `message` into `lenv.message` when `lenv` is present and is a mapping.
    ///
    /// Returns `true` if the message was written. A missing `lenv`, or an `lenv`
    /// that is not a mapping, leaves the configuration untouched.
    ///
    /// 当 `lenv` 存在且为映射时，将 `message` 写入 `lenv.message`。
    /// 写入成功时返回 `true`；`lenv` 缺失或不是映射时保持配置不变。
    pub fn set_lenv_message(&self, message: &str) -> bool {
        let mut map = self.write();
        match map.get_mut(LENV_KEY) {
            Some(Value::Object(lenv)) => {
                lenv.insert(MESSAGE_KEY.to_string(), Value::String(message.to_string()));
                true
            }
            _ => false,
        }
    }

    /// The current `lenv.message`, if any.
    /// 当前的 `lenv.message`（如果存在）。
    pub fn lenv_message(&self) -> Option<String> {
        self.read()
            .get(LENV_KEY)
            .and_then(|lenv| lenv.get(MESSAGE_KEY))
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    /// A point-in-time copy of the whole mapping.
    /// 整个映射在当前时刻的副本。
    pub fn snapshot(&self) -> Map<String, Value> {
        self.read().clone()
    }

    /// A read-only view over the same mapping.
    /// 同一映射上的只读视图。
    pub fn view(&self) -> ConfView {
        ConfView { conf: self.clone() }
    }

    /// `true` if both handles point at the same mapping.
    /// 两个句柄指向同一映射时为 `true`。
    pub fn ptr_eq(&self, other: &Conf) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Conf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conf").field("map", &*self.read()).finish()
    }
}

impl From<Map<String, Value>> for Conf {
    fn from(map: Map<String, Value>) -> Self {
        Self::from_map(map)
    }
}

/// Read-only access to a [`Conf`], for downstream consumers that must not mutate it.
/// 对 [`Conf`] 的只读访问，供不得修改配置的下游使用者使用。
#[derive(Clone, Debug)]
pub struct ConfView {
    conf: Conf,
}

impl ConfView {
    pub fn get(&self, key: &str) -> Option<Value> {
        self.conf.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.conf.contains_key(key)
    }

    pub fn snapshot(&self) -> Map<String, Value> {
        self.conf.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn conf_with(value: Value) -> Conf {
        match value {
            Value::Object(map) => Conf::from_map(map),
            _ => unreachable!("test fixtures are objects"),
        }
    }

    #[test]
    fn lenv_message_is_written_when_lenv_is_a_mapping() {
        let conf = conf_with(json!({ "lenv": { "usid": "1234" } }));
        assert!(conf.set_lenv_message("running"));
        assert_eq!(conf.lenv_message().as_deref(), Some("running"));
        assert_eq!(conf.get("lenv").unwrap()["usid"], "1234");
    }

    #[test]
    fn non_mapping_lenv_is_left_alone() {
        let conf = conf_with(json!({ "lenv": "not-a-map" }));
        assert!(!conf.set_lenv_message("running"));
        assert_eq!(conf.get("lenv"), Some(json!("not-a-map")));
    }

    #[test]
    fn clones_share_the_same_mapping() {
        let conf = Conf::new();
        let caller = conf.clone();
        conf.insert("main", json!({ "tmpPath": "/tmp" }));
        assert!(caller.contains_key("main"));
        assert!(caller.ptr_eq(&conf));
        assert!(conf.view().contains_key("main"));
    }
}
