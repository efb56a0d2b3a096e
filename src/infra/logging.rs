//! # Logging Module / 日志模块
//!
//! Installs the process-wide `tracing` subscriber.
//! 安装进程级的 `tracing` 订阅器。

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes logging. `RUST_LOG` takes precedence; otherwise `info`, or
/// `debug` when `verbose` is set. Calling it twice is harmless.
///
/// 初始化日志。优先使用 `RUST_LOG`；否则为 `info`，`verbose` 时为 `debug`。重复调用无副作用。
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
