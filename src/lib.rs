//! # Workflow Runner Library / Workflow Runner 库
//!
//! This library standardizes the lifecycle of workflow runners: objects that
//! wrap the execution of a processing job behind a status-reporting service.
//!
//! 此库规范了工作流运行器的生命周期：运行器在状态上报服务之后包装处理作业的执行。
//!
//! ## Modules / 模块
//!
//! - `core` - Shared configuration, runner lifecycle, status services and the command runner
//! - `infra` - Infrastructure services like command execution, file system operations and logging
//! - `reporting` - Console summaries of a run
//! - `cli` / `commands` - Command-line interface and commands
//!
//! - `core` - 共享配置、运行器生命周期、状态服务和命令运行器
//! - `infra` - 基础设施服务，如命令执行、文件系统操作和日志
//! - `reporting` - 运行的控制台摘要
//! - `cli` / `commands` - 命令行接口和命令

pub mod cli;
pub mod commands;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use self::core::config;
pub use self::core::models;
pub use self::core::runner;
pub use self::core::status;

/// Picks the locale for console messages.
///
/// An explicit `requested` locale wins; otherwise the system locale is used.
/// The full locale (e.g. "zh-CN") is tried first, then the language code
/// (e.g. "en"), and finally the default language ("en").
///
/// 选择控制台消息的语言区域。显式指定的 `requested` 优先，否则使用系统语言区域。
/// 依次尝试完整区域（如 "zh-CN"）、语言代码（如 "en"），最后回退到默认语言 "en"。
pub fn resolve_locale(requested: Option<&str>) -> String {
    let locale = requested
        .map(str::to_string)
        .or_else(sys_locale::get_locale)
        .unwrap_or_else(|| "en".to_string());
    let available_locales = rust_i18n::available_locales!();

    if available_locales.contains(&locale.as_str()) {
        return locale;
    }
    locale
        .split('-')
        .next()
        .filter(|lang_code| available_locales.contains(lang_code))
        .unwrap_or("en")
        .to_string()
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
