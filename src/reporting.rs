//! # Reporting Module / 报告模块
//!
//! This module prints run summaries to the console, with colored output and
//! internationalization support.
//!
//! 此模块在控制台打印运行摘要，支持彩色输出和国际化。

pub mod console;

pub use console::{print_failure_details, print_summary};
