//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints the result of a run to the console: the status
//! updates that were reported, the outcome and the produced outputs.
//!
//! 此模块在控制台打印一次运行的结果：已上报的状态更新、执行结果和产生的输出。

use colored::*;

use crate::core::models::{FailureReason, Params, RunOutcome};
use crate::core::status::StatusUpdate;
use crate::infra::t;

/// Prints a formatted summary of a run to the console.
///
/// 在控制台打印格式化的运行摘要。
///
/// # Output Format / 输出格式
/// ```text
/// --- Run Summary ---
///   -   2% | starting execution
///   -  20% | running workflow
///   - 100% | execution completed
///   Result: Succeeded in 1.23s
///   Outputs: {"stac": "catalog.json"}
/// ```
pub fn print_summary(outcome: &RunOutcome, updates: &[StatusUpdate], outputs: &Params, locale: &str) {
    println!("\n{}", t!("run_summary_banner", locale = locale).bold());

    for update in updates {
        println!(
            "  - {:>3}% | {}",
            update.progress,
            update.message.as_deref().unwrap_or("")
        );
    }

    let duration = format!("{:.2?}", outcome.duration());
    let status = match outcome {
        RunOutcome::Succeeded { .. } => t!("status_succeeded", locale = locale).green(),
        RunOutcome::Failed { reason, .. } => failure_label(*reason, locale).red(),
    };
    println!(
        "  {}",
        t!("run_result_line", locale = locale, status = status, duration = duration)
    );

    if !outputs.is_empty() {
        let rendered = serde_json::to_string(outputs).unwrap_or_default();
        println!(
            "  {}",
            t!("run_outputs_line", locale = locale, outputs = rendered)
        );
    }
}

/// Prints the captured output of a failed run.
/// 打印失败运行所捕获的输出。
pub fn print_failure_details(outcome: &RunOutcome, locale: &str) {
    let RunOutcome::Failed { output, reason, .. } = outcome else {
        return;
    };

    println!("\n{}", t!("failure_banner", locale = locale).red().bold());
    println!("{}", "-".repeat(80));
    println!(
        "--- {} ({}) ---\n",
        t!("command_log", locale = locale).yellow(),
        failure_label(*reason, locale)
    );
    println!("{}", output.trim_end());
    println!("{}", "-".repeat(80));
}

fn failure_label(reason: FailureReason, locale: &str) -> String {
    let label = match reason {
        FailureReason::NonZeroExit => t!("failure_non_zero_exit", locale = locale),
        FailureReason::Timeout => t!("failure_timeout", locale = locale),
        FailureReason::Spawn => t!("failure_spawn", locale = locale),
        FailureReason::Cancelled => t!("failure_cancelled", locale = locale),
    };
    label.to_string()
}
