//! # Command-Line Interface Module / 命令行接口模块
//!
//! Builds the `workflow-runner` command line and dispatches to the commands.
//! 构建 `workflow-runner` 命令行并分发到各个命令。

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf};

use crate::{commands, infra::logging, infra::t, resolve_locale};

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
///
/// 预解析命令行参数以查找语言设置，使 i18n 能在构建完整 CLI 之前初始化。
fn pre_parse_language() -> Option<String> {
    language_from_args(env::args())
}

/// Finds `--lang <VALUE>` or `--lang=<VALUE>`; the first occurrence wins.
/// Arguments after `--` are not options and are ignored.
///
/// 查找 `--lang <VALUE>` 或 `--lang=<VALUE>`，以第一次出现为准。`--` 之后的参数会被忽略。
fn language_from_args<I>(args: I) -> Option<String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--" {
            return None;
        }
        if arg == "--lang" {
            return args.next();
        }
        if let Some(value) = arg.strip_prefix("--lang=") {
            return Some(value.to_string());
        }
    }
    None
}

fn build_cli(locale: &str) -> Command {
    Command::new("workflow-runner")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli_about", locale = locale).to_string())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli_lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help(t!("cli_verbose", locale = locale).to_string())
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("run")
                .about(t!("cmd_run_about", locale = locale).to_string())
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help(t!("arg_config", locale = locale).to_string())
                        .value_name("CONFIG")
                        .default_value("Runner.toml")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("status-file")
                        .long("status-file")
                        .help(t!("arg_status_file", locale = locale).to_string())
                        .value_name("STATUS_FILE")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cmd_init_about", locale = locale).to_string())
                .arg(
                    Arg::new("non-interactive")
                        .long("non-interactive")
                        .help(t!("arg_non_interactive", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
}

/// Parses the process arguments and runs the selected command.
/// 解析进程参数并运行所选命令。
pub async fn run() -> Result<()> {
    let requested = pre_parse_language();
    let language = resolve_locale(requested.as_deref());
    rust_i18n::set_locale(&language);

    let matches = build_cli(&language).get_matches();
    logging::init_tracing(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("run", run_matches)) => {
            let (config, status_file) = run_arguments(run_matches);
            commands::run::execute(config, status_file, requested).await?;
        }
        Some(("init", init_matches)) => {
            let non_interactive = init_matches.get_flag("non-interactive");
            commands::init::run_init_wizard(&language, non_interactive)?;
        }
        // `subcommand_required` makes clap print help and exit first.
        _ => {}
    }
    Ok(())
}

fn run_arguments(matches: &ArgMatches) -> (PathBuf, Option<PathBuf>) {
    let config = matches
        .get_one::<PathBuf>("config")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("Runner.toml"));
    let status_file = matches.get_one::<PathBuf>("status-file").cloned();
    (config, status_file)
}
