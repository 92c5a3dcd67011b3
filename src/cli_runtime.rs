use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use kerpic::config::ClientConfig;

use crate::Commands;

#[derive(Parser)]
#[command(name = "kerpic")]
#[command(about = "Pick the best of a batch of photos, one pair at a time", long_about = None)]
pub(crate) struct Cli {
    /// Photo server base URL
    #[arg(long, global = true, env = "KERPIC_SERVER", value_name = "URL")]
    server: Option<String>,

    /// JSON client config (server URL, save folder, key overrides)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long = "log-file", global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = ClientConfig::resolve(cli.config.as_deref(), cli.server)?;

    match cli.command {
        None => kerpic::tui::run_with_options(kerpic::tui::TuiRunOptions {
            config,
            log_file: cli.log_file,
        }),
        Some(command) => {
            match &cli.log_file {
                Some(path) => kerpic::logging::init_file(path)?,
                None => kerpic::logging::init_stderr(),
            }
            crate::cli_exec::handle_command(command, &config)
        }
    }
}
