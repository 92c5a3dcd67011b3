use std::path::PathBuf;

use anyhow::Result;

use crate::config::ClientConfig;

#[derive(Clone, Debug, Default)]
pub struct TuiRunOptions {
    pub config: ClientConfig,
    /// Where logs go while the terminal is in raw mode. `None` disables logging.
    pub log_file: Option<PathBuf>,
}

pub fn run() -> Result<()> {
    run_with_options(TuiRunOptions::default())
}

pub fn run_with_options(opts: TuiRunOptions) -> Result<()> {
    crate::tui_shell::run_with_options(opts)
}
