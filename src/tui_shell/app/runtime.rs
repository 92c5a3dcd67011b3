use std::io::{self, IsTerminal};
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::remote::RemoteClient;
use crate::tui::TuiRunOptions;

use super::{App, event_loop};

pub(in crate::tui_shell) fn run(opts: TuiRunOptions) -> Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("TUI requires an interactive terminal (TTY)");
    }
    if let Some(path) = &opts.log_file {
        crate::logging::init_file(path)?;
    }

    let client = RemoteClient::new(&opts.config.server_url)?;
    tracing::info!(server = client.base_url(), "starting tui");
    let mut app = App::new(Arc::new(client), opts.config)?;

    let mut stdout = io::stdout();
    enable_raw_mode().context("enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let res = event_loop::run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    for failure in app.finish() {
        eprintln!("{failure}");
    }
    res
}
