use anyhow::Result;

mod app;
mod input;
mod keys;
mod view;
mod views;

pub(crate) fn run_with_options(opts: crate::tui::TuiRunOptions) -> Result<()> {
    app::run(opts)
}
