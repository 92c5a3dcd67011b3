pub mod compare;
pub mod config;
pub mod keymap;
pub mod library;
pub mod logging;
pub mod model;
pub mod persist;
pub mod remote;
pub mod replay;
pub mod tui;

mod tui_shell;

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
