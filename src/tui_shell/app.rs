use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::compare::{Change, ComparisonEngine};
use crate::config::ClientConfig;
use crate::keymap::{Command, CommandRouter, KeyPress, install_default_keymaps};
use crate::model::{BatchResponse, FolderInfo};
use crate::persist::{SaveOutcome, SaveQueue};
use crate::remote::ImageService;

use super::input::Input;
use super::keys::key_name;
use super::view::View;
use super::views::{BrowseView, ImagesView, SharedState};

mod commands;
mod event_loop;
mod render;
mod runtime;

pub(super) use self::runtime::run;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum StatusKind {
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct Status {
    pub(super) kind: StatusKind,
    pub(super) text: String,
}

pub(super) struct App {
    service: Arc<dyn ImageService + Send + Sync>,
    config: ClientConfig,
    router: CommandRouter<Command>,
    engine: ComparisonEngine,
    compare_state: SharedState,
    saves: SaveQueue,
    batch: Option<BatchResponse>,
    /// Folder browser at the photo root; `views` stacks on top of it.
    root: Box<dyn View>,
    views: Vec<Box<dyn View>>,
    show_help: bool,
    status: Option<Status>,
    glob_input: Input,
    glob_open: bool,
    quit: bool,
}

impl App {
    pub(super) fn new(
        service: Arc<dyn ImageService + Send + Sync>,
        config: ClientConfig,
    ) -> Result<Self> {
        let mut router = CommandRouter::new();
        install_default_keymaps(&mut router, &config.keys).context("install key maps")?;

        let compare_state: SharedState = Rc::new(RefCell::new(None));
        let mut engine = ComparisonEngine::new();
        let mirror = Rc::clone(&compare_state);
        engine.subscribe(move |change| {
            let next = match change {
                Change::Started(state) | Change::Updated { state, .. } => Some((*state).clone()),
                Change::Exited(_) => None,
            };
            *mirror.borrow_mut() = next;
        });

        let saves = SaveQueue::spawn(Arc::clone(&service));

        let (root, load_err) = match service.list_folder_contents("") {
            Ok(root) => (root, None),
            Err(err) => {
                let root = FolderInfo {
                    name: "Root".to_string(),
                    ..FolderInfo::default()
                };
                (root, Some(err))
            }
        };

        let mut app = Self {
            service,
            config,
            router,
            engine,
            compare_state,
            saves,
            batch: None,
            root: Box::new(BrowseView::new(root)),
            views: Vec::new(),
            show_help: false,
            status: None,
            glob_input: Input::default(),
            glob_open: false,
            quit: false,
        };
        app.sync_context();
        if let Some(err) = load_err {
            app.error(format!("load folders: {err}"));
        }
        Ok(app)
    }

    pub(super) fn view(&self) -> &dyn View {
        self.views.last().map_or(self.root.as_ref(), |v| v.as_ref())
    }

    pub(super) fn view_mut(&mut self) -> &mut dyn View {
        match self.views.last_mut() {
            Some(v) => v.as_mut(),
            None => self.root.as_mut(),
        }
    }

    fn push_view(&mut self, view: Box<dyn View>) {
        self.views.push(view);
        self.sync_context();
    }

    fn pop_view(&mut self) {
        if self.views.pop().is_some() {
            self.sync_context();
        }
    }

    fn sync_context(&mut self) {
        let ctx = self.view().context();
        if let Err(err) = self.router.set_active_context(Some(ctx)) {
            tracing::warn!(context = ctx, %err, "could not activate key context");
        }
    }

    fn images_view_mut(&mut self) -> Option<&mut ImagesView> {
        self.view_mut().as_any_mut().downcast_mut::<ImagesView>()
    }

    pub(super) fn info(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            kind: StatusKind::Info,
            text: text.into(),
        });
    }

    pub(super) fn error(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::warn!(%text, "tui error");
        self.status = Some(Status {
            kind: StatusKind::Error,
            text,
        });
    }

    pub(super) fn handle_key(&mut self, key: KeyEvent) {
        if self.glob_open {
            self.handle_glob_key(key);
            return;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit = true;
            return;
        }
        if let Some(name) = key_name(&key) {
            self.handle_key_name(&name);
        }
    }

    /// Routes a named key through the command router.
    pub(super) fn handle_key_name(&mut self, name: &str) {
        if self.show_help && name == "escape" {
            self.show_help = false;
            return;
        }
        let mut press = KeyPress::new(name);
        if let Some(cmd) = self.router.handle(&mut press) {
            tracing::debug!(key = name, command = %cmd, "key dispatched");
            self.run_command(cmd);
        }
    }

    fn handle_glob_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.glob_input.clear();
                self.glob_open = false;
            }
            KeyCode::Enter => {
                let pattern = self.glob_input.submit();
                self.glob_open = false;
                if !pattern.is_empty() {
                    self.select_by_glob(&pattern);
                }
            }
            KeyCode::Backspace => self.glob_input.backspace(),
            KeyCode::Left => self.glob_input.move_left(),
            KeyCode::Right => self.glob_input.move_right(),
            KeyCode::Up => self.glob_input.history_up(),
            KeyCode::Down => self.glob_input.history_down(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.glob_input.insert_char(c)
            }
            _ => {}
        }
    }

    fn select_by_glob(&mut self, pattern: &str) {
        let Some(view) = self.images_view_mut() else {
            return;
        };
        match view.mark_glob(pattern) {
            Ok(n) => self.info(format!("{n} images match {pattern}")),
            Err(err) => self.error(format!("invalid pattern: {err}")),
        }
    }

    /// Reports persistence results that arrived since the last call.
    pub(super) fn poll_saves(&mut self) {
        for outcome in self.saves.drain() {
            self.report_save(outcome);
        }
    }

    fn report_save(&mut self, outcome: SaveOutcome) {
        let paths = outcome.job.paths.join(", ");
        match outcome.result {
            Ok(resp) if !resp.failed.is_empty() => {
                self.error(format!("could not save {}", resp.failed.join(", ")))
            }
            Ok(resp) if !resp.conflicts.is_empty() => self.info(format!(
                "{} already in {}",
                resp.conflicts.join(", "),
                resp.target_folder
            )),
            Ok(resp) => self.info(format!("saved {} to {}", paths, resp.target_folder)),
            Err(err) => self.error(format!("save of {paths} failed: {err}")),
        }
    }

    /// Waits for queued saves and returns messages for any that failed.
    pub(super) fn finish(self) -> Vec<String> {
        let pending = self.saves.pending();
        if pending > 0 {
            tracing::info!(pending, "waiting for saves to finish");
        }
        self.saves
            .shutdown()
            .into_iter()
            .filter_map(|o| {
                o.result
                    .err()
                    .map(|e| format!("save of {} failed: {e}", o.job.paths.join(", ")))
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../tests/tui_shell/app_tests.rs"]
mod tests;
