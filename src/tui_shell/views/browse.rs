use std::any::Any;

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{List, ListItem, ListState};

use crate::keymap::BROWSE;
use crate::model::FolderInfo;

use super::super::view::{View, render_view_chrome};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::tui_shell) enum BrowseEntry {
    /// The images directly inside the folder being browsed.
    Images { folder: String, count: usize },
    Folder { path: String },
}

#[derive(Debug)]
pub(in crate::tui_shell) struct BrowseView {
    pub(in crate::tui_shell) folder: FolderInfo,
    pub(in crate::tui_shell) selected: usize,
}

impl BrowseView {
    pub(in crate::tui_shell) fn new(folder: FolderInfo) -> Self {
        Self {
            folder,
            selected: 0,
        }
    }

    pub(in crate::tui_shell) fn entries(&self) -> Vec<BrowseEntry> {
        let mut out = Vec::new();
        if !self.folder.images.is_empty() {
            out.push(BrowseEntry::Images {
                folder: self.folder.path.clone(),
                count: self.folder.images.len(),
            });
        }
        out.extend(self.folder.subfolders.iter().map(|f| BrowseEntry::Folder {
            path: f.path.clone(),
        }));
        out
    }

    pub(in crate::tui_shell) fn selected_entry(&self) -> Option<BrowseEntry> {
        self.entries().into_iter().nth(self.selected)
    }

    fn label(&self, entry: &BrowseEntry) -> String {
        match entry {
            BrowseEntry::Images { count, .. } => format!("[{count} images here]"),
            BrowseEntry::Folder { path } => {
                let sub = self.folder.subfolders.iter().find(|f| &f.path == path);
                match sub {
                    Some(f) => format!(
                        "{}/  ({} images, {} folders)",
                        f.name,
                        f.images.len(),
                        f.subfolders.len()
                    ),
                    None => path.clone(),
                }
            }
        }
    }
}

impl View for BrowseView {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn context(&self) -> &'static str {
        BROWSE
    }

    fn title(&self) -> String {
        if self.folder.path.is_empty() {
            format!("Folders  {}", self.folder.name)
        } else {
            format!("Folders  {}", self.folder.path)
        }
    }

    fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn move_down(&mut self) {
        let max = self.entries().len().saturating_sub(1);
        self.selected = (self.selected + 1).min(max);
    }

    fn render(&self, frame: &mut ratatui::Frame, area: Rect) {
        let inner = render_view_chrome(frame, &self.title(), area);

        let entries = self.entries();
        let mut state = ListState::default();
        if !entries.is_empty() {
            state.select(Some(self.selected.min(entries.len() - 1)));
        }

        let mut rows: Vec<ListItem> = entries
            .iter()
            .map(|e| ListItem::new(self.label(e)))
            .collect();
        if rows.is_empty() {
            rows.push(ListItem::new("(no images or folders)"));
        }
        let list = List::new(rows)
            .highlight_style(Style::default().bg(Color::Blue).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, inner, &mut state);
    }
}
