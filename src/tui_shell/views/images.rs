use std::any::Any;

use globset::{Glob, GlobMatcher};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::keymap::IMAGES;
use crate::model::ImageInfo;

use super::super::view::{View, render_view_chrome};

/// Images per grid row; left/right move within a row, up/down across rows.
pub(in crate::tui_shell) const COLUMNS: usize = 4;

#[derive(Debug)]
pub(in crate::tui_shell) struct ImagesView {
    pub(in crate::tui_shell) folder: String,
    pub(in crate::tui_shell) images: Vec<ImageInfo>,
    pub(in crate::tui_shell) focus: usize,
    marked: Vec<bool>,
}

impl ImagesView {
    pub(in crate::tui_shell) fn new(folder: String, images: Vec<ImageInfo>) -> Self {
        let marked = vec![false; images.len()];
        Self {
            folder,
            images,
            focus: 0,
            marked,
        }
    }

    pub(in crate::tui_shell) fn toggle_focused(&mut self) {
        if let Some(m) = self.marked.get_mut(self.focus) {
            *m = !*m;
        }
    }

    /// Marks every image, or clears the marks when all are already set.
    pub(in crate::tui_shell) fn toggle_all(&mut self) {
        let all = self.marked.iter().all(|m| *m);
        self.marked.iter_mut().for_each(|m| *m = !all);
    }

    /// Marks the images whose name or path matches `pattern`; returns how many matched.
    pub(in crate::tui_shell) fn mark_glob(
        &mut self,
        pattern: &str,
    ) -> Result<usize, globset::Error> {
        let matcher: GlobMatcher = Glob::new(pattern)?.compile_matcher();
        let mut hits = 0;
        for (img, m) in self.images.iter().zip(self.marked.iter_mut()) {
            if matcher.is_match(&img.name) || matcher.is_match(&img.path) {
                *m = true;
                hits += 1;
            }
        }
        Ok(hits)
    }

    /// Marked image paths, in folder order.
    pub(in crate::tui_shell) fn marked_paths(&self) -> Vec<String> {
        self.images
            .iter()
            .zip(&self.marked)
            .filter(|(_, m)| **m)
            .map(|(img, _)| img.path.clone())
            .collect()
    }

    fn step(&mut self, delta: isize) {
        if self.images.is_empty() {
            return;
        }
        let max = self.images.len() - 1;
        self.focus = self.focus.saturating_add_signed(delta).min(max);
    }
}

impl View for ImagesView {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn context(&self) -> &'static str {
        IMAGES
    }

    fn title(&self) -> String {
        let marked = self.marked.iter().filter(|m| **m).count();
        let folder = if self.folder.is_empty() {
            "Root"
        } else {
            &self.folder
        };
        format!("Images  {}  {}/{} selected", folder, marked, self.images.len())
    }

    fn move_up(&mut self) {
        self.step(-(COLUMNS as isize));
    }

    fn move_down(&mut self) {
        self.step(COLUMNS as isize);
    }

    fn move_left(&mut self) {
        self.step(-1);
    }

    fn move_right(&mut self) {
        self.step(1);
    }

    fn render(&self, frame: &mut ratatui::Frame, area: Rect) {
        let inner = render_view_chrome(frame, &self.title(), area);
        if self.images.is_empty() {
            frame.render_widget(Paragraph::new("(no images)"), inner);
            return;
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, COLUMNS as u32); COLUMNS])
            .split(inner);

        let mut columns: Vec<Vec<Line>> = vec![Vec::new(); COLUMNS];
        for (i, img) in self.images.iter().enumerate() {
            let mark = if self.marked[i] { "[x] " } else { "[ ] " };
            let mut style = Style::default();
            if self.marked[i] {
                style = style.fg(Color::Green);
            }
            if i == self.focus {
                style = style.bg(Color::Blue).add_modifier(Modifier::BOLD);
            }
            columns[i % COLUMNS].push(Line::from(Span::styled(
                format!("{mark}{}", img.name),
                style,
            )));
        }
        for (lines, area) in columns.into_iter().zip(cols.iter()) {
            frame.render_widget(Paragraph::new(lines), *area);
        }
    }
}
