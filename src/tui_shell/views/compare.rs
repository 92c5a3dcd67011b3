use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use crate::compare::ComparisonState;
use crate::keymap::COMPARE;
use crate::model::ImageRef;
use crate::remote::ImageService;

use super::super::view::{View, render_view_chrome};

/// Engine state mirrored by a change subscription; `None` once the session ends.
pub(in crate::tui_shell) type SharedState = Rc<RefCell<Option<ComparisonState>>>;

pub(in crate::tui_shell) struct CompareView {
    pub(in crate::tui_shell) batch_id: String,
    state: SharedState,
    service: Arc<dyn ImageService + Send + Sync>,
    thumbnail_size: u32,
}

impl CompareView {
    pub(in crate::tui_shell) fn new(
        batch_id: String,
        state: SharedState,
        service: Arc<dyn ImageService + Send + Sync>,
        thumbnail_size: u32,
    ) -> Self {
        Self {
            batch_id,
            state,
            service,
            thumbnail_size,
        }
    }

    fn image_panel(
        &self,
        label: &str,
        image: Option<&ImageRef>,
        state: &ComparisonState,
    ) -> Paragraph<'static> {
        let mut lines = Vec::new();
        match image {
            Some(img) => {
                let mut tags = Vec::new();
                if state.saved.contains(img) {
                    tags.push(Span::styled(" saved", Style::default().fg(Color::Green)));
                }
                if state.rejected.contains(img) {
                    tags.push(Span::styled(" rejected", Style::default().fg(Color::Red)));
                }
                let mut first = vec![Span::styled(
                    img.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                )];
                first.extend(tags);
                lines.push(Line::from(first));
                lines.push(Line::styled(
                    self.service.thumbnail_url(img.as_str(), self.thumbnail_size),
                    Style::default().fg(Color::Gray),
                ));
            }
            None => lines.push(Line::styled(
                "(no candidate left)",
                Style::default().fg(Color::Gray),
            )),
        }
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(label.to_string()))
    }
}

impl View for CompareView {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn context(&self) -> &'static str {
        COMPARE
    }

    fn title(&self) -> String {
        let state = self.state.borrow();
        match state.as_ref() {
            Some(s) if s.is_resolved() => {
                format!("Compare  {}  winner: {}", self.batch_id, s.current_best)
            }
            Some(s) => format!(
                "Compare  {}  {}/{}",
                self.batch_id,
                (s.cursor + 1).min(s.candidates.len()),
                s.candidates.len()
            ),
            None => format!("Compare  {}", self.batch_id),
        }
    }

    fn render(&self, frame: &mut ratatui::Frame, area: Rect) {
        let inner = render_view_chrome(frame, &self.title(), area);
        let state = self.state.borrow();
        let Some(state) = state.as_ref() else {
            frame.render_widget(Paragraph::new("(session ended)"), inner);
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(inner);
        let faces = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);

        frame.render_widget(
            self.image_panel("Best", Some(&state.current_best), state),
            faces[0],
        );
        let candidate_label = if state.is_resolved() { "Winner found" } else { "Candidate" };
        frame.render_widget(
            self.image_panel(candidate_label, state.current_candidate(), state),
            faces[1],
        );

        let lower = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);

        let mut list_state = ListState::default();
        if state.cursor < state.candidates.len() {
            list_state.select(Some(state.cursor));
        }
        let mut queue: Vec<ListItem> = state
            .candidates
            .iter()
            .map(|c| ListItem::new(c.to_string()))
            .collect();
        if queue.is_empty() {
            queue.push(ListItem::new("(empty)"));
        }
        frame.render_stateful_widget(
            List::new(queue)
                .block(Block::default().borders(Borders::ALL).title("Queue"))
                .highlight_style(Style::default().bg(Color::Blue))
                .highlight_symbol("> "),
            lower[0],
            &mut list_state,
        );

        let mut decided = Vec::new();
        decided.push(Line::styled("Saved", Style::default().fg(Color::Green)));
        decided.extend(state.saved.iter().map(|i| Line::raw(format!("  {i}"))));
        decided.push(Line::styled("Rejected", Style::default().fg(Color::Red)));
        decided.extend(state.rejected.iter().map(|i| Line::raw(format!("  {i}"))));
        frame.render_widget(
            Paragraph::new(decided)
                .block(Block::default().borders(Borders::ALL).title("Decisions")),
            lower[1],
        );
    }
}
