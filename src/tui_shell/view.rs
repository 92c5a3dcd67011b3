use std::any::Any;

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders};

pub(super) trait View: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Key map context active while this view is on top.
    fn context(&self) -> &'static str;
    fn title(&self) -> String;

    fn move_up(&mut self) {}
    fn move_down(&mut self) {}
    fn move_left(&mut self) {}
    fn move_right(&mut self) {}

    fn render(&self, frame: &mut ratatui::Frame, area: Rect);
}

pub(super) fn render_view_chrome(frame: &mut ratatui::Frame, title: &str, area: Rect) -> Rect {
    let header = Line::from(vec![Span::styled(
        title.to_string(),
        Style::default().fg(Color::Yellow),
    )]);
    let outer = Block::default().borders(Borders::ALL).title(header);
    let inner = outer.inner(area);
    frame.render_widget(outer, area);
    inner
}
