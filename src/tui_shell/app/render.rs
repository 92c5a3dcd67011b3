use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::keymap::{Command, GLOBAL};

use super::{App, StatusKind};

impl App {
    /// Bindings of `context`, one entry per command with its keys joined by `/`.
    pub(super) fn key_hints(&self, context: &str) -> Vec<(String, Command)> {
        let Some(table) = self.router.bindings(context) else {
            return Vec::new();
        };
        let mut grouped: Vec<(Command, Vec<&str>)> = Vec::new();
        for (key, cmd) in table {
            match grouped.iter_mut().find(|(c, _)| c == cmd) {
                Some((_, keys)) => keys.push(key),
                None => grouped.push((*cmd, vec![key.as_str()])),
            }
        }
        grouped.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
        grouped
            .into_iter()
            .map(|(cmd, mut keys)| {
                keys.sort_unstable();
                (keys.join("/"), cmd)
            })
            .collect()
    }
}

pub(super) fn draw(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(if app.glob_open { 3 } else { 0 }),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .split(area);

    // Header
    let mut spans = vec![
        Span::styled("kerpic", Style::default().fg(Color::Black).bg(Color::White)),
        Span::raw("  "),
        Span::styled(
            app.view().context(),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  "),
        Span::raw(app.config.server_url.as_str()),
    ];
    let pending = app.saves.pending();
    if pending > 0 {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("saving {pending}"),
            Style::default().fg(Color::Yellow),
        ));
    }
    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    app.view().render(frame, chunks[1]);

    if app.glob_open {
        let prompt = Paragraph::new(Line::from(vec![
            Span::styled("glob> ", Style::default().fg(Color::Cyan)),
            Span::raw(app.glob_input.buf.as_str()),
        ]))
        .block(Block::default().borders(Borders::ALL).title("Select by pattern"));
        frame.render_widget(prompt, chunks[2]);
        let x = chunks[2].x + 1 + 6 + app.glob_input.cursor as u16;
        frame.set_cursor_position((x, chunks[2].y + 1));
    }

    // Status
    let status = match &app.status {
        Some(s) => {
            let color = match s.kind {
                StatusKind::Info => Color::White,
                StatusKind::Error => Color::Red,
            };
            Line::styled(s.text.as_str(), Style::default().fg(color))
        }
        None => Line::from(""),
    };
    frame.render_widget(
        Paragraph::new(status)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::TOP)),
        chunks[3],
    );

    // Hints for the active context
    let mut hint_spans = Vec::new();
    for (keys, cmd) in app.key_hints(app.view().context()) {
        hint_spans.push(Span::styled(keys, Style::default().fg(Color::Yellow)));
        hint_spans.push(Span::styled(
            format!(" {}  ", cmd),
            Style::default().fg(Color::Gray),
        ));
    }
    hint_spans.push(Span::styled("? help", Style::default().fg(Color::Gray)));
    frame.render_widget(Paragraph::new(Line::from(hint_spans)), chunks[4]);

    if app.show_help {
        draw_help(frame, app, area);
    }
}

fn draw_help(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let popup = centered(area, 60, 70);
    let mut lines = Vec::new();
    for context in [GLOBAL, app.view().context()] {
        lines.push(Line::styled(
            context.to_string(),
            Style::default().fg(Color::Cyan),
        ));
        for (keys, cmd) in app.key_hints(context) {
            lines.push(Line::from(vec![
                Span::styled(format!("  {: <18}", keys), Style::default().fg(Color::Yellow)),
                Span::raw(cmd.to_string()),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines.push(Line::styled(
        "esc closes this help",
        Style::default().fg(Color::Gray),
    ));

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Keys")),
        popup,
    );
}

fn centered(area: Rect, pct_x: u16, pct_y: u16) -> Rect {
    let v = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - pct_y) / 2),
            Constraint::Percentage(pct_y),
            Constraint::Percentage((100 - pct_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - pct_x) / 2),
            Constraint::Percentage(pct_x),
            Constraint::Percentage((100 - pct_x) / 2),
        ])
        .split(v[1])[1]
}
