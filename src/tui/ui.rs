//! UI Rendering Module
//!
//! Draws the operator session using ratatui: the pending request on top,
//! the editable reply below, and a help line with the action bindings.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::app::SessionApp;

/// Draw the complete UI
pub fn render(f: &mut Frame, app: &SessionApp) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),
            Constraint::Length(8),
            Constraint::Length(1),
        ])
        .split(size);

    draw_request_panel(f, app, chunks[0]);
    draw_reply_panel(f, app, chunks[1]);
    draw_help_line(f, chunks[2]);
}

fn draw_request_panel(f: &mut Frame, app: &SessionApp, area: Rect) {
    let request_block = Block::default()
        .title(" Request ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = request_block.inner(area);
    f.render_widget(request_block, area);

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("model: ", Style::default().fg(Color::Gray)),
        Span::styled(
            app.view.model.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::from(Span::styled(
        format!(
            "max_tokens: {}  temperature: {}",
            app.view.max_tokens, app.view.temperature
        ),
        Style::default().fg(Color::Gray),
    )));
    lines.push(Line::from(""));

    for entry in &app.view.transcript {
        let style = match entry.role.as_str() {
            "user" => Style::default().fg(Color::Green),
            "assistant" => Style::default().fg(Color::Blue),
            "system" => Style::default().fg(Color::Gray),
            _ => Style::default(),
        };

        let content = format!("{}: {}", entry.role, entry.content);
        for line in content.lines() {
            lines.push(Line::from(Span::styled(line.to_string(), style)));
        }
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: true })
        .scroll((app.transcript_scroll as u16, 0));

    f.render_widget(paragraph, inner);
}

fn draw_reply_panel(f: &mut Frame, app: &SessionApp, area: Rect) {
    let reply_block = Block::default()
        .title(" Reply ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let inner = reply_block.inner(area);

    let input_text = if app.input.is_empty() {
        Text::from(Span::styled(
            "Type your reply...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Text::from(app.input.as_str())
    };

    let paragraph = Paragraph::new(input_text)
        .block(reply_block)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);

    let (cursor_x, cursor_y) = cursor_offset(&app.input, app.cursor_position, inner.width);
    if cursor_y < inner.height {
        f.set_cursor_position((inner.x + cursor_x, inner.y + cursor_y));
    }
}

/// Map the char-indexed cursor position onto panel coordinates, following
/// explicit newlines and wrapping at the panel width.
fn cursor_offset(input: &str, cursor_position: usize, width: u16) -> (u16, u16) {
    let mut x: u16 = 0;
    let mut y: u16 = 0;
    for c in input.chars().take(cursor_position) {
        if c == '\n' {
            x = 0;
            y += 1;
        } else {
            x += 1;
            if width > 0 && x >= width {
                x = 0;
                y += 1;
            }
        }
    }
    (x, y)
}

fn draw_help_line(f: &mut Frame, area: Rect) {
    let help = Paragraph::new(" F12 send | F1 cannot answer | F2 internal error | F3 forbidden ")
        .style(Style::default().fg(Color::Black).bg(Color::Cyan))
        .alignment(Alignment::Center);

    f.render_widget(help, area);
}
