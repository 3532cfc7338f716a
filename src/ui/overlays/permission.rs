//! Permission consent overlay.
//!
//! Shown when a connect needs elevated privileges the process does not have.
//! The prompt captures all input until the user grants or denies.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::constants;
use crate::theme;

pub fn render(frame: &mut Frame) {
    let area = frame.area();
    let width = (area.width * 2 / 3).clamp(40, 70);
    let height = 7;

    let overlay = Rect {
        x: (area.width / 2).saturating_sub(width / 2),
        y: (area.height / 2).saturating_sub(height / 2),
        width,
        height,
    };

    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::WARNING))
        .title(Span::styled(
            constants::TITLE_PERMISSION,
            Style::default()
                .fg(theme::BG_COLOR)
                .bg(theme::WARNING)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(theme::BG_COLOR));

    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);

    let rows = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .split(inner);

    let prompt = Paragraph::new(constants::PROMPT_PERMISSION)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .style(Style::default().fg(theme::TEXT_PRIMARY));
    frame.render_widget(prompt, rows[1]);

    let hint = Paragraph::new(Line::from(Span::styled(
        constants::HINT_PERMISSION,
        Style::default().fg(theme::ACCENT_PRIMARY).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(hint, rows[2]);
}
