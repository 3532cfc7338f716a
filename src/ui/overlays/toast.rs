//! Toast notification overlay

use crate::app::App;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::theme;

/// Render toast notification
pub fn render(frame: &mut Frame, app: &App) {
    let Some(ref toast) = app.toast else {
        return;
    };

    let area = frame.area();
    let width = (area.width / 3).clamp(30, 60);

    #[allow(clippy::cast_possible_truncation)]
    let text_lines = {
        let inner_width = width.saturating_sub(4) as usize;
        if inner_width > 0 {
            toast.message.len().div_ceil(inner_width) as u16
        } else {
            1
        }
    };
    let height = (text_lines + 2).max(3);

    // Bottom-center, just above the footer
    let toast_area = Rect {
        x: (area.width / 2).saturating_sub(width / 2),
        y: area.height.saturating_sub(height + 1),
        width,
        height,
    };

    frame.render_widget(Clear, toast_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT_PRIMARY))
        .title(Span::styled(
            " NOTICE ",
            Style::default()
                .fg(theme::BG_COLOR)
                .bg(theme::ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));

    let paragraph = Paragraph::new(toast.message.clone())
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .style(Style::default().fg(theme::TEXT_PRIMARY).bg(theme::BG_COLOR))
        .block(block);

    frame.render_widget(paragraph, toast_area);
}
