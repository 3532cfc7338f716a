//! Footer widget with context-aware keybinding hints

use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::state::ConnectionStatus;

/// Render dashboard footer with context-aware shortcuts
pub fn render_dashboard(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.controller.state();

    // Permission prompt takes priority
    if state.permission_pending {
        let hints = vec![("y", "Grant"), ("n", "Deny")];
        render_hints(frame, area, &hints);
        return;
    }

    let mut hints = Vec::new();

    if !state.profiles.is_empty() {
        hints.push(("1-9", "Select"));
        hints.push(("↑↓", "Navigate"));
    }

    let toggle = match state.status {
        ConnectionStatus::Connected => "Disconnect",
        _ => "Connect",
    };
    hints.push(("Enter", toggle));
    hints.push(("PgUp/PgDn", "Logs"));
    hints.push(("q", "Quit"));

    render_hints(frame, area, &hints);
}

fn render_hints(frame: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    use ratatui::layout::{Alignment, Constraint, Direction, Layout};

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(16)])
        .split(area);

    let mut spans = vec![Span::raw(" ")];
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(
                " │ ",
                Style::default().fg(Color::Rgb(50, 50, 50)),
            ));
        }
        spans.push(Span::styled(
            *key,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(*action, Style::default().fg(Color::DarkGray)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

    let branding = Span::styled(
        format!(
            "{} v{} ",
            crate::constants::APP_NAME,
            crate::constants::APP_VERSION
        ),
        Style::default().fg(crate::theme::NORD_POLAR_NIGHT_4),
    );
    frame.render_widget(
        Paragraph::new(Line::from(branding)).alignment(Alignment::Right),
        chunks[1],
    );
}
