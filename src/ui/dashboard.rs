//! Dashboard view: tunnel status, profile sidebar, and activity log.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::app::App;
use crate::constants;
use crate::state::ConnectionStatus;
use crate::theme;

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_COLOR)),
        area,
    );

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Status panel
            Constraint::Min(5),    // Profiles + logs
            Constraint::Length(1), // Footer
        ])
        .split(area);

    render_status(frame, app, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[1]);

    render_profiles(frame, app, columns[0]);
    render_logs(frame, app, columns[1]);

    crate::ui::widgets::footer::render_dashboard(frame, app, rows[2]);
}

fn status_style(status: ConnectionStatus) -> Style {
    let color = match status {
        ConnectionStatus::Connected => theme::SUCCESS,
        ConnectionStatus::Connecting | ConnectionStatus::Disconnecting => theme::WARNING,
        ConnectionStatus::Error => theme::ERROR,
        ConnectionStatus::Disconnected => theme::TEXT_SECONDARY,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.controller.state();

    let block = Block::default()
        .title(constants::TITLE_STATUS)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER_DEFAULT));

    let profile_line = match (&state.active_profile, state.selected_profile()) {
        (Some(active), _) => format!("Tunnel: {active}"),
        (None, Some(selected)) => format!("Selected: {} ({})", selected.name, selected.endpoint),
        (None, None) => constants::MSG_NO_PROFILE.to_string(),
    };

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Status  ", Style::default().fg(theme::TEXT_SECONDARY)),
            Span::styled(state.status.to_string(), status_style(state.status)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(profile_line, Style::default().fg(theme::TEXT_PRIMARY)),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_profiles(frame: &mut Frame, app: &mut App, area: Rect) {
    let state = app.controller.state();

    let block = Block::default()
        .title(constants::TITLE_PROFILES)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER_FOCUSED));

    if state.profiles.is_empty() {
        let empty = Paragraph::new(constants::MSG_NO_DATA)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme::TEXT_SECONDARY))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let active = state.active_profile.as_deref();
    let rows: Vec<Row> = state
        .profiles
        .iter()
        .enumerate()
        .map(|(i, profile)| {
            let marker = if active == Some(profile.name.as_str()) {
                "●"
            } else {
                " "
            };
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(marker.to_string())
                    .style(Style::default().fg(theme::SUCCESS)),
                Cell::from(profile.name.clone()),
                Cell::from(profile.endpoint.clone())
                    .style(Style::default().fg(theme::TEXT_SECONDARY)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(10),
            Constraint::Min(12),
        ],
    )
    .block(block)
    .style(Style::default().fg(theme::TEXT_PRIMARY))
    .row_highlight_style(
        Style::default()
            .bg(theme::ROW_SELECTED_BG)
            .fg(theme::ROW_SELECTED_FG)
            .add_modifier(Modifier::BOLD),
    );

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_logs(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(constants::TITLE_LOGS)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER_DEFAULT));

    // Show the tail that fits, honoring the scroll offset
    let inner_height = area.height.saturating_sub(2);
    let top = app
        .logs_scroll
        .saturating_sub(inner_height.saturating_sub(1));

    let lines: Vec<Line> = app
        .logs
        .iter()
        .skip(top as usize)
        .map(|entry| Line::from(Span::styled(entry.clone(), Style::default().fg(theme::TEXT_PRIMARY))))
        .collect();

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    frame.render_widget(paragraph, area);
}
