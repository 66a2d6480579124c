//! City grid screen rendering
//!
//! Renders the home view: one card per popular city with its icon, rounded
//! temperature, condition text and humidity/wind summary.

use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use cityweather::data::{icon_for, wind_arrow};

use super::{hint_line, render_footer, temperature_color};
use crate::app::{App, CityCard};

/// Number of card columns in the grid
const GRID_COLUMNS: usize = 3;

/// Height of one card including its border
const CARD_HEIGHT: u16 = 6;

/// Renders the city grid screen
///
/// # Arguments
/// * `frame` - The ratatui Frame to render to
/// * `app` - The application state containing cards and selection
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(3),    // Grid
            Constraint::Length(2), // Status + help
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_grid(frame, app, chunks[1]);

    let hints = hint_line(&[
        ("↑/↓", "Navigate"),
        ("Enter", "Details"),
        ("/", "Search"),
        ("1-0", "Quick city"),
        ("r", "Refresh"),
        ("?", "Help"),
        ("q", "Quit"),
    ]);
    render_footer(frame, chunks[2], app, hints);
}

/// Renders the title line with the current time and data freshness
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let time_str = Local::now().format("%a %b %d, %H:%M").to_string();

    let mut spans = vec![
        Span::styled(
            "CITY WEATHER",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(time_str, Style::default().fg(Color::White)),
    ];

    if let Some(last_refresh) = app.last_refresh {
        let elapsed = Local::now() - last_refresh;
        let mins_ago = elapsed.num_minutes();
        let freshness_text = if mins_ago < 1 {
            "  │ Data: just now".to_string()
        } else {
            format!("  │ Data: {}m ago", mins_ago)
        };
        spans.push(Span::styled(
            freshness_text,
            Style::default().fg(Color::DarkGray),
        ));
    }

    let width = area.width as usize;
    let separator = "─".repeat(width.saturating_sub(2));

    let paragraph = Paragraph::new(vec![
        Line::from(spans),
        Line::from(Span::styled(
            separator,
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    frame.render_widget(paragraph, area);
}

/// Lays the cards out row by row
fn render_grid(frame: &mut Frame, app: &App, area: Rect) {
    if app.cards.is_empty() {
        let message = Paragraph::new(Line::from(Span::styled(
            "No city data available. Press r to retry.",
            Style::default().fg(Color::DarkGray),
        )));
        frame.render_widget(message, area);
        return;
    }

    let rows: Vec<&[CityCard]> = app.cards.chunks(GRID_COLUMNS).collect();
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            rows.iter()
                .map(|_| Constraint::Length(CARD_HEIGHT))
                .chain(std::iter::once(Constraint::Min(0)))
                .collect::<Vec<_>>(),
        )
        .split(area);

    for (row_index, row) in rows.iter().enumerate() {
        let column_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
            .split(row_areas[row_index]);

        for (column, card) in row.iter().enumerate() {
            let index = row_index * GRID_COLUMNS + column;
            render_card(frame, card, index == app.selected_index, column_areas[column]);
        }
    }
}

/// Renders a single city card
fn render_card(frame: &mut Frame, card: &CityCard, is_selected: bool, area: Rect) {
    let weather = &card.weather;

    let border_style = if is_selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let cursor = if is_selected { "\u{25B8} " } else { "" }; // ▸

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(
            format!(" {}{} ", cursor, weather.city),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ));

    let mut lines = vec![
        Line::from(vec![
            Span::raw(format!("{}  ", icon_for(&weather.condition))),
            Span::styled(
                format!("{}\u{00B0}C", weather.temp),
                Style::default()
                    .fg(temperature_color(weather.temp))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(weather.condition.clone(), Style::default().fg(Color::Gray)),
        ]),
        Line::from(Span::styled(
            format!(
                "Humidity {}%  Wind {} {:.0} km/h",
                weather.humidity,
                wind_arrow(&weather.wind_dir),
                weather.wind_kph
            ),
            Style::default().fg(Color::Gray),
        )),
    ];

    if card.from_cache {
        lines.push(Line::from(Span::styled(
            "cached",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
