//! City detail screen UI
//!
//! Renders current conditions for one city above a strip of upcoming
//! forecast days, each in its own bordered box.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use cityweather::data::{clock_time, icon_for, short_date, wind_arrow, CurrentWeather, DailyForecast};

use super::{hint_line, render_footer, temperature_color};
use crate::app::{App, FORECAST_DAYS_SHOWN};

/// Color scheme for the detail screen
mod colors {
    use ratatui::style::Color;

    /// Section headers
    pub const HEADER: Color = Color::Cyan;
    /// Primary text
    pub const PRIMARY: Color = Color::White;
    /// Secondary/dimmed text
    pub const SECONDARY: Color = Color::Gray;
    /// Unavailable data
    pub const UNKNOWN: Color = Color::DarkGray;
}

/// Renders the city detail screen
///
/// # Arguments
/// * `frame` - The ratatui frame to render into
/// * `app` - The application state
/// * `city` - The city the view was opened for
pub fn render(frame: &mut Frame, app: &App, city: &str) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10), // Current conditions
            Constraint::Min(6),     // Forecast strip
            Constraint::Length(2),  // Status + help
        ])
        .split(area);

    let hints = hint_line(&[
        ("Esc", "Back"),
        ("/", "Search"),
        ("1-0", "Quick city"),
        ("r", "Refresh"),
        ("?", "Help"),
        ("q", "Quit"),
    ]);

    match &app.detail {
        Some(detail) => {
            render_current(frame, chunks[0], &detail.current);
            render_forecast(frame, chunks[1], detail.upcoming());
        }
        None => render_no_data(frame, chunks[0], city),
    }

    render_footer(frame, chunks[2], app, hints);
}

/// Renders the current conditions box
fn render_current(frame: &mut Frame, area: Rect, weather: &CurrentWeather) {
    let title = if weather.country.is_empty() {
        format!(" {} ", weather.city)
    } else {
        format!(" {}, {} ", weather.city, weather.country)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER))
        .title(Span::styled(
            title,
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));

    let paragraph = Paragraph::new(build_current_lines(weather)).block(block);
    frame.render_widget(paragraph, area);
}

fn build_current_lines(weather: &CurrentWeather) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            Span::raw(format!("{}  ", icon_for(&weather.condition))),
            Span::styled(
                format!("{}\u{00B0}C", weather.temp),
                Style::default()
                    .fg(temperature_color(weather.temp))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" (feels {}\u{00B0}C)", weather.feels_like),
                Style::default().fg(colors::SECONDARY),
            ),
            Span::raw("  "),
            Span::styled(weather.condition.clone(), Style::default().fg(colors::PRIMARY)),
        ]),
        Line::default(),
        label_line(
            "Wind",
            format!(
                "{} {} {}\u{00B0} {:.0} km/h (gusts {:.0})",
                wind_arrow(&weather.wind_dir),
                weather.wind_dir,
                weather.wind_degree,
                weather.wind_kph,
                weather.gust_kph
            ),
        ),
        label_line("Humidity", format!("{}%", weather.humidity)),
        label_line(
            "Pressure",
            format!("{:.0} mb   Visibility {:.0} km", weather.pressure_mb, weather.visibility_km),
        ),
    ];

    let uv_color = uv_index_color(weather.uv);
    lines.push(Line::from(vec![
        Span::styled(format!("{:<10}", "UV"), Style::default().fg(colors::SECONDARY)),
        Span::styled(format!("{:.0}", weather.uv), Style::default().fg(uv_color)),
        Span::styled(
            format!(" ({})", uv_level_text(weather.uv)),
            Style::default().fg(uv_color),
        ),
    ]));

    if !weather.last_updated.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("Updated {}", clock_time(&weather.last_updated)),
            Style::default().fg(colors::UNKNOWN),
        )));
    }

    lines
}

fn label_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<10}", label), Style::default().fg(colors::SECONDARY)),
        Span::styled(value, Style::default().fg(colors::PRIMARY)),
    ])
}

/// Renders the upcoming days side by side
fn render_forecast(frame: &mut Frame, area: Rect, days: &[DailyForecast]) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER))
        .title(Span::styled(
            " FORECAST ",
            Style::default()
                .fg(colors::HEADER)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if days.is_empty() {
        let message = Paragraph::new(Line::from(Span::styled(
            "Forecast unavailable",
            Style::default().fg(colors::UNKNOWN),
        )));
        frame.render_widget(message, inner);
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, FORECAST_DAYS_SHOWN as u32); FORECAST_DAYS_SHOWN])
        .split(inner);

    for (day, column) in days.iter().zip(columns.iter()) {
        let paragraph = Paragraph::new(build_day_lines(day));
        frame.render_widget(paragraph, *column);
    }
}

fn build_day_lines(day: &DailyForecast) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::styled(
                day.weekday.clone(),
                Style::default()
                    .fg(colors::PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {}", short_date(&day.date)),
                Style::default().fg(colors::SECONDARY),
            ),
        ]),
        Line::from(format!("{} {}", icon_for(&day.condition), day.condition)),
        Line::from(vec![
            Span::styled(
                format!("{}\u{00B0}", day.temp_max),
                Style::default().fg(temperature_color(day.temp_max)),
            ),
            Span::styled(" / ", Style::default().fg(colors::SECONDARY)),
            Span::styled(
                format!("{}\u{00B0}", day.temp_min),
                Style::default().fg(temperature_color(day.temp_min)),
            ),
        ]),
        Line::from(Span::styled(
            format!("Rain {}%", day.chance_of_rain),
            Style::default().fg(colors::SECONDARY),
        )),
    ]
}

/// Renders a "no data" message when the detail is unavailable
fn render_no_data(frame: &mut Frame, area: Rect, city: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER))
        .title(Span::styled(
            format!(" {} ", city),
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));

    let message = Paragraph::new(vec![
        Line::default(),
        Line::from(Span::styled(
            "No data available for this city",
            Style::default().fg(colors::UNKNOWN),
        )),
    ])
    .block(block);

    frame.render_widget(message, area);
}

/// Returns the color for a UV index value
fn uv_index_color(uv: f64) -> Color {
    match uv as u32 {
        0..=2 => Color::Green,
        3..=5 => Color::Yellow,
        6..=7 => Color::LightRed,
        8..=10 => Color::Red,
        _ => Color::Magenta, // Extreme
    }
}

/// Returns the text description for a UV index value
fn uv_level_text(uv: f64) -> &'static str {
    match uv as u32 {
        0..=2 => "Low",
        3..=5 => "Moderate",
        6..=7 => "High",
        8..=10 => "Very High",
        _ => "Extreme",
    }
}
