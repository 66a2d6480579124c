//! UI rendering module for City Weather
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod city_detail;
pub mod city_list;
pub mod help_overlay;

pub use city_detail::render as render_city_detail;
pub use city_list::render as render_city_list;
pub use help_overlay::render as render_help_overlay;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, InputMode};

/// Color for temperature (warmer = more red, cooler = more blue)
pub(crate) fn temperature_color(temp: i64) -> Color {
    if temp >= 30 {
        Color::Red
    } else if temp >= 25 {
        Color::LightRed
    } else if temp >= 20 {
        Color::Yellow
    } else if temp >= 15 {
        Color::Green
    } else if temp >= 5 {
        Color::Cyan
    } else {
        Color::Blue
    }
}

/// Renders the two footer rows shared by both screens
///
/// The first row carries the status message (or the search box while
/// searching), the second the key hints passed in.
pub(crate) fn render_footer(frame: &mut Frame, area: Rect, app: &App, hints: Line<'static>) {
    let top = if app.input_mode == InputMode::Search {
        Line::from(vec![
            Span::styled("Search: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{}_", app.search_input),
                Style::default().fg(Color::White),
            ),
            Span::styled(
                "   Enter search  Esc cancel",
                Style::default().fg(Color::DarkGray),
            ),
        ])
    } else if app.busy {
        Line::from(Span::styled("Loading...", Style::default().fg(Color::Cyan)))
    } else {
        match &app.status {
            Some(message) => Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red),
            )),
            None => Line::default(),
        }
    };

    let paragraph = Paragraph::new(vec![top, hints]);
    frame.render_widget(paragraph, area);
}

/// Builds a key-hint line from `(key, label)` pairs
pub(crate) fn hint_line(hints: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, label) in hints {
        spans.push(Span::styled(
            key.to_string(),
            Style::default().fg(Color::Yellow),
        ));
        spans.push(Span::styled(
            format!(" {}  ", label),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}
