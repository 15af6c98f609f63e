//! Rendering for the swatch client.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::app::{App, ClientState};
use crate::color::ColorTriple;

const COLOR_BORDER: Color = Color::DarkGray;
const COLOR_ACCENT: Color = Color::White;
const COLOR_DIM: Color = Color::DarkGray;
const COLOR_ERROR: Color = Color::Red;
const COLOR_PROGRESS: Color = Color::White;

const TITLE: &str = "webmuse palette generator";

/// Ticks for one sweep of the loading gauge.
const GAUGE_PERIOD: u64 = 20;

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_title(frame, chunks[0]);
    render_input(frame, chunks[1], app);
    render_status(frame, chunks[2], app);
    app.swatch_areas = render_swatches(frame, chunks[3], app);
    render_hints(frame, chunks[4], app);
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        TITLE,
        Style::default().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(title, area);
}

fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let border = if app.state == ClientState::Editing {
        COLOR_ACCENT
    } else {
        COLOR_BORDER
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(" Theme ");

    let text_style = if app.is_loading() {
        Style::default().fg(COLOR_DIM)
    } else {
        Style::default()
    };
    let input = Paragraph::new(Span::styled(app.input.as_str(), text_style)).block(block);
    frame.render_widget(input, area);

    if app.state == ClientState::Editing {
        let input_width = u16::try_from(app.input.width()).unwrap_or(u16::MAX);
        let x = area.x.saturating_add(1).saturating_add(input_width);
        let max_x = area.x.saturating_add(area.width.saturating_sub(2));
        frame.set_cursor_position((x.min(max_x), area.y.saturating_add(1)));
    }
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    match &app.state {
        ClientState::Loading => {
            let step = app.tick % GAUGE_PERIOD;
            let gauge = Gauge::default()
                .block(Block::default().borders(Borders::ALL).title(" Generating "))
                .gauge_style(Style::default().fg(COLOR_PROGRESS).bg(COLOR_BORDER))
                .ratio(step as f64 / GAUGE_PERIOD as f64)
                .label("");
            frame.render_widget(gauge, area);
        }
        ClientState::Failed(message) => {
            let error = Paragraph::new(Span::styled(
                message.as_str(),
                Style::default().fg(COLOR_ERROR),
            ))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(COLOR_ERROR))
                    .title(" Error "),
            )
            .wrap(Wrap { trim: true });
            frame.render_widget(error, area);
        }
        ClientState::Editing | ClientState::Showing(_) => {}
    }
}

/// Draw one block per color and return their areas for hit-testing.
fn render_swatches(frame: &mut Frame, area: Rect, app: &App) -> Vec<Rect> {
    let Some(palette) = app.palette() else {
        return Vec::new();
    };

    let count = palette.len() as u32;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..count).map(|_| Constraint::Ratio(1, count)))
        .split(area);

    for (index, (color, cell)) in palette.colors().iter().zip(columns.iter()).enumerate() {
        render_swatch(frame, *cell, color, index == app.selected, app.copied == Some(index));
    }

    columns.to_vec()
}

fn render_swatch(frame: &mut Frame, area: Rect, color: &ColorTriple, selected: bool, copied: bool) {
    let (r, g, b) = color.to_rgb8();
    let fill = Color::Rgb(r, g, b);
    let ink = contrast_ink(r, g, b);

    let mut block = Block::default().style(Style::default().bg(fill));
    if selected {
        block = block
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ink).add_modifier(Modifier::BOLD));
    }

    let label = if copied {
        "Copied!".to_string()
    } else if selected {
        color.to_css()
    } else {
        String::new()
    };

    let inner_height = area.height.saturating_sub(2);
    let mut lines = vec![Line::from(""); inner_height.saturating_sub(1) as usize];
    lines.push(Line::from(Span::styled(label, Style::default().fg(ink))));

    let swatch = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(swatch, area);
}

/// Black or white text, whichever reads better on `(r, g, b)`.
fn contrast_ink(r: u8, g: u8, b: u8) -> Color {
    let luma = 299 * r as u32 + 587 * g as u32 + 114 * b as u32;
    if luma > 128_000 {
        Color::Black
    } else {
        Color::White
    }
}

fn render_hints(frame: &mut Frame, area: Rect, app: &App) {
    let hint = match app.state {
        ClientState::Showing(_) => "←/→ select · Enter/c or click copy · type to edit · Esc quit",
        ClientState::Loading => "Generating palette… · Esc quit",
        ClientState::Editing | ClientState::Failed(_) => "Enter generate · Esc quit",
    };
    let hints = Paragraph::new(Span::styled(hint, Style::default().fg(COLOR_DIM)))
        .alignment(Alignment::Center);
    frame.render_widget(hints, area);
}
