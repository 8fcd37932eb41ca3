//! Braille-canvas rendering of the occurrence map: markers colored by
//! accessibility level, the planned route polyline, and the selection cursor.

use crate::app::state::SelectionMode;
use crate::app::App;
use crate::domain::AccessibilityLevel;
use ratatui::style::Color;
use ratatui::symbols;
use ratatui::widgets::canvas::{Canvas, Context, Line};
use ratatui::widgets::{Block, Borders};

pub const fn level_color(level: AccessibilityLevel) -> Color {
    match level {
        AccessibilityLevel::Accessible => Color::Green,
        AccessibilityLevel::Partial => Color::Yellow,
        AccessibilityLevel::Inaccessible => Color::Red,
    }
}

pub const fn level_marker(level: AccessibilityLevel) -> &'static str {
    match level {
        AccessibilityLevel::Accessible => "●",
        AccessibilityLevel::Partial => "◐",
        AccessibilityLevel::Inaccessible => "✖",
    }
}

/// Builds the map canvas for the app's current viewport. The x axis is
/// longitude and the y axis latitude, so pan and zoom fall out of the
/// bounds alone.
pub fn map_canvas(app: &App) -> Canvas<'_, impl Fn(&mut Context<'_>) + '_> {
    let view = &app.map;
    let x_bounds = [
        view.center.lng - view.span_lng / 2.0,
        view.center.lng + view.span_lng / 2.0,
    ];
    let y_bounds = [
        view.center.lat - view.span_lat / 2.0,
        view.center.lat + view.span_lat / 2.0,
    ];

    let visible: Vec<usize> = app.filtered_by_disability();

    Canvas::default()
        .block(
            Block::default()
                .title(map_title(app))
                .borders(Borders::ALL),
        )
        .marker(symbols::Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(move |ctx| {
            // Route first so markers stay readable on top of it
            if let Some(route) = &app.planner.planned {
                for pair in route.points.windows(2) {
                    ctx.draw(&Line {
                        x1: pair[0].lng,
                        y1: pair[0].lat,
                        x2: pair[1].lng,
                        y2: pair[1].lat,
                        color: Color::Cyan,
                    });
                }
            }

            ctx.layer();

            for index in &visible {
                let occurrence = &app.occurrences[*index];
                ctx.print(
                    occurrence.longitude,
                    occurrence.latitude,
                    ratatui::text::Span::styled(
                        level_marker(occurrence.level),
                        ratatui::style::Style::default().fg(level_color(occurrence.level)),
                    ),
                );
            }

            if let Some(origin) = app.planner.origin {
                ctx.print(
                    origin.lng,
                    origin.lat,
                    ratatui::text::Span::styled(
                        "A",
                        ratatui::style::Style::default().fg(Color::Cyan),
                    ),
                );
            }
            if let Some(destination) = app.planner.destination {
                ctx.print(
                    destination.lng,
                    destination.lat,
                    ratatui::text::Span::styled(
                        "B",
                        ratatui::style::Style::default().fg(Color::Cyan),
                    ),
                );
            }

            ctx.layer();

            let cursor_style = if app.selection_mode == SelectionMode::None {
                ratatui::style::Style::default().fg(Color::White)
            } else {
                ratatui::style::Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(ratatui::style::Modifier::BOLD)
            };
            ctx.print(
                view.cursor.lng,
                view.cursor.lat,
                ratatui::text::Span::styled("+", cursor_style),
            );
        })
}

fn map_title(app: &App) -> String {
    let filter = app.filter_disability.map_or_else(
        || "all".to_string(),
        |d| d.label().to_lowercase(),
    );
    format!(
        "Accessibility Map ({:.5}, {:.5}) [filter: {filter}]",
        app.map.center.lat, app.map.center.lng
    )
}
