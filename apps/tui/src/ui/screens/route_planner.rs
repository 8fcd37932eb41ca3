use crate::app::state::PlannerField;
use crate::app::App;
use crate::ui::widgets::map_canvas::map_canvas;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render_route_planner(app: &App, f: &mut Frame<'_>) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Form
            Constraint::Min(8),    // Map preview
            Constraint::Length(2), // Help
        ])
        .split(area);

    render_form(app, f, chunks[0]);
    f.render_widget(map_canvas(app), chunks[1]);

    let help = if app.planner.editing {
        "Type address or \"lat,lng\"   ↑/↓ suggestion   Enter accept   Esc done"
    } else {
        "↑/↓ field   e edit   m pick on map   a avoid partial   Enter plan   x clear   Esc map"
    };
    f.render_widget(
        Paragraph::new(help)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::TOP)),
        chunks[2],
    );
}

fn render_form(app: &App, f: &mut Frame<'_>, area: ratatui::layout::Rect) {
    let block = Block::default()
        .title("Plan an accessible route")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Origin
            Constraint::Length(1), // Destination
            Constraint::Length(1), // Avoid toggle
            Constraint::Length(1), // Status
            Constraint::Min(0),    // Suggestions
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(field_line(app, "Origin", PlannerField::Origin)),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(field_line(app, "Destination", PlannerField::Destination)),
        chunks[1],
    );

    let avoid = if app.planner.avoid_partial {
        "[x] also avoid partially accessible spots"
    } else {
        "[ ] also avoid partially accessible spots"
    };
    f.render_widget(
        Paragraph::new(avoid).style(Style::default().fg(Color::Gray)),
        chunks[2],
    );

    if !app.planner.status.is_empty() {
        f.render_widget(
            Paragraph::new(app.planner.status.as_str())
                .style(Style::default().fg(Color::Cyan)),
            chunks[3],
        );
    }

    if app.planner.editing && !app.planner.suggestions.is_empty() {
        let lines: Vec<TextLine<'_>> = app
            .planner
            .suggestions
            .iter()
            .enumerate()
            .map(|(i, suggestion)| {
                let is_selected = i == app.planner.suggestion_index;
                let style = if is_selected {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                let prefix = if is_selected { "> " } else { "  " };
                TextLine::from(Span::styled(
                    format!("{prefix}{}", suggestion.label),
                    style,
                ))
            })
            .collect();
        f.render_widget(Paragraph::new(lines), chunks[4]);
    }
}

fn field_line<'a>(app: &'a App, label: &str, field: PlannerField) -> TextLine<'a> {
    let is_selected = app.planner.field == field;
    let is_editing = is_selected && app.planner.editing;

    let style = if is_editing {
        Style::default()
            .fg(Color::White)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD)
    } else if is_selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let prefix = if is_editing {
        "► "
    } else if is_selected {
        "> "
    } else {
        "  "
    };

    let (value, resolved) = match field {
        PlannerField::Origin => (&app.planner.origin_input, app.planner.origin),
        PlannerField::Destination => (&app.planner.destination_input, app.planner.destination),
    };
    let marker = if resolved.is_some() { " ✓" } else { "" };

    TextLine::from(vec![
        Span::styled(format!("{prefix}{label}: "), style),
        Span::styled(value.clone(), style),
        Span::styled(marker, Style::default().fg(Color::Green)),
    ])
}
