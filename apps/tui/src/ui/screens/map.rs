use crate::app::state::SelectionMode;
use crate::app::App;
use crate::ui::widgets::map_canvas::map_canvas;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render_map(app: &App, f: &mut Frame<'_>) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Canvas
            Constraint::Length(2), // Status
            Constraint::Length(2), // Help
        ])
        .split(area);

    f.render_widget(map_canvas(app), chunks[0]);

    let status = match app.selection_mode {
        SelectionMode::None => {
            if app.status_message.is_empty() {
                format!(
                    "{} occurrence(s) in view filter. Cursor: {:.6}, {:.6}",
                    app.filtered_by_disability().len(),
                    app.map.cursor.lat,
                    app.map.cursor.lng
                )
            } else {
                app.status_message.clone()
            }
        }
        SelectionMode::Origin => "Selecting route origin. Enter confirms.".to_string(),
        SelectionMode::Destination => "Selecting route destination. Enter confirms.".to_string(),
        SelectionMode::OccurrenceSpot => "Selecting report location. Enter confirms.".to_string(),
    };
    let status_style = if app.selection_mode == SelectionMode::None {
        Style::default().fg(Color::Gray)
    } else {
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD)
    };
    f.render_widget(
        Paragraph::new(status)
            .style(status_style)
            .block(Block::default().borders(Borders::TOP)),
        chunks[1],
    );

    let help = TextLine::from(vec![
        key("↑↓←→"),
        Span::raw(" move  "),
        key("+/-"),
        Span::raw(" zoom  "),
        key("n"),
        Span::raw(" report  "),
        key("o"),
        Span::raw(" list  "),
        key("r"),
        Span::raw(" route  "),
        key("g"),
        Span::raw(" ranking  "),
        key("f"),
        Span::raw(" filter  "),
        key("x"),
        Span::raw(" logout  "),
        key("?"),
        Span::raw(" help  "),
        key("q"),
        Span::raw(" quit"),
    ]);
    f.render_widget(
        Paragraph::new(help)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::TOP)),
        chunks[2],
    );
}

fn key(text: &str) -> Span<'_> {
    Span::styled(
        text,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
}
