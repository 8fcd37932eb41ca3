use crate::app::App;
use crate::ui::widgets::map_canvas::level_color;
use crate::ui::widgets::tables::scroll_offset;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

pub fn render_ranking(app: &App, f: &mut Frame<'_>) {
    let area = f.area();

    if app.ranking.is_empty() {
        let paragraph = Paragraph::new("No occurrence has been evaluated yet.")
            .block(
                Block::default()
                    .title("Most evaluated occurrences")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(2)])
        .split(area);

    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("Title"),
        Cell::from("Level"),
        Cell::from("Evaluations"),
        Cell::from("Average"),
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let total_rows = app.ranking.len();
    let max_visible_rows = chunks[0].height.saturating_sub(3) as usize;
    let offset = scroll_offset(total_rows, max_visible_rows, app.selected_occurrence_index);

    let rows = app
        .ranking
        .iter()
        .skip(offset)
        .take(max_visible_rows)
        .enumerate()
        .map(|(i, entry)| {
            let rank = i + offset;
            let is_selected = rank == app.selected_occurrence_index;
            let style = if is_selected {
                Style::default()
                    .bg(Color::Rgb(0, 0, 238))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(level_color(entry.level))
            };

            Row::new(vec![
                Cell::from((rank + 1).to_string()),
                Cell::from(entry.title.clone()),
                Cell::from(entry.level.label()),
                Cell::from(entry.evaluation_count.to_string()),
                Cell::from(format!("{:.1}", entry.average_rating)),
            ])
            .style(style)
        });

    let widths = [
        Constraint::Length(4),
        Constraint::Min(24),
        Constraint::Length(22),
        Constraint::Length(12),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title("Most evaluated occurrences")
                .borders(Borders::ALL),
        )
        .column_spacing(1);
    f.render_widget(table, chunks[0]);

    let help = Paragraph::new("↑/↓ navigate   Enter show on map   Esc back   q quit")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(help, chunks[1]);
}
