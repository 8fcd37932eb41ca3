use crate::app::App;
use crate::ui::widgets::map_canvas::level_color;
use crate::ui::widgets::tables::scroll_offset;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

pub fn render_occurrences_view(app: &App, f: &mut Frame<'_>) {
    let area = f.area();

    if app.occurrences.is_empty() {
        let block = Block::default()
            .title("Occurrences")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));
        let paragraph = Paragraph::new("No occurrences reported yet.")
            .block(block)
            .alignment(ratatui::layout::Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Search / filter line
            Constraint::Min(5),    // Table
            Constraint::Length(3), // Help
        ])
        .split(area);

    render_search_line(app, f, chunks[0]);

    let header = Row::new(vec![
        Cell::from("Title"),
        Cell::from("Level"),
        Cell::from("Category"),
        Cell::from("Problem"),
        Cell::from("Affects"),
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let total_rows = app.filtered_occurrence_indices.len();
    let max_visible_rows = chunks[1].height.saturating_sub(4) as usize;
    let offset = scroll_offset(total_rows, max_visible_rows, app.selected_occurrence_index);

    let rows = app
        .filtered_occurrence_indices
        .iter()
        .skip(offset)
        .take(max_visible_rows)
        .enumerate()
        .map(|(i, index)| {
            let occurrence = &app.occurrences[*index];
            let is_selected = i + offset == app.selected_occurrence_index;
            let style = if is_selected {
                Style::default()
                    .bg(Color::Rgb(0, 0, 238))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(level_color(occurrence.level))
            };

            let affects = occurrence
                .disability_types()
                .iter()
                .map(|d| d.label())
                .collect::<Vec<_>>()
                .join(", ");

            Row::new(vec![
                Cell::from(occurrence.title.clone()),
                Cell::from(occurrence.level.label()),
                Cell::from(occurrence.category.label()),
                Cell::from(occurrence.problem_label()),
                Cell::from(affects),
            ])
            .style(style)
        });

    let widths = [
        Constraint::Min(24),
        Constraint::Length(22),
        Constraint::Length(16),
        Constraint::Length(24),
        Constraint::Length(24),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(
                    "Occurrences ({} of {total_rows})",
                    if total_rows == 0 {
                        0
                    } else {
                        app.selected_occurrence_index + 1
                    }
                ))
                .borders(Borders::ALL),
        )
        .column_spacing(1);

    f.render_widget(table, chunks[1]);

    let help_text = vec![
        key("↑/↓"),
        Span::raw(": Navigate   "),
        key("/"),
        Span::raw(": Search   "),
        key("f"),
        Span::raw(": Filter   "),
        key("Enter"),
        Span::raw(": Actions   "),
        key("Esc"),
        Span::raw(": Map   "),
        key("q"),
        Span::raw(": Quit"),
    ];
    let help_paragraph = Paragraph::new(TextLine::from(help_text))
        .block(Block::default().borders(Borders::TOP))
        .alignment(ratatui::layout::Alignment::Center);
    f.render_widget(help_paragraph, chunks[2]);
}

fn render_search_line(app: &App, f: &mut Frame<'_>, area: ratatui::layout::Rect) {
    let filter = app
        .filter_disability
        .map_or("all", |d| d.label());
    let search = if app.search_active {
        format!("/{}_", app.search_input)
    } else if app.search_input.is_empty() {
        String::new()
    } else {
        format!("/{}", app.search_input)
    };

    let line = TextLine::from(vec![
        Span::styled("Filter: ", Style::default().fg(Color::Gray)),
        Span::styled(filter, Style::default().fg(Color::Yellow)),
        Span::raw("   "),
        Span::styled(search, Style::default().fg(Color::Cyan)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn key(text: &str) -> Span<'_> {
    Span::styled(
        text,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
}
