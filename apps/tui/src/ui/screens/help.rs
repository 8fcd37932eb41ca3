use crate::app::App;
use crate::cli::CliArgs;
use crate::ui::widgets::popup::{centered_rect, ClearWidget};
use ratatui::style::{Color, Style};
use ratatui::text::Line as TextLine;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render_help_overlay(_app: &App, f: &mut Frame<'_>) {
    let area = f.area();
    let popup_area = centered_rect(60, 70, area);
    f.render_widget(ClearWidget, popup_area);

    let mut lines = vec![
        TextLine::from("Map"),
        TextLine::from("  ↑↓←→ move cursor, +/- zoom, c recenter"),
        TextLine::from("  n report an occurrence at the cursor"),
        TextLine::from("  o occurrence list, r route planner, g ranking"),
        TextLine::from("  f cycle the disability filter"),
        TextLine::from(""),
        TextLine::from("Occurrences"),
        TextLine::from("  / fuzzy search, Enter actions, f filter"),
        TextLine::from(""),
        TextLine::from("Route planner"),
        TextLine::from("  e edit a field, m pick the point on the map"),
        TextLine::from("  a also avoid partially accessible spots"),
        TextLine::from("  Enter plan the route"),
        TextLine::from(""),
        TextLine::from("Anywhere: ? this help, q quit, x logout (map)"),
        TextLine::from(""),
        TextLine::from("Command line"),
    ];
    lines.extend(
        CliArgs::help_text()
            .lines()
            .map(|line| TextLine::from(format!("  {line}"))),
    );
    lines.push(TextLine::from(""));
    lines.push(TextLine::from("Press any key to close"));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(paragraph, popup_area);
}
