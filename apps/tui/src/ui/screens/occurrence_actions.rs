use crate::app::App;
use crate::ui::widgets::popup::{centered_rect, ClearWidget};
use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::input::screens::occurrence_actions::ACTIONS;

pub fn render_occurrence_actions(app: &App, f: &mut Frame<'_>) {
    // Keep the table visible underneath the popup
    super::occurrences::render_occurrences_view(app, f);

    let area = f.area();
    let popup_area = centered_rect(30, 40, area);
    f.render_widget(ClearWidget, popup_area);

    let title = app
        .selected_occurrence()
        .map_or_else(|| "Occurrence".to_string(), |o| o.title.clone());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    f.render_widget(block, popup_area);

    let inner = popup_area.inner(ratatui::layout::Margin {
        horizontal: 2,
        vertical: 1,
    });

    let lines: Vec<TextLine<'_>> = ACTIONS
        .iter()
        .enumerate()
        .map(|(i, action)| {
            let is_selected = i == app.occurrence_action_index;
            let style = if is_selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let prefix = if is_selected { "> " } else { "  " };
            TextLine::from(Span::styled(format!("{prefix}{action}"), style))
        })
        .collect();

    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Left),
        inner,
    );
}
