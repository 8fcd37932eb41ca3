use crate::app::state::{EditField, EditOccurrenceState};
use crate::app::App;
use crate::domain::DisabilityType;
use crate::ui::widgets::popup::centered_rect;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render_edit_occurrence(app: &App, f: &mut Frame<'_>) {
    let area = f.area();
    let Some(edit_state) = &app.edit_state else {
        return;
    };

    let form_area = centered_rect(70, 80, area);
    let title = if edit_state.id.is_some() {
        "Edit occurrence"
    } else {
        "Report occurrence"
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    f.render_widget(block, form_area);

    let form_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Position
            Constraint::Length(1), // Title
            Constraint::Length(1), // Description
            Constraint::Length(1), // Level
            Constraint::Length(1), // Disabilities
            Constraint::Length(1), // Category
            Constraint::Length(1), // Problem
            Constraint::Length(1), // Other text
            Constraint::Length(1), // Photo URL
            Constraint::Length(1), // Validation
            Constraint::Length(1), // Help
        ])
        .split(form_area);

    let position = Paragraph::new(format!(
        "  Location: {:.6}, {:.6}",
        edit_state.position.lat, edit_state.position.lng
    ))
    .style(Style::default().fg(Color::Gray));
    f.render_widget(position, form_chunks[0]);

    let field_style = |field: EditField| field_style(edit_state, field);
    let field_label = |field: EditField| field_label(edit_state, field);

    f.render_widget(
        Paragraph::new(TextLine::from(vec![
            field_label(EditField::Title),
            Span::styled(edit_state.title.clone(), field_style(EditField::Title)),
        ])),
        form_chunks[1],
    );
    f.render_widget(
        Paragraph::new(TextLine::from(vec![
            field_label(EditField::Description),
            Span::styled(
                edit_state.description.clone(),
                field_style(EditField::Description),
            ),
        ])),
        form_chunks[2],
    );
    f.render_widget(
        Paragraph::new(TextLine::from(vec![
            field_label(EditField::Level),
            cycle_span(
                edit_state.level().label(),
                field_style(EditField::Level),
            ),
        ])),
        form_chunks[3],
    );
    f.render_widget(
        Paragraph::new(disabilities_line(edit_state, field_label(EditField::Disabilities))),
        form_chunks[4],
    );
    f.render_widget(
        Paragraph::new(TextLine::from(vec![
            field_label(EditField::Category),
            cycle_span(
                edit_state.category().label(),
                field_style(EditField::Category),
            ),
        ])),
        form_chunks[5],
    );
    f.render_widget(
        Paragraph::new(TextLine::from(vec![
            field_label(EditField::Problem),
            cycle_span(
                edit_state.problem().label(),
                field_style(EditField::Problem),
            ),
        ])),
        form_chunks[6],
    );
    f.render_widget(
        Paragraph::new(TextLine::from(vec![
            field_label(EditField::OtherText),
            Span::styled(
                edit_state.other_text.clone(),
                field_style(EditField::OtherText),
            ),
        ])),
        form_chunks[7],
    );
    f.render_widget(
        Paragraph::new(TextLine::from(vec![
            field_label(EditField::PhotoUrl),
            Span::styled(
                edit_state.photo_url.clone(),
                field_style(EditField::PhotoUrl),
            ),
        ])),
        form_chunks[8],
    );

    if let Some(error) = edit_state.validation_error() {
        f.render_widget(
            Paragraph::new(error).style(Style::default().fg(Color::Red)),
            form_chunks[9],
        );
    }

    let status_text = if edit_state.editing {
        match edit_state.field {
            EditField::Level | EditField::Category | EditField::Problem => {
                "Editing: ←/→ cycle options, Enter confirm, Esc cancel"
            }
            EditField::Disabilities => {
                "Editing: ←/→ move, Space toggle, Enter confirm, Esc cancel"
            }
            _ => "Editing: type to edit, Enter confirm, Esc cancel",
        }
    } else {
        "Navigate: ↑/↓ select, Enter edit, s save, Esc discard"
    };
    f.render_widget(
        Paragraph::new(status_text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray)),
        form_chunks[10],
    );
}

fn field_style(edit_state: &EditOccurrenceState, field: EditField) -> Style {
    let is_selected = edit_state.field == field;
    let is_editing = is_selected && edit_state.editing;

    if is_editing {
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
    }
}

fn field_label(edit_state: &EditOccurrenceState, field: EditField) -> Span<'static> {
    let style = field_style(edit_state, field);
    let prefix = if edit_state.field == field && edit_state.editing {
        "► "
    } else if edit_state.field == field {
        "> "
    } else {
        "  "
    };

    Span::styled(format!("{prefix}{}: ", field.label()), style)
}

fn cycle_span(value: &str, style: Style) -> Span<'_> {
    Span::styled(format!("◄ {value} ►"), style)
}

/// Checkbox row over all disability types, e.g. `[x] Motor [ ] Visual ...`,
/// with the cursor position underlined.
fn disabilities_line<'a>(
    edit_state: &EditOccurrenceState,
    label: Span<'a>,
) -> TextLine<'a> {
    let mut spans = vec![label];
    let base = field_style(edit_state, EditField::Disabilities);

    for (i, disability) in DisabilityType::ALL.iter().enumerate() {
        let mark = if edit_state.disability_selected[i] {
            "[x]"
        } else {
            "[ ]"
        };
        let style = if i == edit_state.disability_cursor && edit_state.editing {
            base.add_modifier(Modifier::UNDERLINED)
        } else {
            base
        };
        spans.push(Span::styled(
            format!("{mark} {} ", disability.label()),
            style,
        ));
    }

    TextLine::from(spans)
}
