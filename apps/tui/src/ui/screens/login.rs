use crate::app::state::AuthField;
use crate::app::App;
use crate::ui::widgets::popup::centered_rect;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render_login(app: &App, f: &mut Frame<'_>) {
    let area = f.area();
    let form_area = centered_rect(50, 40, area);

    let block = Block::default()
        .title("Sign in")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    f.render_widget(block, form_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Username
            Constraint::Length(1), // Password
            Constraint::Length(1), // Error
            Constraint::Length(1), // Help
        ])
        .split(form_area);

    f.render_widget(
        Paragraph::new(auth_field_line(
            app,
            "Username",
            &app.auth.username,
            AuthField::Username,
            false,
        )),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(auth_field_line(
            app,
            "Password",
            &app.auth.password,
            AuthField::Password,
            true,
        )),
        chunks[1],
    );

    if !app.auth.error.is_empty() {
        f.render_widget(
            Paragraph::new(app.auth.error.as_str()).style(Style::default().fg(Color::Red)),
            chunks[2],
        );
    }

    let help = Paragraph::new("↑/↓ field   Enter sign in   Tab sign up   Esc quit")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    f.render_widget(help, chunks[3]);
}

/// One "Label: value" line, highlighting the active field. Passwords are
/// masked.
pub fn auth_field_line<'a>(
    app: &'a App,
    label: &str,
    value: &str,
    field: AuthField,
    mask: bool,
) -> TextLine<'a> {
    let is_selected = app.auth.field == field;
    let style = if is_selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let prefix = if is_selected { "> " } else { "  " };
    let shown = if mask {
        "*".repeat(value.chars().count())
    } else {
        value.to_string()
    };

    TextLine::from(vec![
        Span::styled(format!("{prefix}{label}: "), style),
        Span::styled(shown, style),
    ])
}
