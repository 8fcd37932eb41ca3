use crate::app::state::AuthField;
use crate::app::App;
use crate::ui::screens::login::auth_field_line;
use crate::ui::widgets::popup::centered_rect;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render_signup(app: &App, f: &mut Frame<'_>) {
    let area = f.area();
    let form_area = centered_rect(50, 50, area);

    let block = Block::default()
        .title("Create account")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    f.render_widget(block, form_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Name
            Constraint::Length(1), // Username
            Constraint::Length(1), // Password
            Constraint::Length(1), // Confirmation
            Constraint::Length(1), // Error
            Constraint::Length(1), // Help
        ])
        .split(form_area);

    f.render_widget(
        Paragraph::new(auth_field_line(
            app,
            "Name",
            &app.auth.name,
            AuthField::Name,
            false,
        )),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(auth_field_line(
            app,
            "Username",
            &app.auth.username,
            AuthField::Username,
            false,
        )),
        chunks[1],
    );
    f.render_widget(
        Paragraph::new(auth_field_line(
            app,
            "Password (6+ chars)",
            &app.auth.password,
            AuthField::Password,
            true,
        )),
        chunks[2],
    );
    f.render_widget(
        Paragraph::new(auth_field_line(
            app,
            "Confirm password",
            &app.auth.confirm,
            AuthField::Confirm,
            true,
        )),
        chunks[3],
    );

    if !app.auth.error.is_empty() {
        f.render_widget(
            Paragraph::new(app.auth.error.as_str()).style(Style::default().fg(Color::Red)),
            chunks[4],
        );
    }

    let help = Paragraph::new("↑/↓ field   Enter create   Tab back to sign in")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    f.render_widget(help, chunks[5]);
}
