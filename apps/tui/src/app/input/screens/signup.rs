use crate::app::actions::AuthOutcome;
use crate::app::state::{App, AppScreen, AuthFormState};
use crossterm::event::KeyCode;

pub async fn handle_signup_input(app: &mut App, key: KeyCode) -> color_eyre::Result<()> {
    match key {
        KeyCode::Esc | KeyCode::Tab => {
            app.auth = AuthFormState::new();
            app.screen = AppScreen::Login;
        }
        KeyCode::Down => {
            app.auth.next_field();
        }
        KeyCode::Up => {
            app.auth.prev_field();
        }
        KeyCode::Enter => {
            let outcome = app
                .actions
                .signup(
                    &app.auth.name,
                    &app.auth.username,
                    &app.auth.password,
                    &app.auth.confirm,
                )
                .await?;
            match outcome {
                AuthOutcome::Success(user) => {
                    app.status_message = format!("Welcome, {}", user.name);
                    app.current_user = Some(user);
                    app.auth = AuthFormState::new();
                    app.screen = AppScreen::Map;
                }
                AuthOutcome::Failure(message) => {
                    app.auth.error = message.to_string();
                }
            }
        }
        KeyCode::Backspace => {
            app.auth.active_input().pop();
        }
        KeyCode::Char(ch) => {
            app.auth.active_input().push(ch);
            app.auth.error.clear();
        }
        _ => {}
    }

    Ok(())
}
