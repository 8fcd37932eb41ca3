use crate::app::actions::AuthOutcome;
use crate::app::state::{App, AppScreen, AuthField, AuthFormState};
use crossterm::event::KeyCode;

pub async fn handle_login_input(app: &mut App, key: KeyCode) -> color_eyre::Result<()> {
    match key {
        KeyCode::Esc => {
            app.running = false;
        }
        KeyCode::Tab => {
            app.auth = AuthFormState::new();
            app.auth.field = AuthField::Name;
            app.screen = AppScreen::Signup;
        }
        KeyCode::Up | KeyCode::Down => {
            // Only two fields, so either direction flips between them
            app.auth.field = match app.auth.field {
                AuthField::Password => AuthField::Username,
                _ => AuthField::Password,
            };
        }
        KeyCode::Enter => {
            let outcome = app
                .actions
                .login(&app.auth.username, &app.auth.password)
                .await?;
            match outcome {
                AuthOutcome::Success(user) => {
                    app.status_message = format!("Welcome back, {}", user.name);
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
