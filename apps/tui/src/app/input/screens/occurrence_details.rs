use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

pub async fn handle_occurrence_details_input(
    app: &mut App,
    key: KeyCode,
) -> color_eyre::Result<()> {
    if app.comment_editing {
        match key {
            KeyCode::Esc | KeyCode::Enter => {
                app.comment_editing = false;
            }
            KeyCode::Backspace => {
                app.comment_input.pop();
            }
            KeyCode::Char(ch) => {
                app.comment_input.push(ch);
            }
            _ => {}
        }
        return Ok(());
    }

    match key {
        KeyCode::Esc => {
            app.screen = AppScreen::Occurrences;
        }
        KeyCode::Left => {
            app.rating_input = (app.rating_input - 1).max(1);
        }
        KeyCode::Right => {
            app.rating_input = (app.rating_input + 1).min(5);
        }
        KeyCode::Char('c') => {
            app.comment_editing = true;
        }
        KeyCode::Enter => submit_evaluation(app).await?,
        _ => {}
    }

    Ok(())
}

async fn submit_evaluation(app: &mut App) -> color_eyre::Result<()> {
    let Some(occurrence) = app.selected_occurrence() else {
        return Ok(());
    };
    let occurrence_id = occurrence.id.clone();

    let Some(user) = &app.current_user else {
        app.status_message = "Sign in to evaluate".to_string();
        return Ok(());
    };

    let comment = {
        let trimmed = app.comment_input.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    };
    app.actions
        .add_evaluation(&occurrence_id, &user.id, app.rating_input, comment)
        .await?;

    app.detail_evaluations = app.actions.fetch_evaluations(&occurrence_id).await?;
    app.comment_input.clear();
    app.status_message = "Evaluation recorded".to_string();

    Ok(())
}
