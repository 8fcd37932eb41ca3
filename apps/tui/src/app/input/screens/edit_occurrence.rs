use crate::app::state::{App, AppScreen, EditField, EditOccurrenceState};
use crossterm::event::KeyCode;

pub async fn handle_edit_occurrence_input(app: &mut App, key: KeyCode) -> color_eyre::Result<()> {
    match key {
        KeyCode::Esc => {
            if let Some(edit_state) = &mut app.edit_state {
                if edit_state.editing {
                    edit_state.editing = false;
                    return Ok(());
                }
            }
            leave_editor(app);
        }
        KeyCode::Char('s' | 'S') if !is_editing(app) => {
            save_occurrence(app).await?;
        }
        KeyCode::Up => {
            if let Some(edit_state) = &mut app.edit_state {
                if !edit_state.editing {
                    edit_state.prev_field();
                }
            }
        }
        KeyCode::Down => {
            if let Some(edit_state) = &mut app.edit_state {
                if !edit_state.editing {
                    edit_state.next_field();
                }
            }
        }
        KeyCode::Enter => {
            if let Some(edit_state) = &mut app.edit_state {
                edit_state.editing = !edit_state.editing;
            }
        }
        _ => {
            if let Some(edit_state) = &mut app.edit_state {
                if edit_state.editing {
                    handle_field_input(edit_state, key);
                }
            }
        }
    }

    Ok(())
}

fn is_editing(app: &App) -> bool {
    app.edit_state.as_ref().is_some_and(|s| s.editing)
}

fn leave_editor(app: &mut App) {
    let was_existing = app
        .edit_state
        .as_ref()
        .is_some_and(|state| state.id.is_some());
    app.edit_state = None;
    app.screen = if was_existing {
        AppScreen::Occurrences
    } else {
        AppScreen::Map
    };
}

fn handle_field_input(edit_state: &mut EditOccurrenceState, key: KeyCode) {
    match edit_state.field {
        EditField::Title | EditField::Description | EditField::OtherText | EditField::PhotoUrl => {
            let field_value = match edit_state.field {
                EditField::Title => &mut edit_state.title,
                EditField::Description => &mut edit_state.description,
                EditField::OtherText => &mut edit_state.other_text,
                _ => &mut edit_state.photo_url,
            };
            match key {
                KeyCode::Char(ch) => field_value.push(ch),
                KeyCode::Backspace => {
                    field_value.pop();
                }
                _ => {}
            }
        }
        EditField::Level => match key {
            KeyCode::Left => edit_state.prev_level(),
            KeyCode::Right => edit_state.next_level(),
            _ => {}
        },
        EditField::Category => match key {
            KeyCode::Left => edit_state.prev_category(),
            KeyCode::Right => edit_state.next_category(),
            _ => {}
        },
        EditField::Problem => match key {
            KeyCode::Left => edit_state.prev_problem(),
            KeyCode::Right => edit_state.next_problem(),
            _ => {}
        },
        EditField::Disabilities => match key {
            KeyCode::Left => edit_state.prev_disability(),
            KeyCode::Right => edit_state.next_disability(),
            KeyCode::Char(' ') => edit_state.toggle_disability(),
            _ => {}
        },
    }
}

async fn save_occurrence(app: &mut App) -> color_eyre::Result<()> {
    let Some(edit_state) = &app.edit_state else {
        return Ok(());
    };

    if let Some(error) = edit_state.validation_error() {
        app.status_message = error.to_string();
        return Ok(());
    }

    let created_by = app.current_user.as_ref().map(|u| u.id.clone());
    let Some(params) = edit_state.to_params(created_by.as_deref()) else {
        return Ok(());
    };

    app.actions.save_occurrence(&params).await?;
    app.fetch_occurrences().await?;
    app.status_message = "Occurrence saved".to_string();
    leave_editor(app);

    Ok(())
}
