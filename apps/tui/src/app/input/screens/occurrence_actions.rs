use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::{App, AppScreen, EditOccurrenceState};
use crate::geo::LatLng;
use crossterm::event::KeyCode;

pub const ACTIONS: [&str; 5] = ["View details", "Show on map", "Edit", "Delete", "Back"];

pub async fn handle_occurrence_actions_input(
    app: &mut App,
    key: KeyCode,
) -> color_eyre::Result<()> {
    match key {
        KeyCode::Esc => {
            app.screen = AppScreen::Occurrences;
        }
        KeyCode::Up => {
            app.occurrence_action_index = wrap_decrement(app.occurrence_action_index, ACTIONS.len());
        }
        KeyCode::Down => {
            app.occurrence_action_index = wrap_increment(app.occurrence_action_index, ACTIONS.len());
        }
        KeyCode::Enter => run_selected_action(app).await?,
        _ => {}
    }

    Ok(())
}

async fn run_selected_action(app: &mut App) -> color_eyre::Result<()> {
    let Some(occurrence) = app.selected_occurrence().cloned() else {
        app.screen = AppScreen::Occurrences;
        return Ok(());
    };

    match app.occurrence_action_index {
        0 => {
            app.detail_evaluations = app.actions.fetch_evaluations(&occurrence.id).await?;
            app.rating_input = 3;
            app.comment_input.clear();
            app.comment_editing = false;
            app.screen = AppScreen::OccurrenceDetails;
        }
        1 => {
            app.map
                .center_on(LatLng::new(occurrence.latitude, occurrence.longitude));
            app.screen = AppScreen::Map;
        }
        2 => {
            app.edit_state = Some(EditOccurrenceState::from_record(&occurrence));
            app.screen = AppScreen::EditOccurrence;
        }
        3 => {
            app.actions.delete_occurrence(&occurrence.id).await?;
            app.fetch_occurrences().await?;
            app.status_message = "Occurrence deleted".to_string();
            app.screen = AppScreen::Occurrences;
        }
        _ => {
            app.screen = AppScreen::Occurrences;
        }
    }

    Ok(())
}
