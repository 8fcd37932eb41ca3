use crate::app::state::{App, AppScreen, EditOccurrenceState, PlannerField, SelectionMode};
use crossterm::event::KeyCode;

pub async fn handle_map_input(app: &mut App, key: KeyCode) -> color_eyre::Result<()> {
    match key {
        KeyCode::Char('q') => {
            app.running = false;
        }
        KeyCode::Esc => {
            app.selection_mode = SelectionMode::None;
            app.status_message.clear();
        }
        KeyCode::Up => app.map.move_cursor(1.0, 0.0),
        KeyCode::Down => app.map.move_cursor(-1.0, 0.0),
        KeyCode::Left => app.map.move_cursor(0.0, -1.0),
        KeyCode::Right => app.map.move_cursor(0.0, 1.0),
        KeyCode::Char('+' | '=') => app.map.zoom_in(),
        KeyCode::Char('-') => app.map.zoom_out(),
        KeyCode::Char('c') => app.map.center_on(app.map.cursor),
        KeyCode::Char('f') => {
            app.cycle_disability_filter();
        }
        KeyCode::Char('n') => {
            app.selection_mode = SelectionMode::OccurrenceSpot;
            app.status_message =
                "Move the cursor to the spot and press Enter to report".to_string();
        }
        KeyCode::Char('o') => {
            app.update_search();
            app.screen = AppScreen::Occurrences;
        }
        KeyCode::Char('r') => {
            app.screen = AppScreen::RoutePlanner;
        }
        KeyCode::Char('g') => {
            app.ranking = app.actions.ranking(crate::app::state::RANKING_LIMIT).await?;
            app.selected_occurrence_index = 0;
            app.screen = AppScreen::Ranking;
        }
        KeyCode::Char('x') => {
            app.actions.logout().await?;
            app.current_user = None;
            app.screen = AppScreen::Login;
            app.status_message.clear();
        }
        KeyCode::Enter => handle_cursor_selection(app),
        _ => {}
    }

    Ok(())
}

/// Resolves an Enter press according to the active selection mode.
fn handle_cursor_selection(app: &mut App) {
    let cursor = app.map.cursor;
    match app.selection_mode {
        SelectionMode::None => {}
        SelectionMode::OccurrenceSpot => {
            app.edit_state = Some(EditOccurrenceState::new_at(cursor));
            app.selection_mode = SelectionMode::None;
            app.status_message.clear();
            app.screen = AppScreen::EditOccurrence;
        }
        SelectionMode::Origin => {
            app.planner.origin = Some(cursor);
            app.planner.origin_input = format!("{:.6},{:.6}", cursor.lat, cursor.lng);
            app.planner.field = PlannerField::Destination;
            // Stay on the map so origin and destination are one two-tap flow
            app.selection_mode = SelectionMode::Destination;
            app.status_message =
                "Origin set, move the cursor to the destination and press Enter".to_string();
        }
        SelectionMode::Destination => {
            app.planner.destination = Some(cursor);
            app.planner.destination_input = format!("{:.6},{:.6}", cursor.lat, cursor.lng);
            app.selection_mode = SelectionMode::None;
            app.status_message.clear();
            app.screen = AppScreen::RoutePlanner;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::LatLng;

    #[test]
    fn origin_tap_chains_into_destination_selection() {
        let mut app = App::new();
        app.screen = AppScreen::Map;
        app.selection_mode = SelectionMode::Origin;
        app.map.cursor = LatLng::new(-23.55, -46.63);

        handle_cursor_selection(&mut app);

        assert_eq!(app.planner.origin, Some(LatLng::new(-23.55, -46.63)));
        assert_eq!(app.planner.field, PlannerField::Destination);
        // Still on the map, now picking the destination
        assert_eq!(app.selection_mode, SelectionMode::Destination);
        assert_eq!(app.screen, AppScreen::Map);

        app.map.cursor = LatLng::new(-23.56, -46.65);
        handle_cursor_selection(&mut app);

        assert_eq!(app.planner.destination, Some(LatLng::new(-23.56, -46.65)));
        assert_eq!(app.selection_mode, SelectionMode::None);
        assert_eq!(app.screen, AppScreen::RoutePlanner);
    }
}
