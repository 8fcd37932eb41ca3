use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

pub fn handle_occurrences_input(app: &mut App, key: KeyCode) {
    if app.search_active {
        handle_search_input(app, key);
        return;
    }

    let total_rows = app.filtered_occurrence_indices.len();

    match key {
        KeyCode::Esc => {
            if app.search_input.is_empty() {
                app.screen = AppScreen::Map;
            } else {
                app.clear_search();
            }
        }
        KeyCode::Char('q') => {
            app.running = false;
        }
        KeyCode::Char('/') => {
            app.search_active = true;
        }
        KeyCode::Char('f') => {
            app.cycle_disability_filter();
        }
        KeyCode::Enter => {
            if total_rows > 0 {
                app.occurrence_action_index = 0;
                app.screen = AppScreen::OccurrenceActions;
            }
        }
        KeyCode::Up => {
            if app.selected_occurrence_index > 0 {
                app.selected_occurrence_index -= 1;
            }
        }
        KeyCode::Down => {
            if total_rows > 0 && app.selected_occurrence_index + 1 < total_rows {
                app.selected_occurrence_index += 1;
            }
        }
        KeyCode::PageUp => {
            app.selected_occurrence_index = app.selected_occurrence_index.saturating_sub(5);
        }
        KeyCode::PageDown => {
            if total_rows > 0 {
                let new_index = app.selected_occurrence_index + 5;
                app.selected_occurrence_index = if new_index >= total_rows {
                    total_rows - 1
                } else {
                    new_index
                };
            }
        }
        KeyCode::Home => {
            app.selected_occurrence_index = 0;
        }
        KeyCode::End => {
            if total_rows > 0 {
                app.selected_occurrence_index = total_rows - 1;
            }
        }
        _ => {}
    }
}

fn handle_search_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc => {
            app.clear_search();
        }
        KeyCode::Enter => {
            // Keep the filter, leave search entry
            app.search_active = false;
        }
        KeyCode::Backspace => {
            app.search_input.pop();
            app.update_search();
        }
        KeyCode::Char(ch) => {
            app.search_input.push(ch);
            app.update_search();
        }
        _ => {}
    }
}
