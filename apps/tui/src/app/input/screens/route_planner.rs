use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::{App, AppScreen, PlannerField, SelectionMode};
use crossterm::event::KeyCode;

pub fn handle_route_planner_input(app: &mut App, key: KeyCode) {
    if app.planner.editing {
        handle_field_entry(app, key);
        return;
    }

    match key {
        KeyCode::Esc => {
            app.screen = AppScreen::Map;
        }
        KeyCode::Char('q') => {
            app.running = false;
        }
        KeyCode::Up | KeyCode::Down | KeyCode::Tab => {
            app.planner.field = match app.planner.field {
                PlannerField::Origin => PlannerField::Destination,
                PlannerField::Destination => PlannerField::Origin,
            };
            app.planner.clear_suggestions();
        }
        KeyCode::Char('e') => {
            app.planner.editing = true;
        }
        KeyCode::Char('a') => {
            app.planner.avoid_partial = !app.planner.avoid_partial;
            // An already-planned route is stale once the barrier set changes
            if app.planner.planned.is_some() {
                app.route_requested = true;
            }
        }
        KeyCode::Char('m') => {
            app.selection_mode = match app.planner.field {
                PlannerField::Origin => SelectionMode::Origin,
                PlannerField::Destination => SelectionMode::Destination,
            };
            app.status_message =
                "Move the cursor to the point and press Enter to select".to_string();
            app.screen = AppScreen::Map;
        }
        KeyCode::Char('x') => {
            app.reset_planner();
        }
        KeyCode::Enter => {
            app.route_requested = true;
        }
        _ => {}
    }
}

fn handle_field_entry(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc => {
            app.planner.editing = false;
            app.planner.clear_suggestions();
        }
        KeyCode::Enter => {
            if app.planner.suggestions.is_empty() {
                app.planner.editing = false;
            } else if let Some(point) = app.planner.accept_suggestion() {
                app.map.center_on(point);
                app.planner.editing = false;
            }
        }
        KeyCode::Up => {
            app.planner.suggestion_index =
                wrap_decrement(app.planner.suggestion_index, app.planner.suggestions.len());
        }
        KeyCode::Down => {
            app.planner.suggestion_index =
                wrap_increment(app.planner.suggestion_index, app.planner.suggestions.len());
        }
        KeyCode::Backspace => {
            app.planner.active_input().pop();
            invalidate_resolved(app);
            app.request_suggestions();
        }
        KeyCode::Char(ch) => {
            app.planner.active_input().push(ch);
            invalidate_resolved(app);
            app.request_suggestions();
        }
        _ => {}
    }
}

/// Typing over a field drops its previously resolved coordinate; the text is
/// re-resolved when the route is planned.
fn invalidate_resolved(app: &mut App) {
    match app.planner.field {
        PlannerField::Origin => app.planner.origin = None,
        PlannerField::Destination => app.planner.destination = None,
    }
}
