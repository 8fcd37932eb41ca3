use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

mod edit_occurrence;
mod login;
mod map;
pub mod occurrence_actions;
mod occurrence_details;
mod occurrences;
mod ranking;
mod route_planner;
mod signup;

pub async fn dispatch_input(app: &mut App, key: KeyCode) -> color_eyre::Result<()> {
    if app.show_help {
        app.show_help = false;
        return Ok(());
    }

    // '?' opens help everywhere except while typing into a field
    if key == KeyCode::Char('?') && !typing(app) {
        app.show_help = true;
        return Ok(());
    }

    match app.screen {
        AppScreen::Login => login::handle_login_input(app, key).await?,
        AppScreen::Signup => signup::handle_signup_input(app, key).await?,
        AppScreen::Map => map::handle_map_input(app, key).await?,
        AppScreen::Occurrences => occurrences::handle_occurrences_input(app, key),
        AppScreen::OccurrenceActions => {
            occurrence_actions::handle_occurrence_actions_input(app, key).await?;
        }
        AppScreen::OccurrenceDetails => {
            occurrence_details::handle_occurrence_details_input(app, key).await?;
        }
        AppScreen::EditOccurrence => {
            edit_occurrence::handle_edit_occurrence_input(app, key).await?;
        }
        AppScreen::RoutePlanner => route_planner::handle_route_planner_input(app, key),
        AppScreen::Ranking => ranking::handle_ranking_input(app, key),
    }

    Ok(())
}

/// Whether the current screen routes plain characters into a text field.
fn typing(app: &App) -> bool {
    match app.screen {
        AppScreen::Login | AppScreen::Signup => true,
        AppScreen::Occurrences => app.search_active,
        AppScreen::EditOccurrence => app.edit_state.as_ref().is_some_and(|s| s.editing),
        AppScreen::RoutePlanner => app.planner.editing,
        AppScreen::OccurrenceDetails => app.comment_editing,
        _ => false,
    }
}
