// UI module for rota_acessivel-tui
// Handles all UI rendering functions

pub mod screens;
pub mod widgets;

use crate::app::state::AppScreen;
use crate::app::App;
use ratatui::Frame;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    match app.screen {
        AppScreen::Login => screens::login::render_login(app, f),
        AppScreen::Signup => screens::signup::render_signup(app, f),
        AppScreen::Map => screens::map::render_map(app, f),
        AppScreen::Occurrences => screens::occurrences::render_occurrences_view(app, f),
        AppScreen::OccurrenceActions => {
            screens::occurrence_actions::render_occurrence_actions(app, f);
        }
        AppScreen::OccurrenceDetails => {
            screens::occurrence_details::render_occurrence_details(app, f);
        }
        AppScreen::EditOccurrence => screens::edit_occurrence::render_edit_occurrence(app, f),
        AppScreen::RoutePlanner => screens::route_planner::render_route_planner(app, f),
        AppScreen::Ranking => screens::ranking::render_ranking(app, f),
    }

    if app.show_help {
        screens::help::render_help_overlay(app, f);
    }
}
