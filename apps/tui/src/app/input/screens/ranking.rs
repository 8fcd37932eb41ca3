use crate::app::state::{App, AppScreen};
use crate::geo::LatLng;
use crossterm::event::KeyCode;

pub fn handle_ranking_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc => {
            app.screen = AppScreen::Map;
        }
        KeyCode::Char('q') => {
            app.running = false;
        }
        KeyCode::Up => {
            if app.selected_occurrence_index > 0 {
                app.selected_occurrence_index -= 1;
            }
        }
        KeyCode::Down => {
            if !app.ranking.is_empty() && app.selected_occurrence_index + 1 < app.ranking.len() {
                app.selected_occurrence_index += 1;
            }
        }
        KeyCode::Enter => {
            // Jump to the ranked occurrence on the map
            if let Some(entry) = app.ranking.get(app.selected_occurrence_index) {
                let id = entry.occurrence_id.clone();
                if let Some(occurrence) = app.occurrences.iter().find(|o| o.id == id) {
                    app.map
                        .center_on(LatLng::new(occurrence.latitude, occurrence.longitude));
                    app.screen = AppScreen::Map;
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{OccurrenceRecord, RankingEntry};
    use crate::domain::{AccessibilityLevel, LocationCategory, ProblemType};

    fn ranked_app() -> App {
        let mut app = App::new();
        app.screen = AppScreen::Ranking;
        app.occurrences = vec![OccurrenceRecord {
            id: "abc".to_string(),
            title: "Calçada quebrada".to_string(),
            description: None,
            latitude: -23.55,
            longitude: -46.63,
            level: AccessibilityLevel::Inaccessible,
            disability_types: "motor".to_string(),
            category: LocationCategory::Sidewalks,
            problem_type: ProblemType::BrokenSidewalk,
            problem_other_text: None,
            photo_url: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            created_by: None,
        }];
        app.ranking = vec![RankingEntry {
            occurrence_id: "abc".to_string(),
            title: "Calçada quebrada".to_string(),
            level: AccessibilityLevel::Inaccessible,
            evaluation_count: 4,
            average_rating: 2.5,
        }];
        app
    }

    #[test]
    fn enter_centers_the_map_on_the_ranked_occurrence() {
        let mut app = ranked_app();

        handle_ranking_input(&mut app, KeyCode::Enter);

        assert_eq!(app.screen, AppScreen::Map);
        assert_eq!(app.map.center, LatLng::new(-23.55, -46.63));
        assert_eq!(app.map.cursor, LatLng::new(-23.55, -46.63));
    }
}
