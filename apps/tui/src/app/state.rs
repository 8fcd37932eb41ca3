use crate::app::actions::AppActions;
use crate::db::models::{
    EvaluationRecord, OccurrenceParams, OccurrenceRecord, RankingEntry,
};
use crate::domain::{
    join_disability_list, AccessibilityLevel, DisabilityType, LocationCategory, ProblemType,
};
use crate::geo::{Barrier, BarrierSeverity, LatLng};
use crate::net::{PlaceSuggestion, Viewbox};
use crate::route::PlannedRoute;
use chrono::Local;
use color_eyre::Result;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// Default viewport: Avenida Paulista, São Paulo, where the seed data lives.
pub const DEFAULT_CENTER: LatLng = LatLng::new(-23.5608, -46.6560);
const DEFAULT_SPAN_LAT: f64 = 0.012;
const DEFAULT_SPAN_LNG: f64 = 0.024;
const MIN_SPAN_LAT: f64 = 0.0008;
const MAX_SPAN_LAT: f64 = 0.5;
const PAN_FRACTION: f64 = 0.1;
const ZOOM_FACTOR: f64 = 1.5;

pub const RANKING_LIMIT: i64 = 20;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AppScreen {
    Login,
    Signup,
    Map,
    Occurrences,
    OccurrenceActions,
    OccurrenceDetails,
    EditOccurrence,
    RoutePlanner,
    Ranking,
}

/// What an Enter press on the map cursor currently means.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SelectionMode {
    None,
    Origin,
    Destination,
    OccurrenceSpot,
}

/// The visible slice of the map plus the movable cursor.
#[derive(Debug, Clone)]
pub struct MapView {
    pub center: LatLng,
    pub span_lat: f64,
    pub span_lng: f64,
    pub cursor: LatLng,
}

impl MapView {
    pub const fn new() -> Self {
        Self {
            center: DEFAULT_CENTER,
            span_lat: DEFAULT_SPAN_LAT,
            span_lng: DEFAULT_SPAN_LNG,
            cursor: DEFAULT_CENTER,
        }
    }

    pub fn pan(&mut self, d_lat: f64, d_lng: f64) {
        self.center.lat += d_lat * self.span_lat * PAN_FRACTION;
        self.center.lng += d_lng * self.span_lng * PAN_FRACTION;
    }

    pub fn move_cursor(&mut self, d_lat: f64, d_lng: f64) {
        self.cursor.lat += d_lat * self.span_lat * PAN_FRACTION;
        self.cursor.lng += d_lng * self.span_lng * PAN_FRACTION;
        self.keep_cursor_visible();
    }

    fn keep_cursor_visible(&mut self) {
        let half_lat = self.span_lat / 2.0;
        let half_lng = self.span_lng / 2.0;
        if (self.cursor.lat - self.center.lat).abs() > half_lat
            || (self.cursor.lng - self.center.lng).abs() > half_lng
        {
            self.center = self.cursor;
        }
    }

    pub fn zoom_in(&mut self) {
        self.span_lat = (self.span_lat / ZOOM_FACTOR).max(MIN_SPAN_LAT);
        self.span_lng = self.span_lat * 2.0;
    }

    pub fn zoom_out(&mut self) {
        self.span_lat = (self.span_lat * ZOOM_FACTOR).min(MAX_SPAN_LAT);
        self.span_lng = self.span_lat * 2.0;
    }

    pub fn center_on(&mut self, point: LatLng) {
        self.center = point;
        self.cursor = point;
    }

    /// Current viewport bounds, used to bias geocoder results.
    pub fn viewbox(&self) -> Viewbox {
        Viewbox {
            left: self.center.lng - self.span_lng / 2.0,
            bottom: self.center.lat - self.span_lat / 2.0,
            right: self.center.lng + self.span_lng / 2.0,
            top: self.center.lat + self.span_lat / 2.0,
        }
    }

    pub fn contains(&self, point: LatLng) -> bool {
        (point.lat - self.center.lat).abs() <= self.span_lat / 2.0
            && (point.lng - self.center.lng).abs() <= self.span_lng / 2.0
    }
}

impl Default for MapView {
    fn default() -> Self {
        Self::new()
    }
}

/// Represents which field is currently being edited in the EditOccurrence
/// screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Title,
    Description,
    Level,
    Disabilities,
    Category,
    Problem,
    OtherText,
    PhotoUrl,
}

impl EditField {
    pub const ORDER: [Self; 8] = [
        Self::Title,
        Self::Description,
        Self::Level,
        Self::Disabilities,
        Self::Category,
        Self::Problem,
        Self::OtherText,
        Self::PhotoUrl,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Description => "Description",
            Self::Level => "Accessibility",
            Self::Disabilities => "Affects",
            Self::Category => "Category",
            Self::Problem => "Problem",
            Self::OtherText => "Problem (other)",
            Self::PhotoUrl => "Photo URL",
        }
    }
}

/// Holds the temporary state of an occurrence being created or edited
#[derive(Debug, Clone)]
pub struct EditOccurrenceState {
    pub id: Option<String>,
    pub field: EditField,
    pub title: String,
    pub description: String,
    pub other_text: String,
    pub photo_url: String,
    pub level_index: usize,
    pub category_index: usize,
    pub problem_index: usize,
    pub disability_cursor: usize,
    pub disability_selected: [bool; 4],
    pub position: LatLng,
    pub created_at: String,
    pub editing: bool, // Whether we're actively editing the current field
}

impl EditOccurrenceState {
    /// Starts a fresh report at the given map position
    pub fn new_at(position: LatLng) -> Self {
        Self {
            id: None,
            field: EditField::Title,
            title: String::new(),
            description: String::new(),
            other_text: String::new(),
            photo_url: String::new(),
            level_index: 0,
            category_index: 0,
            problem_index: 0,
            disability_cursor: 0,
            disability_selected: [false; 4],
            position,
            created_at: Local::now().to_rfc3339(),
            editing: false,
        }
    }

    /// Create an EditOccurrenceState from an existing record
    pub fn from_record(record: &OccurrenceRecord) -> Self {
        let level_index = AccessibilityLevel::ALL
            .iter()
            .position(|l| *l == record.level)
            .unwrap_or(0);
        let category_index = LocationCategory::ALL
            .iter()
            .position(|c| *c == record.category)
            .unwrap_or(0);
        let problem_index = record
            .category
            .problem_options()
            .iter()
            .position(|p| *p == record.problem_type)
            .unwrap_or(0);

        let mut disability_selected = [false; 4];
        for disability in record.disability_types() {
            if let Some(slot) = DisabilityType::ALL.iter().position(|d| *d == disability) {
                disability_selected[slot] = true;
            }
        }

        Self {
            id: Some(record.id.clone()),
            field: EditField::Title,
            title: record.title.clone(),
            description: record.description.clone().unwrap_or_default(),
            other_text: record.problem_other_text.clone().unwrap_or_default(),
            photo_url: record.photo_url.clone().unwrap_or_default(),
            level_index,
            category_index,
            problem_index,
            disability_cursor: 0,
            disability_selected,
            position: LatLng::new(record.latitude, record.longitude),
            created_at: record.created_at.clone(),
            editing: false,
        }
    }

    pub fn level(&self) -> AccessibilityLevel {
        AccessibilityLevel::from_index(self.level_index).unwrap_or(AccessibilityLevel::Accessible)
    }

    pub fn category(&self) -> LocationCategory {
        LocationCategory::from_index(self.category_index).unwrap_or(LocationCategory::Sidewalks)
    }

    pub fn problem(&self) -> ProblemType {
        let options = self.category().problem_options();
        options
            .get(self.problem_index)
            .copied()
            .unwrap_or(ProblemType::Other)
    }

    pub fn next_field(&mut self) {
        let position = EditField::ORDER
            .iter()
            .position(|f| *f == self.field)
            .unwrap_or(0);
        self.field = EditField::ORDER[(position + 1) % EditField::ORDER.len()];
    }

    pub fn prev_field(&mut self) {
        let position = EditField::ORDER
            .iter()
            .position(|f| *f == self.field)
            .unwrap_or(0);
        self.field =
            EditField::ORDER[(position + EditField::ORDER.len() - 1) % EditField::ORDER.len()];
    }

    pub fn next_level(&mut self) {
        self.level_index = (self.level_index + 1) % AccessibilityLevel::ALL.len();
    }

    pub fn prev_level(&mut self) {
        self.level_index =
            (self.level_index + AccessibilityLevel::ALL.len() - 1) % AccessibilityLevel::ALL.len();
    }

    /// Cycling the category keeps the selected problem only when the new
    /// category offers it; otherwise the selection falls back to the first
    /// option. A stored problem type can never be invalid for its category.
    pub fn next_category(&mut self) {
        let problem = self.problem();
        self.category_index = (self.category_index + 1) % LocationCategory::ALL.len();
        self.reselect_problem(problem);
    }

    pub fn prev_category(&mut self) {
        let problem = self.problem();
        self.category_index =
            (self.category_index + LocationCategory::ALL.len() - 1) % LocationCategory::ALL.len();
        self.reselect_problem(problem);
    }

    fn reselect_problem(&mut self, previous: ProblemType) {
        let options = self.category().problem_options();
        self.problem_index = options.iter().position(|p| *p == previous).unwrap_or(0);
    }

    pub fn next_problem(&mut self) {
        let len = self.category().problem_options().len();
        self.problem_index = (self.problem_index + 1) % len;
    }

    pub fn prev_problem(&mut self) {
        let len = self.category().problem_options().len();
        self.problem_index = (self.problem_index + len - 1) % len;
    }

    pub fn next_disability(&mut self) {
        self.disability_cursor = (self.disability_cursor + 1) % DisabilityType::ALL.len();
    }

    pub fn prev_disability(&mut self) {
        self.disability_cursor =
            (self.disability_cursor + DisabilityType::ALL.len() - 1) % DisabilityType::ALL.len();
    }

    pub fn toggle_disability(&mut self) {
        self.disability_selected[self.disability_cursor] =
            !self.disability_selected[self.disability_cursor];
    }

    pub fn selected_disabilities(&self) -> Vec<DisabilityType> {
        DisabilityType::ALL
            .iter()
            .zip(self.disability_selected)
            .filter_map(|(d, selected)| selected.then_some(*d))
            .collect()
    }

    /// Validation error for the current form contents, if any.
    pub fn validation_error(&self) -> Option<&'static str> {
        if self.title.trim().is_empty() {
            return Some("Title is required");
        }
        if self.selected_disabilities().is_empty() {
            return Some("Select at least one disability type");
        }
        if self.problem() == ProblemType::Other && self.other_text.trim().is_empty() {
            return Some("Describe the problem");
        }
        None
    }

    /// Builds the storage params, or `None` when the form is incomplete.
    pub fn to_params(&self, created_by: Option<&str>) -> Option<OccurrenceParams> {
        if self.validation_error().is_some() {
            return None;
        }

        let id = self
            .id
            .clone()
            .unwrap_or_else(|| format!("occ-{}", Local::now().timestamp_millis()));
        let description = non_empty(&self.description);
        let other_text =
            (self.problem() == ProblemType::Other).then(|| self.other_text.trim().to_string());

        Some(OccurrenceParams {
            id,
            title: self.title.trim().to_string(),
            description,
            latitude: self.position.lat,
            longitude: self.position.lng,
            level: self.level(),
            disability_types: join_disability_list(&self.selected_disabilities()),
            category: self.category(),
            problem_type: self.problem(),
            problem_other_text: other_text,
            photo_url: non_empty(&self.photo_url),
            created_at: self.created_at.clone(),
            created_by: created_by.map(str::to_string),
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Fields of the route planner form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerField {
    Origin,
    Destination,
}

#[derive(Debug)]
pub struct RoutePlannerState {
    pub field: PlannerField,
    pub origin_input: String,
    pub destination_input: String,
    pub origin: Option<LatLng>,
    pub destination: Option<LatLng>,
    pub editing: bool,
    pub avoid_partial: bool,
    pub suggestions: Vec<PlaceSuggestion>,
    pub suggestion_index: usize,
    pub planned: Option<PlannedRoute>,
    pub status: String,
}

impl RoutePlannerState {
    pub fn new() -> Self {
        Self {
            field: PlannerField::Origin,
            origin_input: String::new(),
            destination_input: String::new(),
            origin: None,
            destination: None,
            editing: false,
            avoid_partial: false,
            suggestions: Vec::new(),
            suggestion_index: 0,
            planned: None,
            status: String::new(),
        }
    }

    pub fn active_input(&mut self) -> &mut String {
        match self.field {
            PlannerField::Origin => &mut self.origin_input,
            PlannerField::Destination => &mut self.destination_input,
        }
    }

    pub fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        self.suggestion_index = 0;
    }

    /// Fills the active field from the highlighted suggestion.
    pub fn accept_suggestion(&mut self) -> Option<LatLng> {
        let suggestion = self.suggestions.get(self.suggestion_index)?.clone();
        let point = LatLng::new(suggestion.latitude, suggestion.longitude);
        match self.field {
            PlannerField::Origin => {
                self.origin_input = suggestion.label;
                self.origin = Some(point);
            }
            PlannerField::Destination => {
                self.destination_input = suggestion.label;
                self.destination = Some(point);
            }
        }
        self.clear_suggestions();
        Some(point)
    }
}

impl Default for RoutePlannerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Fields of the login/signup forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Name,
    Username,
    Password,
    Confirm,
}

#[derive(Debug, Clone)]
pub struct AuthFormState {
    pub field: AuthField,
    pub name: String,
    pub username: String,
    pub password: String,
    pub confirm: String,
    pub error: String,
}

impl AuthFormState {
    pub const fn new() -> Self {
        Self {
            field: AuthField::Username,
            name: String::new(),
            username: String::new(),
            password: String::new(),
            confirm: String::new(),
            error: String::new(),
        }
    }

    pub fn active_input(&mut self) -> &mut String {
        match self.field {
            AuthField::Name => &mut self.name,
            AuthField::Username => &mut self.username,
            AuthField::Password => &mut self.password,
            AuthField::Confirm => &mut self.confirm,
        }
    }

    /// Cycle through the signup fields (login only flips between username
    /// and password directly).
    pub fn next_field(&mut self) {
        self.field = match self.field {
            AuthField::Name => AuthField::Username,
            AuthField::Username => AuthField::Password,
            AuthField::Password => AuthField::Confirm,
            AuthField::Confirm => AuthField::Name,
        };
    }

    pub fn prev_field(&mut self) {
        self.field = match self.field {
            AuthField::Name => AuthField::Confirm,
            AuthField::Username => AuthField::Name,
            AuthField::Password => AuthField::Username,
            AuthField::Confirm => AuthField::Password,
        };
    }
}

impl Default for AuthFormState {
    fn default() -> Self {
        Self::new()
    }
}

/// The signed-in user.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub name: String,
}

/// Messages delivered back to the event loop from spawned network tasks.
#[derive(Debug)]
pub enum NetMessage {
    Suggestions {
        seq: u64,
        items: Vec<PlaceSuggestion>,
    },
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub screen: AppScreen,
    pub status_message: String,
    pub show_help: bool,
    pub actions: AppActions,
    pub occurrences: Vec<OccurrenceRecord>,
    pub selected_occurrence_index: usize,
    pub occurrence_action_index: usize,
    pub detail_evaluations: Vec<EvaluationRecord>,
    pub rating_input: i64,
    pub comment_input: String,
    pub comment_editing: bool,
    pub edit_state: Option<EditOccurrenceState>,
    pub map: MapView,
    pub selection_mode: SelectionMode,
    pub filter_disability: Option<DisabilityType>,
    pub planner: RoutePlannerState,
    pub ranking: Vec<RankingEntry>,
    pub auth: AuthFormState,
    pub current_user: Option<CurrentUser>,
    pub search_active: bool,
    pub search_input: String,
    pub filtered_occurrence_indices: Vec<usize>,
    pub route_requested: bool,
    pub net_tx: mpsc::UnboundedSender<NetMessage>,
    pub net_rx: mpsc::UnboundedReceiver<NetMessage>,
    pub suggestion_seq: u64,
    pub suggestion_task: Option<AbortHandle>,
}

impl App {
    pub fn new() -> Self {
        let (net_tx, net_rx) = mpsc::unbounded_channel();
        Self {
            running: true,
            screen: AppScreen::Login,
            status_message: String::new(),
            show_help: false,
            actions: AppActions::new(),
            occurrences: Vec::new(),
            selected_occurrence_index: 0,
            occurrence_action_index: 0,
            detail_evaluations: Vec::new(),
            rating_input: 3,
            comment_input: String::new(),
            comment_editing: false,
            edit_state: None,
            map: MapView::new(),
            selection_mode: SelectionMode::None,
            filter_disability: None,
            planner: RoutePlannerState::new(),
            ranking: Vec::new(),
            auth: AuthFormState::new(),
            current_user: None,
            search_active: false,
            search_input: String::new(),
            filtered_occurrence_indices: Vec::new(),
            route_requested: false,
            net_tx,
            net_rx,
            suggestion_seq: 0,
            suggestion_task: None,
        }
    }

    pub async fn initialize(&mut self) -> Result<()> {
        self.actions.initialize().await?;
        self.fetch_occurrences().await?;

        // Restore a previous session so the user lands straight on the map
        if let Some(user) = self.actions.restore_session().await? {
            self.current_user = Some(user);
            self.screen = AppScreen::Map;
        }

        Ok(())
    }

    pub async fn fetch_occurrences(&mut self) -> Result<()> {
        self.occurrences = self.actions.fetch_occurrences().await?;
        if self.selected_occurrence_index >= self.occurrences.len() {
            self.selected_occurrence_index = self.occurrences.len().saturating_sub(1);
        }
        self.update_search();
        Ok(())
    }

    /// Occurrences surviving the disability filter, as indices into
    /// `occurrences`.
    pub fn filtered_by_disability(&self) -> Vec<usize> {
        self.occurrences
            .iter()
            .enumerate()
            .filter(|(_, o)| {
                self.filter_disability
                    .is_none_or(|wanted| o.disability_types().contains(&wanted))
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// Cycles the disability filter: all, then each type in order.
    pub fn cycle_disability_filter(&mut self) {
        self.filter_disability = match self.filter_disability {
            None => Some(DisabilityType::Motor),
            Some(current) => {
                let position = DisabilityType::ALL
                    .iter()
                    .position(|d| *d == current)
                    .unwrap_or(0);
                DisabilityType::ALL.get(position + 1).copied()
            }
        };
        self.update_search();
    }

    /// Re-runs the fuzzy search over the disability-filtered occurrences.
    pub fn update_search(&mut self) {
        let base = self.filtered_by_disability();
        if self.search_input.is_empty() {
            self.filtered_occurrence_indices = base;
        } else {
            let matcher = SkimMatcherV2::default();
            let mut scored: Vec<(i64, usize)> = base
                .into_iter()
                .filter_map(|index| {
                    let occurrence = &self.occurrences[index];
                    let haystack =
                        format!("{} {}", occurrence.title, occurrence.problem_label());
                    matcher
                        .fuzzy_match(&haystack, &self.search_input)
                        .map(|score| (score, index))
                })
                .collect();
            scored.sort_by(|a, b| b.0.cmp(&a.0));
            self.filtered_occurrence_indices = scored.into_iter().map(|(_, i)| i).collect();
        }
        if self.selected_occurrence_index >= self.filtered_occurrence_indices.len() {
            self.selected_occurrence_index = 0;
        }
    }

    pub fn clear_search(&mut self) {
        self.search_active = false;
        self.search_input.clear();
        self.update_search();
    }

    pub fn selected_occurrence(&self) -> Option<&OccurrenceRecord> {
        let index = *self
            .filtered_occurrence_indices
            .get(self.selected_occurrence_index)?;
        self.occurrences.get(index)
    }

    /// Barriers the route planner must avoid. Inaccessible reports always
    /// count as severe; partially accessible ones join as moderate barriers
    /// only when the user asks to avoid them too.
    pub fn barriers(&self) -> Vec<Barrier> {
        self.occurrences
            .iter()
            .filter_map(|o| {
                let severity = match o.level {
                    AccessibilityLevel::Inaccessible => BarrierSeverity::Severe,
                    AccessibilityLevel::Partial if self.planner.avoid_partial => {
                        BarrierSeverity::Moderate
                    }
                    _ => return None,
                };
                Some(Barrier {
                    position: LatLng::new(o.latitude, o.longitude),
                    severity,
                })
            })
            .collect()
    }

    /// Spawns a suggestion fetch for the planner's active input, aborting any
    /// in-flight one. Responses carry a sequence number so stale results are
    /// dropped by the event loop.
    pub fn request_suggestions(&mut self) {
        if let Some(task) = self.suggestion_task.take() {
            task.abort();
        }

        let query = match self.planner.field {
            PlannerField::Origin => self.planner.origin_input.clone(),
            PlannerField::Destination => self.planner.destination_input.clone(),
        };
        if query.trim().len() < 3 {
            self.planner.clear_suggestions();
            return;
        }

        self.suggestion_seq += 1;
        let seq = self.suggestion_seq;
        let providers = self.actions.providers.clone();
        let proximity = self.map.center;
        let viewbox = self.map.viewbox();
        let tx = self.net_tx.clone();

        let handle = tokio::spawn(async move {
            let items = providers
                .suggestions(&query, Some(proximity), Some(viewbox))
                .await;
            let _ = tx.send(NetMessage::Suggestions { seq, items });
        });
        self.suggestion_task = Some(handle.abort_handle());
    }

    /// Applies a suggestion batch if it is still the latest request.
    pub fn apply_suggestions(&mut self, seq: u64, items: Vec<PlaceSuggestion>) {
        if seq != self.suggestion_seq {
            return;
        }
        self.planner.suggestions = items;
        self.planner.suggestion_index = 0;
    }

    pub fn reset_planner(&mut self) {
        if let Some(task) = self.suggestion_task.take() {
            task.abort();
        }
        self.planner = RoutePlannerState::new();
        self.route_requested = false;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, level: AccessibilityLevel, disabilities: &str) -> OccurrenceRecord {
        OccurrenceRecord {
            id: id.to_string(),
            title: format!("Occurrence {id}"),
            description: None,
            latitude: -23.56,
            longitude: -46.65,
            level,
            disability_types: disabilities.to_string(),
            category: LocationCategory::Sidewalks,
            problem_type: ProblemType::Pothole,
            problem_other_text: None,
            photo_url: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            created_by: None,
        }
    }

    #[test]
    fn disability_filter_cycles_through_all_types_and_back() {
        let mut app = App::new();
        assert_eq!(app.filter_disability, None);
        app.cycle_disability_filter();
        assert_eq!(app.filter_disability, Some(DisabilityType::Motor));
        for _ in 0..3 {
            app.cycle_disability_filter();
        }
        assert_eq!(app.filter_disability, Some(DisabilityType::Multiple));
        app.cycle_disability_filter();
        assert_eq!(app.filter_disability, None);
    }

    #[test]
    fn disability_filter_narrows_visible_occurrences() {
        let mut app = App::new();
        app.occurrences = vec![
            record("a", AccessibilityLevel::Partial, "motor"),
            record("b", AccessibilityLevel::Partial, "visual,hearing"),
            record("c", AccessibilityLevel::Partial, "motor,visual"),
        ];
        app.update_search();
        assert_eq!(app.filtered_occurrence_indices, vec![0, 1, 2]);

        app.filter_disability = Some(DisabilityType::Visual);
        app.update_search();
        assert_eq!(app.filtered_occurrence_indices, vec![1, 2]);

        app.filter_disability = Some(DisabilityType::Multiple);
        app.update_search();
        assert!(app.filtered_occurrence_indices.is_empty());
    }

    #[test]
    fn fuzzy_search_ranks_title_matches() {
        let mut app = App::new();
        app.occurrences = vec![
            record("a", AccessibilityLevel::Partial, "motor"),
            record("b", AccessibilityLevel::Partial, "motor"),
        ];
        app.occurrences[0].title = "Calçada quebrada".to_string();
        app.occurrences[1].title = "Rampa bloqueada".to_string();

        app.search_input = "rampa".to_string();
        app.update_search();
        assert_eq!(app.filtered_occurrence_indices, vec![1]);
    }

    #[test]
    fn barriers_follow_level_and_avoid_partial_toggle() {
        let mut app = App::new();
        app.occurrences = vec![
            record("a", AccessibilityLevel::Accessible, "motor"),
            record("b", AccessibilityLevel::Partial, "motor"),
            record("c", AccessibilityLevel::Inaccessible, "motor"),
        ];

        let barriers = app.barriers();
        assert_eq!(barriers.len(), 1);
        assert_eq!(barriers[0].severity, BarrierSeverity::Severe);

        app.planner.avoid_partial = true;
        let barriers = app.barriers();
        assert_eq!(barriers.len(), 2);
        assert!(barriers
            .iter()
            .any(|b| b.severity == BarrierSeverity::Moderate));
    }

    #[test]
    fn category_cycle_resets_invalid_problem_selection() {
        let mut state = EditOccurrenceState::new_at(DEFAULT_CENTER);
        // Sidewalks -> Pothole
        state.next_problem();
        assert_eq!(state.problem(), ProblemType::Pothole);

        // PublicBuildings does not offer Pothole, so the selection falls back
        state.next_category();
        assert_eq!(state.category(), LocationCategory::PublicBuildings);
        assert_eq!(state.problem(), ProblemType::MissingRamp);

        // Other survives every category change
        let len = state.category().problem_options().len();
        for _ in 0..len - 1 {
            state.next_problem();
        }
        assert_eq!(state.problem(), ProblemType::Other);
        state.next_category();
        assert_eq!(state.problem(), ProblemType::Other);
    }

    #[test]
    fn edit_form_validates_before_building_params() {
        let mut state = EditOccurrenceState::new_at(DEFAULT_CENTER);
        assert_eq!(state.validation_error(), Some("Title is required"));

        state.title = "Degrau alto".to_string();
        assert_eq!(
            state.validation_error(),
            Some("Select at least one disability type")
        );

        state.toggle_disability();
        assert_eq!(state.validation_error(), None);

        let params = state.to_params(Some("user:ana")).unwrap();
        assert_eq!(params.title, "Degrau alto");
        assert_eq!(params.disability_types, "motor");
        assert_eq!(params.created_by.as_deref(), Some("user:ana"));
        assert!(params.id.starts_with("occ-"));
    }

    #[test]
    fn edit_form_round_trips_an_existing_record() {
        let mut source = record("abc", AccessibilityLevel::Inaccessible, "visual,motor");
        source.problem_type = ProblemType::BlockedPath;
        let state = EditOccurrenceState::from_record(&source);

        assert_eq!(state.level(), AccessibilityLevel::Inaccessible);
        assert_eq!(state.problem(), ProblemType::BlockedPath);
        let params = state.to_params(None).unwrap();
        assert_eq!(params.id, "abc");
        // Storage order follows the canonical enum order
        assert_eq!(params.disability_types, "motor,visual");
        assert_eq!(params.created_at, source.created_at);
    }

    #[test]
    fn other_problem_requires_free_text() {
        let mut state = EditOccurrenceState::new_at(DEFAULT_CENTER);
        state.title = "Obstáculo".to_string();
        state.toggle_disability();
        let len = state.category().problem_options().len();
        for _ in 0..len - 1 {
            state.next_problem();
        }
        assert_eq!(state.problem(), ProblemType::Other);
        assert_eq!(state.validation_error(), Some("Describe the problem"));

        state.other_text = "Entulho na faixa".to_string();
        let params = state.to_params(None).unwrap();
        assert_eq!(
            params.problem_other_text.as_deref(),
            Some("Entulho na faixa")
        );
    }

    #[test]
    fn map_zoom_keeps_aspect_and_bounds() {
        let mut map = MapView::new();
        let initial = map.span_lat;
        map.zoom_in();
        assert!(map.span_lat < initial);
        assert!((map.span_lng - map.span_lat * 2.0).abs() < 1e-12);

        for _ in 0..50 {
            map.zoom_out();
        }
        assert!(map.span_lat <= 0.5);
    }

    #[test]
    fn map_cursor_recenters_when_it_leaves_the_viewport() {
        let mut map = MapView::new();
        for _ in 0..20 {
            map.move_cursor(1.0, 0.0);
        }
        assert!(map.contains(map.cursor));
    }

    #[test]
    fn stale_suggestion_batches_are_dropped() {
        let mut app = App::new();
        app.suggestion_seq = 5;
        app.apply_suggestions(
            4,
            vec![PlaceSuggestion {
                label: "old".to_string(),
                latitude: 0.0,
                longitude: 0.0,
            }],
        );
        assert!(app.planner.suggestions.is_empty());

        app.apply_suggestions(
            5,
            vec![PlaceSuggestion {
                label: "fresh".to_string(),
                latitude: 0.0,
                longitude: 0.0,
            }],
        );
        assert_eq!(app.planner.suggestions.len(), 1);
    }
}
