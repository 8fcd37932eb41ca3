use color_eyre::Result;
use crossterm::event::{self, Event};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::convert::TryFrom;
use std::fmt;
use std::io::Stdout;

use crate::app::state::NetMessage;
use crate::app::{handle_input, App};
use crate::domain::{AccessibilityLevel, DisabilityType, LocationCategory};
use crate::geo::LatLng;
use crate::net::Viewbox;
use crate::route::{plan_route, PlannedRoute};
use crate::ui;

// States for route planning
#[derive(Clone, Copy, PartialEq, Debug)]
enum PlanState {
    Idle,
    Planning,
    Success,
    Error,
}

impl fmt::Display for PlanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Planning => write!(f, "Planning"),
            Self::Success => write!(f, "Success"),
            Self::Error => write!(f, "Error"),
        }
    }
}

// Events for route planning
#[derive(Clone, Debug)]
enum PlanEvent {
    StartPlanning,
    Success(Box<PlannedRoute>),
    Error(String),
    Reset,
}

impl fmt::Display for PlanEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartPlanning => write!(f, "StartPlanning"),
            Self::Success(route) => write!(f, "Success({} km)", route.distance_km),
            Self::Error(msg) => write!(f, "Error({msg})"),
            Self::Reset => write!(f, "Reset"),
        }
    }
}

#[derive(Debug)]
struct StateTransitionError {
    from: PlanState,
    event: PlanEvent,
}

impl fmt::Display for StateTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid transition from {} with event {}",
            self.from, self.event
        )
    }
}

impl std::error::Error for StateTransitionError {}

// State machine driving the route planning lifecycle
struct RoutePlanMachine {
    state: PlanState,
}

impl RoutePlanMachine {
    const fn new(initial_state: PlanState) -> Self {
        Self {
            state: initial_state,
        }
    }

    fn process_event(
        &mut self,
        event: &PlanEvent,
        app: &mut App,
    ) -> std::result::Result<(), StateTransitionError> {
        let next_state = NextState::try_from((self.state, event, app))?;
        self.state = next_state.0;

        Ok(())
    }
}

struct NextState(PlanState);

impl TryFrom<(PlanState, &PlanEvent, &mut App)> for NextState {
    type Error = StateTransitionError;

    fn try_from(
        value: (PlanState, &PlanEvent, &mut App),
    ) -> std::result::Result<Self, StateTransitionError> {
        let (current_state, event, app) = value;

        match (current_state, event) {
            (PlanState::Idle, PlanEvent::StartPlanning) => {
                app.planner.status = "Planning route...".to_string();
                Ok(Self(PlanState::Planning))
            }
            (PlanState::Planning, PlanEvent::Success(route)) => {
                app.planner.status = format!(
                    "{:.2} km, about {} min via {}",
                    route.distance_km,
                    route.duration_min,
                    route.provider.label()
                );
                app.planner.planned = Some((**route).clone());
                Ok(Self(PlanState::Success))
            }
            (PlanState::Planning, PlanEvent::Error(error)) => {
                app.planner.status = error.clone();
                app.planner.planned = None;
                Ok(Self(PlanState::Error))
            }
            (PlanState::Success | PlanState::Error, PlanEvent::Reset) => Ok(Self(PlanState::Idle)),
            _ => Err(StateTransitionError {
                from: current_state,
                event: event.clone(),
            }),
        }
    }
}

/// Resolves both planner endpoints and plans the route between them.
async fn plan_requested_route(app: &mut App) -> std::result::Result<PlannedRoute, String> {
    let proximity = Some(app.map.center);
    let viewbox = Some(app.map.viewbox());

    let origin = resolve_endpoint(
        app,
        app.planner.origin,
        &app.planner.origin_input.clone(),
        proximity,
        viewbox,
        "Could not find the origin",
    )
    .await?;
    let destination = resolve_endpoint(
        app,
        app.planner.destination,
        &app.planner.destination_input.clone(),
        proximity,
        viewbox,
        "Could not find the destination",
    )
    .await?;

    app.planner.origin = Some(origin);
    app.planner.destination = Some(destination);

    let barriers = app.barriers();
    let route = plan_route(&app.actions.providers, origin, destination, &barriers).await;

    // Bring the route into view
    app.map.center_on(LatLng::new(
        (origin.lat + destination.lat) / 2.0,
        (origin.lng + destination.lng) / 2.0,
    ));

    Ok(route)
}

async fn resolve_endpoint(
    app: &App,
    resolved: Option<LatLng>,
    input: &str,
    proximity: Option<LatLng>,
    viewbox: Option<Viewbox>,
    missing_message: &str,
) -> std::result::Result<LatLng, String> {
    if let Some(point) = resolved {
        return Ok(point);
    }
    if input.trim().is_empty() {
        return Err(missing_message.to_string());
    }
    app.actions
        .providers
        .resolve_coordinate(input, proximity, viewbox)
        .await
        .ok_or_else(|| missing_message.to_string())
}

/// Run the application in headless mode (no UI)
pub async fn run_headless(app: &mut App, json: bool) -> Result<()> {
    app.initialize().await?;

    if json {
        render_headless_json(app).await?;
    } else {
        render_headless_stats(app).await?;
    }

    Ok(())
}

async fn render_headless_stats(app: &App) -> Result<()> {
    let stats = build_headless_stats(app).await?;

    println!("Occurrence Stats");
    println!("================");
    println!("Total occurrences: {}", stats.total_occurrences);
    println!("Total evaluations: {}", stats.total_evaluations);

    println!("\nBy accessibility level:");
    for (level, count) in &stats.by_level {
        println!("- {level}: {count}");
    }

    println!("\nBy category:");
    for (category, count) in &stats.by_category {
        println!("- {category}: {count}");
    }

    println!("\nBy disability type:");
    for (disability, count) in &stats.by_disability {
        println!("- {disability}: {count}");
    }

    println!("\nMost evaluated:");
    for entry in &stats.top_ranked {
        println!(
            "- {} | {} evaluations | average {:.1}",
            entry.title, entry.evaluation_count, entry.average_rating
        );
    }

    println!("\nRecent occurrences:");
    for occurrence in &stats.recent {
        println!(
            "- {} | {} | {} | {}",
            occurrence.title, occurrence.level, occurrence.category, occurrence.created_at
        );
    }

    Ok(())
}

async fn render_headless_json(app: &App) -> Result<()> {
    let stats = build_headless_stats(app).await?;
    let json = serde_json::to_string_pretty(&stats)?;
    println!("{json}");
    Ok(())
}

async fn build_headless_stats(app: &App) -> Result<HeadlessStats> {
    let pool = app
        .actions
        .db_pool
        .as_ref()
        .ok_or_else(|| color_eyre::eyre::eyre!("Database not initialized"))?;
    let total_occurrences = crate::db::queries::count_occurrences(pool).await?;
    let total_evaluations = crate::db::queries::count_evaluations(pool).await?;
    let by_level = crate::db::queries::count_occurrences_by_level(pool).await?;
    let by_category = crate::db::queries::count_occurrences_by_category(pool).await?;
    let recent = crate::db::queries::recent_occurrences(pool, 5).await?;
    let top_ranked = app.actions.ranking(5).await?;

    // The comma-joined disability column is decoded in Rust rather than split
    // in SQL
    let mut by_disability: Vec<(String, i64)> = DisabilityType::ALL
        .iter()
        .map(|d| (d.as_str().to_string(), 0))
        .collect();
    for occurrence in &app.occurrences {
        for disability in occurrence.disability_types() {
            if let Some(entry) = by_disability
                .iter_mut()
                .find(|(name, _)| name == disability.as_str())
            {
                entry.1 += 1;
            }
        }
    }

    let ordered_levels: Vec<(String, i64)> = AccessibilityLevel::ALL
        .iter()
        .map(|level| {
            let count = by_level
                .iter()
                .find(|(name, _)| name == level.as_str())
                .map_or(0, |(_, count)| *count);
            (level.as_str().to_string(), count)
        })
        .collect();

    let ordered_categories: Vec<(String, i64)> = LocationCategory::ALL
        .iter()
        .map(|category| {
            let count = by_category
                .iter()
                .find(|(name, _)| name == category.as_str())
                .map_or(0, |(_, count)| *count);
            (category.as_str().to_string(), count)
        })
        .collect();

    let top_ranked = top_ranked
        .into_iter()
        .map(|entry| HeadlessRanked {
            title: entry.title,
            evaluation_count: entry.evaluation_count,
            average_rating: entry.average_rating,
        })
        .collect();

    let recent = recent
        .into_iter()
        .map(|occurrence| HeadlessOccurrence {
            title: occurrence.title,
            level: occurrence.level.as_str().to_string(),
            category: occurrence.category.as_str().to_string(),
            created_at: occurrence.created_at,
        })
        .collect();

    Ok(HeadlessStats {
        total_occurrences,
        total_evaluations,
        by_level: ordered_levels,
        by_category: ordered_categories,
        by_disability,
        top_ranked,
        recent,
    })
}

#[derive(serde::Serialize)]
struct HeadlessStats {
    total_occurrences: i64,
    total_evaluations: i64,
    by_level: Vec<(String, i64)>,
    by_category: Vec<(String, i64)>,
    by_disability: Vec<(String, i64)>,
    top_ranked: Vec<HeadlessRanked>,
    recent: Vec<HeadlessOccurrence>,
}

#[derive(serde::Serialize)]
struct HeadlessRanked {
    title: String,
    evaluation_count: i64,
    average_rating: f64,
}

#[derive(serde::Serialize)]
struct HeadlessOccurrence {
    title: String,
    level: String,
    category: String,
    created_at: String,
}

/// Run the main application event loop
pub async fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    // Event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    let mut plan_machine = RoutePlanMachine::new(PlanState::Idle);

    loop {
        // Deliver finished network tasks before drawing
        while let Ok(message) = app.net_rx.try_recv() {
            match message {
                NetMessage::Suggestions { seq, items } => app.apply_suggestions(seq, items),
            }
        }

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    handle_input(app, key.code).await?;
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    if terminal.draw(|f| ui::ui(app, f)).is_err() {
                        // Non-fatal redraw error
                    }
                }
                Ok(Event::Mouse(_) | Event::FocusGained | Event::FocusLost | Event::Paste(_))
                | Err(_) => {
                    // Ignore non-key events for now
                }
            }
        }

        // Drive a requested route plan to completion
        if app.route_requested {
            app.route_requested = false;

            if plan_machine
                .process_event(&PlanEvent::StartPlanning, app)
                .is_err()
            {
                continue;
            }

            // Show the planning status before the awaits below
            if terminal.draw(|f| ui::ui(app, f)).is_err() {
                // Non-fatal redraw error
            }

            let outcome = plan_requested_route(app).await;
            let event = match outcome {
                Ok(route) => PlanEvent::Success(Box::new(route)),
                Err(message) => PlanEvent::Error(message),
            };
            if plan_machine.process_event(&event, app).is_err() {
                // Non-fatal state transition error
            }
            if plan_machine.process_event(&PlanEvent::Reset, app).is_err() {
                // Non-fatal reset error
            }
        }
    }

    Ok(())
}
