pub mod planner;

pub use planner::{plan_route, PlannedRoute, WALKING_SPEED_KMH};
