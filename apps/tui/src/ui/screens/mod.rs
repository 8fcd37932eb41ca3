pub mod edit_occurrence;
pub mod help;
pub mod login;
pub mod map;
pub mod occurrence_actions;
pub mod occurrence_details;
pub mod occurrences;
pub mod ranking;
pub mod route_planner;
pub mod signup;
