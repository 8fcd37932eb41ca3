// Export our modules for use in binaries and tests
pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod event;
pub mod geo;
pub mod net;
pub mod route;
pub mod terminal;
pub mod ui;

pub use domain::{AccessibilityLevel, DisabilityType, LocationCategory, ProblemType};
