// App module for rota_acessivel-tui
// Handles application state and business logic

pub mod actions;
pub mod input;
pub mod state;

pub use input::handle_input;
pub use state::{App, AppScreen, EditField, EditOccurrenceState, MapView, SelectionMode};
