pub mod config;

pub use config::{init_app_config, mapbox_token, offline_mode};
