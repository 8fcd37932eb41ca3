use color_eyre::eyre::eyre;
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

/// Initializes the application configuration.
/// Returns the SQLite database URL for the occurrence store.
pub fn init_app_config() -> color_eyre::eyre::Result<String> {
    // Load environment variables from .env file
    dotenv().ok();

    let base_dir: PathBuf = env::current_dir()?;

    let db_name = env::var("DATABASE_NAME").unwrap_or_else(|_| "occurrences.db".to_string());

    // Database path relative to the current directory
    let database_path = base_dir.join(&db_name);

    if let Some(parent) = database_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // No canonicalize() here because the file might not exist yet
    let path_str = database_path
        .to_str()
        .ok_or_else(|| eyre!("Invalid database path"))?
        .to_string();

    // SQLx URL format:
    // - absolute paths: sqlite:///absolute/path/to/file.db (3 slashes total)
    // - relative paths: sqlite://relative/path/to/file.db (2 slashes total)
    let clean_path = path_str.trim_start_matches('/');

    let database_url = if database_path.is_absolute() {
        eprintln!("Using absolute database path: {path_str}");
        format!("sqlite:///{clean_path}")
    } else {
        eprintln!("Using relative database path: {path_str}");
        format!("sqlite://{clean_path}")
    };

    Ok(database_url)
}

/// Mapbox access token, if configured. Absent token means the open
/// Nominatim/OSRM providers are used instead.
pub fn mapbox_token() -> Option<String> {
    dotenv().ok();
    env::var("MAPBOX_TOKEN").ok().filter(|t| !t.is_empty())
}

/// Whether network providers are disabled entirely.
pub fn offline_mode() -> bool {
    env::var("OFFLINE").is_ok_and(|v| v == "1")
}
