use crate::config::init_app_config;
use chrono::Local;
use color_eyre::Result;
use sqlx::{
    migrate::MigrateDatabase, query, query_scalar, sqlite::SqlitePoolOptions, Sqlite, SqlitePool,
};

/// Sets up the database by creating the necessary tables if they don't exist
pub async fn setup_database(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Create the occurrence table
    query(
        "CREATE TABLE IF NOT EXISTS occurrence (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            level TEXT NOT NULL,
            disability_types TEXT NOT NULL DEFAULT '',
            category TEXT NOT NULL,
            problem_type TEXT NOT NULL,
            problem_other_text TEXT,
            photo_url TEXT,
            created_at TEXT NOT NULL,
            created_by TEXT
        )",
    )
    .execute(pool)
    .await?;

    // Create the evaluation table
    query(
        "CREATE TABLE IF NOT EXISTS evaluation (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            occurrence_id TEXT NOT NULL,
            user_id TEXT NOT NULL,
            rating INTEGER NOT NULL,
            comment TEXT,
            created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    // Create the users table
    query(
        "CREATE TABLE IF NOT EXISTS users (
            username TEXT PRIMARY KEY,
            password TEXT NOT NULL,
            name TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    // Create the session table (single key/value row for the signed-in user)
    query(
        "CREATE TABLE IF NOT EXISTS session (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    ensure_column_exists(
        pool,
        "occurrence",
        "problem_other_text",
        "ALTER TABLE occurrence ADD COLUMN problem_other_text TEXT",
    )
    .await?;

    ensure_column_exists(
        pool,
        "occurrence",
        "created_by",
        "ALTER TABLE occurrence ADD COLUMN created_by TEXT",
    )
    .await?;

    seed_sample_occurrences(pool).await?;

    Ok(())
}

async fn ensure_column_exists(
    pool: &SqlitePool,
    table: &str,
    column: &str,
    alter_statement: &str,
) -> Result<(), sqlx::Error> {
    let count: i64 = query_scalar(&format!(
        "SELECT COUNT(*) FROM pragma_table_info('{table}') WHERE name = ?",
    ))
    .bind(column)
    .fetch_one(pool)
    .await?;

    if count == 0 {
        query(alter_statement).execute(pool).await?;
    }

    Ok(())
}

/// Seeds three Sao Paulo sample occurrences the first time the store is
/// created, so the map is not empty on first launch.
async fn seed_sample_occurrences(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let count: i64 = query_scalar("SELECT COUNT(*) FROM occurrence")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(());
    }

    let now = Local::now().to_rfc3339();
    let samples = [
        (
            "1",
            "Rampa com inclinação excessiva",
            -23.561_732,
            -46.656_609,
            "partial",
            "motor",
            "public_buildings",
            "steep_ramp",
        ),
        (
            "2",
            "Calçada quebrada",
            -23.560_812,
            -46.654_102,
            "inaccessible",
            "visual,motor",
            "sidewalks",
            "broken_sidewalk",
        ),
        (
            "3",
            "Sinalização tátil adequada",
            -23.559_95,
            -46.659_2,
            "accessible",
            "visual",
            "transit",
            "other",
        ),
    ];

    for (id, title, lat, lng, level, disabilities, category, problem) in samples {
        query(
            "INSERT INTO occurrence \
             (id, title, latitude, longitude, level, disability_types, category, problem_type, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(title)
        .bind(lat)
        .bind(lng)
        .bind(level)
        .bind(disabilities)
        .bind(category)
        .bind(problem)
        .bind(&now)
        .execute(pool)
        .await?;
    }

    Ok(())
}

/// Creates a database connection pool using the database URL from config
pub async fn create_database_pool() -> Result<SqlitePool> {
    let database_url = init_app_config()?;

    eprintln!("Initializing database with URL: {database_url}");

    // Extract the database path from the URL for permission checks
    let db_path = match extract_db_path_from_url(&database_url) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Error extracting database path: {e}");
            return Err(color_eyre::eyre::eyre!("Invalid database URL format: {e}"));
        }
    };
    eprintln!("Extracted database path: {db_path}");

    // Check if parent directory exists and is writable
    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        if !parent.exists() {
            eprintln!("Creating parent directory: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                eprintln!("Failed to create directory: {e}");
                color_eyre::eyre::eyre!("Failed to create database directory: {e}")
            })?;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let metadata = parent.metadata().map_err(|e| {
                eprintln!("Failed to get directory metadata: {e}");
                color_eyre::eyre::eyre!("Failed to access directory metadata: {e}")
            })?;
            let mode = metadata.permissions().mode();
            if mode & 0o200 == 0 {
                return Err(color_eyre::eyre::eyre!(
                    "Database directory is not writable"
                ));
            }
        }
    }

    // If the database file exists, make sure it is readable and writable
    let db_file = std::path::Path::new(&db_path);
    if db_file.exists() {
        std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(db_file)
            .map_err(|e| {
                eprintln!("Database file permission error: {e}");
                color_eyre::eyre::eyre!("Database file permission error: {e}")
            })?;
    }

    // Create the database if it doesn't exist
    let db_exists = match Sqlite::database_exists(&database_url).await {
        Ok(exists) => exists,
        Err(e) => {
            eprintln!("Error checking if database exists: {e}");
            return Err(color_eyre::eyre::eyre!("Error checking database: {e}"));
        }
    };

    if !db_exists {
        eprintln!("Database does not exist, creating it now");
        Sqlite::create_database(&database_url).await.map_err(|e| {
            eprintln!("Failed to create database: {e}");
            color_eyre::eyre::eyre!("Failed to create SQLite database: {e}")
        })?;
    }

    // Create a connection pool with SQLite-specific options
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .after_connect(|conn, _| {
            Box::pin(async move {
                use sqlx::Executor as _;
                // Enable foreign keys
                conn.execute("PRAGMA foreign_keys = ON;").await?;
                // Set journal mode to WAL for better concurrency
                conn.execute("PRAGMA journal_mode = WAL;").await?;
                conn.execute("PRAGMA synchronous = NORMAL;").await?;
                Ok(())
            })
        })
        .connect(&database_url)
        .await
        .map_err(|e| {
            eprintln!("Failed to connect to database: {e}");
            color_eyre::eyre::eyre!("Failed to connect to SQLite database: {e}")
        })?;

    // Set up the database schema
    setup_database(&pool).await.map_err(|e| {
        eprintln!("Failed to set up database schema: {e}");
        color_eyre::eyre::eyre!("Failed to set up database schema: {e}")
    })?;

    eprintln!("Database initialization completed successfully");
    Ok(pool)
}

/// Helper function to extract the database path from a SQLite URL
fn extract_db_path_from_url(url: &str) -> Result<String, color_eyre::eyre::Error> {
    if !url.starts_with("sqlite://") {
        return Err(color_eyre::eyre::eyre!("Not a valid SQLite URL: {url}"));
    }

    let path_part = url.trim_start_matches("sqlite://");

    // Windows: sqlite:///C:/path or sqlite://C:/path
    if cfg!(windows) {
        if let Some(drive_idx) = path_part.find(':') {
            if drive_idx > 0 {
                let path = path_part
                    .strip_prefix('/')
                    .map_or_else(|| path_part.to_string(), std::string::ToString::to_string);
                return Ok(path);
            }
        }
    }

    // Unix-like absolute path: sqlite:///path
    if path_part.starts_with('/') {
        return Ok(format!("/{}", path_part.trim_start_matches('/')));
    }

    // Relative path: sqlite://path
    Ok(path_part.to_string())
}

/// Creates a database connection pool with a specified URL
pub async fn create_database_pool_with_url(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        Sqlite::create_database(database_url).await?;
    }

    // One connection so in-memory databases keep a single store
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(database_url)
        .await?;

    setup_database(&pool).await?;

    Ok(pool)
}
