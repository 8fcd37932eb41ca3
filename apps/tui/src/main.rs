use clap::Parser;
use color_eyre::Result;
use rota_acessivel_tui::app::App;
use rota_acessivel_tui::cli::CliArgs;
use rota_acessivel_tui::{event, terminal};

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    let mut app = App::new();

    // Headless when asked for, or when stdout is not a terminal
    if args.headless || !is_terminal() {
        return event::run_headless(&mut app, args.json).await;
    }

    // Initialize database and providers
    if let Err(e) = app.initialize().await {
        eprintln!("Error initializing application: {e}");
        eprintln!("Will continue with limited functionality");
    }

    let mut terminal = terminal::setup()?;

    let result = event::run(&mut terminal, &mut app).await;

    terminal::cleanup(true, true);

    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
