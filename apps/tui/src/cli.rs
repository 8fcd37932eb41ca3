use clap::{CommandFactory, Parser};

#[derive(Debug, Parser)]
#[command(name = "rota_acessivel-tui", version, about = "Accessible Route TUI")]
pub struct CliArgs {
    /// Print occurrence stats and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless stats as JSON
    #[arg(long)]
    pub json: bool,

    /// Override database path
    #[arg(long, value_name = "PATH")]
    pub db: Option<String>,

    /// Disable all network providers (geocoding and directions)
    #[arg(long)]
    pub offline: bool,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(db) = &self.db {
            std::env::set_var("DATABASE_NAME", db);
        }
        if self.offline {
            std::env::set_var("OFFLINE", "1");
        }
    }

    /// Renders clap's help output for the in-app help overlay.
    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_text_lists_every_flag() {
        let help = CliArgs::help_text();
        for flag in ["--headless", "--json", "--db", "--offline"] {
            assert!(help.contains(flag), "missing {flag} in help output");
        }
    }
}
