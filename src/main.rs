// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use std::env;
use std::path::Path;
use tracing::info;

use simple_bank::config::CONFIG_FILE_NAME;
use simple_bank::{init_logging, Config, SqliteAccountRepository};

fn main() -> Result<()> {
    // simple-bank [DB_PATH]
    let config = Config::load(Path::new(CONFIG_FILE_NAME))?.with_args(env::args().skip(1));

    init_logging(&config.log_file)?;
    info!(version = simple_bank::VERSION, db = %config.database_path.display(), "starting");

    // Make sure the accounts table exists before the UI starts
    let repo = SqliteAccountRepository::open(&config.database_path).with_context(|| {
        format!("Failed to open account store {}", config.database_path.display())
    })?;

    run_ui_mode(repo, &config)?;

    info!("exiting");
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(repo: SqliteAccountRepository, config: &Config) -> Result<()> {
    let mut app = ui::App::new(repo, config.theme);
    ui::run_ui(&mut app)
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_repo: SqliteAccountRepository, _config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    std::process::exit(1);
}
