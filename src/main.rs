mod config;
mod db;
mod logging;
mod models;
mod run;
mod store;
mod ui;

use anyhow::{Context, Result};

use crate::config::{AppDirs, Config};
use crate::store::BudgetStore;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let dirs = AppDirs::resolve()?;
    let (config, config_err) = match Config::load(&dirs.config_file) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    if let Err(e) = logging::init(&dirs.data_dir, &config.log_level()) {
        eprintln!("Warning: logging disabled: {e:#}");
    }
    if let Some(e) = config_err {
        tracing::warn!("Ignoring config file, using defaults: {e:#}");
    }

    let db_path = config.db_path(&dirs.data_dir);
    let db = db::Database::open(&db_path)?;
    let mut store = BudgetStore::open(db)
        .with_context(|| format!("Failed to load budget data from {}", db_path.display()))?;
    let symbol = config.currency_symbol();

    match args.len() {
        1 => run::as_tui(&mut store, &symbol),
        _ => run::as_cli(&args, &mut store, &symbol),
    }
}
