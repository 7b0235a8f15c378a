mod config;
mod db;
mod error;
mod insights;
mod logging;
mod models;
mod run;
mod ui;

use anyhow::Result;

use config::Config;
use logging::LogTarget;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = Config::from_env()?;

    let target = if args.len() == 1 {
        LogTarget::File(config.log_path())
    } else {
        LogTarget::Stderr
    };
    logging::init(config.log_filter.as_deref(), target)?;

    let mut db = db::Database::open(&config.db_path)?;

    match args.len() {
        1 => run::as_tui(&mut db, &config),
        2.. => run::as_cli(&args, &mut db, &config),
        _ => {
            eprintln!("Usage: worthit [command]");
            Ok(())
        }
    }
}
