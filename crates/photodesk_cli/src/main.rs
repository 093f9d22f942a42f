//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `photodesk_core` linkage and configuration resolution.
//! - Optionally open the configured database and report record counts.

use photodesk_core::{
    init_logging, AddressService, CoreConfig, Database, PhotoService,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("photodesk_core ping={}", photodesk_core::ping());
    println!("photodesk_core version={}", photodesk_core::core_version());

    let config = match CoreConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            return ExitCode::FAILURE;
        }
    };
    println!("db_path={}", config.db_path.display());
    println!("log_level={}", config.log_level);

    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(config.log_level, log_dir) {
            eprintln!("logging init failed: {err}");
            return ExitCode::FAILURE;
        }
    }

    if std::env::args().nth(1).as_deref() != Some("--stats") {
        return ExitCode::SUCCESS;
    }

    let db = match Database::open(&config.db_path) {
        Ok(db) => db,
        Err(err) => {
            eprintln!("database open failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    let photos = PhotoService::new(db.clone()).find_all();
    let addresses = AddressService::new(db).find_all();
    match (photos, addresses) {
        (Ok(photos), Ok(addresses)) => {
            println!("photos={} addresses={}", photos.len(), addresses.len());
            ExitCode::SUCCESS
        }
        (Err(err), _) | (_, Err(err)) => {
            eprintln!("stats failed: {err}");
            ExitCode::FAILURE
        }
    }
}
