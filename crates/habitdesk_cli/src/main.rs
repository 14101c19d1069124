//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open the configured database and verify `habitdesk_core` wiring.
//! - Optionally register (or look up) an owner and print their categories.
//!
//! Usage: `habitdesk_cli [username]`

use habitdesk_core::{
    core_version, init_from_config, open_db, ping, CategoryService, CoreConfig, OwnerService,
    ServiceError, SqliteCategoryRepository, SqliteOwnerRepository,
};
use log::info;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("habitdesk_cli error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = CoreConfig::from_env();
    let logging_enabled = init_from_config(&config)?;

    println!("habitdesk_core ping={}", ping());
    println!("habitdesk_core version={}", core_version());
    println!("db_path={}", config.db_path.display());
    println!("logging={}", if logging_enabled { "file" } else { "off" });

    let conn = open_db(&config.db_path).map_err(|err| format!("db open failed: {err}"))?;
    info!("event=cli_start module=cli status=ok");

    let Some(username) = std::env::args().nth(1) else {
        return Ok(());
    };

    let owners =
        OwnerService::new(SqliteOwnerRepository::try_new(&conn).map_err(|err| err.to_string())?);
    let owner = match owners.find_by_username(&username).map_err(describe)? {
        Some(owner) => owner,
        None => owners.register(&username).map_err(describe)?,
    };
    println!("owner={} id={}", owner.username, owner.id);

    let categories =
        CategoryService::new(SqliteCategoryRepository::try_new(&conn).map_err(|err| err.to_string())?);
    for category in categories.list_categories(owner.id).map_err(describe)? {
        let marker = if category.is_inbox { " (inbox)" } else { "" };
        println!("category={}{marker}", category.name);
    }
    Ok(())
}

fn describe(err: ServiceError) -> String {
    match err.field_errors() {
        Some(errors) => format!("invalid input: {errors}"),
        None => err.to_string(),
    }
}
