//! Command-line entry point for the blog schema migrator.
//!
//! Reads `DATABASE_URL` (or `.env`) and accepts the usual `sea-orm-migration`
//! subcommands: `up`, `down`, `status`, `fresh`, `refresh`, `reset`.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_env_filter("info").init();
    tracing::info!(migrations = migration::Migrator::migrations().len(), "Scribe migrator");

    cli::run_cli(migration::Migrator).await;
}
