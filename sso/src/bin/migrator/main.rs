use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use sqlx::migrate::Migrate;
use sqlx::migrate::Migrator;
use sso::config::StorageConfig;
use sso::repositories::SqliteStorage;

/// Apply SQL migrations from a directory to the SSO database.
#[derive(Debug, Parser)]
#[command(name = "migrator", version)]
struct Args {
    /// Path to the SQLite database file (created when missing)
    #[arg(long)]
    storage_path: String,

    /// Directory holding the migration files
    #[arg(long)]
    migrations_path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();

    let mut migrator = Migrator::new(args.migrations_path.as_path())
        .await
        .with_context(|| format!("failed to read migrations from {:?}", args.migrations_path))?;
    // Fixture directories are applied on top of the main schema.
    migrator.set_ignore_missing(true);

    let storage = SqliteStorage::connect(&StorageConfig {
        path: args.storage_path.clone(),
        max_connections: 1,
    })
    .await
    .with_context(|| format!("failed to open storage at {}", args.storage_path))?;

    let pending = {
        let mut conn = storage.pool().acquire().await?;
        conn.ensure_migrations_table().await?;
        let applied: HashSet<i64> = conn
            .list_applied_migrations()
            .await?
            .into_iter()
            .map(|migration| migration.version)
            .collect();

        migrator
            .iter()
            .filter(|migration| !migration.migration_type.is_down_migration())
            .filter(|migration| !applied.contains(&migration.version))
            .count()
    };

    if pending == 0 {
        println!("no change");
        return Ok(());
    }

    migrator
        .run(storage.pool())
        .await
        .context("failed to apply migrations")?;

    println!("migrations finished successfully");

    Ok(())
}
