//! Command-line migration runner.
//!
//! Applies pending migrations one at a time through [`Migrator`], so every step
//! is recorded in `seaql_migrations` and a later `Migrator::up` at server
//! startup finds nothing left to do.

use crate::Migrator;
use colored::*;
use futures::FutureExt;
use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::io::{self, Write};
use std::panic::AssertUnwindSafe;
use std::time::Instant;

const STATUS_COLUMN: usize = 80;

/// Connects to `url` and applies every pending migration in order.
///
/// Stops at the first failing migration and returns its error.
pub async fn run_all_migrations(url: &str) -> Result<(), DbErr> {
    let db = Database::connect(url).await?;

    let pending = Migrator::get_pending_migrations(&db).await?;
    if pending.is_empty() {
        println!("Schema is up to date");
        return Ok(());
    }

    println!("Running {} migration(s)...", pending.len());
    for migration in &pending {
        run_migration(&db, migration.name()).await?;
    }
    Ok(())
}

async fn run_migration(db: &DatabaseConnection, name: &str) -> Result<(), DbErr> {
    let label = format!("Applying {}", name.bold());
    let dots = ".".repeat(STATUS_COLUMN.saturating_sub(label.len()));
    print!("{}{} ", label, dots);
    io::stdout().flush().ok();

    let start = Instant::now();
    let result = AssertUnwindSafe(Migrator::up(db, Some(1)))
        .catch_unwind()
        .await;

    match result {
        Ok(Ok(())) => {
            let time_str = format!("({:.2?})", start.elapsed()).dimmed();
            println!("{} {}", "done".green(), time_str);
            Ok(())
        }
        Ok(Err(err)) => {
            println!("{}", "failed".red());
            Err(err)
        }
        Err(_) => {
            println!("{}", "panicked".red());
            Err(DbErr::Migration(format!("{name} panicked")))
        }
    }
}
