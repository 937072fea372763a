//! books-schema: ensure the catalogue's unique indexes exist.
//!
//! Usage:
//!   books-schema                 # provision the indexes (same as `init`)
//!   books-schema verify          # report which declared indexes are in place
//!   books-schema ping            # check the storage engine is reachable

use anyhow::{bail, Context};
use books_db::{SchemaInitializer, SchemaStore};
use books_kernel::settings::Settings;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "books-schema",
    about = "Provision unique indexes for the books catalogue",
    version
)]
struct Cli {
    /// Connection string of the storage engine; overrides configuration.
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Logical database to provision; overrides configuration.
    #[arg(long, global = true)]
    database: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Ensure every declared index exists.
    Init,
    /// List each declared index and whether the engine has it.
    Verify,
    /// Check that the storage engine is reachable.
    Ping,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load settings")?;
    if let Some(endpoint) = cli.endpoint {
        settings.database.endpoint = endpoint;
    }
    if let Some(database) = cli.database {
        settings.database.database = database;
    }

    books_telemetry::init(&settings.telemetry)?;

    tracing::debug!(
        env = ?settings.environment,
        database = %settings.database.database,
        "books-schema starting"
    );

    let registry = books_schema::registry()?;
    let declarations = registry.collect_indexes();
    let store = books_db::connect(&settings.database).await?;

    match cli.command.unwrap_or(Command::Init) {
        Command::Init => {
            let report = SchemaInitializer::new(&store).run(&declarations).await?;
            tracing::info!(indexes = report.applied.len(), "schema provisioned");
        }
        Command::Verify => {
            let report = SchemaInitializer::new(&store).verify(&declarations).await?;
            for entry in &report.entries {
                println!("{}\t{}\t{}", entry.collection, entry.index_name, entry.status);
            }
            if !report.is_satisfied() {
                bail!("declared indexes are not all in place");
            }
        }
        Command::Ping => {
            store.ping().await?;
            tracing::info!(database = %settings.database.database, "storage engine reachable");
        }
    }

    Ok(())
}
