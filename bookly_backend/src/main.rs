use anyhow::Result;
use bookly_backend::api;
use bookly_backend::bootstrap;
use bookly_backend::config::BooklyConfig;
use bookly_backend::seed;
use bookly_backend::telemetry;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about = "Bookly profile and activity backend")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (Axum) for REST/API access
    Serve,
    /// Load the demo profiles, books and listings into the local database
    Seed,
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    let args = Args::parse();

    let config = BooklyConfig::from_env()?;
    let resources = bootstrap::initialize(&config)?;
    tracing::info!(
        db_path = %config.paths.db_path.display(),
        database_initialized = resources.database_initialized,
        directories_created = ?resources.directories_created,
        "bootstrap complete"
    );

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => api::serve_http(config, resources.database).await,
        Command::Seed => {
            let database = resources.database;
            let summary =
                tokio::task::spawn_blocking(move || seed::seed_demo_data(&database)).await??;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
    }
}
