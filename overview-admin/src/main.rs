//! # Overview Admin
//!
//! Command line tool for operators of the Overview dashboard.
//!
//! ## Usage
//!
//! ```bash
//! export DATABASE_URL=postgresql://localhost/overview
//! cargo run -p overview-admin -- create-user --email ana@example.com --password '...'
//! cargo run -p overview-admin -- export --output backup.json
//! cargo run -p overview-admin -- import backup.json --merge
//! cargo run -p overview-admin -- migrate
//! ```
//!
//! Logs go to stderr so `export` can be piped.

use anyhow::Context;
use clap::Parser;
use overview_admin::{
    cli::{Cli, Command},
    commands::{self, NewUser},
};
use overview_shared::{
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    store::{postgres::PgDocumentStore, snapshot::ImportMode},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "overview_admin=info,overview_shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let pool = create_pool(DatabaseConfig {
        url: cli.database_url.clone(),
        max_connections: 2,
        ..Default::default()
    })
    .await?;
    run_migrations(&pool).await?;

    let store = PgDocumentStore::new(pool.clone());
    let result = run(&store, cli.command).await;

    close_pool(pool).await;
    result
}

async fn run(store: &PgDocumentStore, command: Command) -> anyhow::Result<()> {
    match command {
        Command::CreateUser {
            email,
            password,
            name,
        } => {
            let user = commands::create_user(store, NewUser::new(&email, password, name)).await?;
            println!("Created user {} ({})", user.email, user.id);
        }
        Command::Export { output } => {
            let json = commands::export(store).await?;
            match output {
                Some(path) => tokio::fs::write(&path, json)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => println!("{json}"),
            }
        }
        Command::Import { file, merge } => {
            let json = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let mode = if merge {
                ImportMode::Merge
            } else {
                ImportMode::Replace
            };
            let snapshot = commands::import(store, &json, mode).await?;
            println!("Imported {} records", snapshot.len());
        }
        Command::Migrate => {
            let report = commands::migrate(store).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
