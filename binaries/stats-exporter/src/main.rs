use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use orders_dao::OrderDao;
use sql_connection::{PostgresDbConfig, SqlConnect, connect_postgres_db};
use statistics::{
    DEFAULT_LIMIT_DAYS, EXPORT_FILE_NAME, StatisticsService, export_workbook,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "stats-exporter")]
#[command(about = "Compute café order statistics from the orders database")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Bucketing mode: day, week, month or individual
    #[arg(long, default_value = "day")]
    by: String,

    /// Days to look back from now
    #[arg(long, default_value_t = DEFAULT_LIMIT_DAYS, allow_negative_numbers = true)]
    limit: i64,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the report as JSON
    Json,
    /// Write the report as an xlsx workbook
    Xlsx {
        #[arg(short, long, default_value = EXPORT_FILE_NAME)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    info!("Initializing connection pool...");
    connect_postgres_db(&PostgresDbConfig::from_env()).await?;
    let db = SqlConnect::from_global()
        .context("Postgres pool was not registered")?;

    let service = StatisticsService::new(Arc::new(OrderDao::new(db)));
    let stats = service.get_statistics(&cli.by, cli.limit).await?;

    match cli.command {
        Commands::Json => {
            println!("{}", serde_json::to_string_pretty(&*stats)?);
        }
        Commands::Xlsx { output } => {
            let bytes = export_workbook(&stats)?;
            std::fs::write(&output, bytes).with_context(|| {
                format!("Failed to write {}", output.display())
            })?;
            info!("Exported statistics to: {}", output.display());
        }
    }

    Ok(())
}
