use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use anyhow::{Context, Result};
use dotenvy::dotenv;

mod config;
mod init;
mod output;
mod server;
mod shopping;
mod telemetry;
mod util;

use config::AppConfig;

#[derive(Parser)]
#[command(name = "foyer", about = "Household shopping list generator")]
struct Cli {
    #[arg(global = true, short, long)]
    dsn: Option<String>,
    /// Emit a single JSON envelope to stdout; logs go to stderr
    #[arg(global = true, long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Init(init::InitCmd),
    Shopping(shopping::ShoppingCmd),
    Serve(server::ServeCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    telemetry::config::set_json_mode(cli.json);

    // initialize logging/tracing (stderr). Respect RUST_LOG and FOYER_LOG_FORMAT
    telemetry::config::init_tracing();
    let cfg = AppConfig::from_env();
    let dsn = cli
        .dsn
        .or_else(|| cfg.database_url.clone())
        .context("Please provide --dsn or set DATABASE_URL in .env")?;

    let pool = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .connect(&dsn)
        .await?;

    match cli.command {
        Commands::Init(args) => init::run(&pool, args).await?,
        Commands::Shopping(args) => shopping::run(&pool, args).await?,
        Commands::Serve(args) => server::run(&pool, &cfg, args).await?,
    }

    Ok(())
}
