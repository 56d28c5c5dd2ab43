use std::time::Instant;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use sqlx::PgPool;
use tracing::Instrument;

use crate::telemetry::{self};
use crate::telemetry::ctx::LogCtx;
use crate::telemetry::ops::init::{Init as InitOp, Phase as InitPhase};

/// foyer init (plan-only by default; use --apply to run migrations)
#[derive(Args)]
pub struct InitCmd {
    #[arg(long, default_value_t = false)]
    pub apply: bool,
}

#[derive(Serialize)]
struct MigrationRow {
    version: i64,
    description: String,
}

#[derive(Serialize)]
struct InitPlan {
    migrations: Vec<MigrationRow>,
}

#[derive(Serialize)]
struct InitResult {
    applied: bool,
    migrations: usize,
}

pub async fn run(pool: &PgPool, args: InitCmd) -> Result<()> {
    let log = telemetry::init();
    let root = log.root_span_kv([("mode", if args.apply { "apply".to_string() } else { "plan".to_string() })]);
    run_in(pool, &log, args.apply).instrument(root).await
}

async fn run_in(pool: &PgPool, log: &LogCtx<InitOp>, apply: bool) -> Result<()> {
    let started = Instant::now();
    let migrator = sqlx::migrate!();
    let migrations: Vec<MigrationRow> = log.span(&InitPhase::Inspect).in_scope(|| {
        migrator
            .iter()
            .map(|m| MigrationRow { version: m.version, description: m.description.to_string() })
            .collect()
    });

    if !apply {
        log.info(format!("📝 Init plan — {} migration(s) into schema `household`", migrations.len()));
        for m in &migrations { log.info(format!("  {} {}", m.version, m.description)); }
        log.info("   Use --apply to execute.");
        if telemetry::config::json_mode() {
            log.plan(&InitPlan { migrations })?;
        }
        return Ok(());
    }

    // idempotent: already-applied versions are skipped
    migrator
        .run(pool)
        .instrument(log.span_kv(&InitPhase::Migrate, [("migrations", migrations.len().to_string())]))
        .await?;
    log.info("✅ Database initialized");
    if telemetry::config::json_mode() {
        log.result_timed(&InitResult { applied: true, migrations: migrations.len() }, started)?;
    }
    Ok(())
}
