use std::time::Instant;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use sqlx::PgPool;
use tracing::Instrument;

use crate::telemetry::{self};
use crate::telemetry::ctx::LogCtx;
use crate::telemetry::ops::shopping::Shopping as ShoppingOp;

pub mod aggregate;
pub mod db;
pub mod error;
pub mod materialize;
pub mod quantity;
pub mod service;
pub mod store;
pub mod types;

use db::PgStore;
use store::ShoppingStore;
use types::{AggregatedItem, GenerateInput, GenerateRequest};

// recorded as owner on a plan-mode request; nothing is written in plan mode
const PLAN_OWNER: &str = "plan";

/// foyer shopping generate
#[derive(Args)]
pub struct ShoppingCmd {
    #[command(subcommand)]
    pub cmd: ShoppingSub,
}

#[derive(Subcommand)]
pub enum ShoppingSub {
    // aggregate recipes into a shopping list (plan-only by default; use --apply to write)
    Generate {
        /// Recipe id; repeat for several recipes
        #[arg(long = "recipe")]
        recipes: Vec<String>,
        /// Append to this list instead of creating one
        #[arg(long)]
        list_id: Option<String>,
        /// Week start for a new list (YYYY-MM-DD); defaults to today
        #[arg(long)]
        week_start: Option<String>,
        /// Owner recorded on created rows
        #[arg(long)]
        user: Option<String>,
        #[arg(long, default_value_t = false)]
        apply: bool,
    },
}

#[derive(Serialize)]
struct GeneratePlan<'a> {
    recipes: usize,
    ingredients: usize,
    target: &'a str,
    items: &'a [AggregatedItem],
}

#[derive(Serialize)]
struct GenerateResult {
    list_id: String,
    items_added: usize,
    created_list: bool,
}

pub async fn run(pool: &PgPool, args: ShoppingCmd) -> Result<()> {
    match args.cmd {
        ShoppingSub::Generate { recipes, list_id, week_start, user, apply } => {
            let input = GenerateInput { recipe_ids: recipes, week_start, list_id };
            generate(pool, input, user, apply).await
        }
    }
}

async fn generate(pool: &PgPool, input: GenerateInput, user: Option<String>, apply: bool) -> Result<()> {
    let log = telemetry::shopping();
    let root = log.root_span_kv([
        ("mode", if apply { "apply".to_string() } else { "plan".to_string() }),
        ("recipes", input.recipe_ids.len().to_string()),
        ("list_id", format!("{:?}", input.list_id)),
        ("week_start", format!("{:?}", input.week_start)),
    ]);
    let store = PgStore::new(pool.clone());
    generate_with(&store, &log, input, user.as_deref(), apply).instrument(root).await
}

async fn generate_with(
    store: &dyn ShoppingStore,
    log: &LogCtx<ShoppingOp>,
    input: GenerateInput,
    user: Option<&str>,
    apply: bool,
) -> Result<()> {
    let started = Instant::now();
    let req = checked_request(input, user, apply)?;

    if !apply {
        let preview = service::preview(store, &req.recipe_ids, Some(log)).await?;
        let target = req.list_id.map_or_else(|| "new list".to_string(), |id| id.to_string());
        log.info(format!("📝 Shopping plan — recipes={} ingredients={} items={} target={}",
            req.recipe_ids.len(), preview.ingredients, preview.items.len(), target));
        for item in &preview.items {
            log.info(format!("  [{}] {} {} {}", item.category.as_str(), item.name, item.quantity, item.unit.as_str()));
        }
        log.info("   Use --apply to execute.");
        if telemetry::config::json_mode() {
            let plan = GeneratePlan { recipes: req.recipe_ids.len(), ingredients: preview.ingredients, target: &target, items: &preview.items };
            log.plan(&plan)?;
        }
        return Ok(());
    }

    let outcome = service::generate(store, req, Some(log)).await?;
    if telemetry::config::json_mode() {
        let result = GenerateResult {
            list_id: outcome.list_id.to_string(),
            items_added: outcome.items_added,
            created_list: outcome.created_list,
        };
        log.result_timed(&result, started)?;
    }
    Ok(())
}

/// Plan and apply reject the same inputs; only apply needs a real owner.
fn checked_request(input: GenerateInput, user: Option<&str>, apply: bool) -> Result<GenerateRequest> {
    let user = user.map(str::trim).filter(|u| !u.is_empty());
    let owner = match (user, apply) {
        (Some(u), _) => u,
        (None, true) => bail!("--user is required with --apply"),
        (None, false) => PLAN_OWNER,
    };
    Ok(input.into_request(owner)?)
}
