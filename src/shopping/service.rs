use chrono::{NaiveDate, Utc};
use tracing::{Instrument, Span};
use uuid::Uuid;

use crate::telemetry::ctx::LogCtx;
use crate::telemetry::ops::shopping::{Phase as ShoppingPhase, Shopping as ShoppingOp};
use crate::util::time::parse_week_start;

use super::aggregate::aggregate;
use super::error::GenerateError;
use super::materialize::{materialize, ListTarget};
use super::store::ShoppingStore;
use super::types::{GenerateInput, GenerateOutcome, GenerateRequest, Preview, RecipeIngredient};

impl GenerateInput {
    /// Validate caller input. Emptiness is checked before anything else.
    pub fn into_request(self, created_by: &str) -> Result<GenerateRequest, GenerateError> {
        let recipe_ids = parse_recipe_ids(&self.recipe_ids)?;
        let list_id = match self.list_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(Uuid::parse_str(raw).map_err(|_| GenerateError::InvalidListId(raw.to_string()))?),
            None => None,
        };
        let week_start = match self.week_start.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(parse_week_start(raw).ok_or_else(|| GenerateError::InvalidWeekStart(raw.to_string()))?),
            None => None,
        };
        Ok(GenerateRequest { recipe_ids, week_start, list_id, created_by: created_by.to_string() })
    }
}

pub fn parse_recipe_ids(raw: &[String]) -> Result<Vec<Uuid>, GenerateError> {
    if raw.is_empty() {
        return Err(GenerateError::EmptyRecipeIds);
    }
    raw.iter()
        .map(|s| Uuid::parse_str(s.trim()).map_err(|_| GenerateError::InvalidRecipeId(s.clone())))
        .collect()
}

/// Source -> aggregate -> materialize.
pub async fn generate(
    store: &dyn ShoppingStore,
    req: GenerateRequest,
    log: Option<&LogCtx<ShoppingOp>>,
) -> Result<GenerateOutcome, GenerateError> {
    let rows = fetch_ingredients(store, &req.recipe_ids, log).await?;

    let items = phase_span(log, &ShoppingPhase::Aggregate).in_scope(|| aggregate(&rows));
    let target = phase_span(log, &ShoppingPhase::ResolveList)
        .in_scope(|| ListTarget::resolve(req.list_id, req.week_start, today()));

    // entered spans must not live across an .await
    let written = materialize(store, target, &items, &req.created_by)
        .instrument(phase_span(log, &ShoppingPhase::AppendItems))
        .await?;

    if let Some(ctx) = log {
        ctx.generate_summary(rows.len(), written.items_added, &written.list_id.to_string(), written.created_list);
    }

    Ok(GenerateOutcome {
        list_id: written.list_id,
        items_added: written.items_added,
        created_list: written.created_list,
        ingredients: rows.len(),
    })
}

/// Source -> aggregate, nothing persisted.
pub async fn preview(
    store: &dyn ShoppingStore,
    recipe_ids: &[Uuid],
    log: Option<&LogCtx<ShoppingOp>>,
) -> Result<Preview, GenerateError> {
    let rows = fetch_ingredients(store, recipe_ids, log).await?;
    let items = phase_span(log, &ShoppingPhase::Aggregate).in_scope(|| aggregate(&rows));
    Ok(Preview { ingredients: rows.len(), items })
}

async fn fetch_ingredients(
    store: &dyn ShoppingStore,
    recipe_ids: &[Uuid],
    log: Option<&LogCtx<ShoppingOp>>,
) -> Result<Vec<RecipeIngredient>, GenerateError> {
    if phase_span(log, &ShoppingPhase::Validate).in_scope(|| recipe_ids.is_empty()) {
        return Err(GenerateError::EmptyRecipeIds);
    }

    let rows = store
        .ingredients_for_recipes(recipe_ids)
        .instrument(phase_span(log, &ShoppingPhase::FetchIngredients))
        .await?;
    if rows.is_empty() {
        if let Some(ctx) = log {
            ctx.warn_kv("no ingredients for recipes", [("recipes", recipe_ids.len().to_string())]);
        }
        return Err(GenerateError::NoIngredients);
    }
    Ok(rows)
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn phase_span(log: Option<&LogCtx<ShoppingOp>>, phase: &ShoppingPhase) -> Span {
    log.map(|ctx| ctx.span(phase)).unwrap_or_else(Span::none)
}
