use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::store::ShoppingStore;
use super::types::{AggregatedItem, NewShoppingList, RecipeIngredient, GENERATED_PRIORITY};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl ShoppingStore for PgStore {
    async fn ingredients_for_recipes(&self, recipe_ids: &[Uuid]) -> Result<Vec<RecipeIngredient>> {
        let rows = sqlx::query(
            r#"
            SELECT ri.recipe_id, r.name AS recipe_name,
                   ri.name, ri.quantity, ri.unit, ri.category, ri.is_optional
            FROM household.recipe_ingredient ri
            JOIN household.recipe r ON r.id = ri.recipe_id
            WHERE ri.recipe_id = ANY($1)
            ORDER BY ri.category, ri.name
            "#
        )
        .bind(recipe_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(RecipeIngredient {
                recipe_id: row.try_get::<Uuid, _>("recipe_id")?,
                recipe_name: row.try_get::<String, _>("recipe_name")?,
                name: row.try_get::<String, _>("name")?,
                quantity: row.try_get::<Option<String>, _>("quantity")?,
                unit: row.try_get::<Option<String>, _>("unit")?,
                category: row.try_get::<Option<String>, _>("category")?,
                is_optional: row.try_get::<bool, _>("is_optional")?,
            });
        }
        Ok(out)
    }

    async fn create_shopping_list(&self, list: &NewShoppingList) -> Result<Uuid> {
        let row = sqlx::query(
            r#"
            INSERT INTO household.shopping_list (week_start, status, created_by)
            VALUES ($1, $2, $3)
            RETURNING id
            "#
        )
        .bind(list.week_start)
        .bind(list.status.as_str())
        .bind(&list.created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.try_get::<Uuid, _>("id")?)
    }

    async fn bulk_create_shopping_items(&self, list_id: Uuid, items: &[AggregatedItem], created_by: &str) -> Result<()> {
        if items.is_empty() { return Ok(()); }

        let names: Vec<String> = items.iter().map(|i| i.name.clone()).collect();
        let quantities: Vec<String> = items.iter().map(|i| i.quantity.clone()).collect();
        let units: Vec<String> = items.iter().map(|i| i.unit.as_str().to_string()).collect();
        let categories: Vec<String> = items.iter().map(|i| i.category.as_str().to_string()).collect();

        // single statement; WITH ORDINALITY keeps insertion order stable
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO household.shopping_item
                (list_id, name, quantity, unit, category, priority, is_checked, created_by)
            SELECT $1, t.name, t.quantity, t.unit, t.category, $6, FALSE, $7
            FROM UNNEST($2::text[], $3::text[], $4::text[], $5::text[])
                 WITH ORDINALITY AS t(name, quantity, unit, category, ord)
            ORDER BY t.ord
            "#
        )
        .bind(list_id)
        .bind(&names)
        .bind(&quantities)
        .bind(&units)
        .bind(&categories)
        .bind(GENERATED_PRIORITY)
        .bind(created_by)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }
}
