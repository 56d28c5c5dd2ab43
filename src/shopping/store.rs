use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use super::types::{AggregatedItem, NewShoppingList, RecipeIngredient};

/// Storage collaborators the generator reads from and appends to.
#[async_trait]
pub trait ShoppingStore: Send + Sync {
    /// Every ingredient row of the given recipes, ordered by category then name.
    async fn ingredients_for_recipes(&self, recipe_ids: &[Uuid]) -> Result<Vec<RecipeIngredient>>;

    async fn create_shopping_list(&self, list: &NewShoppingList) -> Result<Uuid>;

    /// All items or an error; never a partial write.
    async fn bulk_create_shopping_items(&self, list_id: Uuid, items: &[AggregatedItem], created_by: &str) -> Result<()>;
}
