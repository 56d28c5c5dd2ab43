use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_UNIT: &str = "piece";
pub const DEFAULT_CATEGORY: &str = "autre";
pub const DEFAULT_QUANTITY: &str = "1";
/// Priority given to every generated item ("wished-for").
pub const GENERATED_PRIORITY: &str = "souhaité";

/// Measurement unit as written on the recipe. Compared verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Unit(String);

impl Unit {
    /// Missing or empty units collapse to `piece`.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some(u) if !u.is_empty() => Unit(u.to_string()),
            _ => Unit(DEFAULT_UNIT.to_string()),
        }
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Missing or empty categories collapse to `autre`.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some(c) if !c.is_empty() => Category(c.to_string()),
            _ => Category(DEFAULT_CATEGORY.to_string()),
        }
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

/// One ingredient row as stored, joined with its recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeIngredient {
    pub recipe_id: Uuid,
    pub recipe_name: String,
    pub name: String,
    pub quantity: Option<String>,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub is_optional: bool,
}

/// Two rows with equal keys are the same shopping item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AggregationKey {
    pub name: String,
    pub unit: Unit,
}

impl AggregationKey {
    pub fn new(name: &str, unit: &Unit) -> Self {
        AggregationKey { name: name.to_lowercase(), unit: unit.clone() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedItem {
    pub name: String,
    pub quantity: String,
    pub unit: Unit,
    pub category: Category,
}

/// Mirrors the `shopping_list.status` check constraint. Only `Planning`
/// is written here; lists move to `final`/`done` through list CRUD elsewhere.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStatus {
    Planning,
    Final,
    Done,
}

impl ListStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListStatus::Planning => "planning",
            ListStatus::Final => "final",
            ListStatus::Done => "done",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewShoppingList {
    pub week_start: NaiveDate,
    pub status: ListStatus,
    pub created_by: String,
}

/// Caller input before validation; shared by the HTTP body and the CLI.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateInput {
    #[serde(default)]
    pub recipe_ids: Vec<String>,
    #[serde(default)]
    pub week_start: Option<String>,
    #[serde(default)]
    pub list_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub recipe_ids: Vec<Uuid>,
    pub week_start: Option<NaiveDate>,
    pub list_id: Option<Uuid>,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateOutcome {
    pub list_id: Uuid,
    pub items_added: usize,
    pub created_list: bool,
    pub ingredients: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub ingredients: usize,
    pub items: Vec<AggregatedItem>,
}
