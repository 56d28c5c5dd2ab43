//! Folds ingredient rows into one item per `(lowercased name, unit)`.

use super::quantity;
use super::types::{AggregatedItem, AggregationKey, Category, RecipeIngredient, Unit};

/// Association list of items in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    entries: Vec<(AggregationKey, AggregatedItem)>,
}

impl Aggregation {
    pub fn new() -> Self { Self::default() }

    /// Fold one row in. The first row for a key fixes name casing,
    /// unit and category; later rows only add to the quantity.
    pub fn with_row(mut self, row: &RecipeIngredient) -> Self {
        let unit = Unit::from_raw(row.unit.as_deref());
        let key = AggregationKey::new(&row.name, &unit);

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, item)) => {
                item.quantity = quantity::combine(&item.quantity, row.quantity.as_deref());
            }
            None => {
                let item = AggregatedItem {
                    name: row.name.clone(),
                    quantity: quantity::or_default(row.quantity.as_deref()).to_string(),
                    unit,
                    category: Category::from_raw(row.category.as_deref()),
                };
                self.entries.push((key, item));
            }
        }
        self
    }

    pub fn into_items(self) -> Vec<AggregatedItem> {
        self.entries.into_iter().map(|(_, item)| item).collect()
    }
}

pub fn aggregate(rows: &[RecipeIngredient]) -> Vec<AggregatedItem> {
    rows.iter()
        .fold(Aggregation::new(), |acc, row| acc.with_row(row))
        .into_items()
}
