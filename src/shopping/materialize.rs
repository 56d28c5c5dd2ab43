use anyhow::Result;
use chrono::NaiveDate;
use uuid::Uuid;

use super::store::ShoppingStore;
use super::types::{AggregatedItem, ListStatus, NewShoppingList};

/// Where generated items land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTarget {
    /// Used verbatim; the storage foreign key is the only existence check.
    Existing(Uuid),
    Create { week_start: NaiveDate },
}

impl ListTarget {
    /// `week_start` only matters when a new list is created.
    pub fn resolve(list_id: Option<Uuid>, week_start: Option<NaiveDate>, today: NaiveDate) -> Self {
        match list_id {
            Some(id) => ListTarget::Existing(id),
            None => ListTarget::Create { week_start: week_start.unwrap_or(today) },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Materialized {
    pub list_id: Uuid,
    pub items_added: usize,
    pub created_list: bool,
}

/// Resolve the target list, then append every item. Append-only: items
/// already on the list are never compared against or updated.
pub async fn materialize(
    store: &dyn ShoppingStore,
    target: ListTarget,
    items: &[AggregatedItem],
    created_by: &str,
) -> Result<Materialized> {
    let (list_id, created_list) = match target {
        ListTarget::Existing(id) => (id, false),
        ListTarget::Create { week_start } => {
            let new_list = NewShoppingList {
                week_start,
                status: ListStatus::Planning,
                created_by: created_by.to_string(),
            };
            (store.create_shopping_list(&new_list).await?, true)
        }
    };

    store.bulk_create_shopping_items(list_id, items, created_by).await?;

    Ok(Materialized { list_id, items_added: items.len(), created_list })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shopping::store::memory::MemoryStore;
    use crate::shopping::types::{Category, Unit, GENERATED_PRIORITY};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn item(name: &str, quantity: &str) -> AggregatedItem {
        AggregatedItem {
            name: name.into(),
            quantity: quantity.into(),
            unit: Unit::from_raw(Some("g")),
            category: Category::from_raw(Some("épicerie")),
        }
    }

    #[test]
    fn resolve_prefers_existing_list() {
        let id = Uuid::new_v4();
        let t = ListTarget::resolve(Some(id), Some(date(2026, 1, 5)), date(2026, 10, 18));
        assert_eq!(t, ListTarget::Existing(id));
    }

    #[test]
    fn resolve_defaults_week_start_to_today() {
        let t = ListTarget::resolve(None, None, date(2026, 10, 18));
        assert_eq!(t, ListTarget::Create { week_start: date(2026, 10, 18) });
        let t = ListTarget::resolve(None, Some(date(2026, 10, 12)), date(2026, 10, 18));
        assert_eq!(t, ListTarget::Create { week_start: date(2026, 10, 12) });
    }

    #[tokio::test]
    async fn creates_planning_list_owned_by_caller() {
        let store = MemoryStore::new();
        let out = materialize(&store, ListTarget::Create { week_start: date(2026, 10, 12) }, &[item("Riz", "500")], "user-1")
            .await
            .unwrap();

        assert!(out.created_list);
        assert_eq!(out.items_added, 1);
        let lists = store.lists();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].id, out.list_id);
        assert_eq!(lists[0].list.status, ListStatus::Planning);
        assert_eq!(lists[0].list.created_by, "user-1");
        assert_eq!(lists[0].list.week_start, date(2026, 10, 12));
    }

    #[tokio::test]
    async fn appended_items_are_wished_for_and_unchecked() {
        let store = MemoryStore::new();
        let out = materialize(&store, ListTarget::Create { week_start: date(2026, 10, 12) }, &[item("Riz", "500"), item("Sucre", "1")], "user-1")
            .await
            .unwrap();
        let items = store.items_in(out.list_id);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.priority == GENERATED_PRIORITY && !i.is_checked));
        assert_eq!(items[0].item.name, "Riz");
        assert_eq!(items[1].item.name, "Sucre");
        assert_ne!(items[0].id, items[1].id);
    }

    #[tokio::test]
    async fn existing_target_is_not_recreated() {
        let store = MemoryStore::new();
        let id = store.seed_list(NewShoppingList { week_start: date(2026, 10, 5), status: ListStatus::Final, created_by: "other".into() });
        let out = materialize(&store, ListTarget::Existing(id), &[item("Riz", "500")], "user-1").await.unwrap();

        assert!(!out.created_list);
        assert_eq!(out.list_id, id);
        assert_eq!(store.lists().len(), 1);
        // list fields untouched
        assert_eq!(store.lists()[0].list.status, ListStatus::Final);
        assert_eq!(store.calls(), vec!["bulk_create_shopping_items"]);
    }

    #[tokio::test]
    async fn done_list_still_accepts_appends() {
        let store = MemoryStore::new();
        let id = store.seed_list(NewShoppingList { week_start: date(2026, 9, 28), status: ListStatus::Done, created_by: "other".into() });
        let out = materialize(&store, ListTarget::Existing(id), &[item("Riz", "500"), item("Sel", "1")], "user-1").await.unwrap();

        assert_eq!(out.items_added, 2);
        assert_eq!(store.items_in(id).len(), 2);
        assert_eq!(store.lists()[0].list.status, ListStatus::Done);
    }

    #[tokio::test]
    async fn unknown_target_surfaces_storage_error() {
        let store = MemoryStore::new();
        let err = materialize(&store, ListTarget::Existing(Uuid::new_v4()), &[item("Riz", "500")], "user-1")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("foreign key"));
        assert!(store.items().is_empty());
    }
}
