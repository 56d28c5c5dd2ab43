use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use crate::shopping::service;
use crate::shopping::store::ShoppingStore;
use crate::shopping::types::{GenerateInput, Preview};
use crate::telemetry;

use super::error::ApiError;

/// Set by the upstream auth layer.
pub const USER_HEADER: &str = "x-user-id";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ShoppingStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ShoppingStore>) -> Self { Self { store } }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct GenerateResponse {
    pub list_id: String,
    pub items_added: usize,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// POST /recipes/generate-shopping-list
pub async fn generate_shopping_list(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<GenerateInput>, JsonRejection>,
) -> Result<(StatusCode, Json<GenerateResponse>), ApiError> {
    let started = Instant::now();
    let res = generate_inner(&state, &headers, body).await;
    log_request("/recipes/generate-shopping-list", &res, started);
    res
}

async fn generate_inner(
    state: &AppState,
    headers: &HeaderMap,
    body: Result<Json<GenerateInput>, JsonRejection>,
) -> Result<(StatusCode, Json<GenerateResponse>), ApiError> {
    let user = current_user(headers)?;
    let Json(input) = body.map_err(|rej| ApiError::bad_request(rej.body_text()))?;
    let req = input.into_request(&user)?;

    let log = telemetry::shopping();
    let outcome = service::generate(state.store.as_ref(), req, Some(&log)).await?;

    let resp = GenerateResponse { list_id: outcome.list_id.to_string(), items_added: outcome.items_added };
    Ok((StatusCode::CREATED, Json(resp)))
}

/// POST /recipes/shopping-list-preview
pub async fn preview_shopping_list(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<GenerateInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Preview>), ApiError> {
    let started = Instant::now();
    let res = preview_inner(&state, &headers, body).await;
    log_request("/recipes/shopping-list-preview", &res, started);
    res
}

async fn preview_inner(
    state: &AppState,
    headers: &HeaderMap,
    body: Result<Json<GenerateInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Preview>), ApiError> {
    current_user(headers)?;
    let Json(input) = body.map_err(|rej| ApiError::bad_request(rej.body_text()))?;
    let recipe_ids = service::parse_recipe_ids(&input.recipe_ids)?;

    let log = telemetry::shopping();
    let preview = service::preview(state.store.as_ref(), &recipe_ids, Some(&log)).await?;
    Ok((StatusCode::OK, Json(preview)))
}

fn current_user(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::new(StatusCode::UNAUTHORIZED, "authentication required"))
}

fn log_request<T>(route: &'static str, res: &Result<(StatusCode, T), ApiError>, started: Instant) {
    let status = match res {
        Ok((status, _)) => *status,
        Err(err) => err.status,
    };
    telemetry::serve().request_done(route, status.as_u16(), started.elapsed().as_millis());
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::header::CONTENT_TYPE;
    use axum::http::{HeaderValue, Request};
    use axum::response::IntoResponse;
    use uuid::Uuid;

    use crate::shopping::store::memory::MemoryStore;
    use crate::shopping::types::RecipeIngredient;

    fn ingredient(recipe_id: Uuid, name: &str, quantity: Option<&str>, unit: Option<&str>) -> RecipeIngredient {
        RecipeIngredient {
            recipe_id,
            recipe_name: "Crêpes".into(),
            name: name.into(),
            quantity: quantity.map(str::to_string),
            unit: unit.map(str::to_string),
            category: Some("épicerie".into()),
            is_optional: false,
        }
    }

    fn setup() -> (Arc<MemoryStore>, AppState, Uuid, Uuid) {
        let crepes = Uuid::new_v4();
        let empty = Uuid::new_v4();
        let store = Arc::new(MemoryStore::with_ingredients(vec![
            ingredient(crepes, "Farine", Some("250"), Some("g")),
            ingredient(crepes, "Lait", Some("500"), Some("ml")),
            ingredient(crepes, "Oeuf", Some("3"), None),
            ingredient(crepes, "lait", Some("1"), Some("litre")),
        ]));
        let state = AppState::new(store.clone());
        (store, state, crepes, empty)
    }

    fn user_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_HEADER, HeaderValue::from_static("user-1"));
        headers
    }

    fn body(recipe_ids: &[Uuid], list_id: Option<Uuid>) -> Result<Json<GenerateInput>, JsonRejection> {
        Ok(Json(GenerateInput {
            recipe_ids: recipe_ids.iter().map(Uuid::to_string).collect(),
            week_start: Some("2026-10-12".into()),
            list_id: list_id.map(|id| id.to_string()),
        }))
    }

    async fn raw_body(content_type: Option<&str>, raw: impl Into<String>) -> Result<Json<GenerateInput>, JsonRejection> {
        let mut req = Request::builder().method("POST").uri("/recipes/generate-shopping-list");
        if let Some(ct) = content_type {
            req = req.header(CONTENT_TYPE, ct);
        }
        Json::<GenerateInput>::from_request(req.body(Body::from(raw.into())).unwrap(), &()).await
    }

    async fn rejected(store: &MemoryStore, state: AppState, body: Result<Json<GenerateInput>, JsonRejection>) -> Value {
        let err = generate_shopping_list(State(state), user_headers(), body).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(store.calls().is_empty());

        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let v: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["success"], false);
        v
    }

    #[tokio::test]
    async fn truncated_json_is_400() {
        let (store, state, _, _) = setup();
        let v = rejected(&store, state, raw_body(Some("application/json"), "{").await).await;
        assert!(v["error"].as_str().unwrap().contains("Failed to parse"), "{v}");
    }

    #[tokio::test]
    async fn wrong_field_type_is_400() {
        let (store, state, _, _) = setup();
        let v = rejected(&store, state, raw_body(Some("application/json"), r#"{"recipe_ids":"x"}"#).await).await;
        assert!(v["error"].as_str().unwrap().contains("expected a sequence"), "{v}");
    }

    #[tokio::test]
    async fn missing_content_type_is_400() {
        let (store, state, crepes, _) = setup();
        let raw = format!(r#"{{"recipe_ids":["{crepes}"]}}"#);
        let v = rejected(&store, state, raw_body(None, raw).await).await;
        assert!(v["error"].as_str().unwrap().contains("Content-Type"), "{v}");
    }

    #[tokio::test]
    async fn well_formed_raw_body_is_accepted() {
        let (store, state, crepes, _) = setup();
        let raw = format!(r#"{{"recipe_ids":["{crepes}"]}}"#);
        let (status, Json(resp)) = generate_shopping_list(State(state), user_headers(), raw_body(Some("application/json"), raw).await)
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(resp.items_added, 4);
        assert_eq!(store.lists().len(), 1);
    }

    #[tokio::test]
    async fn generate_returns_201_with_list_and_count() {
        let (store, state, crepes, _) = setup();
        let (status, Json(resp)) = generate_shopping_list(State(state), user_headers(), body(&[crepes], None))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(resp.items_added, 4);
        let lists = store.lists();
        assert_eq!(lists.len(), 1);
        assert_eq!(resp.list_id, lists[0].id.to_string());
        assert_eq!(lists[0].list.created_by, "user-1");
    }

    #[tokio::test]
    async fn generate_twice_on_same_list_doubles_items() {
        let (store, state, crepes, _) = setup();
        let (_, Json(first)) = generate_shopping_list(State(state.clone()), user_headers(), body(&[crepes], None))
            .await
            .unwrap();
        let list_id = Uuid::parse_str(&first.list_id).unwrap();

        let (_, Json(second)) = generate_shopping_list(State(state), user_headers(), body(&[crepes], Some(list_id)))
            .await
            .unwrap();

        assert_eq!(second.list_id, first.list_id);
        assert_eq!(second.items_added, first.items_added);
        assert_eq!(store.items_in(list_id).len(), first.items_added * 2);
    }

    #[tokio::test]
    async fn empty_recipe_ids_is_400_without_storage_calls() {
        let (store, state, _, _) = setup();
        let err = generate_shopping_list(State(state), user_headers(), body(&[], None))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn recipes_without_ingredients_is_400() {
        let (store, state, _, empty) = setup();
        let err = generate_shopping_list(State(state), user_headers(), body(&[empty], None))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(store.lists().is_empty());
    }

    #[tokio::test]
    async fn unknown_list_id_is_500_with_storage_message() {
        let (_, state, crepes, _) = setup();
        let err = generate_shopping_list(State(state), user_headers(), body(&[crepes], Some(Uuid::new_v4())))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message.contains("foreign key"));
    }

    #[tokio::test]
    async fn missing_user_is_401() {
        let (store, state, crepes, _) = setup();
        let err = generate_shopping_list(State(state), HeaderMap::new(), body(&[crepes], None))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn preview_lists_items_without_writing() {
        let (store, state, crepes, _) = setup();
        let (status, Json(preview)) = preview_shopping_list(State(state), user_headers(), body(&[crepes], None))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(preview.ingredients, 4);
        assert_eq!(preview.items.len(), 4);
        assert!(store.lists().is_empty());
    }

    #[tokio::test]
    async fn health_is_ok() {
        let Json(v) = health().await;
        assert_eq!(v["status"], "ok");
    }
}
