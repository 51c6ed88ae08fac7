use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::error::ApiError;
use crate::model::{Contact, ContactList, CreateContactRequest, UpdateContactRequest};
use crate::service::ContactService;

#[derive(Clone)]
pub struct AppState {
    service: Arc<ContactService>,
}

pub fn app(service: ContactService) -> Router {
    let state = AppState {
        service: Arc::new(service),
    };

    Router::new()
        .route("/health", get(health))
        .route("/contacts", get(list_contacts).post(create_contact))
        .route(
            "/contacts/:id",
            get(get_contact).patch(update_contact).delete(delete_contact),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn create_contact(
    State(state): State<AppState>,
    Json(payload): Json<CreateContactRequest>,
) -> Result<(StatusCode, Json<Contact>), ApiError> {
    let contact = state.service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

async fn list_contacts(State(state): State<AppState>) -> Result<Json<ContactList>, ApiError> {
    let list = state.service.list().await?;
    Ok(Json(list))
}

async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Contact>, ApiError> {
    let contact = state.service.get(id).await?;
    Ok(Json(contact))
}

async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateContactRequest>,
) -> Result<Json<Contact>, ApiError> {
    let contact = state.service.update(id, payload).await?;
    Ok(Json(contact))
}

async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.service.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
