//! Event routes: list, create, edit, delete.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use snapsync_common::{
    error::{DbResultExt, SnapError, SnapResult},
    ids::generate_id,
    models::{Event, EventForm, MessageResponse},
    pagination::PageQuery,
    validation::validate_request,
};
use snapsync_db::repository::events;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    extract::{ApiJson, ApiPath, ApiQuery},
    routes::Listing,
    AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/{id}", put(update_event).delete(delete_event))
}

/// GET /api/events: All events, newest first.
async fn list_events(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> SnapResult<Listing<Event>> {
    const ACTION: &str = "Failed to fetch events";
    let page = query.resolve(&state.config.limits);

    let items = events::list(&state.db.pool, page).await.context(ACTION)?;
    let total = match page {
        Some(_) => Some(events::count(&state.db.pool).await.context(ACTION)?),
        None => None,
    };

    Ok(Listing { items, total })
}

/// POST /api/events: Create an event.
async fn create_event(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<EventForm>,
) -> SnapResult<(StatusCode, Json<Event>)> {
    validate_request(&body)?;
    let input = body.into_input()?;

    let event = events::create(&state.db.pool, generate_id(), &input)
        .await
        .context("Failed to create event")?;

    tracing::info!(event_id = %event.id, name = %event.name, "Event created");
    Ok((StatusCode::CREATED, Json(event)))
}

/// PUT /api/events/{id}: Replace an event's name, date and description.
async fn update_event(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<EventForm>,
) -> SnapResult<Json<Event>> {
    validate_request(&body)?;
    let input = body.into_input()?;

    let event = events::update(&state.db.pool, id, &input)
        .await
        .context("Failed to update event")?
        .ok_or_else(|| SnapError::not_found("Event"))?;

    tracing::info!(event_id = %id, "Event updated");
    Ok(Json(event))
}

/// DELETE /api/events/{id}: Delete an event. Its images stay, detached.
async fn delete_event(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
) -> SnapResult<Json<MessageResponse>> {
    let deleted = events::delete(&state.db.pool, id)
        .await
        .context("Failed to delete event")?;
    if !deleted {
        return Err(SnapError::not_found("Event"));
    }

    tracing::info!(event_id = %id, "Event deleted");
    Ok(Json(MessageResponse {
        message: "Event deleted successfully",
    }))
}
