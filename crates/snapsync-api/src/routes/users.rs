//! User routes: the accounts table behind the dashboard's Users page.
//!
//! Mutations address the user in the JSON body rather than the path, matching the
//! dashboard's edit and delete dialogs.

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use snapsync_common::{
    error::{DbResultExt, SnapError, SnapResult},
    models::{
        CreateUserRequest, DeleteUserRequest, MessageResponse, UpdateUserRequest, User, UserSummary,
    },
    pagination::PageQuery,
    validation::{required, validate_request},
};
use snapsync_db::repository::users;
use std::sync::Arc;

use crate::{
    extract::{ApiJson, ApiQuery},
    routes::Listing,
    AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/users",
        get(list_users)
            .post(create_user)
            .put(update_user)
            .delete(delete_user),
    )
}

/// GET /api/users: All users.
async fn list_users(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> SnapResult<Listing<UserSummary>> {
    const ACTION: &str = "Failed to fetch users";
    let page = query.resolve(&state.config.limits);

    let items = users::list(&state.db.pool, page).await.context(ACTION)?;
    let total = match page {
        Some(_) => Some(users::count(&state.db.pool).await.context(ACTION)?),
        None => None,
    };

    Ok(Listing { items, total })
}

/// POST /api/users: Create a user.
async fn create_user(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<CreateUserRequest>,
) -> SnapResult<Json<User>> {
    let body = body.trimmed();
    let name = required(body.name.as_deref())?;
    let email = required(body.email.as_deref())?;
    let clerk_id = required(body.clerk_id.as_deref())?;
    validate_request(&body)?;

    let user = users::create(&state.db.pool, clerk_id, name, email)
        .await
        .context("Failed to create user")?;

    tracing::info!(user_id = user.id, clerk_id = %user.clerk_id, "User created");
    Ok(Json(user))
}

/// PUT /api/users: Update a user's name and email.
async fn update_user(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<UpdateUserRequest>,
) -> SnapResult<Json<User>> {
    let body = body.trimmed();
    let id = body.id.ok_or_else(SnapError::missing_fields)?;
    let name = required(body.name.as_deref())?;
    let email = required(body.email.as_deref())?;
    validate_request(&body)?;

    let user = users::update(&state.db.pool, id, name, email)
        .await
        .context("Failed to update user")?
        .ok_or_else(|| SnapError::not_found("User"))?;

    tracing::info!(user_id = id, "User updated");
    Ok(Json(user))
}

/// DELETE /api/users: Delete a user. Their images stay, attributed to "Unknown".
async fn delete_user(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<DeleteUserRequest>,
) -> SnapResult<Json<MessageResponse>> {
    let id = body
        .id
        .ok_or_else(|| SnapError::validation("User ID is required"))?;

    let deleted = users::delete(&state.db.pool, id)
        .await
        .context("Failed to delete user")?;
    if !deleted {
        return Err(SnapError::not_found("User"));
    }

    tracing::info!(user_id = id, "User deleted");
    Ok(Json(MessageResponse {
        message: "User deleted successfully",
    }))
}
