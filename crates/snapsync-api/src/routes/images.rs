//! Image routes: multipart upload, listing, rename, delete, raw content.
//!
//! POST   /api/images              : Upload one or more files (multipart/form-data)
//! GET    /api/images              : List with inlined data URIs
//! PATCH  /api/images              : Rename `{id, name}`
//! DELETE /api/images              : Delete `{id}`
//! GET    /api/images/{id}/content : Raw bytes

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use snapsync_common::{
    error::{DbResultExt, SnapError, SnapResult},
    models::{
        DeleteImageRequest, ImageListQuery, ImageResponse, ImageSummary, NewImage,
        RenameImageRequest, SuccessResponse,
    },
    validation::{required, validate_request},
};
use snapsync_db::repository::{events, images, users};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    extract::{ApiJson, ApiMultipart, ApiPath, ApiQuery},
    routes::Listing,
    AppState,
};

const UPLOAD_ACTION: &str = "Failed to upload images";

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/images",
            get(list_images)
                .post(upload_images)
                .patch(rename_image)
                .delete(delete_image),
        )
        .route("/images/{id}/content", get(get_image_content))
}

// ============================================================
// GET /images
// ============================================================

/// List images newest first, with event name and uploader resolved.
async fn list_images(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ImageListQuery>,
) -> SnapResult<Listing<ImageResponse>> {
    const ACTION: &str = "Failed to fetch images";
    let page = query.page_query().resolve(&state.config.limits);
    let search = query.search_term();

    let rows = images::list(&state.db.pool, search, page)
        .await
        .context(ACTION)?;
    let total = match page {
        Some(_) => Some(images::count(&state.db.pool, search).await.context(ACTION)?),
        None => None,
    };

    Ok(Listing {
        items: rows.into_iter().map(ImageResponse::from).collect(),
        total,
    })
}

// ============================================================
// POST /images
// ============================================================

/// Fields collected from the upload form.
#[derive(Default)]
struct UploadForm {
    files: Vec<NewImage>,
    event_id: Option<String>,
    created_by: Option<String>,
}

/// Upload images via multipart/form-data.
///
/// Form fields:
/// - `images`: one part per file (required, repeatable)
/// - `event_id` / `eventId`: event the images belong to (required)
/// - `created_by` / `createdBy`: uploader's clerk ID (required)
async fn upload_images(
    State(state): State<Arc<AppState>>,
    ApiMultipart(multipart): ApiMultipart,
) -> SnapResult<(StatusCode, Json<Vec<ImageSummary>>)> {
    let form = read_upload_form(multipart, state.config.limits.max_files_per_upload).await?;

    if form.files.is_empty() {
        return Err(SnapError::missing_fields());
    }
    let event_id = required(form.event_id.as_deref())?;
    let created_by = required(form.created_by.as_deref())?;
    let event_id =
        Uuid::parse_str(event_id).map_err(|_| SnapError::validation("Invalid event ID"))?;

    let pool = &state.db.pool;
    if users::find_by_clerk_id(pool, created_by)
        .await
        .context(UPLOAD_ACTION)?
        .is_none()
    {
        return Err(SnapError::validation("Invalid user ID"));
    }
    if !events::exists(pool, event_id).await.context(UPLOAD_ACTION)? {
        return Err(SnapError::validation("Invalid event ID"));
    }

    let created = images::create_many(pool, event_id, created_by, &form.files)
        .await
        .context(UPLOAD_ACTION)?;

    tracing::info!(
        %event_id,
        created_by,
        count = created.len(),
        "Images uploaded"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

async fn read_upload_form(mut multipart: Multipart, max_files: usize) -> SnapResult<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("images") => {
                let name = field
                    .file_name()
                    .map(str::to_owned)
                    .unwrap_or_else(|| "upload".into());
                let content_type = resolve_content_type(field.content_type(), &name);

                let bytes = field.bytes().await?;
                // Browsers send an empty part when no file was picked.
                if bytes.is_empty() {
                    continue;
                }
                if !content_type.starts_with("image/") {
                    return Err(SnapError::validation(format!(
                        "File type '{content_type}' is not allowed"
                    )));
                }
                if form.files.len() == max_files {
                    return Err(SnapError::validation(format!(
                        "Too many files (max {max_files} per upload)"
                    )));
                }

                form.files.push(NewImage {
                    name,
                    content_type,
                    data: bytes.to_vec(),
                });
            }
            Some("event_id" | "eventId") => {
                form.event_id = Some(read_text(field).await?);
            }
            Some("created_by" | "createdBy") => {
                form.created_by = Some(read_text(field).await?);
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> SnapResult<String> {
    Ok(field.text().await?)
}

/// Use the part's declared type unless it is missing or generic, then guess from the file name.
fn resolve_content_type(declared: Option<&str>, file_name: &str) -> String {
    match declared {
        Some(ct) if !ct.is_empty() && ct != "application/octet-stream" => ct.to_owned(),
        _ => mime_guess::from_path(file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_owned(),
    }
}

// ============================================================
// PATCH / DELETE /images
// ============================================================

/// Rename an image.
async fn rename_image(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<RenameImageRequest>,
) -> SnapResult<Json<ImageSummary>> {
    let id = body.id.ok_or_else(SnapError::missing_fields)?;
    let name = required(body.name.as_deref())?;
    validate_request(&body)?;

    let image = images::rename(&state.db.pool, id, name)
        .await
        .context("Failed to update image")?
        .ok_or_else(|| SnapError::not_found("Image"))?;

    tracing::info!(image_id = %id, "Image renamed");
    Ok(Json(image))
}

/// Delete an image.
async fn delete_image(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<DeleteImageRequest>,
) -> SnapResult<Json<SuccessResponse>> {
    let id = body.id.ok_or_else(SnapError::missing_fields)?;

    let deleted = images::delete(&state.db.pool, id)
        .await
        .context("Failed to delete image")?;
    if !deleted {
        return Err(SnapError::not_found("Image"));
    }

    tracing::info!(image_id = %id, "Image deleted");
    Ok(Json(SuccessResponse::OK))
}

// ============================================================
// GET /images/{id}/content
// ============================================================

async fn get_image_content(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
) -> SnapResult<impl IntoResponse> {
    let content = images::find_content(&state.db.pool, id)
        .await
        .context("Failed to fetch image")?
        .ok_or_else(|| SnapError::not_found("Image"))?;

    Ok((
        [(header::CONTENT_TYPE, content.content_type)],
        content.image_data,
    ))
}
