//! Dashboard overview counters.

use axum::{extract::State, routing::get, Json, Router};
use snapsync_common::{
    error::{DbResultExt, SnapResult},
    models::DashboardStats,
};
use snapsync_db::repository::{events, images, users};
use std::sync::Arc;

use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/stats", get(get_stats))
}

/// GET /api/stats: Row counts, plus the upstream's face-embedding count when reachable.
async fn get_stats(State(state): State<Arc<AppState>>) -> SnapResult<Json<DashboardStats>> {
    let pool = &state.db.pool;
    let (users, events, images) = tokio::try_join!(
        users::count(pool),
        events::count(pool),
        images::count(pool, None),
    )
    .context("Failed to fetch stats")?;

    // The counters still render without the upstream.
    let embeddings = match &state.upstream {
        Some(upstream) => upstream.embeddings_count().await.unwrap_or_else(|e| {
            tracing::warn!("Embedding count unavailable: {e}");
            None
        }),
        None => None,
    };

    Ok(Json(DashboardStats {
        users,
        events,
        images,
        embeddings,
    }))
}
