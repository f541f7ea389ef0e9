//! Image repository: the `images` table and its joins.
//!
//! Image bytes live in the row itself (`BYTEA`). Listing queries join the event
//! name and uploader so the dashboard table can render without further lookups.

use snapsync_common::ids::generate_id;
use snapsync_common::models::{ImageContent, ImageRow, ImageSummary, NewImage};
use snapsync_common::pagination::Page;
use sqlx::PgPool;
use uuid::Uuid;

const SUMMARY_COLUMNS: &str =
    "id, name, content_type, octet_length(image_data) AS size, event_id, created_by, created_at";

// ============================================================
// Read
// ============================================================

/// List images newest first, optionally filtered by a search term on the image or event name.
pub async fn list(
    pool: &PgPool,
    search: Option<&str>,
    page: Option<Page>,
) -> Result<Vec<ImageRow>, sqlx::Error> {
    sqlx::query_as::<_, ImageRow>(
        r#"
        SELECT
            i.id, i.name, i.content_type, i.image_data,
            e.name AS event_name,
            u.clerk_id AS created_by,
            i.created_at
        FROM images i
        LEFT JOIN events e ON e.id = i.event_id
        LEFT JOIN users u ON u.clerk_id = i.created_by
        WHERE $1::text IS NULL
           OR i.name ILIKE $1 ESCAPE '\'
           OR e.name ILIKE $1 ESCAPE '\'
        ORDER BY i.created_at DESC, i.id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(search.map(contains_pattern))
    .bind(page.map(|p| p.limit()))
    .bind(page.map_or(0, |p| p.offset()))
    .fetch_all(pool)
    .await
}

/// Count images matching the same filter as [`list`].
pub async fn count(pool: &PgPool, search: Option<&str>) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM images i
        LEFT JOIN events e ON e.id = i.event_id
        WHERE $1::text IS NULL
           OR i.name ILIKE $1 ESCAPE '\'
           OR e.name ILIKE $1 ESCAPE '\'
        "#,
    )
    .bind(search.map(contains_pattern))
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

/// Fetch the stored bytes and content type of one image.
pub async fn find_content(pool: &PgPool, id: Uuid) -> Result<Option<ImageContent>, sqlx::Error> {
    sqlx::query_as::<_, ImageContent>(
        "SELECT content_type, image_data FROM images WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

// ============================================================
// Write
// ============================================================

/// Insert a batch of uploaded files in one transaction. Either every file lands or none does.
pub async fn create_many(
    pool: &PgPool,
    event_id: Uuid,
    created_by: &str,
    files: &[NewImage],
) -> Result<Vec<ImageSummary>, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO images (id, name, content_type, image_data, event_id, created_by, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, NOW())
        RETURNING {SUMMARY_COLUMNS}
        "#
    );

    let mut tx = pool.begin().await?;
    let mut created = Vec::with_capacity(files.len());
    for file in files {
        let row = sqlx::query_as::<_, ImageSummary>(&sql)
            .bind(generate_id())
            .bind(&file.name)
            .bind(&file.content_type)
            .bind(&file.data)
            .bind(event_id)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;
        created.push(row);
    }
    tx.commit().await?;

    Ok(created)
}

/// Rename an image. `None` if it does not exist.
pub async fn rename(pool: &PgPool, id: Uuid, name: &str) -> Result<Option<ImageSummary>, sqlx::Error> {
    let sql = format!("UPDATE images SET name = $2 WHERE id = $1 RETURNING {SUMMARY_COLUMNS}");
    sqlx::query_as::<_, ImageSummary>(&sql)
        .bind(id)
        .bind(name)
        .fetch_optional(pool)
        .await
}

/// Delete an image. Returns false if nothing was deleted.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM images WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ============================================================
// Helpers
// ============================================================

/// Build an `ILIKE` pattern matching `term` anywhere, with LIKE wildcards in `term` escaped.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{events, users};
    use chrono::Utc;
    use snapsync_common::error::{DbResultExt, SnapError};
    use snapsync_common::models::{EventInput, ImageResponse, UNKNOWN_CREATOR, UNKNOWN_EVENT};

    fn png(name: &str) -> NewImage {
        NewImage {
            name: name.into(),
            content_type: "image/png".into(),
            data: vec![0x89, b'P', b'N', b'G'],
        }
    }

    async fn seed(pool: &PgPool, event_name: &str) -> Uuid {
        users::create(pool, "user_1", "Ada", "ada@example.com")
            .await
            .unwrap();
        let input = EventInput {
            name: event_name.into(),
            date: Utc::now(),
            description: None,
        };
        events::create(pool, generate_id(), &input).await.unwrap().id
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_upload_then_list(pool: PgPool) {
        let event_id = seed(&pool, "Birthday").await;
        let created = create_many(&pool, event_id, "user_1", &[png("a.png"), png("b.png")])
            .await
            .unwrap();
        assert_eq!(created.len(), 2);
        assert_eq!(created[0].size, 4);
        assert_eq!(created[0].event_id, Some(event_id));

        let rows = list(&pool, None, None).await.unwrap();
        assert_eq!(rows.len(), 2);
        let listed = ImageResponse::from(rows[0].clone());
        assert_eq!(listed.event_name, "Birthday");
        assert_eq!(listed.created_by, "user_1");
        assert!(listed.image_url.starts_with("data:image/png;base64,"));

        let page = list(&pool, None, Some(Page { number: 1, size: 1 })).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(count(&pool, None).await.unwrap(), 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_search_matches_image_or_event_name(pool: PgPool) {
        let event_id = seed(&pool, "Birthday").await;
        create_many(&pool, event_id, "user_1", &[png("Cake 100%.png"), png("cake-2.png")])
            .await
            .unwrap();

        assert_eq!(list(&pool, Some("CAKE"), None).await.unwrap().len(), 2);
        assert_eq!(list(&pool, Some("birth"), None).await.unwrap().len(), 2);
        assert_eq!(count(&pool, Some("birth")).await.unwrap(), 2);

        // Wildcards in the term are literal.
        let literal = list(&pool, Some("%"), None).await.unwrap();
        assert_eq!(literal.len(), 1);
        assert_eq!(literal[0].name, "Cake 100%.png");
        assert!(list(&pool, Some("_"), None).await.unwrap().is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_images_outlive_event_and_uploader(pool: PgPool) {
        let event_id = seed(&pool, "Birthday").await;
        create_many(&pool, event_id, "user_1", &[png("a.png")])
            .await
            .unwrap();

        assert!(events::delete(&pool, event_id).await.unwrap());
        let user = users::find_by_clerk_id(&pool, "user_1").await.unwrap().unwrap();
        assert!(users::delete(&pool, user.id).await.unwrap());

        let rows = list(&pool, None, None).await.unwrap();
        assert_eq!(rows.len(), 1);
        let listed = ImageResponse::from(rows[0].clone());
        assert_eq!(listed.event_name, UNKNOWN_EVENT);
        assert_eq!(listed.created_by, UNKNOWN_CREATOR);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_unknown_event_inserts_nothing(pool: PgPool) {
        seed(&pool, "Birthday").await;
        let err = create_many(&pool, generate_id(), "user_1", &[png("a.png"), png("b.png")])
            .await
            .context("Failed to upload images")
            .unwrap_err();
        assert!(matches!(err, SnapError::Validation { .. }));
        assert_eq!(count(&pool, None).await.unwrap(), 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_rename_content_and_delete(pool: PgPool) {
        let event_id = seed(&pool, "Birthday").await;
        let created = create_many(&pool, event_id, "user_1", &[png("a.png")])
            .await
            .unwrap();
        let id = created[0].id;

        let renamed = rename(&pool, id, "cover.png").await.unwrap().unwrap();
        assert_eq!(renamed.name, "cover.png");
        assert!(rename(&pool, generate_id(), "x").await.unwrap().is_none());

        let content = find_content(&pool, id).await.unwrap().unwrap();
        assert_eq!(content.content_type, "image/png");
        assert_eq!(content.image_data, [0x89, b'P', b'N', b'G']);

        assert!(delete(&pool, id).await.unwrap());
        assert!(!delete(&pool, id).await.unwrap());
        assert!(find_content(&pool, id).await.unwrap().is_none());
    }

    #[test]
    fn test_contains_pattern_plain() {
        assert_eq!(contains_pattern("gala"), "%gala%");
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("100%_off"), "%100\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }
}
