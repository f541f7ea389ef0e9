//! Event repository: CRUD for the `events` table.

use snapsync_common::models::{Event, EventInput};
use snapsync_common::pagination::Page;
use sqlx::PgPool;
use uuid::Uuid;

/// List events, newest first. `page = None` returns every row.
pub async fn list(pool: &PgPool, page: Option<Page>) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(
        r#"
        SELECT * FROM events
        ORDER BY created_at DESC, id DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(page.map(|p| p.limit()))
    .bind(page.map_or(0, |p| p.offset()))
    .fetch_all(pool)
    .await
}

/// Count all events.
pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

/// Whether an event with this ID exists.
pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM events WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

/// Insert a new event.
pub async fn create(pool: &PgPool, id: Uuid, input: &EventInput) -> Result<Event, sqlx::Error> {
    sqlx::query_as::<_, Event>(
        r#"
        INSERT INTO events (id, name, date, description, created_at)
        VALUES ($1, $2, $3, $4, NOW())
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.name)
    .bind(input.date)
    .bind(input.description.as_deref())
    .fetch_one(pool)
    .await
}

/// Replace the editable fields of an event. `None` if it does not exist.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: &EventInput,
) -> Result<Option<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(
        r#"
        UPDATE events SET
            name = $2,
            date = $3,
            description = $4
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.name)
    .bind(input.date)
    .bind(input.description.as_deref())
    .fetch_optional(pool)
    .await
}

/// Delete an event. Returns false if nothing was deleted.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use snapsync_common::ids::generate_id;

    fn input(name: &str) -> EventInput {
        EventInput {
            name: name.into(),
            date: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
            description: None,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_created_events_are_listed_newest_first(pool: PgPool) {
        let first = create(&pool, generate_id(), &input("Spring Gala")).await.unwrap();
        let second = create(&pool, generate_id(), &input("Summer Fair")).await.unwrap();

        let all = list(&pool, None).await.unwrap();
        let names: Vec<_> = all.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Summer Fair", "Spring Gala"]);
        assert_eq!(count(&pool).await.unwrap(), 2);

        let page = Page { number: 2, size: 1 };
        let paged = list(&pool, Some(page)).await.unwrap();
        assert_eq!(paged.len(), 1);
        assert_eq!(paged[0].id, first.id);
        assert!(exists(&pool, second.id).await.unwrap());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_and_delete(pool: PgPool) {
        let event = create(&pool, generate_id(), &input("Gala")).await.unwrap();

        let mut changed = input("Winter Gala");
        changed.description = Some("Black tie".into());
        let updated = update(&pool, event.id, &changed).await.unwrap().unwrap();
        assert_eq!(updated.name, "Winter Gala");
        assert_eq!(updated.description.as_deref(), Some("Black tie"));
        assert_eq!(updated.created_at, event.created_at);

        assert!(update(&pool, generate_id(), &changed).await.unwrap().is_none());

        assert!(delete(&pool, event.id).await.unwrap());
        assert!(!delete(&pool, event.id).await.unwrap());
        assert!(!exists(&pool, event.id).await.unwrap());
    }
}
