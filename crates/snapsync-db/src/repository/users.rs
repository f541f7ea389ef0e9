//! User repository: CRUD for the `users` table.

use snapsync_common::models::{User, UserSummary};
use snapsync_common::pagination::Page;
use sqlx::PgPool;

/// List users in creation order.
pub async fn list(pool: &PgPool, page: Option<Page>) -> Result<Vec<UserSummary>, sqlx::Error> {
    sqlx::query_as::<_, UserSummary>(
        "SELECT id, clerk_id, name, email FROM users ORDER BY id LIMIT $1 OFFSET $2",
    )
        .bind(page.map(|p| p.limit()))
        .bind(page.map_or(0, |p| p.offset()))
        .fetch_all(pool)
        .await
}

/// Count all users.
pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

/// Find a user by identity-provider ID.
pub async fn find_by_clerk_id(pool: &PgPool, clerk_id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE clerk_id = $1")
        .bind(clerk_id)
        .fetch_optional(pool)
        .await
}

/// Create a new user.
pub async fn create(
    pool: &PgPool,
    clerk_id: &str,
    name: &str,
    email: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (clerk_id, name, email, created_at)
        VALUES ($1, $2, $3, NOW())
        RETURNING *
        "#,
    )
    .bind(clerk_id)
    .bind(name)
    .bind(email)
    .fetch_one(pool)
    .await
}

/// Update name and email. `clerk_id` is immutable.
pub async fn update(
    pool: &PgPool,
    id: i32,
    name: &str,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET
            name = $2,
            email = $3
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Delete a user. Their images stay, with `created_by` cleared.
pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapsync_common::error::{DbResultExt, SnapError};

    #[sqlx::test(migrations = "./migrations")]
    async fn test_created_user_is_listed(pool: PgPool) {
        let user = create(&pool, "user_1", "Ada", "ada@example.com").await.unwrap();

        let all = list(&pool, None).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, user.id);
        assert_eq!(all[0].clerk_id, "user_1");
        assert_eq!(count(&pool).await.unwrap(), 1);

        let found = find_by_clerk_id(&pool, "user_1").await.unwrap().unwrap();
        assert_eq!(found.email, "ada@example.com");
        assert!(find_by_clerk_id(&pool, "user_2").await.unwrap().is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_duplicates_map_to_conflict(pool: PgPool) {
        create(&pool, "user_1", "Ada", "ada@example.com").await.unwrap();

        let err = create(&pool, "user_2", "Ada Again", "ada@example.com")
            .await
            .context("Failed to create user")
            .unwrap_err();
        assert!(matches!(err, SnapError::AlreadyExists { ref resource } if resource == "Email"));

        let err = create(&pool, "user_1", "Grace", "grace@example.com")
            .await
            .context("Failed to create user")
            .unwrap_err();
        assert!(matches!(err, SnapError::AlreadyExists { ref resource } if resource == "Clerk ID"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_and_delete(pool: PgPool) {
        let user = create(&pool, "user_1", "Ada", "ada@example.com").await.unwrap();

        let updated = update(&pool, user.id, "Ada L.", "ada@lovelace.dev")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Ada L.");
        assert_eq!(updated.clerk_id, "user_1");
        assert!(update(&pool, user.id + 1, "x", "x@example.com").await.unwrap().is_none());

        assert!(delete(&pool, user.id).await.unwrap());
        assert!(!delete(&pool, user.id).await.unwrap());
    }
}
